use std::path::PathBuf;
use std::time::Duration;

use clap::ValueEnum;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PlayerKind {
    Mplayer,
    Ffplay,
}

/// Settings shared by the plan builder and the execution driver.
#[derive(Debug, Clone, PartialEq)]
pub struct ShowConfig {
    pub default_language: String,
    pub player: PlayerKind,
    /// Relative music and slide show paths resolve against this directory.
    pub base_dir: PathBuf,
    pub start_delay: Duration,
}

impl Default for ShowConfig {
    fn default() -> Self {
        Self {
            default_language: "en".to_string(),
            player: PlayerKind::Mplayer,
            base_dir: PathBuf::from("."),
            start_delay: Duration::from_secs(3),
        }
    }
}
