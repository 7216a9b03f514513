use std::path::Path;
use std::process::Command;

use log::debug;
use url::Url;

use crate::config::PlayerKind;

pub const TTS_ENDPOINT: &str = "https://translate.google.com/translate_tts";

#[derive(Debug, thiserror::Error)]
pub enum PlaybackError {
    #[error("PlaybackError: failed to launch {program}: {source}")]
    Launch {
        program: String,
        #[source]
        source: std::io::Error,
    },
    #[error("PlaybackError: playing {uri} failed: {message}")]
    Failed { uri: String, message: String },
    #[error("PlaybackError: cannot turn {0} into an audio URI")]
    InvalidSource(String),
}

/// Plays one audio source and returns only once it finished or failed.
pub trait AudioPlayer {
    fn play_blocking(&mut self, uri: &str) -> Result<(), PlaybackError>;
}

/// Remote text-to-speech request for `text` spoken in `code`.
pub fn tts_uri(code: &str, text: &str) -> Result<String, PlaybackError> {
    Url::parse_with_params(
        TTS_ENDPOINT,
        &[("ie", "UTF-8"), ("client", "tw-ob"), ("tl", code), ("q", text)],
    )
    .map(String::from)
    .map_err(|_| PlaybackError::InvalidSource(text.to_string()))
}

/// Use `source` verbatim when it already is a URI, otherwise turn the path into a `file://` URI.
pub fn audio_source_uri(source: &str, base_dir: &Path) -> Result<String, PlaybackError> {
    // Single-letter schemes are Windows drive letters, not URIs
    if let Ok(url) = Url::parse(source)
        && url.scheme().len() > 1
    {
        return Ok(url.into());
    }

    let invalid = || PlaybackError::InvalidSource(source.to_string());
    let absolute = std::path::absolute(base_dir.join(source)).map_err(|_| invalid())?;
    Url::from_file_path(&absolute)
        .map(String::from)
        .map_err(|()| invalid())
}

pub fn player_command(kind: PlayerKind, uri: &str) -> (&'static str, Vec<String>) {
    let (program, flags): (&str, &[&str]) = match kind {
        PlayerKind::Mplayer => ("mplayer", &["-really-quiet", "-cache", "1024"]),
        PlayerKind::Ffplay => ("ffplay", &["-nodisp", "-autoexit", "-loglevel", "error"]),
    };
    let mut args: Vec<String> = flags.iter().map(|f| f.to_string()).collect();
    args.push(uri.to_string());
    (program, args)
}

pub struct ProcessPlayer {
    kind: PlayerKind,
}

impl ProcessPlayer {
    pub fn new(kind: PlayerKind) -> Self {
        Self { kind }
    }
}

impl AudioPlayer for ProcessPlayer {
    fn play_blocking(&mut self, uri: &str) -> Result<(), PlaybackError> {
        let (program, args) = player_command(self.kind, uri);
        debug!("{program} {}", args.join(" "));

        let output = Command::new(program)
            .args(&args)
            .output()
            .map_err(|source| PlaybackError::Launch {
                program: program.to_string(),
                source,
            })?;

        if output.status.success() {
            Ok(())
        } else {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            let message = if stderr.is_empty() {
                format!("{program} exited with {}", output.status)
            } else {
                stderr
            };
            Err(PlaybackError::Failed {
                uri: uri.to_string(),
                message,
            })
        }
    }
}
