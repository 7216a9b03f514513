use std::path::{Path, PathBuf};
use std::process::Command;

use anyhow::{Context, Result};
use log::debug;

use super::PresentationSession;

fn escape(text: &str) -> String {
    text.replace('\\', "\\\\").replace('"', "\\\"")
}

pub fn open_script(path: &Path) -> String {
    let escaped = escape(&path.display().to_string());
    format!("tell application \"Keynote\"\nactivate\nopen POSIX file \"{escaped}\"\nend tell")
}

pub fn slide_count_script() -> String {
    "tell application \"Keynote\" to count slides of front document".to_string()
}

pub fn start_script() -> String {
    "tell application \"Keynote\"\ntell front document\nstart from first slide\nend tell\nend tell"
        .to_string()
}

/// `n` is Keynote's 1-based slide number.
pub fn slide_goto_script(n: usize) -> String {
    format!(
        "tell application \"Keynote\"\ntell front document\nset current slide to slide {n}\nend tell\nend tell"
    )
}

pub fn playing_script() -> String {
    "tell application \"Keynote\" to get playing".to_string()
}

pub fn close_script() -> String {
    "tell application \"Keynote\"\nif playing then stop front document\nclose front document saving no\nend tell"
        .to_string()
}

pub fn run_applescript(script: &str) -> Result<String> {
    debug!("osascript: {}", script.replace('\n', "; "));
    let output = Command::new("osascript").arg("-e").arg(script).output()?;

    if output.status.success() {
        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    } else {
        let err = String::from_utf8_lossy(&output.stderr).to_string();
        anyhow::bail!("osascript error: {err}");
    }
}

/// A deck opened in Keynote and driven through `osascript`.
pub struct KeynoteSession {
    path: PathBuf,
    open: bool,
}

impl KeynoteSession {
    pub fn open(path: &Path) -> Result<Self> {
        run_applescript(&open_script(path))
            .with_context(|| format!("Cannot open presentation {}", path.display()))?;
        Ok(Self {
            path: path.to_path_buf(),
            open: true,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl PresentationSession for KeynoteSession {
    fn slide_count(&self) -> Result<usize> {
        let reply = run_applescript(&slide_count_script())?;
        reply
            .parse()
            .with_context(|| format!("Unexpected slide count from Keynote: '{reply}'"))
    }

    fn goto_slide(&mut self, index: usize) -> Result<()> {
        run_applescript(&slide_goto_script(index + 1)).map(drop)
    }

    fn start(&mut self) -> Result<()> {
        run_applescript(&start_script()).map(drop)
    }

    fn is_running(&self) -> Result<bool> {
        Ok(run_applescript(&playing_script())? == "true")
    }

    fn dispose(&mut self) -> Result<()> {
        if !self.open {
            return Ok(());
        }
        self.open = false;
        run_applescript(&close_script()).map(drop)
    }
}
