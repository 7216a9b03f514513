pub mod error;
pub mod languages;
pub mod lexer;
pub mod show_file;
pub mod types;

use std::path::Path;

use error::{ErrorKind, ScriptError};
use types::Script;

pub fn parse_script(file: &str, input: &str) -> Script {
    let lines = input
        .lines()
        .enumerate()
        .map(|(idx, line)| lexer::classify_line(line, idx + 1))
        .collect();

    Script {
        file: file.to_string(),
        lines,
    }
}

pub fn read_script(path: &Path) -> Result<Script, ScriptError> {
    let content = std::fs::read_to_string(path).map_err(|e| ScriptError::File {
        path: path.to_path_buf(),
        kind: ErrorKind::Io,
        message: format!("Cannot read control file: {e}"),
    })?;
    Ok(parse_script(&path.display().to_string(), &content))
}
