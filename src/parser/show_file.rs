use std::fs::File;
use std::path::{Path, PathBuf};

use super::error::{ErrorKind, ScriptError};
use super::types::{CommandKind, Script};

#[derive(Debug, Clone, PartialEq)]
pub struct ShowFile {
    pub name: String,
    pub path: PathBuf,
    pub line_number: usize,
}

/// Find the first `[slide_show_file: <name>]` line and check the deck can be opened.
pub fn locate_show_file(script: &Script, base_dir: &Path) -> Result<ShowFile, ScriptError> {
    let found = script.lines.iter().find_map(|line| {
        line.argument_of(CommandKind::SlideShowFile)
            .map(|name| (line, name))
    });

    let Some((line, name)) = found else {
        return Err(ScriptError::File {
            path: PathBuf::from(&script.file),
            kind: ErrorKind::Reference,
            message: "[slide_show_file: ] command not found".to_string(),
        });
    };

    let line_error = |kind, message: String| ScriptError::Line {
        file: script.file.clone(),
        line_number: line.line_number,
        line_content: line.raw.clone(),
        kind,
        message,
    };

    if name.is_empty() {
        return Err(line_error(
            ErrorKind::Reference,
            "No file name supplied for [slide_show_file: ]".to_string(),
        ));
    }

    let path = base_dir.join(name);
    File::open(&path).map_err(|e| {
        line_error(
            ErrorKind::Io,
            format!("Cannot open slide presentation file {}: {e}", path.display()),
        )
    })?;

    Ok(ShowFile {
        name: name.to_string(),
        path,
        line_number: line.line_number,
    })
}
