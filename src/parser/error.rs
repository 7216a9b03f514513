use std::fmt;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Parse,
    /// Slide outside `[1, total]`, negative pause, event before the first slide.
    Range,
    /// Unknown language, missing music file, missing slide show file.
    Reference,
    Extension,
    Io,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::Parse => "ParseError",
            ErrorKind::Range => "RangeError",
            ErrorKind::Reference => "ReferenceError",
            ErrorKind::Extension => "ExtensionError",
            ErrorKind::Io => "IOError",
        };
        f.write_str(name)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ScriptError {
    #[error("Error in file {file} at line number: {line_number}\n  | {line_content}\n{kind}: {message}")]
    Line {
        file: String,
        line_number: usize,
        line_content: String,
        kind: ErrorKind,
        message: String,
    },
    #[error("{kind}: {message} ({})", .path.display())]
    File {
        path: PathBuf,
        kind: ErrorKind,
        message: String,
    },
}

impl ScriptError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ScriptError::Line { kind, .. } | ScriptError::File { kind, .. } => *kind,
        }
    }

    pub fn line_number(&self) -> Option<usize> {
        match self {
            ScriptError::Line { line_number, .. } => Some(*line_number),
            ScriptError::File { .. } => None,
        }
    }
}
