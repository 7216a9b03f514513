use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandKind {
    Slide,
    Music,
    Pause,
    Language,
    SlideShowFile,
}

impl CommandKind {
    pub const ALL: [CommandKind; 5] = [
        CommandKind::Slide,
        CommandKind::Music,
        CommandKind::Pause,
        CommandKind::Language,
        CommandKind::SlideShowFile,
    ];

    pub fn name(self) -> &'static str {
        match self {
            CommandKind::Slide => "slide",
            CommandKind::Music => "music",
            CommandKind::Pause => "pause",
            CommandKind::Language => "language",
            CommandKind::SlideShowFile => "slide_show_file",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.name().eq_ignore_ascii_case(name))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    pub kind: CommandKind,
    pub argument: String,
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}:{}]", self.kind.name(), self.argument)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineKind {
    Blank,
    Comment,
    Command(Command),
    /// Bracketed line with a name outside the vocabulary. Never an error, never text.
    Ignored,
    Text(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptLine {
    pub line_number: usize,
    pub raw: String,
    pub kind: LineKind,
}

impl ScriptLine {
    pub fn command(&self) -> Option<&Command> {
        match &self.kind {
            LineKind::Command(command) => Some(command),
            _ => None,
        }
    }

    /// The command argument when this line is a command of `kind`.
    pub fn argument_of(&self, kind: CommandKind) -> Option<&str> {
        self.command()
            .filter(|command| command.kind == kind)
            .map(|command| command.argument.as_str())
    }
}

#[derive(Debug, Clone)]
pub struct Script {
    pub file: String,
    pub lines: Vec<ScriptLine>,
}
