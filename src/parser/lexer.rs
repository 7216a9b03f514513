use super::types::{Command, CommandKind, LineKind, ScriptLine};

pub fn classify_line(line: &str, line_number: usize) -> ScriptLine {
    let trimmed = line.trim();

    let kind = if trimmed.is_empty() {
        LineKind::Blank
    } else if trimmed.starts_with('#') {
        // Comments win even when they look like a command
        LineKind::Comment
    } else if let Some(body) = bracket_body(trimmed) {
        match parse_command(body) {
            Some(command) => LineKind::Command(command),
            None => LineKind::Ignored,
        }
    } else {
        LineKind::Text(trimmed.to_string())
    };

    ScriptLine {
        line_number,
        raw: line.to_string(),
        kind,
    }
}

/// Text between the leading `[` and the final `]` of a trimmed line.
fn bracket_body(trimmed: &str) -> Option<&str> {
    let rest = trimmed.strip_prefix('[')?;
    let close = rest.rfind(']')?;
    Some(&rest[..close])
}

/// Parse the inside of a bracketed line: `<name>:<argument>`.
///
/// The name must match the vocabulary exactly (ignoring ASCII case), so
/// `[slides:3]` or `[my slide: 3]` are not commands. Returns `None` for
/// any body that is not a recognised command.
pub fn parse_command(body: &str) -> Option<Command> {
    let (name, argument) = body.split_once(':')?;
    let kind = CommandKind::from_name(name.trim())?;
    Some(Command {
        kind,
        argument: clean_argument(argument),
    })
}

fn clean_argument(argument: &str) -> String {
    argument
        .trim_matches(|c: char| c.is_whitespace() || matches!(c, '[' | ']' | '"' | '\''))
        .to_string()
}
