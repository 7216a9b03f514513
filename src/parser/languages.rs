use super::error::{ErrorKind, ScriptError};
use super::types::{Command, CommandKind, LineKind, Script, ScriptLine};

/// Languages the remote text-to-speech service accepts, keyed by lowercase name.
pub const LANGUAGES: [(&str, &str); 48] = [
    ("albanian", "sq"),
    ("arabic", "ar"),
    ("armenian", "hy"),
    ("basque", "eu"),
    ("bosnian", "bs"),
    ("catalan", "ca"),
    ("chinese (simplified)", "zh-CN"),
    ("chinese (traditional)", "zh-TW"),
    ("corsican", "co"),
    ("croatian", "hr"),
    ("czech", "cs"),
    ("danish", "da"),
    ("dutch", "nl"),
    ("english", "en"),
    ("esperanto", "eo"),
    ("finnish", "fi"),
    ("french", "fr"),
    ("german", "de"),
    ("greek", "el"),
    ("hindi", "hi"),
    ("hungarian", "hu"),
    ("icelandic", "is"),
    ("indonesian", "id"),
    ("italian", "it"),
    ("japanese", "ja"),
    ("khmer", "km"),
    ("korean", "ko"),
    ("latin", "la"),
    ("latvian", "lv"),
    ("macedonian", "mk"),
    ("nepali", "ne"),
    ("norwegian", "no"),
    ("polish", "pl"),
    ("portuguese", "pt"),
    ("romanian", "ro"),
    ("russian", "ru"),
    ("serbian", "sr"),
    ("sinhala", "si"),
    ("slovak", "sk"),
    ("spanish", "es"),
    ("swahili", "sw"),
    ("swedish", "sv"),
    ("tamil", "ta"),
    ("thai", "th"),
    ("turkish", "tr"),
    ("ukrainian", "uk"),
    ("vietnamese", "vi"),
    ("welsh", "cy"),
];

pub fn code_for_name(name: &str) -> Option<&'static str> {
    let wanted = name.trim().to_lowercase();
    LANGUAGES
        .iter()
        .find(|(language, _)| *language == wanted)
        .map(|(_, code)| *code)
}

/// Resolve a language name, or pass an already valid code through unchanged.
pub fn resolve(name_or_code: &str) -> Option<&'static str> {
    code_for_name(name_or_code).or_else(|| {
        LANGUAGES
            .iter()
            .find(|(_, code)| *code == name_or_code.trim())
            .map(|(_, code)| *code)
    })
}

/// Return a copy of `script` where every `[language:<name>]` line carries its code.
///
/// Line positions and numbers are preserved. The first unknown language aborts
/// with a `Reference` error.
pub fn resolve_languages(script: &Script) -> Result<Script, ScriptError> {
    let lines = script
        .lines
        .iter()
        .map(|line| resolve_line(line, &script.file))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Script {
        file: script.file.clone(),
        lines,
    })
}

fn resolve_line(line: &ScriptLine, file: &str) -> Result<ScriptLine, ScriptError> {
    let Some(name) = line.argument_of(CommandKind::Language) else {
        return Ok(line.clone());
    };

    let code = resolve(name).ok_or_else(|| ScriptError::Line {
        file: file.to_string(),
        line_number: line.line_number,
        line_content: line.raw.clone(),
        kind: ErrorKind::Reference,
        message: format!("Language of '{name}' is not valid"),
    })?;

    let command = Command {
        kind: CommandKind::Language,
        argument: code.to_string(),
    };
    Ok(ScriptLine {
        line_number: line.line_number,
        raw: command.to_string(),
        kind: LineKind::Command(command),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_script;

    #[test]
    fn test_table_shape() {
        assert_eq!(LANGUAGES.len(), 48);
        for (name, code) in LANGUAGES {
            assert_eq!(name, name.to_lowercase());
            if name.starts_with("chinese") {
                assert_eq!(code.len(), 5);
            } else {
                assert_eq!(code.len(), 2, "{name}");
            }
        }
    }

    #[test]
    fn test_code_for_name_ignores_case() {
        assert_eq!(code_for_name("French"), Some("fr"));
        assert_eq!(code_for_name("CHINESE (TRADITIONAL)"), Some("zh-TW"));
        assert_eq!(code_for_name("Klingon"), None);
    }

    #[test]
    fn test_resolve_passes_codes_through() {
        assert_eq!(resolve("fr"), Some("fr"));
        assert_eq!(resolve("zh-CN"), Some("zh-CN"));
        assert_eq!(resolve("xx"), None);
    }

    #[test]
    fn test_codes_are_never_names() {
        for (_, code) in LANGUAGES {
            assert_eq!(code_for_name(code), None);
            assert_eq!(resolve(code), Some(code));
        }
    }

    #[test]
    fn test_resolve_languages_rewrites_lines() {
        let script = parse_script("talk.txt", "[slide:1]\n[language:German]\nHallo\n");
        let resolved = resolve_languages(&script).unwrap();
        assert_eq!(resolved.lines.len(), 3);
        assert_eq!(resolved.lines[1].raw, "[language:de]");
        assert_eq!(
            resolved.lines[1].argument_of(CommandKind::Language),
            Some("de")
        );
        assert_eq!(resolved.lines[1].line_number, 2);
        // the input is left untouched
        assert_eq!(script.lines[1].raw, "[language:German]");
    }

    #[test]
    fn test_resolve_languages_is_idempotent() {
        let script = parse_script("talk.txt", "[language:Spanish]\n[language:Welsh]\n");
        let once = resolve_languages(&script).unwrap();
        let twice = resolve_languages(&once).unwrap();
        assert_eq!(once.lines, twice.lines);
    }

    #[test]
    fn test_resolve_languages_unknown_name() {
        let script = parse_script("talk.txt", "[slide:1]\n\n[language:Klingon]\n");
        let err = resolve_languages(&script).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Reference);
        assert_eq!(err.line_number(), Some(3));
        let text = err.to_string();
        assert!(text.contains("Klingon"));
        assert!(text.contains("talk.txt"));
    }
}
