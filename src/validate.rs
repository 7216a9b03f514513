use std::fs::File;
use std::path::Path;
use std::time::Duration;

use log::info;

use crate::parser::error::{ErrorKind, ScriptError};
use crate::parser::languages;
use crate::parser::types::{CommandKind, LineKind, Script, ScriptLine};

pub const MUSIC_EXTENSIONS: [&str; 2] = ["mp3", "wav"];

#[derive(Debug, Clone, Copy)]
pub struct ValidationContext<'a> {
    pub slide_count: usize,
    /// Directory relative music paths resolve against.
    pub base_dir: &'a Path,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScriptSummary {
    pub slides: usize,
    pub music: usize,
    pub pauses: usize,
    pub languages: usize,
}

/// A script that passed every check, with language lines carrying codes.
#[derive(Debug, Clone)]
pub struct ValidatedScript {
    pub script: Script,
    pub summary: ScriptSummary,
    pub slide_count: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Violation {
    pub kind: ErrorKind,
    pub message: String,
}

impl Violation {
    fn new(kind: ErrorKind, message: String) -> Self {
        Self { kind, message }
    }

    pub fn at(self, file: &str, line: &ScriptLine) -> ScriptError {
        ScriptError::Line {
            file: file.to_string(),
            line_number: line.line_number,
            line_content: line.raw.clone(),
            kind: self.kind,
            message: self.message,
        }
    }
}

pub fn slide_target(argument: &str, slide_count: usize) -> Result<usize, Violation> {
    let number: i64 = argument.parse().map_err(|_| {
        Violation::new(
            ErrorKind::Parse,
            format!("Slide number {argument} is not an integer"),
        )
    })?;

    if number < 1 {
        return Err(Violation::new(
            ErrorKind::Range,
            format!("Slide number {number} is less than first slide number of 1"),
        ));
    }
    match usize::try_from(number) {
        Ok(n) if n <= slide_count => Ok(n),
        _ => Err(Violation::new(
            ErrorKind::Range,
            format!("Slide number {number} exceeds total slides of {slide_count}"),
        )),
    }
}

pub fn pause_seconds(argument: &str) -> Result<f64, Violation> {
    let seconds: f64 = argument
        .parse()
        .ok()
        .filter(|value: &f64| value.is_finite())
        .ok_or_else(|| {
            Violation::new(
                ErrorKind::Parse,
                format!("Pause value {argument} is not a number"),
            )
        })?;

    if seconds < 0.0 {
        return Err(Violation::new(
            ErrorKind::Range,
            format!("Pause {seconds} is a negative value"),
        ));
    }
    if Duration::try_from_secs_f64(seconds).is_err() {
        return Err(Violation::new(
            ErrorKind::Range,
            format!("Pause {seconds} is too long"),
        ));
    }
    Ok(seconds)
}

pub fn check_music_file(argument: &str, base_dir: &Path) -> Result<(), Violation> {
    let path = base_dir.join(argument);
    let openable = path.is_file() && File::open(&path).is_ok();
    if !openable {
        return Err(Violation::new(
            ErrorKind::Reference,
            format!("Music file {argument} cannot be opened"),
        ));
    }

    let extension = argument
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_lowercase())
        .unwrap_or_default();
    if !MUSIC_EXTENSIONS.contains(&extension.as_str()) {
        return Err(Violation::new(
            ErrorKind::Extension,
            format!("Music file {argument} does not have .mp3 or .wav extension"),
        ));
    }
    Ok(())
}

/// Run `check` on the argument of every `kind` command, stopping at the first violation.
fn scan<F>(script: &Script, kind: CommandKind, mut check: F) -> Result<usize, ScriptError>
where
    F: FnMut(&str) -> Result<(), Violation>,
{
    let mut count = 0;
    for line in &script.lines {
        let Some(argument) = line.argument_of(kind) else {
            continue;
        };
        check(argument).map_err(|violation| violation.at(&script.file, line))?;
        count += 1;
    }
    Ok(count)
}

/// Count `[slide:]` commands; each must be an integer in `[1, slide_count]`.
pub fn check_slide_commands(script: &Script, slide_count: usize) -> Result<usize, ScriptError> {
    scan(script, CommandKind::Slide, |argument| {
        slide_target(argument, slide_count).map(drop)
    })
}

pub fn check_music_commands(script: &Script, base_dir: &Path) -> Result<usize, ScriptError> {
    scan(script, CommandKind::Music, |argument| {
        check_music_file(argument, base_dir)
    })
}

pub fn check_pause_commands(script: &Script) -> Result<usize, ScriptError> {
    scan(script, CommandKind::Pause, |argument| {
        pause_seconds(argument).map(drop)
    })
}

pub fn check_language_commands(script: &Script) -> Result<usize, ScriptError> {
    scan(script, CommandKind::Language, |argument| {
        languages::resolve(argument).map(drop).ok_or_else(|| {
            Violation::new(
                ErrorKind::Reference,
                format!("Language of '{argument}' is not valid"),
            )
        })
    })
}

/// Narration, music and pauses need a slide bucket to land in.
pub fn check_event_placement(script: &Script) -> Result<(), ScriptError> {
    let mut seen_slide = false;
    for line in &script.lines {
        let what = match &line.kind {
            LineKind::Command(command) => match command.kind {
                CommandKind::Slide => {
                    seen_slide = true;
                    continue;
                }
                CommandKind::Music => "Music",
                CommandKind::Pause => "Pause",
                CommandKind::Language | CommandKind::SlideShowFile => continue,
            },
            LineKind::Text(_) => "Narration",
            LineKind::Blank | LineKind::Comment | LineKind::Ignored => continue,
        };
        if !seen_slide {
            return Err(Violation::new(
                ErrorKind::Range,
                format!("{what} appears before the first [slide:] command"),
            )
            .at(&script.file, line));
        }
    }
    Ok(())
}

/// Run every check and resolve language names. The first failure aborts.
pub fn validate_script(
    script: &Script,
    ctx: &ValidationContext<'_>,
) -> Result<ValidatedScript, ScriptError> {
    let slides = check_slide_commands(script, ctx.slide_count)?;
    info!("Total slides to be displayed: {slides}");
    let music = check_music_commands(script, ctx.base_dir)?;
    info!("Total music files to be played: {music}");
    let pauses = check_pause_commands(script)?;
    info!("Total pause commands: {pauses}");
    let language_count = check_language_commands(script)?;
    info!("Total language commands: {language_count}");

    let resolved = languages::resolve_languages(script)?;
    check_event_placement(&resolved)?;

    Ok(ValidatedScript {
        script: resolved,
        summary: ScriptSummary {
            slides,
            music,
            pauses,
            languages: language_count,
        },
        slide_count: ctx.slide_count,
    })
}
