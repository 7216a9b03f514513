use std::fmt;

use log::warn;
use serde::Serialize;

use crate::config::ShowConfig;
use crate::parser::error::{ErrorKind, ScriptError};
use crate::parser::types::{CommandKind, LineKind, Script, ScriptLine};
use crate::validate::{
    ScriptSummary, ValidatedScript, ValidationContext, Violation, pause_seconds, slide_target,
    validate_script,
};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Event {
    GotoSlide(usize),
    Pause(f64),
    PlayMusic(String),
    Speak(String, String),
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Event::GotoSlide(n) => write!(f, "[SLIDE {n}]"),
            Event::Pause(secs) => write!(f, "[PAUSE {secs}s]"),
            Event::PlayMusic(path) => write!(f, "[MUSIC] {path}"),
            Event::Speak(code, text) => write!(f, "[SAY {code}] {}", text.trim_end()),
        }
    }
}

/// Events grouped per slide-display-index. Indices are dense from 0.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct SlidePlan {
    buckets: Vec<Vec<Event>>,
}

impl SlidePlan {
    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    pub fn bucket(&self, index: usize) -> Option<&[Event]> {
        self.buckets.get(index).map(Vec::as_slice)
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, &[Event])> {
        self.buckets
            .iter()
            .enumerate()
            .map(|(i, events)| (i, events.as_slice()))
    }
}

impl From<Vec<Vec<Event>>> for SlidePlan {
    fn from(buckets: Vec<Vec<Event>>) -> Self {
        Self { buckets }
    }
}

pub struct PlanBuilder<'a> {
    config: &'a ShowConfig,
}

impl<'a> PlanBuilder<'a> {
    pub fn new(config: &'a ShowConfig) -> Self {
        Self { config }
    }

    pub fn build(&self, validated: &ValidatedScript) -> Result<SlidePlan, ScriptError> {
        let script = &validated.script;
        let mut state = PlanState {
            file: &script.file,
            buckets: Vec::with_capacity(validated.summary.slides),
            language: self.config.default_language.clone(),
            narration: String::new(),
            narrating: false,
        };

        for line in &script.lines {
            match &line.kind {
                LineKind::Blank => state.flush(line)?,
                LineKind::Comment => {}
                LineKind::Ignored => {
                    warn!(
                        "Ignoring unrecognised command at line {}: {}",
                        line.line_number,
                        line.raw.trim()
                    );
                }
                LineKind::Text(text) => {
                    state.narration.push_str(text);
                    state.narration.push(' ');
                    state.narrating = true;
                }
                LineKind::Command(command) => match command.kind {
                    CommandKind::Slide => {
                        state.flush(line)?;
                        let target = slide_target(&command.argument, validated.slide_count)
                            .map_err(|v| v.at(&script.file, line))?;
                        state.buckets.push(vec![Event::GotoSlide(target)]);
                    }
                    CommandKind::Music => {
                        state.flush(line)?;
                        state.push(line, Event::PlayMusic(command.argument.clone()))?;
                    }
                    CommandKind::Pause => {
                        state.flush(line)?;
                        let seconds =
                            pause_seconds(&command.argument).map_err(|v| v.at(&script.file, line))?;
                        state.push(line, Event::Pause(seconds))?;
                    }
                    CommandKind::Language => {
                        state.flush(line)?;
                        state.language = command.argument.clone();
                    }
                    CommandKind::SlideShowFile => {}
                },
            }
        }

        // End of input terminates the last narration block too
        if let Some(last) = script.lines.last() {
            state.flush(last)?;
        }

        debug_assert_eq!(state.buckets.len(), validated.summary.slides);
        Ok(SlidePlan::from(state.buckets))
    }
}

struct PlanState<'a> {
    file: &'a str,
    buckets: Vec<Vec<Event>>,
    language: String,
    narration: String,
    narrating: bool,
}

impl PlanState<'_> {
    fn push(&mut self, line: &ScriptLine, event: Event) -> Result<(), ScriptError> {
        match self.buckets.last_mut() {
            Some(bucket) => {
                bucket.push(event);
                Ok(())
            }
            None => Err(Violation {
                kind: ErrorKind::Range,
                message: "Event appears before the first [slide:] command".to_string(),
            }
            .at(self.file, line)),
        }
    }

    fn flush(&mut self, line: &ScriptLine) -> Result<(), ScriptError> {
        if !self.narrating {
            return Ok(());
        }
        let text = std::mem::take(&mut self.narration);
        self.narrating = false;
        let event = Event::Speak(self.language.clone(), text);
        self.push(line, event)
    }
}

#[derive(Debug, Clone)]
pub struct CompiledShow {
    pub summary: ScriptSummary,
    pub plan: SlidePlan,
}

/// Validate `script` and build its plan in one go.
pub fn compile_plan(
    script: &Script,
    ctx: &ValidationContext<'_>,
    config: &ShowConfig,
) -> Result<CompiledShow, ScriptError> {
    let validated = validate_script(script, ctx)?;
    let plan = PlanBuilder::new(config).build(&validated)?;
    Ok(CompiledShow {
        summary: validated.summary,
        plan,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_script;

    fn compile(input: &str, slide_count: usize) -> Result<CompiledShow, ScriptError> {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("tune.mp3"), b"").unwrap();
        let ctx = ValidationContext {
            slide_count,
            base_dir: dir.path(),
        };
        compile_plan(
            &parse_script("talk.txt", input),
            &ctx,
            &ShowConfig::default(),
        )
    }

    fn speak(code: &str, text: &str) -> Event {
        Event::Speak(code.into(), text.into())
    }

    #[test]
    fn test_plan_end_to_end() {
        let input = "[slide_show_file: x.odp]\n[slide:1]\n[language:French]\nBonjour\n\n[pause:2]\n[slide:2]\n[music:tune.mp3]\n";
        let show = compile(input, 2).unwrap();
        assert_eq!(
            show.plan,
            SlidePlan::from(vec![
                vec![
                    Event::GotoSlide(1),
                    speak("fr", "Bonjour "),
                    Event::Pause(2.0)
                ],
                vec![Event::GotoSlide(2), Event::PlayMusic("tune.mp3".into())],
            ])
        );
    }

    #[test]
    fn test_plan_narration_accumulates() {
        let show = compile("[slide:1]\nHello\nworld\n\n", 1).unwrap();
        assert_eq!(
            show.plan.bucket(0).unwrap(),
            &[Event::GotoSlide(1), speak("en", "Hello world ")]
        );
    }

    #[test]
    fn test_plan_keys_match_slide_count() {
        let show = compile("[slide:3]\n[slide:1]\n[slide:3]\n[slide:2]\n", 3).unwrap();
        assert_eq!(show.summary.slides, 4);
        assert_eq!(show.plan.len(), 4);
        let indices: Vec<usize> = show.plan.iter().map(|(i, _)| i).collect();
        assert_eq!(indices, vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_plan_commands_terminate_narration() {
        let input = "[slide:1]\nfirst\n[pause:1]\nsecond\n[music:tune.mp3]\nthird\n[language:German]\nvierte\n[slide:2]\n";
        let show = compile(input, 2).unwrap();
        assert_eq!(
            show.plan.bucket(0).unwrap(),
            &[
                Event::GotoSlide(1),
                speak("en", "first "),
                Event::Pause(1.0),
                speak("en", "second "),
                Event::PlayMusic("tune.mp3".into()),
                speak("en", "third "),
                speak("de", "vierte "),
            ]
        );
        assert_eq!(show.plan.bucket(1).unwrap(), &[Event::GotoSlide(2)]);
    }

    #[test]
    fn test_plan_language_persists_across_slides() {
        let input = "[slide:1]\n[language:Italian]\nCiao\n\n[slide:2]\nAncora\n\n";
        let show = compile(input, 2).unwrap();
        assert_eq!(
            show.plan.bucket(1).unwrap(),
            &[Event::GotoSlide(2), speak("it", "Ancora ")]
        );
    }

    #[test]
    fn test_plan_comments_and_unknown_commands_do_not_terminate() {
        let input = "[slide:1]\none\n# aside\n[volume:3]\n[slide_show_file: deck.key]\ntwo\n\n";
        let show = compile(input, 1).unwrap();
        assert_eq!(
            show.plan.bucket(0).unwrap(),
            &[Event::GotoSlide(1), speak("en", "one two ")]
        );
    }

    #[test]
    fn test_plan_extra_blank_lines_are_noops() {
        let show = compile("[slide:1]\n\n\nHi\n\n\n\n", 1).unwrap();
        assert_eq!(show.plan.bucket(0).unwrap().len(), 2);
    }

    #[test]
    fn test_plan_flushes_trailing_narration() {
        let show = compile("[slide:1]\nGoodbye", 1).unwrap();
        assert_eq!(
            show.plan.bucket(0).unwrap(),
            &[Event::GotoSlide(1), speak("en", "Goodbye ")]
        );
    }

    #[test]
    fn test_plan_pause_value_roundtrip() {
        let show = compile("[slide:1]\n[pause:0.75]\n[pause:10]\n", 1).unwrap();
        assert_eq!(
            show.plan.bucket(0).unwrap(),
            &[Event::GotoSlide(1), Event::Pause(0.75), Event::Pause(10.0)]
        );
    }

    #[test]
    fn test_plan_uses_configured_default_language() {
        let dir = tempfile::tempdir().unwrap();
        let config = ShowConfig {
            default_language: "pt".into(),
            ..ShowConfig::default()
        };
        let ctx = ValidationContext {
            slide_count: 1,
            base_dir: dir.path(),
        };
        let script = parse_script("talk.txt", "[slide:1]\nOlá\n\n");
        let show = compile_plan(&script, &ctx, &config).unwrap();
        assert_eq!(show.plan.bucket(0).unwrap()[1], speak("pt", "Olá "));
    }

    #[test]
    fn test_plan_unknown_language_builds_nothing() {
        let err = compile("[slide:1]\n[language:Klingon]\nnuqneH\n\n", 1).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Reference);
    }

    #[test]
    fn test_plan_empty_script() {
        let show = compile("", 3).unwrap();
        assert!(show.plan.is_empty());
        assert_eq!(show.summary, ScriptSummary::default());
    }

    #[test]
    fn test_event_display() {
        assert_eq!(Event::GotoSlide(3).to_string(), "[SLIDE 3]");
        assert_eq!(Event::Pause(1.5).to_string(), "[PAUSE 1.5s]");
        assert_eq!(
            Event::PlayMusic("tune.mp3".into()).to_string(),
            "[MUSIC] tune.mp3"
        );
        assert_eq!(speak("fr", "Bonjour ").to_string(), "[SAY fr] Bonjour");
    }

    #[test]
    fn test_plan_serializes_as_bucket_list() {
        let plan = SlidePlan::from(vec![vec![Event::GotoSlide(1), speak("en", "Hi ")]]);
        let json = serde_json::to_string(&plan).unwrap();
        assert_eq!(json, r#"[[{"GotoSlide":1},{"Speak":["en","Hi "]}]]"#);
    }
}
