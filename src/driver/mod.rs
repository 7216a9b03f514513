pub mod keynote;
pub mod player;

use std::io::{BufRead, Write};
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result};
use log::{error, info};

use crate::config::ShowConfig;
use crate::parser::types::Script;
use crate::planner::{Event, SlidePlan, compile_plan};
use crate::validate::ValidationContext;
use player::{AudioPlayer, audio_source_uri, tts_uri};

pub const SOUND_CHECK_PHRASE: &str = "Audio level check.";

/// An open slide deck. Slide indices at this boundary are 0-based.
pub trait PresentationSession {
    fn slide_count(&self) -> Result<usize>;
    fn goto_slide(&mut self, index: usize) -> Result<()>;
    fn start(&mut self) -> Result<()>;
    fn is_running(&self) -> Result<bool>;
    fn dispose(&mut self) -> Result<()>;
}

pub struct Driver<'a> {
    config: &'a ShowConfig,
    session: &'a mut dyn PresentationSession,
    player: &'a mut dyn AudioPlayer,
}

impl<'a> Driver<'a> {
    pub fn new(
        config: &'a ShowConfig,
        session: &'a mut dyn PresentationSession,
        player: &'a mut dyn AudioPlayer,
    ) -> Self {
        Self {
            config,
            session,
            player,
        }
    }

    pub fn start_show(&mut self) -> Result<()> {
        self.session.start()?;
        thread::sleep(self.config.start_delay);
        info!("Slide show is running: {}", self.session.is_running()?);
        Ok(())
    }

    /// Dispatch every event from bucket `start` to the end, in order.
    ///
    /// The first failing event ends the run; nothing is retried.
    pub fn run(&mut self, plan: &SlidePlan, start: usize) -> Result<()> {
        check_start(plan, start)?;

        for (index, events) in plan.iter().skip(start) {
            for event in events {
                info!("[{index}] {event}");
                self.dispatch(event)
                    .with_context(|| format!("Slide index {index}: {event}"))?;
            }
        }
        Ok(())
    }

    fn dispatch(&mut self, event: &Event) -> Result<()> {
        match event {
            Event::GotoSlide(n) => {
                let index = n
                    .checked_sub(1)
                    .context("Slide numbers start at 1")?;
                self.session.goto_slide(index)
            }
            Event::Pause(seconds) => {
                thread::sleep(Duration::try_from_secs_f64(*seconds)?);
                Ok(())
            }
            Event::PlayMusic(path) => {
                let uri = audio_source_uri(path, &self.config.base_dir)?;
                self.play(&uri)
            }
            Event::Speak(code, text) => {
                let uri = tts_uri(code, text)?;
                self.play(&uri)
            }
        }
    }

    fn play(&mut self, uri: &str) -> Result<()> {
        if let Err(e) = self.player.play_blocking(uri) {
            error!("{e}");
            return Err(e.into());
        }
        Ok(())
    }
}

/// Validate `script` against the open deck and play it from bucket `start`.
///
/// `before_start` runs once the plan is known to be good and before the slide
/// show starts. The session is disposed on every exit path.
pub fn run_show<S, F>(
    session: &mut S,
    player: &mut dyn AudioPlayer,
    config: &ShowConfig,
    script: &Script,
    start: usize,
    before_start: F,
) -> Result<()>
where
    S: PresentationSession,
    F: FnOnce(&mut dyn AudioPlayer) -> Result<()>,
{
    let result = present(session, player, config, script, start, before_start);
    let disposed = session.dispose();
    result?;
    disposed
}

fn present<S, F>(
    session: &mut S,
    player: &mut dyn AudioPlayer,
    config: &ShowConfig,
    script: &Script,
    start: usize,
    before_start: F,
) -> Result<()>
where
    S: PresentationSession,
    F: FnOnce(&mut dyn AudioPlayer) -> Result<()>,
{
    let slide_count = session.slide_count()?;
    info!("Total slides in deck: {slide_count}");

    let ctx = ValidationContext {
        slide_count,
        base_dir: &config.base_dir,
    };
    let show = compile_plan(script, &ctx, config)?;
    check_start(&show.plan, start)?;
    before_start(&mut *player)?;

    let mut driver = Driver::new(config, &mut *session, player);
    driver.start_show()?;
    driver.run(&show.plan, start)
}

/// A non-empty plan must contain the bucket playback resumes from.
pub fn check_start(plan: &SlidePlan, start: usize) -> Result<()> {
    if !plan.is_empty() && start >= plan.len() {
        anyhow::bail!(
            "Starting index {start} is past the last slide index {}",
            plan.len() - 1
        );
    }
    Ok(())
}

/// Speak a test phrase until the operator confirms the level.
///
/// An empty answer, end of input, or one starting with `y`, `1` or `t` confirms.
pub fn sound_check<R: BufRead, W: Write>(
    player: &mut dyn AudioPlayer,
    mut input: R,
    mut output: W,
) -> Result<()> {
    let uri = tts_uri("en", SOUND_CHECK_PHRASE)?;
    loop {
        writeln!(output, "Audio level check...")?;
        player.play_blocking(&uri)?;
        write!(output, "Audio level OK? [Yes] ")?;
        output.flush()?;

        let mut answer = String::new();
        if input.read_line(&mut answer)? == 0 {
            return Ok(());
        }
        let confirmed = match answer.trim().chars().next() {
            None => true,
            Some(c) => matches!(c.to_ascii_lowercase(), 'y' | '1' | 't'),
        };
        if confirmed {
            return Ok(());
        }
    }
}
