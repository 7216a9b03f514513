use std::io;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use log::info;

use talk_presenter::config::{PlayerKind, ShowConfig};
use talk_presenter::driver::keynote::KeynoteSession;
use talk_presenter::driver::player::ProcessPlayer;
use talk_presenter::driver::{PresentationSession, check_start, run_show, sound_check};
use talk_presenter::parser::languages;
use talk_presenter::parser::show_file::{ShowFile, locate_show_file};
use talk_presenter::parser::types::Script;
use talk_presenter::parser::read_script;
use talk_presenter::planner::{CompiledShow, compile_plan};
use talk_presenter::validate::ValidationContext;

#[derive(Parser)]
#[command(
    name = "talk-presenter",
    version,
    about = "Narrated slide show runner"
)]
struct Cli {
    /// Slide-display-index to start from, to resume a show partway through
    #[arg(default_value_t = 0)]
    start: usize,
    /// Control script path
    #[arg(long, default_value = "presentation.txt")]
    script: PathBuf,
    /// Narration language until the script sets one (name or code)
    #[arg(long, default_value = "English")]
    language: String,
    /// Command-line audio player
    #[arg(long, value_enum, default_value_t = PlayerKind::Mplayer)]
    player: PlayerKind,
    /// Validate against this many slides instead of opening the deck
    #[arg(long)]
    slides: Option<usize>,
    /// Validate the script and print a summary
    #[arg(long)]
    check: bool,
    /// Print the plan without playing anything
    #[arg(long, conflicts_with = "check")]
    dry_run: bool,
    /// Print the dry-run plan as JSON
    #[arg(long, requires = "dry_run")]
    json: bool,
    /// Speak a test phrase before the show until the level is confirmed
    #[arg(long)]
    sound_check: bool,
    /// Seconds the slide show gets to come up after starting
    #[arg(long, default_value_t = 3.0)]
    start_delay: f64,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let default_language = languages::resolve(&cli.language)
        .with_context(|| format!("Unknown default language '{}'", cli.language))?;
    let config = ShowConfig {
        default_language: default_language.to_string(),
        player: cli.player,
        base_dir: std::env::current_dir()?,
        start_delay: Duration::try_from_secs_f64(cli.start_delay)
            .context("--start-delay must be a non-negative number of seconds")?,
    };

    let script = read_script(&cli.script)?;
    let show_file = locate_show_file(&script, &config.base_dir)?;
    info!("Presentation: {}", show_file.path.display());
    info!("Default language code: {}", config.default_language);

    if cli.check || cli.dry_run {
        let slide_count = match cli.slides {
            Some(n) => n,
            None => count_slides(&show_file)?,
        };
        let show = compile(&script, &config, slide_count)?;
        check_start(&show.plan, cli.start)?;
        if cli.check {
            print_summary(&cli, &show);
        } else if cli.json {
            println!("{}", serde_json::to_string_pretty(&show.plan)?);
        } else {
            print_plan(&cli, &show);
        }
        return Ok(());
    }

    if cli.slides.is_some() {
        anyhow::bail!("--slides can only be used with --check or --dry-run");
    }

    let mut session = KeynoteSession::open(&show_file.path)?;
    let mut player = ProcessPlayer::new(config.player);
    run_show(
        &mut session,
        &mut player,
        &config,
        &script,
        cli.start,
        |audio| {
            if cli.sound_check {
                sound_check(audio, io::stdin().lock(), io::stdout())?;
            }
            Ok(())
        },
    )?;
    info!("Slide show finished: {}", session.path().display());
    Ok(())
}

fn compile(script: &Script, config: &ShowConfig, slide_count: usize) -> Result<CompiledShow> {
    let ctx = ValidationContext {
        slide_count,
        base_dir: &config.base_dir,
    };
    Ok(compile_plan(script, &ctx, config)?)
}

fn count_slides(show_file: &ShowFile) -> Result<usize> {
    let mut session = KeynoteSession::open(&show_file.path)?;
    let count = session.slide_count();
    session.dispose()?;
    count
}

fn print_summary(cli: &Cli, show: &CompiledShow) {
    let summary = &show.summary;
    println!(
        "Script '{}' is valid: {} slides displayed, {} music files, {} pauses, {} language commands",
        cli.script.display(),
        summary.slides,
        summary.music,
        summary.pauses,
        summary.languages
    );
}

fn print_plan(cli: &Cli, show: &CompiledShow) {
    println!("=== Dry Run: {} ===\n", cli.script.display());
    for (index, events) in show.plan.iter().skip(cli.start) {
        println!("--- Slide index {index} ---");
        for event in events {
            println!("  {event}");
        }
        println!();
    }
}
