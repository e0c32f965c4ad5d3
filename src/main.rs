/// Entry point: arguments, logging, and the two run modes.
///
///   --generate   decode the packed archive into text level files, then exit
///   (default)    play the selected game's text levels in the terminal

mod codec;
mod config;
mod domain;
mod sim;
mod ui;

use std::fs::File;
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use config::GameConfig;
use sim::event::GameEvent;
use sim::level::load_level;
use sim::step;
use sim::world::{GameState, LevelSource, LAST_LEVEL};
use ui::input::{Input, InputState};
use ui::renderer::Renderer;
use ui::sound::SoundEngine;

const FRAME_SLEEP: Duration = Duration::from_millis(5);

#[derive(Parser, Debug)]
#[command(name = "punyprince", version, about)]
struct Args {
    /// Decode every archive record into text level files, then exit.
    #[arg(short, long)]
    generate: bool,

    /// Level to start on.
    #[arg(short, long, value_parser = clap::value_parser!(u8).range(1..=LAST_LEVEL as i64))]
    level: Option<u8>,

    /// Enable the cheat keys (Shift-L, Shift-T, Shift-W, k).
    #[arg(short, long)]
    cheat: bool,

    /// Play without sound.
    #[arg(short, long)]
    noaudio: bool,

    /// Game directory (under the games dir) to play or generate into.
    #[arg(long)]
    game: Option<String>,

    /// Packed level archive read by --generate.
    #[arg(long)]
    archive: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let mut config = GameConfig::load();
    apply_args(&mut config, &args);

    if args.generate {
        init_logging(None)?;
        return generate(&config);
    }

    init_logging(Some(&config.general.log_file))?;
    play(&config, args.noaudio)
}

fn apply_args(config: &mut GameConfig, args: &Args) {
    let general = &mut config.general;
    if let Some(level) = args.level {
        general.start_level = level;
    }
    if let Some(game) = &args.game {
        general.game = game.clone();
    }
    if let Some(archive) = &args.archive {
        general.archive = archive.clone();
    }
    general.cheats |= args.cheat;
}

/// `RUST_LOG` filters, defaulting to `info`. Play mode writes to a file so
/// log lines do not land in the raw-mode screen.
fn init_logging(log_file: Option<&PathBuf>) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    match log_file {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("cannot create log file {}", path.display()))?;
            builder.with_ansi(false).with_writer(Mutex::new(file)).init();
        }
        None => builder.with_writer(std::io::stderr).init(),
    }
    Ok(())
}

// ── Generate mode ──

fn generate(config: &GameConfig) -> Result<()> {
    let archive_path = &config.general.archive;
    let archive = std::fs::read(archive_path)
        .with_context(|| format!("cannot read archive {}", archive_path.display()))?;
    let dir = config.general.game_dir();
    let out = codec::generate::generate_game(&archive, &dir)
        .with_context(|| format!("cannot write levels to {}", dir.display()))?;
    if out.written.is_empty() {
        bail!("no level could be decoded from {}", archive_path.display());
    }
    eprintln!(
        "Wrote {} levels to {} ({} skipped, {} warnings).",
        out.written.len(),
        dir.display(),
        out.failed.len(),
        out.warnings,
    );
    Ok(())
}

// ── Play mode ──

fn play(config: &GameConfig, noaudio: bool) -> Result<()> {
    let general = &config.general;
    let source = LevelSource::Dir(general.game_dir());
    let mut state = GameState::new(source, config.speed.clone(), general.cheats, general.start_lives);
    let start = general.start_level.clamp(1, LAST_LEVEL);
    info!(game = %general.game_dir().display(), level = start, cheats = general.cheats, "starting");
    load_level(&mut state, start, general.start_lives);

    let sound = if noaudio { None } else { SoundEngine::new() };
    if sound.is_none() && !noaudio {
        warn!("no audio output, playing silently");
    }

    let mut renderer = Renderer::new();
    renderer.init().context("terminal init failed")?;
    let result = game_loop(&mut state, &mut renderer, sound.as_ref());
    if let Err(e) = renderer.cleanup() {
        error!("terminal cleanup failed: {e}");
    }
    result?;

    println!("Thanks for playing Puny Prince! Steps taken: {}", state.player.steps);
    Ok(())
}

fn game_loop(state: &mut GameState, renderer: &mut Renderer, sound: Option<&SoundEngine>) -> Result<()> {
    let mut input = InputState::new();
    let tick_rate = Duration::from_millis(state.speed.tick_rate_ms);
    let mut last_tick = Instant::now();

    loop {
        for key in input.drain_events() {
            match key {
                Input::Quit => return Ok(()),
                Input::Command(cmd) => {
                    let events = step::command(state, cmd);
                    dispatch(sound, &events);
                }
            }
        }

        if last_tick.elapsed() >= tick_rate {
            let events = step::tick(state);
            dispatch(sound, &events);
            last_tick = Instant::now();
        }

        renderer.render(state, input.stride()).context("render failed")?;
        std::thread::sleep(FRAME_SLEEP);
    }
}

fn dispatch(sound: Option<&SoundEngine>, events: &[GameEvent]) {
    for event in events {
        match event {
            GameEvent::Cue(cue) => {
                if let Some(sfx) = sound {
                    sfx.play(*cue);
                }
            }
            GameEvent::CampaignComplete { steps } => info!(steps, "campaign complete"),
            GameEvent::Notice(_) | GameEvent::PlayerDied | GameEvent::LevelEntered { .. } => {}
        }
    }
}
