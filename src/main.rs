//! Zabayan entry point
//!
//! Runs a headless match at a fixed 60 Hz frame rate and reports the winner.
//! A graphical front-end drives `zabayan::sim::Match` the same way: one
//! `tick` per animation frame, then a read of the state for drawing.

use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result, bail};
use clap::Parser;

use zabayan::Tuning;
use zabayan::sim::{Avatar, FrameSnapshot, HudThrottle, Match, MatchState, TickInput};

/// Frame time of the conceptual display refresh
const FRAME_DT: f32 = 1.0 / 60.0;

#[derive(Parser, Debug)]
#[command(author, version, about = "Headless Zabayan match runner", long_about = None)]
struct Args {
    /// RNG seed (defaults to the current time)
    #[arg(long)]
    seed: Option<u64>,
    /// Human avatar: birdy or blackman
    #[arg(long, default_value = "birdy")]
    avatar: String,
    /// JSON tuning file
    #[arg(long)]
    tuning: Option<PathBuf>,
    /// Write the default tuning to this path and exit
    #[arg(long)]
    write_tuning: Option<PathBuf>,
    /// Give up after this many frames
    #[arg(long, default_value_t = 216_000)]
    max_ticks: u64,
    /// Let the AI play the human side instead of the scripted pointer
    #[arg(long)]
    idle: bool,
    /// Print the final frame as JSON
    #[arg(long)]
    dump_json: bool,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    if let Some(path) = &args.write_tuning {
        Tuning::default()
            .save(path)
            .with_context(|| format!("writing tuning to {}", path.display()))?;
        return Ok(());
    }

    let Some(avatar) = Avatar::from_str(&args.avatar) else {
        bail!("unknown avatar '{}', expected birdy or blackman", args.avatar);
    };

    let tuning = match &args.tuning {
        Some(path) => Tuning::load(path).with_context(|| format!("loading tuning from {}", path.display()))?,
        None => Tuning::default(),
    };

    let seed = args.seed.unwrap_or_else(|| {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(0)
    });

    log::info!("Zabayan (headless) starting...");
    let mut game = Match::with_tuning(avatar, seed, tuning);
    game.on_game_over(|winner| println!("Game over: {winner} wins"));

    let mut hud = HudThrottle::new(game.tuning().hud_interval_secs);
    let max_hp = game.tuning().max_hp;

    while game.is_running() && game.state().time_ticks < args.max_ticks {
        let input = scripted_input(game.state(), args.idle);
        game.tick(&input, FRAME_DT);

        if let Some(state) = hud.poll(game.state(), max_hp) {
            log::debug!(
                "HUD  you {}/{} score {}  |  cpu {}/{} score {}",
                state.player_hp,
                state.max_hp,
                state.player_score,
                state.cpu_hp,
                state.max_hp,
                state.cpu_score
            );
        }
    }

    if game.is_running() {
        log::warn!("No winner after {} frames", args.max_ticks);
        game.abandon();
    }

    let state = game.state();
    println!(
        "seed {}  ticks {}  hp {}-{}  score {}-{}",
        game.seed(),
        state.time_ticks,
        state.player.hp,
        state.cpu.hp,
        state.player.score,
        state.cpu.score
    );

    if args.dump_json {
        let json = FrameSnapshot::capture(state)
            .to_json()
            .context("serializing final frame")?;
        println!("{json}");
    }

    Ok(())
}

/// Stand-in for the pointer: follow the first ball and click every frame
fn scripted_input(state: &MatchState, idle: bool) -> TickInput {
    if idle {
        return TickInput {
            idle_mode: true,
            ..Default::default()
        };
    }
    let pointer_x = state.player.balls.iter().find(|b| b.active).map(|b| b.pos.x);
    TickInput {
        pointer_x,
        launch: true,
        idle_mode: false,
    }
}
