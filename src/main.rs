//! Sky Hop headless runner
//!
//! Plays one autopiloted session at a fixed frame rate and logs the
//! terminal summary. Useful for balance checks and determinism runs.

use std::{fs, path::PathBuf};

use anyhow::{Context, Result};
use clap::Parser;

use sky_hop::sim::autopilot::Autopilot;
use sky_hop::sim::{GameEvent, GamePhase, GameState};
use sky_hop::{RecordingMeter, RenderSnapshot, SimulationClock, Tuning};

#[derive(Parser, Debug)]
#[command(about = "Run an autopiloted Sky Hop session without rendering", version)]
struct Args {
    /// Run seed
    #[arg(long, default_value_t = 42)]
    seed: u64,
    /// Optional tuning JSON overriding the defaults
    #[arg(long)]
    tuning: Option<PathBuf>,
    /// Display refresh rate to simulate
    #[arg(long, default_value_t = 60.0)]
    fps: f64,
    /// Stop after this many seconds of simulated time
    #[arg(long, default_value_t = 300.0)]
    max_secs: f64,
    /// Print the final render snapshot as JSON
    #[arg(long)]
    snapshot: bool,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();
    anyhow::ensure!(args.fps > 0.0, "--fps must be positive");

    let tuning = match &args.tuning {
        Some(path) => {
            let json = fs::read_to_string(path)
                .with_context(|| format!("reading tuning file {}", path.display()))?;
            Tuning::from_json(&json)?
        }
        None => Tuning::default(),
    };

    log::info!("Sky Hop (headless) starting with seed {}", args.seed);
    let mut clock = SimulationClock::new(GameState::with_tuning(args.seed, tuning));
    clock.state_mut().finish_loading()?;

    let mut meter = RecordingMeter::default();
    let mut pilot = Autopilot::new();
    let frame = 1.0 / args.fps;
    let mut now = 0.0;

    while now < args.max_secs {
        let input = pilot.steer(clock.state());
        clock.frame(now, &input);
        for event in clock.pump(&mut meter) {
            match event {
                GameEvent::LevelUp { level } => log::debug!("Level {}", level),
                GameEvent::EnemyKilled { points, .. } => log::debug!("Enemy down (+{})", points),
                _ => {}
            }
        }
        if clock.state().phase == GamePhase::GameOver {
            break;
        }
        now += frame;
    }

    let state = clock.state();
    log::info!(
        "Finished after {} frames: phase {:?}, score {}, jumps {}, level {}",
        clock.frames(),
        state.phase,
        state.score(),
        state.total_jumps(),
        state.level()
    );
    if let Some(summary) = meter.summaries.last() {
        println!("{}", serde_json::to_string_pretty(summary)?);
    }
    if args.snapshot {
        println!("{}", serde_json::to_string_pretty(&RenderSnapshot::capture(state))?);
    }
    Ok(())
}
