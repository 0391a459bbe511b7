//! Nova Shooter headless runner
//!
//! Drives a session with the autopilot at a fixed display rate and prints
//! the final snapshot as JSON. Useful for soak runs and seed reproduction.

#[cfg(not(target_arch = "wasm32"))]
use std::path::PathBuf;
#[cfg(not(target_arch = "wasm32"))]
use std::time::{Duration, Instant};

#[cfg(not(target_arch = "wasm32"))]
use anyhow::{Context, Result};
#[cfg(not(target_arch = "wasm32"))]
use clap::Parser;

#[cfg(not(target_arch = "wasm32"))]
use nova_shooter::autopilot::Autopilot;
#[cfg(not(target_arch = "wasm32"))]
use nova_shooter::sim::{GameEvent, GamePhase};
#[cfg(not(target_arch = "wasm32"))]
use nova_shooter::{GameConfig, Session, Timestep};

#[cfg(not(target_arch = "wasm32"))]
#[derive(Parser, Debug)]
#[command(name = "nova-shooter")]
#[command(about = "Run the shooter simulation headless under the autopilot")]
struct Args {
    /// RNG seed; overrides the config file
    #[arg(long)]
    seed: Option<u64>,
    /// Wall-clock seconds of play to simulate
    #[arg(long, default_value_t = 60.0)]
    seconds: f64,
    /// JSON config file
    #[arg(long)]
    config: Option<PathBuf>,
    /// `fixed` or `per_frame`; overrides the config file
    #[arg(long)]
    timestep: Option<Timestep>,
    /// Simulated display refresh rate
    #[arg(long, default_value_t = 60)]
    fps: u32,
    /// Pace frames against the wall clock instead of running flat out
    #[arg(long)]
    realtime: bool,
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => GameConfig::load(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => GameConfig::default(),
    };
    if args.seed.is_some() {
        config.seed = args.seed;
    }
    if let Some(timestep) = args.timestep {
        config.timestep = timestep;
    }
    anyhow::ensure!(args.fps > 0, "--fps must be positive");

    log::info!(
        "Nova Shooter (headless) starting: {}s at {} fps, {} timestep",
        args.seconds,
        args.fps,
        config.timestep.as_str()
    );

    let frame = Duration::from_secs_f64(1.0 / f64::from(args.fps));
    let frames = (args.seconds * f64::from(args.fps)).max(0.0) as u64;

    let mut session = Session::new(config).context("invalid configuration")?;
    let mut pilot = Autopilot::new();
    session.start_game();

    let started = Instant::now();
    let mut steps = 0u64;
    for n in 0..frames {
        let input = pilot.decide(&session.snapshot());
        steps += u64::from(session.advance(frame, &input));

        for event in session.last_events() {
            log_event(event);
        }
        if session.lifecycle() == GamePhase::GameOver {
            log::info!("Game over after {} frames", n + 1);
            break;
        }

        if args.realtime {
            let due = frame * (n as u32 + 1);
            if let Some(wait) = due.checked_sub(started.elapsed()) {
                std::thread::sleep(wait);
            }
        }
    }

    let snapshot = session.snapshot();
    log::info!(
        "Finished: {} steps, score {}, level {}, lives {}",
        steps,
        snapshot.scoreboard.score,
        snapshot.scoreboard.level,
        snapshot.scoreboard.lives
    );
    println!("{}", snapshot.to_json().context("serializing snapshot")?);
    Ok(())
}

#[cfg(not(target_arch = "wasm32"))]
fn log_event(event: &GameEvent) {
    match event {
        GameEvent::HostileDestroyed { .. } | GameEvent::PowerupDropped { .. } => {
            log::debug!("{:?}", event)
        }
        _ => log::info!("{:?}", event),
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // Browser hosts embed the library directly
}
