//! Neon Nexus headless runner
//!
//! Plays sessions with the built-in autopilot and the offline narrator, logging
//! events and commentary. Useful for balance checks and soak runs. The browser
//! build drives `platform::web::WasmSession` from the page instead.

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::path::PathBuf;
    use std::process;
    use std::sync::Arc;
    use std::time::{Duration, Instant};

    use clap::Parser;

    use neon_nexus::consts::TICKS_PER_SECOND;
    use neon_nexus::input::autopilot;
    use neon_nexus::platform::init_logging;
    use neon_nexus::{CannedNarrator, GameSession, SessionState, SimConfig};

    #[derive(Parser)]
    #[command(
        name = "neon-nexus",
        about = "Run the Neon Nexus arena headless with an autopilot",
        version
    )]
    struct Args {
        /// Ticks to simulate (60 per second of game time)
        #[arg(long, default_value = "3600")]
        ticks: u64,

        /// RNG seed (overrides the config file)
        #[arg(long)]
        seed: Option<u64>,

        /// JSON config file; missing fields use the defaults
        #[arg(long)]
        config: Option<PathBuf>,

        /// Print the final render snapshot as JSON
        #[arg(long)]
        snapshot: bool,

        /// Pace ticks at 60 Hz instead of running flat out
        #[arg(long)]
        realtime: bool,

        /// Start a new run after each game over until the tick budget is spent
        #[arg(long)]
        reboot: bool,
    }

    fn load_config(args: &Args) -> Result<SimConfig, Box<dyn std::error::Error>> {
        let mut config = match &args.config {
            Some(path) => SimConfig::from_json(&std::fs::read_to_string(path)?)?,
            None => SimConfig::default(),
        };
        if let Some(seed) = args.seed {
            config = config.with_seed(seed);
        }
        Ok(config)
    }

    fn run(args: Args) -> Result<(), Box<dyn std::error::Error>> {
        let config = load_config(&args)?;
        let mut session = GameSession::new(config, Arc::new(CannedNarrator::new()))?;
        session.start();

        let frame = Duration::from_secs(1) / TICKS_PER_SECOND;
        let mut last_line = session.commentary().to_string();
        let mut runs = 1;
        let started = Instant::now();

        for _ in 0..args.ticks {
            let frame_start = Instant::now();
            let input = autopilot(session.snapshot());
            let (snapshot, state) = session.tick(&input);

            if session.commentary() != last_line {
                last_line = session.commentary().to_string();
                log::info!("[announcer] {}", last_line);
            }

            if state == SessionState::GameOver {
                session.wait_for_commentary(Duration::from_secs(1));
                log::info!(
                    "Run {} over: score {}, wave {}, {} kills; {}",
                    runs,
                    snapshot.score,
                    snapshot.wave,
                    snapshot.enemies_killed,
                    session.commentary()
                );
                if !args.reboot {
                    break;
                }
                runs += 1;
                session.start();
            }

            if args.realtime {
                let elapsed = frame_start.elapsed();
                if elapsed < frame {
                    std::thread::sleep(frame - elapsed);
                }
            }
        }

        session.wait_for_commentary(Duration::from_secs(1));
        let snapshot = session.snapshot();
        if args.snapshot {
            println!("{}", snapshot.to_json()?);
        } else {
            println!(
                "{} after {} ticks ({:.2?}): score {}, high score {}, wave {}, hp {}, {} kills",
                session.phase().as_str(),
                snapshot.tick,
                started.elapsed(),
                snapshot.score,
                session.high_score(),
                snapshot.wave,
                snapshot.hp,
                snapshot.enemies_killed
            );
            println!("announcer: {}", session.commentary());
        }
        Ok(())
    }

    pub fn main() {
        init_logging();
        if let Err(e) = run(Args::parse()) {
            eprintln!("error: {e}");
            process::exit(1);
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    native::main();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // Browser entry point is `platform::web::WasmSession`
}
