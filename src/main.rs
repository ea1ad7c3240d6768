//! Status matrix demo
//!
//! Drives the status matrix core against a terminal surface: the 8x8 grid is
//! redrawn on stdout every frame while logs go to stderr. An alarm can be
//! scripted to take over the display and later hand it back, the way the
//! home-automation alarm subsystem does on the real node.
//!
//! ## Architecture
//! - **Render thread** (spawned by `StatusMatrix::run`): animates the grid
//! - **Main thread**: plays the alarm script, logs status, waits for Ctrl+C
//!
//! ## Usage
//! ```sh
//! ./target/release/status-matrix-rs --alarm fire --alarm-at 20 --release-at 35
//! RUST_LOG=debug ./target/release/status-matrix-rs --plain --mode prime
//! ```

use clap::Parser;
use status_matrix_rs::{Mode, StatusMatrix, TerminalSurface, is_running, setup_signal_handler};
use std::thread;
use std::time::{Duration, Instant};
use tracing_subscriber::EnvFilter;

/// Status matrix demo
#[derive(Parser)]
#[command(name = "status-matrix-rs")]
#[command(about = "Animate the 8x8 status matrix in the terminal")]
#[command(version)]
struct Args {
    /// Mode to start in: fibonacci, prime, wopr, idle, fire, panic (or 0-5)
    #[arg(long, default_value = "fibonacci")]
    mode: Mode,

    /// Mode the simulated alarm forces onto the display (usually fire or panic)
    #[arg(long)]
    alarm: Option<Mode>,

    /// Seconds after start-up at which the alarm is raised
    #[arg(long, default_value = "10")]
    alarm_at: u64,

    /// Seconds after start-up at which the alarm releases the display back
    /// to the fibonacci rotation
    #[arg(long)]
    release_at: Option<u64>,

    /// Print pixels as letters instead of ANSI colors
    #[arg(long)]
    plain: bool,

    /// Seconds between status log lines (0 disables them)
    #[arg(long, default_value = "30")]
    status_interval: u64,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // stdout belongs to the matrix, so logs go to stderr.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_ansi(false)
        .compact()
        .init();

    let args = Args::parse();

    tracing::info!("Status matrix demo v{}", env!("CARGO_PKG_VERSION"));
    if let Some(alarm) = args.alarm {
        tracing::info!("Alarm script: {} at {}s", alarm, args.alarm_at);
        if !alarm.is_locked() {
            tracing::warn!("Alarm mode {} is not an alert mode; rotation may replace it", alarm);
        }
    }

    let running = setup_signal_handler()?;

    let surface = TerminalSurface::new(std::io::stdout(), !args.plain);
    let matrix = StatusMatrix::new(surface)?;
    matrix.set_mode(args.mode, true);
    let render = matrix.run()?;

    let started = Instant::now();
    let alarm_at = Duration::from_secs(args.alarm_at);
    let status_interval = Duration::from_secs(args.status_interval);
    let mut alarm_raised = false;
    let mut released = false;
    let mut last_status = Instant::now();

    while is_running(&running) && !render.is_finished() {
        let elapsed = started.elapsed();

        if let Some(alarm) = args.alarm {
            if !alarm_raised && elapsed >= alarm_at {
                tracing::warn!("Alarm raised, forcing {} mode", alarm);
                matrix.set_mode(alarm, true);
                alarm_raised = true;
            }
        }

        if let Some(release_at) = args.release_at {
            if alarm_raised && !released && elapsed >= Duration::from_secs(release_at) {
                tracing::info!("Alarm cleared, releasing display");
                matrix.set_mode(Mode::Fibonacci, true);
                released = true;
            }
        }

        if !status_interval.is_zero() && last_status.elapsed() >= status_interval {
            tracing::info!("Status: {}", serde_json::to_string(&matrix.status())?);
            last_status = Instant::now();
        }

        thread::sleep(Duration::from_millis(100));
    }

    if render.is_finished() {
        match render.join() {
            Ok(Ok(())) => {}
            Ok(Err(e)) => return Err(e.into()),
            Err(_) => return Err("render thread panicked".into()),
        }
    }

    println!("\nShutting down cleanly.");
    Ok(())
}
