//! ==============================================================================
//! main.rs - plant monitor entry point
//! ==============================================================================
//!
//! purpose:
//!     runs the simulated plant-health monitor in a terminal.
//!
//! responsibilities:
//!     - load monitor.toml (or defaults) and set up logging
//!     - build the monitor with a seeded or entropy-backed random walk
//!     - start the tick loop (2s cycle by default) and print the dashboard
//!     - read console commands to accept/dismiss recommendations
//!     - stop the ticker on `quit`, end of input or ctrl-c
//!
//! architecture:
//!
//!     ┌────────────────────────────────────────────────────┐
//!     │                 main (this file)                   │
//!     │  ┌─────────────┐              ┌─────────────────┐  │
//!     │  │ ticker task │              │ console loop    │  │
//!     │  │ (2s cycle)  │              │ (stdin thread)  │  │
//!     │  └──────┬──────┘              └────────┬────────┘  │
//!     │         └──────────────┬───────────────┘           │
//!     │                  ┌─────┴─────┐                     │
//!     │                  │  monitor  │ <- runtime.rs       │
//!     │                  └───────────┘                     │
//!     └────────────────────────────────────────────────────┘
//!
//! ==============================================================================

use anyhow::Result;
use plant_monitor::config::MonitorConfig;
use plant_monitor::view::{self, Command};
use plant_monitor::{logging, Monitor, MonitorHandle, RandomSteps, SensorSimulator};
use std::io::BufReader;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    println!("===========================================================");
    println!("  Plant Health Monitor");
    println!("  simulated telemetry, rolling history, advisories");
    println!("===========================================================");

    // step 1: load configuration
    let config = MonitorConfig::load_or_default();
    config.print_summary();

    // step 2: logging
    logging::init_subscriber(&config.logging.level)?;

    // step 3: build the monitor
    let simulator = SensorSimulator::new(RandomSteps::new(config.simulation.seed));
    let handle = MonitorHandle::new(Monitor::new(simulator, config.history.capacity));

    // step 4: start ticking
    let show_data = config.logging.show_sensor_data;
    let ticker = handle.start_ticker(config.tick_interval(), move |_, snapshot| {
        if show_data {
            print!("{}", view::render_dashboard(snapshot));
        }
    });
    info!(
        interval_s = config.polling.interval_seconds,
        capacity = config.history.capacity,
        "monitor started"
    );
    println!("{}", view::HELP);

    // step 5: console loop until quit / eof / ctrl-c
    // stdin is read off-runtime so ctrl-c never waits on a pending read
    let mut lines = view::spawn_line_reader(BufReader::new(std::io::stdin()))?;
    loop {
        let line = tokio::select! {
            line = lines.recv() => line.transpose()?,
            _ = tokio::signal::ctrl_c() => None,
        };
        let Some(line) = line else { break };
        if line.trim().is_empty() {
            continue;
        }

        match line.parse::<Command>() {
            Ok(Command::Accept(index)) => answer(&handle, index, true).await,
            Ok(Command::Dismiss(index)) => answer(&handle, index, false).await,
            Ok(Command::Json) => {
                let snapshot = handle.snapshot().await;
                println!("{}", serde_json::to_string_pretty(&snapshot)?);
            }
            Ok(Command::History) => {
                print!("{}", view::render_history(&handle.history().await));
            }
            Ok(Command::Help) => println!("{}", view::HELP),
            Ok(Command::Quit) => break,
            Err(e) => {
                warn!(error = %e, "bad command");
                println!("{} ({})", e, view::HELP);
            }
        }
    }

    // teardown: stopping the ticker is all there is
    ticker.stop();
    info!("monitor stopped");
    Ok(())
}

/// resolve a recommendation typed by the user
///
/// the index may be stale if the list changed since it was printed.
async fn answer(handle: &MonitorHandle<RandomSteps>, index: usize, accepted: bool) {
    match handle.resolve(index, accepted).await {
        Some(resolution) => println!("{}", view::render_resolution(&resolution)),
        None => println!("no recommendation #{}", index + 1),
    }
}
