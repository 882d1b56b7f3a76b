//! Tracing subscriber setup.
//!
//! Filter priority, highest first:
//!
//! 1. `PLANT_MONITOR_LOG` env var (directives, e.g. `plant_monitor=debug,warn`)
//! 2. `RUST_LOG`
//! 3. `logging.level` from `monitor.toml`
//! 4. `info`

use tracing_subscriber::fmt;
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

pub const LOG_ENV: &str = "PLANT_MONITOR_LOG";

/// Install the global subscriber, writing compact logs to stderr.
///
/// Returns an error if a subscriber is already installed.
pub fn init_subscriber(config_level: &str) -> anyhow::Result<()> {
    let project = std::env::var(LOG_ENV).ok();
    let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    let filter = build_env_filter(project.as_deref(), rust_log.as_deref(), config_level);
    let use_ansi = std::io::IsTerminal::is_terminal(&std::io::stderr());

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(use_ansi)
        .with_target(false)
        .without_time()
        .compact();

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init()?;
    Ok(())
}

/// First parseable, non-empty source wins; unparseable values fall through
/// rather than failing startup.
fn build_env_filter(
    project: Option<&str>,
    rust_log: Option<&str>,
    config_level: &str,
) -> EnvFilter {
    [project, rust_log, Some(config_level)]
        .into_iter()
        .flatten()
        .filter(|directives| !directives.trim().is_empty())
        .find_map(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new("info"))
}
