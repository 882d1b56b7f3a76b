//! ==============================================================================
//! view.rs - terminal dashboard
//! ==============================================================================
//!
//! purpose:
//!     the view layer. renders a DashboardSnapshot as text panels and parses
//!     the console commands a user types to answer advisories.
//!
//! panels:
//!     - live readings (value + unit, ALERT marker when over the limit)
//!     - alerts ("<LABEL> too high: <value>") or the all-normal banner
//!     - recommendations (pending actions, numbered from 1)
//!     - history (per-metric min/latest/max over the rolling window)
//!
//! commands (one per line on stdin):
//!     y <n> | yes <n>    accept recommendation n
//!     n <n> | no <n>     dismiss recommendation n
//!     json               print the snapshot as json
//!     history            print the history panel
//!     help               list commands
//!     quit               stop the monitor
//!
//! ```text
//!     lines are read on their own "console" thread (spawn_line_reader) and
//!     handed to the async side over a channel.
//! ```
//!
//! relationships:
//!     - used by: main.rs
//!     - reads: runtime.rs (DashboardSnapshot), actions.rs (Resolution)
//!
//! ==============================================================================

use crate::actions::{Outcome, Resolution};
use crate::alerts;
use crate::domain::{Action, Breach, Metric, ReadingSet};
use crate::history::HistoryBuffer;
use crate::runtime::DashboardSnapshot;

use std::fmt::Write;
use std::io::BufRead;
use std::str::FromStr;
use thiserror::Error;
use tokio::sync::mpsc;

pub const HELP: &str = "commands: y <n> accept | n <n> dismiss | json | history | help | quit";

// ==============================================================================
// rendering
// ==============================================================================

/// value to one decimal with its unit, e.g. "26.5°C"
pub fn format_value(metric: Metric, value: f64) -> String {
    format!("{:.1}{}", value, metric.spec().unit)
}

pub fn render_dashboard(snapshot: &DashboardSnapshot) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "──────────── tick {} ────────────", snapshot.ticks);
    out.push_str(&render_readings(&snapshot.readings));
    out.push_str(&render_alerts(&snapshot.breaches));
    out.push_str(&render_actions(&snapshot.actions));
    out
}

pub fn render_readings(readings: &ReadingSet) -> String {
    let mut out = String::from("Live Readings\n");
    for (metric, value) in readings.iter() {
        let marker = if alerts::is_breached(metric, value) { "  ALERT" } else { "" };
        let _ = writeln!(
            out,
            "  {:<18}{:>8}{}",
            metric.spec().label,
            format_value(metric, value),
            marker
        );
    }
    out
}

pub fn render_alerts(breaches: &[Breach]) -> String {
    if breaches.is_empty() {
        return "All Systems Normal: plant is healthy!\n".to_string();
    }
    let mut out = String::from("Alerts\n");
    for breach in breaches {
        let _ = writeln!(
            out,
            "  {} too high: {:.1}",
            breach.metric.spec().label.to_uppercase(),
            breach.value
        );
    }
    out
}

pub fn render_actions(actions: &[Action]) -> String {
    if actions.is_empty() {
        return String::new();
    }
    let mut out = String::from("Recommendations\n");
    for (i, action) in actions.iter().enumerate() {
        let _ = writeln!(
            out,
            "  [{n}] {msg} ({metric})  y {n} / n {n}",
            n = i + 1,
            msg = action.message,
            metric = action.metric
        );
    }
    out
}

pub fn render_history(history: &HistoryBuffer) -> String {
    if history.len() < 2 {
        return "Collecting data... Wait a few seconds\n".to_string();
    }
    let mut out = format!("Sensor Data Over Time ({} points)\n", history.len());
    for metric in Metric::ALL {
        let series = history.series(metric);
        let (min, max) = series
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| (lo.min(v), hi.max(v)));
        let latest = series.last().copied().unwrap_or_default();
        let _ = writeln!(
            out,
            "  {:<18}min {:>8}  now {:>8}  max {:>8}  (limit: {})",
            metric.spec().label,
            format_value(metric, min),
            format_value(metric, latest),
            format_value(metric, max),
            metric.limit()
        );
    }
    out
}

pub fn render_resolution(resolution: &Resolution) -> String {
    match resolution.outcome {
        Outcome::Accepted => format!("Action approved: {}", resolution.action.metric),
        Outcome::Dismissed => format!("Dismissed: {}", resolution.action.message),
    }
}

// ==============================================================================
// console commands
// ==============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// accept the recommendation at this 0-based index
    Accept(usize),
    /// dismiss the recommendation at this 0-based index
    Dismiss(usize),
    Json,
    History,
    Help,
    Quit,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("empty command")]
    Empty,
    #[error("unknown command '{0}'")]
    Unknown(String),
    #[error("'{0}' needs a recommendation number")]
    MissingIndex(String),
    #[error("'{0}' is not a recommendation number (they start at 1)")]
    BadIndex(String),
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut words = line.split_whitespace();
        let verb = words.next().ok_or(CommandError::Empty)?.to_lowercase();

        let accepted = match verb.as_str() {
            "y" | "yes" => true,
            "n" | "no" => false,
            "json" => return Ok(Command::Json),
            "history" | "h" => return Ok(Command::History),
            "help" | "?" => return Ok(Command::Help),
            "quit" | "q" | "exit" => return Ok(Command::Quit),
            _ => return Err(CommandError::Unknown(verb.clone())),
        };

        let raw = words.next().ok_or_else(|| CommandError::MissingIndex(verb.clone()))?;
        let index = match raw.parse::<usize>() {
            Ok(n) if n >= 1 => n - 1,
            _ => return Err(CommandError::BadIndex(raw.to_string())),
        };

        Ok(if accepted {
            Command::Accept(index)
        } else {
            Command::Dismiss(index)
        })
    }
}

/// forward lines from `reader` over a channel, reading on a dedicated thread
///
/// a blocking read cannot be cancelled, so it must not sit on the runtime's
/// blocking pool: shutdown would wait for the next line. the channel closes at
/// end of input, and after the first read error has been delivered.
pub fn spawn_line_reader<R>(
    reader: R,
) -> std::io::Result<mpsc::UnboundedReceiver<std::io::Result<String>>>
where
    R: BufRead + Send + 'static,
{
    let (tx, rx) = mpsc::unbounded_channel();
    std::thread::Builder::new()
        .name("console".to_string())
        .spawn(move || {
            for line in reader.lines() {
                let failed = line.is_err();
                if tx.send(line).is_err() || failed {
                    break;
                }
            }
        })?;
    Ok(rx)
}
