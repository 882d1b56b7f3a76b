//! ==============================================================================
//! plant_monitor - simulated plant-health telemetry core
//! ==============================================================================
//!
//! a periodic tick walks five synthetic sensor readings, records them in a
//! bounded rolling history, flags readings over their safe limit and queues
//! one advisory per breached metric until the user answers it.
//!
//! modules (leaves first):
//!     - domain:    metrics, limits, reading sets, breaches, actions
//!     - simulator: bounded random walk behind an injectable StepSource
//!     - history:   fixed-capacity FIFO of timestamped readings
//!     - alerts:    strict greater-than threshold evaluation
//!     - actions:   deduplicated advisory queue with accept/dismiss
//!     - runtime:   the tick controller, shared handle and ticker task
//!     - view:      terminal rendering and console commands
//!     - config:    monitor.toml loading
//!     - logging:   tracing subscriber setup
//!
//! ==============================================================================

pub mod actions;
pub mod alerts;
pub mod config;
pub mod domain;
pub mod history;
pub mod logging;
pub mod runtime;
pub mod simulator;
pub mod view;

pub use actions::{ActionError, ActionQueue, Outcome, Resolution};
pub use domain::{Action, Breach, HistoryEntry, Metric, MetricSpec, ReadingSet};
pub use history::HistoryBuffer;
pub use runtime::{DashboardSnapshot, Monitor, MonitorHandle, SimulationState, TickReport, Ticker};
pub use simulator::{RandomSteps, SensorSimulator, StepSource};
