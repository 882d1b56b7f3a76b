//! ==============================================================================
//! runtime.rs - the monitor controller and its tick loop
//! ==============================================================================
//!
//! purpose:
//!     owns the whole simulation state and runs the tick sequence:
//!
//! ```text
//!         simulate ──► append to history ──► evaluate breaches ──► enqueue actions
//! ```
//!
//! ```text
//!     a tick runs to completion under one lock, so user resolutions coming
//!     from the console can interleave between ticks but never inside one.
//! ```
//!
//! architecture:
//!
//! ```text
//!     ┌───────────────────────────────────────────────────────┐
//!     │ MonitorHandle (Clone-able, Arc<Mutex<Monitor>>)        │
//!     │   ┌─────────────┐                ┌─────────────────┐  │
//!     │   │ Ticker task │ ── tick() ──►  │     Monitor      │  │
//!     │   │ (2s cycle)  │                │ SimulationState  │  │
//!     │   └─────────────┘   resolve() ─► │ SensorSimulator  │  │
//!     │       console  ───────────────── └─────────────────┘  │
//!     └───────────────────────────────────────────────────────┘
//! ```
//!
//! relationships:
//!     - used by: main.rs (creates the handle, starts the ticker)
//!     - uses: simulator.rs, history.rs, alerts.rs, actions.rs
//!
//! ==============================================================================

use crate::actions::{ActionQueue, Resolution};
use crate::alerts;
use crate::domain::{timestamp_ms, Action, Breach, HistoryEntry, ReadingSet};
use crate::history::HistoryBuffer;
use crate::simulator::{SensorSimulator, StepSource};

use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

// ==============================================================================
// state
// ==============================================================================

/// everything the monitor owns
#[derive(Debug, Clone)]
pub struct SimulationState {
    pub readings: ReadingSet,
    pub history: HistoryBuffer,
    pub pending: ActionQueue,
    /// unix timestamp (ms) of the last tick, 0 before the first one
    pub last_update_ms: u64,
    pub ticks: u64,
}

impl SimulationState {
    /// mid-range readings, empty history and queue
    pub fn new(history_capacity: usize) -> Self {
        Self {
            readings: ReadingSet::initial(),
            history: HistoryBuffer::with_capacity(history_capacity),
            pending: ActionQueue::new(),
            last_update_ms: 0,
            ticks: 0,
        }
    }
}

/// what one tick produced
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TickReport {
    pub entry: HistoryEntry,
    pub breaches: Vec<Breach>,
    /// actions enqueued by this tick (breaches already pending are absent)
    pub new_actions: Vec<Action>,
}

/// read-only view model for the view layer
#[derive(Debug, Clone, Serialize)]
pub struct DashboardSnapshot {
    pub readings: ReadingSet,
    pub breaches: Vec<Breach>,
    pub actions: Vec<Action>,
    pub history: Vec<HistoryEntry>,
    pub last_update_ms: u64,
    pub ticks: u64,
}

// ==============================================================================
// monitor
// ==============================================================================

pub struct Monitor<S> {
    state: SimulationState,
    simulator: SensorSimulator<S>,
}

impl<S: StepSource> Monitor<S> {
    pub fn new(simulator: SensorSimulator<S>, history_capacity: usize) -> Self {
        Self {
            state: SimulationState::new(history_capacity),
            simulator,
        }
    }

    /// run one tick stamped with the current wall-clock time
    pub fn tick(&mut self) -> TickReport {
        self.tick_at(timestamp_ms())
    }

    /// run one tick stamped with `now_ms`
    pub fn tick_at(&mut self, now_ms: u64) -> TickReport {
        let readings = self.simulator.advance(&self.state.readings);
        let entry = HistoryEntry::new(readings, now_ms);

        self.state.readings = readings;
        self.state.history.append(entry);

        let breaches = alerts::evaluate(&readings);
        let new_actions = self.state.pending.on_new_breaches(&breaches);

        self.state.last_update_ms = now_ms;
        self.state.ticks += 1;

        debug!(
            tick = self.state.ticks,
            breaches = breaches.len(),
            pending = self.state.pending.len(),
            "tick"
        );
        for action in &new_actions {
            info!(metric = %action.metric, advice = action.message, "advisory raised");
        }

        TickReport {
            entry,
            breaches,
            new_actions,
        }
    }

    /// resolve the pending action at `index`
    ///
    /// an out-of-range index is usually a stale request that lost a race with
    /// another resolution, so it is logged and ignored.
    pub fn resolve(&mut self, index: usize, accepted: bool) -> Option<Resolution> {
        match self.state.pending.resolve(index, accepted) {
            Ok(resolution) => {
                info!(
                    metric = %resolution.action.metric,
                    outcome = ?resolution.outcome,
                    "advisory resolved"
                );
                Some(resolution)
            }
            Err(e) => {
                warn!(error = %e, "ignoring resolve request");
                None
            }
        }
    }

    pub fn state(&self) -> &SimulationState {
        &self.state
    }

    pub fn snapshot(&self) -> DashboardSnapshot {
        DashboardSnapshot {
            readings: self.state.readings,
            breaches: alerts::evaluate(&self.state.readings),
            actions: self.state.pending.snapshot(),
            history: self.state.history.snapshot(),
            last_update_ms: self.state.last_update_ms,
            ticks: self.state.ticks,
        }
    }
}

// ==============================================================================
// shared handle + ticker
// ==============================================================================

/// Clone-able handle; every operation takes the same lock
pub struct MonitorHandle<S> {
    inner: Arc<Mutex<Monitor<S>>>,
}

impl<S> Clone for MonitorHandle<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<S: StepSource + 'static> MonitorHandle<S> {
    pub fn new(monitor: Monitor<S>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(monitor)),
        }
    }

    pub async fn tick(&self) -> TickReport {
        self.inner.lock().await.tick()
    }

    pub async fn resolve(&self, index: usize, accepted: bool) -> Option<Resolution> {
        self.inner.lock().await.resolve(index, accepted)
    }

    pub async fn snapshot(&self) -> DashboardSnapshot {
        self.inner.lock().await.snapshot()
    }

    /// copy of the rolling history, for the history panel
    pub async fn history(&self) -> HistoryBuffer {
        self.inner.lock().await.state.history.clone()
    }

    /// start ticking every `period`
    ///
    /// the first tick fires one full period after start. missed ticks are
    /// skipped, not replayed. `on_tick` runs after each tick, outside the lock.
    pub fn start_ticker<F>(&self, period: Duration, mut on_tick: F) -> Ticker
    where
        F: FnMut(&TickReport, &DashboardSnapshot) + Send + 'static,
    {
        let period = period.max(Duration::from_millis(1));
        let handle = self.clone();

        let task = tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
            // the first interval tick completes immediately
            interval.tick().await;

            loop {
                interval.tick().await;
                let (report, snapshot) = {
                    let mut monitor = handle.inner.lock().await;
                    let report = monitor.tick();
                    (report, monitor.snapshot())
                };
                on_tick(&report, &snapshot);
            }
        });

        Ticker { task }
    }
}

/// the running tick task; stopping it is the only teardown step
pub struct Ticker {
    task: JoinHandle<()>,
}

impl Ticker {
    pub fn stop(self) {
        self.task.abort();
    }
}

impl Drop for Ticker {
    fn drop(&mut self) {
        self.task.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Metric;

    fn rising() -> Monitor<impl StepSource> {
        Monitor::new(SensorSimulator::new(|| 0.5), 30)
    }

    #[test]
    fn tick_runs_the_full_sequence() {
        let mut monitor = rising();
        let report = monitor.tick_at(1_000);

        assert_eq!(report.entry.captured_at_ms, 1_000);
        assert_eq!(report.entry.readings.get(Metric::Temperature), 26.5);
        assert!(report.breaches.is_empty());

        let state = monitor.state();
        assert_eq!(state.readings, report.entry.readings);
        assert_eq!(state.history.len(), 1);
        assert_eq!(state.last_update_ms, 1_000);
        assert_eq!(state.ticks, 1);
    }

    #[test]
    fn breach_raises_a_single_advisory() {
        let mut monitor = rising();
        // 25 -> 26.5 -> 28 -> 29.5 -> 31
        for t in 0..3 {
            assert!(monitor.tick_at(t).new_actions.is_empty());
        }
        let report = monitor.tick_at(3);
        assert_eq!(report.new_actions, vec![Action::for_metric(Metric::Temperature)]);

        let report = monitor.tick_at(4);
        assert!(report.breaches.iter().any(|b| b.metric == Metric::Temperature));
        assert!(report.new_actions.is_empty());
    }

    #[test]
    fn stale_resolve_is_a_no_op() {
        let mut monitor = rising();
        assert!(monitor.resolve(0, true).is_none());
        assert_eq!(monitor.state().ticks, 0);
    }

    #[test]
    fn snapshot_mirrors_state() {
        let mut monitor = rising();
        for t in 0..4 {
            monitor.tick_at(t);
        }
        let snapshot = monitor.snapshot();
        assert_eq!(snapshot.ticks, 4);
        assert_eq!(snapshot.history.len(), 4);
        assert_eq!(snapshot.actions.len(), 1);
        assert_eq!(snapshot.breaches.len(), 1);
        assert_eq!(snapshot.last_update_ms, 3);
    }

    #[tokio::test(start_paused = true)]
    async fn ticker_ticks_every_period_until_stopped() {
        let handle = MonitorHandle::new(rising());
        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
        let ticker = handle.start_ticker(Duration::from_secs(2), move |report, _| {
            let _ = tx.send(report.clone());
        });

        for _ in 0..3 {
            rx.recv().await.unwrap();
        }
        ticker.stop();

        tokio::time::sleep(Duration::from_secs(10)).await;
        let snapshot = handle.snapshot().await;
        assert_eq!(snapshot.ticks, 3);
        assert_eq!(handle.history().await.len(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn resolution_interleaves_between_ticks() {
        let handle = MonitorHandle::new(rising());
        for _ in 0..4 {
            handle.tick().await;
        }
        let resolution = handle.resolve(0, true).await.unwrap();
        assert_eq!(resolution.action.metric, Metric::Temperature);
        assert!(handle.snapshot().await.actions.is_empty());

        // still breached, so the next tick raises it again
        let report = handle.tick().await;
        assert_eq!(report.new_actions, vec![Action::for_metric(Metric::Temperature)]);
    }
}
