//! ==============================================================================
//! alerts.rs - threshold breach evaluation
//! ==============================================================================
//!
//! purpose:
//!     derives the set of breaches from a reading set. a metric is breached
//!     iff its value is strictly greater than its limit; equality is safe.
//!
//! relationships:
//!     - used by: runtime.rs (every tick), view.rs (alert markers)
//!     - feeds: actions.rs (ActionQueue::on_new_breaches)
//!
//! ==============================================================================

use crate::domain::{Breach, Metric, ReadingSet};

pub fn is_breached(metric: Metric, value: f64) -> bool {
    value > metric.limit()
}

/// every breach in the reading set, in canonical metric order
pub fn evaluate(readings: &ReadingSet) -> Vec<Breach> {
    readings
        .iter()
        .filter(|&(metric, value)| is_breached(metric, value))
        .map(|(metric, value)| Breach { metric, value })
        .collect()
}
