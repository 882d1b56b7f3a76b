//! ==============================================================================
//! actions.rs - pending advisory queue
//! ==============================================================================
//!
//! purpose:
//!     turns breaches into advisory prompts ("Turn on fan?") awaiting a user
//!     accept/dismiss. at most one pending action exists per metric.
//!
//! lifecycle (per metric):
//!
//! ```text
//!     NONE ──(breach seen, nothing pending)──► PENDING ──(resolve)──► NONE
//! ```
//!
//! ```text
//!     there is no expiry. an action stays pending after its breach clears
//!     until the user resolves it.
//! ```
//!
//! relationships:
//!     - used by: runtime.rs (enqueue on tick, resolve on user command)
//!     - uses: domain.rs (Action, Breach, Metric)
//!
//! ==============================================================================

use crate::domain::{Action, Breach, Metric};
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ActionError {
    #[error("no pending action at index {index} (queue holds {len})")]
    InvalidIndex { index: usize, len: usize },
}

/// how the user answered an advisory
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Accepted,
    Dismissed,
}

impl Outcome {
    pub fn from_accepted(accepted: bool) -> Self {
        if accepted {
            Outcome::Accepted
        } else {
            Outcome::Dismissed
        }
    }
}

/// a resolved action and the user's answer
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Resolution {
    pub action: Action,
    pub outcome: Outcome,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActionQueue {
    pending: Vec<Action>,
}

impl ActionQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// append an action for every breached metric not already pending
    ///
    /// new actions are appended in canonical metric order whatever order the
    /// breaches arrive in; breaches for pending metrics are ignored. returns
    /// the actions that were added.
    pub fn on_new_breaches(&mut self, breaches: &[Breach]) -> Vec<Action> {
        let mut metrics: Vec<Metric> = breaches.iter().map(|b| b.metric).collect();
        metrics.sort();
        metrics.dedup();

        let mut added = Vec::new();
        for metric in metrics {
            if self.contains(metric) {
                continue;
            }
            let action = Action::for_metric(metric);
            self.pending.push(action.clone());
            added.push(action);
        }
        added
    }

    /// remove the action at `index`; the outcome only matters to the caller
    pub fn resolve(&mut self, index: usize, accepted: bool) -> Result<Resolution, ActionError> {
        if index >= self.pending.len() {
            return Err(ActionError::InvalidIndex {
                index,
                len: self.pending.len(),
            });
        }
        let action = self.pending.remove(index);
        Ok(Resolution {
            action,
            outcome: Outcome::from_accepted(accepted),
        })
    }

    pub fn contains(&self, metric: Metric) -> bool {
        self.pending.iter().any(|a| a.metric == metric)
    }

    pub fn pending(&self) -> &[Action] {
        &self.pending
    }

    pub fn snapshot(&self) -> Vec<Action> {
        self.pending.clone()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

impl From<Vec<Action>> for ActionQueue {
    /// duplicates beyond the first action per metric are dropped
    fn from(actions: Vec<Action>) -> Self {
        let mut queue = ActionQueue::new();
        for action in actions {
            if !queue.contains(action.metric) {
                queue.pending.push(action);
            }
        }
        queue
    }
}
