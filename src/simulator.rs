//! ==============================================================================
//! simulator.rs - synthetic sensor source
//! ==============================================================================
//!
//! purpose:
//!     stands in for real sensor hardware. every tick each metric takes one
//!     bounded random-walk step:
//!
//! ```text
//!         next = clamp(previous + u * step, min, max),  u uniform in [-0.5, 0.5)
//! ```
//!
//! design:
//!     the randomness lives behind the StepSource trait, the same way the host
//!     keeps hardware behind a provider trait. production uses RandomSteps
//!     (StdRng, optionally seeded); tests plug in a closure or a fixed seed.
//!
//! relationships:
//!     - used by: runtime.rs (Monitor::tick)
//!     - uses: domain.rs (Metric, ReadingSet)
//!
//! ==============================================================================

use crate::domain::{Metric, ReadingSet};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// a source of unit random-walk steps
pub trait StepSource: Send {
    /// next sample, uniform in [-0.5, 0.5)
    fn next_unit_step(&mut self) -> f64;
}

/// any closure returning unit steps is a step source
impl<F> StepSource for F
where
    F: FnMut() -> f64 + Send,
{
    fn next_unit_step(&mut self) -> f64 {
        self()
    }
}

/// StdRng-backed step source
pub struct RandomSteps {
    rng: StdRng,
}

impl RandomSteps {
    /// seeded when `seed` is given, entropy-seeded otherwise
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self { rng }
    }

    pub fn seeded(seed: u64) -> Self {
        Self::new(Some(seed))
    }
}

impl StepSource for RandomSteps {
    fn next_unit_step(&mut self) -> f64 {
        self.rng.gen::<f64>() - 0.5
    }
}

/// produces the next reading set from the previous one
pub struct SensorSimulator<S> {
    steps: S,
}

impl<S: StepSource> SensorSimulator<S> {
    pub fn new(steps: S) -> Self {
        Self { steps }
    }

    /// one random-walk step for every metric, drawn in canonical order
    pub fn advance(&mut self, previous: &ReadingSet) -> ReadingSet {
        ReadingSet::from_fn(|metric| self.step(metric, previous.get(metric)))
    }

    fn step(&mut self, metric: Metric, previous: f64) -> f64 {
        let mut unit = self.steps.next_unit_step();
        if !unit.is_finite() {
            unit = 0.0;
        }
        // ReadingSet::from_fn clamps the result into range
        previous + unit.clamp(-0.5, 0.5) * metric.spec().step
    }
}
