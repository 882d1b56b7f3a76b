//! ==============================================================================
//! domain.rs - plant telemetry data model
//! ==============================================================================
//!
//! purpose:
//!     the shared vocabulary of the monitor: the five metrics and their static
//!     limits, a full reading set, timestamped history entries, breaches and
//!     the advisory actions derived from them.
//!
//! relationships:
//!     - used by: simulator.rs (produces ReadingSet)
//!     - used by: history.rs (stores HistoryEntry)
//!     - used by: alerts.rs, actions.rs (Breach, Action)
//!     - used by: view.rs (labels, units)
//!
//! ==============================================================================

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use std::fmt;

// ==============================================================================
// metrics
// ==============================================================================

/// one monitored environmental quantity
///
/// declaration order is the canonical order: breaches, actions and rendering
/// all follow it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Metric {
    Temperature,
    Humidity,
    SoilMoisture,
    LightLevel,
    AmbientMoisture,
}

/// static metadata for one metric
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MetricSpec {
    /// safe limit; a value strictly above it is a breach
    pub limit: f64,
    /// lowest value the simulation can produce
    pub min: f64,
    /// highest value the simulation can produce
    pub max: f64,
    /// full width of one random-walk step (uniform in -step/2..step/2)
    pub step: f64,
    /// starting value at system start
    pub initial: f64,
    /// advisory prompt raised when the limit is exceeded
    pub advisory: &'static str,
    /// display label
    pub label: &'static str,
    /// display unit
    pub unit: &'static str,
}

const SPECS: [MetricSpec; Metric::COUNT] = [
    MetricSpec {
        limit: 30.0,
        min: 15.0,
        max: 40.0,
        step: 3.0,
        initial: 25.0,
        advisory: "Turn on fan?",
        label: "Temperature",
        unit: "°C",
    },
    MetricSpec {
        limit: 80.0,
        min: 30.0,
        max: 95.0,
        step: 5.0,
        initial: 60.0,
        advisory: "Increase ventilation?",
        label: "Humidity",
        unit: "%",
    },
    MetricSpec {
        limit: 70.0,
        min: 20.0,
        max: 90.0,
        step: 4.0,
        initial: 45.0,
        advisory: "Reduce watering?",
        label: "Soil Moisture",
        unit: "%",
    },
    MetricSpec {
        limit: 90.0,
        min: 40.0,
        max: 100.0,
        step: 6.0,
        initial: 70.0,
        advisory: "Add shade?",
        label: "Light Level",
        unit: "%",
    },
    MetricSpec {
        limit: 80.0,
        min: 30.0,
        max: 95.0,
        step: 4.0,
        initial: 55.0,
        advisory: "Run dehumidifier?",
        label: "Ambient Moisture",
        unit: "%",
    },
];

impl Metric {
    pub const COUNT: usize = 5;

    /// every metric in canonical order
    pub const ALL: [Metric; Metric::COUNT] = [
        Metric::Temperature,
        Metric::Humidity,
        Metric::SoilMoisture,
        Metric::LightLevel,
        Metric::AmbientMoisture,
    ];

    /// position in the canonical order
    pub const fn index(self) -> usize {
        match self {
            Metric::Temperature => 0,
            Metric::Humidity => 1,
            Metric::SoilMoisture => 2,
            Metric::LightLevel => 3,
            Metric::AmbientMoisture => 4,
        }
    }

    pub fn spec(self) -> &'static MetricSpec {
        &SPECS[self.index()]
    }

    pub fn limit(self) -> f64 {
        self.spec().limit
    }

    /// valid [min, max] range
    pub fn range(self) -> (f64, f64) {
        let spec = self.spec();
        (spec.min, spec.max)
    }

    pub fn advisory(self) -> &'static str {
        self.spec().advisory
    }

    /// stable machine name, matching the serialized form
    pub fn key(self) -> &'static str {
        match self {
            Metric::Temperature => "temperature",
            Metric::Humidity => "humidity",
            Metric::SoilMoisture => "soilMoisture",
            Metric::LightLevel => "lightLevel",
            Metric::AmbientMoisture => "ambientMoisture",
        }
    }

    /// clamp a value into this metric's range
    ///
    /// non-finite input falls back to the initial value so a bad sample can
    /// never poison the reading set.
    pub fn clamp(self, value: f64) -> f64 {
        let spec = self.spec();
        if value.is_finite() {
            value.clamp(spec.min, spec.max)
        } else {
            spec.initial
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

// ==============================================================================
// reading set
// ==============================================================================

/// the current value of every metric at one instant
///
/// every metric is present exactly once (fixed array) and every value is
/// within its range (all constructors clamp).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReadingSet {
    values: [f64; Metric::COUNT],
}

impl ReadingSet {
    /// the mid-range startup readings
    pub fn initial() -> Self {
        Self::from_fn(|metric| metric.spec().initial)
    }

    /// build a reading set from a per-metric function, clamping each value
    pub fn from_fn(mut value_of: impl FnMut(Metric) -> f64) -> Self {
        let mut values = [0.0; Metric::COUNT];
        for metric in Metric::ALL {
            values[metric.index()] = metric.clamp(value_of(metric));
        }
        Self { values }
    }

    pub fn get(&self, metric: Metric) -> f64 {
        self.values[metric.index()]
    }

    /// copy with one metric replaced (clamped)
    pub fn with(mut self, metric: Metric, value: f64) -> Self {
        self.values[metric.index()] = metric.clamp(value);
        self
    }

    /// (metric, value) pairs in canonical order
    pub fn iter(&self) -> impl Iterator<Item = (Metric, f64)> + '_ {
        Metric::ALL.into_iter().map(move |metric| (metric, self.get(metric)))
    }
}

impl Default for ReadingSet {
    fn default() -> Self {
        Self::initial()
    }
}

impl Serialize for ReadingSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(Metric::COUNT))?;
        for (metric, value) in self.iter() {
            map.serialize_entry(&metric, &value)?;
        }
        map.end()
    }
}

// ==============================================================================
// history, breaches, actions
// ==============================================================================

/// a reading set plus its capture time
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HistoryEntry {
    pub readings: ReadingSet,
    /// unix timestamp (ms) when the readings were captured
    pub captured_at_ms: u64,
}

impl HistoryEntry {
    pub fn new(readings: ReadingSet, captured_at_ms: u64) -> Self {
        Self { readings, captured_at_ms }
    }
}

/// a metric whose observed value exceeds its limit
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Breach {
    pub metric: Metric,
    pub value: f64,
}

/// a pending advisory prompt for one metric's breach
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Action {
    pub metric: Metric,
    pub message: &'static str,
}

impl Action {
    /// the advisory for a metric, with its fixed message
    pub fn for_metric(metric: Metric) -> Self {
        Self {
            metric,
            message: metric.advisory(),
        }
    }
}

/// unix timestamp in milliseconds
pub fn timestamp_ms() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
