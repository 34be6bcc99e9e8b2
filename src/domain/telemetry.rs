// Telemetry data domain models
use serde::Serialize;
use std::collections::VecDeque;

/// Placeholder series shown before the first poll lands.
pub const DEFAULT_SEED: [f64; 19] = [
    8.0, 2.0, 5.0, 9.0, 5.0, 11.0, 3.0, 5.0, 10.0, 0.0, 1.0, 8.0, 2.0, 9.0, 0.0, 13.0, 10.0, 7.0,
    16.0,
];

/// A single scalar reading. Its position in the series is its arrival order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Sample {
    pub value: f64,
}

impl Sample {
    pub fn new(value: f64) -> Self {
        Self { value }
    }
}

/// Fixed-capacity FIFO of samples. Always full once created.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeSeries {
    samples: VecDeque<f64>,
}

impl TimeSeries {
    /// Builds a series whose capacity is the seed length. Returns `None` for an empty seed.
    pub fn seeded(seed: &[f64]) -> Option<Self> {
        if seed.is_empty() {
            return None;
        }
        Some(Self {
            samples: seed.iter().copied().collect(),
        })
    }

    /// Equal to the capacity fixed by the seed.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Evicts the oldest sample and appends `sample` at the newest end.
    pub fn push(&mut self, sample: Sample) {
        self.samples.pop_front();
        self.samples.push_back(sample.value);
    }

    pub fn values(&self) -> impl Iterator<Item = f64> + '_ {
        self.samples.iter().copied()
    }

    pub fn snapshot(&self) -> ChartSnapshot {
        ChartSnapshot::from_values(self.values().collect())
    }
}

/// Immutable copy of the series handed to the renderer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSnapshot {
    /// Ordinal positions `1..=N`, not wall-clock time.
    pub labels: Vec<usize>,
    pub values: Vec<f64>,
}

impl ChartSnapshot {
    pub fn from_values(values: Vec<f64>) -> Self {
        let labels = (1..=values.len()).collect();
        Self { labels, values }
    }
}
