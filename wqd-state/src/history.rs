//! Bounded chart buffer and history table rows.

use serde::Serialize;
use std::collections::VecDeque;
use wqd_core::config::{ColiformUnit, HISTORY_CAPACITY};
use wqd_core::model::{BadgeMap, Decision, PredictionOutcome, PredictionResult, SensorReading};

/// One point on the prediction chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoryPoint {
    /// `HH:MM:SS` in the display offset
    pub time_label: String,
    pub predicted_value: f64,
    pub ci_low: f64,
    pub ci_high: f64,
    pub unit: ColiformUnit,
}

impl HistoryPoint {
    pub fn from_prediction(prediction: &PredictionResult, time_label: String) -> Self {
        HistoryPoint {
            time_label,
            predicted_value: prediction.coliform_estimate,
            ci_low: prediction.confidence_low,
            ci_high: prediction.confidence_high,
            unit: prediction.estimate_unit,
        }
    }
}

/// FIFO ring of chart points. Pushing past capacity evicts the oldest.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartHistory {
    points: VecDeque<HistoryPoint>,
    capacity: usize,
}

impl Default for ChartHistory {
    fn default() -> Self {
        Self::new(HISTORY_CAPACITY)
    }
}

impl ChartHistory {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            points: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn push(&mut self, point: HistoryPoint) {
        while self.points.len() >= self.capacity {
            self.points.pop_front();
        }
        self.points.push_back(point);
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn clear(&mut self) {
        self.points.clear();
    }

    /// Oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &HistoryPoint> {
        self.points.iter()
    }

    pub fn latest(&self) -> Option<&HistoryPoint> {
        self.points.back()
    }

    pub fn to_vec(&self) -> Vec<HistoryPoint> {
        self.points.iter().cloned().collect()
    }
}

/// One row of the history table: a stored reading plus the prediction run
/// for it, when that prediction succeeded.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoryRow {
    pub reading: SensorReading,
    pub prediction: Option<PredictionResult>,
    pub decision: Option<Decision>,
    pub badges: BadgeMap,
}

impl HistoryRow {
    pub fn unannotated(reading: SensorReading) -> Self {
        HistoryRow {
            reading,
            prediction: None,
            decision: None,
            badges: BadgeMap::new(),
        }
    }

    pub fn annotated(reading: SensorReading, outcome: PredictionOutcome) -> Self {
        HistoryRow {
            reading,
            prediction: Some(outcome.prediction),
            decision: Some(outcome.decision),
            badges: outcome.badges,
        }
    }

    pub fn is_annotated(&self) -> bool {
        self.prediction.is_some()
    }
}
