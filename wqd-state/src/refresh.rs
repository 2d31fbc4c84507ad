//! Refresh controller.
//!
//! Drives one fetch → predict → history cycle against a [`WaterQualityApi`]
//! and writes every result into the view state through a [`StateHandle`].
//! Errors never escape a cycle: they become the single visible error string.

use crate::history::HistoryRow;
use crate::store::{chart_label, RefreshPhase, ViewState};
use chrono::{FixedOffset, Utc};
use futures::future::join_all;
use log::{debug, info, warn};
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use wqd_core::api::WaterQualityApi;
use wqd_core::config::{DashboardConfig, HISTORY_CAPACITY};
use wqd_core::error::ApiError;
use wqd_core::model::SensorReading;

/// Access to the store the controller writes into.
///
/// Implemented for `Rc<RefCell<ViewState>>` here; the browser dashboard
/// wraps its signal in a type implementing this too.
pub trait StateHandle {
    fn update<R>(&self, f: impl FnOnce(&mut ViewState) -> R) -> R;
    fn read<R>(&self, f: impl FnOnce(&ViewState) -> R) -> R;
}

/// Store shared between the controller and a native front end.
pub type SharedState = Rc<RefCell<ViewState>>;

impl StateHandle for SharedState {
    fn update<R>(&self, f: impl FnOnce(&mut ViewState) -> R) -> R {
        f(&mut self.borrow_mut())
    }

    fn read<R>(&self, f: impl FnOnce(&ViewState) -> R) -> R {
        f(&self.borrow())
    }
}

/// What happened to a requested cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleOutcome {
    Completed,
    /// Another cycle was still in flight
    Skipped,
}

/// Holds the in-flight flag for the lifetime of one cycle.
struct FlightGuard {
    flag: Rc<Cell<bool>>,
}

impl FlightGuard {
    fn acquire(flag: &Rc<Cell<bool>>) -> Option<Self> {
        if flag.replace(true) {
            return None;
        }
        Some(FlightGuard { flag: flag.clone() })
    }
}

impl Drop for FlightGuard {
    fn drop(&mut self) {
        self.flag.set(false);
    }
}

/// Polls the service and reconciles results into the view state.
///
/// Clones share the API client, the store handle and the in-flight flag,
/// so a clone handed to a timer callback is still single-flight with the
/// original.
pub struct RefreshController<A, S> {
    api: Rc<A>,
    state: S,
    history_limit: usize,
    offset: FixedOffset,
    in_flight: Rc<Cell<bool>>,
}

impl<A, S: Clone> Clone for RefreshController<A, S> {
    fn clone(&self) -> Self {
        Self {
            api: self.api.clone(),
            state: self.state.clone(),
            history_limit: self.history_limit,
            offset: self.offset,
            in_flight: self.in_flight.clone(),
        }
    }
}

impl<A, S> RefreshController<A, S>
where
    A: WaterQualityApi,
    S: StateHandle,
{
    pub fn new(api: A, state: S, config: &DashboardConfig) -> Self {
        Self {
            api: Rc::new(api),
            state,
            history_limit: config.history_limit.clamp(1, HISTORY_CAPACITY),
            offset: config.display_offset(),
            in_flight: Rc::new(Cell::new(false)),
        }
    }

    pub fn state(&self) -> &S {
        &self.state
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight.get()
    }

    /// Run one refresh cycle, or skip it if one is already running.
    pub async fn run_cycle(&self) -> CycleOutcome {
        let Some(_guard) = FlightGuard::acquire(&self.in_flight) else {
            debug!("Refresh already in flight, skipping");
            return CycleOutcome::Skipped;
        };

        info!("Refresh cycle started");
        self.state.update(ViewState::begin_cycle);

        self.refresh_latest().await;
        self.refresh_history().await;

        self.state.update(|s| {
            s.set_phase(RefreshPhase::Rendering);
            s.finish_cycle(Utc::now());
        });
        info!("Refresh cycle finished");
        CycleOutcome::Completed
    }

    /// Fetch the latest reading and predict it. Does not touch the history
    /// table.
    pub async fn refresh_latest(&self) {
        let latest = match self.api.fetch_latest().await {
            Ok(latest) => latest,
            Err(e) => {
                warn!("Fetching latest reading failed: {}", e);
                self.state.update(|s| s.set_error(e.to_string()));
                return;
            }
        };

        let reading = latest.reading.clone();
        self.state.update(|s| {
            s.apply_latest(latest);
            s.set_phase(RefreshPhase::Predicting);
        });

        match self.api.predict(&reading).await {
            Ok(outcome) => {
                let label = chart_label(&reading, &self.offset, Utc::now());
                debug!(
                    "Prediction {} (CI90 {}..{}) at {}",
                    outcome.prediction.coliform_estimate,
                    outcome.prediction.confidence_low,
                    outcome.prediction.confidence_high,
                    label
                );
                self.state.update(|s| s.apply_prediction(outcome, label));
            }
            Err(e) => {
                warn!("Prediction for latest reading failed: {}", e);
                self.state.update(|s| s.set_error(e.to_string()));
            }
        }
    }

    /// Reload the history table and annotate each row with a prediction.
    ///
    /// Leaves the current reading alone; a fetch failure only surfaces when
    /// no other error is showing.
    pub async fn refresh_history(&self) {
        let mut readings = match self.api.fetch_history(self.history_limit).await {
            Ok(readings) => readings,
            Err(e) => {
                warn!("Fetching history failed: {}", e);
                self.state.update(|s| s.set_error_if_clear(e.to_string()));
                return;
            }
        };
        readings.truncate(HISTORY_CAPACITY);

        let rows = self.annotate(readings).await;
        let annotated = rows.iter().filter(|row| row.is_annotated()).count();
        info!("History refreshed: {} rows, {} annotated", rows.len(), annotated);
        self.state.update(|s| s.apply_history(rows));
    }

    /// Predict every reading concurrently. A failed prediction leaves its
    /// row unannotated.
    async fn annotate(&self, readings: Vec<SensorReading>) -> Vec<HistoryRow> {
        let api = &self.api;
        join_all(readings.into_iter().enumerate().map(|(idx, reading)| async move {
            match api.predict(&reading).await {
                Ok(outcome) => HistoryRow::annotated(reading, outcome),
                Err(e) => {
                    warn!("Prediction for history row {} failed: {}", idx, e);
                    HistoryRow::unannotated(reading)
                }
            }
        }))
        .await
    }

    /// Delete all stored readings, then blank the view.
    ///
    /// Returns the number of removed records: the server's count when it
    /// sends one, otherwise the number of rows the table held.
    pub async fn clear_history(&self) -> Result<usize, ApiError> {
        let prior_rows = self.state.read(|s| s.rows.len());
        match self.api.clear_history().await {
            Ok(ack) => {
                let deleted = ack.deleted.unwrap_or(prior_rows);
                info!("History cleared: {} records", deleted);
                self.state.update(ViewState::clear);
                Ok(deleted)
            }
            Err(e) => {
                warn!("Clearing history failed: {}", e);
                self.state.update(|s| s.set_error(e.to_string()));
                Err(e)
            }
        }
    }

    /// Predict a hand-entered reading and show it as the current one.
    pub async fn predict_manual(&self, reading: SensorReading) -> Result<(), ApiError> {
        self.state.update(|s| {
            s.clear_error();
            s.loading = true;
            s.set_phase(RefreshPhase::Predicting);
        });

        let result = self.api.predict(&reading).await;
        let label = chart_label(&reading, &self.offset, Utc::now());
        self.state.update(|s| {
            s.loading = false;
            s.set_phase(RefreshPhase::Idle);
        });

        match result {
            Ok(outcome) => {
                self.state.update(|s| {
                    s.apply_reading(reading);
                    s.apply_prediction(outcome, label);
                });
                Ok(())
            }
            Err(e) => {
                warn!("Manual prediction failed: {}", e);
                self.state.update(|s| s.set_error(e.to_string()));
                Err(e)
            }
        }
    }
}
