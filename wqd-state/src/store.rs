//! The view-state store.
//!
//! `ViewState` is plain data. Every change goes through one of the
//! transition methods below, each triggered by an API client result.

use crate::history::{ChartHistory, HistoryPoint, HistoryRow};
use chrono::{DateTime, FixedOffset, Utc};
use wqd_core::config::HISTORY_CAPACITY;
use wqd_core::model::{
    BadgeMap, Decision, LatestReading, PredictionOutcome, PredictionResult, SensorIds,
    SensorReading,
};
use wqd_utils::dates;

/// Where the refresh controller is within a cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RefreshPhase {
    #[default]
    Idle,
    Fetching,
    Predicting,
    Rendering,
}

/// Everything the dashboard renders.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ViewState {
    /// Last reading from `/iot/latest` (or the manual form)
    pub reading: Option<SensorReading>,
    pub badges: BadgeMap,
    pub sensor_ids: SensorIds,
    pub prediction: Option<PredictionResult>,
    pub decision: Option<Decision>,
    pub chart: ChartHistory,
    /// History table, newest first as supplied by the backend
    pub rows: Vec<HistoryRow>,
    pub loading: bool,
    /// The single visible error message
    pub error: Option<String>,
    pub phase: RefreshPhase,
    /// When the last cycle finished
    pub last_updated: Option<DateTime<Utc>>,
}

impl ViewState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start of a refresh cycle: clear the error and raise `loading`.
    pub fn begin_cycle(&mut self) {
        self.error = None;
        self.loading = true;
        self.phase = RefreshPhase::Fetching;
    }

    pub fn set_phase(&mut self, phase: RefreshPhase) {
        self.phase = phase;
    }

    pub fn finish_cycle(&mut self, now: DateTime<Utc>) {
        self.phase = RefreshPhase::Idle;
        self.loading = false;
        self.last_updated = Some(now);
    }

    /// Overwrite the current reading. Badges from the same response are
    /// merged; sensor ids are replaced when the response carries any.
    pub fn apply_latest(&mut self, latest: LatestReading) {
        self.reading = Some(latest.reading);
        self.merge_badges(latest.badges);
        if !latest.sensor_ids.is_empty() {
            self.sensor_ids = latest.sensor_ids;
        }
    }

    /// Overwrite the current reading without touching badges.
    pub fn apply_reading(&mut self, reading: SensorReading) {
        self.reading = Some(reading);
    }

    /// Incoming keys overwrite existing ones; keys absent from `incoming`
    /// keep their previous badge.
    pub fn merge_badges(&mut self, incoming: BadgeMap) {
        self.badges.extend(incoming);
    }

    /// Overwrite prediction and decision, merge badges, and append one
    /// chart point labelled `time_label`.
    pub fn apply_prediction(&mut self, outcome: PredictionOutcome, time_label: String) {
        self.chart
            .push(HistoryPoint::from_prediction(&outcome.prediction, time_label));
        self.merge_badges(outcome.badges);
        self.prediction = Some(outcome.prediction);
        self.decision = Some(outcome.decision);
    }

    /// Replace the history table, keeping at most [`HISTORY_CAPACITY`] rows.
    pub fn apply_history(&mut self, mut rows: Vec<HistoryRow>) {
        rows.truncate(HISTORY_CAPACITY);
        self.rows = rows;
    }

    /// After a successful clear: blank every current field and empty both
    /// the chart buffer and the table.
    pub fn clear(&mut self) {
        self.reading = None;
        self.badges.clear();
        self.sensor_ids.clear();
        self.prediction = None;
        self.decision = None;
        self.chart.clear();
        self.rows.clear();
        self.error = None;
        self.loading = false;
        self.phase = RefreshPhase::Idle;
    }

    pub fn set_error(&mut self, message: impl Into<String>) {
        self.error = Some(message.into());
    }

    /// Record `message` unless an earlier failure in this cycle already did.
    pub fn set_error_if_clear(&mut self, message: impl Into<String>) {
        if self.error.is_none() {
            self.error = Some(message.into());
        }
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }
}

/// Chart label for a prediction of `reading`.
///
/// Uses the reading's own timestamp when it parses, otherwise `now`;
/// either way rendered in the display offset.
pub fn chart_label(reading: &SensorReading, offset: &FixedOffset, now: DateTime<Utc>) -> String {
    let ts = reading
        .timestamp
        .as_deref()
        .and_then(|raw| dates::parse_timestamp(raw).ok())
        .unwrap_or(now);
    dates::format_time_label(&ts, offset)
}

#[cfg(test)]
mod tests {
    use super::*;
    use wqd_core::config::ColiformUnit;
    use wqd_core::model::{Badge, BadgeKind, Severity, PARAM_DO, PARAM_PH};

    fn reading(temp_c: f64) -> SensorReading {
        SensorReading {
            temp_c,
            do_mgl: 6.2,
            ph: 7.2,
            conductivity_uscm: 620.0,
            coliform_raw: Some(0.5),
            coliform_converted: None,
            timestamp: Some("2025-01-01T00:00:00Z".to_string()),
        }
    }

    fn badge(kind: BadgeKind, label: &str) -> Badge {
        Badge {
            kind,
            label: label.to_string(),
        }
    }

    fn outcome(estimate: f64, badges: BadgeMap) -> PredictionOutcome {
        PredictionOutcome {
            prediction: PredictionResult {
                coliform_estimate: estimate,
                confidence_low: estimate - 0.2,
                confidence_high: estimate + 0.2,
                estimate_unit: ColiformUnit::MpnPer100ml,
                disclaimer: None,
            },
            decision: Decision {
                potable: true,
                severity: Severity::Safe,
                reasons: Vec::new(),
                recommendations: Vec::new(),
                alternative_use: vec!["Irigasi".to_string()],
            },
            badges,
        }
    }

    fn populated() -> ViewState {
        let mut state = ViewState::new();
        let mut ids = SensorIds::new();
        ids.insert(PARAM_PH.to_string(), "PH-01".to_string());
        state.apply_latest(LatestReading {
            reading: reading(27.8),
            badges: BadgeMap::from([(PARAM_PH.to_string(), badge(BadgeKind::Optimal, "Aman 7.2"))]),
            sensor_ids: ids,
        });
        state.apply_prediction(outcome(0.6, BadgeMap::new()), "07:00:00".to_string());
        state.apply_history(vec![HistoryRow::unannotated(reading(26.0))]);
        state.set_error("remote error: HTTP 502");
        state
    }

    #[test]
    fn prediction_appends_one_chart_point() {
        let mut state = ViewState::new();
        state.apply_prediction(outcome(0.6, BadgeMap::new()), "07:00:00".to_string());
        assert_eq!(state.chart.len(), 1);
        let point = state.chart.latest().unwrap();
        assert_eq!(point.predicted_value, 0.6);
        assert_eq!(point.time_label, "07:00:00");
        assert_eq!(state.decision.as_ref().map(|d| d.severity), Some(Severity::Safe));
    }

    #[test]
    fn badge_merge_overwrites_matching_keys_only() {
        let mut state = ViewState::new();
        state.merge_badges(BadgeMap::from([
            (PARAM_PH.to_string(), badge(BadgeKind::Unknown, "–")),
            (PARAM_DO.to_string(), badge(BadgeKind::Optimal, "Aman 6.2 mg/L")),
        ]));
        state.merge_badges(BadgeMap::from([(
            PARAM_PH.to_string(),
            badge(BadgeKind::Warning, "Di luar 6.5-8.5"),
        )]));
        assert_eq!(state.badges[PARAM_PH].kind, BadgeKind::Warning);
        assert_eq!(state.badges[PARAM_DO].kind, BadgeKind::Optimal);
    }

    #[test]
    fn badge_merge_is_idempotent() {
        let incoming = BadgeMap::from([(PARAM_DO.to_string(), badge(BadgeKind::Danger, "Bahaya 4.1 mg/L"))]);
        let mut state = populated();
        state.merge_badges(incoming.clone());
        let once = state.badges.clone();
        state.merge_badges(incoming);
        assert_eq!(state.badges, once);
    }

    #[test]
    fn clear_blanks_everything() {
        let mut state = populated();
        state.clear();
        assert!(state.reading.is_none());
        assert!(state.prediction.is_none());
        assert!(state.decision.is_none());
        assert!(state.badges.is_empty());
        assert!(state.sensor_ids.is_empty());
        assert!(state.chart.is_empty());
        assert!(state.rows.is_empty());
        assert!(state.error.is_none());
    }

    #[test]
    fn history_is_capped() {
        let mut state = ViewState::new();
        let rows = (0..80).map(|n| HistoryRow::unannotated(reading(n as f64))).collect();
        state.apply_history(rows);
        assert_eq!(state.rows.len(), HISTORY_CAPACITY);
        assert_eq!(state.rows[0].reading.temp_c, 0.0);
    }

    #[test]
    fn empty_sensor_ids_do_not_wipe_known_ids() {
        let mut state = populated();
        state.apply_latest(LatestReading {
            reading: reading(28.0),
            badges: BadgeMap::new(),
            sensor_ids: SensorIds::new(),
        });
        assert_eq!(state.sensor_ids[PARAM_PH], "PH-01");
        assert_eq!(state.reading.as_ref().map(|r| r.temp_c), Some(28.0));
    }

    #[test]
    fn first_error_of_a_cycle_wins() {
        let mut state = ViewState::new();
        state.begin_cycle();
        state.set_error_if_clear("no IoT data yet");
        state.set_error_if_clear("remote error: HTTP 500");
        assert_eq!(state.error.as_deref(), Some("no IoT data yet"));
        state.finish_cycle(Utc::now());
        assert!(!state.loading);
        assert_eq!(state.phase, RefreshPhase::Idle);
    }

    #[test]
    fn chart_label_prefers_reading_timestamp() {
        let offset = FixedOffset::east_opt(7 * 3600).unwrap();
        let now = dates::parse_timestamp("2025-06-01T12:00:00Z").unwrap();
        assert_eq!(chart_label(&reading(27.8), &offset, now), "07:00:00");

        let mut untimed = reading(27.8);
        untimed.timestamp = None;
        assert_eq!(chart_label(&untimed, &offset, now), "19:00:00");
    }
}
