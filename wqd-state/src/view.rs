//! View models derived from [`ViewState`].
//!
//! Pure functions only. The Dioxus components and the terminal renderer
//! both consume these, so wording and formatting live in one place.

use crate::history::{ChartHistory, HistoryRow};
use crate::store::ViewState;
use chrono::FixedOffset;
use wqd_core::config::ColiformUnit;
use wqd_core::model::{
    Badge, Severity, PARAM_COLIFORM_MPN, PARAM_COLIFORM_MV, PARAM_CONDUCTIVITY,
    PARAM_DO, PARAM_PH, PARAM_TEMP,
};
use wqd_core::tier::{gauge_value, Tier};
use wqd_utils::dates;
use wqd_utils::numbers::{format_number, format_optional};

/// Upper bound of the safe coliform band, MPN/100mL.
pub const SAFE_COLIFORM_LIMIT: f64 = 0.70;

/// The safe limit in `unit`. Only defined for MPN/100mL estimates; a
/// millivolt estimate has no comparable threshold.
pub fn safe_limit(unit: ColiformUnit) -> Option<f64> {
    match unit {
        ColiformUnit::MpnPer100ml => Some(SAFE_COLIFORM_LIMIT),
        ColiformUnit::Millivolt => None,
    }
}

pub const NO_VIOLATIONS_TEXT: &str = "No threshold violations detected.";
pub const EMPTY_LIST_TEXT: &str = "–";
pub const DEFAULT_DISCLAIMER: &str =
    "*The microbial prediction is an AI estimate, not a laboratory test result.";
pub const AWAITING_RESULT_TEXT: &str =
    "No result yet. Waiting for the first reading or a manual prediction.";

/// Display name for a parameter key; unknown keys are shown as-is.
pub fn param_label(key: &str) -> &str {
    match key {
        PARAM_TEMP => "Temperature",
        PARAM_DO => "Dissolved Oxygen (DO)",
        PARAM_PH => "pH",
        PARAM_CONDUCTIVITY => "Conductivity",
        PARAM_COLIFORM_MV | PARAM_COLIFORM_MPN => "Total Coliform",
        other => other,
    }
}

fn param_unit(key: &str) -> &'static str {
    match key {
        PARAM_TEMP => "°C",
        PARAM_DO => "mg/L",
        PARAM_CONDUCTIVITY => "µS/cm",
        PARAM_COLIFORM_MV => "mV",
        PARAM_COLIFORM_MPN => "MPN/100mL",
        _ => "",
    }
}

/// One KPI card.
#[derive(Debug, Clone, PartialEq)]
pub struct KpiCardView {
    pub key: &'static str,
    pub title: &'static str,
    pub value: String,
    pub unit: &'static str,
    /// [`Badge::unknown`] when the backend sent none for this parameter
    pub badge: Badge,
    pub tier: Tier,
}

/// Cards in display order: conductivity, temperature, DO, pH, coliform.
pub fn kpi_cards(state: &ViewState, unit: ColiformUnit) -> Vec<KpiCardView> {
    let reading = state.reading.as_ref();
    let coliform_key = unit.wire_field();

    let values: [(&'static str, Option<f64>); 5] = [
        (PARAM_CONDUCTIVITY, reading.map(|r| r.conductivity_uscm)),
        (PARAM_TEMP, reading.map(|r| r.temp_c)),
        (PARAM_DO, reading.map(|r| r.do_mgl)),
        (PARAM_PH, reading.map(|r| r.ph)),
        (coliform_key, reading.and_then(|r| unit.pick(r))),
    ];

    values
        .into_iter()
        .map(|(key, value)| {
            let badge = badge_or_unknown(state, key);
            let tier = Tier::from(badge.kind);
            KpiCardView {
                key,
                title: param_label(key),
                value: format_optional(value),
                unit: param_unit(key),
                badge,
                tier,
            }
        })
        .collect()
}

/// Semicircle gauge state.
#[derive(Debug, Clone, PartialEq)]
pub struct GaugeView {
    /// 0 to 100
    pub value: u8,
    pub label: &'static str,
    pub tier: Tier,
}

pub fn gauge(state: &ViewState) -> GaugeView {
    let decision = state.decision.as_ref();
    let (label, tier) = match decision.map(|d| d.severity) {
        Some(Severity::Safe) => ("POTABLE", Tier::Safe),
        Some(Severity::Warning) => ("NEEDS TREATMENT", Tier::Warning),
        Some(Severity::Danger) => ("NOT POTABLE", Tier::Danger),
        None => ("NO DATA", Tier::Neutral),
    };
    GaugeView {
        value: gauge_value(decision),
        label,
        tier,
    }
}

/// The verdict banner, present once a decision exists.
#[derive(Debug, Clone, PartialEq)]
pub struct VerdictView {
    pub severity: Severity,
    pub title: &'static str,
    pub subtitle: &'static str,
    pub tier: Tier,
    /// e.g. "Predicted total coliform: 0.6 MPN/100mL (CI90 0.4 to 0.8, safe limit ≤ 0.7 MPN/100mL)".
    /// The safe limit is left out for millivolt estimates.
    pub coliform_line: Option<String>,
}

impl VerdictView {
    /// The severity tag shown on the banner: "safe", "warning" or "danger".
    pub fn label(&self) -> &'static str {
        self.severity.as_str()
    }
}

pub fn verdict(state: &ViewState) -> Option<VerdictView> {
    let decision = state.decision.as_ref()?;
    let (title, subtitle) = match decision.severity {
        Severity::Safe => ("WATER IS POTABLE", "Safe to drink"),
        Severity::Warning => ("WATER NEEDS TREATMENT", "Treat before drinking"),
        Severity::Danger => ("WATER IS NOT POTABLE", "Do not drink without further treatment"),
    };
    let coliform_line = state.prediction.as_ref().map(|p| {
        let unit = p.estimate_unit.unit_label();
        let limit = safe_limit(p.estimate_unit)
            .map(|l| format!(", safe limit ≤ {} {}", format_number(l), unit))
            .unwrap_or_default();
        format!(
            "Predicted total coliform: {} {} (CI90 {} to {}{})",
            format_number(p.coliform_estimate),
            unit,
            format_number(p.confidence_low),
            format_number(p.confidence_high),
            limit
        )
    });
    Some(VerdictView {
        severity: decision.severity,
        title,
        subtitle,
        tier: Tier::from(decision.severity),
        coliform_line,
    })
}

/// Reasons, recommendations and alternative uses from the last decision.
#[derive(Debug, Clone, PartialEq)]
pub struct DetectionView {
    pub reasons: Vec<String>,
    pub recommendations: Vec<String>,
    pub alternative_use: Vec<String>,
    pub disclaimer: String,
}

impl DetectionView {
    pub fn reasons_empty_text(&self) -> Option<&'static str> {
        self.reasons.is_empty().then_some(NO_VIOLATIONS_TEXT)
    }

    pub fn recommendations_empty_text(&self) -> Option<&'static str> {
        self.recommendations.is_empty().then_some(EMPTY_LIST_TEXT)
    }
}

pub fn detection(state: &ViewState) -> Option<DetectionView> {
    let decision = state.decision.as_ref()?;
    let disclaimer = state
        .prediction
        .as_ref()
        .and_then(|p| p.disclaimer.clone())
        .filter(|d| !d.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_DISCLAIMER.to_string());
    Some(DetectionView {
        reasons: decision.reasons.clone(),
        recommendations: decision.recommendations.clone(),
        alternative_use: decision.alternative_use.clone(),
        disclaimer,
    })
}

/// One line of the sensor identifier panel.
#[derive(Debug, Clone, PartialEq)]
pub struct SensorIdRow {
    pub label: String,
    pub id: String,
}

pub fn sensor_id_rows(state: &ViewState) -> Vec<SensorIdRow> {
    state
        .sensor_ids
        .iter()
        .map(|(key, id)| SensorIdRow {
            label: param_label(key).to_string(),
            id: id.clone(),
        })
        .collect()
}

/// A formatted history table row.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryTableRow {
    pub timestamp: String,
    pub temp_c: String,
    pub do_mgl: String,
    pub ph: String,
    pub conductivity: String,
    pub coliform: String,
    pub predicted: String,
    /// "low to high", or "–" when the row has no prediction
    pub interval: String,
    pub severity: Option<Severity>,
    pub tier: Tier,
}

impl HistoryTableRow {
    pub fn verdict_text(&self) -> &'static str {
        self.severity.map(|s| s.as_str()).unwrap_or(EMPTY_LIST_TEXT)
    }
}

pub const HISTORY_COLUMNS: [&str; 9] = [
    "Timestamp",
    "Temp (°C)",
    "DO (mg/L)",
    "pH",
    "Cond (µS/cm)",
    "Coliform",
    "Predicted",
    "CI90",
    "Verdict",
];

pub fn history_table(
    rows: &[HistoryRow],
    unit: ColiformUnit,
    offset: &FixedOffset,
) -> Vec<HistoryTableRow> {
    rows.iter()
        .map(|row| {
            let reading = &row.reading;
            let severity = row.decision.as_ref().map(|d| d.severity);
            HistoryTableRow {
                timestamp: dates::display_timestamp(reading.timestamp.as_deref(), offset),
                temp_c: format_number(reading.temp_c),
                do_mgl: format_number(reading.do_mgl),
                ph: format_number(reading.ph),
                conductivity: format_number(reading.conductivity_uscm),
                coliform: format_optional(unit.pick(reading)),
                predicted: row
                    .prediction
                    .as_ref()
                    .map(|p| {
                        format!(
                            "{} {}",
                            format_number(p.coliform_estimate),
                            p.estimate_unit.unit_label()
                        )
                    })
                    .unwrap_or_else(|| EMPTY_LIST_TEXT.to_string()),
                interval: row
                    .prediction
                    .as_ref()
                    .map(|p| {
                        format!(
                            "{} to {}",
                            format_number(p.confidence_low),
                            format_number(p.confidence_high)
                        )
                    })
                    .unwrap_or_else(|| EMPTY_LIST_TEXT.to_string()),
                severity,
                tier: severity.map(Tier::from).unwrap_or(Tier::Neutral),
            }
        })
        .collect()
}

/// Unit of the plotted estimates: the newest point's, or `fallback` while
/// the chart is empty.
pub fn chart_unit(chart: &ChartHistory, fallback: ColiformUnit) -> ColiformUnit {
    chart.latest().map(|p| p.unit).unwrap_or(fallback)
}

/// Chart points as a JSON array for the band chart.
pub fn chart_series_json(chart: &ChartHistory) -> String {
    serde_json::to_string(&chart.to_vec()).unwrap_or_else(|_| "[]".to_string())
}

/// "Last updated" caption, or `None` before the first cycle completes.
pub fn last_updated_text(state: &ViewState, offset: &FixedOffset) -> Option<String> {
    state.last_updated.map(|ts| {
        format!(
            "Last updated {} ({})",
            dates::format_table_timestamp(&ts, offset),
            dates::format_offset(offset)
        )
    })
}

/// Badge to show for `key`, [`Badge::unknown`] when the backend sent none.
pub fn badge_or_unknown(state: &ViewState, key: &str) -> Badge {
    state.badges.get(key).cloned().unwrap_or_else(Badge::unknown)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::HistoryPoint;
    use chrono::{TimeZone, Utc};
    use wqd_core::model::{
        BadgeKind, BadgeMap, Decision, PredictionOutcome, PredictionResult, SensorIds, SensorReading,
    };

    fn reading() -> SensorReading {
        SensorReading {
            temp_c: 27.8,
            do_mgl: 6.2,
            ph: 7.2,
            conductivity_uscm: 1620.0,
            coliform_raw: Some(0.5),
            coliform_converted: None,
            timestamp: Some("2025-01-01T00:00:00Z".to_string()),
        }
    }

    fn outcome(severity: Severity, reasons: Vec<String>) -> PredictionOutcome {
        PredictionOutcome {
            prediction: PredictionResult {
                coliform_estimate: 0.6,
                confidence_low: 0.4,
                confidence_high: 0.8,
                estimate_unit: ColiformUnit::MpnPer100ml,
                disclaimer: None,
            },
            decision: Decision {
                potable: severity == Severity::Safe,
                severity,
                reasons,
                recommendations: Vec::new(),
                alternative_use: vec!["Irrigation".to_string()],
            },
            badges: BadgeMap::new(),
        }
    }

    fn wib() -> FixedOffset {
        FixedOffset::east_opt(7 * 3600).unwrap()
    }

    #[test]
    fn empty_state_shows_placeholders() {
        let state = ViewState::new();
        let cards = kpi_cards(&state, ColiformUnit::Millivolt);
        assert_eq!(cards.len(), 5);
        assert!(cards.iter().all(|c| c.value == "–" && c.tier == Tier::Neutral));
        assert_eq!(gauge(&state).value, 0);
        assert_eq!(gauge(&state).label, "NO DATA");
        assert!(verdict(&state).is_none());
        assert!(detection(&state).is_none());
    }

    #[test]
    fn cards_follow_badges_and_unit() {
        let mut state = ViewState::new();
        state.apply_reading(reading());
        state.merge_badges(BadgeMap::from([(
            PARAM_CONDUCTIVITY.to_string(),
            Badge {
                kind: BadgeKind::High,
                label: "High 1620 µS/cm".to_string(),
            },
        )]));

        let cards = kpi_cards(&state, ColiformUnit::Millivolt);
        assert_eq!(cards[0].title, "Conductivity");
        assert_eq!(cards[0].value, "1,620");
        assert_eq!(cards[0].tier, Tier::Danger);
        assert_eq!(cards[4].value, "0.5");
        assert_eq!(cards[4].unit, "mV");

        let mpn = kpi_cards(&state, ColiformUnit::MpnPer100ml);
        assert_eq!(mpn[4].value, "–");
        assert_eq!(mpn[4].unit, "MPN/100mL");
        assert_eq!(cards[1].badge, Badge::unknown());
    }

    #[test]
    fn safe_verdict_banner() {
        let mut state = ViewState::new();
        state.apply_prediction(outcome(Severity::Safe, Vec::new()), "07:00:00".into());

        let banner = verdict(&state).unwrap();
        assert_eq!(banner.label(), "safe");
        assert_eq!(banner.tier, Tier::Safe);
        let line = banner.coliform_line.unwrap();
        assert!(line.contains("0.6 MPN/100mL"));
        assert!(line.contains("CI90 0.4 to 0.8"));
        assert!(line.contains("≤ 0.7"));
        assert_eq!(gauge(&state).value, 100);
    }

    #[test]
    fn millivolt_estimate_has_no_safe_limit() {
        let mut state = ViewState::new();
        let mut result = outcome(Severity::Safe, Vec::new());
        result.prediction.estimate_unit = ColiformUnit::Millivolt;
        state.apply_prediction(result, "07:00:00".into());

        let line = verdict(&state).unwrap().coliform_line.unwrap();
        assert_eq!(line, "Predicted total coliform: 0.6 mV (CI90 0.4 to 0.8)");
        assert!(!line.contains("MPN"));
        assert_eq!(safe_limit(ColiformUnit::Millivolt), None);
        assert_eq!(safe_limit(ColiformUnit::MpnPer100ml), Some(SAFE_COLIFORM_LIMIT));
    }

    #[test]
    fn detection_empty_states() {
        let mut state = ViewState::new();
        state.apply_prediction(outcome(Severity::Safe, Vec::new()), "07:00:00".into());
        let panel = detection(&state).unwrap();
        assert_eq!(panel.reasons_empty_text(), Some(NO_VIOLATIONS_TEXT));
        assert_eq!(panel.recommendations_empty_text(), Some("–"));
        assert_eq!(panel.alternative_use, vec!["Irrigation".to_string()]);
        assert_eq!(panel.disclaimer, DEFAULT_DISCLAIMER);

        let mut warned = outcome(Severity::Warning, vec!["pH 9.10 out of range".to_string()]);
        warned.prediction.disclaimer = Some("Model v2 estimate".to_string());
        state.apply_prediction(warned, "08:00:00".into());
        let panel = detection(&state).unwrap();
        assert_eq!(panel.reasons_empty_text(), None);
        assert_eq!(panel.disclaimer, "Model v2 estimate");
    }

    #[test]
    fn sensor_ids_use_param_labels() {
        let mut state = ViewState::new();
        state.sensor_ids = SensorIds::from([
            (PARAM_PH.to_string(), "PH-01".to_string()),
            ("turbidity".to_string(), "TB-9".to_string()),
        ]);
        let rows = sensor_id_rows(&state);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].label, "pH");
        assert_eq!(rows[1].label, "turbidity");
    }

    #[test]
    fn history_rows_format_in_offset() {
        let rows = vec![
            HistoryRow::annotated(reading(), outcome(Severity::Danger, Vec::new())),
            HistoryRow::unannotated(SensorReading {
                timestamp: None,
                ..reading()
            }),
        ];
        let table = history_table(&rows, ColiformUnit::Millivolt, &wib());
        assert_eq!(table[0].timestamp, "2025-01-01 07:00:00");
        assert_eq!(table[0].predicted, "0.6 MPN/100mL");
        assert_eq!(table[0].interval, "0.4 to 0.8");
        assert_eq!(table[0].verdict_text(), "danger");
        assert_eq!(table[0].tier, Tier::Danger);
        assert_eq!(table[1].timestamp, "–");
        assert_eq!(table[1].predicted, "–");
        assert_eq!(table[1].verdict_text(), "–");
        assert_eq!(table[1].tier, Tier::Neutral);
    }

    #[test]
    fn chart_json_lists_points_oldest_first() {
        let mut chart = ChartHistory::default();
        for (n, label) in ["07:00:00", "08:00:00"].iter().enumerate() {
            chart.push(HistoryPoint {
                time_label: label.to_string(),
                predicted_value: n as f64,
                ci_low: 0.0,
                ci_high: 1.0,
                unit: ColiformUnit::Millivolt,
            });
        }
        let json: serde_json::Value = serde_json::from_str(&chart_series_json(&chart)).unwrap();
        assert_eq!(json[0]["time_label"], "07:00:00");
        assert_eq!(json[1]["predicted_value"], 1.0);
        assert_eq!(json[1]["unit"], "millivolt");
        assert_eq!(chart_series_json(&ChartHistory::default()), "[]");
        assert_eq!(chart_unit(&chart, ColiformUnit::MpnPer100ml), ColiformUnit::Millivolt);
        assert_eq!(
            chart_unit(&ChartHistory::default(), ColiformUnit::MpnPer100ml),
            ColiformUnit::MpnPer100ml
        );
    }

    #[test]
    fn last_updated_caption() {
        let mut state = ViewState::new();
        assert!(last_updated_text(&state, &wib()).is_none());
        state.finish_cycle(Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap());
        assert_eq!(
            last_updated_text(&state, &wib()).unwrap(),
            "Last updated 2025-01-01 07:00:00 (UTC+07:00)"
        );
    }

    #[test]
    fn missing_badges_default_to_unknown() {
        let mut state = ViewState::new();
        state.apply_reading(reading());
        let cards = kpi_cards(&state, ColiformUnit::Millivolt);
        assert!(cards.iter().all(|c| c.badge == Badge::unknown()));
        assert!(cards.iter().all(|c| c.tier == Tier::Neutral));
        assert_eq!(badge_or_unknown(&state, PARAM_PH), Badge::unknown());
    }
}
