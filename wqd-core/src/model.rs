use crate::config::ColiformUnit;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Badge key for water temperature.
pub const PARAM_TEMP: &str = "temp_c";
/// Badge key for dissolved oxygen.
pub const PARAM_DO: &str = "do_mgl";
/// Badge key for pH.
pub const PARAM_PH: &str = "ph";
/// Badge key for conductivity.
pub const PARAM_CONDUCTIVITY: &str = "conductivity_uscm";
/// Badge key for coliform expressed in MPN/100mL.
pub const PARAM_COLIFORM_MPN: &str = "totalcoliform_mpn_100ml";
/// Badge key for the raw coliform sensor voltage.
pub const PARAM_COLIFORM_MV: &str = "totalcoliform_mv";

/// Parameter badges keyed by parameter name (`ph`, `do_mgl`, ...).
pub type BadgeMap = BTreeMap<String, Badge>;

/// Hardware sensor identifiers keyed by parameter name.
pub type SensorIds = BTreeMap<String, String>;

/// One upload from the IoT ingestion endpoint.
///
/// Superseded wholesale on every poll; never edited in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensorReading {
    /// Water temperature in °C
    pub temp_c: f64,
    /// Dissolved oxygen in mg/L
    pub do_mgl: f64,
    pub ph: f64,
    /// Conductivity in µS/cm
    pub conductivity_uscm: f64,
    /// Raw coliform sensor output in millivolts
    pub coliform_raw: Option<f64>,
    /// Coliform converted to MPN/100mL
    pub coliform_converted: Option<f64>,
    /// Upload time as sent by the ingestion service
    pub timestamp: Option<String>,
}

/// Coliform estimate with its 90% confidence interval.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    pub coliform_estimate: f64,
    pub confidence_low: f64,
    pub confidence_high: f64,
    /// Unit of the estimate and its interval, from the response key it was
    /// read from
    #[serde(default)]
    pub estimate_unit: ColiformUnit,
    pub disclaimer: Option<String>,
}

/// Three-level verdict classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Safe,
    Warning,
    Danger,
}

impl Severity {
    /// Parse the wire tag; unrecognized tags yield `None`.
    pub fn parse(tag: &str) -> Option<Severity> {
        match tag.trim().to_ascii_lowercase().as_str() {
            "safe" => Some(Severity::Safe),
            "warning" => Some(Severity::Warning),
            "danger" => Some(Severity::Danger),
            _ => None,
        }
    }

    /// Two-tier fallback for responses that only carry `potable`.
    pub fn from_potable(potable: bool) -> Severity {
        if potable {
            Severity::Safe
        } else {
            Severity::Danger
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Safe => "safe",
            Severity::Warning => "warning",
            Severity::Danger => "danger",
        }
    }
}

/// Potability decision produced by the prediction service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Decision {
    pub potable: bool,
    pub severity: Severity,
    pub reasons: Vec<String>,
    pub recommendations: Vec<String>,
    pub alternative_use: Vec<String>,
}

/// Classification tag attached to a parameter badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BadgeKind {
    Optimal,
    Good,
    Normal,
    Safe,
    Low,
    Warning,
    High,
    Danger,
    Unknown,
}

impl BadgeKind {
    /// Any tag outside the known set is `Unknown`.
    pub fn from_tag(tag: &str) -> BadgeKind {
        match tag.trim().to_ascii_lowercase().as_str() {
            "optimal" => BadgeKind::Optimal,
            "good" => BadgeKind::Good,
            "normal" => BadgeKind::Normal,
            "safe" => BadgeKind::Safe,
            "low" => BadgeKind::Low,
            "warning" => BadgeKind::Warning,
            "high" => BadgeKind::High,
            "danger" => BadgeKind::Danger,
            _ => BadgeKind::Unknown,
        }
    }
}

/// A short classification label for one parameter, e.g. `(optimal, "Aman 7.2")`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Badge {
    pub kind: BadgeKind,
    pub label: String,
}

impl Badge {
    /// The placeholder shown for parameters the backend did not classify.
    pub fn unknown() -> Badge {
        Badge {
            kind: BadgeKind::Unknown,
            label: "–".to_string(),
        }
    }

    /// Read a badge from its wire form.
    ///
    /// The backend serializes badges as `[kind, label]` pairs; an object
    /// `{kind, label}` or a bare kind string is accepted too. Anything else
    /// becomes [`Badge::unknown`].
    pub fn from_value(value: &Value) -> Badge {
        match value {
            Value::Array(items) => {
                let kind = items.first().and_then(Value::as_str);
                let label = items.get(1).and_then(Value::as_str);
                match kind {
                    Some(kind) => Badge {
                        kind: BadgeKind::from_tag(kind),
                        label: label.unwrap_or(kind).to_string(),
                    },
                    None => Badge::unknown(),
                }
            }
            Value::Object(map) => match map.get("kind").and_then(Value::as_str) {
                Some(kind) => Badge {
                    kind: BadgeKind::from_tag(kind),
                    label: map
                        .get("label")
                        .and_then(Value::as_str)
                        .unwrap_or(kind)
                        .to_string(),
                },
                None => Badge::unknown(),
            },
            Value::String(kind) => Badge {
                kind: BadgeKind::from_tag(kind),
                label: kind.clone(),
            },
            _ => Badge::unknown(),
        }
    }

    /// Convert a wire badge object into a [`BadgeMap`], skipping nulls.
    pub fn map_from_value(value: &Value) -> BadgeMap {
        let mut badges = BadgeMap::new();
        if let Value::Object(map) = value {
            for (key, raw) in map {
                if raw.is_null() {
                    continue;
                }
                badges.insert(key.clone(), Badge::from_value(raw));
            }
        }
        badges
    }
}

/// Result of `GET /iot/latest`.
#[derive(Debug, Clone, PartialEq)]
pub struct LatestReading {
    pub reading: SensorReading,
    pub badges: BadgeMap,
    pub sensor_ids: SensorIds,
}

/// Result of `POST /predict`.
#[derive(Debug, Clone, PartialEq)]
pub struct PredictionOutcome {
    pub prediction: PredictionResult,
    pub decision: Decision,
    pub badges: BadgeMap,
}

/// Result of `DELETE /iot/clear`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ClearAck {
    /// Removed-record count, when the server reports one
    pub deleted: Option<usize>,
    pub message: Option<String>,
}
