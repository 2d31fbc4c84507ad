//! Typed client for the prediction / IoT ingestion service.
//!
//! Transport and decoding are kept apart: each `decode_*` function takes
//! the HTTP status and body text and validates the payload into model
//! types, so the response contract can be exercised without a network.
//!
//! Endpoints:
//! - `GET /iot/latest` → `{data, badges?, sensor_ids?}`, 404 when empty
//! - `GET /iot/history?limit=N` → `{data: [...]}`
//! - `POST /predict` → `{prediction, status_badges, ai_detection}`
//! - `DELETE /iot/clear` → `{deleted?, message?}`
//! - `GET /health` → `{status: "ok"}`

use crate::config::{ColiformUnit, DashboardConfig};
use crate::error::{ApiError, Result};
use crate::model::{
    Badge, ClearAck, Decision, LatestReading, PredictionOutcome, PredictionResult,
    SensorIds, SensorReading, Severity,
};
use log::{debug, warn};
use reqwest::{Client, RequestBuilder};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Per-request timeout for native builds. The browser's fetch has its own.
#[cfg(not(target_arch = "wasm32"))]
const REQUEST_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(60);

/// Remote operations the refresh controller depends on.
///
/// Implemented by [`ApiClient`]; tests substitute scripted fakes.
#[allow(async_fn_in_trait)]
pub trait WaterQualityApi {
    async fn fetch_latest(&self) -> Result<LatestReading>;
    async fn fetch_history(&self, limit: usize) -> Result<Vec<SensorReading>>;
    async fn predict(&self, reading: &SensorReading) -> Result<PredictionOutcome>;
    async fn clear_history(&self) -> Result<ClearAck>;
}

/// Body of `POST /predict`.
///
/// At most one coliform field is present, chosen by [`ColiformUnit`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictRequest {
    pub temp_c: f64,
    pub do_mgl: f64,
    pub ph: f64,
    pub conductivity_uscm: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub totalcoliform_mv: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub totalcoliform_mpn_100ml: Option<f64>,
}

impl PredictRequest {
    pub fn from_reading(reading: &SensorReading, unit: ColiformUnit, send_coliform: bool) -> Self {
        let coliform = if send_coliform { unit.pick(reading) } else { None };
        let (totalcoliform_mv, totalcoliform_mpn_100ml) = unit.slots(coliform);
        PredictRequest {
            temp_c: reading.temp_c,
            do_mgl: reading.do_mgl,
            ph: reading.ph,
            conductivity_uscm: reading.conductivity_uscm,
            totalcoliform_mv,
            totalcoliform_mpn_100ml,
        }
    }
}

// ───────────────────── wire schemas ─────────────────────

#[derive(Debug, Deserialize)]
struct WireReading {
    temp_c: Option<f64>,
    do_mgl: Option<f64>,
    ph: Option<f64>,
    conductivity_uscm: Option<f64>,
    totalcoliform_mv: Option<f64>,
    totalcoliform_mpn_100ml: Option<f64>,
    #[serde(alias = "created_at")]
    timestamp: Option<Value>,
}

impl TryFrom<WireReading> for SensorReading {
    type Error = ApiError;

    fn try_from(wire: WireReading) -> Result<Self> {
        let timestamp = match wire.timestamp {
            Some(Value::String(s)) if !s.trim().is_empty() => Some(s),
            Some(Value::Number(n)) => Some(n.to_string()),
            _ => None,
        };
        Ok(SensorReading {
            temp_c: required("temp_c", wire.temp_c)?,
            do_mgl: required("do_mgl", wire.do_mgl)?,
            ph: required("ph", wire.ph)?,
            conductivity_uscm: required("conductivity_uscm", wire.conductivity_uscm)?,
            coliform_raw: wire.totalcoliform_mv,
            coliform_converted: wire.totalcoliform_mpn_100ml,
            timestamp,
        })
    }
}

#[derive(Debug, Deserialize)]
struct LatestEnvelope {
    data: Option<WireReading>,
    #[serde(default)]
    badges: Value,
    #[serde(default)]
    sensor_ids: Value,
}

#[derive(Debug, Deserialize)]
struct HistoryEnvelope {
    #[serde(default)]
    data: Vec<Value>,
}

#[derive(Debug, Deserialize)]
struct WirePrediction {
    total_coliform_mpn_100ml: Option<f64>,
    total_coliform_mv: Option<f64>,
    ci90_low: Option<f64>,
    ci90_high: Option<f64>,
    disclaimer: Option<String>,
}

#[derive(Debug, Deserialize)]
struct WireDetection {
    potable: Option<bool>,
    severity: Option<String>,
    reasons: Option<Vec<String>>,
    recommendations: Option<Vec<String>>,
    alternative_use: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
struct PredictEnvelope {
    prediction: Option<WirePrediction>,
    #[serde(default)]
    status_badges: Value,
    ai_detection: Option<WireDetection>,
}

#[derive(Debug, Default, Deserialize)]
struct ClearEnvelope {
    #[serde(alias = "deleted_count", alias = "count")]
    deleted: Option<usize>,
    message: Option<String>,
}

fn required<T>(field: &str, value: Option<T>) -> Result<T> {
    value.ok_or_else(|| ApiError::InvalidResponse(format!("missing field `{}`", field)))
}

fn check_status(status: u16) -> Result<()> {
    if (200..300).contains(&status) {
        Ok(())
    } else {
        Err(ApiError::Remote { status })
    }
}

fn sensor_ids_from_value(value: &Value) -> SensorIds {
    let mut ids = SensorIds::new();
    if let Value::Object(map) = value {
        for (key, raw) in map {
            match raw {
                Value::String(s) => {
                    ids.insert(key.clone(), s.clone());
                }
                Value::Number(n) => {
                    ids.insert(key.clone(), n.to_string());
                }
                _ => {}
            }
        }
    }
    ids
}

// ───────────────────── decoders ─────────────────────

/// Decode `GET /iot/latest`.
///
/// A 404, or a 200 whose `data` is null, means nothing has been uploaded yet.
pub fn decode_latest(status: u16, body: &str) -> Result<LatestReading> {
    if status == 404 {
        return Err(ApiError::NotFound);
    }
    check_status(status)?;

    let envelope: LatestEnvelope = serde_json::from_str(body)?;
    let reading = match envelope.data {
        Some(wire) => SensorReading::try_from(wire)?,
        None => return Err(ApiError::NotFound),
    };

    Ok(LatestReading {
        reading,
        badges: Badge::map_from_value(&envelope.badges),
        sensor_ids: sensor_ids_from_value(&envelope.sensor_ids),
    })
}

/// Decode `GET /iot/history`.
///
/// Rows missing a required field are dropped with a warning rather than
/// failing the whole list.
pub fn decode_history(status: u16, body: &str) -> Result<Vec<SensorReading>> {
    check_status(status)?;

    let envelope: HistoryEnvelope = serde_json::from_str(body)?;
    let mut readings = Vec::with_capacity(envelope.data.len());
    for (idx, raw) in envelope.data.into_iter().enumerate() {
        let parsed = serde_json::from_value::<WireReading>(raw)
            .map_err(ApiError::from)
            .and_then(SensorReading::try_from);
        match parsed {
            Ok(reading) => readings.push(reading),
            Err(e) => warn!("Skipping history row {}: {}", idx, e),
        }
    }
    Ok(readings)
}

/// Decode `POST /predict`.
///
/// `prediction.{estimate, ci90_low, ci90_high}` and `ai_detection.potable`
/// are required. A missing `severity` is derived from `potable`.
pub fn decode_predict(status: u16, body: &str) -> Result<PredictionOutcome> {
    check_status(status)?;

    let envelope: PredictEnvelope = serde_json::from_str(body)?;
    let wire_prediction = required("prediction", envelope.prediction)?;
    let wire_detection = required("ai_detection", envelope.ai_detection)?;

    let estimate = match (
        wire_prediction.total_coliform_mpn_100ml,
        wire_prediction.total_coliform_mv,
    ) {
        (Some(mpn), _) => Some((mpn, ColiformUnit::MpnPer100ml)),
        (None, Some(mv)) => Some((mv, ColiformUnit::Millivolt)),
        (None, None) => None,
    };
    let (coliform_estimate, estimate_unit) =
        required("prediction.total_coliform_mpn_100ml", estimate)?;
    let prediction = PredictionResult {
        coliform_estimate,
        estimate_unit,
        confidence_low: required("prediction.ci90_low", wire_prediction.ci90_low)?,
        confidence_high: required("prediction.ci90_high", wire_prediction.ci90_high)?,
        disclaimer: wire_prediction.disclaimer,
    };

    let potable = required("ai_detection.potable", wire_detection.potable)?;
    let severity = match wire_detection.severity.as_deref() {
        Some(tag) => Severity::parse(tag).unwrap_or_else(|| {
            warn!("Unrecognized severity '{}', deriving from potable", tag);
            Severity::from_potable(potable)
        }),
        None => Severity::from_potable(potable),
    };
    let decision = Decision {
        potable,
        severity,
        reasons: wire_detection.reasons.unwrap_or_default(),
        recommendations: wire_detection.recommendations.unwrap_or_default(),
        alternative_use: wire_detection.alternative_use.unwrap_or_default(),
    };

    Ok(PredictionOutcome {
        prediction,
        decision,
        badges: Badge::map_from_value(&envelope.status_badges),
    })
}

/// Decode `DELETE /iot/clear`. Any 2xx is success, whatever the body.
pub fn decode_clear(status: u16, body: &str) -> Result<ClearAck> {
    check_status(status)?;
    let envelope: ClearEnvelope = serde_json::from_str(body).unwrap_or_default();
    Ok(ClearAck {
        deleted: envelope.deleted,
        message: envelope.message,
    })
}

/// Decode `GET /health`.
pub fn decode_health(status: u16, body: &str) -> Result<bool> {
    check_status(status)?;
    let value: Value = serde_json::from_str(body)?;
    Ok(value.get("status").and_then(Value::as_str) == Some("ok"))
}

// ───────────────────── client ─────────────────────

/// HTTP client for the prediction / IoT service. Cheap to clone.
///
/// No retries: each failure is returned to the caller as an [`ApiError`].
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base: String,
    coliform_unit: ColiformUnit,
    send_measured_coliform: bool,
}

impl ApiClient {
    pub fn new(config: &DashboardConfig) -> Result<Self> {
        let builder = Client::builder();
        #[cfg(not(target_arch = "wasm32"))]
        let builder = builder.timeout(REQUEST_TIMEOUT);

        Ok(Self {
            client: builder.build()?,
            base: config.api_base.trim_end_matches('/').to_string(),
            coliform_unit: config.coliform_unit,
            send_measured_coliform: config.send_measured_coliform,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base
    }

    /// The request body `predict` would send for this reading.
    pub fn predict_request(&self, reading: &SensorReading) -> PredictRequest {
        PredictRequest::from_reading(reading, self.coliform_unit, self.send_measured_coliform)
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }

    async fn send(&self, request: RequestBuilder) -> Result<(u16, String)> {
        let response = request.send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;
        debug!("Response {} ({} bytes)", status, body.len());
        Ok((status, body))
    }

    /// `GET /health`; true when the service reports `ok`.
    pub async fn health(&self) -> Result<bool> {
        let (status, body) = self.send(self.client.get(self.url("/health"))).await?;
        decode_health(status, &body)
    }
}

impl WaterQualityApi for ApiClient {
    async fn fetch_latest(&self) -> Result<LatestReading> {
        let (status, body) = self.send(self.client.get(self.url("/iot/latest"))).await?;
        decode_latest(status, &body)
    }

    async fn fetch_history(&self, limit: usize) -> Result<Vec<SensorReading>> {
        let url = self.url(&format!("/iot/history?limit={}", limit));
        let (status, body) = self.send(self.client.get(url)).await?;
        decode_history(status, &body)
    }

    async fn predict(&self, reading: &SensorReading) -> Result<PredictionOutcome> {
        let request = self.predict_request(reading);
        let (status, body) = self
            .send(self.client.post(self.url("/predict")).json(&request))
            .await?;
        decode_predict(status, &body)
    }

    async fn clear_history(&self) -> Result<ClearAck> {
        let (status, body) = self.send(self.client.delete(self.url("/iot/clear"))).await?;
        decode_clear(status, &body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{BadgeKind, PARAM_DO, PARAM_PH};
    use serde_json::json;

    const LATEST_BODY: &str = r#"{
        "data": {
            "temp_c": 27.8,
            "do_mgl": 6.2,
            "ph": 7.2,
            "conductivity_uscm": 620,
            "totalcoliform_mv": 0.5,
            "timestamp": "2025-01-01T00:00:00Z"
        },
        "badges": {"ph": ["optimal", "Aman 7.2"]},
        "sensor_ids": {"ph": "PH-01", "do_mgl": 17}
    }"#;

    const PREDICT_BODY: &str = r#"{
        "prediction": {"total_coliform_mv": 0.6, "ci90_low": 0.4, "ci90_high": 0.8},
        "status_badges": {"do_mgl": ["optimal", "Aman 6.2 mg/L"]},
        "ai_detection": {
            "potable": true,
            "severity": "safe",
            "reasons": [],
            "recommendations": [],
            "alternative_use": []
        }
    }"#;

    fn sample_reading() -> SensorReading {
        SensorReading {
            temp_c: 27.8,
            do_mgl: 6.2,
            ph: 7.2,
            conductivity_uscm: 620.0,
            coliform_raw: Some(0.5),
            coliform_converted: Some(2.0),
            timestamp: None,
        }
    }

    #[test]
    fn latest_decodes_reading_badges_and_ids() {
        let latest = decode_latest(200, LATEST_BODY).unwrap();
        assert_eq!(latest.reading.temp_c, 27.8);
        assert_eq!(latest.reading.conductivity_uscm, 620.0);
        assert_eq!(latest.reading.coliform_raw, Some(0.5));
        assert_eq!(latest.reading.coliform_converted, None);
        assert_eq!(latest.reading.timestamp.as_deref(), Some("2025-01-01T00:00:00Z"));
        assert_eq!(latest.badges[PARAM_PH].kind, BadgeKind::Optimal);
        assert_eq!(latest.sensor_ids[PARAM_PH], "PH-01");
        assert_eq!(latest.sensor_ids[PARAM_DO], "17");
    }

    #[test]
    fn latest_404_is_not_found() {
        assert_eq!(decode_latest(404, "").unwrap_err(), ApiError::NotFound);
        assert_eq!(decode_latest(200, r#"{"data": null}"#).unwrap_err(), ApiError::NotFound);
    }

    #[test]
    fn latest_other_status_is_remote() {
        assert_eq!(
            decode_latest(503, "Service Unavailable").unwrap_err(),
            ApiError::Remote { status: 503 }
        );
    }

    #[test]
    fn latest_missing_required_field_is_invalid() {
        let err = decode_latest(200, r#"{"data": {"temp_c": 27.8, "do_mgl": 6.2, "ph": 7.2}}"#)
            .unwrap_err();
        assert!(matches!(err, ApiError::InvalidResponse(ref m) if m.contains("conductivity_uscm")));
    }

    #[test]
    fn history_skips_malformed_rows() {
        let body = json!({
            "data": [
                {"temp_c": 27.0, "do_mgl": 6.0, "ph": 7.0, "conductivity_uscm": 600},
                {"temp_c": null, "do_mgl": 6.0, "ph": 7.0, "conductivity_uscm": 600},
                {"temp_c": 28.0, "do_mgl": 5.5, "ph": 7.4, "conductivity_uscm": 640, "created_at": "2025-01-01 08:00:00"}
            ]
        })
        .to_string();
        let rows = decode_history(200, &body).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].timestamp.as_deref(), Some("2025-01-01 08:00:00"));
    }

    #[test]
    fn history_non_2xx_is_remote() {
        assert_eq!(decode_history(500, "").unwrap_err(), ApiError::Remote { status: 500 });
    }

    #[test]
    fn predict_decodes_prediction_and_decision() {
        let outcome = decode_predict(200, PREDICT_BODY).unwrap();
        assert_eq!(outcome.prediction.coliform_estimate, 0.6);
        assert_eq!(outcome.prediction.confidence_low, 0.4);
        assert_eq!(outcome.prediction.confidence_high, 0.8);
        assert_eq!(outcome.prediction.estimate_unit, ColiformUnit::Millivolt);
        assert!(outcome.decision.potable);
        assert_eq!(outcome.decision.severity, Severity::Safe);
        assert_eq!(outcome.badges[PARAM_DO].label, "Aman 6.2 mg/L");
    }

    #[test]
    fn predict_without_severity_uses_potable() {
        let body = json!({
            "prediction": {"total_coliform_mpn_100ml": 3.1, "ci90_low": 1.0, "ci90_high": 5.0},
            "ai_detection": {"potable": false, "reasons": ["Total Coliform 3.10 MPN/100mL"]}
        })
        .to_string();
        let outcome = decode_predict(200, &body).unwrap();
        assert_eq!(outcome.prediction.estimate_unit, ColiformUnit::MpnPer100ml);
        assert_eq!(outcome.decision.severity, Severity::Danger);
        assert_eq!(outcome.decision.reasons.len(), 1);
        assert!(outcome.decision.recommendations.is_empty());
        assert!(outcome.badges.is_empty());
    }

    #[test]
    fn predict_missing_interval_is_invalid() {
        let body = json!({
            "prediction": {"total_coliform_mpn_100ml": 0.6, "ci90_high": 0.8},
            "ai_detection": {"potable": true}
        })
        .to_string();
        let err = decode_predict(200, &body).unwrap_err();
        assert!(err.to_string().contains("response not valid"));
        assert!(err.to_string().contains("ci90_low"));
    }

    #[test]
    fn predict_500_is_remote() {
        let err = decode_predict(500, "Internal Server Error").unwrap_err();
        assert_eq!(err, ApiError::Remote { status: 500 });
        assert!(err.to_string().contains("500"));
    }

    #[test]
    fn clear_accepts_any_2xx_body() {
        assert_eq!(decode_clear(200, "").unwrap(), ClearAck::default());
        let ack = decode_clear(200, r#"{"deleted_count": 12, "message": "cleared"}"#).unwrap();
        assert_eq!(ack.deleted, Some(12));
        assert_eq!(ack.message.as_deref(), Some("cleared"));
        assert_eq!(decode_clear(403, "").unwrap_err(), ApiError::Remote { status: 403 });
    }

    #[test]
    fn health_reads_status() {
        assert!(decode_health(200, r#"{"status": "ok"}"#).unwrap());
        assert!(!decode_health(200, r#"{"status": "degraded"}"#).unwrap());
    }

    #[test]
    fn predict_request_sends_configured_unit() {
        let reading = sample_reading();

        let mv = serde_json::to_value(PredictRequest::from_reading(&reading, ColiformUnit::Millivolt, true)).unwrap();
        assert_eq!(mv["totalcoliform_mv"], json!(0.5));
        assert!(mv.get("totalcoliform_mpn_100ml").is_none());

        let mpn = serde_json::to_value(PredictRequest::from_reading(&reading, ColiformUnit::MpnPer100ml, true)).unwrap();
        assert_eq!(mpn["totalcoliform_mpn_100ml"], json!(2.0));
        assert!(mpn.get("totalcoliform_mv").is_none());

        let none = serde_json::to_value(PredictRequest::from_reading(&reading, ColiformUnit::Millivolt, false)).unwrap();
        assert!(none.get("totalcoliform_mv").is_none());
        assert_eq!(none["conductivity_uscm"], json!(620.0));
    }

    #[test]
    fn client_trims_trailing_slash() {
        let config = DashboardConfig::default().with_api_base("http://localhost:7860/");
        let client = ApiClient::new(&config).unwrap();
        assert_eq!(client.base_url(), "http://localhost:7860");
        assert_eq!(client.url("/iot/latest"), "http://localhost:7860/iot/latest");
    }
}
