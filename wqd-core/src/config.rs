//! Dashboard configuration.
//!
//! Values come from a key lookup so the CLI can read the process
//! environment at runtime while the browser build bakes them in with
//! `option_env!` at compile time.

use crate::model::{SensorReading, PARAM_COLIFORM_MPN, PARAM_COLIFORM_MV};
use chrono::{FixedOffset, Offset, Utc};
use log::warn;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::time::Duration;

/// Prediction service used when `WQD_API_BASE` is not set.
pub const DEFAULT_API_BASE: &str = "https://water-quality-ai-ejw2.onrender.com";

/// Default re-poll cadence: one hour.
pub const DEFAULT_REFRESH_SECS: u64 = 3600;

/// Chart points and table rows are both capped at this many entries.
pub const HISTORY_CAPACITY: usize = 50;

pub const ENV_API_BASE: &str = "WQD_API_BASE";
pub const ENV_REFRESH_SECS: &str = "WQD_REFRESH_SECS";
pub const ENV_HISTORY_LIMIT: &str = "WQD_HISTORY_LIMIT";
pub const ENV_COLIFORM_UNIT: &str = "WQD_COLIFORM_UNIT";
pub const ENV_SEND_COLIFORM: &str = "WQD_SEND_COLIFORM";
pub const ENV_UTC_OFFSET_MINUTES: &str = "WQD_UTC_OFFSET_MINUTES";

/// Which coliform measurement is forwarded to `POST /predict`.
///
/// Deployed sensors report either a raw millivolt value or an already
/// converted MPN/100mL figure; the two are sent under different fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColiformUnit {
    /// `totalcoliform_mv`, taken from `SensorReading::coliform_raw`
    #[default]
    Millivolt,
    /// `totalcoliform_mpn_100ml`, taken from `SensorReading::coliform_converted`
    MpnPer100ml,
}

impl ColiformUnit {
    /// Request field name for this unit, which is also its badge key.
    pub fn wire_field(&self) -> &'static str {
        match self {
            ColiformUnit::Millivolt => PARAM_COLIFORM_MV,
            ColiformUnit::MpnPer100ml => PARAM_COLIFORM_MPN,
        }
    }

    pub fn unit_label(&self) -> &'static str {
        match self {
            ColiformUnit::Millivolt => "mV",
            ColiformUnit::MpnPer100ml => "MPN/100mL",
        }
    }

    /// The reading's coliform value in this unit, if it has one.
    pub fn pick(&self, reading: &SensorReading) -> Option<f64> {
        match self {
            ColiformUnit::Millivolt => reading.coliform_raw,
            ColiformUnit::MpnPer100ml => reading.coliform_converted,
        }
    }

    /// `(coliform_raw, coliform_converted)` with `value` in this unit's slot.
    pub fn slots(&self, value: Option<f64>) -> (Option<f64>, Option<f64>) {
        match self {
            ColiformUnit::Millivolt => (value, None),
            ColiformUnit::MpnPer100ml => (None, value),
        }
    }
}

impl FromStr for ColiformUnit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mv" | "millivolt" => Ok(ColiformUnit::Millivolt),
            "mpn" | "mpn_100ml" | "mpn/100ml" => Ok(ColiformUnit::MpnPer100ml),
            other => Err(format!("unknown coliform unit '{}' (expected mv or mpn)", other)),
        }
    }
}

/// Everything the client, controller and views need to know about their
/// environment.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardConfig {
    /// Base URL of the prediction / IoT service, without trailing slash
    pub api_base: String,
    pub refresh_interval: Duration,
    /// `limit` passed to `GET /iot/history`
    pub history_limit: usize,
    pub coliform_unit: ColiformUnit,
    /// When false, predict requests never include a coliform field
    pub send_measured_coliform: bool,
    /// Display offset for timestamps, in minutes east of UTC
    pub utc_offset_minutes: i32,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            refresh_interval: Duration::from_secs(DEFAULT_REFRESH_SECS),
            history_limit: HISTORY_CAPACITY,
            coliform_unit: ColiformUnit::default(),
            send_measured_coliform: true,
            utc_offset_minutes: 0,
        }
    }
}

impl DashboardConfig {
    /// Build a config from a key lookup, falling back to defaults.
    ///
    /// Values that fail to parse are logged and ignored.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(base) = lookup(ENV_API_BASE) {
            let base = base.trim();
            if !base.is_empty() {
                config.api_base = base.to_string();
            }
        }
        if let Some(secs) = parse_var::<u64>(&lookup, ENV_REFRESH_SECS) {
            if secs > 0 {
                config.refresh_interval = Duration::from_secs(secs);
            }
        }
        if let Some(limit) = parse_var::<usize>(&lookup, ENV_HISTORY_LIMIT) {
            config.history_limit = limit.clamp(1, HISTORY_CAPACITY);
        }
        if let Some(unit) = parse_var::<ColiformUnit>(&lookup, ENV_COLIFORM_UNIT) {
            config.coliform_unit = unit;
        }
        if let Some(send) = parse_var::<bool>(&lookup, ENV_SEND_COLIFORM) {
            config.send_measured_coliform = send;
        }
        if let Some(offset) = parse_var::<i32>(&lookup, ENV_UTC_OFFSET_MINUTES) {
            config.utc_offset_minutes = offset;
        }

        let base = config.api_base.clone();
        config.with_api_base(base)
    }

    /// Read configuration from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Replace the base URL, normalizing away trailing slashes.
    pub fn with_api_base(mut self, base: impl Into<String>) -> Self {
        self.api_base = base.into().trim_end_matches('/').to_string();
        self
    }

    /// Fixed display offset; out-of-range values fall back to UTC.
    pub fn display_offset(&self) -> FixedOffset {
        self.utc_offset_minutes
            .checked_mul(60)
            .and_then(FixedOffset::east_opt)
            .unwrap_or_else(|| Utc.fix())
    }
}

fn parse_var<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T>
where
    T: FromStr,
{
    let raw = lookup(key)?;
    match raw.trim().parse::<T>() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!("Ignoring {}={:?}: not a valid value", key, raw);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_nothing_is_set() {
        let config = DashboardConfig::from_lookup(|_| None);
        assert_eq!(config, DashboardConfig::default());
        assert_eq!(config.refresh_interval, Duration::from_secs(3600));
        assert_eq!(config.history_limit, 50);
    }

    #[test]
    fn reads_every_key() {
        let config = DashboardConfig::from_lookup(lookup_from(&[
            (ENV_API_BASE, "http://localhost:7860/"),
            (ENV_REFRESH_SECS, "60"),
            (ENV_HISTORY_LIMIT, "20"),
            (ENV_COLIFORM_UNIT, "mpn"),
            (ENV_SEND_COLIFORM, "false"),
            (ENV_UTC_OFFSET_MINUTES, "420"),
        ]));
        assert_eq!(config.api_base, "http://localhost:7860");
        assert_eq!(config.refresh_interval, Duration::from_secs(60));
        assert_eq!(config.history_limit, 20);
        assert_eq!(config.coliform_unit, ColiformUnit::MpnPer100ml);
        assert!(!config.send_measured_coliform);
        assert_eq!(config.display_offset().local_minus_utc(), 420 * 60);
    }

    #[test]
    fn bad_values_fall_back_to_defaults() {
        let config = DashboardConfig::from_lookup(lookup_from(&[
            (ENV_REFRESH_SECS, "soon"),
            (ENV_COLIFORM_UNIT, "cfu"),
            (ENV_HISTORY_LIMIT, "500"),
        ]));
        assert_eq!(config.refresh_interval, Duration::from_secs(DEFAULT_REFRESH_SECS));
        assert_eq!(config.coliform_unit, ColiformUnit::Millivolt);
        assert_eq!(config.history_limit, HISTORY_CAPACITY);
    }

    #[test]
    fn coliform_unit_picks_matching_field() {
        let reading = SensorReading {
            temp_c: 27.8,
            do_mgl: 6.2,
            ph: 7.2,
            conductivity_uscm: 620.0,
            coliform_raw: Some(0.5),
            coliform_converted: Some(1.8),
            timestamp: None,
        };
        assert_eq!(ColiformUnit::Millivolt.pick(&reading), Some(0.5));
        assert_eq!(ColiformUnit::MpnPer100ml.pick(&reading), Some(1.8));
        assert_eq!(ColiformUnit::Millivolt.wire_field(), "totalcoliform_mv");
        assert_eq!(ColiformUnit::MpnPer100ml.slots(Some(2.0)), (None, Some(2.0)));
    }

    #[test]
    fn out_of_range_offset_falls_back_to_utc() {
        let config = DashboardConfig::from_lookup(lookup_from(&[(ENV_UTC_OFFSET_MINUTES, "40000000")]));
        assert_eq!(config.display_offset(), Utc.fix());

        let config = DashboardConfig {
            utc_offset_minutes: 25 * 60,
            ..DashboardConfig::default()
        };
        assert_eq!(config.display_offset(), Utc.fix());

        let config = DashboardConfig {
            utc_offset_minutes: -210,
            ..DashboardConfig::default()
        };
        assert_eq!(config.display_offset().local_minus_utc(), -210 * 60);
    }
}
