//! Manual prediction form.
//!
//! Fields are kept as the raw strings typed into the inputs and parsed only
//! on submit.

use wqd_core::config::ColiformUnit;
use wqd_core::model::SensorReading;

/// Raw form values.
#[derive(Debug, Clone, PartialEq)]
pub struct ManualForm {
    pub temp_c: String,
    pub do_mgl: String,
    pub ph: String,
    pub conductivity_uscm: String,
    /// Include the measured coliform value in the request
    pub use_measured_coliform: bool,
    pub coliform: String,
}

impl Default for ManualForm {
    fn default() -> Self {
        Self {
            temp_c: "27.8".to_string(),
            do_mgl: "6.2".to_string(),
            ph: "7.2".to_string(),
            conductivity_uscm: "620".to_string(),
            use_measured_coliform: true,
            coliform: "0".to_string(),
        }
    }
}

fn parse_field(name: &str, raw: &str) -> Result<f64, String> {
    match raw.trim().parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(format!("{} must be a number", name)),
    }
}

impl ManualForm {
    /// Build a reading from the form. The coliform value, when enabled, is
    /// stored in the field matching `unit`.
    pub fn to_reading(&self, unit: ColiformUnit) -> Result<SensorReading, String> {
        let coliform = if self.use_measured_coliform {
            Some(parse_field("Total coliform", &self.coliform)?)
        } else {
            None
        };
        let (coliform_raw, coliform_converted) = unit.slots(coliform);

        Ok(SensorReading {
            temp_c: parse_field("Temperature", &self.temp_c)?,
            do_mgl: parse_field("Dissolved oxygen", &self.do_mgl)?,
            ph: parse_field("pH", &self.ph)?,
            conductivity_uscm: parse_field("Conductivity", &self.conductivity_uscm)?,
            coliform_raw,
            coliform_converted,
            timestamp: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_parse() {
        let reading = ManualForm::default()
            .to_reading(ColiformUnit::MpnPer100ml)
            .unwrap();
        assert_eq!(reading.temp_c, 27.8);
        assert_eq!(reading.conductivity_uscm, 620.0);
        assert_eq!(reading.coliform_converted, Some(0.0));
        assert_eq!(reading.coliform_raw, None);
    }

    #[test]
    fn disabled_coliform_is_omitted() {
        let form = ManualForm {
            use_measured_coliform: false,
            coliform: "not read".to_string(),
            ..ManualForm::default()
        };
        let reading = form.to_reading(ColiformUnit::Millivolt).unwrap();
        assert_eq!(reading.coliform_raw, None);
    }

    #[test]
    fn bad_number_names_the_field() {
        let form = ManualForm {
            ph: "seven".to_string(),
            ..ManualForm::default()
        };
        assert_eq!(
            form.to_reading(ColiformUnit::Millivolt).unwrap_err(),
            "pH must be a number"
        );
    }
}
