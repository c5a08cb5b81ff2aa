//! Calibrator settings.
//!
//! Every field has a default, so a partial JSON file (or `{}`) is a valid
//! configuration:
//!
//! ```json
//! { "min_confidence": 0.75 }
//! ```

use serde::{Deserialize, Serialize};

use crate::errors::{CalibError, CalibResult};
use crate::result::DEFAULT_SCALE_CONFIDENCE;
use crate::selector::DEFAULT_MIN_CONFIDENCE;

/// Settings for [`crate::calibrator::AutoCalibrator`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalibratorConfig {
    /// Candidates below this confidence are discarded (0-1)
    pub min_confidence: f64,

    /// Trust in a drawing scale annotation used for the fallback (0-1)
    pub fallback_confidence: f64,
}

impl Default for CalibratorConfig {
    fn default() -> Self {
        CalibratorConfig {
            min_confidence: DEFAULT_MIN_CONFIDENCE,
            fallback_confidence: DEFAULT_SCALE_CONFIDENCE,
        }
    }
}

impl CalibratorConfig {
    /// Set the minimum confidence (builder pattern)
    pub fn with_min_confidence(mut self, min_confidence: f64) -> Self {
        self.min_confidence = min_confidence;
        self
    }

    /// Check that every field is within range.
    pub fn validate(&self) -> CalibResult<()> {
        check_unit_interval("min_confidence", self.min_confidence)?;
        check_unit_interval("fallback_confidence", self.fallback_confidence)?;
        Ok(())
    }
}

fn check_unit_interval(field: &str, value: f64) -> CalibResult<()> {
    if !(0.0..=1.0).contains(&value) {
        return Err(CalibError::invalid_input(
            field,
            value.to_string(),
            "Must be between 0 and 1",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = CalibratorConfig::default();
        assert_eq!(config.min_confidence, 0.70);
        assert_eq!(config.fallback_confidence, 0.8);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json() {
        let config: CalibratorConfig = serde_json::from_str(r#"{"min_confidence": 0.5}"#).unwrap();
        assert_eq!(config.min_confidence, 0.5);
        assert_eq!(config.fallback_confidence, 0.8);

        let empty: CalibratorConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(empty, CalibratorConfig::default());
    }

    #[test]
    fn test_validation() {
        let err = CalibratorConfig::default().with_min_confidence(1.5).validate().unwrap_err();
        assert_eq!(err.error_code(), "INVALID_INPUT");
        assert!(err.to_string().contains("min_confidence"));

        let nan = CalibratorConfig {
            fallback_confidence: f64::NAN,
            ..Default::default()
        };
        assert!(nan.validate().is_err());
    }
}
