//! # Auto-Calibration
//!
//! Entry point of the engine. Runs the full pipeline for one drawing:
//!
//! ```text
//! detected elements → evidence → estimators → candidates → selection → result
//! ```
//!
//! Calibration never returns an error: when no candidate is good enough the
//! result has `status == failed`, which is a normal outcome for drawings
//! without recognizable standard components.
//!
//! ## Example
//!
//! ```rust
//! use scale_core::calibrator::AutoCalibrator;
//! use scale_core::evidence::DetectedElement;
//! use scale_core::result::CalibrationStatus;
//!
//! let elements = vec![DetectedElement::new("200PFC", 0.95).with_height(85.0)];
//! let result = AutoCalibrator::new().auto_calibrate(&elements);
//!
//! assert_eq!(result.status, CalibrationStatus::AutoCalibrated);
//! assert!((result.convert_pixels_to_mm(100.0) - 235.294).abs() < 1e-3);
//! ```

use log::{info, warn};

use crate::config::CalibratorConfig;
use crate::errors::CalibResult;
use crate::estimators::run_estimators;
use crate::evidence::{extract_evidence, DetectedElement};
use crate::result::CalibrationResult;
use crate::selector::select_best;
use crate::validation::{ValidationPoint, ValidationReport};

/// Calibrates drawings from detected standard components
#[derive(Debug, Clone, Default)]
pub struct AutoCalibrator {
    config: CalibratorConfig,
}

impl AutoCalibrator {
    /// Calibrator with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Calibrator with custom settings, checked for range.
    pub fn with_config(config: CalibratorConfig) -> CalibResult<Self> {
        config.validate()?;
        Ok(AutoCalibrator { config })
    }

    pub fn config(&self) -> &CalibratorConfig {
        &self.config
    }

    /// Derive the pixel/mm calibration for one drawing.
    pub fn auto_calibrate(&self, elements: &[DetectedElement]) -> CalibrationResult {
        info!("Starting auto-calibration with {} detected elements", elements.len());

        let evidence = extract_evidence(elements);
        info!("Extracted {} components for calibration", evidence.len());

        let candidates = run_estimators(&evidence);
        for candidate in &candidates {
            info!(
                "Calibration method {}: {:.2} pixels/mm (confidence: {:.2})",
                candidate.method, candidate.pixels_per_mm, candidate.confidence
            );
        }

        match select_best(candidates, self.config.min_confidence) {
            Some(best) => CalibrationResult::from_candidate(&best),
            None => {
                warn!("No suitable calibration found");
                CalibrationResult::failed()
            }
        }
    }

    /// Calibrate, falling back to a drawing scale when nothing was found.
    ///
    /// The fallback uses the configured `fallback_confidence`.
    pub fn auto_calibrate_or_scale(&self, elements: &[DetectedElement], scale_factor: f64) -> CalibrationResult {
        let result = self.auto_calibrate(elements);
        if !result.is_failed() {
            return result;
        }
        info!("Falling back to drawing scale 1:{}", scale_factor);
        CalibrationResult::from_scale(scale_factor, Some(self.config.fallback_confidence))
    }

    /// Check a calibration against known measurements.
    pub fn validate_calibration(&self, calibration: &CalibrationResult, points: &[ValidationPoint]) -> ValidationReport {
        calibration.validate(points)
    }
}
