//! # Calibration Validation
//!
//! Checks a calibration against ground-truth measurements: pixel lengths on
//! the sheet whose real size is known independently.
//!
//! A calibration is accepted when the average error is under
//! [`MAX_AVERAGE_ERROR_PERCENT`] and no single point exceeds
//! [`MAX_POINT_ERROR_PERCENT`].
//!
//! ## Example
//!
//! ```rust
//! use scale_core::validation::{validate_points, ValidationPoint};
//!
//! let report = validate_points(1.0 / 0.425, &[ValidationPoint::new(85.0, 200.0)]);
//! assert!(report.valid);
//! ```

use log::debug;
use serde::{Deserialize, Serialize};

/// Acceptance limit on the mean error (%)
pub const MAX_AVERAGE_ERROR_PERCENT: f64 = 5.0;

/// Acceptance limit on any single point's error (%)
pub const MAX_POINT_ERROR_PERCENT: f64 = 10.0;

/// A measured pixel length with its known real-world length
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ValidationPoint {
    pub pixels: f64,
    pub expected_mm: f64,
}

impl ValidationPoint {
    pub fn new(pixels: f64, expected_mm: f64) -> Self {
        ValidationPoint { pixels, expected_mm }
    }

    fn is_usable(&self) -> bool {
        self.pixels.is_finite() && self.expected_mm.is_finite() && self.expected_mm > 0.0
    }
}

/// Error for one validation point
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointError {
    pub expected_mm: f64,
    pub calculated_mm: f64,
    pub error_mm: f64,
    pub error_percent: f64,
}

/// Outcome of validating a calibration.
///
/// The error statistics are absent when no usable point was supplied; such
/// a report is trivially valid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub valid: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub average_error_percent: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_error_percent: Option<f64>,
    #[serde(default)]
    pub errors: Vec<PointError>,
    pub message: String,
}

impl ValidationReport {
    fn trivial(message: &str) -> Self {
        ValidationReport {
            valid: true,
            average_error_percent: None,
            max_error_percent: None,
            errors: Vec::new(),
            message: message.to_string(),
        }
    }
}

/// Validate a `mm_per_pixel` factor against known measurements.
///
/// Points with a non-positive or non-finite `expected_mm` (or non-finite
/// pixels) are skipped.
pub fn validate_points(mm_per_pixel: f64, points: &[ValidationPoint]) -> ValidationReport {
    if points.is_empty() {
        return ValidationReport::trivial("No test measurements provided");
    }

    let errors: Vec<PointError> = points
        .iter()
        .filter(|p| {
            let usable = p.is_usable();
            if !usable {
                debug!("Skipping validation point {:?}", p);
            }
            usable
        })
        .map(|p| {
            let calculated_mm = p.pixels * mm_per_pixel;
            let error_mm = (calculated_mm - p.expected_mm).abs();
            PointError {
                expected_mm: p.expected_mm,
                calculated_mm,
                error_mm,
                error_percent: error_mm / p.expected_mm * 100.0,
            }
        })
        .collect();

    if errors.is_empty() {
        return ValidationReport::trivial("No usable test measurements provided");
    }

    let average = errors.iter().map(|e| e.error_percent).sum::<f64>() / errors.len() as f64;
    let max = errors.iter().map(|e| e.error_percent).fold(0.0_f64, f64::max);
    let valid = average < MAX_AVERAGE_ERROR_PERCENT && max < MAX_POINT_ERROR_PERCENT;

    ValidationReport {
        valid,
        average_error_percent: Some(average),
        max_error_percent: Some(max),
        errors,
        message: if valid {
            "Calibration validated".to_string()
        } else {
            "Calibration accuracy outside acceptable range".to_string()
        },
    }
}
