//! # Calibration Result
//!
//! The engine's output: a pixel/mm factor with its provenance, conversion
//! helpers and accuracy validation. Results are built from a selected
//! candidate, from a drawing scale annotation, from a manual measurement,
//! or as an explicit failure.
//!
//! `status == failed` exactly when the ratio, its reciprocal and the
//! confidence are all zero.
//!
//! ## Example
//!
//! ```rust
//! use scale_core::result::{CalibrationResult, CalibrationStatus};
//!
//! let result = CalibrationResult::from_scale(100.0, None);
//! assert_eq!(result.status, CalibrationStatus::ScaleBased);
//! assert!((result.pixels_per_mm - 4961.0 / 42000.0).abs() < 1e-12);
//! assert!((result.confidence - 0.56).abs() < 1e-12);
//! ```

use log::warn;
use serde::{Deserialize, Serialize};

use crate::candidate::{CalibrationCandidate, CalibrationMethod};
use crate::errors::{CalibError, CalibResult};
use crate::units::{Millimeters, Pixels};
use crate::validation::{validate_points, ValidationPoint, ValidationReport};

// ============================================================================
// Scale fallback constants
// ============================================================================

/// Assumed sheet width for the scale fallback (A3 landscape)
pub const ASSUMED_SHEET_WIDTH_MM: f64 = 420.0;

/// Assumed scan resolution for the scale fallback
pub const ASSUMED_DPI: u32 = 300;

/// Paper size reported with scale-based results
pub const ASSUMED_PAPER_SIZE: &str = "A3";

/// Default confidence in a detected scale annotation
pub const DEFAULT_SCALE_CONFIDENCE: f64 = 0.8;

/// Trust reduction for scale-based results relative to the annotation
pub const SCALE_CONFIDENCE_FACTOR: f64 = 0.7;

/// Maximum measurements recorded in result details
const MAX_DETAIL_MEASUREMENTS: usize = 5;

/// Sheet width in pixels at the assumed resolution (4961 px for A3 at 300 DPI)
pub fn assumed_sheet_width_px() -> Pixels {
    let inches = Millimeters(ASSUMED_SHEET_WIDTH_MM).to_inches();
    Pixels(Pixels::at_dpi(inches, ASSUMED_DPI as f64).value().round())
}

// ============================================================================
// Types
// ============================================================================

/// Lifecycle state of a calibration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CalibrationStatus {
    AutoCalibrated,
    ScaleBased,
    Manual,
    Failed,
}

impl std::fmt::Display for CalibrationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            CalibrationStatus::AutoCalibrated => "auto_calibrated",
            CalibrationStatus::ScaleBased => "scale_based",
            CalibrationStatus::Manual => "manual",
            CalibrationStatus::Failed => "failed",
        };
        write!(f, "{}", s)
    }
}

/// One contributing measurement, as recorded in result details
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeasurementRecord {
    pub component: String,
    pub pixels: f64,
    pub expected_mm: f64,
    pub ratio: f64,
}

/// How a result was derived. Serialized as a plain object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CalibrationDetails {
    /// Evidence-based calibration
    Evidence {
        method: CalibrationMethod,
        component_count: usize,
        variance: f64,
        measurements: Vec<MeasurementRecord>,
    },
    /// Drawing scale on an assumed sheet
    Scale {
        scale_factor: f64,
        assumed_dpi: u32,
        assumed_paper_size: String,
    },
    /// User-entered reference length
    Manual { pixel_length: f64, real_length_mm: f64 },
    /// No calibration could be made
    Unavailable { error: String },
}

/// Final calibration for one drawing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalibrationResult {
    pub method: CalibrationMethod,
    pub pixels_per_mm: f64,
    pub mm_per_pixel: f64,
    pub confidence: f64,
    /// Labels of contributing components, first occurrence order
    pub reference_components: Vec<String>,
    pub calibration_details: CalibrationDetails,
    pub status: CalibrationStatus,
}

/// A ratio usable in both directions: positive, finite, and with a finite
/// non-zero reciprocal
fn is_usable_ratio(pixels_per_mm: f64) -> bool {
    pixels_per_mm.is_finite() && pixels_per_mm > 0.0 && {
        let inverse = 1.0 / pixels_per_mm;
        inverse.is_finite() && inverse > 0.0
    }
}

/// Reciprocal guarded against non-positive ratios
fn reciprocal(pixels_per_mm: f64) -> f64 {
    if pixels_per_mm > 0.0 {
        1.0 / pixels_per_mm
    } else {
        0.0
    }
}

impl CalibrationResult {
    /// Build an auto-calibrated result from the selected candidate.
    ///
    /// A candidate whose ratio cannot be inverted yields [`CalibrationResult::failed`].
    pub fn from_candidate(candidate: &CalibrationCandidate) -> Self {
        if !is_usable_ratio(candidate.pixels_per_mm) {
            warn!(
                "Unusable {} ratio {}, no calibration available",
                candidate.method, candidate.pixels_per_mm
            );
            return Self::failed();
        }

        let mut reference_components: Vec<String> = Vec::new();
        for c in &candidate.components {
            if !reference_components.contains(&c.label) {
                reference_components.push(c.label.clone());
            }
        }

        let measurements = candidate
            .components
            .iter()
            .take(MAX_DETAIL_MEASUREMENTS)
            .map(|c| MeasurementRecord {
                component: c.label.clone(),
                pixels: c.pixel_dimension,
                expected_mm: c.expected_mm,
                ratio: c.ratio().unwrap_or(0.0),
            })
            .collect();

        CalibrationResult {
            method: candidate.method,
            pixels_per_mm: candidate.pixels_per_mm,
            mm_per_pixel: reciprocal(candidate.pixels_per_mm),
            confidence: candidate.confidence,
            reference_components,
            calibration_details: CalibrationDetails::Evidence {
                method: candidate.method,
                component_count: candidate.component_count(),
                variance: candidate.variance,
                measurements,
            },
            status: CalibrationStatus::AutoCalibrated,
        }
    }

    /// The "no calibration" result.
    pub fn failed() -> Self {
        CalibrationResult {
            method: CalibrationMethod::None,
            pixels_per_mm: 0.0,
            mm_per_pixel: 0.0,
            confidence: 0.0,
            reference_components: Vec::new(),
            calibration_details: CalibrationDetails::Unavailable {
                error: "No calibration available".to_string(),
            },
            status: CalibrationStatus::Failed,
        }
    }

    /// Fallback calibration from a drawing scale (100 for 1:100).
    ///
    /// Assumes an A3 sheet scanned at 300 DPI, so it is only a rough
    /// approximation. `confidence` is the trust in the scale annotation
    /// (default 0.8) and is reduced by 30%. A scale that is not positive and
    /// finite, or so extreme that the ratio overflows or underflows, yields
    /// [`CalibrationResult::failed`].
    pub fn from_scale(scale_factor: f64, confidence: Option<f64>) -> Self {
        if !scale_factor.is_finite() || scale_factor <= 0.0 {
            warn!("Invalid scale factor {}, no calibration available", scale_factor);
            return Self::failed();
        }

        let supplied = confidence
            .filter(|c| c.is_finite())
            .unwrap_or(DEFAULT_SCALE_CONFIDENCE)
            .clamp(0.0, 1.0);
        let real_width = Millimeters(ASSUMED_SHEET_WIDTH_MM) * scale_factor;
        let pixels_per_mm = assumed_sheet_width_px().per_mm(real_width);
        if !real_width.value().is_finite() || !is_usable_ratio(pixels_per_mm) {
            warn!("Scale factor {} is out of range, no calibration available", scale_factor);
            return Self::failed();
        }

        CalibrationResult {
            method: CalibrationMethod::ScaleNotation,
            pixels_per_mm,
            mm_per_pixel: reciprocal(pixels_per_mm),
            confidence: supplied * SCALE_CONFIDENCE_FACTOR,
            reference_components: vec![format!("Scale 1:{}", scale_factor)],
            calibration_details: CalibrationDetails::Scale {
                scale_factor,
                assumed_dpi: ASSUMED_DPI,
                assumed_paper_size: ASSUMED_PAPER_SIZE.to_string(),
            },
            status: CalibrationStatus::ScaleBased,
        }
    }

    /// Fallback calibration from scale notation text such as "1:100".
    pub fn from_scale_notation(notation: &str, confidence: Option<f64>) -> CalibResult<Self> {
        let scale_factor = parse_scale_notation(notation).ok_or_else(|| {
            CalibError::invalid_input("scale", notation, "Expected a drawing scale such as 1:100")
        })?;
        Ok(Self::from_scale(scale_factor, confidence))
    }

    /// Calibration from a user-measured reference length.
    pub fn manual(pixel_length: f64, real_length_mm: f64) -> CalibResult<Self> {
        if !pixel_length.is_finite() || pixel_length <= 0.0 {
            return Err(CalibError::invalid_input(
                "pixel_length",
                pixel_length.to_string(),
                "Pixel length must be positive",
            ));
        }
        if !real_length_mm.is_finite() || real_length_mm <= 0.0 {
            return Err(CalibError::invalid_input(
                "real_length_mm",
                real_length_mm.to_string(),
                "Real length must be positive",
            ));
        }

        let pixels_per_mm = Pixels(pixel_length).per_mm(Millimeters(real_length_mm));
        if !is_usable_ratio(pixels_per_mm) {
            return Err(CalibError::invalid_input(
                "pixel_length",
                format!("{} px over {} mm", pixel_length, real_length_mm),
                "Ratio is out of range",
            ));
        }

        Ok(CalibrationResult {
            method: CalibrationMethod::Manual,
            pixels_per_mm,
            mm_per_pixel: reciprocal(pixels_per_mm),
            confidence: 1.0,
            reference_components: Vec::new(),
            calibration_details: CalibrationDetails::Manual {
                pixel_length,
                real_length_mm,
            },
            status: CalibrationStatus::Manual,
        })
    }

    pub fn is_failed(&self) -> bool {
        self.status == CalibrationStatus::Failed
    }

    /// Convert a pixel length to millimeters (0 for a failed calibration)
    pub fn convert_pixels_to_mm(&self, pixels: f64) -> f64 {
        pixels * self.mm_per_pixel
    }

    /// Convert millimeters to a pixel length (0 for a failed calibration)
    pub fn convert_mm_to_pixels(&self, mm: f64) -> f64 {
        mm * self.pixels_per_mm
    }

    pub fn pixels_to_mm(&self, pixels: Pixels) -> Millimeters {
        Millimeters(self.convert_pixels_to_mm(pixels.value()))
    }

    pub fn mm_to_pixels(&self, mm: Millimeters) -> Pixels {
        Pixels(self.convert_mm_to_pixels(mm.value()))
    }

    /// Check this calibration against ground-truth measurements.
    pub fn validate(&self, points: &[ValidationPoint]) -> ValidationReport {
        validate_points(self.mm_per_pixel, points)
    }
}

/// Parse drawing scale notation ("1:100", "1 : 50", "SCALE 1:20") into the
/// scale factor. Returns `None` for anything else or a non-positive scale.
pub fn parse_scale_notation(text: &str) -> Option<f64> {
    let upper = text.trim().to_uppercase();
    let body = upper.strip_prefix("SCALE").unwrap_or(&upper).trim();
    let (paper, real) = body.split_once(':')?;
    let paper: f64 = paper.trim().parse().ok()?;
    let real: f64 = real.trim().parse().ok()?;

    let factor = real / paper;
    if paper > 0.0 && real > 0.0 && factor.is_finite() {
        Some(factor)
    } else {
        None
    }
}
