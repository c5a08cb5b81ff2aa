//! # scale_core - Drawing Scale Auto-Calibration Engine
//!
//! `scale_core` derives a pixel-to-millimeter factor for a scanned structural
//! drawing without a human-entered scale. It recognizes elements whose real
//! size is standardized (steel sections, timber sizes, spacing call-outs),
//! compares their known size in millimeters with their measured size in
//! pixels, and picks the most reliable estimate.
//!
//! ## Design Philosophy
//!
//! - **Stateless**: calibration is a pure function of the detected elements
//! - **JSON-First**: all inputs and outputs implement Serialize/Deserialize
//! - **Failure is data**: "no calibration found" is a `failed` result, not an error
//! - **Static tables**: reference dimensions are read-only process-wide constants
//!
//! ## Quick Start
//!
//! ```rust
//! use scale_core::{AutoCalibrator, DetectedElement};
//!
//! let elements = vec![
//!     DetectedElement::new("200PFC", 0.95).with_height(85.0),
//! ];
//!
//! let result = AutoCalibrator::new().auto_calibrate(&elements);
//! assert!((result.pixels_per_mm - 0.425).abs() < 1e-9);
//!
//! let json = serde_json::to_string_pretty(&result).unwrap();
//! assert!(json.contains("\"auto_calibrated\""));
//! ```
//!
//! ## Modules
//!
//! - [`standards`] - Steel, timber and spacing reference tables
//! - [`evidence`] - Detected elements to typed size evidence
//! - [`estimators`] - Steel, timber and spacing estimators
//! - [`selector`] - Reliability-based candidate selection
//! - [`result`] - Calibration result, conversions and scale fallback
//! - [`validation`] - Accuracy checks against known measurements
//! - [`calibrator`] - The end-to-end entry point
//! - [`config`] - Calibrator settings
//! - [`units`] - Type-safe pixel and millimeter wrappers
//! - [`errors`] - Structured error types
//! - [`file_io`] - JSON loading and atomic result saves

pub mod calibrator;
pub mod candidate;
pub mod config;
pub mod errors;
pub mod estimators;
pub mod evidence;
pub mod file_io;
pub mod result;
pub mod selector;
pub mod standards;
pub mod units;
pub mod validation;

// Re-export commonly used types at crate root for convenience
pub use calibrator::AutoCalibrator;
pub use candidate::{CalibrationCandidate, CalibrationMethod};
pub use config::CalibratorConfig;
pub use errors::{CalibError, CalibResult};
pub use evidence::{extract_evidence, DetectedElement, SizeEvidence};
pub use result::{parse_scale_notation, CalibrationResult, CalibrationStatus};
pub use standards::{lookup_dimension, parse_timber_size, Dimension};
pub use validation::{ValidationPoint, ValidationReport};
