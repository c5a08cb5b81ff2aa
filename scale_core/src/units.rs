//! # Unit Types
//!
//! Type-safe wrappers for the two length spaces a calibration bridges:
//! measured pixel lengths on the scanned sheet and real-world millimeters.
//! They serialize as bare numbers.
//!
//! ## Example
//!
//! ```rust
//! use scale_core::units::{Millimeters, Pixels};
//!
//! let measured = Pixels(85.0);
//! let depth = Millimeters(200.0);
//! assert!((measured.per_mm(depth) - 0.425).abs() < 1e-12);
//!
//! let sheet = Millimeters(420.0) * 100.0;
//! assert_eq!(sheet.value(), 42000.0);
//! ```

use serde::{Deserialize, Serialize};
use std::ops::Mul;

/// Millimeters per inch (exact)
pub const MM_PER_INCH: f64 = 25.4;

// ============================================================================
// Length Units
// ============================================================================

/// Length measured on the scanned image, in pixels
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Pixels(pub f64);

/// Real-world length in millimeters
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Millimeters(pub f64);

impl Pixels {
    /// Pixels per millimeter for this pixel length against a known real length.
    ///
    /// Returns 0.0 when `real` is not positive so callers never see inf/NaN.
    pub fn per_mm(self, real: Millimeters) -> f64 {
        if real.0 > 0.0 {
            self.0 / real.0
        } else {
            0.0
        }
    }

    /// Number of pixels spanned by `inches` of paper at the given resolution
    pub fn at_dpi(inches: f64, dpi: f64) -> Self {
        Pixels(inches * dpi)
    }
}

impl Millimeters {
    /// Convert to inches
    pub fn to_inches(self) -> f64 {
        self.0 / MM_PER_INCH
    }
}

// ============================================================================
// Arithmetic Implementations
// ============================================================================

macro_rules! impl_arithmetic {
    ($type:ty) => {
        impl Mul<f64> for $type {
            type Output = Self;
            fn mul(self, rhs: f64) -> Self::Output {
                Self(self.0 * rhs)
            }
        }

        impl $type {
            /// Get the raw f64 value
            pub fn value(self) -> f64 {
                self.0
            }
        }
    };
}

impl_arithmetic!(Pixels);
impl_arithmetic!(Millimeters);
