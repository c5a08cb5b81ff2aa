//! Calibration methods and candidate estimates.

use serde::{Deserialize, Serialize};

use crate::evidence::SizeEvidence;

/// How a calibration was obtained
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CalibrationMethod {
    /// Steel section depths / flange widths
    SteelSection,
    /// Timber member sizes
    TimberSize,
    /// Repeated spacing call-outs
    SpacingPattern,
    /// Drawing scale annotation on an assumed sheet size
    ScaleNotation,
    /// Entered by a user
    Manual,
    /// No calibration
    None,
}

impl CalibrationMethod {
    /// Identifier as serialized
    pub fn as_str(&self) -> &'static str {
        match self {
            CalibrationMethod::SteelSection => "steel_section",
            CalibrationMethod::TimberSize => "timber_size",
            CalibrationMethod::SpacingPattern => "spacing_pattern",
            CalibrationMethod::ScaleNotation => "scale_notation",
            CalibrationMethod::Manual => "manual",
            CalibrationMethod::None => "none",
        }
    }
}

impl std::fmt::Display for CalibrationMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A pixel/mm estimate proposed by one estimator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalibrationCandidate {
    pub method: CalibrationMethod,

    /// Evidence whose ratios were averaged, in extraction order (never empty)
    pub components: Vec<SizeEvidence>,

    /// Mean of the contributing ratios
    pub pixels_per_mm: f64,

    /// Method base confidence penalized by variance
    pub confidence: f64,

    /// Sample variance of the contributing ratios (0 for a single sample)
    pub variance: f64,
}

impl CalibrationCandidate {
    /// Number of contributing measurements
    pub fn component_count(&self) -> usize {
        self.components.len()
    }

    /// Mean detector confidence of the contributors
    pub fn mean_confidence(&self) -> f64 {
        if self.components.is_empty() {
            return 0.0;
        }
        self.components.iter().map(|c| c.confidence).sum::<f64>() / self.components.len() as f64
    }

    /// Reliability used to rank candidates, in [0, 1].
    ///
    /// `mean_confidence × min(count / 3, 1) × max(0, 1 − variance × 10)`:
    /// three or more consistent, confident measurements score highest.
    pub fn reliability_score(&self) -> f64 {
        let count_factor = (self.component_count() as f64 / 3.0).min(1.0);
        let variance_penalty = (1.0 - self.variance * 10.0).max(0.0);
        self.mean_confidence() * count_factor * variance_penalty
    }
}
