//! # Estimators
//!
//! Three independent strategies that each turn one kind of size evidence
//! into a pixel/mm candidate, or abstain.
//!
//! | Estimator | Evidence | Base confidence |
//! |-----------|----------|-----------------|
//! | Steel     | steel    | 0.95            |
//! | Timber    | timber   | 0.90            |
//! | Spacing   | spacing  | 0.85            |
//!
//! Every estimator averages the usable ratios of its evidence and penalizes
//! its base confidence by the sample variance:
//!
//! ```text
//! confidence = base × (1 − min(variance × 10, 0.5))
//! ```
//!
//! The spacing estimator additionally needs at least two call-outs, uses only
//! the most common spacing value, and is rewarded for three or more
//! consistent measurements.

use log::{debug, error};
use serde::{Deserialize, Serialize};

use crate::candidate::{CalibrationCandidate, CalibrationMethod};
use crate::errors::{CalibError, CalibResult};
use crate::evidence::{ComponentType, SizeEvidence};

/// Upper bound of the variance penalty on confidence
const MAX_VARIANCE_PENALTY: f64 = 0.5;

/// Spacing consistency bonus
const SPACING_BOOST: f64 = 1.1;
const SPACING_BOOST_CAP: f64 = 0.95;
const SPACING_BOOST_MIN_SAMPLES: usize = 3;
const SPACING_BOOST_MAX_VARIANCE: f64 = 0.01;

/// The fixed set of calibration strategies, in evaluation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Estimator {
    Steel,
    Timber,
    Spacing,
}

impl Estimator {
    /// All estimators in evaluation order (also the selection tie-break order)
    pub const ALL: [Estimator; 3] = [Estimator::Steel, Estimator::Timber, Estimator::Spacing];

    /// Method reported by candidates from this estimator
    pub fn method(&self) -> CalibrationMethod {
        match self {
            Estimator::Steel => CalibrationMethod::SteelSection,
            Estimator::Timber => CalibrationMethod::TimberSize,
            Estimator::Spacing => CalibrationMethod::SpacingPattern,
        }
    }

    /// Evidence type this estimator consumes
    pub fn component_type(&self) -> ComponentType {
        match self {
            Estimator::Steel => ComponentType::Steel,
            Estimator::Timber => ComponentType::Timber,
            Estimator::Spacing => ComponentType::Spacing,
        }
    }

    /// Confidence before the variance penalty
    pub fn base_confidence(&self) -> f64 {
        match self {
            Estimator::Steel => 0.95,
            Estimator::Timber => 0.90,
            Estimator::Spacing => 0.85,
        }
    }

    /// Minimum evidence records of the matching type before estimating
    pub fn min_samples(&self) -> usize {
        match self {
            Estimator::Spacing => 2,
            _ => 1,
        }
    }

    /// Propose a candidate from `evidence`, or `Ok(None)` to abstain.
    ///
    /// Errors only when the statistics come out non-finite; callers should
    /// go through [`run_estimators`], which treats that as abstention.
    pub fn estimate(&self, evidence: &[SizeEvidence]) -> CalibResult<Option<CalibrationCandidate>> {
        let matching: Vec<&SizeEvidence> = evidence
            .iter()
            .filter(|e| e.component_type == self.component_type())
            .collect();

        if matching.is_empty() || matching.len() < self.min_samples() {
            return Ok(None);
        }

        let pool = match self {
            Estimator::Spacing => largest_group(matching),
            _ => matching,
        };

        let (components, ratios): (Vec<SizeEvidence>, Vec<f64>) = pool
            .into_iter()
            .filter_map(|e| match e.ratio() {
                Some(r) if r > 0.0 => Some((e.clone(), r)),
                _ => None,
            })
            .unzip();

        if ratios.is_empty() {
            return Ok(None);
        }

        let avg = mean(&ratios);
        let variance = sample_variance(&ratios, avg);
        if !avg.is_finite() || !variance.is_finite() {
            return Err(CalibError::estimation_failed(
                self.method().as_str(),
                format!("non-finite statistics (mean={}, variance={})", avg, variance),
            ));
        }

        let mut confidence = self.base_confidence() * (1.0 - (variance * 10.0).min(MAX_VARIANCE_PENALTY));
        if *self == Estimator::Spacing
            && ratios.len() >= SPACING_BOOST_MIN_SAMPLES
            && variance < SPACING_BOOST_MAX_VARIANCE
        {
            confidence = (confidence * SPACING_BOOST).min(SPACING_BOOST_CAP);
        }

        debug!(
            "{} estimator: {} samples, mean={:.4} px/mm, variance={:.6}",
            self,
            ratios.len(),
            avg,
            variance
        );

        Ok(Some(CalibrationCandidate {
            method: self.method(),
            components,
            pixels_per_mm: avg,
            confidence,
            variance,
        }))
    }
}

impl std::fmt::Display for Estimator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Estimator::Steel => "steel",
            Estimator::Timber => "timber",
            Estimator::Spacing => "spacing",
        };
        write!(f, "{}", s)
    }
}

/// Run every estimator and collect the candidates, in evaluation order.
///
/// An estimator that errors is logged and counted as abstaining.
pub fn run_estimators(evidence: &[SizeEvidence]) -> Vec<CalibrationCandidate> {
    Estimator::ALL
        .iter()
        .filter_map(|estimator| match estimator.estimate(evidence) {
            Ok(candidate) => candidate,
            Err(e) => {
                error!("Error in {} estimator: {}", estimator, e);
                None
            }
        })
        .collect()
}

/// Group by expected spacing and keep the largest group.
///
/// Groups are kept in first-encountered order so that on a tie the spacing
/// seen first wins.
fn largest_group(evidence: Vec<&SizeEvidence>) -> Vec<&SizeEvidence> {
    let mut groups: Vec<(f64, Vec<&SizeEvidence>)> = Vec::new();
    for e in evidence {
        match groups.iter_mut().find(|(mm, _)| *mm == e.expected_mm) {
            Some((_, members)) => members.push(e),
            None => groups.push((e.expected_mm, vec![e])),
        }
    }

    let mut best: Option<Vec<&SizeEvidence>> = None;
    for (_, members) in groups {
        if best.as_ref().map_or(true, |b| members.len() > b.len()) {
            best = Some(members);
        }
    }
    best.unwrap_or_default()
}

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

/// Unbiased sample variance; 0 for fewer than two values
fn sample_variance(values: &[f64], mean: f64) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (values.len() - 1) as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evidence::{extract_evidence, DetectedElement};

    fn spacing(label: &str, pixels: f64, expected_mm: f64) -> SizeEvidence {
        SizeEvidence {
            label: label.to_string(),
            component_type: ComponentType::Spacing,
            pixel_dimension: pixels,
            expected_mm,
            confidence: 0.85,
            location: None,
            measurement_axis: None,
        }
    }

    #[test]
    fn test_sample_variance() {
        assert_eq!(sample_variance(&[0.5], 0.5), 0.0);
        let v = [1.0, 2.0, 3.0, 4.0];
        assert!((sample_variance(&v, mean(&v)) - 5.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_steel_single_sample() {
        let evidence = extract_evidence(&[DetectedElement::new("200PFC", 0.95).with_height(85.0)]);
        let candidate = Estimator::Steel.estimate(&evidence).unwrap().unwrap();

        assert_eq!(candidate.method, CalibrationMethod::SteelSection);
        assert!((candidate.pixels_per_mm - 0.425).abs() < 1e-12);
        assert_eq!(candidate.variance, 0.0);
        assert!((candidate.confidence - 0.95).abs() < 1e-12);
    }

    #[test]
    fn test_abstains_without_matching_type() {
        let evidence = extract_evidence(&[DetectedElement::new("200PFC", 0.95).with_height(85.0)]);
        assert!(Estimator::Timber.estimate(&evidence).unwrap().is_none());
        assert!(Estimator::Spacing.estimate(&evidence).unwrap().is_none());
        assert!(Estimator::Steel.estimate(&[]).unwrap().is_none());
    }

    #[test]
    fn test_variance_penalty_capped() {
        // Wildly inconsistent timber measurements
        let evidence = extract_evidence(&[
            DetectedElement::new("200x45", 0.9).with_width(84.0),
            DetectedElement::new("200x45", 0.9).with_width(400.0),
        ]);
        let candidate = Estimator::Timber.estimate(&evidence).unwrap().unwrap();
        assert!(candidate.variance > 0.05);
        assert!((candidate.confidence - 0.90 * 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_non_positive_ratios_discarded() {
        let evidence = vec![spacing("A", 0.0, 450.0), spacing("B", 100.0, 0.0)];
        assert!(Estimator::Spacing.estimate(&evidence).unwrap().is_none());
    }

    #[test]
    fn test_spacing_needs_two_records() {
        let evidence = vec![spacing("450 CTS", 189.0, 450.0)];
        assert!(Estimator::Spacing.estimate(&evidence).unwrap().is_none());
    }

    #[test]
    fn test_spacing_largest_group() {
        let evidence = vec![
            spacing("@600", 252.0, 600.0),
            spacing("450 CTS", 189.0, 450.0),
            spacing("@450", 190.0, 450.0),
        ];
        let candidate = Estimator::Spacing.estimate(&evidence).unwrap().unwrap();
        assert_eq!(candidate.component_count(), 2);
        assert!(candidate.components.iter().all(|c| c.expected_mm == 450.0));
    }

    #[test]
    fn test_spacing_tie_first_group_wins() {
        let evidence = vec![
            spacing("@600", 252.0, 600.0),
            spacing("@450", 189.0, 450.0),
            spacing("@600", 253.0, 600.0),
            spacing("@450", 190.0, 450.0),
        ];
        let candidate = Estimator::Spacing.estimate(&evidence).unwrap().unwrap();
        assert!(candidate.components.iter().all(|c| c.expected_mm == 600.0));
    }

    #[test]
    fn test_spacing_consistency_boost() {
        let evidence = vec![
            spacing("450 CTS", 189.0, 450.0),
            spacing("@450", 190.0, 450.0),
            spacing("450 CTS", 188.0, 450.0),
        ];
        let candidate = Estimator::Spacing.estimate(&evidence).unwrap().unwrap();
        let unboosted = 0.85 * (1.0 - candidate.variance * 10.0);
        assert!((candidate.confidence - (unboosted * 1.1).min(0.95)).abs() < 1e-12);
        assert!(candidate.confidence > 0.85);
        assert!(candidate.confidence <= 0.95);
    }

    #[test]
    fn test_spacing_no_boost_when_inconsistent() {
        let evidence = vec![
            spacing("450 CTS", 180.0, 450.0),
            spacing("@450", 250.0, 450.0),
            spacing("450 CTS", 300.0, 450.0),
        ];
        let candidate = Estimator::Spacing.estimate(&evidence).unwrap().unwrap();
        assert_eq!(candidate.component_count(), 3);
        assert!(candidate.variance >= 0.01);

        let expected = 0.85 * (1.0 - (candidate.variance * 10.0).min(0.5));
        assert!((candidate.confidence - expected).abs() < 1e-12);
    }

    #[test]
    fn test_spacing_no_boost_below_three_samples() {
        let evidence = vec![spacing("450 CTS", 189.0, 450.0), spacing("@450", 190.0, 450.0)];
        let candidate = Estimator::Spacing.estimate(&evidence).unwrap().unwrap();
        assert!(candidate.variance < 0.01);

        let expected = 0.85 * (1.0 - candidate.variance * 10.0);
        assert!((candidate.confidence - expected).abs() < 1e-12);
        assert!(candidate.confidence <= 0.85);
    }

    #[test]
    fn test_non_finite_statistics_error() {
        let evidence = vec![SizeEvidence {
            label: "200PFC".to_string(),
            component_type: ComponentType::Steel,
            pixel_dimension: f64::INFINITY,
            expected_mm: 200.0,
            confidence: 0.9,
            location: None,
            measurement_axis: None,
        }];
        let err = Estimator::Steel.estimate(&evidence).unwrap_err();
        assert_eq!(err.error_code(), "ESTIMATION_FAILED");

        // Degrades to abstention when run as a batch
        assert!(run_estimators(&evidence).is_empty());
    }

    #[test]
    fn test_run_estimators_order() {
        let evidence = extract_evidence(&[
            DetectedElement::new("@450", 0.85).with_spacing(189.0),
            DetectedElement::new("@450", 0.85).with_spacing(190.0),
            DetectedElement::new("200x45", 0.9).with_width(84.0),
            DetectedElement::new("200PFC", 0.95).with_height(85.0),
        ]);
        let methods: Vec<_> = run_estimators(&evidence).iter().map(|c| c.method).collect();
        assert_eq!(
            methods,
            vec![
                CalibrationMethod::SteelSection,
                CalibrationMethod::TimberSize,
                CalibrationMethod::SpacingPattern
            ]
        );
    }
}
