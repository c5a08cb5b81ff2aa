//! Candidate selection.
//!
//! Candidates below the confidence threshold are discarded; the rest are
//! ranked by [`CalibrationCandidate::reliability_score`].

use log::info;

use crate::candidate::CalibrationCandidate;

/// Default minimum candidate confidence
pub const DEFAULT_MIN_CONFIDENCE: f64 = 0.70;

/// Pick the most reliable candidate with `confidence >= min_confidence`.
///
/// Candidates are expected in estimator evaluation order; on equal
/// reliability the earlier one wins. Returns `None` when nothing passes the
/// threshold.
pub fn select_best(candidates: Vec<CalibrationCandidate>, min_confidence: f64) -> Option<CalibrationCandidate> {
    let accepted: Vec<CalibrationCandidate> = candidates
        .into_iter()
        .filter(|c| c.confidence >= min_confidence)
        .collect();

    if accepted.is_empty() {
        return None;
    }

    info!("Calibration candidates:");
    let mut best: Option<(f64, CalibrationCandidate)> = None;
    for candidate in accepted {
        let score = candidate.reliability_score();
        info!(
            "  {}: {:.3} px/mm, confidence={:.2}, components={}, score={:.2}",
            candidate.method,
            candidate.pixels_per_mm,
            candidate.confidence,
            candidate.component_count(),
            score
        );
        if best.as_ref().map_or(true, |(top, _)| score > *top) {
            best = Some((score, candidate));
        }
    }

    best.map(|(_, candidate)| candidate)
}
