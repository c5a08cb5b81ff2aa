//! Standard Spacing Notations
//!
//! Repeating members (joists, rafters, studs) are dimensioned by their
//! centre-to-centre spacing, written as "450CTS", "450 CTS", "@450", etc.

use serde::Serialize;

/// Tokens that mark a label as a spacing call-out
pub const SPACING_MARKERS: [&str; 2] = ["CTS", "@"];

/// Spacing notation and its value in mm
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpacingNotation {
    /// Notation as written on drawings (uppercase)
    pub notation: &'static str,

    /// Centre-to-centre spacing (mm)
    pub spacing_mm: f64,
}

const fn notation(notation: &'static str, spacing_mm: f64) -> SpacingNotation {
    SpacingNotation { notation, spacing_mm }
}

/// Known spacing notations. Order matters: substring scans accept the
/// first entry found in a label.
pub static STANDARD_SPACINGS: [SpacingNotation; 12] = [
    notation("300CTS", 300.0),
    notation("450CTS", 450.0),
    notation("600CTS", 600.0),
    notation("300 CTS", 300.0),
    notation("450 CTS", 450.0),
    notation("600 CTS", 600.0),
    notation("@300", 300.0),
    notation("@450", 450.0),
    notation("@600", 600.0),
    notation("@ 300", 300.0),
    notation("@ 450", 450.0),
    notation("@ 600", 600.0),
];

/// Spacing value for an exact notation match (trimmed, case-insensitive)
pub fn spacing_value(label: &str) -> Option<f64> {
    let key = label.trim().to_uppercase();
    STANDARD_SPACINGS
        .iter()
        .find(|s| s.notation == key)
        .map(|s| s.spacing_mm)
}

/// Check whether an already-normalized label carries a spacing marker
pub fn has_spacing_marker(label: &str) -> bool {
    SPACING_MARKERS.iter().any(|m| label.contains(m))
}

/// Find the first known notation contained in a normalized label.
///
/// Returns `None` unless the label carries a spacing marker, so sizes such
/// as "4500" are never read as spacings on their own.
pub fn find_spacing(label: &str) -> Option<&'static SpacingNotation> {
    if !has_spacing_marker(label) {
        return None;
    }
    STANDARD_SPACINGS.iter().find(|s| label.contains(s.notation))
}
