//! Steel Sections Table (AS/NZS 3679.1)
//!
//! Nominal dimensions for hot-rolled Australian steel sections commonly
//! called out on structural drawings. Section depth is the most reliable
//! calibration reference on a drawing since it is drawn to scale and rolled
//! to tight tolerances.
//!
//! ## Supported Families
//!
//! - **PFC**: Parallel Flange Channels
//! - **UB**: Universal Beams
//! - **UC**: Universal Columns
//!
//! All dimensions are in millimeters.

use once_cell::sync::Lazy;
use serde::Serialize;
use std::collections::HashMap;

/// Steel section family
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum SteelFamily {
    /// Parallel Flange Channel
    #[serde(rename = "PFC")]
    Pfc,
    /// Universal Beam
    #[serde(rename = "UB")]
    Ub,
    /// Universal Column
    #[serde(rename = "UC")]
    Uc,
}

impl SteelFamily {
    /// Get display name
    pub fn display_name(&self) -> &'static str {
        match self {
            SteelFamily::Pfc => "Parallel Flange Channel (PFC)",
            SteelFamily::Ub => "Universal Beam (UB)",
            SteelFamily::Uc => "Universal Column (UC)",
        }
    }
}

impl std::fmt::Display for SteelFamily {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Standard steel section with nominal dimensions in mm
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SteelSection {
    /// Designation as written on drawings (e.g., "200PFC", "310UB32")
    pub label: &'static str,

    /// Section family
    pub family: SteelFamily,

    /// Overall depth (mm)
    pub depth_mm: f64,

    /// Flange width (mm), when the section has a measurable flange
    pub flange_width_mm: Option<f64>,

    /// Web thickness (mm)
    pub web_thickness_mm: f64,

    /// Flange thickness (mm)
    pub flange_thickness_mm: f64,
}

impl std::fmt::Display for SteelSection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} - {}mm deep", self.label, self.depth_mm)
    }
}

const fn section(
    label: &'static str,
    family: SteelFamily,
    depth_mm: f64,
    flange_width_mm: f64,
    web_thickness_mm: f64,
    flange_thickness_mm: f64,
) -> SteelSection {
    SteelSection {
        label,
        family,
        depth_mm,
        flange_width_mm: Some(flange_width_mm),
        web_thickness_mm,
        flange_thickness_mm,
    }
}

/// Built-in steel sections, in table order
pub static STEEL_SECTIONS: [SteelSection; 12] = [
    // Parallel Flange Channels
    section("200PFC", SteelFamily::Pfc, 200.0, 75.0, 6.0, 11.0),
    section("250PFC", SteelFamily::Pfc, 250.0, 90.0, 8.0, 13.0),
    section("300PFC", SteelFamily::Pfc, 300.0, 100.0, 9.0, 16.0),
    // Universal Beams
    section("200UB18", SteelFamily::Ub, 198.0, 99.0, 4.5, 7.0),
    section("200UB22", SteelFamily::Ub, 202.0, 133.0, 5.0, 6.8),
    section("200UB25", SteelFamily::Ub, 203.0, 133.0, 5.8, 7.8),
    section("250UB25", SteelFamily::Ub, 248.0, 124.0, 5.0, 8.0),
    section("250UB31", SteelFamily::Ub, 252.0, 146.0, 6.1, 8.6),
    section("310UB32", SteelFamily::Ub, 298.0, 149.0, 5.5, 8.0),
    // Universal Columns
    section("200UC46", SteelFamily::Uc, 203.0, 203.0, 7.2, 11.0),
    section("200UC52", SteelFamily::Uc, 206.0, 204.0, 7.9, 12.5),
    section("250UC72", SteelFamily::Uc, 254.0, 254.0, 8.6, 14.2),
];

static STEEL_INDEX: Lazy<HashMap<&'static str, &'static SteelSection>> =
    Lazy::new(|| STEEL_SECTIONS.iter().map(|s| (s.label, s)).collect());

/// Look up a steel section by designation.
///
/// Matching is exact after trimming and uppercasing, so "200pfc " finds
/// "200PFC" but "200 PFC" does not.
pub fn steel_section(label: &str) -> Option<&'static SteelSection> {
    let key = label.trim().to_uppercase();
    STEEL_INDEX.get(key.as_str()).copied()
}
