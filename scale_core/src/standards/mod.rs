//! # Standard Component Registry
//!
//! Read-only reference tables of structural components whose real-world size
//! is fixed by a standard, and therefore usable as a ruler on a drawing.
//! These tables are the single source of truth for every dimension the
//! calibration engine compares against.
//!
//! ## Tables
//!
//! - [`steel`] - hot-rolled steel sections (depth, flange, web)
//! - [`timber`] - LVL / MGP nominal sizes and the free-form size parser
//! - [`spacing`] - centre-to-centre spacing notations
//!
//! ## Example
//!
//! ```rust
//! use scale_core::standards::{lookup_dimension, Dimension};
//!
//! assert_eq!(lookup_dimension("200PFC", Dimension::Primary), Some(200.0));
//! assert_eq!(lookup_dimension("200PFC", Dimension::Secondary), Some(75.0));
//! assert_eq!(lookup_dimension("150x45 LVL", Dimension::Secondary), Some(45.0));
//! assert_eq!(lookup_dimension("@450", Dimension::Primary), Some(450.0));
//! assert_eq!(lookup_dimension("J1", Dimension::Primary), None);
//! ```

pub mod spacing;
pub mod steel;
pub mod timber;

pub use spacing::{find_spacing, spacing_value, SpacingNotation, STANDARD_SPACINGS};
pub use steel::{steel_section, SteelFamily, SteelSection, STEEL_SECTIONS};
pub use timber::{parse_timber_size, timber_section, TimberClass, TimberSection, TIMBER_SECTIONS};

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::errors::{CalibError, CalibResult};

/// Which dimension of a component to look up
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Dimension {
    /// Depth for steel, width for timber
    #[default]
    Primary,
    /// Flange width for steel, depth for timber
    Secondary,
    Depth,
    Width,
    FlangeWidth,
    WebThickness,
    FlangeThickness,
}

impl Dimension {
    /// All dimension selectors
    pub const ALL: [Dimension; 7] = [
        Dimension::Primary,
        Dimension::Secondary,
        Dimension::Depth,
        Dimension::Width,
        Dimension::FlangeWidth,
        Dimension::WebThickness,
        Dimension::FlangeThickness,
    ];

    /// Field name as used in JSON and on the command line
    pub fn as_str(&self) -> &'static str {
        match self {
            Dimension::Primary => "primary",
            Dimension::Secondary => "secondary",
            Dimension::Depth => "depth",
            Dimension::Width => "width",
            Dimension::FlangeWidth => "flange_width",
            Dimension::WebThickness => "web_thickness",
            Dimension::FlangeThickness => "flange_thickness",
        }
    }
}

impl FromStr for Dimension {
    type Err = CalibError;

    fn from_str(s: &str) -> CalibResult<Self> {
        let key = s.trim().to_lowercase();
        Dimension::ALL
            .iter()
            .copied()
            .find(|d| d.as_str() == key)
            .ok_or_else(|| {
                CalibError::invalid_input("dimension", s, "Expected primary, secondary or a named field")
            })
    }
}

impl std::fmt::Display for Dimension {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

fn steel_dimension(section: &SteelSection, which: Dimension) -> Option<f64> {
    match which {
        Dimension::Primary | Dimension::Depth => Some(section.depth_mm),
        Dimension::Secondary | Dimension::FlangeWidth => section.flange_width_mm,
        Dimension::WebThickness => Some(section.web_thickness_mm),
        Dimension::FlangeThickness => Some(section.flange_thickness_mm),
        Dimension::Width => None,
    }
}

fn timber_dimension(section: &TimberSection, which: Dimension) -> Option<f64> {
    match which {
        Dimension::Primary | Dimension::Width => Some(section.width_mm),
        Dimension::Secondary | Dimension::Depth => Some(section.depth_mm),
        _ => None,
    }
}

/// Look up a dimension (mm) of a standard component by its label.
///
/// Tables are searched steel, then timber, then spacing. Spacing notations
/// have a single value which is returned for any `which`. Returns `None`
/// for unknown labels or dimensions the component does not define.
pub fn lookup_dimension(label: &str, which: Dimension) -> Option<f64> {
    if let Some(section) = steel_section(label) {
        return steel_dimension(section, which);
    }
    if let Some(section) = timber_section(label) {
        return timber_dimension(section, which);
    }
    spacing_value(label)
}

/// Like [`lookup_dimension`] but reports why nothing was found.
pub fn require_dimension(label: &str, which: Dimension) -> CalibResult<f64> {
    let known = steel_section(label).is_some()
        || timber_section(label).is_some()
        || spacing_value(label).is_some();
    if !known {
        return Err(CalibError::component_not_found(label.trim()));
    }
    lookup_dimension(label, which).ok_or_else(|| {
        CalibError::invalid_input("dimension", which.as_str(), format!("'{}' does not define this dimension", label.trim()))
    })
}

// ============================================================================
// Calibration references catalogue
// ============================================================================

/// Kind of calibration reference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReferenceKind {
    Steel,
    TimberLvl,
    Spacing,
}

/// A component usable as a calibration reference, with its expected reliability
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalibrationReference {
    pub label: String,
    #[serde(rename = "type")]
    pub kind: ReferenceKind,
    pub primary_dimension: f64,
    pub secondary_dimension: Option<f64>,
    pub reliability: f64,
    pub description: String,
}

/// List every usable calibration reference, most reliable first.
///
/// Steel sections rank highest (rolled to tight tolerances), then LVL, then
/// spacing notations which need several instances to be trusted. Generic and
/// MGP timber sizes are left out since their dressed size varies.
pub fn calibration_references() -> Vec<CalibrationReference> {
    let mut references = Vec::new();

    for s in STEEL_SECTIONS.iter() {
        references.push(CalibrationReference {
            label: s.label.to_string(),
            kind: ReferenceKind::Steel,
            primary_dimension: s.depth_mm,
            secondary_dimension: s.flange_width_mm,
            reliability: 0.95,
            description: s.to_string(),
        });
    }

    for t in TIMBER_SECTIONS.iter().filter(|t| t.class == TimberClass::Lvl) {
        references.push(CalibrationReference {
            label: t.label.to_string(),
            kind: ReferenceKind::TimberLvl,
            primary_dimension: t.width_mm,
            secondary_dimension: Some(t.depth_mm),
            reliability: 0.90,
            description: t.to_string(),
        });
    }

    for s in STANDARD_SPACINGS.iter() {
        references.push(CalibrationReference {
            label: s.notation.to_string(),
            kind: ReferenceKind::Spacing,
            primary_dimension: s.spacing_mm,
            secondary_dimension: None,
            reliability: 0.85,
            description: format!("{} - {}mm centers", s.notation, s.spacing_mm),
        });
    }

    // Stable sort keeps table order within a reliability tier
    references.sort_by(|a, b| b.reliability.total_cmp(&a.reliability));
    references
}
