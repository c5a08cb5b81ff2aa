//! Standard Timber Sizes
//!
//! Nominal width x depth sizes for LVL and machine graded pine per AS 1684
//! and common Australian stock. Drawings label timber members with their
//! size directly ("200x45", "150x45 LVL"), so the label itself carries the
//! dimensions; [`parse_timber_size`] reads them even when the size is not
//! in the table.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

/// Timber material class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum TimberClass {
    /// Laminated Veneer Lumber
    #[serde(rename = "LVL")]
    Lvl,
    /// Machine Graded Pine
    #[serde(rename = "MGP")]
    Mgp,
    /// Size called out without a material class
    #[serde(rename = "TIMBER")]
    Generic,
}

impl TimberClass {
    /// Get display name
    pub fn display_name(&self) -> &'static str {
        match self {
            TimberClass::Lvl => "LVL",
            TimberClass::Mgp => "MGP",
            TimberClass::Generic => "Timber",
        }
    }
}

impl std::fmt::Display for TimberClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Standard timber size (mm)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimberSection {
    /// Size as written on drawings (e.g., "200x45LVL")
    pub label: &'static str,

    /// Material class
    pub class: TimberClass,

    /// Member width (mm), the larger face as labelled
    pub width_mm: f64,

    /// Member depth (mm)
    pub depth_mm: f64,
}

impl std::fmt::Display for TimberSection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} - {}x{}mm", self.label, self.width_mm, self.depth_mm)
    }
}

const fn size(label: &'static str, class: TimberClass, width_mm: f64, depth_mm: f64) -> TimberSection {
    TimberSection {
        label,
        class,
        width_mm,
        depth_mm,
    }
}

/// Built-in timber sizes, in table order
pub static TIMBER_SECTIONS: [TimberSection; 21] = [
    // LVL
    size("150x45LVL", TimberClass::Lvl, 150.0, 45.0),
    size("170x45LVL", TimberClass::Lvl, 170.0, 45.0),
    size("200x45LVL", TimberClass::Lvl, 200.0, 45.0),
    size("240x45LVL", TimberClass::Lvl, 240.0, 45.0),
    size("300x45LVL", TimberClass::Lvl, 300.0, 45.0),
    size("150x63LVL", TimberClass::Lvl, 150.0, 63.0),
    size("200x63LVL", TimberClass::Lvl, 200.0, 63.0),
    size("240x63LVL", TimberClass::Lvl, 240.0, 63.0),
    size("300x63LVL", TimberClass::Lvl, 300.0, 63.0),
    // Treated pine / MGP
    size("70x35", TimberClass::Mgp, 70.0, 35.0),
    size("90x35", TimberClass::Mgp, 90.0, 35.0),
    size("90x45", TimberClass::Mgp, 90.0, 45.0),
    size("120x35", TimberClass::Mgp, 120.0, 35.0),
    size("120x45", TimberClass::Mgp, 120.0, 45.0),
    size("140x45", TimberClass::Mgp, 140.0, 45.0),
    size("190x45", TimberClass::Mgp, 190.0, 45.0),
    // Sizes without a material class
    size("150x45", TimberClass::Generic, 150.0, 45.0),
    size("170x45", TimberClass::Generic, 170.0, 45.0),
    size("200x45", TimberClass::Generic, 200.0, 45.0),
    size("240x45", TimberClass::Generic, 240.0, 45.0),
    size("300x45", TimberClass::Generic, 300.0, 45.0),
];

/// `<width> x <depth>` at the start of a label
static TIMBER_SIZE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([0-9]+)\s*[xX]\s*([0-9]+)").expect("timber size pattern is valid"));

fn compact_upper(s: &str) -> String {
    s.chars().filter(|c| !c.is_whitespace()).collect::<String>().to_uppercase()
}

/// Look up a timber size from the table.
///
/// Whitespace is ignored on both sides and matching is case-insensitive,
/// so "150x45 LVL" finds "150x45LVL".
pub fn timber_section(label: &str) -> Option<&'static TimberSection> {
    let key = compact_upper(label);
    if key.is_empty() {
        return None;
    }
    TIMBER_SECTIONS.iter().find(|s| compact_upper(s.label) == key)
}

/// Parse a free-form timber size label into `(width_mm, depth_mm)`.
///
/// Accepts "200x45", "200 x 45", "200X45" and any trailing text
/// ("150x45 LVL"). The size does not need to exist in the table.
///
/// ```rust
/// use scale_core::standards::parse_timber_size;
///
/// assert_eq!(parse_timber_size("200 X 45"), Some((200.0, 45.0)));
/// assert_eq!(parse_timber_size("175x42 LVL"), Some((175.0, 42.0)));
/// assert_eq!(parse_timber_size("200PFC"), None);
/// ```
pub fn parse_timber_size(text: &str) -> Option<(f64, f64)> {
    let caps = TIMBER_SIZE_RE.captures(text.trim())?;
    let width = caps.get(1)?.as_str().parse::<f64>().ok()?;
    let depth = caps.get(2)?.as_str().parse::<f64>().ok()?;
    Some((width, depth))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_variants() {
        assert_eq!(parse_timber_size("200x45"), Some((200.0, 45.0)));
        assert_eq!(parse_timber_size("200X45"), Some((200.0, 45.0)));
        assert_eq!(parse_timber_size("  200 x 45  "), Some((200.0, 45.0)));
        assert_eq!(parse_timber_size("150x45 LVL"), Some((150.0, 45.0)));
    }

    #[test]
    fn test_parse_free_form_size() {
        // Not in the table, still parsed
        assert!(timber_section("333x77").is_none());
        assert_eq!(parse_timber_size("333x77"), Some((333.0, 77.0)));
    }

    #[test]
    fn test_parse_rejects_non_sizes() {
        assert_eq!(parse_timber_size("200PFC"), None);
        assert_eq!(parse_timber_size("450 CTS"), None);
        assert_eq!(parse_timber_size("J1 200x45"), None);
        assert_eq!(parse_timber_size("x45"), None);
        assert_eq!(parse_timber_size(""), None);
    }

    #[test]
    fn test_table_lookup_ignores_spacing_and_case() {
        let lvl = timber_section("150x45 lvl").unwrap();
        assert_eq!(lvl.class, TimberClass::Lvl);
        assert_eq!(lvl.width_mm, 150.0);

        let mgp = timber_section(" 90 X 45 ").unwrap();
        assert_eq!(mgp.class, TimberClass::Mgp);
        assert_eq!(mgp.depth_mm, 45.0);
    }

    #[test]
    fn test_table_lookup_misses() {
        assert!(timber_section("").is_none());
        assert!(timber_section("200PFC").is_none());
    }

    #[test]
    fn test_display() {
        let t = timber_section("200x63LVL").unwrap();
        assert_eq!(t.to_string(), "200x63LVL - 200x63mm");
    }
}
