//! # Size Evidence
//!
//! Converts generic detected-element records from the vision pipeline into
//! typed size evidence: one record per measured axis of a recognized
//! standard component, carrying both its pixel length and its known length
//! in millimeters.
//!
//! ## JSON Input Example
//!
//! ```json
//! [
//!   { "label": "200PFC", "confidence": 0.95,
//!     "measurements": { "height_pixels": 85, "width_pixels": 32 } },
//!   { "label": "450 CTS", "confidence": 0.85,
//!     "measurements": { "spacing_pixels": 189 },
//!     "location": { "x": 1200, "y": 640 } }
//! ]
//! ```

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::standards::{find_spacing, parse_timber_size, steel_section};
use crate::units::{Millimeters, Pixels};

/// Confidence reduction for flange-width evidence relative to depth
pub const FLANGE_CONFIDENCE_FACTOR: f64 = 0.9;

/// Confidence assumed when the detector omits one
const DEFAULT_DETECTION_CONFIDENCE: f64 = 0.5;

fn default_detection_confidence() -> f64 {
    DEFAULT_DETECTION_CONFIDENCE
}

// ============================================================================
// Detector input
// ============================================================================

/// Position of a detection on the sheet (pixel space)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub x: f64,
    pub y: f64,
}

/// Pixel measurements reported for a detected element
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Measurements {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height_pixels: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width_pixels: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spacing_pixels: Option<f64>,
}

impl Measurements {
    /// True when no pixel measurement is present
    pub fn is_empty(&self) -> bool {
        self.height_pixels.is_none() && self.width_pixels.is_none() && self.spacing_pixels.is_none()
    }
}

/// A drawing element as reported by the detection pipeline.
///
/// Unknown fields (e.g. the detector's own `type`) are ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectedElement {
    /// Text label read off the drawing (e.g. "200PFC", "450 CTS")
    pub label: String,

    /// Detector confidence (0-1)
    #[serde(default = "default_detection_confidence")]
    pub confidence: f64,

    #[serde(default)]
    pub measurements: Measurements,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<Location>,
}

impl DetectedElement {
    /// Create an element with no measurements yet
    pub fn new(label: impl Into<String>, confidence: f64) -> Self {
        DetectedElement {
            label: label.into(),
            confidence,
            measurements: Measurements::default(),
            location: None,
        }
    }

    /// Set the measured height (builder pattern)
    pub fn with_height(mut self, pixels: f64) -> Self {
        self.measurements.height_pixels = Some(pixels);
        self
    }

    /// Set the measured width (builder pattern)
    pub fn with_width(mut self, pixels: f64) -> Self {
        self.measurements.width_pixels = Some(pixels);
        self
    }

    /// Set the measured spacing (builder pattern)
    pub fn with_spacing(mut self, pixels: f64) -> Self {
        self.measurements.spacing_pixels = Some(pixels);
        self
    }

    /// Set the location (builder pattern)
    pub fn at(mut self, x: f64, y: f64) -> Self {
        self.location = Some(Location { x, y });
        self
    }
}

// ============================================================================
// Evidence
// ============================================================================

/// Kind of standard component a piece of evidence comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComponentType {
    Steel,
    Timber,
    Spacing,
}

impl std::fmt::Display for ComponentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ComponentType::Steel => "steel",
            ComponentType::Timber => "timber",
            ComponentType::Spacing => "spacing",
        };
        write!(f, "{}", s)
    }
}

/// Axis a pixel length was measured along
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MeasurementAxis {
    Horizontal,
    Vertical,
}

/// One measured length of a recognized standard component.
///
/// Spacing evidence is undirected and has no `measurement_axis`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SizeEvidence {
    /// Normalized identifier (flange evidence is suffixed `_flange`)
    pub label: String,
    pub component_type: ComponentType,
    /// Measured length (px)
    pub pixel_dimension: f64,
    /// Known real-world length (mm)
    pub expected_mm: f64,
    /// Confidence inherited from the detector (0-1)
    pub confidence: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<Location>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub measurement_axis: Option<MeasurementAxis>,
}

impl SizeEvidence {
    /// Pixels per millimeter for this measurement.
    ///
    /// `None` when `expected_mm` is not positive.
    pub fn ratio(&self) -> Option<f64> {
        if self.expected_mm > 0.0 {
            Some(Pixels(self.pixel_dimension).per_mm(Millimeters(self.expected_mm)))
        } else {
            None
        }
    }
}

// ============================================================================
// Extraction
// ============================================================================

/// Accept a measurement only if it is a real, positive pixel length
fn usable(pixels: Option<f64>) -> Option<f64> {
    pixels.filter(|p| p.is_finite() && *p > 0.0)
}

struct ElementContext<'a> {
    label: &'a str,
    confidence: f64,
    location: Option<Location>,
}

impl ElementContext<'_> {
    fn evidence(
        &self,
        label: String,
        component_type: ComponentType,
        pixel_dimension: f64,
        expected_mm: f64,
        confidence: f64,
        measurement_axis: Option<MeasurementAxis>,
    ) -> SizeEvidence {
        SizeEvidence {
            label,
            component_type,
            pixel_dimension,
            expected_mm,
            confidence,
            location: self.location,
            measurement_axis,
        }
    }
}

/// Extract size evidence from detected elements.
///
/// Output order follows the input: element by element, and within an
/// element height, then width, then spacing evidence. Elements that match
/// no standard component, or that carry no usable measurement for the
/// component they match, contribute nothing.
pub fn extract_evidence(elements: &[DetectedElement]) -> Vec<SizeEvidence> {
    let mut evidence = Vec::new();

    for element in elements {
        if element.measurements.is_empty() {
            continue;
        }

        let label = element.label.trim().to_uppercase();
        let confidence = if element.confidence.is_finite() {
            element.confidence.clamp(0.0, 1.0)
        } else {
            DEFAULT_DETECTION_CONFIDENCE
        };
        let ctx = ElementContext {
            label: &label,
            confidence,
            location: element.location,
        };
        let m = &element.measurements;

        extract_steel(&ctx, m, &mut evidence);
        extract_timber(&ctx, m, &mut evidence);
        extract_spacing(&ctx, m, &mut evidence);
    }

    evidence
}

fn extract_steel(ctx: &ElementContext<'_>, m: &Measurements, out: &mut Vec<SizeEvidence>) {
    let Some(section) = steel_section(ctx.label) else {
        return;
    };

    if let Some(px) = usable(m.height_pixels) {
        out.push(ctx.evidence(
            ctx.label.to_string(),
            ComponentType::Steel,
            px,
            section.depth_mm,
            ctx.confidence,
            Some(MeasurementAxis::Vertical),
        ));
    }

    if let (Some(px), Some(flange_mm)) = (usable(m.width_pixels), section.flange_width_mm) {
        out.push(ctx.evidence(
            format!("{}_flange", ctx.label),
            ComponentType::Steel,
            px,
            flange_mm,
            ctx.confidence * FLANGE_CONFIDENCE_FACTOR,
            Some(MeasurementAxis::Horizontal),
        ));
    }
}

fn extract_timber(ctx: &ElementContext<'_>, m: &Measurements, out: &mut Vec<SizeEvidence>) {
    let Some((width_mm, depth_mm)) = parse_timber_size(ctx.label) else {
        return;
    };
    debug!("Parsed timber size from '{}': {}x{}mm", ctx.label, width_mm, depth_mm);

    let height = usable(m.height_pixels);
    let width = usable(m.width_pixels);

    if height.is_none() && width.is_none() {
        warn!("No pixel measurements found for timber '{}'", ctx.label);
        return;
    }

    if let Some(px) = height {
        out.push(ctx.evidence(
            ctx.label.to_string(),
            ComponentType::Timber,
            px,
            depth_mm,
            ctx.confidence,
            Some(MeasurementAxis::Vertical),
        ));
    }

    if let Some(px) = width {
        out.push(ctx.evidence(
            ctx.label.to_string(),
            ComponentType::Timber,
            px,
            width_mm,
            ctx.confidence,
            Some(MeasurementAxis::Horizontal),
        ));
    }
}

fn extract_spacing(ctx: &ElementContext<'_>, m: &Measurements, out: &mut Vec<SizeEvidence>) {
    let Some(spacing) = find_spacing(ctx.label) else {
        return;
    };

    if let Some(px) = usable(m.spacing_pixels) {
        out.push(ctx.evidence(
            ctx.label.to_string(),
            ComponentType::Spacing,
            px,
            spacing.spacing_mm,
            ctx.confidence,
            None,
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ratio_exact() {
        let ev = SizeEvidence {
            label: "200PFC".to_string(),
            component_type: ComponentType::Steel,
            pixel_dimension: 85.0,
            expected_mm: 200.0,
            confidence: 0.95,
            location: None,
            measurement_axis: Some(MeasurementAxis::Vertical),
        };
        assert_eq!(ev.ratio(), Some(85.0 / 200.0));
    }

    #[test]
    fn test_ratio_undefined_for_zero_mm() {
        let ev = SizeEvidence {
            label: "X".to_string(),
            component_type: ComponentType::Timber,
            pixel_dimension: 85.0,
            expected_mm: 0.0,
            confidence: 0.9,
            location: None,
            measurement_axis: None,
        };
        assert_eq!(ev.ratio(), None);
    }

    #[test]
    fn test_steel_depth_and_flange() {
        let elements = vec![DetectedElement::new("200pfc", 0.95).with_height(85.0).with_width(32.0)];
        let evidence = extract_evidence(&elements);

        assert_eq!(evidence.len(), 2);
        assert_eq!(evidence[0].label, "200PFC");
        assert_eq!(evidence[0].expected_mm, 200.0);
        assert_eq!(evidence[0].measurement_axis, Some(MeasurementAxis::Vertical));

        assert_eq!(evidence[1].label, "200PFC_flange");
        assert_eq!(evidence[1].expected_mm, 75.0);
        assert_eq!(evidence[1].measurement_axis, Some(MeasurementAxis::Horizontal));
        assert!((evidence[1].confidence - 0.95 * 0.9).abs() < 1e-12);
    }

    #[test]
    fn test_timber_height_before_width() {
        let elements = vec![DetectedElement::new("200x45", 0.92).with_width(84.0).with_height(19.0)];
        let evidence = extract_evidence(&elements);

        assert_eq!(evidence.len(), 2);
        assert_eq!(evidence[0].measurement_axis, Some(MeasurementAxis::Vertical));
        assert_eq!(evidence[0].expected_mm, 45.0);
        assert_eq!(evidence[1].measurement_axis, Some(MeasurementAxis::Horizontal));
        assert_eq!(evidence[1].expected_mm, 200.0);
        assert!(evidence.iter().all(|e| e.component_type == ComponentType::Timber));
    }

    #[test]
    fn test_timber_without_pixels_emits_nothing() {
        let elements = vec![DetectedElement::new("200x45", 0.9).with_spacing(120.0)];
        assert!(extract_evidence(&elements).is_empty());
    }

    #[test]
    fn test_free_form_timber_size() {
        let elements = vec![DetectedElement::new("175x42 LVL", 0.9).with_width(70.0)];
        let evidence = extract_evidence(&elements);
        assert_eq!(evidence.len(), 1);
        assert_eq!(evidence[0].label, "175X42 LVL");
        assert_eq!(evidence[0].expected_mm, 175.0);
    }

    #[test]
    fn test_spacing_evidence_is_undirected() {
        let elements = vec![DetectedElement::new("450 CTS", 0.85).with_spacing(189.0).at(10.0, 20.0)];
        let evidence = extract_evidence(&elements);

        assert_eq!(evidence.len(), 1);
        assert_eq!(evidence[0].component_type, ComponentType::Spacing);
        assert_eq!(evidence[0].expected_mm, 450.0);
        assert_eq!(evidence[0].measurement_axis, None);
        assert_eq!(evidence[0].location, Some(Location { x: 10.0, y: 20.0 }));
    }

    #[test]
    fn test_timber_with_spacing_yields_both() {
        let elements = vec![DetectedElement::new("200x45 @450", 0.9)
            .with_height(19.0)
            .with_spacing(190.0)];
        let evidence = extract_evidence(&elements);
        assert_eq!(evidence.len(), 2);
        assert_eq!(evidence[0].component_type, ComponentType::Timber);
        assert_eq!(evidence[1].component_type, ComponentType::Spacing);
    }

    #[test]
    fn test_unrecognized_and_empty_elements() {
        let elements = vec![
            DetectedElement::new("J1", 0.95).with_height(40.0),
            DetectedElement::new("200PFC", 0.95),
        ];
        assert!(extract_evidence(&elements).is_empty());
    }

    #[test]
    fn test_rejects_non_positive_and_non_finite_pixels() {
        let elements = vec![
            DetectedElement::new("200PFC", 0.9).with_height(0.0),
            DetectedElement::new("250PFC", 0.9).with_height(f64::NAN),
            DetectedElement::new("300PFC", 0.9).with_height(-5.0),
        ];
        assert!(extract_evidence(&elements).is_empty());
    }

    #[test]
    fn test_confidence_clamped() {
        let elements = vec![DetectedElement::new("200PFC", 1.7).with_height(85.0)];
        assert_eq!(extract_evidence(&elements)[0].confidence, 1.0);
    }

    #[test]
    fn test_element_order_preserved() {
        let elements = vec![
            DetectedElement::new("@450", 0.8).with_spacing(190.0),
            DetectedElement::new("200PFC", 0.9).with_height(85.0),
        ];
        let evidence = extract_evidence(&elements);
        assert_eq!(evidence[0].component_type, ComponentType::Spacing);
        assert_eq!(evidence[1].component_type, ComponentType::Steel);
    }

    #[test]
    fn test_deserialize_with_defaults() {
        let json = r#"[
            {"label": "200PFC", "type": "steel_section", "measurements": {"height_pixels": 85}},
            {"label": "J1"}
        ]"#;
        let elements: Vec<DetectedElement> = serde_json::from_str(json).unwrap();
        assert_eq!(elements[0].confidence, 0.5);
        assert_eq!(elements[0].measurements.height_pixels, Some(85.0));
        assert!(elements[1].measurements.is_empty());
        assert!(elements[1].location.is_none());
    }
}
