//! End-to-end calibration scenarios over the public API.

use scale_core::estimators::{run_estimators, Estimator};
use scale_core::evidence::ComponentType;
use scale_core::{
    extract_evidence, AutoCalibrator, CalibrationMethod, CalibrationResult, CalibrationStatus,
    DetectedElement, ValidationPoint,
};

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn steel_drawing() -> Vec<DetectedElement> {
    vec![DetectedElement::new("200PFC", 0.95).with_height(85.0)]
}

#[test]
fn steel_section_calibration() {
    init_logger();
    let result = AutoCalibrator::new().auto_calibrate(&steel_drawing());

    assert_eq!(result.status, CalibrationStatus::AutoCalibrated);
    assert_eq!(result.method, CalibrationMethod::SteelSection);
    assert!((result.pixels_per_mm - 0.425).abs() < 1e-12);
    assert!((result.mm_per_pixel - 2.353).abs() < 1e-3);
    assert!((result.convert_pixels_to_mm(100.0) - 235.3).abs() < 0.05);
    assert_eq!(result.reference_components, vec!["200PFC"]);
}

#[test]
fn mixed_components_prefer_steel() {
    init_logger();
    let elements = vec![
        DetectedElement::new("200PFC", 0.95).with_height(85.0),
        DetectedElement::new("200x45", 0.90).with_width(84.0),
        DetectedElement::new("450 CTS", 0.85).with_spacing(189.0),
    ];
    let calibrator = AutoCalibrator::new();
    let result = calibrator.auto_calibrate(&elements);

    // One steel and one timber measurement each; a single call-out cannot
    // form a spacing pattern
    assert_eq!(result.method, CalibrationMethod::SteelSection);

    let report = calibrator.validate_calibration(
        &result,
        &[
            ValidationPoint::new(85.0, 200.0),
            ValidationPoint::new(84.0, 200.0),
            ValidationPoint::new(189.0, 450.0),
        ],
    );
    assert!(report.valid);
    assert!(report.max_error_percent.unwrap() < 2.0);
}

#[test]
fn repeated_spacing_outranks_single_measurements() {
    init_logger();
    let elements = vec![
        DetectedElement::new("200PFC", 0.95).with_height(85.0),
        DetectedElement::new("200x45", 0.90).with_width(84.0),
        DetectedElement::new("450 CTS", 0.85).with_spacing(189.0),
        DetectedElement::new("@450", 0.83).with_spacing(190.0),
        DetectedElement::new("450 CTS", 0.87).with_spacing(188.0),
    ];
    let result = AutoCalibrator::new().auto_calibrate(&elements);

    // Three consistent call-outs reach full count weight
    assert_eq!(result.method, CalibrationMethod::SpacingPattern);
    assert_eq!(result.reference_components, vec!["450 CTS", "@450"]);
    assert!((result.pixels_per_mm - 0.42).abs() < 1e-3);
}

#[test]
fn validation_of_exact_calibration() {
    let result = AutoCalibrator::new().auto_calibrate(&steel_drawing());
    let report = result.validate(&[ValidationPoint::new(85.0, 200.0)]);

    assert!(report.valid);
    assert!(report.average_error_percent.unwrap().abs() < 1e-9);
    assert_eq!(report.message, "Calibration validated");
}

#[test]
fn scale_fallback() {
    let result = CalibrationResult::from_scale(100.0, None);

    assert_eq!(result.status, CalibrationStatus::ScaleBased);
    assert!((result.pixels_per_mm - 4961.0 / 42000.0).abs() < 1e-12);
    assert!((result.pixels_per_mm - 0.1181).abs() < 1e-4);
    assert!((result.confidence - 0.56).abs() < 1e-12);
}

#[test]
fn no_evidence_fails() {
    init_logger();
    let elements = vec![
        DetectedElement::new("J1", 0.95).with_height(40.0),
        DetectedElement::new("B2", 0.9),
    ];
    let result = AutoCalibrator::new().auto_calibrate(&elements);

    assert!(result.is_failed());
    assert_eq!(result.pixels_per_mm, 0.0);
    assert_eq!(result.mm_per_pixel, 0.0);
    assert_eq!(result.confidence, 0.0);

    assert!(AutoCalibrator::new().auto_calibrate(&[]).is_failed());
}

#[test]
fn spacing_abstains_with_one_record() {
    let elements = vec![
        DetectedElement::new("200PFC", 0.95).with_height(85.0),
        DetectedElement::new("250PFC", 0.95).with_height(106.0),
        DetectedElement::new("200x45", 0.9).with_width(84.0),
        DetectedElement::new("450 CTS", 0.85).with_spacing(189.0),
    ];
    let evidence = extract_evidence(&elements);
    assert_eq!(
        evidence.iter().filter(|e| e.component_type == ComponentType::Spacing).count(),
        1
    );
    assert!(Estimator::Spacing.estimate(&evidence).unwrap().is_none());
    assert!(run_estimators(&evidence)
        .iter()
        .all(|c| c.method != CalibrationMethod::SpacingPattern));
}

#[test]
fn conversion_round_trip() {
    let result = AutoCalibrator::new().auto_calibrate(&steel_drawing());
    for x in [0.5, 12.0, 85.0, 4961.0, 123456.789] {
        let back = result.convert_mm_to_pixels(result.convert_pixels_to_mm(x));
        assert!((back - x).abs() < 1e-9 * x);
    }
}

#[test]
fn ratio_is_exact() {
    let evidence = extract_evidence(&[
        DetectedElement::new("250UB31", 0.9).with_height(107.0).with_width(62.0),
        DetectedElement::new("90x45", 0.9).with_height(19.0),
    ]);
    for e in &evidence {
        assert_eq!(e.ratio(), Some(e.pixel_dimension / e.expected_mm));
    }
    let candidates = run_estimators(&evidence);
    assert!(candidates
        .iter()
        .map(|c| c.reliability_score())
        .all(|s| (0.0..=1.0).contains(&s)));
}

#[test]
fn detections_from_json() {
    init_logger();
    let json = r#"[
        {"label": "200PFC", "type": "steel_section", "confidence": 0.95,
         "measurements": {"height_pixels": 85, "width_pixels": 32}},
        {"label": "200UB25", "type": "steel_section", "confidence": 0.90,
         "measurements": {"height_pixels": 86}},
        {"label": "J1", "type": "joist", "measurements": {"width_mm": 200}}
    ]"#;
    let elements: Vec<DetectedElement> = serde_json::from_str(json).unwrap();
    let result = AutoCalibrator::new().auto_calibrate(&elements);

    assert_eq!(result.method, CalibrationMethod::SteelSection);
    let value = serde_json::to_value(&result).unwrap();
    assert_eq!(value["status"], "auto_calibrated");
    assert_eq!(value["calibration_details"]["component_count"], 3);
    assert_eq!(value["calibration_details"]["measurements"][1]["component"], "200PFC_flange");
}
