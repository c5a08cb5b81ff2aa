//! # File I/O Module
//!
//! JSON input and output for the command-line front end. The engine itself
//! never touches the filesystem.
//!
//! - **Detections**: either a bare array of detected elements or an object
//!   with a `detected_elements` array
//! - **Validation points**: array of `{pixels, expected_mm}`
//! - **Config**: [`CalibratorConfig`] JSON, validated on load
//! - **Results**: written atomically (write .tmp, sync, rename)
//!
//! ## Example
//!
//! ```rust,no_run
//! use scale_core::calibrator::AutoCalibrator;
//! use scale_core::file_io::{load_detections, save_result};
//! use std::path::Path;
//!
//! let elements = load_detections(Path::new("detections.json"))?;
//! let result = AutoCalibrator::new().auto_calibrate(&elements);
//! save_result(&result, Path::new("calibration.json"))?;
//! # Ok::<(), scale_core::errors::CalibError>(())
//! ```

use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::config::CalibratorConfig;
use crate::errors::{CalibError, CalibResult};
use crate::evidence::DetectedElement;
use crate::result::CalibrationResult;
use crate::validation::ValidationPoint;

#[derive(Deserialize)]
#[serde(untagged)]
enum DetectionFile {
    List(Vec<DetectedElement>),
    Wrapped { detected_elements: Vec<DetectedElement> },
}

/// Read and parse a JSON file
fn read_json<T: DeserializeOwned>(path: &Path) -> CalibResult<T> {
    let mut file = File::open(path)
        .map_err(|e| CalibError::file_error("open", path.display().to_string(), e.to_string()))?;

    let mut contents = String::new();
    file.read_to_string(&mut contents)
        .map_err(|e| CalibError::file_error("read", path.display().to_string(), e.to_string()))?;

    serde_json::from_str(&contents)
        .map_err(|e| CalibError::serialization(format!("Invalid JSON in {}: {}", path.display(), e)))
}

/// Load detected elements produced by the vision pipeline.
pub fn load_detections(path: &Path) -> CalibResult<Vec<DetectedElement>> {
    let elements = match read_json::<DetectionFile>(path)? {
        DetectionFile::List(elements) => elements,
        DetectionFile::Wrapped { detected_elements } => detected_elements,
    };
    Ok(elements)
}

/// Load ground-truth measurements for validation.
pub fn load_validation_points(path: &Path) -> CalibResult<Vec<ValidationPoint>> {
    read_json(path)
}

/// Load and validate calibrator settings.
pub fn load_config(path: &Path) -> CalibResult<CalibratorConfig> {
    let config: CalibratorConfig = read_json(path)?;
    config.validate()?;
    Ok(config)
}

/// Save a calibration result with atomic write semantics.
///
/// 1. Serialize to pretty JSON
/// 2. Write to `<path>.tmp`
/// 3. Sync to disk
/// 4. Rename over `path`
pub fn save_result(result: &CalibrationResult, path: &Path) -> CalibResult<()> {
    let json = serde_json::to_string_pretty(result)?;

    let mut tmp_name = path.as_os_str().to_owned();
    tmp_name.push(".tmp");
    let tmp_path = Path::new(&tmp_name);

    let mut tmp_file = File::create(tmp_path).map_err(|e| {
        CalibError::file_error("create temp file", tmp_path.display().to_string(), e.to_string())
    })?;

    tmp_file.write_all(json.as_bytes()).map_err(|e| {
        CalibError::file_error("write temp file", tmp_path.display().to_string(), e.to_string())
    })?;

    tmp_file.sync_all().map_err(|e| {
        CalibError::file_error("sync temp file", tmp_path.display().to_string(), e.to_string())
    })?;

    fs::rename(tmp_path, path).map_err(|e| {
        let _ = fs::remove_file(tmp_path);
        CalibError::file_error("rename to final", path.display().to_string(), e.to_string())
    })?;

    Ok(())
}
