//! # Scalewise CLI
//!
//! Command-line front end over `scale_core`: calibrate a drawing from the
//! detection pipeline's JSON output, optionally fall back to a drawing scale,
//! validate against known measurements, and save the result.
//!
//! ```text
//! scale_cli <detections.json> [--config <file>] [--min-confidence <x>]
//!           [--scale <1:N>] [--validate <points.json>] [--output <file>]
//! scale_cli lookup <label> [dimension]
//! scale_cli references
//! ```
//!
//! Logging goes to stderr via `env_logger` (default level `info`, override
//! with `RUST_LOG`).

use std::path::PathBuf;
use std::process::ExitCode;

use log::info;

use scale_core::errors::{CalibError, CalibResult};
use scale_core::file_io::{load_config, load_detections, load_validation_points, save_result};
use scale_core::standards::{calibration_references, require_dimension, Dimension};
use scale_core::{parse_scale_notation, AutoCalibrator, CalibrationResult, CalibratorConfig, ValidationReport};

const USAGE: &str = "\
Usage:
  scale_cli <detections.json> [--config <file>] [--min-confidence <x>]
            [--scale <1:N>] [--validate <points.json>] [--output <file>]
  scale_cli lookup <label> [dimension]
  scale_cli references";

#[derive(Debug, Default, PartialEq)]
struct CalibrateArgs {
    detections: PathBuf,
    config: Option<PathBuf>,
    min_confidence: Option<f64>,
    scale_factor: Option<f64>,
    validate: Option<PathBuf>,
    output: Option<PathBuf>,
}

#[derive(Debug, PartialEq)]
enum Command {
    Calibrate(CalibrateArgs),
    Lookup { label: String, dimension: Dimension },
    References,
    Help,
}

fn option_value<'a>(iter: &mut impl Iterator<Item = &'a String>, flag: &str) -> CalibResult<&'a String> {
    iter.next().ok_or_else(|| CalibError::missing_field(flag))
}

/// Accepts "1:100" notation or a bare factor such as "100"
fn parse_scale_arg(text: &str) -> CalibResult<f64> {
    parse_scale_notation(text)
        .or_else(|| text.trim().parse::<f64>().ok().filter(|f| f.is_finite() && *f > 0.0))
        .ok_or_else(|| CalibError::invalid_input("--scale", text, "Expected a drawing scale such as 1:100"))
}

fn parse_args(args: &[String]) -> CalibResult<Command> {
    let Some(first) = args.first() else {
        return Ok(Command::Help);
    };

    match first.as_str() {
        "-h" | "--help" | "help" => return Ok(Command::Help),
        "references" => return Ok(Command::References),
        "lookup" => {
            let label = args.get(1).ok_or_else(|| CalibError::missing_field("label"))?;
            let dimension = match args.get(2) {
                Some(d) => d.parse()?,
                None => Dimension::default(),
            };
            return Ok(Command::Lookup {
                label: label.clone(),
                dimension,
            });
        }
        _ => {}
    }

    let mut parsed = CalibrateArgs::default();
    let mut detections = None;
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--config" => parsed.config = Some(PathBuf::from(option_value(&mut iter, arg)?)),
            "--min-confidence" => {
                let value = option_value(&mut iter, arg)?;
                let min = value.parse::<f64>().map_err(|e| {
                    CalibError::invalid_input("--min-confidence", value.as_str(), e.to_string())
                })?;
                parsed.min_confidence = Some(min);
            }
            "--scale" => parsed.scale_factor = Some(parse_scale_arg(option_value(&mut iter, arg)?)?),
            "--validate" => parsed.validate = Some(PathBuf::from(option_value(&mut iter, arg)?)),
            "--output" => parsed.output = Some(PathBuf::from(option_value(&mut iter, arg)?)),
            flag if flag.starts_with("--") => {
                return Err(CalibError::invalid_input("argument", flag, "Unknown option"));
            }
            path => {
                if detections.is_some() {
                    return Err(CalibError::invalid_input("argument", path, "Unexpected extra argument"));
                }
                detections = Some(PathBuf::from(path));
            }
        }
    }

    parsed.detections = detections.ok_or_else(|| CalibError::missing_field("detections file"))?;
    Ok(Command::Calibrate(parsed))
}

fn run(command: Command) -> CalibResult<()> {
    match command {
        Command::Help => println!("{}", USAGE),
        Command::References => {
            println!("{}", serde_json::to_string_pretty(&calibration_references())?);
        }
        Command::Lookup { label, dimension } => {
            let mm = require_dimension(&label, dimension)?;
            println!("{} {}: {} mm", label.trim().to_uppercase(), dimension, mm);
        }
        Command::Calibrate(args) => calibrate(args)?,
    }
    Ok(())
}

fn calibrate(args: CalibrateArgs) -> CalibResult<()> {
    let mut config = match &args.config {
        Some(path) => load_config(path)?,
        None => CalibratorConfig::default(),
    };
    if let Some(min) = args.min_confidence {
        config.min_confidence = min;
    }
    let calibrator = AutoCalibrator::with_config(config)?;

    let elements = load_detections(&args.detections)?;
    info!("Loaded {} detected elements from {}", elements.len(), args.detections.display());

    let result = match args.scale_factor {
        Some(scale) => calibrator.auto_calibrate_or_scale(&elements, scale),
        None => calibrator.auto_calibrate(&elements),
    };

    print_summary(&result);

    if let Some(path) = &args.validate {
        let points = load_validation_points(path)?;
        let report = calibrator.validate_calibration(&result, &points);
        print_validation(&report);
    }

    println!();
    println!("JSON Output:");
    println!("{}", serde_json::to_string_pretty(&result)?);

    if let Some(path) = &args.output {
        save_result(&result, path)?;
        println!();
        println!("Saved calibration to {}", path.display());
    }

    Ok(())
}

fn print_summary(result: &CalibrationResult) {
    println!("═══════════════════════════════════════");
    println!("  DRAWING CALIBRATION");
    println!("═══════════════════════════════════════");
    println!();
    println!("  Status:     {} {}", result.status, status_icon(!result.is_failed()));
    println!("  Method:     {}", result.method);
    if result.is_failed() {
        return;
    }
    println!("  Pixels/mm:  {:.4}", result.pixels_per_mm);
    println!("  mm/pixel:   {:.4}", result.mm_per_pixel);
    println!("  Confidence: {:.0}%", result.confidence * 100.0);
    println!("  References: {}", result.reference_components.join(", "));
    println!();
    println!("  100 px = {:.1} mm", result.convert_pixels_to_mm(100.0));
}

fn print_validation(report: &ValidationReport) {
    println!();
    println!("Validation: {} {}", report.message, status_icon(report.valid));
    if let (Some(avg), Some(max)) = (report.average_error_percent, report.max_error_percent) {
        println!("  Average error: {:.1}%", avg);
        println!("  Max error:     {:.1}%", max);
    }
}

fn status_icon(pass: bool) -> &'static str {
    if pass { "[OK]" } else { "[FAIL]" }
}

fn main() -> ExitCode {
    env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let outcome = parse_args(&args).and_then(run);

    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            if let Ok(json) = serde_json::to_string_pretty(&e) {
                eprintln!();
                eprintln!("Error JSON:");
                eprintln!("{}", json);
            }
            if e.is_recoverable() {
                eprintln!();
                eprintln!("{}", USAGE);
            }
            ExitCode::FAILURE
        }
    }
}
