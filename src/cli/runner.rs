use std::path::Path;

use tracing::info;
use tracing_subscriber::EnvFilter;

use neuroscan::api::{run_directory, run_scan, write_report};
use neuroscan::{PipelineOptions, ScanKind};

use super::args::CliArgs;
use super::errors::AppError;

fn init_logging(args: &CliArgs) {
    if !(args.log || args.verbose) {
        return;
    }
    let default_level = if args.log { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn pipeline_options(args: &CliArgs) -> Result<PipelineOptions, AppError> {
    let mut options = match &args.config {
        Some(path) if !path.exists() => {
            return Err(AppError::ConfigNotFound { path: path.clone() });
        }
        Some(path) => PipelineOptions::from_json_file(path)?,
        None => PipelineOptions::default(),
    };
    if args.no_materialize {
        options.materialize = false;
    }
    Ok(options)
}

fn process_single_file(
    input: &Path,
    output: Option<&Path>,
    kind: ScanKind,
    options: &PipelineOptions,
    verbose: bool,
) -> Result<(), AppError> {
    let report = run_scan(input, kind, options, verbose)?;
    match output {
        Some(output) => {
            write_report(&report, output)?;
            info!("Report written: {:?} -> {:?}", input, output);
        }
        None => {
            let json = serde_json::to_string_pretty(&report).map_err(neuroscan::Error::from)?;
            println!("{json}");
        }
    }
    Ok(())
}

/// Reject flags that belong to the other mode
fn check_mode_arguments(args: &CliArgs) -> Result<(), AppError> {
    let conflict = if args.input.is_some() && args.input_dir.is_some() {
        Some(("--input", "--input-dir"))
    } else if args.input_dir.is_some() && args.output.is_some() {
        Some(("--input-dir", "--output"))
    } else if args.input_dir.is_none() && args.output_dir.is_some() {
        Some(("--input", "--output-dir"))
    } else {
        None
    };
    match conflict {
        Some((first, second)) => Err(AppError::ConflictingArguments { first, second }),
        None => Ok(()),
    }
}

pub fn run(args: CliArgs) -> Result<(), Box<dyn std::error::Error>> {
    init_logging(&args);
    check_mode_arguments(&args)?;

    let options = pipeline_options(&args)?;

    if let Some(input_dir) = &args.input_dir {
        let output_dir = args.output_dir.as_ref().ok_or(AppError::MissingArgument {
            arg: "--output-dir".to_string(),
        })?;

        info!("Starting batch inspection of directory: {:?}", input_dir);
        info!("Output directory: {:?}", output_dir);

        let report = run_directory(
            input_dir,
            output_dir,
            args.kind,
            &options,
            args.continue_on_error,
        )?;

        info!("Batch inspection complete!");
        info!("Processed: {}", report.processed);
        info!("Skipped: {}", report.skipped);
        info!("Errors: {}", report.errors);
    } else {
        let input = args.input.as_ref().ok_or(AppError::MissingArgument {
            arg: "--input".to_string(),
        })?;

        process_single_file(
            input,
            args.output.as_deref(),
            args.kind,
            &options,
            args.verbose,
        )?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn no_materialize_overrides_config() {
        let dir = tempfile::tempdir().unwrap();
        let config = dir.path().join("opts.json");
        std::fs::write(&config, r#"{"materialize": true, "extra": {"fwhm": 6}}"#).unwrap();

        let args = CliArgs::parse_from([
            "neuroscan",
            "--input",
            "scan.nii",
            "--config",
            config.to_str().unwrap(),
            "--no-materialize",
        ]);
        let options = pipeline_options(&args).unwrap();
        assert!(!options.materialize);
        assert_eq!(options.extra.get("fwhm"), Some(&serde_json::json!(6)));
    }

    #[test]
    fn missing_config_is_reported() {
        let args = CliArgs::parse_from(["neuroscan", "--config", "/nonexistent/opts.json"]);
        assert!(matches!(
            pipeline_options(&args),
            Err(AppError::ConfigNotFound { .. })
        ));
    }

    #[test]
    fn kind_parses_from_value_enum() {
        let args = CliArgs::parse_from(["neuroscan", "-i", "bold.nii.gz", "--kind", "functional"]);
        assert_eq!(args.kind, ScanKind::Functional);
    }

    #[test]
    fn output_flags_must_match_mode() {
        let batch_with_file = CliArgs::parse_from([
            "neuroscan",
            "--input-dir",
            "scans",
            "--output-dir",
            "reports",
            "--output",
            "report.json",
        ]);
        assert!(matches!(
            check_mode_arguments(&batch_with_file),
            Err(AppError::ConflictingArguments {
                first: "--input-dir",
                second: "--output"
            })
        ));

        let single_with_dir =
            CliArgs::parse_from(["neuroscan", "-i", "scan.nii", "--output-dir", "reports"]);
        assert!(matches!(
            check_mode_arguments(&single_with_dir),
            Err(AppError::ConflictingArguments {
                first: "--input",
                second: "--output-dir"
            })
        ));

        let both_inputs =
            CliArgs::parse_from(["neuroscan", "-i", "scan.nii", "--input-dir", "scans"]);
        assert!(matches!(
            check_mode_arguments(&both_inputs),
            Err(AppError::ConflictingArguments {
                first: "--input",
                second: "--input-dir"
            })
        ));
    }

    #[test]
    fn matching_mode_flags_are_accepted() {
        let single = CliArgs::parse_from(["neuroscan", "-i", "scan.nii", "-o", "report.json"]);
        assert!(check_mode_arguments(&single).is_ok());
        let batch = CliArgs::parse_from([
            "neuroscan",
            "--input-dir",
            "scans",
            "--output-dir",
            "reports",
        ]);
        assert!(check_mode_arguments(&batch).is_ok());
    }
}
