//! High-level library API: load a scan, run the inspect pipeline on a file,
//! and batch helpers for directories of NIfTI files. Prefer these entry
//! points over the `core` modules when integrating neuroscan.
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::core::loader::ScanLoader;
use crate::core::params::PipelineOptions;
use crate::core::pipeline::{InspectStage, ScanPipeline, VolumeSummary};
use crate::error::{Error, Result};
use crate::io::nifti::{ScanMetadata, scan_format};
use crate::types::{ScanInput, ScanKind, ScanSource};

/// Outcome of running the inspect pipeline on one scan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanReport {
    pub source: ScanSource,
    pub kind: ScanKind,
    pub materialized: bool,
    pub summary: VolumeSummary,
    pub metadata: Option<ScanMetadata>,
    pub generated_at: String,
}

/// Load a scan with a fresh loader of the given kind
pub fn load_scan<I: Into<ScanInput>>(
    input: I,
    kind: ScanKind,
    options: &PipelineOptions,
) -> Result<ScanLoader> {
    let mut loader = ScanLoader::new(kind);
    loader.load(input, &options.load_options())?;
    Ok(loader)
}

/// Run the inspect pipeline on a single input
pub fn run_scan<I: Into<ScanInput>>(
    input: I,
    kind: ScanKind,
    options: &PipelineOptions,
    verbose: bool,
) -> Result<ScanReport> {
    let mut pipeline = ScanPipeline::for_kind(kind, InspectStage).with_verbose(verbose);
    let summary = pipeline.run(input, options)?;
    let loader = pipeline.loader();
    let source = loader
        .source()
        .cloned()
        .ok_or_else(|| Error::Processing("loader recorded no source".to_string()))?;

    Ok(ScanReport {
        source,
        kind,
        materialized: loader.scan().is_some(),
        summary,
        metadata: loader.metadata().cloned(),
        generated_at: chrono::Utc::now().to_rfc3339(),
    })
}

/// Write a report as pretty-printed JSON
pub fn write_report(report: &ScanReport, output: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(report)?;
    std::fs::write(output, json)?;
    Ok(())
}

/// Batch processing report
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchReport {
    pub processed: usize,
    pub skipped: usize,
    pub errors: usize,
}

/// True for regular files named `*.nii` or `*.nii.gz`
pub fn is_scan_file(path: &Path) -> bool {
    path.is_file() && scan_format(path).is_some()
}

fn sorted_entries(input_dir: &Path) -> Result<Vec<PathBuf>> {
    let mut entries = Vec::new();
    for entry in std::fs::read_dir(input_dir)? {
        entries.push(entry?.path());
    }
    entries.sort();
    Ok(entries)
}

/// Regular files directly inside `input_dir` named `*.nii` or `*.nii.gz`, sorted by path
pub fn iterate_scan_files(input_dir: &Path) -> Result<std::vec::IntoIter<PathBuf>> {
    let files: Vec<PathBuf> = sorted_entries(input_dir)?
        .into_iter()
        .filter(|path| is_scan_file(path))
        .collect();
    Ok(files.into_iter())
}

/// Report file name for a scan: `scan.nii.gz` becomes `scan.json`
fn report_name(scan: &Path) -> String {
    let name = scan
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let stem = name
        .strip_suffix(".nii.gz")
        .or_else(|| name.strip_suffix(".nii"))
        .unwrap_or(&name);
    format!("{stem}.json")
}

/// Inspect every NIfTI file in `input_dir`, writing one JSON report per scan into `output_dir`.
/// If `continue_on_error` is true, failures are counted and processing continues; otherwise, the first error is returned.
pub fn run_directory(
    input_dir: &Path,
    output_dir: &Path,
    kind: ScanKind,
    options: &PipelineOptions,
    continue_on_error: bool,
) -> Result<BatchReport> {
    std::fs::create_dir_all(output_dir)?;

    let mut report = BatchReport::default();

    let (scans, others): (Vec<PathBuf>, Vec<PathBuf>) = sorted_entries(input_dir)?
        .into_iter()
        .partition(|path| is_scan_file(path));
    for path in &others {
        info!("Skipping non-NIfTI entry: {:?}", path);
    }
    report.skipped = others.len();

    for path in scans {
        let output_path = output_dir.join(report_name(&path));
        info!("Processing: {:?} -> {:?}", path, output_path);

        let outcome = run_scan(&path, kind, options, false)
            .and_then(|scan_report| write_report(&scan_report, &output_path));
        match outcome {
            Ok(()) => report.processed += 1,
            Err(e) => {
                warn!("Error processing {:?}: {}", path, e);
                report.errors += 1;
                if !continue_on_error {
                    return Err(e);
                }
            }
        }
    }

    Ok(report)
}
