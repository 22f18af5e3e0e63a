use clap::Parser;
use std::path::PathBuf;

use neuroscan::ScanKind;

#[derive(Parser, Debug)]
#[command(name = "neuroscan", version, about = "Load and inspect NIfTI scans")]
pub struct CliArgs {
    /// Input NIfTI file, .nii or .nii.gz (single file mode)
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Directory containing NIfTI files (batch mode)
    #[arg(long)]
    pub input_dir: Option<PathBuf>,

    /// JSON report path (single file mode); printed to stdout when omitted
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Directory for per-scan JSON reports (batch mode)
    #[arg(long)]
    pub output_dir: Option<PathBuf>,

    /// Scan kind: structural (3D) or functional (4D, time moved first)
    #[arg(short, long, value_enum, default_value_t = ScanKind::Structural)]
    pub kind: ScanKind,

    /// Only validate and record the file, do not decode it
    #[arg(long, default_value_t = false)]
    pub no_materialize: bool,

    /// JSON file with pipeline options
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Print load diagnostics (source, shape)
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,

    /// Enable debug logging
    #[arg(long, default_value_t = false)]
    pub log: bool,

    /// Batch mode: keep going after a scan fails
    #[arg(long, default_value_t = false)]
    pub continue_on_error: bool,
}
