#![doc = r#"
neuroscan — load structural and functional NIfTI scans into `ndarray` buffers.

This crate ingests 3D (structural) and 4D (functional) neuroimaging volumes, either
from NIfTI-1 files (`.nii` / `.nii.gz`) or from arrays already in memory, and hands
the normalized buffer to a pipeline stage. Functional scans decoded from disk are
reordered from (X, Y, Z, T) to (T, X, Y, Z); arrays are trusted as given.

Quick start: load a scan
------------------------
```rust,no_run
use neuroscan::{LoadOptions, ScanLoader};

fn main() -> neuroscan::Result<()> {
    let mut loader = ScanLoader::functional().with_verbose(true);
    loader.load("/data/sub-01_bold.nii.gz", &LoadOptions::default())?;

    if let Some(scan) = loader.scan() {
        println!("{} volumes of {:?}", scan.shape()[0], &scan.shape()[1..]);
    }
    Ok(())
}
```

Run a custom stage
------------------
```rust
use ndarray::{Array4, ArrayD};
use neuroscan::{PipelineOptions, PipelineStage, ScanPipeline};

struct CountVolumes;

impl PipelineStage for CountVolumes {
    type Output = usize;

    fn run(&mut self, data: Option<&ArrayD<f64>>, _options: &PipelineOptions) -> neuroscan::Result<usize> {
        Ok(data.map(|d| d.shape()[0]).unwrap_or(0))
    }
}

fn main() -> neuroscan::Result<()> {
    let mut pipeline = ScanPipeline::functional(CountVolumes);
    let volumes = pipeline.run(Array4::<f64>::zeros((10, 4, 4, 4)), &PipelineOptions::default())?;
    assert_eq!(volumes, 10);
    Ok(())
}
```

Error handling
--------------
All public functions return `neuroscan::Result<T>`; match on `neuroscan::Error` to handle
specific cases.

```rust,no_run
use neuroscan::{Error, LoadOptions, ScanLoader};

fn main() {
    let mut loader = ScanLoader::structural();
    match loader.load("/tmp/scan.txt", &LoadOptions::default()) {
        Ok(()) => {}
        Err(Error::NotFound { path }) => eprintln!("missing: {}", path.display()),
        Err(Error::InvalidFormat { path }) => eprintln!("not NIfTI: {}", path.display()),
        Err(other) => eprintln!("Other error: {other}"),
    }
}
```

Useful modules
--------------
- [`api`] — high-level entry points and batch helpers.
- [`core`] — loader, axis normalization, options and pipeline composition.
- [`io`] — NIfTI validation and decoding.
- [`types`] — `ScanKind`, `ScanFormat`, `ScanSource`, `ScanInput`.
- [`error`] — crate-level `Error` and `Result`.
"#]

pub mod api;
pub mod core;
pub mod error;
pub mod io;
pub mod types;

// Curated public API surface
pub use core::loader::ScanLoader;
pub use core::params::{LoadOptions, PipelineOptions};
pub use core::pipeline::{InspectStage, PipelineStage, ScanPipeline, VolumeSummary};
pub use error::{Error, Result};
pub use types::{IN_MEMORY_MARKER, ScanFormat, ScanInput, ScanKind, ScanSource};

pub use io::nifti::{NiftiScanReader, ScanMetadata};

pub use api::{
    BatchReport, ScanReport, is_scan_file, iterate_scan_files, load_scan, run_directory, run_scan,
    write_report,
};
