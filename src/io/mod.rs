//! I/O layer: validation and decoding of NIfTI-1 scans (`.nii`, `.nii.gz`)
//! into `ndarray` volumes together with their header metadata.
pub mod nifti;
pub use nifti::{NiftiScanReader, ScanMetadata, combined_suffix, scan_format};
