//! Crate-level error type and `Result` alias.
//! Wraps decoder, I/O and JSON failures, and provides semantic variants
//! for scan validation such as missing files or unsupported formats.
use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("no scan file at {}", path.display())]
    NotFound { path: PathBuf },

    #[error("{} is not a NIfTI file (.nii or .nii.gz)", path.display())]
    InvalidFormat { path: PathBuf },

    #[error("Expected a {expected}D volume, got {found}D")]
    Dimensionality { expected: usize, found: usize },

    #[error(transparent)]
    Nifti(#[from] nifti::error::NiftiError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Processing error: {0}")]
    Processing(String),
}
