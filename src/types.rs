//! Shared types used across neuroscan.
//! Includes `ScanKind`, `ScanFormat`, the provenance tag `ScanSource`
//! and the load input sum type `ScanInput`.
use std::path::{Path, PathBuf};

use clap::ValueEnum;
use ndarray::{Array3, Array4, ArrayD};
use serde::{Deserialize, Serialize};

/// Marker shown in place of a path when a scan was supplied as an array.
pub const IN_MEMORY_MARKER: &str = "ndarray";

/// Kind of scan a loader is specialised for.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum, Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScanKind {
    /// 3D anatomical volume, kept as (X, Y, Z)
    Structural,
    /// 4D time series, decoded files are reordered to (T, X, Y, Z)
    Functional,
}

impl std::fmt::Display for ScanKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScanKind::Structural => write!(f, "structural"),
            ScanKind::Functional => write!(f, "functional"),
        }
    }
}

/// Recognized spellings of the NIfTI-1 container.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum ScanFormat {
    Nifti,
    NiftiGz,
}

impl ScanFormat {
    pub fn suffix(self) -> &'static str {
        match self {
            ScanFormat::Nifti => ".nii",
            ScanFormat::NiftiGz => ".nii.gz",
        }
    }

    /// Match a combined suffix such as `.nii.gz` exactly.
    pub fn from_suffix(suffix: &str) -> Option<Self> {
        match suffix {
            ".nii" => Some(ScanFormat::Nifti),
            ".nii.gz" => Some(ScanFormat::NiftiGz),
            _ => None,
        }
    }

    pub fn is_compressed(self) -> bool {
        matches!(self, ScanFormat::NiftiGz)
    }
}

/// Where the current scan came from.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScanSource {
    File(PathBuf),
    InMemory,
}

impl ScanSource {
    pub fn path(&self) -> Option<&Path> {
        match self {
            ScanSource::File(path) => Some(path),
            ScanSource::InMemory => None,
        }
    }
}

impl std::fmt::Display for ScanSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScanSource::File(path) => write!(f, "{}", path.display()),
            ScanSource::InMemory => write!(f, "{}", IN_MEMORY_MARKER),
        }
    }
}

/// Input accepted by `ScanLoader::load`.
#[derive(Debug, Clone)]
pub enum ScanInput {
    Path(PathBuf),
    Array(ArrayD<f64>),
}

impl From<PathBuf> for ScanInput {
    fn from(path: PathBuf) -> Self {
        ScanInput::Path(path)
    }
}

impl From<&Path> for ScanInput {
    fn from(path: &Path) -> Self {
        ScanInput::Path(path.to_path_buf())
    }
}

impl From<&PathBuf> for ScanInput {
    fn from(path: &PathBuf) -> Self {
        ScanInput::Path(path.clone())
    }
}

impl From<&str> for ScanInput {
    fn from(path: &str) -> Self {
        ScanInput::Path(PathBuf::from(path))
    }
}

impl From<String> for ScanInput {
    fn from(path: String) -> Self {
        ScanInput::Path(PathBuf::from(path))
    }
}

impl From<ArrayD<f64>> for ScanInput {
    fn from(array: ArrayD<f64>) -> Self {
        ScanInput::Array(array)
    }
}

impl From<Array3<f64>> for ScanInput {
    fn from(array: Array3<f64>) -> Self {
        ScanInput::Array(array.into_dyn())
    }
}

impl From<Array4<f64>> for ScanInput {
    fn from(array: Array4<f64>) -> Self {
        ScanInput::Array(array.into_dyn())
    }
}
