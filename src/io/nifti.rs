use std::path::{Path, PathBuf};

use ndarray::ArrayD;
use nifti::{IntoNdArray, NiftiHeader, NiftiObject, ReaderOptions};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};
use crate::types::ScanFormat;

/// Header fields carried alongside a decoded scan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanMetadata {
    /// Size of each used dimension, in file order
    pub dim: Vec<usize>,
    /// Voxel size (or repetition time) of each used dimension
    pub pixdim: Vec<f32>,
    /// NIfTI datatype code of the stored voxels
    pub datatype: i16,
    pub scl_slope: f32,
    pub scl_inter: f32,
    pub description: String,
}

impl ScanMetadata {
    pub fn from_header(header: &NiftiHeader) -> Self {
        let ndim = usize::from(header.dim[0]).min(7);
        let dim = header.dim[1..=ndim].iter().map(|&d| usize::from(d)).collect();
        let pixdim = header.pixdim[1..=ndim].to_vec();
        let description = String::from_utf8_lossy(&header.descrip)
            .trim_end_matches('\0')
            .trim()
            .to_string();
        ScanMetadata {
            dim,
            pixdim,
            datatype: header.datatype,
            scl_slope: header.scl_slope,
            scl_inter: header.scl_inter,
            description,
        }
    }

    pub fn ndim(&self) -> usize {
        self.dim.len()
    }
}

/// Concatenation of every suffix in the file name, e.g. `.nii.gz` for
/// `scan.nii.gz` and `.task.nii` for `sub.task.nii`. Leading dots are not
/// suffixes and a name ending in a dot has none.
pub fn combined_suffix(path: &Path) -> String {
    let Some(name) = path.file_name().map(|n| n.to_string_lossy()) else {
        return String::new();
    };
    if name.ends_with('.') {
        return String::new();
    }
    name.trim_start_matches('.')
        .split('.')
        .skip(1)
        .map(|part| format!(".{part}"))
        .collect()
}

/// Format implied by the file name alone (no filesystem access)
pub fn scan_format(path: &Path) -> Option<ScanFormat> {
    ScanFormat::from_suffix(&combined_suffix(path))
}

/// Reader for NIfTI-1 scans on disk
#[derive(Debug, Clone)]
pub struct NiftiScanReader {
    pub path: PathBuf,
    pub format: ScanFormat,
}

impl NiftiScanReader {
    /// Validate a scan path: it must exist and carry a `.nii` or `.nii.gz`
    /// suffix. The stored path is canonicalized.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(Error::NotFound {
                path: path.to_path_buf(),
            });
        }
        let format = scan_format(path).ok_or_else(|| Error::InvalidFormat {
            path: path.to_path_buf(),
        })?;
        let path = std::fs::canonicalize(path)?;
        Ok(NiftiScanReader { path, format })
    }

    /// Decode the whole volume as f64, with header scaling applied
    pub fn read(&self) -> Result<(ArrayD<f64>, ScanMetadata)> {
        debug!(
            "Decoding {} ({})",
            self.path.display(),
            if self.format.is_compressed() {
                "gzip"
            } else {
                "uncompressed"
            }
        );
        let object = ReaderOptions::new().read_file(&self.path)?;
        let metadata = ScanMetadata::from_header(object.header());
        let volume = object.into_volume().into_ndarray::<f64>()?;
        debug!("Decoded volume with shape {:?}", volume.shape());
        Ok((volume, metadata))
    }
}
