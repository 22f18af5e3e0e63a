//! Scan ingestion: turns a path or an in-memory array into the canonical
//! buffer consumed by a pipeline stage.
use ndarray::ArrayD;
use tracing::info;

use crate::core::axes::time_to_front;
use crate::core::params::LoadOptions;
use crate::error::Result;
use crate::io::nifti::{NiftiScanReader, ScanMetadata};
use crate::types::{ScanInput, ScanKind, ScanSource};

const SEPARATOR: &str = "------------------------------------------------------------";

/// Holds the most recently loaded scan and where it came from.
///
/// Every call to [`ScanLoader::load`] starts from a clean slate; after a
/// failed load the loader holds no scan.
#[derive(Debug, Clone)]
pub struct ScanLoader {
    kind: ScanKind,
    verbose: bool,
    source: Option<ScanSource>,
    scan: Option<ArrayD<f64>>,
    metadata: Option<ScanMetadata>,
}

impl ScanLoader {
    pub fn new(kind: ScanKind) -> Self {
        Self {
            kind,
            verbose: false,
            source: None,
            scan: None,
            metadata: None,
        }
    }

    /// Loader for 3D volumes
    pub fn structural() -> Self {
        Self::new(ScanKind::Structural)
    }

    /// Loader for 4D time series
    pub fn functional() -> Self {
        Self::new(ScanKind::Functional)
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn kind(&self) -> ScanKind {
        self.kind
    }

    pub fn is_verbose(&self) -> bool {
        self.verbose
    }

    pub fn source(&self) -> Option<&ScanSource> {
        self.source.as_ref()
    }

    pub fn scan(&self) -> Option<&ArrayD<f64>> {
        self.scan.as_ref()
    }

    /// Header metadata, present only when the scan was decoded from a file
    pub fn metadata(&self) -> Option<&ScanMetadata> {
        self.metadata.as_ref()
    }

    pub fn take_scan(&mut self) -> Option<ArrayD<f64>> {
        self.scan.take()
    }

    /// Load a scan from a NIfTI path or take ownership of an array.
    ///
    /// Paths must exist and end in `.nii` or `.nii.gz`. With
    /// `materialize` off, a path is only validated and recorded. Functional
    /// scans decoded from disk are reordered from (X, Y, Z, T) to
    /// (T, X, Y, Z). Arrays are stored as given for either kind.
    pub fn load<I: Into<ScanInput>>(&mut self, input: I, options: &LoadOptions) -> Result<()> {
        self.source = None;
        self.scan = None;
        self.metadata = None;

        if self.verbose && self.kind == ScanKind::Functional {
            info!("load_scan()...");
        }

        match input.into() {
            ScanInput::Path(path) => {
                let reader = NiftiScanReader::open(&path)?;
                self.source = Some(ScanSource::File(reader.path.clone()));

                if options.materialize {
                    let (volume, metadata) = reader.read()?;
                    let volume = match self.kind {
                        ScanKind::Structural => volume,
                        ScanKind::Functional => time_to_front(volume)?,
                    };
                    self.scan = Some(volume);
                    self.metadata = Some(metadata);
                }
            }
            ScanInput::Array(array) => {
                self.source = Some(ScanSource::InMemory);
                self.scan = Some(array);
            }
        }

        if self.verbose {
            self.log_loaded();
        }
        Ok(())
    }

    fn log_loaded(&self) {
        let source = self
            .source
            .as_ref()
            .map(ToString::to_string)
            .unwrap_or_else(|| "None".to_string());
        info!("load_scan(): scan_file = {}", source);
        match &self.scan {
            Some(scan) => info!("load_scan(): scan.shape = {:?}", scan.shape()),
            None => info!("load_scan(): scan.shape = None"),
        }
        info!("{}", SEPARATOR);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use ndarray::{Array, Array3, IxDyn};
    use nifti::writer::WriterOptions;
    use std::path::{Path, PathBuf};
    use std::sync::{Arc, Mutex};
    use tracing_subscriber::fmt::MakeWriter;

    #[derive(Clone, Default)]
    struct LogBuffer(Arc<Mutex<Vec<u8>>>);

    impl std::io::Write for LogBuffer {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl<'a> MakeWriter<'a> for LogBuffer {
        type Writer = LogBuffer;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    /// Run `f` with INFO events routed into a buffer and return what was logged.
    fn capture_logs<F: FnOnce()>(f: F) -> String {
        let buffer = LogBuffer::default();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(buffer.clone())
            .with_ansi(false)
            .without_time()
            .with_max_level(tracing::Level::INFO)
            .finish();
        tracing::subscriber::with_default(subscriber, f);
        let bytes = buffer.0.lock().unwrap().clone();
        String::from_utf8(bytes).unwrap()
    }

    fn write_volume<D: ndarray::Dimension>(dir: &Path, name: &str, data: &Array<f32, D>) -> PathBuf {
        let path = dir.join(name);
        let data = data.clone().into_dyn();
        WriterOptions::new(&path).write_nifti(&data).unwrap();
        path
    }

    fn ramp4(shape: (usize, usize, usize, usize)) -> Array<f32, ndarray::Ix4> {
        Array::from_shape_fn(shape, |(x, y, z, t)| (x * 1000 + y * 100 + z * 10 + t) as f32)
    }

    #[test]
    fn structural_file_keeps_native_shape() {
        let dir = tempfile::tempdir().unwrap();
        let data = Array3::from_shape_fn((4, 3, 2), |(x, y, z)| (x * 100 + y * 10 + z) as f32);
        let path = write_volume(dir.path(), "scan.nii.gz", &data);

        let mut loader = ScanLoader::structural();
        loader.load(&path, &LoadOptions::default()).unwrap();

        let expected = ScanSource::File(std::fs::canonicalize(&path).unwrap());
        assert_eq!(loader.source(), Some(&expected));
        let scan = loader.scan().unwrap();
        assert_eq!(scan.shape(), &[4, 3, 2]);
        assert_eq!(scan[&[3, 2, 1][..]], 321.0);
        assert_eq!(loader.metadata().unwrap().dim, vec![4, 3, 2]);
    }

    #[test]
    fn functional_file_moves_time_first() {
        let dir = tempfile::tempdir().unwrap();
        let data = ramp4((2, 3, 4, 5));
        let path = write_volume(dir.path(), "bold.nii", &data);

        let mut loader = ScanLoader::functional();
        loader.load(path.as_path(), &LoadOptions::default()).unwrap();

        let scan = loader.scan().unwrap();
        assert_eq!(scan.shape(), &[5, 2, 3, 4]);
        for ((x, y, z, t), &v) in data.indexed_iter() {
            assert_eq!(scan[&[t, x, y, z][..]], f64::from(v));
        }
        assert_eq!(loader.metadata().unwrap().dim, vec![2, 3, 4, 5]);
    }

    #[test]
    fn functional_file_must_be_4d() {
        let dir = tempfile::tempdir().unwrap();
        let data = Array3::<f32>::zeros((2, 2, 2));
        let path = write_volume(dir.path(), "flat.nii", &data);

        let mut loader = ScanLoader::functional();
        let err = loader.load(&path, &LoadOptions::default()).unwrap_err();
        assert!(matches!(err, Error::Dimensionality { expected: 4, found: 3 }));
        assert!(loader.scan().is_none());
    }

    #[test]
    fn without_materialize_only_source_is_set() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_volume(dir.path(), "bold.nii.gz", &ramp4((2, 2, 2, 3)));

        for mut loader in [ScanLoader::structural(), ScanLoader::functional()] {
            loader
                .load(&path, &LoadOptions { materialize: false })
                .unwrap();
            assert!(matches!(loader.source(), Some(ScanSource::File(_))));
            assert!(loader.scan().is_none());
            assert!(loader.metadata().is_none());
        }
    }

    #[test]
    fn arrays_are_stored_unchanged_for_both_kinds() {
        let array = Array::from_shape_fn(IxDyn(&[2, 3, 4, 5]), |ix| ix[0] as f64 + ix[3] as f64);
        for mut loader in [ScanLoader::structural(), ScanLoader::functional()] {
            loader
                .load(array.clone(), &LoadOptions { materialize: false })
                .unwrap();
            assert_eq!(loader.source(), Some(&ScanSource::InMemory));
            assert_eq!(loader.scan(), Some(&array));
            assert!(loader.metadata().is_none());
        }
    }

    #[test]
    fn missing_path_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let mut loader = ScanLoader::structural();
        let err = loader
            .load(dir.path().join("missing.nii"), &LoadOptions::default())
            .unwrap_err();
        assert!(matches!(err, Error::NotFound { .. }));
    }

    #[test]
    fn wrong_suffix_is_invalid_format() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scan.txt");
        std::fs::write(&path, "x").unwrap();
        let mut loader = ScanLoader::functional();
        let err = loader.load(&path, &LoadOptions::default()).unwrap_err();
        assert!(matches!(err, Error::InvalidFormat { .. }));
        assert!(loader.source().is_none());
    }

    #[test]
    fn each_load_replaces_previous_state() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_volume(dir.path(), "scan.nii", &Array3::<f32>::ones((2, 2, 2)));

        let mut loader = ScanLoader::structural().with_verbose(true);
        loader
            .load(Array3::<f64>::zeros((1, 1, 1)), &LoadOptions::default())
            .unwrap();
        loader
            .load(&path, &LoadOptions { materialize: false })
            .unwrap();
        assert!(matches!(loader.source(), Some(ScanSource::File(_))));
        assert!(loader.scan().is_none());
    }

    #[test]
    fn verbose_load_logs_source_shape_and_separator() {
        let logs = capture_logs(|| {
            let mut loader = ScanLoader::structural().with_verbose(true);
            loader
                .load(Array3::<f64>::zeros((2, 3, 4)), &LoadOptions::default())
                .unwrap();
        });
        assert!(logs.contains("load_scan(): scan_file = ndarray"), "{logs}");
        assert!(logs.contains("load_scan(): scan.shape = [2, 3, 4]"), "{logs}");
        assert!(logs.contains(SEPARATOR), "{logs}");
        assert!(!logs.contains("load_scan()..."), "{logs}");
    }

    #[test]
    fn verbose_functional_load_without_buffer_logs_none() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_volume(dir.path(), "bold.nii", &ramp4((2, 2, 2, 2)));
        let canonical = std::fs::canonicalize(&path).unwrap();

        let logs = capture_logs(|| {
            let mut loader = ScanLoader::functional().with_verbose(true);
            loader
                .load(&path, &LoadOptions { materialize: false })
                .unwrap();
        });
        let announce = logs.find("load_scan()...").expect("announcement logged");
        let source_line = format!("load_scan(): scan_file = {}", canonical.display());
        let source_at = logs.find(&source_line).expect("source logged");
        let shape_at = logs.find("load_scan(): scan.shape = None").expect("shape logged");
        let separator_at = logs.find(SEPARATOR).expect("separator logged");
        assert!(announce < source_at && source_at < shape_at && shape_at < separator_at);
    }

    #[test]
    fn quiet_loader_logs_nothing() {
        let logs = capture_logs(|| {
            let mut loader = ScanLoader::functional();
            loader
                .load(Array3::<f64>::zeros((1, 1, 1)), &LoadOptions::default())
                .unwrap();
        });
        assert!(logs.is_empty(), "{logs}");
    }
}
