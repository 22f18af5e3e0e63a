use ndarray::ArrayD;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::loader::ScanLoader;
use crate::core::params::PipelineOptions;
use crate::error::Result;
use crate::types::{ScanInput, ScanKind};

/// A processing step fed with the loaded scan.
///
/// `data` is `None` when the loader was told not to materialize a file.
pub trait PipelineStage {
    type Output;

    fn run(&mut self, data: Option<&ArrayD<f64>>, options: &PipelineOptions) -> Result<Self::Output>;
}

/// Loads a scan and then hands it to a stage
#[derive(Debug, Clone)]
pub struct ScanPipeline<S> {
    loader: ScanLoader,
    stage: S,
}

impl<S: PipelineStage> ScanPipeline<S> {
    pub fn new(loader: ScanLoader, stage: S) -> Self {
        Self { loader, stage }
    }

    pub fn structural(stage: S) -> Self {
        Self::new(ScanLoader::structural(), stage)
    }

    pub fn functional(stage: S) -> Self {
        Self::new(ScanLoader::functional(), stage)
    }

    pub fn for_kind(kind: ScanKind, stage: S) -> Self {
        Self::new(ScanLoader::new(kind), stage)
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.loader = self.loader.with_verbose(verbose);
        self
    }

    pub fn loader(&self) -> &ScanLoader {
        &self.loader
    }

    pub fn stage(&self) -> &S {
        &self.stage
    }

    pub fn into_parts(self) -> (ScanLoader, S) {
        (self.loader, self.stage)
    }

    /// Load `input`, then run the stage on the loaded buffer.
    /// Load failures are returned as-is and the stage is not run.
    pub fn run<I: Into<ScanInput>>(&mut self, input: I, options: &PipelineOptions) -> Result<S::Output> {
        self.loader.load(input, &options.load_options())?;
        debug!("Running {} stage", self.loader.kind());
        self.stage.run(self.loader.scan(), options)
    }
}

/// Shape of the data a stage received
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VolumeSummary {
    pub shape: Option<Vec<usize>>,
    pub voxels: usize,
}

/// Stage that only reports what it was given
#[derive(Debug, Clone, Copy, Default)]
pub struct InspectStage;

impl PipelineStage for InspectStage {
    type Output = VolumeSummary;

    fn run(&mut self, data: Option<&ArrayD<f64>>, _options: &PipelineOptions) -> Result<VolumeSummary> {
        Ok(match data {
            Some(array) => VolumeSummary {
                shape: Some(array.shape().to_vec()),
                voxels: array.len(),
            },
            None => VolumeSummary {
                shape: None,
                voxels: 0,
            },
        })
    }
}
