//! Preparation of the working volume searched by the optimizer.
//!
//! The raw volume is first standardised to a bounded dynamic range and then
//! smoothed and decimated to a coarse grid that keeps the exhaustive sweep
//! tractable.

pub mod downsample;
pub mod filters;
pub mod standardize;

pub use downsample::{downsample, shrink, DownsampleOptions};
pub use filters::{GaussianKernel, SeparableFilter};
pub use standardize::{IntensityStandardization, MAX_OUTPUT_VALUE};

use crate::diagnostics::PipelineTiming;
use crate::error::VolumeError;
use crate::volume::Volume;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PreprocessOptions {
    /// `None` skips standardisation.
    pub standardize: Option<IntensityStandardization>,
    /// `None` keeps the input resolution.
    pub downsample: Option<DownsampleOptions>,
}

impl Default for PreprocessOptions {
    fn default() -> Self {
        Self {
            standardize: Some(IntensityStandardization::default()),
            downsample: Some(DownsampleOptions::default()),
        }
    }
}

impl PreprocessOptions {
    /// Standardise, then downsample, as configured.
    pub fn apply(&self, volume: &Volume) -> Result<Volume, VolumeError> {
        self.apply_timed(volume, &mut PipelineTiming::default())
    }

    /// [`apply`](Self::apply), recording the `standardize` and `downsample`
    /// stages into `timing`. Skipped stages are recorded too.
    pub fn apply_timed(
        &self,
        volume: &Volume,
        timing: &mut PipelineTiming,
    ) -> Result<Volume, VolumeError> {
        let standardized = timing.measure("standardize", || match &self.standardize {
            Some(opts) => opts.apply(volume),
            None => volume.clone(),
        });
        timing.measure("downsample", || match &self.downsample {
            Some(opts) => downsample(&standardized, opts),
            None => Ok(standardized),
        })
    }
}
