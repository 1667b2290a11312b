//! Reflective correlation: how well a volume matches its own mirror image.
//!
//! For every voxel the reflected physical location under the candidate plane
//! is interpolated; pairs whose reflection leaves the domain are dropped so
//! background outside the field of view does not drag the statistic towards
//! zero. Both sides of the correlation therefore share one support.
//!
//! Candidates without a usable support (nothing maps inside, or a flat side)
//! score [`DEGENERATE_SCORE`], which sorts below every valid coefficient so
//! the search needs no special casing.

mod correlation;

pub use correlation::CorrelationAccumulator;

use crate::reflection::{ReflectionParameters, ReflectionTransform};
use crate::volume::Volume;
use nalgebra::Vector3;

/// Score assigned to candidates where the correlation is undefined.
pub const DEGENERATE_SCORE: f64 = f64::NEG_INFINITY;

#[inline]
pub fn is_degenerate(score: f64) -> bool {
    score == DEGENERATE_SCORE || score.is_nan()
}

/// Scores a candidate plane; higher is more symmetric.
///
/// Implementations must be pure: identical inputs give identical scores.
pub trait SymmetryMetric: Sync {
    fn evaluate(&self, volume: &Volume, params: &ReflectionParameters) -> f64;
}

impl<F> SymmetryMetric for F
where
    F: Fn(&Volume, &ReflectionParameters) -> f64 + Sync,
{
    fn evaluate(&self, volume: &Volume, params: &ReflectionParameters) -> f64 {
        self(volume, params)
    }
}

/// Correlation value together with the number of paired samples behind it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Correlation {
    pub coefficient: f64,
    pub support: usize,
}

/// Normalised cross-correlation between a volume and its reflection.
#[derive(Clone, Copy, Debug, Default)]
pub struct ReflectiveCorrelation;

impl ReflectiveCorrelation {
    pub fn new() -> Self {
        Self
    }

    /// Correlation over the in-domain support, `None` when undefined.
    pub fn correlation(
        &self,
        volume: &Volume,
        params: &ReflectionParameters,
    ) -> Option<Correlation> {
        let map = ReflectionTransform::for_volume(params, volume).in_index_space(volume);
        let data = volume.data();
        let mut acc = CorrelationAccumulator::new();
        for (k, [x, y, z]) in volume.indices().enumerate() {
            let reflected = map.apply(&Vector3::new(x as f64, y as f64, z as f64));
            if let Some(mirrored) = volume.sample_linear(&reflected) {
                acc.push(data[k] as f64, mirrored);
            }
        }
        acc.coefficient().map(|coefficient| Correlation {
            coefficient,
            support: acc.len(),
        })
    }
}

impl SymmetryMetric for ReflectiveCorrelation {
    fn evaluate(&self, volume: &Volume, params: &ReflectionParameters) -> f64 {
        self.correlation(volume, params)
            .map_or(DEGENERATE_SCORE, |c| c.coefficient)
    }
}
