#![doc = include_str!("../README.md")]

// Public modules (stable-ish surface)
pub mod error;
pub mod metric;
pub mod reflection;
pub mod search;
pub mod volume;

// Pipeline plumbing used by the `symmetry_search` tool.
pub mod config;
pub mod diagnostics;
pub mod preprocess;

// --- High-level re-exports -------------------------------------------------

pub use crate::error::{SearchError, VolumeError};
pub use crate::metric::{is_degenerate, ReflectiveCorrelation, SymmetryMetric, DEGENERATE_SCORE};
pub use crate::reflection::{ReflectionParameters, ReflectionTransform};
pub use crate::search::{
    EvaluationRecord, ExhaustiveSearch, SearchGrid, SearchOptions, SearchResult, TraceSink,
};
pub use crate::volume::{Volume, VolumeGeometry};

// --- Prelude ---------------------------------------------------------------

/// Small prelude for quick experiments.
///
/// ```no_run
/// use symmetry_plane::prelude::*;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let dims = [32usize, 32, 16];
/// let volume = Volume::from_fn(dims, VolumeGeometry::default(), |x, y, z| {
///     let dx = x as f32 - 15.5;
///     (100.0 - dx * dx + y as f32 + z as f32).max(0.0)
/// })?;
///
/// let search = ExhaustiveSearch::new(SearchOptions::default());
/// let mut trace: Vec<EvaluationRecord> = Vec::new();
/// let result = search.run(&volume, ReflectionParameters::IDENTITY, Some(&mut trace))?;
/// println!("best={} score={:.4}", result.best.params, result.best.score);
/// # Ok(())
/// # }
/// ```
pub mod prelude {
    pub use crate::metric::{ReflectiveCorrelation, SymmetryMetric};
    pub use crate::reflection::ReflectionParameters;
    pub use crate::search::{EvaluationRecord, ExhaustiveSearch, SearchOptions, SearchResult};
    pub use crate::volume::{Volume, VolumeGeometry};
}
