use thiserror::Error;

/// Problems detected while assembling a [`crate::volume::Volume`].
#[derive(Debug, Error, Clone, PartialEq)]
pub enum VolumeError {
    #[error("volume has an empty index domain {dims:?}")]
    EmptyDomain { dims: [usize; 3] },
    #[error("volume data holds {actual} samples but dims {dims:?} require {expected}")]
    DataLength {
        dims: [usize; 3],
        expected: usize,
        actual: usize,
    },
    #[error("volume dims {dims:?} overflow the addressable sample count")]
    TooLarge { dims: [usize; 3] },
    #[error("voxel spacing must be positive and finite, got {spacing:?}")]
    InvalidSpacing { spacing: [f64; 3] },
    #[error("direction cosine matrix is singular")]
    SingularDirection,
}

/// Configuration errors rejected before an exhaustive sweep starts.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SearchError {
    #[error("step size for {axis} must be positive and finite, got {step}")]
    InvalidStep { axis: &'static str, step: f64 },
    #[error("search range for {axis} must be non-negative and finite, got {range}")]
    InvalidRange { axis: &'static str, range: f64 },
    #[error("search grid with {counts:?} samples per axis has too many candidates")]
    GridTooLarge { counts: [f64; 3] },
}
