//! Candidate mirror planes: their parametrisation and the derived reflection.

pub mod params;
pub mod transform;

pub use params::ReflectionParameters;
pub use transform::{IndexReflection, ReflectionTransform};
