pub mod grid;
mod interp;
pub mod io;

pub use self::grid::{Volume, VolumeGeometry};
