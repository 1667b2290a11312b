//! Coarse working volume for the grid sweep.
//!
//! Each axis is shrunk by an integer factor `f = max(1, 2 * round(target /
//! spacing))`, so a 1 mm volume becomes an 8 mm one with the default 4 mm
//! target. Before decimation the axis is smoothed with a Gaussian of sigma
//! `f / 2` voxels. The output grid is centred on the input grid, which keeps
//! the physical centre (and therefore the nominal mirror plane) in place.

use super::filters::{axis_stride, convolve_axis, line_starts, linear_index, GaussianKernel};
use crate::error::VolumeError;
use crate::volume::{Volume, VolumeGeometry};
use log::debug;
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DownsampleOptions {
    /// Approximate half of the desired output spacing (millimetres).
    pub target_spacing_mm: f64,
}

impl Default for DownsampleOptions {
    fn default() -> Self {
        Self {
            target_spacing_mm: 4.0,
        }
    }
}

impl DownsampleOptions {
    /// Per-axis integer shrink factors for a volume with `spacing`.
    pub fn shrink_factors(&self, spacing: &Vector3<f64>) -> [usize; 3] {
        [0, 1, 2].map(|a| {
            let f = 2.0 * (self.target_spacing_mm / spacing[a]).round();
            if f.is_finite() && f >= 1.0 {
                f as usize
            } else {
                1
            }
        })
    }
}

/// Downsample with factors derived from `options` and the volume spacing.
pub fn downsample(volume: &Volume, options: &DownsampleOptions) -> Result<Volume, VolumeError> {
    let factors = options.shrink_factors(&volume.spacing());
    shrink(volume, factors)
}

/// Smooth and decimate each axis by the given integer factor.
pub fn shrink(volume: &Volume, factors: [usize; 3]) -> Result<Volume, VolumeError> {
    if factors.iter().all(|&f| f <= 1) {
        return Ok(volume.clone());
    }
    let mut dims = volume.dims();
    let mut data = volume.data().to_vec();
    let mut start_index = Vector3::zeros();
    for axis in 0..3 {
        let f = factors[axis].max(1);
        if f == 1 {
            continue;
        }
        let kernel = GaussianKernel::with_sigma(f as f64 * 0.5);
        let smoothed = convolve_axis(&kernel, &data, dims, axis);
        let (resampled, out_dims, first) = decimate_axis(&smoothed, dims, axis, f);
        data = resampled;
        dims = out_dims;
        start_index[axis] = first;
    }

    let g = volume.geometry();
    let spacing = Vector3::new(
        g.spacing.x * factors[0].max(1) as f64,
        g.spacing.y * factors[1].max(1) as f64,
        g.spacing.z * factors[2].max(1) as f64,
    );
    let geometry = VolumeGeometry {
        spacing,
        origin: volume.index_to_physical(&start_index),
        direction: g.direction,
    };
    debug!(
        "downsample: {:?} -> {:?}, factors {:?}, spacing {:?}",
        volume.dims(),
        dims,
        factors,
        [spacing.x, spacing.y, spacing.z]
    );
    Volume::from_parts(dims, geometry, data)
}

/// Linearly sample every line along `axis` at `m` points spaced `f` apart and
/// centred on the line. Returns the data, new dims and the continuous input
/// index of the first output sample.
fn decimate_axis(
    data: &[f32],
    dims: [usize; 3],
    axis: usize,
    f: usize,
) -> (Vec<f32>, [usize; 3], f64) {
    let n = dims[axis];
    let m = (n / f).max(1);
    let first = (n - 1) as f64 * 0.5 - (m - 1) as f64 * 0.5 * f as f64;
    let mut out_dims = dims;
    out_dims[axis] = m;

    let in_stride = axis_stride(dims, axis);
    let out_stride = axis_stride(out_dims, axis);
    let mut out = vec![0.0f32; out_dims.iter().product()];
    for start in line_starts(dims, axis) {
        let in_base = linear_index(dims, start);
        let out_base = linear_index(out_dims, start);
        for i in 0..m {
            let c = (first + (i * f) as f64).clamp(0.0, (n - 1) as f64);
            let i0 = c.floor() as usize;
            let i1 = (i0 + 1).min(n - 1);
            let t = (c - i0 as f64) as f32;
            let a = data[in_base + i0 * in_stride];
            let b = data[in_base + i1 * in_stride];
            out[out_base + i * out_stride] = a + (b - a) * t;
        }
    }
    (out, out_dims, first)
}
