//! Trilinear sampling at continuous voxel indices.
use super::Volume;
use nalgebra::Vector3;

/// Slack (in voxels) tolerated at the domain border so that mirrored grid
/// points landing a rounding error outside `[0, n-1]` still count as inside.
const BORDER_EPS: f64 = 1e-6;

#[inline]
fn axis_cell(c: f64, n: usize) -> Option<(usize, usize, f64)> {
    let max = (n - 1) as f64;
    if !(c >= -BORDER_EPS && c <= max + BORDER_EPS) {
        return None;
    }
    if n == 1 {
        return Some((0, 0, 0.0));
    }
    let c = c.clamp(0.0, max);
    let i0 = (c.floor() as usize).min(n - 2);
    Some((i0, i0 + 1, c - i0 as f64))
}

#[inline]
fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

impl Volume {
    /// Trilinear sample at a continuous index. `None` outside the domain.
    pub fn sample_linear(&self, index: &Vector3<f64>) -> Option<f64> {
        let [nx, ny, nz] = self.dims();
        let (x0, x1, tx) = axis_cell(index.x, nx)?;
        let (y0, y1, ty) = axis_cell(index.y, ny)?;
        let (z0, z1, tz) = axis_cell(index.z, nz)?;

        let v = |x, y, z| self.get(x, y, z) as f64;
        let c00 = lerp(v(x0, y0, z0), v(x1, y0, z0), tx);
        let c10 = lerp(v(x0, y1, z0), v(x1, y1, z0), tx);
        let c01 = lerp(v(x0, y0, z1), v(x1, y0, z1), tx);
        let c11 = lerp(v(x0, y1, z1), v(x1, y1, z1), tx);
        let c0 = lerp(c00, c10, ty);
        let c1 = lerp(c01, c11, ty);
        Some(lerp(c0, c1, tz))
    }
}
