//! Separable 1D filtering along one axis of a volume.
//!
//! Border samples clamp to the volume extents.

/// Trait implemented by separable 1D filters used for working-volume smoothing.
pub trait SeparableFilter {
    /// Return the 1D taps (in left-to-right order). The kernel is assumed to be
    /// symmetric around its centre, but the implementation does not rely on it.
    fn taps(&self) -> &[f32];
}

/// Sampled, normalised Gaussian truncated at three sigma.
#[derive(Clone, Debug, PartialEq)]
pub struct GaussianKernel {
    taps: Vec<f32>,
}

impl GaussianKernel {
    pub fn with_sigma(sigma: f64) -> Self {
        if !(sigma > 0.0) {
            return Self { taps: vec![1.0] };
        }
        let radius = (3.0 * sigma).ceil() as i64;
        let weights: Vec<f64> = (-radius..=radius)
            .map(|k| (-(k * k) as f64 / (2.0 * sigma * sigma)).exp())
            .collect();
        let sum: f64 = weights.iter().sum();
        Self {
            taps: weights.iter().map(|w| (w / sum) as f32).collect(),
        }
    }
}

impl SeparableFilter for GaussianKernel {
    #[inline]
    fn taps(&self) -> &[f32] {
        &self.taps
    }
}

/// Coordinates of the first sample of every line running along `axis`.
pub(crate) fn line_starts(dims: [usize; 3], axis: usize) -> impl Iterator<Item = [usize; 3]> {
    let mut extent = dims;
    extent[axis] = 1;
    (0..extent[2]).flat_map(move |z| {
        (0..extent[1]).flat_map(move |y| (0..extent[0]).map(move |x| [x, y, z]))
    })
}

#[inline]
pub(crate) fn linear_index(dims: [usize; 3], c: [usize; 3]) -> usize {
    c[0] + dims[0] * (c[1] + dims[1] * c[2])
}

#[inline]
pub(crate) fn axis_stride(dims: [usize; 3], axis: usize) -> usize {
    match axis {
        0 => 1,
        1 => dims[0],
        _ => dims[0] * dims[1],
    }
}

/// Convolve `data` (shaped `dims`) with `filter` along `axis`.
pub fn convolve_axis(
    filter: &dyn SeparableFilter,
    data: &[f32],
    dims: [usize; 3],
    axis: usize,
) -> Vec<f32> {
    let taps = filter.taps();
    let half = (taps.len() / 2) as isize;
    let n = dims[axis] as isize;
    let stride = axis_stride(dims, axis);
    let mut out = vec![0.0f32; data.len()];
    let mut line = Vec::with_capacity(dims[axis]);
    for start in line_starts(dims, axis) {
        let base = linear_index(dims, start);
        line.clear();
        line.extend((0..dims[axis]).map(|i| data[base + i * stride]));
        for i in 0..n {
            let mut acc = 0.0f32;
            for (t, &w) in taps.iter().enumerate() {
                let j = (i + t as isize - half).clamp(0, n - 1) as usize;
                acc += w * line[j];
            }
            out[base + i as usize * stride] = acc;
        }
    }
    out
}
