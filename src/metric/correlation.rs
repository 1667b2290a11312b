//! Streaming Pearson correlation over paired samples.
//!
//! Uses Welford-style running means and co-moments so that constant inputs
//! produce exactly zero variance instead of cancellation noise.

/// Guard on the variance relative to the squared sample magnitude.
const RELATIVE_VARIANCE_EPS: f64 = 1e-24;

#[derive(Clone, Copy, Debug, Default)]
pub struct CorrelationAccumulator {
    n: usize,
    mean_a: f64,
    mean_b: f64,
    m2_a: f64,
    m2_b: f64,
    co_moment: f64,
}

impl CorrelationAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn push(&mut self, a: f64, b: f64) {
        self.n += 1;
        let n = self.n as f64;
        let da = a - self.mean_a;
        self.mean_a += da / n;
        let db = b - self.mean_b;
        self.mean_b += db / n;
        self.m2_a += da * (a - self.mean_a);
        self.m2_b += db * (b - self.mean_b);
        self.co_moment += da * (b - self.mean_b);
    }

    /// Number of paired samples accumulated so far.
    pub fn len(&self) -> usize {
        self.n
    }

    pub fn is_empty(&self) -> bool {
        self.n == 0
    }

    /// Correlation coefficient in `[-1, 1]`; `None` on empty support or when
    /// either side has no variance.
    pub fn coefficient(&self) -> Option<f64> {
        if self.n == 0 {
            return None;
        }
        let n = self.n as f64;
        let flat = |m2: f64, mean: f64| m2 <= RELATIVE_VARIANCE_EPS * n * mean.abs().max(1.0).powi(2);
        if flat(self.m2_a, self.mean_a) || flat(self.m2_b, self.mean_b) {
            return None;
        }
        let r = self.co_moment / (self.m2_a * self.m2_b).sqrt();
        r.is_finite().then(|| r.clamp(-1.0, 1.0))
    }
}
