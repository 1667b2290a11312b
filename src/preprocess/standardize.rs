//! Robust intensity standardisation.
//!
//! Maps the `[lower_quantile, upper_quantile]` intensity window linearly onto
//! `[lower_output, upper_output]`, clamps to `[clamp_min, clamp_max]` and, by
//! default, truncates to whole numbers as a 16-bit integer volume would.

use crate::volume::Volume;
use log::debug;
use serde::{Deserialize, Serialize};

/// Upper bound of the standardised dynamic range.
pub const MAX_OUTPUT_VALUE: f32 = 4096.0;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IntensityStandardization {
    pub lower_quantile: f64,
    pub upper_quantile: f64,
    pub lower_output: f32,
    pub upper_output: f32,
    pub clamp_min: f32,
    pub clamp_max: f32,
    pub truncate_to_integer: bool,
}

impl Default for IntensityStandardization {
    fn default() -> Self {
        Self {
            lower_quantile: 0.0005,
            upper_quantile: 1.0 - 0.0005,
            lower_output: 1.0,
            upper_output: 0.95 * MAX_OUTPUT_VALUE,
            clamp_min: 0.0,
            clamp_max: MAX_OUTPUT_VALUE,
            truncate_to_integer: true,
        }
    }
}

impl IntensityStandardization {
    /// Intensities at the configured quantiles (nearest rank).
    pub fn quantile_window(&self, volume: &Volume) -> (f32, f32) {
        let mut sorted: Vec<f32> = volume.data().iter().copied().filter(|v| !v.is_nan()).collect();
        if sorted.is_empty() {
            return (0.0, 0.0);
        }
        sorted.sort_unstable_by(f32::total_cmp);
        let rank = |q: f64| {
            let q = q.clamp(0.0, 1.0);
            sorted[(q * (sorted.len() - 1) as f64).round() as usize]
        };
        (rank(self.lower_quantile), rank(self.upper_quantile))
    }

    pub fn apply(&self, volume: &Volume) -> Volume {
        let (lo, hi) = self.quantile_window(volume);
        let scale = if hi > lo {
            (self.upper_output - self.lower_output) / (hi - lo)
        } else {
            0.0
        };
        debug!(
            "standardize: window [{lo}, {hi}] -> [{}, {}]",
            self.lower_output, self.upper_output
        );
        let data = volume
            .data()
            .iter()
            .map(|&v| {
                let mapped = self.lower_output + (v - lo) * scale;
                let clamped = mapped.clamp(self.clamp_min, self.clamp_max);
                if self.truncate_to_integer {
                    clamped.trunc()
                } else {
                    clamped
                }
            })
            .collect();
        volume.with_data(data)
    }
}
