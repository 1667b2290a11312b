//! Sweep configuration for the exhaustive search.
//!
//! Defaults reproduce the reference sweep: head tilt and base angle ±45° in
//! 5° steps, left-right offset ±5 mm in 1 mm steps (19 × 19 × 11 points).

use crate::error::SearchError;
use serde::{Deserialize, Serialize};

/// Half-width and increment of one parameter axis.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct AxisSweep {
    /// Non-negative half-width around the centre value.
    pub range: f64,
    /// Positive increment between consecutive samples.
    pub step: f64,
}

impl AxisSweep {
    pub const fn new(range: f64, step: f64) -> Self {
        Self { range, step }
    }

    /// Collapsed axis visiting only the centre.
    pub const fn fixed() -> Self {
        Self {
            range: 0.0,
            step: 1.0,
        }
    }

    pub(crate) fn validate(&self, axis: &'static str) -> Result<(), SearchError> {
        if !self.step.is_finite() || self.step <= 0.0 {
            return Err(SearchError::InvalidStep {
                axis,
                step: self.step,
            });
        }
        if !self.range.is_finite() || self.range < 0.0 {
            return Err(SearchError::InvalidRange {
                axis,
                range: self.range,
            });
        }
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchOptions {
    /// Head tilt angle sweep (degrees).
    pub head_tilt: AxisSweep,
    /// Base angle sweep (degrees).
    pub base_angle: AxisSweep,
    /// Left-right offset sweep (millimetres).
    pub left_right: AxisSweep,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            head_tilt: AxisSweep::new(45.0, 5.0),
            base_angle: AxisSweep::new(45.0, 5.0),
            left_right: AxisSweep::new(5.0, 1.0),
        }
    }
}

impl SearchOptions {
    pub const AXIS_NAMES: [&'static str; 3] = ["head_tilt", "base_angle", "left_right"];

    /// Build from `(HA, BA, LR)` ranges and step sizes.
    pub fn from_ranges(ranges: [f64; 3], steps: [f64; 3]) -> Self {
        Self {
            head_tilt: AxisSweep::new(ranges[0], steps[0]),
            base_angle: AxisSweep::new(ranges[1], steps[1]),
            left_right: AxisSweep::new(ranges[2], steps[2]),
        }
    }

    pub fn axes(&self) -> [AxisSweep; 3] {
        [self.head_tilt, self.base_angle, self.left_right]
    }

    /// Reject non-positive steps and negative ranges before any evaluation.
    pub fn validate(&self) -> Result<(), SearchError> {
        for (sweep, axis) in self.axes().iter().zip(Self::AXIS_NAMES) {
            sweep.validate(axis)?;
        }
        Ok(())
    }
}
