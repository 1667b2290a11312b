//! Enumeration of the candidate grid.
//!
//! Each axis holds `floor(2 * range / step) + 1` samples starting at
//! `center - range`. An axis with `range == 0` or `step >= 2 * range` holds
//! the centre only. Grids whose candidate count does not fit in `usize` are
//! rejected with [`SearchError::GridTooLarge`]. The canonical order is head
//! tilt (outermost), base angle, left-right offset (innermost), and index `k`
//! of [`SearchGrid::point`] follows it.

use super::options::SearchOptions;
use crate::error::SearchError;
use crate::reflection::ReflectionParameters;

/// Relative slack absorbing round-off in `2 * range / step`.
const COUNT_EPS: f64 = 1e-9;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AxisSamples {
    pub start: f64,
    pub step: f64,
    pub count: usize,
}

/// Sample count of one axis as a real number, before any integer cast.
fn axis_count(range: f64, step: f64) -> f64 {
    if range == 0.0 || step >= 2.0 * range {
        return 1.0;
    }
    let ratio = 2.0 * range / step;
    (ratio + ratio * COUNT_EPS).floor() + 1.0
}

impl AxisSamples {
    /// `None` when the count is not representable.
    fn new(center: f64, range: f64, step: f64) -> Option<Self> {
        let count = axis_count(range, step);
        if !count.is_finite() || count >= usize::MAX as f64 {
            return None;
        }
        let count = count as usize;
        let start = if count == 1 { center } else { center - range };
        Some(Self { start, step, count })
    }

    #[inline]
    pub fn value(&self, k: usize) -> f64 {
        debug_assert!(k < self.count);
        self.start + k as f64 * self.step
    }
}

/// Cartesian product of three axes around a centre point.
#[derive(Clone, Debug)]
pub struct SearchGrid {
    axes: [AxisSamples; 3],
}

impl SearchGrid {
    pub fn new(center: &ReflectionParameters, options: &SearchOptions) -> Result<Self, SearchError> {
        options.validate()?;
        let c = center.to_array();
        let sweeps = options.axes();
        let too_large = || SearchError::GridTooLarge {
            counts: sweeps.map(|s| axis_count(s.range, s.step)),
        };
        let mut axes = [AxisSamples {
            start: 0.0,
            step: 1.0,
            count: 1,
        }; 3];
        let mut total: usize = 1;
        for i in 0..3 {
            let axis = AxisSamples::new(c[i], sweeps[i].range, sweeps[i].step)
                .ok_or_else(too_large)?;
            total = total.checked_mul(axis.count).ok_or_else(too_large)?;
            axes[i] = axis;
        }
        Ok(Self { axes })
    }

    pub fn axes(&self) -> &[AxisSamples; 3] {
        &self.axes
    }

    /// Samples per axis in canonical order.
    pub fn shape(&self) -> [usize; 3] {
        self.axes.map(|a| a.count)
    }

    /// Total candidates; cannot overflow, checked in [`SearchGrid::new`].
    pub fn len(&self) -> usize {
        self.axes.iter().map(|a| a.count).product()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Parameters of the `k`-th candidate in canonical order.
    pub fn point(&self, k: usize) -> ReflectionParameters {
        let [_, n_ba, n_lr] = self.shape();
        let i_lr = k % n_lr;
        let i_ba = (k / n_lr) % n_ba;
        let i_ha = k / (n_lr * n_ba);
        ReflectionParameters::new(
            self.axes[0].value(i_ha),
            self.axes[1].value(i_ba),
            self.axes[2].value(i_lr),
        )
    }

    pub fn iter(&self) -> impl Iterator<Item = ReflectionParameters> + '_ {
        (0..self.len()).map(move |k| self.point(k))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::AxisSweep;

    fn grid(ranges: [f64; 3], steps: [f64; 3]) -> SearchGrid {
        SearchGrid::new(
            &ReflectionParameters::IDENTITY,
            &SearchOptions::from_ranges(ranges, steps),
        )
        .unwrap()
    }

    #[test]
    fn reference_sweep_has_expected_shape() {
        let g = grid([45.0, 45.0, 5.0], [5.0, 5.0, 1.0]);
        assert_eq!(g.shape(), [19, 19, 11]);
        assert_eq!(g.len(), 19 * 19 * 11);
        assert_eq!(g.point(0), ReflectionParameters::new(-45.0, -45.0, -5.0));
        assert_eq!(g.point(g.len() - 1), ReflectionParameters::new(45.0, 45.0, 5.0));
    }

    #[test]
    fn innermost_axis_is_left_right() {
        let g = grid([1.0, 1.0, 1.0], [1.0, 1.0, 1.0]);
        let pts: Vec<[f64; 3]> = g.iter().take(4).map(|p| p.to_array()).collect();
        assert_eq!(
            pts,
            vec![
                [-1.0, -1.0, -1.0],
                [-1.0, -1.0, 0.0],
                [-1.0, -1.0, 1.0],
                [-1.0, 0.0, -1.0]
            ]
        );
    }

    #[test]
    fn counts_follow_floor_formula() {
        let g = grid([10.0, 3.0, 0.3], [4.0, 2.0, 0.1]);
        // floor(20/4)+1, floor(6/2)+1, floor(0.6/0.1)+1 despite round-off.
        assert_eq!(g.shape(), [6, 4, 7]);
        let last = g.point(g.len() - 1);
        assert!(last.approx_eq(&ReflectionParameters::new(10.0, 3.0, 0.3), 1e-12));
    }

    #[test]
    fn non_divisible_range_stays_inside_interval() {
        let g = grid([5.0, 0.0, 0.0], [3.0, 1.0, 1.0]);
        assert_eq!(g.shape(), [4, 1, 1]);
        let values: Vec<f64> = g.iter().map(|p| p.head_tilt_deg).collect();
        assert_eq!(values, vec![-5.0, -2.0, 1.0, 4.0]);
    }

    #[test]
    fn step_of_full_width_collapses_axis() {
        let g = grid([2.0, 2.5, 1.0], [4.0, 5.0, 1.999]);
        assert_eq!(g.shape(), [1, 1, 2]);
        assert_eq!(g.point(0).head_tilt_deg, 0.0);
    }

    #[test]
    fn degenerate_axes_collapse_to_center() {
        let center = ReflectionParameters::new(3.0, -2.0, 1.5);
        let options = SearchOptions {
            head_tilt: AxisSweep::new(2.0, 5.0),
            base_angle: AxisSweep::new(0.0, 0.5),
            left_right: AxisSweep::fixed(),
        };
        let g = SearchGrid::new(&center, &options).unwrap();
        assert_eq!(g.len(), 1);
        assert_eq!(g.point(0), center);
    }

    #[test]
    fn grid_is_centered_on_initial_guess() {
        let center = ReflectionParameters::new(10.0, 0.0, -2.0);
        let options = SearchOptions::from_ranges([5.0, 0.0, 1.0], [5.0, 1.0, 1.0]);
        let g = SearchGrid::new(&center, &options).unwrap();
        let ha: Vec<f64> = g.iter().step_by(3).map(|p| p.head_tilt_deg).collect();
        assert_eq!(ha, vec![5.0, 10.0, 15.0]);
        assert_eq!(g.point(0).left_right_mm, -3.0);
    }

    #[test]
    fn oversized_grids_are_rejected() {
        for (ranges, steps) in [
            ([1e308, 0.0, 0.0], [1.0, 1.0, 1.0]),
            ([1e12, 1e12, 0.0], [1e-9, 1e-9, 1.0]),
            ([1e9, 1e9, 1e9], [1.0, 1.0, 1.0]),
        ] {
            let options = SearchOptions::from_ranges(ranges, steps);
            assert!(options.validate().is_ok());
            let err = SearchGrid::new(&ReflectionParameters::IDENTITY, &options).unwrap_err();
            assert!(
                matches!(err, SearchError::GridTooLarge { .. }),
                "ranges={ranges:?}: {err:?}"
            );
        }
    }

    #[test]
    fn invalid_step_is_rejected_before_enumeration() {
        let err = SearchGrid::new(
            &ReflectionParameters::IDENTITY,
            &SearchOptions::from_ranges([45.0, 45.0, 5.0], [5.0, 5.0, 0.0]),
        )
        .unwrap_err();
        assert!(matches!(err, SearchError::InvalidStep { .. }));
    }
}
