use nalgebra::{Rotation3, Vector3};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Parametrisation of a candidate mirror plane.
///
/// The nominal plane passes through the volume centre with its normal along
/// the physical x (left-right) axis. `head_tilt_deg` rotates that normal about
/// the z (superior-inferior) axis, `base_angle_deg` about the y
/// (anterior-posterior) axis, and `left_right_mm` shifts the plane along x.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReflectionParameters {
    pub head_tilt_deg: f64,
    pub base_angle_deg: f64,
    pub left_right_mm: f64,
}

impl ReflectionParameters {
    pub const IDENTITY: Self = Self {
        head_tilt_deg: 0.0,
        base_angle_deg: 0.0,
        left_right_mm: 0.0,
    };

    pub const fn new(head_tilt_deg: f64, base_angle_deg: f64, left_right_mm: f64) -> Self {
        Self {
            head_tilt_deg,
            base_angle_deg,
            left_right_mm,
        }
    }

    pub const fn from_array(v: [f64; 3]) -> Self {
        Self::new(v[0], v[1], v[2])
    }

    pub const fn to_array(self) -> [f64; 3] {
        [self.head_tilt_deg, self.base_angle_deg, self.left_right_mm]
    }

    /// Rotation carrying the nominal plane normal onto the candidate normal.
    pub fn rotation(&self) -> Rotation3<f64> {
        let tilt = Rotation3::from_axis_angle(&Vector3::z_axis(), self.head_tilt_deg.to_radians());
        let base =
            Rotation3::from_axis_angle(&Vector3::y_axis(), self.base_angle_deg.to_radians());
        tilt * base
    }

    /// Component-wise comparison with an absolute tolerance.
    pub fn approx_eq(&self, other: &Self, tol: f64) -> bool {
        self.to_array()
            .iter()
            .zip(other.to_array().iter())
            .all(|(a, b)| (a - b).abs() <= tol)
    }
}

impl fmt::Display for ReflectionParameters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}, {}, {}]",
            self.head_tilt_deg, self.base_angle_deg, self.left_right_mm
        )
    }
}
