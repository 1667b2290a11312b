//! Owned single-channel 3D scalar volume with physical geometry.
//!
//! Samples are stored in x-fastest order (`x + nx * (y + ny * z)`). The
//! physical location of a (continuous) index `i` is
//! `origin + direction * diag(spacing) * i`, matching the usual medical-image
//! convention. Both directions of that mapping are precomputed at
//! construction so samplers only do a matrix-vector product per voxel.
use crate::error::VolumeError;
use nalgebra::{Matrix3, Point3, Vector3};
use serde::{Deserialize, Serialize};

/// Spacing, origin and direction cosines of a volume.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct VolumeGeometry {
    /// Physical size of a voxel along each index axis (millimetres).
    pub spacing: Vector3<f64>,
    /// Physical location of index `(0, 0, 0)`.
    pub origin: Point3<f64>,
    /// Columns are the physical directions of the index axes.
    pub direction: Matrix3<f64>,
}

impl Default for VolumeGeometry {
    fn default() -> Self {
        Self {
            spacing: Vector3::new(1.0, 1.0, 1.0),
            origin: Point3::origin(),
            direction: Matrix3::identity(),
        }
    }
}

impl VolumeGeometry {
    pub fn with_spacing(mut self, spacing: Vector3<f64>) -> Self {
        self.spacing = spacing;
        self
    }

    pub fn with_origin(mut self, origin: Point3<f64>) -> Self {
        self.origin = origin;
        self
    }

    pub fn with_direction(mut self, direction: Matrix3<f64>) -> Self {
        self.direction = direction;
        self
    }
}

/// `nx * ny * nz`, or `None` on overflow.
pub(crate) fn sample_count(dims: [usize; 3]) -> Option<usize> {
    dims[0].checked_mul(dims[1])?.checked_mul(dims[2])
}

#[derive(Clone, Debug)]
pub struct Volume {
    dims: [usize; 3],
    geometry: VolumeGeometry,
    data: Vec<f32>,
    index_to_physical: Matrix3<f64>,
    physical_to_index: Matrix3<f64>,
}

impl Volume {
    /// Assemble a volume, validating the sample count and the geometry.
    pub fn from_parts(
        dims: [usize; 3],
        geometry: VolumeGeometry,
        data: Vec<f32>,
    ) -> Result<Self, VolumeError> {
        if dims.iter().any(|&n| n == 0) {
            return Err(VolumeError::EmptyDomain { dims });
        }
        let expected = sample_count(dims).ok_or(VolumeError::TooLarge { dims })?;
        if data.len() != expected {
            return Err(VolumeError::DataLength {
                dims,
                expected,
                actual: data.len(),
            });
        }
        let s = geometry.spacing;
        if s.iter().any(|v| !v.is_finite() || *v <= 0.0) {
            return Err(VolumeError::InvalidSpacing {
                spacing: [s.x, s.y, s.z],
            });
        }
        let index_to_physical = geometry.direction * Matrix3::from_diagonal(&s);
        let physical_to_index = index_to_physical
            .try_inverse()
            .ok_or(VolumeError::SingularDirection)?;
        Ok(Self {
            dims,
            geometry,
            data,
            index_to_physical,
            physical_to_index,
        })
    }

    /// Unit-spacing volume at the origin with identity directions.
    pub fn new(dims: [usize; 3], data: Vec<f32>) -> Result<Self, VolumeError> {
        Self::from_parts(dims, VolumeGeometry::default(), data)
    }

    /// Volume of the given shape where every sample is `f(x, y, z)`.
    pub fn from_fn<F>(
        dims: [usize; 3],
        geometry: VolumeGeometry,
        mut f: F,
    ) -> Result<Self, VolumeError>
    where
        F: FnMut(usize, usize, usize) -> f32,
    {
        let len = sample_count(dims).ok_or(VolumeError::TooLarge { dims })?;
        let mut data = Vec::with_capacity(len);
        for z in 0..dims[2] {
            for y in 0..dims[1] {
                for x in 0..dims[0] {
                    data.push(f(x, y, z));
                }
            }
        }
        Self::from_parts(dims, geometry, data)
    }

    #[inline]
    pub fn dims(&self) -> [usize; 3] {
        self.dims
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    #[inline]
    pub fn geometry(&self) -> &VolumeGeometry {
        &self.geometry
    }

    #[inline]
    pub fn spacing(&self) -> Vector3<f64> {
        self.geometry.spacing
    }

    #[inline]
    pub fn data(&self) -> &[f32] {
        &self.data
    }

    #[inline]
    /// Convert (x, y, z) to a linear index into `data`.
    pub fn idx(&self, x: usize, y: usize, z: usize) -> usize {
        x + self.dims[0] * (y + self.dims[1] * z)
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize, z: usize) -> f32 {
        self.data[self.idx(x, y, z)]
    }

    #[inline]
    pub fn set(&mut self, x: usize, y: usize, z: usize, v: f32) {
        let i = self.idx(x, y, z);
        self.data[i] = v;
    }

    /// `direction * diag(spacing)`.
    #[inline]
    pub fn index_to_physical_matrix(&self) -> &Matrix3<f64> {
        &self.index_to_physical
    }

    #[inline]
    pub fn physical_to_index_matrix(&self) -> &Matrix3<f64> {
        &self.physical_to_index
    }

    /// Physical location of a continuous index.
    #[inline]
    pub fn index_to_physical(&self, index: &Vector3<f64>) -> Point3<f64> {
        self.geometry.origin + self.index_to_physical * index
    }

    /// Continuous index of a physical location.
    #[inline]
    pub fn physical_to_index(&self, point: &Point3<f64>) -> Vector3<f64> {
        self.physical_to_index * (point - self.geometry.origin)
    }

    /// Physical location of the centre of the index domain.
    pub fn physical_center(&self) -> Point3<f64> {
        let half = Vector3::new(
            (self.dims[0] - 1) as f64 * 0.5,
            (self.dims[1] - 1) as f64 * 0.5,
            (self.dims[2] - 1) as f64 * 0.5,
        );
        self.index_to_physical(&half)
    }

    /// Iterate voxel indices in storage order.
    pub fn indices(&self) -> impl Iterator<Item = [usize; 3]> + '_ {
        let [nx, ny, nz] = self.dims;
        (0..nz).flat_map(move |z| (0..ny).flat_map(move |y| (0..nx).map(move |x| [x, y, z])))
    }

    /// Replace the samples, keeping shape and geometry.
    pub(crate) fn with_data(&self, data: Vec<f32>) -> Self {
        debug_assert_eq!(data.len(), self.data.len());
        Self {
            dims: self.dims,
            geometry: self.geometry.clone(),
            data,
            index_to_physical: self.index_to_physical,
            physical_to_index: self.physical_to_index,
        }
    }
}
