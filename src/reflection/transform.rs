use super::ReflectionParameters;
use crate::volume::Volume;
use nalgebra::{Matrix3, Point3, Unit, Vector3};

/// Rigid reflection through a candidate plane, `q = H p + b`.
///
/// Equivalent to resampling into plane-aligned space with a centred rigid
/// transform `T`, flipping the x axis about the centre and mapping back:
/// `T ∘ M ∘ T⁻¹`.
#[derive(Clone, Debug)]
pub struct ReflectionTransform {
    normal: Unit<Vector3<f64>>,
    plane_point: Point3<f64>,
    linear: Matrix3<f64>,
    offset: Vector3<f64>,
}

impl ReflectionTransform {
    /// Build the reflection for `params` about the physical point `center`.
    pub fn from_parameters(params: &ReflectionParameters, center: &Point3<f64>) -> Self {
        let normal = params.rotation() * Vector3::x_axis();
        let plane_point = *center + Vector3::new(params.left_right_mm, 0.0, 0.0);
        let n = normal.into_inner();
        let linear = Matrix3::identity() - 2.0 * n * n.transpose();
        let offset = 2.0 * n.dot(&plane_point.coords) * n;
        Self {
            normal,
            plane_point,
            linear,
            offset,
        }
    }

    /// Reflection about the physical centre of `volume`.
    pub fn for_volume(params: &ReflectionParameters, volume: &Volume) -> Self {
        Self::from_parameters(params, &volume.physical_center())
    }

    pub fn normal(&self) -> &Unit<Vector3<f64>> {
        &self.normal
    }

    pub fn plane_point(&self) -> &Point3<f64> {
        &self.plane_point
    }

    #[inline]
    pub fn reflect(&self, p: &Point3<f64>) -> Point3<f64> {
        Point3::from(self.linear * p.coords + self.offset)
    }

    /// Signed distance of `p` from the plane along its normal.
    pub fn signed_distance(&self, p: &Point3<f64>) -> f64 {
        self.normal.dot(&(*p - self.plane_point))
    }

    /// The same reflection expressed on continuous voxel indices of `volume`.
    pub fn in_index_space(&self, volume: &Volume) -> IndexReflection {
        let to_index = volume.physical_to_index_matrix();
        let origin = volume.geometry().origin;
        IndexReflection {
            matrix: to_index * self.linear * volume.index_to_physical_matrix(),
            offset: to_index * (self.reflect(&origin) - origin),
        }
    }
}

/// Affine map between continuous voxel indices, `j = M i + m`.
#[derive(Clone, Copy, Debug)]
pub struct IndexReflection {
    pub matrix: Matrix3<f64>,
    pub offset: Vector3<f64>,
}

impl IndexReflection {
    #[inline]
    pub fn apply(&self, index: &Vector3<f64>) -> Vector3<f64> {
        self.matrix * index + self.offset
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::volume::VolumeGeometry;

    fn approx_point(a: &Point3<f64>, b: &Point3<f64>) -> bool {
        (a - b).norm() < 1e-9
    }

    #[test]
    fn identity_mirrors_across_center_x() {
        let center = Point3::new(10.0, 5.0, -2.0);
        let t = ReflectionTransform::from_parameters(&ReflectionParameters::IDENTITY, &center);
        let q = t.reflect(&Point3::new(13.0, 1.0, 4.0));
        assert!(approx_point(&q, &Point3::new(7.0, 1.0, 4.0)), "q = {q:?}");
    }

    #[test]
    fn reflection_is_an_involution() {
        let center = Point3::new(1.0, 2.0, 3.0);
        let params = ReflectionParameters::new(17.0, -33.0, 2.5);
        let t = ReflectionTransform::from_parameters(&params, &center);
        let p = Point3::new(-4.0, 8.5, 0.25);
        assert!(approx_point(&t.reflect(&t.reflect(&p)), &p));
    }

    #[test]
    fn offset_moves_plane_along_left_right() {
        let center = Point3::origin();
        let t = ReflectionTransform::from_parameters(
            &ReflectionParameters::new(0.0, 0.0, 3.0),
            &center,
        );
        // Points on the shifted plane are fixed.
        let on_plane = Point3::new(3.0, -7.0, 11.0);
        assert!(approx_point(&t.reflect(&on_plane), &on_plane));
        let q = t.reflect(&Point3::new(0.0, 0.0, 0.0));
        assert!(approx_point(&q, &Point3::new(6.0, 0.0, 0.0)));
    }

    #[test]
    fn reflection_preserves_distances_and_flips_side() {
        let params = ReflectionParameters::new(20.0, 10.0, -1.0);
        let t = ReflectionTransform::from_parameters(&params, &Point3::new(4.0, 4.0, 4.0));
        let a = Point3::new(1.0, 2.0, 3.0);
        let b = Point3::new(-3.0, 0.5, 9.0);
        let (ra, rb) = (t.reflect(&a), t.reflect(&b));
        assert!(((ra - rb).norm() - (a - b).norm()).abs() < 1e-9);
        assert!((t.signed_distance(&ra) + t.signed_distance(&a)).abs() < 1e-9);
    }

    #[test]
    fn index_space_map_agrees_with_physical_reflection() {
        let geometry = VolumeGeometry::default()
            .with_spacing(Vector3::new(1.5, 1.0, 2.0))
            .with_origin(Point3::new(-12.0, 7.0, 3.0))
            .with_direction(Matrix3::new(0.0, 1.0, 0.0, -1.0, 0.0, 0.0, 0.0, 0.0, 1.0));
        let vol = Volume::from_parts([8, 6, 5], geometry, vec![0.0; 240]).unwrap();
        let t = ReflectionTransform::for_volume(&ReflectionParameters::new(12.0, -8.0, 1.5), &vol);
        let map = t.in_index_space(&vol);

        let idx = Vector3::new(2.0, 4.0, 1.0);
        let expected = vol.physical_to_index(&t.reflect(&vol.index_to_physical(&idx)));
        assert!((map.apply(&idx) - expected).norm() < 1e-9);
    }

    #[test]
    fn identity_maps_index_domain_onto_itself() {
        let vol = Volume::new([6, 4, 3], vec![0.0; 72]).unwrap();
        let map = ReflectionTransform::for_volume(&ReflectionParameters::IDENTITY, &vol)
            .in_index_space(&vol);
        let j = map.apply(&Vector3::new(0.0, 2.0, 1.0));
        assert!((j - Vector3::new(5.0, 2.0, 1.0)).norm() < 1e-12, "j = {j:?}");
    }
}
