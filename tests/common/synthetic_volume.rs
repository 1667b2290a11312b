use symmetry_plane::{Volume, VolumeGeometry};

/// Smooth "head" that is mirror-symmetric about the central x plane but not
/// about any other axis: an ellipsoidal blob with an anterior ridge and a
/// superior gradient.
pub fn symmetric_head(dims: [usize; 3], geometry: VolumeGeometry) -> Volume {
    assert!(dims.iter().all(|&n| n > 1), "volume dimensions must exceed one");
    let c = dims.map(|n| (n - 1) as f32 * 0.5);
    let r = dims.map(|n| n as f32 * 0.4);
    Volume::from_fn(dims, geometry, |x, y, z| {
        let dx = (x as f32 - c[0]) / r[0];
        let dy = (y as f32 - c[1]) / r[1];
        let dz = (z as f32 - c[2]) / r[2];
        let d2 = dx * dx + dy * dy + dz * dz;
        let blob = 200.0 * (-1.5 * d2).exp();
        let ridge = if dy > 0.3 { 40.0 * (1.0 - dx.abs()).max(0.0) } else { 0.0 };
        blob + ridge + 15.0 * (z as f32 / dims[2] as f32) + 5.0 * (y as f32 / dims[1] as f32)
    })
    .expect("synthetic head has a valid shape")
}

/// Radially symmetric blob around the volume centre.
pub fn radial_blob(dims: [usize; 3], sigma: f32) -> Volume {
    let c = dims.map(|n| (n - 1) as f32 * 0.5);
    Volume::from_fn(dims, VolumeGeometry::default(), |x, y, z| {
        let d2 = (x as f32 - c[0]).powi(2) + (y as f32 - c[1]).powi(2) + (z as f32 - c[2]).powi(2);
        100.0 * (-d2 / (2.0 * sigma * sigma)).exp()
    })
    .expect("blob has a valid shape")
}

/// Copy of `volume` with one voxel overwritten.
pub fn with_bright_voxel(volume: &Volume, at: [usize; 3], value: f32) -> Volume {
    let mut out = volume.clone();
    out.set(at[0], at[1], at[2], value);
    out
}
