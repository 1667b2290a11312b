//! I/O helpers for volumes, traces and JSON.
//!
//! - `load_volume`: read a raw little-endian sample file described by a JSON
//!   header (`VolumeHeader`).
//! - `save_volume`: write a volume as `f32` samples plus its JSON header.
//! - `write_trace_csv`: persist the ordered evaluation trace of a sweep.
//! - `write_json_file`: pretty-print a serializable value to disk.
use super::grid::sample_count;
use super::{Volume, VolumeGeometry};
use crate::search::EvaluationRecord;
use nalgebra::{Matrix3, Point3, Vector3};
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

/// Sample encoding of the raw data file.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PixelType {
    U8,
    I16,
    U16,
    F32,
    F64,
}

impl PixelType {
    pub fn bytes_per_sample(self) -> usize {
        match self {
            PixelType::U8 => 1,
            PixelType::I16 | PixelType::U16 => 2,
            PixelType::F32 => 4,
            PixelType::F64 => 8,
        }
    }

    fn decode(self, bytes: &[u8]) -> Vec<f32> {
        let n = self.bytes_per_sample();
        bytes
            .chunks_exact(n)
            .map(|c| match self {
                PixelType::U8 => c[0] as f32,
                PixelType::I16 => i16::from_le_bytes([c[0], c[1]]) as f32,
                PixelType::U16 => u16::from_le_bytes([c[0], c[1]]) as f32,
                PixelType::F32 => f32::from_le_bytes([c[0], c[1], c[2], c[3]]),
                PixelType::F64 => {
                    f64::from_le_bytes([c[0], c[1], c[2], c[3], c[4], c[5], c[6], c[7]]) as f32
                }
            })
            .collect()
    }
}

fn default_spacing() -> [f64; 3] {
    [1.0, 1.0, 1.0]
}

fn identity_direction() -> [[f64; 3]; 3] {
    [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]]
}

/// JSON sidecar describing a raw volume file.
///
/// `direction` is given row by row; its columns are the physical directions
/// of the index axes. `data_file` is resolved relative to the header.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct VolumeHeader {
    pub dims: [usize; 3],
    #[serde(default = "default_spacing")]
    pub spacing: [f64; 3],
    #[serde(default)]
    pub origin: [f64; 3],
    #[serde(default = "identity_direction")]
    pub direction: [[f64; 3]; 3],
    pub pixel_type: PixelType,
    pub data_file: PathBuf,
}

impl VolumeHeader {
    pub fn geometry(&self) -> VolumeGeometry {
        let d = &self.direction;
        VolumeGeometry {
            spacing: Vector3::from(self.spacing),
            origin: Point3::from(self.origin),
            direction: Matrix3::new(
                d[0][0], d[0][1], d[0][2], d[1][0], d[1][1], d[1][2], d[2][0], d[2][1], d[2][2],
            ),
        }
    }
}

/// Load a volume from its JSON header and raw sample file.
pub fn load_volume(header_path: &Path) -> Result<Volume, String> {
    let text = fs::read_to_string(header_path)
        .map_err(|e| format!("Failed to read header {}: {e}", header_path.display()))?;
    let header: VolumeHeader = serde_json::from_str(&text)
        .map_err(|e| format!("Failed to parse header {}: {e}", header_path.display()))?;

    let expected = sample_count(header.dims)
        .and_then(|n| n.checked_mul(header.pixel_type.bytes_per_sample()))
        .ok_or_else(|| {
            format!(
                "Volume {} dims overflow: {:?}",
                header_path.display(),
                header.dims
            )
        })?;
    let data_path = resolve_relative(header_path, &header.data_file);
    let bytes = fs::read(&data_path)
        .map_err(|e| format!("Failed to read volume data {}: {e}", data_path.display()))?;
    if bytes.len() != expected {
        return Err(format!(
            "Volume data {} has {} bytes, expected {expected} for dims {:?} ({:?})",
            data_path.display(),
            bytes.len(),
            header.dims,
            header.pixel_type
        ));
    }
    let data = header.pixel_type.decode(&bytes);
    Volume::from_parts(header.dims, header.geometry(), data)
        .map_err(|e| format!("Invalid volume {}: {e}", header_path.display()))
}

/// Save a volume as `f32` samples next to a JSON header.
///
/// The raw file takes the header's file stem with a `.raw` extension.
pub fn save_volume(header_path: &Path, volume: &Volume) -> Result<(), String> {
    ensure_parent_dir(header_path)?;
    let data_file = PathBuf::from(header_path.file_stem().unwrap_or_default()).with_extension("raw");
    let g = volume.geometry();
    let dir = &g.direction;
    let header = VolumeHeader {
        dims: volume.dims(),
        spacing: [g.spacing.x, g.spacing.y, g.spacing.z],
        origin: [g.origin.x, g.origin.y, g.origin.z],
        direction: [
            [dir[(0, 0)], dir[(0, 1)], dir[(0, 2)]],
            [dir[(1, 0)], dir[(1, 1)], dir[(1, 2)]],
            [dir[(2, 0)], dir[(2, 1)], dir[(2, 2)]],
        ],
        pixel_type: PixelType::F32,
        data_file: data_file.clone(),
    };

    let mut bytes = Vec::with_capacity(volume.len() * 4);
    for v in volume.data() {
        bytes.extend_from_slice(&v.to_le_bytes());
    }
    let data_path = resolve_relative(header_path, &data_file);
    fs::write(&data_path, bytes)
        .map_err(|e| format!("Failed to write volume data {}: {e}", data_path.display()))?;
    write_json_file(header_path, &header)
}

/// Write the evaluation trace as CSV, one row per visited candidate.
pub fn write_trace_csv(path: &Path, records: &[EvaluationRecord]) -> Result<(), String> {
    ensure_parent_dir(path)?;
    let mut out = String::from("head_tilt_deg,base_angle_deg,left_right_mm,score\n");
    for r in records {
        let p = &r.params;
        // Writing into a String cannot fail.
        let _ = writeln!(
            out,
            "{},{},{},{}",
            p.head_tilt_deg, p.base_angle_deg, p.left_right_mm, r.score
        );
    }
    fs::write(path, out).map_err(|e| format!("Failed to write trace {}: {e}", path.display()))
}

/// Serialize a value as pretty JSON to `path`, creating parent directories.
pub fn write_json_file<T: Serialize>(path: &Path, value: &T) -> Result<(), String> {
    ensure_parent_dir(path)?;
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| format!("Failed to serialize JSON for {}: {e}", path.display()))?;
    fs::write(path, json).map_err(|e| format!("Failed to write JSON {}: {e}", path.display()))
}

fn resolve_relative(anchor: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        return path.to_path_buf();
    }
    match anchor.parent() {
        Some(parent) => parent.join(path),
        None => path.to_path_buf(),
    }
}

fn ensure_parent_dir(path: &Path) -> Result<(), String> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .map_err(|e| format!("Failed to create {}: {e}", parent.display()))?;
        }
    }
    Ok(())
}
