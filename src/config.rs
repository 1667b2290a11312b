//! JSON runtime configuration for the `symmetry_search` tool.
//!
//! ```json
//! {
//!   "input": "subject.json",
//!   "initial": { "head_tilt_deg": 0.0, "base_angle_deg": 0.0, "left_right_mm": 0.0 },
//!   "preprocess": { "downsample": { "target_spacing_mm": 4.0 } },
//!   "search": { "left_right": { "range": 5.0, "step": 1.0 } },
//!   "output": { "trace_csv": "out/trace.csv", "report_json": "out/report.json" }
//! }
//! ```
//!
//! Everything but `input` is optional. Relative paths are resolved against
//! the configuration file's directory.

use crate::preprocess::PreprocessOptions;
use crate::reflection::ReflectionParameters;
use crate::search::SearchOptions;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Clone, Debug, Default, Deserialize)]
pub struct OutputConfig {
    /// CSV trace of every evaluated candidate.
    pub trace_csv: Option<PathBuf>,
    /// JSON `SearchReport`.
    pub report_json: Option<PathBuf>,
    /// Header path for dumping the working (downsampled) volume.
    pub working_volume: Option<PathBuf>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct RuntimeConfig {
    /// JSON header of the input volume.
    pub input: PathBuf,
    #[serde(default)]
    pub initial: ReflectionParameters,
    #[serde(default)]
    pub preprocess: PreprocessOptions,
    #[serde(default)]
    pub search: SearchOptions,
    #[serde(default)]
    pub output: OutputConfig,
}

impl RuntimeConfig {
    fn resolve_paths(&mut self, base: &Path) {
        let resolve = |p: &mut PathBuf| {
            if p.is_relative() {
                *p = base.join(&*p);
            }
        };
        resolve(&mut self.input);
        for p in [
            &mut self.output.trace_csv,
            &mut self.output.report_json,
            &mut self.output.working_volume,
        ]
        .into_iter()
        .flatten()
        {
            resolve(p);
        }
    }
}

pub fn load_config(path: &Path) -> Result<RuntimeConfig, String> {
    let contents = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read config {}: {e}", path.display()))?;
    let mut config: RuntimeConfig = serde_json::from_str(&contents)
        .map_err(|e| format!("Failed to parse config {}: {e}", path.display()))?;
    if let Some(base) = path.parent() {
        config.resolve_paths(base);
    }
    config
        .search
        .validate()
        .map_err(|e| format!("Invalid search options in {}: {e}", path.display()))?;
    Ok(config)
}
