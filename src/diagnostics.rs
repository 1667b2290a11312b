//! Report written by the `symmetry_search` tool.
//!
//! `SearchReport` bundles a summary of the working volume, the initial and
//! best candidates, and the `PipelineTiming` of the stages that produced them.

use crate::search::{EvaluationRecord, SearchResult};
use crate::volume::Volume;
use serde::Serialize;
use std::time::Instant;

/// Wall-clock time spent in one pipeline stage.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StageTiming {
    pub stage: &'static str,
    pub elapsed_ms: f64,
}

/// Stage timings of one tool run, in execution order.
#[derive(Clone, Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineTiming {
    stages: Vec<StageTiming>,
}

impl PipelineTiming {
    /// Run `f` as `stage` and record how long it took.
    pub fn measure<T>(&mut self, stage: &'static str, f: impl FnOnce() -> T) -> T {
        let t0 = Instant::now();
        let out = f();
        self.record(stage, t0.elapsed().as_secs_f64() * 1000.0);
        out
    }

    pub fn record(&mut self, stage: &'static str, elapsed_ms: f64) {
        self.stages.push(StageTiming { stage, elapsed_ms });
    }

    pub fn stages(&self) -> &[StageTiming] {
        &self.stages
    }

    /// Time of the first stage named `stage`.
    pub fn elapsed_ms(&self, stage: &str) -> Option<f64> {
        self.stages
            .iter()
            .find(|s| s.stage == stage)
            .map(|s| s.elapsed_ms)
    }

    pub fn total_ms(&self) -> f64 {
        self.stages.iter().map(|s| s.elapsed_ms).sum()
    }
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VolumeSummary {
    pub dims: [usize; 3],
    pub spacing: [f64; 3],
}

impl VolumeSummary {
    pub fn of(volume: &Volume) -> Self {
        let s = volume.spacing();
        Self {
            dims: volume.dims(),
            spacing: [s.x, s.y, s.z],
        }
    }
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchReport {
    pub working_volume: VolumeSummary,
    pub initial: EvaluationRecord,
    pub best: EvaluationRecord,
    pub improved: bool,
    pub evaluations: usize,
    pub degenerate: usize,
    pub total_ms: f64,
    pub timing: PipelineTiming,
}

impl SearchReport {
    pub fn new(working: &Volume, result: &SearchResult, timing: PipelineTiming) -> Self {
        Self {
            working_volume: VolumeSummary::of(working),
            initial: result.initial,
            best: result.best,
            improved: result.improved(),
            evaluations: result.evaluations,
            degenerate: result.degenerate,
            total_ms: timing.total_ms(),
            timing,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stages_keep_execution_order() {
        let mut timing = PipelineTiming::default();
        timing.record("load", 2.5);
        let value = timing.measure("standardize", || 41 + 1);
        timing.record("search", 10.0);
        assert_eq!(value, 42);

        let names: Vec<&str> = timing.stages().iter().map(|s| s.stage).collect();
        assert_eq!(names, ["load", "standardize", "search"]);
        assert_eq!(timing.elapsed_ms("search"), Some(10.0));
        assert_eq!(timing.elapsed_ms("downsample"), None);
        assert!(timing.total_ms() >= 12.5);

        let json = serde_json::to_value(&timing).unwrap();
        assert_eq!(json["stages"][2]["stage"], "search");
        assert_eq!(json["stages"][2]["elapsedMs"], 10.0);
    }
}
