use super::grid::SearchGrid;
use super::options::SearchOptions;
use super::trace::{CountingTrace, EvaluationRecord, TraceSink};
use crate::error::SearchError;
use crate::metric::{is_degenerate, ReflectiveCorrelation, SymmetryMetric, DEGENERATE_SCORE};
use crate::reflection::ReflectionParameters;
use crate::volume::Volume;
use log::debug;
use serde::Serialize;
use std::time::Instant;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Outcome of an exhaustive sweep.
#[derive(Clone, Debug, Serialize)]
pub struct SearchResult {
    /// Best candidate, or the initial guess when nothing beat it.
    pub best: EvaluationRecord,
    /// Initial guess and the score it started with.
    pub initial: EvaluationRecord,
    /// Number of grid points evaluated.
    pub evaluations: usize,
    /// Grid points whose score was undefined.
    pub degenerate: usize,
    pub latency_ms: f64,
}

impl SearchResult {
    /// Whether some grid point strictly beat the initial score.
    pub fn improved(&self) -> bool {
        self.best.score > self.initial.score
    }
}

/// Brute-force sweep of a bounded neighbourhood around an initial plane.
///
/// The grid is enumerated in canonical order (see [`SearchGrid`]); the
/// running best only changes on a strictly greater score, so ties keep the
/// earliest candidate. With the `parallel` feature the scores are computed
/// concurrently but reduced in canonical order, giving the same result and
/// trace as the serial sweep.
#[derive(Clone, Debug)]
pub struct ExhaustiveSearch<M = ReflectiveCorrelation> {
    options: SearchOptions,
    metric: M,
}

impl ExhaustiveSearch<ReflectiveCorrelation> {
    pub fn new(options: SearchOptions) -> Self {
        Self::with_metric(options, ReflectiveCorrelation)
    }
}

impl Default for ExhaustiveSearch<ReflectiveCorrelation> {
    fn default() -> Self {
        Self::new(SearchOptions::default())
    }
}

impl<M: SymmetryMetric> ExhaustiveSearch<M> {
    pub fn with_metric(options: SearchOptions, metric: M) -> Self {
        Self { options, metric }
    }

    pub fn options(&self) -> &SearchOptions {
        &self.options
    }

    pub fn metric(&self) -> &M {
        &self.metric
    }

    /// Evaluate `initial` with the metric and sweep around it.
    pub fn run(
        &self,
        volume: &Volume,
        initial: ReflectionParameters,
        trace: Option<&mut dyn TraceSink>,
    ) -> Result<SearchResult, SearchError> {
        self.options.validate()?;
        let initial_score = self.metric.evaluate(volume, &initial);
        self.search(volume, initial, initial_score, trace)
    }

    /// Sweep the grid centred on `initial`, starting from a caller-supplied
    /// `initial_score`. Configuration errors are reported before any
    /// evaluation; otherwise the sweep always completes.
    ///
    /// A NaN `initial_score` is replaced by [`DEGENERATE_SCORE`], so the
    /// returned `initial` (and `best`, if nothing beats it) then carries
    /// `-inf` rather than the NaN that was passed in. Any other score,
    /// including `-inf` itself, is echoed back unchanged.
    pub fn search(
        &self,
        volume: &Volume,
        initial: ReflectionParameters,
        initial_score: f64,
        trace: Option<&mut dyn TraceSink>,
    ) -> Result<SearchResult, SearchError> {
        let grid = SearchGrid::new(&initial, &self.options)?;
        let start = Instant::now();
        debug!(
            "exhaustive search: grid {:?} ({} candidates) around {}",
            grid.shape(),
            grid.len(),
            initial
        );

        let initial_score = if initial_score.is_nan() {
            DEGENERATE_SCORE
        } else {
            initial_score
        };
        let mut counter = CountingTrace::default();
        let sink: &mut dyn TraceSink = match trace {
            Some(sink) => sink,
            None => &mut counter,
        };
        let mut reduction = Reduction::new(EvaluationRecord::new(initial, initial_score));

        #[cfg(feature = "parallel")]
        {
            let scores: Vec<f64> = (0..grid.len())
                .into_par_iter()
                .map(|k| self.metric.evaluate(volume, &grid.point(k)))
                .collect();
            for (k, score) in scores.into_iter().enumerate() {
                reduction.observe(EvaluationRecord::new(grid.point(k), score), sink);
            }
        }
        #[cfg(not(feature = "parallel"))]
        {
            for params in grid.iter() {
                let score = self.metric.evaluate(volume, &params);
                reduction.observe(EvaluationRecord::new(params, score), sink);
            }
        }

        let latency_ms = start.elapsed().as_secs_f64() * 1000.0;
        debug!(
            "exhaustive search: best {} score={:.6} ({} evaluated, {} degenerate, {:.1} ms)",
            reduction.best.params,
            reduction.best.score,
            reduction.evaluations,
            reduction.degenerate,
            latency_ms
        );
        Ok(SearchResult {
            best: reduction.best,
            initial: EvaluationRecord::new(initial, initial_score),
            evaluations: reduction.evaluations,
            degenerate: reduction.degenerate,
            latency_ms,
        })
    }
}

/// Running max-by-score fold; first seen wins on ties.
struct Reduction {
    best: EvaluationRecord,
    evaluations: usize,
    degenerate: usize,
}

impl Reduction {
    fn new(initial: EvaluationRecord) -> Self {
        Self {
            best: initial,
            evaluations: 0,
            degenerate: 0,
        }
    }

    fn observe(&mut self, record: EvaluationRecord, sink: &mut dyn TraceSink) {
        self.evaluations += 1;
        if is_degenerate(record.score) {
            self.degenerate += 1;
        } else if record.score > self.best.score {
            debug!("new best {} score={:.6}", record.params, record.score);
            self.best = record;
        }
        sink.record(record);
    }
}
