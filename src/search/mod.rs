//! Exhaustive grid search for the best reflection plane.
//!
//! - [`options`] – per-axis ranges and step sizes, validated up front.
//! - [`grid`] – canonical enumeration of the candidate grid.
//! - `trace` – evaluation records and the sinks that collect them.
//! - `optimizer` – the [`ExhaustiveSearch`] driver joining grid, metric and
//!   trace.

pub mod grid;
mod optimizer;
pub mod options;
mod trace;

pub use grid::{AxisSamples, SearchGrid};
pub use optimizer::{ExhaustiveSearch, SearchResult};
pub use options::{AxisSweep, SearchOptions};
pub use trace::{CountingTrace, EvaluationRecord, TraceSink};
