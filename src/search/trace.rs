use crate::reflection::ReflectionParameters;
use serde::{Deserialize, Serialize};

/// One evaluated candidate.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct EvaluationRecord {
    pub params: ReflectionParameters,
    pub score: f64,
}

impl EvaluationRecord {
    pub const fn new(params: ReflectionParameters, score: f64) -> Self {
        Self { params, score }
    }
}

/// Receives every evaluation of a sweep in canonical visitation order.
///
/// Sinks only collect; persistence happens after the sweep (see
/// [`crate::volume::io::write_trace_csv`]).
pub trait TraceSink {
    fn record(&mut self, record: EvaluationRecord);
}

impl TraceSink for Vec<EvaluationRecord> {
    fn record(&mut self, record: EvaluationRecord) {
        self.push(record);
    }
}

/// Sink that counts records without keeping them.
#[derive(Clone, Copy, Debug, Default)]
pub struct CountingTrace {
    pub records: usize,
}

impl TraceSink for CountingTrace {
    fn record(&mut self, _record: EvaluationRecord) {
        self.records += 1;
    }
}
