//! pn-results: calculation wire types and everything derived from responses.
//!
//! Provides:
//! - request/response types of the external calculation service
//! - the result correlator (segment identity → computed result)
//! - the chart series merger (system curve + pump curve + operating point)
//! - request fingerprints and a recorded-response book

pub mod book;
pub mod chart;
pub mod correlate;
pub mod hash;
pub mod request;
pub mod types;

pub use book::ResponseBook;
pub use chart::{ChartMerger, ChartPoint, OperatingMarker, merge};
pub use correlate::ResultCorrelator;
pub use hash::fingerprint;
pub use request::{CurveRange, HydraulicInputs, OperatingPointRequest, SystemCurveRequest};
pub use types::*;

pub type ResultsResult<T> = Result<T, ResultsError>;

#[derive(thiserror::Error, Debug)]
pub enum ResultsError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
