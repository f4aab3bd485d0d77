//! Topology-specific error types.

use pn_core::{PnError, SegmentId};
use thiserror::Error;

use crate::topology::Region;

pub type TopologyResult<T> = Result<T, TopologyError>;

/// Structural errors found when a topology is validated as a whole.
///
/// Store mutations never produce these: a mutation addressing a missing
/// identity is a silent no-op.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TopologyError {
    #[error("Segment {id} appears twice (in {first} and in {second})")]
    DuplicateId {
        id: SegmentId,
        first: Region,
        second: Region,
    },

    #[error("Segment #{position} in {region} has an empty identity")]
    EmptyId { region: Region, position: usize },

    #[error("Segment {id} is invalid: {source}")]
    InvalidSegment {
        id: SegmentId,
        #[source]
        source: PnError,
    },

    #[error("Fitting #{index} of segment {id} is invalid: {what}")]
    InvalidFitting {
        id: SegmentId,
        index: usize,
        what: &'static str,
    },
}
