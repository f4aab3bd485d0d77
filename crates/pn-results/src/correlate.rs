//! Segment identity → computed result lookup.
//!
//! Rebuilt from scratch for every operating-point response; never patched.

use std::collections::HashMap;

use pn_core::SegmentId;
use pn_topology::Topology;
use tracing::debug;

use crate::types::{OperatingPointResponse, SegmentResult};

#[derive(Debug, Clone, Default)]
pub struct ResultCorrelator {
    by_id: HashMap<SegmentId, SegmentResult>,
    flow_m3h: Option<f64>,
    generation: u64,
}

impl ResultCorrelator {
    /// No results at all: every segment resolves to "no data".
    pub fn empty() -> Self {
        Self::default()
    }

    /// Index `results` by segment identity.
    ///
    /// Entries without an identity cannot be correlated and are skipped. When
    /// the same identity appears twice the first entry wins.
    pub fn from_results(generation: u64, flow_m3h: Option<f64>, results: &[SegmentResult]) -> Self {
        let mut by_id = HashMap::with_capacity(results.len());
        let mut skipped = 0usize;
        for result in results {
            match &result.section_id {
                Some(id) => {
                    by_id.entry(id.clone()).or_insert_with(|| result.clone());
                }
                None => skipped += 1,
            }
        }
        if skipped > 0 {
            debug!(skipped, "results without section id ignored");
        }
        Self {
            by_id,
            flow_m3h,
            generation,
        }
    }

    pub fn from_response(generation: u64, response: &OperatingPointResponse) -> Self {
        Self::from_results(generation, Some(response.flow_op), &response.details)
    }

    pub fn result_for(&self, id: &SegmentId) -> Option<&SegmentResult> {
        self.by_id.get(id)
    }

    /// System flow of the run the results came from (m³/h).
    pub fn flow_m3h(&self) -> Option<f64> {
        self.flow_m3h
    }

    /// Identifies the response this index was built from.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }

    /// Results whose segment no longer exists in `topology`.
    pub fn stale_count(&self, topology: &Topology) -> usize {
        self.by_id.keys().filter(|id| !topology.contains(id)).count()
    }

    /// Live segments that have no result yet.
    pub fn missing<'a>(&'a self, topology: &'a Topology) -> impl Iterator<Item = &'a SegmentId> {
        topology.ids().filter(|id| !self.by_id.contains_key(*id))
    }
}
