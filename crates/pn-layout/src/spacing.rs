//! Horizontal run length per segment.

use pn_topology::Topology;
use serde::{Deserialize, Serialize};

/// Run length as a non-increasing step function of the segment count.
///
/// Up to `threshold` units every run is `base` long. Each unit beyond that
/// shortens every run by `shrink_per_segment`, down to `min`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpacingPolicy {
    pub base: f64,
    pub min: f64,
    pub threshold: usize,
    pub shrink_per_segment: f64,
}

impl Default for SpacingPolicy {
    fn default() -> Self {
        Self {
            base: 250.0,
            min: 130.0,
            threshold: 2,
            shrink_per_segment: 40.0,
        }
    }
}

impl SpacingPolicy {
    /// Same run length regardless of topology size.
    pub fn fixed(spacing: f64) -> Self {
        Self {
            base: spacing,
            min: spacing,
            threshold: usize::MAX,
            shrink_per_segment: 0.0,
        }
    }

    /// Units counted by the policy: series segments plus one for the whole
    /// parallel set, however many branches it has.
    pub fn units(topology: &Topology) -> usize {
        topology.suction.len()
            + topology.discharge_before.len()
            + topology.discharge_after.len()
            + usize::from(topology.has_branches())
    }

    pub fn spacing_for(&self, units: usize) -> f64 {
        if units <= self.threshold {
            return self.base;
        }
        let extra = (units - self.threshold) as f64;
        (self.base - extra * self.shrink_per_segment).max(self.min)
    }

    pub fn spacing(&self, topology: &Topology) -> f64 {
        self.spacing_for(Self::units(topology))
    }
}
