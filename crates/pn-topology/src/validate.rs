//! Topology validation logic.

use std::collections::HashMap;

use pn_core::{SegmentId, ensure_non_negative, ensure_positive};

use crate::error::{TopologyError, TopologyResult};
use crate::segment::Segment;
use crate::topology::{Region, Topology};

/// Check that every identity is non-empty and unique across the whole topology.
pub fn validate_identities(topology: &Topology) -> TopologyResult<()> {
    let mut seen: HashMap<&SegmentId, Region> = HashMap::new();
    let mut position = 0usize;
    let mut last_region: Option<Region> = None;

    for (region, segment) in topology.segments() {
        // Position restarts at every region boundary
        if last_region.as_ref() != Some(&region) {
            position = 0;
            last_region = Some(region.clone());
        }
        if segment.id.is_empty() {
            return Err(TopologyError::EmptyId { region, position });
        }
        if let Some(first) = seen.get(&segment.id) {
            return Err(TopologyError::DuplicateId {
                id: segment.id.clone(),
                first: first.clone(),
                second: region,
            });
        }
        seen.insert(&segment.id, region);
        position += 1;
    }

    Ok(())
}

/// Check physical plausibility of one segment's values.
pub fn validate_segment(segment: &Segment) -> TopologyResult<()> {
    let wrap = |source| TopologyError::InvalidSegment {
        id: segment.id.clone(),
        source,
    };
    ensure_positive(segment.length_m, "length_m").map_err(wrap)?;
    ensure_positive(segment.diameter_mm, "diameter_mm").map_err(wrap)?;
    ensure_non_negative(segment.roughness_mm, "roughness_mm").map_err(wrap)?;
    ensure_non_negative(segment.equipment_loss_m, "equipment_loss_m").map_err(wrap)?;

    for (index, fitting) in segment.fittings.iter().enumerate() {
        if fitting.quantity == 0 {
            return Err(TopologyError::InvalidFitting {
                id: segment.id.clone(),
                index,
                what: "quantity must be at least 1",
            });
        }
        if !fitting.k.is_finite() || fitting.k < 0.0 {
            return Err(TopologyError::InvalidFitting {
                id: segment.id.clone(),
                index,
                what: "loss coefficient must be finite and non-negative",
            });
        }
    }

    Ok(())
}

/// Identities plus per-segment values: what a saved scenario must satisfy.
pub fn validate_topology(topology: &Topology) -> TopologyResult<()> {
    validate_identities(topology)?;
    for (_, segment) in topology.segments() {
        validate_segment(segment)?;
    }
    Ok(())
}
