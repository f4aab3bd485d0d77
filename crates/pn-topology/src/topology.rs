//! The topology: suction → pump → discharge-before → parallel set → discharge-after.

use std::fmt;

use pn_core::SegmentId;
use serde::{Deserialize, Serialize};

use crate::branches::ParallelBranches;
use crate::segment::Segment;

/// Where a segment lives in the topology.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Region {
    Suction,
    DischargeBefore,
    /// A named parallel branch between the split and merge points.
    Branch(String),
    DischargeAfter,
}

impl Region {
    pub fn branch(name: impl Into<String>) -> Self {
        Region::Branch(name.into())
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Region::Suction => f.write_str("suction"),
            Region::DischargeBefore => f.write_str("discharge (before junction)"),
            Region::Branch(name) => write!(f, "branch '{name}'"),
            Region::DischargeAfter => f.write_str("discharge (after junction)"),
        }
    }
}

/// Complete piping arrangement of a pumping system.
///
/// Field names follow the calculation service's payload, so a topology can be
/// flattened straight into a request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Topology {
    #[serde(default, rename = "suction_sections")]
    pub suction: Vec<Segment>,
    #[serde(default, rename = "discharge_sections_before")]
    pub discharge_before: Vec<Segment>,
    #[serde(default, rename = "discharge_parallel_sections")]
    pub parallel_branches: ParallelBranches,
    #[serde(default, rename = "discharge_sections_after")]
    pub discharge_after: Vec<Segment>,
}

impl Topology {
    pub fn new() -> Self {
        Self::default()
    }

    /// True when no region holds a segment and no branch exists.
    pub fn is_empty(&self) -> bool {
        self.suction.is_empty()
            && self.discharge_before.is_empty()
            && self.parallel_branches.is_empty()
            && self.discharge_after.is_empty()
    }

    pub fn has_branches(&self) -> bool {
        !self.parallel_branches.is_empty()
    }

    /// Number of live segments over all regions and branches.
    pub fn segment_count(&self) -> usize {
        self.suction.len()
            + self.discharge_before.len()
            + self
                .parallel_branches
                .iter()
                .map(|b| b.segments.len())
                .sum::<usize>()
            + self.discharge_after.len()
    }

    /// Every segment with its region, in display order.
    pub fn segments(&self) -> impl Iterator<Item = (Region, &Segment)> {
        let suction = self.suction.iter().map(|s| (Region::Suction, s));
        let before = self
            .discharge_before
            .iter()
            .map(|s| (Region::DischargeBefore, s));
        let branches = self.parallel_branches.iter().flat_map(|b| {
            b.segments
                .iter()
                .map(move |s| (Region::Branch(b.name.to_string()), s))
        });
        let after = self
            .discharge_after
            .iter()
            .map(|s| (Region::DischargeAfter, s));
        suction.chain(before).chain(branches).chain(after)
    }

    pub fn ids(&self) -> impl Iterator<Item = &SegmentId> {
        self.segments().map(|(_, s)| &s.id)
    }

    pub fn find(&self, id: &SegmentId) -> Option<(Region, &Segment)> {
        self.segments().find(|(_, s)| &s.id == id)
    }

    /// Region that currently owns `id`.
    pub fn locate(&self, id: &SegmentId) -> Option<Region> {
        self.find(id).map(|(region, _)| region)
    }

    pub fn contains(&self, id: &SegmentId) -> bool {
        self.find(id).is_some()
    }

    /// Ordered list for a region (`None` for a branch that does not exist).
    pub fn list(&self, region: &Region) -> Option<&[Segment]> {
        match region {
            Region::Suction => Some(&self.suction),
            Region::DischargeBefore => Some(&self.discharge_before),
            Region::Branch(name) => self
                .parallel_branches
                .get(name)
                .map(|b| b.segments),
            Region::DischargeAfter => Some(&self.discharge_after),
        }
    }

    pub(crate) fn list_mut(&mut self, region: &Region) -> Option<&mut Vec<Segment>> {
        match region {
            Region::Suction => Some(&mut self.suction),
            Region::DischargeBefore => Some(&mut self.discharge_before),
            Region::Branch(name) => self.parallel_branches.get_mut(name),
            Region::DischargeAfter => Some(&mut self.discharge_after),
        }
    }

    /// Mutable access to every segment, in display order.
    ///
    /// Identities must not be changed through this; it exists for bulk edits
    /// such as file migrations.
    pub fn segments_mut(&mut self) -> impl Iterator<Item = &mut Segment> {
        let Topology {
            suction,
            discharge_before,
            parallel_branches,
            discharge_after,
        } = self;
        suction
            .iter_mut()
            .chain(discharge_before.iter_mut())
            .chain(parallel_branches.segments_mut())
            .chain(discharge_after.iter_mut())
    }

    pub(crate) fn find_mut(&mut self, id: &SegmentId) -> Option<&mut Segment> {
        self.segments_mut().find(|s| &s.id == id)
    }
}
