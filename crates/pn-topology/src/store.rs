//! Topology store: the single mutable source of truth for the pipe network.
//!
//! Every operation is a synchronous single step. Mutations that address a
//! segment or branch that no longer exists are silent no-ops: UI edits race
//! with removals during fast editing and that race is harmless.

use pn_core::SegmentId;
use tracing::debug;

use crate::error::TopologyResult;
use crate::segment::{Fitting, SegmentDraft, SegmentPatch};
use crate::topology::{Region, Topology};
use crate::validate;

#[derive(Debug, Clone, Default)]
pub struct TopologyStore {
    topology: Topology,
    revision: u64,
}

impl TopologyStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap an existing topology after checking that identities are unique.
    pub fn from_topology(topology: Topology) -> TopologyResult<Self> {
        validate::validate_identities(&topology)?;
        Ok(Self {
            topology,
            revision: 0,
        })
    }

    pub fn topology(&self) -> &Topology {
        &self.topology
    }

    pub fn into_topology(self) -> Topology {
        self.topology
    }

    /// Counter bumped by every mutation that changed the topology.
    ///
    /// Derived state (correlated labels, layouts, chart caches) compares this
    /// value to decide whether to recompute.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    fn touch(&mut self) {
        self.revision += 1;
    }

    /// Append a new segment to `region` and return its fresh identity.
    ///
    /// Adding to a branch that does not exist yet creates the branch.
    pub fn add(&mut self, region: &Region, draft: SegmentDraft) -> SegmentId {
        let id = SegmentId::generate();
        let segment = draft.into_segment(id.clone());
        let list = match region {
            Region::Suction => &mut self.topology.suction,
            Region::DischargeBefore => &mut self.topology.discharge_before,
            Region::Branch(name) => self.topology.parallel_branches.get_or_create(name),
            Region::DischargeAfter => &mut self.topology.discharge_after,
        };
        list.push(segment);
        self.touch();
        debug!(%region, %id, "segment added");
        id
    }

    /// Merge `patch` into the segment `id` of `region`. Returns whether it applied.
    pub fn update(&mut self, region: &Region, id: &SegmentId, patch: &SegmentPatch) -> bool {
        let Some(segment) = self
            .topology
            .list_mut(region)
            .and_then(|list| list.iter_mut().find(|s| &s.id == id))
        else {
            debug!(%region, %id, "update skipped: segment not found");
            return false;
        };
        if patch.apply(segment) {
            self.touch();
            debug!(%region, %id, "segment updated");
        }
        true
    }

    /// Delete segment `id` from `region`, keeping the order of the rest.
    pub fn remove(&mut self, region: &Region, id: &SegmentId) -> bool {
        let Some(list) = self.topology.list_mut(region) else {
            debug!(%region, %id, "remove skipped: branch not found");
            return false;
        };
        let Some(pos) = list.iter().position(|s| &s.id == id) else {
            debug!(%region, %id, "remove skipped: segment not found");
            return false;
        };
        list.remove(pos);
        self.touch();
        debug!(%region, %id, "segment removed");
        true
    }

    /// Insert an empty branch. An existing branch of the same name is emptied
    /// in place (last write wins) and its segments are retired.
    pub fn add_branch(&mut self, name: impl Into<String>) {
        let name = name.into();
        debug!(branch = %name, "branch added");
        self.topology.parallel_branches.insert(name, Vec::new());
        self.touch();
    }

    /// Delete a branch and every segment in it.
    pub fn remove_branch(&mut self, name: &str) -> bool {
        match self.topology.parallel_branches.remove(name) {
            Some(retired) => {
                self.touch();
                debug!(branch = %name, retired = retired.len(), "branch removed");
                true
            }
            None => {
                debug!(branch = %name, "remove skipped: branch not found");
                false
            }
        }
    }

    /// Append a fitting to segment `id`, wherever it lives.
    pub fn add_fitting(&mut self, id: &SegmentId, fitting: Fitting) -> bool {
        let Some(segment) = self.topology.find_mut(id) else {
            debug!(%id, "add fitting skipped: segment not found");
            return false;
        };
        segment.fittings.push(fitting);
        self.touch();
        true
    }

    /// Remove the fitting at `index` of segment `id`.
    pub fn remove_fitting(&mut self, id: &SegmentId, index: usize) -> bool {
        let Some(segment) = self.topology.find_mut(id) else {
            debug!(%id, "remove fitting skipped: segment not found");
            return false;
        };
        if index >= segment.fittings.len() {
            debug!(%id, index, "remove fitting skipped: index out of range");
            return false;
        }
        segment.fittings.remove(index);
        self.touch();
        true
    }

    /// Replace the whole topology (scenario load). No merge with the old state.
    pub fn replace(&mut self, topology: Topology) -> TopologyResult<()> {
        validate::validate_identities(&topology)?;
        self.topology = topology;
        self.touch();
        debug!(segments = self.topology.segment_count(), "topology replaced");
        Ok(())
    }

    /// Drop every segment and branch.
    pub fn reset(&mut self) {
        self.topology = Topology::new();
        self.touch();
    }

    // Region-named operations, one family per topology region.

    pub fn add_suction(&mut self, draft: SegmentDraft) -> SegmentId {
        self.add(&Region::Suction, draft)
    }

    pub fn update_suction(&mut self, id: &SegmentId, patch: &SegmentPatch) -> bool {
        self.update(&Region::Suction, id, patch)
    }

    pub fn remove_suction(&mut self, id: &SegmentId) -> bool {
        self.remove(&Region::Suction, id)
    }

    pub fn add_discharge_before(&mut self, draft: SegmentDraft) -> SegmentId {
        self.add(&Region::DischargeBefore, draft)
    }

    pub fn update_discharge_before(&mut self, id: &SegmentId, patch: &SegmentPatch) -> bool {
        self.update(&Region::DischargeBefore, id, patch)
    }

    pub fn remove_discharge_before(&mut self, id: &SegmentId) -> bool {
        self.remove(&Region::DischargeBefore, id)
    }

    pub fn add_to_branch(&mut self, branch: &str, draft: SegmentDraft) -> SegmentId {
        self.add(&Region::branch(branch), draft)
    }

    pub fn update_in_branch(&mut self, branch: &str, id: &SegmentId, patch: &SegmentPatch) -> bool {
        self.update(&Region::branch(branch), id, patch)
    }

    pub fn remove_from_branch(&mut self, branch: &str, id: &SegmentId) -> bool {
        self.remove(&Region::branch(branch), id)
    }

    pub fn add_discharge_after(&mut self, draft: SegmentDraft) -> SegmentId {
        self.add(&Region::DischargeAfter, draft)
    }

    pub fn update_discharge_after(&mut self, id: &SegmentId, patch: &SegmentPatch) -> bool {
        self.update(&Region::DischargeAfter, id, patch)
    }

    pub fn remove_discharge_after(&mut self, id: &SegmentId) -> bool {
        self.remove(&Region::DischargeAfter, id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(name: &str) -> SegmentDraft {
        SegmentDraft::new(name, 10.0, 102.3)
    }

    #[test]
    fn add_assigns_distinct_ids_and_appends() {
        let mut store = TopologyStore::new();
        let a = store.add_suction(draft("a"));
        let b = store.add_suction(draft("b"));
        assert_ne!(a, b);
        let names: Vec<&str> = store
            .topology()
            .suction
            .iter()
            .map(|s| s.name.as_str())
            .collect();
        assert_eq!(names, vec!["a", "b"]);
        assert_eq!(store.revision(), 2);
    }

    #[test]
    fn update_missing_id_is_noop() {
        let mut store = TopologyStore::new();
        store.add_suction(draft("a"));
        let rev = store.revision();
        let ghost = SegmentId::new("ghost");
        assert!(!store.update_suction(&ghost, &SegmentPatch::length(1.0)));
        assert_eq!(store.revision(), rev);
    }

    #[test]
    fn update_does_not_cross_regions() {
        let mut store = TopologyStore::new();
        let id = store.add_discharge_after(draft("a"));
        assert!(!store.update_suction(&id, &SegmentPatch::length(99.0)));
        assert_eq!(store.topology().discharge_after[0].length_m, 10.0);
        assert!(store.update_discharge_after(&id, &SegmentPatch::length(99.0)));
        assert_eq!(store.topology().discharge_after[0].length_m, 99.0);
        assert_eq!(store.topology().discharge_after[0].id, id);
    }

    #[test]
    fn remove_preserves_order() {
        let mut store = TopologyStore::new();
        let ids: Vec<SegmentId> = ["a", "b", "c", "d"]
            .iter()
            .map(|n| store.add_discharge_before(draft(n)))
            .collect();
        assert!(store.remove_discharge_before(&ids[1]));
        assert!(!store.remove_discharge_before(&ids[1]));
        let left: Vec<&SegmentId> = store
            .topology()
            .discharge_before
            .iter()
            .map(|s| &s.id)
            .collect();
        assert_eq!(left, vec![&ids[0], &ids[2], &ids[3]]);
    }

    #[test]
    fn duplicate_branch_name_overwrites() {
        let mut store = TopologyStore::new();
        store.add_branch("A");
        store.add_to_branch("A", draft("x"));
        store.add_branch("B");
        store.add_branch("A");
        let branches = &store.topology().parallel_branches;
        assert_eq!(branches.len(), 2);
        assert!(branches.get("A").unwrap().segments.is_empty());
        assert_eq!(branches.names().collect::<Vec<_>>(), vec!["A", "B"]);
    }

    #[test]
    fn add_to_missing_branch_creates_it() {
        let mut store = TopologyStore::new();
        let id = store.add_to_branch("New", draft("x"));
        let (region, _) = store.topology().find(&id).unwrap();
        assert_eq!(region, Region::branch("New"));
    }

    #[test]
    fn branch_ops_on_missing_branch_are_noops() {
        let mut store = TopologyStore::new();
        let ghost = SegmentId::new("ghost");
        assert!(!store.update_in_branch("nope", &ghost, &SegmentPatch::name("x")));
        assert!(!store.remove_from_branch("nope", &ghost));
        assert!(!store.remove_branch("nope"));
        assert_eq!(store.revision(), 0);
    }

    #[test]
    fn remove_branch_retires_its_segments() {
        let mut store = TopologyStore::new();
        let id = store.add_to_branch("A", draft("x"));
        assert!(store.remove_branch("A"));
        assert!(!store.topology().contains(&id));
        assert!(!store.topology().has_branches());
    }

    #[test]
    fn fittings_follow_segment_identity() {
        let mut store = TopologyStore::new();
        let id = store.add_to_branch("A", draft("x"));
        assert!(store.add_fitting(&id, Fitting::new("Elbow", 0.9, 2)));
        assert!(store.add_fitting(&id, Fitting::new("Tee", 0.6, 1)));
        assert!(store.remove_fitting(&id, 0));
        assert!(!store.remove_fitting(&id, 5));
        let (_, seg) = store.topology().find(&id).unwrap();
        assert_eq!(seg.fittings.len(), 1);
        assert_eq!(seg.fittings[0].name, "Tee");
        assert!(!store.add_fitting(&SegmentId::new("ghost"), Fitting::new("Tee", 0.6, 1)));
    }

    #[test]
    fn replace_is_wholesale() {
        let mut store = TopologyStore::new();
        store.add_suction(draft("old"));
        let mut other = TopologyStore::new();
        other.add_discharge_after(draft("new"));
        store.replace(other.into_topology()).unwrap();
        assert!(store.topology().suction.is_empty());
        assert_eq!(store.topology().discharge_after.len(), 1);
    }

    #[test]
    fn replace_rejects_duplicate_ids() {
        let mut donor = TopologyStore::new();
        donor.add_suction(draft("a"));
        let mut topology = donor.into_topology();
        let dup = topology.suction[0].clone();
        topology.discharge_after.push(dup);

        let mut store = TopologyStore::new();
        assert!(store.replace(topology).is_err());
        assert_eq!(store.revision(), 0);
    }
}
