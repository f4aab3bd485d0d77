//! Property tests for the topology store.

use std::collections::HashSet;

use pn_core::SegmentId;
use pn_topology::{Region, SegmentDraft, SegmentPatch, TopologyStore, validate_identities};
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Op {
    Add(u8),
    Update(u8, usize),
    Remove(u8, usize),
    AddBranch(u8),
    RemoveBranch(u8),
}

fn region_for(code: u8) -> Region {
    match code % 6 {
        0 => Region::Suction,
        1 => Region::DischargeBefore,
        2 => Region::DischargeAfter,
        3 => Region::branch("A"),
        4 => Region::branch("B"),
        _ => Region::branch("C"),
    }
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        4 => any::<u8>().prop_map(Op::Add),
        2 => (any::<u8>(), 0usize..8).prop_map(|(r, i)| Op::Update(r, i)),
        2 => (any::<u8>(), 0usize..8).prop_map(|(r, i)| Op::Remove(r, i)),
        1 => any::<u8>().prop_map(Op::AddBranch),
        1 => any::<u8>().prop_map(Op::RemoveBranch),
    ]
}

fn pick_id(store: &TopologyStore, region: &Region, idx: usize) -> SegmentId {
    store
        .topology()
        .list(region)
        .and_then(|list| list.get(idx))
        .map(|s| s.id.clone())
        .unwrap_or_else(|| SegmentId::new("missing"))
}

fn apply(store: &mut TopologyStore, op: &Op, retired: &mut HashSet<SegmentId>) {
    match op {
        Op::Add(r) => {
            let id = store.add(&region_for(*r), SegmentDraft::new("s", 1.0, 50.0));
            assert!(!retired.contains(&id), "identity reused");
        }
        Op::Update(r, i) => {
            let region = region_for(*r);
            let id = pick_id(store, &region, *i);
            store.update(&region, &id, &SegmentPatch::length(2.0));
        }
        Op::Remove(r, i) => {
            let region = region_for(*r);
            let id = pick_id(store, &region, *i);
            if store.remove(&region, &id) {
                retired.insert(id);
            }
        }
        Op::AddBranch(r) | Op::RemoveBranch(r) => {
            let Region::Branch(name) = region_for(3 + r % 3) else {
                return;
            };
            let doomed: Vec<SegmentId> = store
                .topology()
                .parallel_branches
                .get(&name)
                .map(|b| b.segments.iter().map(|s| s.id.clone()).collect())
                .unwrap_or_default();
            if matches!(op, Op::AddBranch(_)) {
                store.add_branch(name);
            } else {
                store.remove_branch(&name);
            }
            retired.extend(doomed);
        }
    }
}

proptest! {
    #[test]
    fn identities_stay_unique(ops in prop::collection::vec(op_strategy(), 0..60)) {
        let mut store = TopologyStore::new();
        let mut retired = HashSet::new();
        for op in &ops {
            apply(&mut store, op, &mut retired);
            prop_assert!(validate_identities(store.topology()).is_ok());
            let live: HashSet<&SegmentId> = store.topology().ids().collect();
            prop_assert_eq!(live.len(), store.topology().segment_count());
            prop_assert!(live.iter().all(|id| !retired.contains(*id)));
        }
    }

    #[test]
    fn removal_preserves_relative_order(count in 1usize..12, victim in 0usize..12) {
        let mut store = TopologyStore::new();
        let ids: Vec<SegmentId> = (0..count)
            .map(|i| store.add_suction(SegmentDraft::new(format!("s{i}"), 1.0, 50.0)))
            .collect();
        let victim = victim % count;
        store.remove_suction(&ids[victim]);

        let expected: Vec<&SegmentId> = ids
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != victim)
            .map(|(_, id)| id)
            .collect();
        let actual: Vec<&SegmentId> = store.topology().suction.iter().map(|s| &s.id).collect();
        prop_assert_eq!(actual, expected);
    }
}
