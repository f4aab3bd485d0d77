//! Edge label text.

use pn_results::{ResultCorrelator, SegmentResult};
use pn_topology::Branch;

pub fn flow_line(flow_m3h: f64) -> String {
    format!("{flow_m3h:.1} m³/h")
}

pub fn velocity_line(velocity_m_s: f64) -> String {
    format!("{velocity_m_s:.2} m/s")
}

pub fn loss_line(loss_m: f64) -> String {
    format!("Loss: {loss_m:.2} m")
}

/// Name, then flow, velocity and total loss when a result exists.
///
/// Without a result the label is the name alone: "no data" is never drawn as
/// numbers.
pub fn segment_label(name: String, result: Option<&SegmentResult>, flow_m3h: Option<f64>) -> Vec<String> {
    let mut lines = vec![name];
    if let Some(r) = result {
        if let Some(flow) = flow_m3h {
            lines.push(flow_line(flow));
        }
        lines.push(velocity_line(r.velocity_m_s));
        lines.push(loss_line(r.total_loss_m));
    }
    lines
}

/// Branch name with its member names; loss only when every member has a result.
///
/// The branch carries part of the system flow, so no flow line is shown.
pub fn branch_label(branch: Branch<'_>, results: &ResultCorrelator) -> Vec<String> {
    let names: Vec<String> = branch
        .segments
        .iter()
        .enumerate()
        .map(|(i, s)| s.display_name(|| format!("Segment {}", i + 1)))
        .collect();
    let mut lines = vec![format!("{} ({})", branch.name, names.join(", "))];

    let member_results: Option<Vec<&SegmentResult>> = branch
        .segments
        .iter()
        .map(|s| results.result_for(&s.id))
        .collect();
    if let Some(member_results) = member_results {
        if let [single] = member_results.as_slice() {
            lines.push(velocity_line(single.velocity_m_s));
        }
        let total: f64 = member_results.iter().map(|r| r.total_loss_m).sum();
        lines.push(loss_line(total));
    }
    lines
}

pub fn empty_branch_label(name: &str) -> Vec<String> {
    vec![format!("{name} (Empty)")]
}

#[cfg(test)]
mod tests {
    use super::*;
    use pn_core::SegmentId;
    use pn_topology::{SegmentDraft, TopologyStore};

    fn result(id: &SegmentId, v: f64, loss: f64) -> SegmentResult {
        SegmentResult {
            section_id: Some(id.clone()),
            total_loss_m: loss,
            major_loss_m: loss,
            minor_loss_m: 0.0,
            velocity_m_s: v,
            reynolds: 1.0e5,
            friction_factor: 0.02,
        }
    }

    fn branch_with(names: &[&str]) -> (TopologyStore, Vec<SegmentId>) {
        let mut store = TopologyStore::new();
        let ids = names
            .iter()
            .map(|n| store.add_to_branch("A", SegmentDraft::new(*n, 1.0, 50.0)))
            .collect();
        (store, ids)
    }

    #[test]
    fn segment_label_lines() {
        let id = SegmentId::new("s");
        let r = result(&id, 1.234, 0.456);
        assert_eq!(
            segment_label("Suction 1".into(), Some(&r), Some(42.04)),
            vec!["Suction 1", "42.0 m³/h", "1.23 m/s", "Loss: 0.46 m"]
        );
        assert_eq!(segment_label("Suction 1".into(), None, Some(42.0)), vec!["Suction 1"]);
    }

    #[test]
    fn branch_loss_needs_every_member() {
        let (store, ids) = branch_with(&["Cooler", "Valve"]);
        let branch = store.topology().parallel_branches.get("A").unwrap();
        let partial = ResultCorrelator::from_results(1, None, &[result(&ids[0], 1.0, 0.5)]);
        assert_eq!(branch_label(branch, &partial), vec!["A (Cooler, Valve)"]);

        let full = ResultCorrelator::from_results(
            1,
            None,
            &[result(&ids[0], 1.0, 0.5), result(&ids[1], 1.0, 0.25)],
        );
        assert_eq!(
            branch_label(branch, &full),
            vec!["A (Cooler, Valve)", "Loss: 0.75 m"]
        );
    }

    #[test]
    fn single_member_branch_shows_velocity() {
        let (store, ids) = branch_with(&["Cooler"]);
        let branch = store.topology().parallel_branches.get("A").unwrap();
        let c = ResultCorrelator::from_results(1, Some(10.0), &[result(&ids[0], 2.0, 1.0)]);
        assert_eq!(
            branch_label(branch, &c),
            vec!["A (Cooler)", "2.00 m/s", "Loss: 1.00 m"]
        );
    }
}
