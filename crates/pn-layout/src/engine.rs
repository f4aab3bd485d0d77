//! Left-to-right placement along a single advancing cursor.
//!
//! Tank, suction runs, pump, discharge-before runs, the parallel set (split
//! point, one row per branch, merge point), discharge-after runs, end node.
//! The result depends only on the inputs; nothing is kept between calls.

use pn_results::ResultCorrelator;
use pn_topology::{ParallelBranches, Segment, Topology};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::geometry::Point;
use crate::label;
use crate::model::{EdgeKind, Layout, LayoutEdge, LayoutNode, LineStyle, NodeKind, Route};
use crate::routing::{self, Bend};
use crate::spacing::SpacingPolicy;
use crate::style::{RenderMode, Style, dims};

pub const TANK_ID: &str = "tank";
pub const PUMP_ID: &str = "pump";
pub const MERGE_ID: &str = "merge";
pub const END_ID: &str = "end";

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutOptions {
    pub mode: RenderMode,
    pub spacing: SpacingPolicy,
}

impl LayoutOptions {
    pub fn with_mode(mut self, mode: RenderMode) -> Self {
        self.mode = mode;
        self
    }
}

fn node_size(kind: NodeKind) -> (f64, f64) {
    match kind {
        NodeKind::Tank => (dims::TANK_WIDTH, dims::TANK_HEIGHT),
        NodeKind::Pump => (2.0 * dims::PUMP_RADIUS, 2.0 * dims::PUMP_RADIUS),
        NodeKind::End => (2.0 * dims::END_RADIUS, 2.0 * dims::END_RADIUS),
        NodeKind::Junction | NodeKind::BranchSplit | NodeKind::BranchNode | NodeKind::Merge => {
            (dims::JUNCTION_SIZE, dims::JUNCTION_SIZE)
        }
    }
}

fn node_label(kind: NodeKind) -> Vec<String> {
    match kind {
        NodeKind::Tank => vec!["Tank".to_string()],
        NodeKind::Pump => vec!["Pump".to_string()],
        NodeKind::End => vec!["Discharge".to_string()],
        _ => Vec::new(),
    }
}

/// Where an edge attaches to a centerline node.
#[derive(Debug, Clone)]
struct Port {
    node: String,
    left_x: f64,
    right_x: f64,
}

struct Builder<'a> {
    results: &'a ResultCorrelator,
    style: Style,
    spacing: f64,
    cursor: f64,
    prev: Port,
    nodes: Vec<LayoutNode>,
    edges: Vec<LayoutEdge>,
}

impl<'a> Builder<'a> {
    fn new(results: &'a ResultCorrelator, style: Style, spacing: f64) -> Self {
        let (width, height) = node_size(NodeKind::Tank);
        let tank = LayoutNode {
            id: TANK_ID.to_string(),
            kind: NodeKind::Tank,
            position: Point::new(dims::START_X + width * 0.5, dims::PIPE_Y),
            width,
            height,
            label: node_label(NodeKind::Tank),
        };
        let cursor = dims::START_X + width;
        Self {
            results,
            style,
            spacing,
            cursor,
            prev: Port {
                node: TANK_ID.to_string(),
                left_x: dims::START_X,
                right_x: cursor,
            },
            nodes: vec![tank],
            edges: Vec::new(),
        }
    }

    /// Put a centerline node with its left edge at the cursor.
    fn place_main(&mut self, id: String, kind: NodeKind) -> Port {
        let (width, height) = node_size(kind);
        let half = match kind {
            NodeKind::Pump | NodeKind::End => width * 0.5,
            _ => 0.0,
        };
        let left_x = self.cursor;
        self.nodes.push(LayoutNode {
            id: id.clone(),
            kind,
            position: Point::new(left_x + half, dims::PIPE_Y),
            width,
            height,
            label: node_label(kind),
        });
        self.cursor += 2.0 * half;
        Port {
            node: id,
            left_x,
            right_x: self.cursor,
        }
    }

    /// Straight centerline edge from the previous node into `target`.
    fn pipe(&mut self, target: Port, kind: EdgeKind, label: Vec<String>, segments: Vec<pn_core::SegmentId>) {
        let from = Point::new(self.prev.right_x, dims::PIPE_Y);
        let to = Point::new(target.left_x, dims::PIPE_Y);
        let label_anchor = Point::new(
            (from.x + to.x) * 0.5,
            dims::PIPE_Y + dims::PIPE_LABEL_OFFSET * self.style.text_scale,
        );
        self.edges.push(LayoutEdge {
            id: format!("e-{}-{}", self.prev.node, target.node),
            source: self.prev.node.clone(),
            target: target.node.clone(),
            kind,
            route: Route::Straight,
            line: LineStyle::Solid,
            arrow: true,
            points: vec![from, to],
            label,
            label_anchor,
            segments,
        });
        self.prev = target;
    }

    fn segment(&mut self, segment: &Segment, fallback: String, target_id: String, kind: NodeKind) {
        self.cursor += self.spacing;
        let port = self.place_main(target_id, kind);
        let label = label::segment_label(
            segment.display_name(|| fallback),
            self.results.result_for(&segment.id),
            self.results.flow_m3h(),
        );
        self.pipe(port, EdgeKind::Pipe, label, vec![segment.id.clone()]);
    }

    /// Keep a label block that stacks upwards from `y` inside the canvas.
    fn label_y(&self, y: f64, lines: usize) -> f64 {
        y.max(self.style.label_extent(lines))
    }

    /// Reclassify the node just placed as the start of the parallel set.
    fn mark_split(&mut self) {
        if let Some(node) = self.nodes.last_mut()
            && node.kind == NodeKind::Junction
        {
            node.kind = NodeKind::BranchSplit;
        }
    }

    fn branches(&mut self, branches: &ParallelBranches) {
        if branches.len() > 2 {
            warn!(
                count = branches.len(),
                "more than two parallel branches; alternating rows overlap"
            );
        }

        let split = self.prev.clone();
        let split_pt = Point::new(split.right_x, dims::PIPE_Y);
        let merge_x = split.right_x + dims::BRANCH_MIN_RUN.max(self.spacing + dims::BRANCH_PAD);
        let merge_pt = Point::new(merge_x, dims::PIPE_Y);
        let text_scale = self.style.text_scale;

        for (i, branch) in branches.iter().enumerate() {
            let row_y = if i % 2 == 0 {
                dims::PIPE_Y - dims::PARALLEL_OFFSET
            } else {
                dims::PIPE_Y + dims::PARALLEL_OFFSET
            };

            if branch.segments.is_empty() {
                let points = routing::normalize_orthogonal(&[
                    split_pt,
                    Point::new(split_pt.x, row_y),
                    Point::new(merge_x, row_y),
                    merge_pt,
                ]);
                let label = label::empty_branch_label(branch.name);
                let label_y = self.label_y(row_y + dims::EMPTY_LABEL_OFFSET * text_scale, label.len());
                self.edges.push(LayoutEdge {
                    id: format!("e-empty-{}", branch.name),
                    source: split.node.clone(),
                    target: MERGE_ID.to_string(),
                    kind: EdgeKind::EmptyBranch,
                    route: Route::Step,
                    line: LineStyle::Dashed,
                    arrow: false,
                    points,
                    label,
                    label_anchor: Point::new((split_pt.x + merge_x) * 0.5, label_y),
                    segments: Vec::new(),
                });
                continue;
            }

            let node_id = format!("branch-{}", branch.name);
            let interior = Point::new(split_pt.x + self.spacing * 0.5, row_y);
            let (width, height) = node_size(NodeKind::BranchNode);
            self.nodes.push(LayoutNode {
                id: node_id.clone(),
                kind: NodeKind::BranchNode,
                position: interior,
                width,
                height,
                label: Vec::new(),
            });

            self.edges.push(LayoutEdge {
                id: format!("e-split-{}", branch.name),
                source: split.node.clone(),
                target: node_id.clone(),
                kind: EdgeKind::BranchLead,
                route: Route::Step,
                line: LineStyle::Solid,
                arrow: false,
                points: routing::step(split_pt, interior, Bend::VerticalFirst),
                label: Vec::new(),
                label_anchor: Point::new((split_pt.x + interior.x) * 0.5, row_y),
                segments: Vec::new(),
            });
            let label = label::branch_label(branch, self.results);
            let label_y = self.label_y(row_y + dims::BRANCH_LABEL_OFFSET * text_scale, label.len());
            self.edges.push(LayoutEdge {
                id: format!("e-run-{}", branch.name),
                source: node_id,
                target: MERGE_ID.to_string(),
                kind: EdgeKind::BranchRun,
                route: Route::Step,
                line: LineStyle::Solid,
                arrow: true,
                points: routing::step(interior, merge_pt, Bend::HorizontalFirst),
                label,
                label_anchor: Point::new((interior.x + merge_x) * 0.5, label_y),
                segments: branch.segments.iter().map(|s| s.id.clone()).collect(),
            });
        }

        self.cursor = merge_x;
        self.prev = self.place_main(MERGE_ID.to_string(), NodeKind::Merge);
    }

    fn finish(self, mode: RenderMode) -> Layout {
        Layout {
            nodes: self.nodes,
            edges: self.edges,
            total_width: self.cursor + dims::TRAILING_PAD,
            height: dims::HEIGHT,
            mode,
            style: self.style,
        }
    }
}

/// Project `topology` into a positioned diagram.
///
/// Segments without an entry in `results` are labeled with their name only.
/// `options.mode` changes font and stroke sizes, never positions.
pub fn layout(topology: &Topology, results: &ResultCorrelator, options: &LayoutOptions) -> Layout {
    let spacing = options.spacing.spacing(topology);
    let mut b = Builder::new(results, Style::for_mode(options.mode), spacing);

    let suction = &topology.suction;
    if suction.is_empty() {
        b.cursor += spacing;
        let pump = b.place_main(PUMP_ID.to_string(), NodeKind::Pump);
        b.pipe(
            pump,
            EdgeKind::SuctionPlaceholder,
            vec!["Suction".to_string()],
            Vec::new(),
        );
    }
    for (i, seg) in suction.iter().enumerate() {
        let (id, kind) = if i + 1 == suction.len() {
            (PUMP_ID.to_string(), NodeKind::Pump)
        } else {
            (format!("j_suc_{i}"), NodeKind::Junction)
        };
        b.segment(seg, format!("Suction {}", i + 1), id, kind);
    }

    let has_branches = topology.has_branches();
    let before = &topology.discharge_before;
    let before_is_terminal = !has_branches && topology.discharge_after.is_empty();
    for (i, seg) in before.iter().enumerate() {
        let (id, kind) = if i + 1 == before.len() && before_is_terminal {
            (END_ID.to_string(), NodeKind::End)
        } else {
            (format!("j_dis_b_{i}"), NodeKind::Junction)
        };
        b.segment(seg, format!("Discharge {}", i + 1), id, kind);
    }

    if has_branches {
        if !before.is_empty() {
            b.mark_split();
        }
        b.branches(&topology.parallel_branches);
        if topology.discharge_after.is_empty() {
            // Never longer than the discharge-after run that replaces it.
            b.cursor += dims::CONNECTOR_RUN.min(spacing);
            let end = b.place_main(END_ID.to_string(), NodeKind::End);
            b.pipe(end, EdgeKind::Connector, Vec::new(), Vec::new());
        }
    }

    let after = &topology.discharge_after;
    for (i, seg) in after.iter().enumerate() {
        let (id, kind) = if i + 1 == after.len() {
            (END_ID.to_string(), NodeKind::End)
        } else {
            (format!("j_dis_a_{i}"), NodeKind::Junction)
        };
        b.segment(seg, format!("Final {}", i + 1), id, kind);
    }

    let out = b.finish(options.mode);
    debug!(
        nodes = out.nodes.len(),
        edges = out.edges.len(),
        width = out.total_width,
        spacing,
        "layout built"
    );
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pn_core::SegmentId;
    use pn_results::SegmentResult;
    use pn_topology::{SegmentDraft, TopologyStore};

    fn reference() -> TopologyStore {
        let mut s = TopologyStore::new();
        s.add_suction(SegmentDraft::new("Tank outlet", 10.0, 102.3));
        s.add_suction(SegmentDraft::new("Pump inlet", 15.0, 102.3));
        s.add_discharge_before(SegmentDraft::new("Header", 20.0, 77.9));
        s.add_branch("Branch A");
        s.add_to_branch("Branch A", SegmentDraft::new("Heat exchanger", 5.0, 52.5));
        s.add_discharge_after(SegmentDraft::new("Delivery", 30.0, 77.9));
        s
    }

    fn run(t: &Topology) -> Layout {
        layout(t, &ResultCorrelator::empty(), &LayoutOptions::default())
    }

    fn result(id: &SegmentId) -> SegmentResult {
        SegmentResult {
            section_id: Some(id.clone()),
            total_loss_m: 0.8,
            major_loss_m: 0.6,
            minor_loss_m: 0.2,
            velocity_m_s: 1.9,
            reynolds: 190_000.0,
            friction_factor: 0.019,
        }
    }

    #[test]
    fn reference_topology_counts() {
        let l = run(reference().topology());
        assert_eq!(l.count_nodes(NodeKind::Tank), 1);
        assert_eq!(l.count_nodes(NodeKind::Junction), 1);
        assert_eq!(l.count_nodes(NodeKind::Pump), 1);
        assert_eq!(l.count_nodes(NodeKind::BranchSplit), 1);
        assert_eq!(l.count_nodes(NodeKind::BranchNode), 1);
        assert_eq!(l.count_nodes(NodeKind::Merge), 1);
        assert_eq!(l.count_nodes(NodeKind::End), 1);
        assert_eq!(l.nodes.len(), 7);
        assert_eq!(l.edges.len(), 6);
        assert_eq!(l.count_edges(EdgeKind::Pipe), 4);
        assert_eq!(l.count_edges(EdgeKind::BranchLead), 1);
        assert_eq!(l.count_edges(EdgeKind::BranchRun), 1);
    }

    #[test]
    fn reference_topology_geometry() {
        // five units -> spacing 130, branch run 260
        let l = run(reference().topology());
        assert_eq!(l.node("j_suc_0").map(|n| n.position.x), Some(280.0));
        assert_eq!(l.node(PUMP_ID).map(|n| n.position.x), Some(450.0));
        assert_eq!(l.node("j_dis_b_0").map(|n| n.kind), Some(NodeKind::BranchSplit));
        assert_eq!(l.node(MERGE_ID).map(|n| n.position.x), Some(880.0));
        assert_eq!(l.node(END_ID).map(|n| n.position.x), Some(1045.0));
        assert_eq!(l.total_width, 1180.0);
        let branch = l.node("branch-Branch A").map(|n| n.position);
        assert_eq!(branch, Some(Point::new(685.0, 50.0)));
    }

    #[test]
    fn empty_topology_is_tank_and_pump() {
        let l = run(&Topology::new());
        assert_eq!(l.nodes.len(), 2);
        assert_eq!(l.edges.len(), 1);
        assert_eq!(l.edges[0].kind, EdgeKind::SuctionPlaceholder);
        assert_eq!(l.edges[0].source, TANK_ID);
        assert_eq!(l.edges[0].target, PUMP_ID);
        assert_eq!(l.total_width, 580.0);
    }

    #[test]
    fn empty_branch_is_one_dashed_edge() {
        let mut s = TopologyStore::new();
        s.add_branch("A");
        s.add_to_branch("B", SegmentDraft::new("Bypass", 5.0, 52.5));
        let l = run(s.topology());

        let empties: Vec<&LayoutEdge> = l.edges.iter().filter(|e| e.is_dashed()).collect();
        assert_eq!(empties.len(), 1);
        assert_eq!(empties[0].kind, EdgeKind::EmptyBranch);
        assert_eq!(empties[0].label, vec!["A (Empty)"]);
        assert!(l.edge("e-run-A").is_none());
        assert!(l.node("branch-A").is_none());
        assert!(l.edge("e-run-B").is_some_and(|e| !e.is_dashed()));
    }

    #[test]
    fn branches_without_before_split_at_pump_and_connect_to_end() {
        let mut s = TopologyStore::new();
        s.add_to_branch("A", SegmentDraft::new("Cooler", 5.0, 52.5));
        let l = run(s.topology());
        assert_eq!(l.edge("e-split-A").map(|e| e.source.as_str()), Some(PUMP_ID));
        assert_eq!(l.count_nodes(NodeKind::BranchSplit), 0);
        let connector = l.edge("e-merge-end");
        assert_eq!(connector.map(|e| e.kind), Some(EdgeKind::Connector));
        assert!(connector.is_some_and(|e| e.label.is_empty()));
    }

    #[test]
    fn discharge_only_ends_at_end_node() {
        let mut s = TopologyStore::new();
        s.add_discharge_before(SegmentDraft::new("", 5.0, 52.5));
        s.add_discharge_before(SegmentDraft::new("", 5.0, 52.5));
        let l = run(s.topology());
        let ids: Vec<&str> = l.main_line().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, vec![TANK_ID, PUMP_ID, "j_dis_b_0", END_ID]);
        assert_eq!(l.edges[2].label, vec!["Discharge 2"]);
    }

    #[test]
    fn labels_follow_results() {
        let store = reference();
        let t = store.topology();
        let header = t.discharge_before[0].id.clone();

        let bare = run(t);
        let edge = bare.edge_for_segment(&header).map(|e| e.label.clone());
        assert_eq!(edge, Some(vec!["Header".to_string()]));

        let results = ResultCorrelator::from_results(1, Some(42.0), &[result(&header)]);
        let l = layout(t, &results, &LayoutOptions::default());
        let edge = l.edge_for_segment(&header).map(|e| e.label.clone());
        assert_eq!(
            edge,
            Some(vec![
                "Header".to_string(),
                "42.0 m³/h".to_string(),
                "1.90 m/s".to_string(),
                "Loss: 0.80 m".to_string(),
            ])
        );
    }

    #[test]
    fn branch_rows_alternate() {
        let mut s = TopologyStore::new();
        for name in ["A", "B", "C"] {
            s.add_to_branch(name, SegmentDraft::new(name, 5.0, 52.5));
        }
        let l = run(s.topology());
        let rows: Vec<f64> = l
            .nodes
            .iter()
            .filter(|n| n.kind == NodeKind::BranchNode)
            .map(|n| n.position.y)
            .collect();
        assert_eq!(rows, vec![50.0, 250.0, 50.0]);
    }

    #[test]
    fn step_edges_are_orthogonal() {
        let mut s = reference();
        s.add_branch("Empty");
        let l = run(s.topology());
        for e in l.edges.iter().filter(|e| e.route == Route::Step) {
            assert!(routing::is_orthogonal(&e.points), "{}", e.id);
        }
    }

    #[test]
    fn top_row_labels_stay_on_canvas() {
        let store = reference();
        let t = store.topology();
        let results: Vec<SegmentResult> = t.ids().map(result).collect();
        let correlator = ResultCorrelator::from_results(1, Some(42.0), &results);
        let l = layout(
            t,
            &correlator,
            &LayoutOptions::default().with_mode(RenderMode::Print),
        );
        let run = l.edge("e-run-Branch A");
        assert_eq!(run.map(|e| e.label.len()), Some(3));
        assert!(crate::svg::labels_fit(&l));
    }

    #[test]
    fn print_mode_keeps_positions() {
        let store = reference();
        let screen = run(store.topology());
        let print = layout(
            store.topology(),
            &ResultCorrelator::empty(),
            &LayoutOptions::default().with_mode(RenderMode::Print),
        );
        assert_eq!(screen.nodes, print.nodes);
        assert_eq!(screen.total_width, print.total_width);
        let screen_points: Vec<_> = screen.edges.iter().map(|e| &e.points).collect();
        let print_points: Vec<_> = print.edges.iter().map(|e| &e.points).collect();
        assert_eq!(screen_points, print_points);
        assert!(print.style.base_font > screen.style.base_font);
        assert!(print.edges[0].label_anchor.y < screen.edges[0].label_anchor.y);
    }
}
