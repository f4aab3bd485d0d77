//! Layout output: positioned nodes and routed edges.
//!
//! Always rebuilt, never patched in place.

use pn_core::SegmentId;
use serde::{Deserialize, Serialize};

use crate::geometry::{Point, Rect};
use crate::routing;
use crate::style::{RenderMode, Style, dims};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    /// Suction reservoir at the left edge.
    Tank,
    Pump,
    /// Point between two consecutive series segments.
    Junction,
    /// Junction where the parallel set starts.
    BranchSplit,
    /// Interior point of one non-empty branch, on its row.
    BranchNode,
    /// Junction where all branches rejoin.
    Merge,
    /// Discharge end.
    End,
}

impl NodeKind {
    /// Style class used by renderers.
    pub fn class(self) -> &'static str {
        match self {
            NodeKind::Tank => "tank",
            NodeKind::Pump => "pump",
            NodeKind::Junction => "junction",
            NodeKind::BranchSplit => "branch-split",
            NodeKind::BranchNode => "branch-node",
            NodeKind::Merge => "merge",
            NodeKind::End => "end",
        }
    }

    /// Nodes placed on the centerline by the advancing cursor.
    pub fn is_main_line(self) -> bool {
        !matches!(self, NodeKind::BranchNode)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutNode {
    pub id: String,
    pub kind: NodeKind,
    /// Center of the node.
    pub position: Point,
    pub width: f64,
    pub height: f64,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub label: Vec<String>,
}

impl LayoutNode {
    pub fn bounds(&self) -> Rect {
        Rect::from_center_size(self.position, self.width, self.height)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeKind {
    /// One series segment.
    Pipe,
    /// Placeholder suction run when no suction segment exists.
    SuctionPlaceholder,
    /// Split point to the interior node of a branch (unlabeled).
    BranchLead,
    /// Interior node of a branch to the merge point (labeled).
    BranchRun,
    /// Dashed stand-in for a branch without segments.
    EmptyBranch,
    /// Merge point to end node when nothing follows the parallel set.
    Connector,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Route {
    Straight,
    /// Orthogonal polyline.
    Step,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LineStyle {
    Solid,
    Dashed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutEdge {
    pub id: String,
    pub source: String,
    pub target: String,
    pub kind: EdgeKind,
    pub route: Route,
    pub line: LineStyle,
    /// Arrowhead at the target end.
    pub arrow: bool,
    pub points: Vec<Point>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub label: Vec<String>,
    /// Baseline of the last label line, horizontally centered; earlier lines
    /// stack upwards from it.
    pub label_anchor: Point,
    /// Segments this edge stands for, in order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub segments: Vec<SegmentId>,
}

impl LayoutEdge {
    pub fn is_dashed(&self) -> bool {
        self.line == LineStyle::Dashed
    }

    pub fn midpoint(&self) -> Point {
        routing::polyline_midpoint(&self.points)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Layout {
    pub nodes: Vec<LayoutNode>,
    pub edges: Vec<LayoutEdge>,
    /// Width of the coordinate system renderers must show to avoid clipping.
    pub total_width: f64,
    pub height: f64,
    pub mode: RenderMode,
    pub style: Style,
}

impl Layout {
    pub fn node(&self, id: &str) -> Option<&LayoutNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn edge(&self, id: &str) -> Option<&LayoutEdge> {
        self.edges.iter().find(|e| e.id == id)
    }

    pub fn count_nodes(&self, kind: NodeKind) -> usize {
        self.nodes.iter().filter(|n| n.kind == kind).count()
    }

    pub fn count_edges(&self, kind: EdgeKind) -> usize {
        self.edges.iter().filter(|e| e.kind == kind).count()
    }

    /// Centerline nodes in placement order.
    pub fn main_line(&self) -> impl Iterator<Item = &LayoutNode> {
        self.nodes.iter().filter(|n| n.kind.is_main_line())
    }

    /// Edge that represents `id`, if the segment is drawn.
    pub fn edge_for_segment(&self, id: &SegmentId) -> Option<&LayoutEdge> {
        self.edges.iter().find(|e| e.segments.contains(id))
    }

    /// Topmost node under `p`, falling back to the nearest edge within `tolerance`.
    pub fn hit_test(&self, p: Point, tolerance: f64) -> Option<Hit<'_>> {
        if let Some(node) = self
            .nodes
            .iter()
            .rev()
            .filter(|n| n.kind != NodeKind::BranchNode)
            .find(|n| n.bounds().contains(p))
        {
            return Some(Hit::Node(node));
        }
        self.edges
            .iter()
            .map(|e| (e, routing::distance_to_polyline(&e.points, p)))
            .filter(|(_, d)| *d <= tolerance)
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(e, _)| Hit::Edge(e))
    }

    pub fn viewport(&self) -> Rect {
        Rect {
            min: Point::ZERO,
            max: Point::new(self.total_width, self.height),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Hit<'a> {
    Node(&'a LayoutNode),
    Edge(&'a LayoutEdge),
}

impl Default for Layout {
    fn default() -> Self {
        Self {
            nodes: Vec::new(),
            edges: Vec::new(),
            total_width: dims::START_X + dims::TRAILING_PAD,
            height: dims::HEIGHT,
            mode: RenderMode::Screen,
            style: Style::for_mode(RenderMode::Screen),
        }
    }
}
