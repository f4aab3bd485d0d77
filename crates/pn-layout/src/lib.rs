//! pn-layout: schematic layout engine for pumpnet.
//!
//! Provides:
//! - `layout`: topology (+ correlated results) → positioned nodes and edges
//! - Spacing policy that keeps large topologies compact
//! - Label text for segments and branches
//! - Orthogonal routing helpers and hit testing
//! - SVG rendering for on-screen export and report capture
//!
//! # Example
//!
//! ```
//! use pn_layout::{LayoutOptions, layout};
//! use pn_results::ResultCorrelator;
//! use pn_topology::Topology;
//!
//! let diagram = layout(&Topology::new(), &ResultCorrelator::empty(), &LayoutOptions::default());
//! assert_eq!(diagram.nodes.len(), 2);
//! assert_eq!(diagram.edges.len(), 1);
//! ```

pub mod engine;
pub mod geometry;
pub mod label;
pub mod model;
pub mod routing;
pub mod spacing;
pub mod style;
pub mod svg;

pub use engine::{END_ID, LayoutOptions, MERGE_ID, PUMP_ID, TANK_ID, layout};
pub use geometry::{Point, Rect};
pub use model::{EdgeKind, Hit, Layout, LayoutEdge, LayoutNode, LineStyle, NodeKind, Route};
pub use spacing::SpacingPolicy;
pub use style::{RenderMode, Style};
pub use svg::{labels_fit, render_svg};
