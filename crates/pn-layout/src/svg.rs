//! SVG rendering of a [`Layout`].
//!
//! This is the surface handed to report capture, so it is self-contained: no
//! external fonts, stylesheets or images.

use crate::geometry::Point;
use crate::model::{Layout, LayoutEdge, LayoutNode, NodeKind};
use crate::style::Style;

const LINE_COLOR: &str = "#333333";
const DASHED_COLOR: &str = "#94a3b8";
const TANK_BODY: &str = "#add8e6";
const TANK_TOP: &str = "#bee3f8";
const PUMP_FILL: &str = "#ffa500";
const END_FILL: &str = "#d1d5db";

/// Escape text for element content and attribute values.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

fn points_attr(points: &[Point]) -> String {
    points
        .iter()
        .map(|p| format!("{},{}", p.x, p.y))
        .collect::<Vec<_>>()
        .join(" ")
}

fn defs() -> String {
    format!(
        concat!(
            "<defs>",
            "<filter id=\"solid-bg\" x=\"0\" y=\"0\" width=\"1\" height=\"1\">",
            "<feFlood flood-color=\"white\"/>",
            "<feComposite in=\"SourceGraphic\" operator=\"over\"/>",
            "</filter>",
            "<marker id=\"arrowhead\" markerWidth=\"10\" markerHeight=\"7\" refX=\"10\" refY=\"3.5\" orient=\"auto\">",
            "<polygon points=\"0 0, 10 3.5, 0 7\" fill=\"{color}\"/>",
            "</marker>",
            "</defs>"
        ),
        color = LINE_COLOR
    )
}

fn edge_svg(edge: &LayoutEdge, style: &Style) -> String {
    let mut attrs = format!(
        "points=\"{}\" fill=\"none\" stroke-width=\"{}\"",
        points_attr(&edge.points),
        style.heavy_stroke
    );
    if edge.is_dashed() {
        attrs.push_str(&format!(" stroke=\"{DASHED_COLOR}\" stroke-dasharray=\"4 4\""));
    } else {
        attrs.push_str(&format!(" stroke=\"{LINE_COLOR}\""));
    }
    if edge.arrow {
        attrs.push_str(" marker-end=\"url(#arrowhead)\"");
    }
    format!("<polyline class=\"edge {}\" {attrs}/>", escape(&edge.id))
}

fn node_svg(node: &LayoutNode, style: &Style) -> String {
    let Point { x, y } = node.position;
    let stroke = style.stroke_width;
    match node.kind {
        NodeKind::Tank => {
            let top = y - node.height * 0.5;
            let left = x - node.width * 0.5;
            let rim = node.height * 0.15;
            format!(
                concat!(
                    "<g class=\"tank\">",
                    "<rect x=\"{left}\" y=\"{top}\" width=\"{w}\" height=\"{h}\" fill=\"{body}\" stroke=\"{line}\" stroke-width=\"{s}\"/>",
                    "<ellipse cx=\"{x}\" cy=\"{top}\" rx=\"{rx}\" ry=\"{rim}\" fill=\"{lid}\" stroke=\"{line}\" stroke-width=\"{s}\"/>",
                    "</g>"
                ),
                left = left,
                top = top,
                w = node.width,
                h = node.height,
                body = TANK_BODY,
                lid = TANK_TOP,
                line = LINE_COLOR,
                s = stroke,
                x = x,
                rx = node.width * 0.5,
                rim = rim,
            )
        }
        NodeKind::Pump | NodeKind::End => {
            let fill = if node.kind == NodeKind::Pump {
                PUMP_FILL
            } else {
                END_FILL
            };
            format!(
                "<circle class=\"{}\" cx=\"{x}\" cy=\"{y}\" r=\"{}\" fill=\"{fill}\" stroke=\"{LINE_COLOR}\" stroke-width=\"{}\"/>",
                node.kind.class(),
                node.width * 0.5,
                style.heavy_stroke
            )
        }
        NodeKind::Junction | NodeKind::BranchSplit | NodeKind::BranchNode | NodeKind::Merge => {
            format!(
                "<circle class=\"{}\" cx=\"{x}\" cy=\"{y}\" r=\"{}\" fill=\"{LINE_COLOR}\"/>",
                node.kind.class(),
                style.junction_radius()
            )
        }
    }
}

/// Multi-line label whose last line sits on `anchor`.
fn text_svg(lines: &[String], anchor: Point, font: f64, line_height: f64, bold: bool) -> String {
    if lines.is_empty() {
        return String::new();
    }
    let weight = if bold { " font-weight=\"bold\"" } else { "" };
    let mut out = format!(
        "<text text-anchor=\"middle\" font-size=\"{font}\"{weight} filter=\"url(#solid-bg)\">"
    );
    let n = lines.len();
    for (i, line) in lines.iter().enumerate() {
        let y = anchor.y - (n - 1 - i) as f64 * line_height;
        out.push_str(&format!(
            "<tspan x=\"{}\" y=\"{y}\">{}</tspan>",
            anchor.x,
            escape(line)
        ));
    }
    out.push_str("</text>");
    out
}

fn node_label_anchor(node: &LayoutNode, style: &Style) -> Point {
    let gap = style.line_height();
    match node.kind {
        NodeKind::Tank => Point::new(node.position.x, node.position.y - node.height * 0.5 - gap),
        _ => Point::new(node.position.x, node.position.y + node.height * 0.5 + gap),
    }
}

/// Render to a standalone SVG document sized to the layout's coordinate system.
pub fn render_svg(layout: &Layout) -> String {
    let style = &layout.style;
    let mut out = format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" viewBox=\"0 0 {w} {h}\" width=\"{w}\" height=\"{h}\" font-family=\"sans-serif\">",
        w = layout.total_width,
        h = layout.height
    );
    out.push_str(&defs());
    out.push_str(&format!(
        "<rect width=\"{}\" height=\"{}\" fill=\"white\"/>",
        layout.total_width, layout.height
    ));

    for edge in &layout.edges {
        out.push_str(&edge_svg(edge, style));
    }
    for node in &layout.nodes {
        out.push_str(&node_svg(node, style));
    }
    for node in &layout.nodes {
        out.push_str(&text_svg(
            &node.label,
            node_label_anchor(node, style),
            style.header_font,
            style.line_height(),
            true,
        ));
    }
    for edge in &layout.edges {
        out.push_str(&text_svg(
            &edge.label,
            edge.label_anchor,
            style.base_font,
            style.line_height(),
            false,
        ));
    }

    out.push_str("</svg>");
    out
}

/// True when every label block stays inside the vertical bounds.
pub fn labels_fit(layout: &Layout) -> bool {
    layout.edges.iter().all(|e| {
        let top = e.label_anchor.y - layout.style.label_extent(e.label.len());
        top >= 0.0 && e.label_anchor.y <= layout.height
    })
}
