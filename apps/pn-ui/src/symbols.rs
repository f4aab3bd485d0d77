use egui::{Color32, Pos2, Rect, Stroke, Vec2};
use pn_layout::NodeKind;

/// Draws one schematic node. `size` is the node box in screen units.
pub fn draw_node_symbol(painter: &egui::Painter, kind: NodeKind, center: Pos2, size: Vec2, color: Color32) {
    let radius = size.x.min(size.y) * 0.5;
    match kind {
        NodeKind::Tank => {
            let rect = Rect::from_center_size(center, size);
            painter.rect_stroke(rect, radius * 0.15, Stroke::new(2.0, color));
            // liquid level
            let level = rect.top() + rect.height() * 0.3;
            painter.line_segment(
                [Pos2::new(rect.left() + 4.0, level), Pos2::new(rect.right() - 4.0, level)],
                Stroke::new(1.0, color),
            );
        }
        NodeKind::Pump => {
            painter.circle_filled(center, radius, Color32::WHITE);
            painter.circle_stroke(center, radius, Stroke::new(2.0, color));
            painter.line_segment(
                [center, center + Vec2::new(radius, 0.0)],
                Stroke::new(2.0, color),
            );
        }
        NodeKind::End => {
            painter.circle_stroke(center, radius, Stroke::new(2.0, color));
            painter.circle_filled(center, radius * 0.4, color);
        }
        NodeKind::Junction | NodeKind::BranchSplit | NodeKind::Merge => {
            painter.circle_filled(center, radius, color);
        }
        NodeKind::BranchNode => {
            painter.circle_filled(center, radius * 0.6, color);
        }
    }
}

/// Filled arrowhead whose tip sits on `tip`, pointing away from `from`.
pub fn draw_arrowhead(painter: &egui::Painter, from: Pos2, tip: Pos2, length: f32, color: Color32) {
    let dir = (tip - from).normalized();
    if !dir.x.is_finite() || !dir.y.is_finite() {
        return;
    }
    let normal = Vec2::new(-dir.y, dir.x);
    let base = tip - dir * length;
    let half = length * 0.45;
    painter.add(egui::Shape::convex_polygon(
        vec![tip, base + normal * half, base - normal * half],
        color,
        Stroke::NONE,
    ));
}
