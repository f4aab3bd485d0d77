use egui::{Align2, Color32, FontId, Pos2, Sense, Stroke, Vec2};
use pn_core::SegmentId;
use pn_layout::{Hit, Layout, Point, RenderMode};

use crate::symbols::{draw_arrowhead, draw_node_symbol};

const PIPE: Color32 = Color32::from_rgb(0x33, 0x41, 0x55);
const DASHED: Color32 = Color32::from_rgb(0x94, 0xa3, 0xb8);
const SELECTED: Color32 = Color32::from_rgb(0x25, 0x63, 0xeb);
const LABEL: Color32 = Color32::from_rgb(0x1f, 0x29, 0x37);

/// What the user clicked on the schematic.
#[derive(Debug, Clone, PartialEq)]
pub enum Selection {
    Segment(SegmentId),
    Node(String),
}

pub struct SchematicView {
    pub mode: RenderMode,
}

impl Default for SchematicView {
    fn default() -> Self {
        Self {
            mode: RenderMode::Screen,
        }
    }
}

/// Maps layout coordinates onto the allocated screen rect.
struct Transform {
    origin: Pos2,
    scale: f32,
}

impl Transform {
    fn fit(layout: &Layout, rect: egui::Rect) -> Self {
        let sx = rect.width() / layout.total_width.max(1.0) as f32;
        let sy = rect.height() / layout.height.max(1.0) as f32;
        Self {
            origin: rect.min,
            scale: sx.min(sy).clamp(0.3, 2.0),
        }
    }

    fn to_screen(&self, p: Point) -> Pos2 {
        self.origin + Vec2::new(p.x as f32, p.y as f32) * self.scale
    }

    fn to_layout(&self, p: Pos2) -> Point {
        let v = (p - self.origin) / self.scale;
        Point::new(v.x as f64, v.y as f64)
    }
}

impl SchematicView {
    /// Paints `layout` and returns the item clicked this frame, if any.
    pub fn show(&mut self, ui: &mut egui::Ui, layout: &Layout, selected: Option<&Selection>) -> Option<Selection> {
        let (response, painter) = ui.allocate_painter(ui.available_size(), Sense::click());
        painter.rect_filled(response.rect, 0.0, Color32::WHITE);
        let tf = Transform::fit(layout, response.rect);
        let style = &layout.style;
        let stroke_w = style.stroke_width as f32 * tf.scale;
        let font = FontId::proportional(style.base_font as f32 * tf.scale);
        let line_h = style.line_height() as f32 * tf.scale;

        for edge in &layout.edges {
            let pts: Vec<Pos2> = edge.points.iter().map(|p| tf.to_screen(*p)).collect();
            if pts.len() < 2 {
                continue;
            }
            let is_selected = matches!(selected, Some(Selection::Segment(id)) if edge.segments.contains(id));
            let color = if is_selected {
                SELECTED
            } else if edge.is_dashed() {
                DASHED
            } else {
                PIPE
            };
            let width = if is_selected { stroke_w * 2.0 } else { stroke_w };
            let stroke = Stroke::new(width, color);

            if edge.is_dashed() {
                painter.extend(egui::Shape::dashed_line(&pts, stroke, 4.0 * tf.scale, 4.0 * tf.scale));
            } else {
                painter.add(egui::Shape::line(pts.clone(), stroke));
            }
            if edge.arrow
                && let [.., from, tip] = pts.as_slice()
            {
                draw_arrowhead(&painter, *from, *tip, 8.0 * tf.scale, color);
            }

            let anchor = tf.to_screen(edge.label_anchor);
            for (i, line) in edge.label.iter().rev().enumerate() {
                painter.text(
                    anchor - Vec2::new(0.0, i as f32 * line_h),
                    Align2::CENTER_BOTTOM,
                    line,
                    font.clone(),
                    LABEL,
                );
            }
        }

        for node in &layout.nodes {
            let center = tf.to_screen(node.position);
            let size = Vec2::new(node.width as f32, node.height as f32) * tf.scale;
            let is_selected = matches!(selected, Some(Selection::Node(id)) if *id == node.id);
            let color = if is_selected { SELECTED } else { PIPE };
            draw_node_symbol(&painter, node.kind, center, size, color);

            let mut y = center.y + size.y * 0.5 + 4.0;
            for line in &node.label {
                painter.text(Pos2::new(center.x, y), Align2::CENTER_TOP, line, font.clone(), LABEL);
                y += line_h;
            }
        }

        if response.clicked()
            && let Some(pos) = response.interact_pointer_pos()
        {
            let tolerance = 6.0 / tf.scale as f64;
            return match layout.hit_test(tf.to_layout(pos), tolerance) {
                Some(Hit::Edge(edge)) => edge.segments.first().cloned().map(Selection::Segment),
                Some(Hit::Node(node)) => Some(Selection::Node(node.id.clone())),
                None => None,
            };
        }
        None
    }
}
