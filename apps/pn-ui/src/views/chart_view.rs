use egui_plot::{Legend, Line, Plot, PlotPoints, Points};
use pn_results::{ChartPoint, OperatingPointResponse, chart::column};

#[derive(Default)]
pub struct ChartView;

fn line(points: &[ChartPoint], name: &str, field: impl Fn(&ChartPoint) -> Option<f64>) -> Line {
    Line::new(PlotPoints::from(column(points, field))).name(name)
}

impl ChartView {
    pub fn show(&mut self, ui: &mut egui::Ui, points: &[ChartPoint], op: Option<&OperatingPointResponse>) {
        if let Some(op) = op {
            ui.horizontal_wrapped(|ui| {
                ui.label(format!("Flow: {:.1} m³/h", op.flow_op));
                ui.separator();
                ui.label(format!("Head: {:.2} m", op.head_op));
                if let Some(eff) = op.efficiency_op {
                    ui.separator();
                    ui.label(format!("Efficiency: {:.1} %", eff * 100.0));
                }
                if let Some(power) = op.power_kw {
                    ui.separator();
                    ui.label(format!("Power: {power:.2} kW"));
                }
                if let Some(margin) = op.npsh_margin() {
                    ui.separator();
                    ui.label(format!("NPSH margin: {margin:.2} m"));
                }
            });
            if op.cavitation_risk {
                ui.colored_label(egui::Color32::RED, "Cavitation risk");
            }
            if op.is_extrapolated {
                ui.colored_label(
                    egui::Color32::from_rgb(0xd9, 0x77, 0x06),
                    "Operating point lies outside the pump curve",
                );
            }
        } else {
            ui.label("No operating point yet. Press Calculate.");
        }
        ui.separator();

        if points.is_empty() {
            ui.label("No curve data");
            return;
        }

        let height = (ui.available_height() - 8.0) * 0.5;
        Plot::new("head_plot")
            .legend(Legend::default())
            .x_axis_label("Flow (m³/h)")
            .y_axis_label("Head (m)")
            .height(height)
            .show(ui, |plot_ui| {
                plot_ui.line(line(points, "System curve", |p| p.system_head));
                plot_ui.line(line(points, "Pump curve", |p| p.pump_head));
                if let Some(op) = op {
                    plot_ui.points(
                        Points::new(vec![[op.flow_op, op.head_op]])
                            .radius(5.0)
                            .color(egui::Color32::RED)
                            .name("Operating point"),
                    );
                }
            });

        Plot::new("npsh_plot")
            .legend(Legend::default())
            .x_axis_label("Flow (m³/h)")
            .y_axis_label("NPSH (m)")
            .height(height)
            .show(ui, |plot_ui| {
                plot_ui.line(line(points, "NPSH available", |p| p.npsh_available));
                plot_ui.line(line(points, "NPSH required", |p| p.npsh_required));
            });
    }
}
