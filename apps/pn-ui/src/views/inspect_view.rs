use pn_core::SegmentId;
use pn_project::{Catalog, Fluid, OperatingParameters};
use pn_results::ResultCorrelator;
use pn_topology::{Fitting, Region, Segment, SegmentDraft, SegmentPatch, Topology};

use super::Selection;

const DEFAULT_MATERIAL: &str = "Carbon Steel (New)";
const DEFAULT_NOMINAL: &str = "4\" (100mm)";

/// Edits requested from the inspector, applied by the app after the panel is drawn.
#[derive(Debug, Clone)]
pub enum InspectAction {
    Select(SegmentId),
    Add(Region),
    Remove(Region, SegmentId),
    Update(Region, SegmentId, SegmentPatch),
    AddFitting(SegmentId, Fitting),
    RemoveFitting(SegmentId, usize),
    AddBranch(String),
    RemoveBranch(String),
    SetName(String),
    SetFluid(Fluid),
    SetParameters(OperatingParameters),
}

#[derive(Default)]
pub struct InspectView {
    new_branch_name: String,
}

pub fn default_draft() -> SegmentDraft {
    Catalog::builtin()
        .draft_for(DEFAULT_MATERIAL, DEFAULT_NOMINAL)
        .map(|d| SegmentDraft { length_m: 10.0, ..d })
        .unwrap_or_else(|| SegmentDraft::new("", 10.0, 102.3))
}

fn regions(topology: &Topology) -> Vec<Region> {
    let mut out = vec![Region::Suction, Region::DischargeBefore];
    out.extend(topology.parallel_branches.names().map(Region::branch));
    out.push(Region::DischargeAfter);
    out
}

fn region_title(region: &Region) -> String {
    match region {
        Region::Suction => "Suction".to_string(),
        Region::DischargeBefore => "Discharge (before junction)".to_string(),
        Region::Branch(name) => format!("Branch: {name}"),
        Region::DischargeAfter => "Discharge (after junction)".to_string(),
    }
}

impl InspectView {
    pub fn show(
        &mut self,
        ui: &mut egui::Ui,
        name: &str,
        fluid: &Fluid,
        parameters: &OperatingParameters,
        topology: &Topology,
        results: &ResultCorrelator,
        selected: Option<&Selection>,
    ) -> Vec<InspectAction> {
        let mut actions = Vec::new();

        egui::ScrollArea::vertical().show(ui, |ui| {
            ui.heading("Scenario");
            let mut name_buf = name.to_string();
            if ui.text_edit_singleline(&mut name_buf).changed() {
                actions.push(InspectAction::SetName(name_buf));
            }
            self.show_operating_inputs(ui, fluid, parameters, &mut actions);

            ui.separator();
            ui.heading("Segments");
            for region in regions(topology) {
                self.show_region(ui, topology, &region, selected, &mut actions);
            }

            ui.horizontal(|ui| {
                ui.add(egui::TextEdit::singleline(&mut self.new_branch_name).desired_width(120.0));
                let name = self.new_branch_name.trim().to_string();
                let valid = !name.is_empty() && topology.parallel_branches.get(&name).is_none();
                if ui.add_enabled(valid, egui::Button::new("+ Branch")).clicked() {
                    actions.push(InspectAction::AddBranch(name));
                    self.new_branch_name.clear();
                }
            });

            if let Some(Selection::Segment(id)) = selected
                && let Some((region, segment)) = topology.find(id)
            {
                ui.separator();
                show_segment_editor(ui, &region, segment, results, &mut actions);
            }
        });

        actions
    }

    fn show_operating_inputs(
        &mut self,
        ui: &mut egui::Ui,
        fluid: &Fluid,
        parameters: &OperatingParameters,
        actions: &mut Vec<InspectAction>,
    ) {
        let catalog = Catalog::builtin();
        egui::ComboBox::from_id_salt("fluid_picker")
            .selected_text(&fluid.name)
            .show_ui(ui, |ui| {
                for entry in catalog.fluids() {
                    if ui.selectable_label(entry.name == fluid.name, entry.name).clicked() {
                        actions.push(InspectAction::SetFluid(entry.to_fluid()));
                    }
                }
            });

        let mut p = parameters.clone();
        let mut changed = false;
        egui::Grid::new("parameters").num_columns(2).show(ui, |ui| {
            ui.label("Static head");
            changed |= ui
                .add(egui::DragValue::new(&mut p.static_head_m).speed(0.1).suffix(" m"))
                .changed();
            ui.end_row();
            ui.label("Suction pressure");
            changed |= ui
                .add(egui::DragValue::new(&mut p.pressure_suction_bar_g).speed(0.01).suffix(" bar g"))
                .changed();
            ui.end_row();
            ui.label("Discharge pressure");
            changed |= ui
                .add(egui::DragValue::new(&mut p.pressure_discharge_bar_g).speed(0.01).suffix(" bar g"))
                .changed();
            ui.end_row();
            ui.label("Atmospheric pressure");
            changed |= ui
                .add(
                    egui::DragValue::new(&mut p.atmospheric_pressure_bar)
                        .speed(0.001)
                        .range(0.5..=1.1)
                        .suffix(" bar"),
                )
                .changed();
            ui.end_row();
            ui.label("Altitude");
            let mut altitude = p.altitude_m;
            if ui
                .add(egui::DragValue::new(&mut altitude).speed(10.0).range(0.0..=5_000.0).suffix(" m"))
                .changed()
            {
                p.set_altitude(altitude);
                changed = true;
            }
            ui.end_row();
        });
        if changed {
            actions.push(InspectAction::SetParameters(p));
        }
    }

    fn show_region(
        &mut self,
        ui: &mut egui::Ui,
        topology: &Topology,
        region: &Region,
        selected: Option<&Selection>,
        actions: &mut Vec<InspectAction>,
    ) {
        let segments = topology.list(region).unwrap_or_default();
        egui::CollapsingHeader::new(format!("{} ({})", region_title(region), segments.len()))
            .id_salt(region.to_string())
            .default_open(true)
            .show(ui, |ui| {
                for (i, seg) in segments.iter().enumerate() {
                    let is_selected = matches!(selected, Some(Selection::Segment(id)) if *id == seg.id);
                    let label = seg.display_name(|| format!("Segment {}", i + 1));
                    if ui.selectable_label(is_selected, label).clicked() {
                        actions.push(InspectAction::Select(seg.id.clone()));
                    }
                }
                ui.horizontal(|ui| {
                    if ui.button("+ Segment").clicked() {
                        actions.push(InspectAction::Add(region.clone()));
                    }
                    if let Region::Branch(name) = region
                        && ui.button("Remove branch").clicked()
                    {
                        actions.push(InspectAction::RemoveBranch(name.clone()));
                    }
                });
            });
    }
}

fn show_segment_editor(
    ui: &mut egui::Ui,
    region: &Region,
    segment: &Segment,
    results: &ResultCorrelator,
    actions: &mut Vec<InspectAction>,
) {
    let catalog = Catalog::builtin();
    ui.heading("Selected segment");
    ui.label(format!("{} in {}", segment.id.as_str(), region));

    let mut edit = segment.clone();
    egui::Grid::new("segment_editor").num_columns(2).show(ui, |ui| {
        ui.label("Name");
        ui.text_edit_singleline(&mut edit.name);
        ui.end_row();
        ui.label("Length");
        ui.add(egui::DragValue::new(&mut edit.length_m).speed(0.5).range(0.0..=10_000.0).suffix(" m"));
        ui.end_row();
        ui.label("Diameter");
        ui.add(egui::DragValue::new(&mut edit.diameter_mm).speed(0.5).range(1.0..=2_000.0).suffix(" mm"));
        ui.end_row();
        ui.label("Material");
        egui::ComboBox::from_id_salt("material_picker")
            .selected_text(if edit.material.is_empty() { "(custom)" } else { edit.material.as_str() })
            .show_ui(ui, |ui| {
                for m in catalog.materials() {
                    if ui.selectable_label(m.name == edit.material, m.name).clicked() {
                        edit.material = m.name.to_string();
                        edit.roughness_mm = m.roughness_mm;
                    }
                }
            });
        ui.end_row();
        ui.label("Roughness");
        ui.add(egui::DragValue::new(&mut edit.roughness_mm).speed(0.001).range(0.0..=10.0).suffix(" mm"));
        ui.end_row();
        ui.label("Equipment loss");
        ui.add(egui::DragValue::new(&mut edit.equipment_loss_m).speed(0.1).range(0.0..=500.0).suffix(" m"));
        ui.end_row();
    });

    let patch = SegmentPatch {
        name: (edit.name != segment.name).then(|| edit.name.clone()),
        length_m: (edit.length_m != segment.length_m).then_some(edit.length_m),
        diameter_mm: (edit.diameter_mm != segment.diameter_mm).then_some(edit.diameter_mm),
        material: (edit.material != segment.material).then(|| edit.material.clone()),
        roughness_mm: (edit.roughness_mm != segment.roughness_mm).then_some(edit.roughness_mm),
        equipment_loss_m: (edit.equipment_loss_m != segment.equipment_loss_m)
            .then_some(edit.equipment_loss_m),
        fittings: None,
    };
    if patch != SegmentPatch::default() {
        actions.push(InspectAction::Update(region.clone(), segment.id.clone(), patch));
    }

    ui.label(format!("Fittings (ΣK = {:.2})", segment.total_k()));
    for (i, fitting) in segment.fittings.iter().enumerate() {
        ui.horizontal(|ui| {
            ui.label(format!("{} × {} (K = {})", fitting.quantity, fitting.name, fitting.k));
            if ui.small_button("✕").clicked() {
                actions.push(InspectAction::RemoveFitting(segment.id.clone(), i));
            }
        });
    }
    egui::ComboBox::from_id_salt("fitting_picker")
        .selected_text("+ Fitting")
        .show_ui(ui, |ui| {
            for entry in catalog.fittings() {
                if ui.selectable_label(false, entry.name).clicked() {
                    actions.push(InspectAction::AddFitting(segment.id.clone(), entry.to_fitting(1)));
                }
            }
        });

    if let Some(r) = results.result_for(&segment.id) {
        ui.separator();
        ui.label(format!("Velocity: {:.2} m/s", r.velocity_m_s));
        ui.label(format!("Reynolds: {:.0}", r.reynolds));
        ui.label(format!("Friction factor: {:.4}", r.friction_factor));
        ui.label(format!(
            "Loss: {:.2} m (major {:.2}, minor {:.2})",
            r.total_loss_m, r.major_loss_m, r.minor_loss_m
        ));
    }

    if ui.button("Delete segment").clicked() {
        actions.push(InspectAction::Remove(region.clone(), segment.id.clone()));
    }
}
