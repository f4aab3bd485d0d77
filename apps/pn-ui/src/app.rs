use crate::views::{ChartView, InspectAction, InspectView, SchematicView, Selection, default_draft};
use pn_app::{
    AppConfig, AppResult, DirectoryAssembler, PngCapture, ReplayService, Session, export_report,
};
use pn_layout::RenderMode;
use pn_project::Scenario;
use pn_topology::Region;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{info, warn};

const CONFIG_FILE: &str = "pumpnet.yaml";

pub struct PumpNetApp {
    session: Session,
    config: AppConfig,
    scenario_path: String,
    responses_path: String,
    export_dir: String,
    selection: Option<Selection>,
    active_view: ViewTab,
    schematic_view: SchematicView,
    inspect_view: InspectView,
    chart_view: ChartView,
    status: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum ViewTab {
    Schematic,
    Charts,
}

impl PumpNetApp {
    pub fn new(_cc: &eframe::CreationContext<'_>) -> AppResult<Self> {
        let config = AppConfig::load_or_default(&PathBuf::from(CONFIG_FILE)).unwrap_or_else(|e| {
            warn!(error = %e, "config unreadable; using defaults");
            AppConfig::default()
        });
        let session = Session::new(
            Scenario::new("New Scenario"),
            Arc::new(ReplayService::default()),
            config.clone(),
        )?;

        Ok(Self {
            session,
            config,
            scenario_path: "scenarios/demo_branch.yaml".to_string(),
            responses_path: String::new(),
            export_dir: "report".to_string(),
            selection: None,
            active_view: ViewTab::Schematic,
            schematic_view: SchematicView::default(),
            inspect_view: InspectView::default(),
            chart_view: ChartView,
            status: None,
        })
    }

    fn report(&mut self, result: AppResult<String>) {
        match result {
            Ok(message) => {
                info!("{message}");
                self.status = Some(message);
            }
            Err(e) => {
                warn!(error = %e, "action failed");
                self.status = Some(format!("Error: {e}"));
            }
        }
    }

    fn open_scenario(&mut self) -> AppResult<String> {
        let path = PathBuf::from(self.scenario_path.trim());
        self.session.load_scenario(&path)?;
        self.selection = None;
        Ok(format!("Opened {}", path.display()))
    }

    fn save_scenario(&mut self) -> AppResult<String> {
        let path = PathBuf::from(self.scenario_path.trim());
        self.session.save_scenario(&path)?;
        Ok(format!("Saved {}", path.display()))
    }

    /// Swap the calculation service; the scenario being edited carries over.
    fn load_responses(&mut self) -> AppResult<String> {
        let path = PathBuf::from(self.responses_path.trim());
        let service = ReplayService::load(&path)?;
        let recorded = service.book().operating_point.len() + service.book().system_curve.len();
        self.session = Session::new(self.session.to_scenario(), Arc::new(service), self.config.clone())?;
        Ok(format!("Loaded {recorded} recorded responses"))
    }

    fn export(&mut self) -> AppResult<String> {
        let mut assembler = DirectoryAssembler::new(self.export_dir.trim());
        let path = export_report(&mut self.session, &mut PngCapture::default(), &mut assembler)?;
        Ok(format!("Report written to {}", path.display()))
    }

    fn apply_inspect_actions(&mut self, actions: Vec<InspectAction>) {
        for action in actions {
            match action {
                InspectAction::Select(id) => self.selection = Some(Selection::Segment(id)),
                InspectAction::Add(region) => {
                    let id = self
                        .session
                        .store_mut()
                        .add(&region, default_draft());
                    self.selection = Some(Selection::Segment(id));
                }
                InspectAction::Remove(region, id) => {
                    if self.session.store_mut().remove(&region, &id) {
                        self.selection = None;
                    }
                }
                InspectAction::Update(region, id, patch) => {
                    self.session.store_mut().update(&region, &id, &patch);
                }
                InspectAction::AddFitting(id, fitting) => {
                    self.session.store_mut().add_fitting(&id, fitting);
                }
                InspectAction::RemoveFitting(id, index) => {
                    self.session.store_mut().remove_fitting(&id, index);
                }
                InspectAction::AddBranch(name) => {
                    self.session.store_mut().add_branch(name);
                }
                InspectAction::RemoveBranch(name) => {
                    let selected_inside = matches!(
                        &self.selection,
                        Some(Selection::Segment(id))
                            if self.session.topology().locate(id) == Some(Region::branch(name.as_str()))
                    );
                    if self.session.store_mut().remove_branch(&name) && selected_inside {
                        self.selection = None;
                    }
                }
                InspectAction::SetName(name) => self.session.set_name(name),
                InspectAction::SetFluid(fluid) => self.session.set_fluid(fluid),
                InspectAction::SetParameters(params) => self.session.set_parameters(params),
            }
        }
    }
}

impl eframe::App for PumpNetApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.session.tick(Instant::now());
        if self.session.in_flight() > 0 || self.session.debounce_pending() {
            ctx.request_repaint_after(Duration::from_millis(50));
        }

        egui::TopBottomPanel::top("toolbar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.add(egui::TextEdit::singleline(&mut self.scenario_path).desired_width(260.0));
                if ui.button("Open").clicked() {
                    let result = self.open_scenario();
                    self.report(result);
                }
                if ui.button("Save").clicked() {
                    let result = self.save_scenario();
                    self.report(result);
                }

                ui.separator();
                ui.label("Responses:");
                ui.add(egui::TextEdit::singleline(&mut self.responses_path).desired_width(200.0));
                if ui.button("Load").clicked() {
                    let result = self.load_responses();
                    self.report(result);
                }

                ui.separator();
                let busy = self.session.in_flight() > 0;
                if ui.add_enabled(!busy, egui::Button::new("Calculate")).clicked() {
                    self.session.calculate();
                }
                if ui.button("Refresh curve").clicked() {
                    self.session.refresh_system_curve();
                }
                if busy {
                    ui.spinner();
                }

                ui.separator();
                ui.add(egui::TextEdit::singleline(&mut self.export_dir).desired_width(120.0));
                if ui.button("Export report").clicked() {
                    let result = self.export();
                    self.report(result);
                }
            });

            let mut dismiss = false;
            if let Some(notice) = self.session.notice() {
                ui.horizontal(|ui| {
                    ui.colored_label(egui::Color32::RED, &notice.message);
                    dismiss = ui.small_button("✕").clicked();
                });
            }
            if dismiss {
                self.session.dismiss_notice();
            }
            if let Some(status) = &self.status {
                ui.label(status);
            }
        });

        let actions = egui::SidePanel::right("inspector")
            .default_width(320.0)
            .show(ctx, |ui| {
                self.inspect_view.show(
                    ui,
                    self.session.name(),
                    self.session.fluid(),
                    self.session.parameters(),
                    self.session.topology(),
                    self.session.results(),
                    self.selection.as_ref(),
                )
            })
            .inner;
        self.apply_inspect_actions(actions);

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.selectable_value(&mut self.active_view, ViewTab::Schematic, "Schematic");
                ui.selectable_value(&mut self.active_view, ViewTab::Charts, "Charts");
                if self.active_view == ViewTab::Schematic {
                    ui.separator();
                    ui.selectable_value(&mut self.schematic_view.mode, RenderMode::Screen, "Screen");
                    ui.selectable_value(&mut self.schematic_view.mode, RenderMode::Print, "Print preview");
                }
            });
            ui.separator();

            match self.active_view {
                ViewTab::Schematic => {
                    let mode = self.schematic_view.mode;
                    let layout = self.session.layout(mode);
                    if let Some(hit) = self.schematic_view.show(ui, layout, self.selection.as_ref()) {
                        self.selection = Some(hit);
                    }
                }
                ViewTab::Charts => {
                    let points = self.session.chart();
                    self.chart_view.show(ui, &points, self.session.operating_point());
                }
            }
        });
    }
}
