#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

mod app;
mod symbols;
mod views;

use app::PumpNetApp;

fn main() -> eframe::Result<()> {
    tracing_subscriber::fmt::init();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1400.0, 900.0])
            .with_title("PumpNet"),
        ..Default::default()
    };

    eframe::run_native(
        "PumpNet",
        options,
        Box::new(|cc| Ok(Box::new(PumpNetApp::new(cc)?))),
    )
}
