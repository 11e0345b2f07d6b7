mod app;
mod color;
mod data;
mod geo;
mod state;
mod ui;

use std::path::Path;

use app::SalaryExplorerApp;
use eframe::egui;
use state::AppState;

/// Fixed source file, read once at startup from the working directory.
const DATA_FILE: &str = "salaries_cyber_clean.csv";

fn main() -> eframe::Result {
    env_logger::init();

    let path = Path::new(DATA_FILE);
    let dataset = match data::loader::load_file(path) {
        Ok(dataset) => dataset,
        Err(e) => {
            // cannot serve any page without the record set
            log::error!("failed to load {}: {e:#}", path.display());
            eprintln!("error: failed to load {}: {e:#}", path.display());
            std::process::exit(1);
        }
    };

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 820.0])
            .with_min_inner_size([700.0, 500.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Cyber Salary Explorer",
        options,
        Box::new(move |_cc| Ok(Box::new(SalaryExplorerApp::new(AppState::new(dataset))))),
    )
}
