use eframe::egui;

use crate::state::{AppState, Page};
use crate::ui::{about, descriptive, map, overview, panels, predictor};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct SalaryExplorerApp {
    pub state: AppState,
}

impl SalaryExplorerApp {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }
}

impl eframe::App for SalaryExplorerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar + page switcher ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: record filters (filterable pages only) ----
        if self.state.page.filterable() {
            egui::SidePanel::left("filter_panel")
                .default_width(220.0)
                .resizable(true)
                .show(ctx, |ui| {
                    panels::side_panel(ui, &mut self.state);
                });
        }

        // ---- Central panel: the active page ----
        egui::CentralPanel::default().show(ctx, |ui| match self.state.page {
            Page::Overview => overview::show(ui, &mut self.state),
            Page::Descriptive => descriptive::show(ui, &mut self.state),
            Page::Map => map::show(ui, &mut self.state),
            Page::Predictor => predictor::show(ui, &mut self.state),
            Page::About => about::show(ui, &self.state),
        });
    }
}
