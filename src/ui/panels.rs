use std::collections::BTreeSet;
use std::fmt::Display;

use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::state::{AppState, Page};
use crate::ui::widgets::fmt_count;

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / page switcher.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
            if ui.button("Quit").clicked() {
                ui.ctx().send_viewport_cmd(egui::ViewportCommand::Close);
            }
        });

        ui.separator();

        for page in Page::ALL {
            ui.selectable_value(&mut state.page, page, page.label());
        }

        ui.separator();

        ui.label(format!(
            "{} records loaded, {} after filters",
            fmt_count(state.dataset.len()),
            fmt_count(state.visible_indices.len())
        ));

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// Left side panel – record filters
// ---------------------------------------------------------------------------

/// Render one collapsible filter section; returns true when the selection
/// changed.
fn filter_section<T: Copy + Ord + Display>(
    ui: &mut Ui,
    title: &str,
    all_values: &[T],
    selected: &mut BTreeSet<T>,
) -> bool {
    let mut changed = false;
    let header = format!("{title}  ({}/{})", selected.len(), all_values.len());

    egui::CollapsingHeader::new(RichText::new(header).strong())
        .id_salt(title)
        .default_open(false)
        .show(ui, |ui: &mut Ui| {
            ui.horizontal(|ui: &mut Ui| {
                if ui.small_button("All").clicked() {
                    selected.extend(all_values.iter().copied());
                    changed = true;
                }
                if ui.small_button("None").clicked() {
                    selected.clear();
                    changed = true;
                }
            });

            for value in all_values {
                let mut checked = selected.contains(value);
                if ui.checkbox(&mut checked, value.to_string()).changed() {
                    if checked {
                        selected.insert(*value);
                    } else {
                        selected.remove(value);
                    }
                    changed = true;
                }
            }
        });

    changed
}

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filters");
    ui.separator();

    let years = state.dataset.years.clone();
    let mut changed = false;

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            use crate::data::model::{
                CompanySize, EmploymentType, ExperienceLevel, RemoteMode,
            };

            changed |= filter_section(ui, "Work Year", &years, &mut state.filters.years);
            changed |= filter_section(
                ui,
                "Experience Level",
                &ExperienceLevel::ALL,
                &mut state.filters.experience,
            );
            changed |= filter_section(
                ui,
                "Employment Type",
                &EmploymentType::ALL,
                &mut state.filters.employment,
            );
            changed |= filter_section(
                ui,
                "Company Size",
                &CompanySize::ALL,
                &mut state.filters.company_size,
            );
            changed |= filter_section(
                ui,
                "Remote Type",
                &RemoteMode::ALL,
                &mut state.filters.remote_mode,
            );
        });

    if changed {
        state.refilter();
    }
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open salary data")
        .add_filter("Supported files", &["csv", "json", "parquet", "pq"])
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        match crate::data::loader::load_file(&path) {
            Ok(dataset) => {
                log::info!(
                    "loaded {} salary records from {}",
                    dataset.len(),
                    path.display()
                );
                state.set_dataset(dataset);
            }
            Err(e) => {
                log::error!("failed to load {}: {e:#}", path.display());
                state.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }
}
