use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};
use egui_plot::{Bar, BarChart, Plot, VLine};

use crate::data::aggregate;
use crate::data::model::{CompanySize, EmploymentType, ExperienceLevel, RemoteMode};
use crate::geo;
use crate::state::AppState;
use crate::ui::widgets::{fmt_count, fmt_usd};

/// Salary-prediction page.  The model trains on first visit and is cached
/// for the rest of the session.
pub fn show(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Cybersecurity Salary Prediction");
    ui.label(
        "Random forest regression on the log-transformed salary, with \
         one-hot encoded job features.",
    );
    ui.add_space(6.0);

    state.ensure_model();

    if let Some(err) = &state.predictor.train_error {
        ui.label(RichText::new(format!("Model unavailable: {err}")).color(Color32::RED));
        return;
    }
    if state.predictor.model.is_none() {
        ui.spinner();
        ui.label("Training model…");
        return;
    }

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            dataset_info(ui, state);
            ui.separator();

            feature_selectors(ui, state);
            state.update_prediction();

            ui.add_space(8.0);
            prediction_box(ui, state);
            ui.add_space(8.0);
            distribution_chart(ui, state);
        });
}

fn dataset_info(ui: &mut Ui, state: &AppState) {
    let model_rows = state
        .predictor
        .model
        .as_ref()
        .map(|m| m.training_rows)
        .unwrap_or(0);
    ui.label(format!(
        "Trained on {} of {} records (rows with a salary), {} distinct job titles.",
        fmt_count(model_rows),
        fmt_count(state.dataset.len()),
        fmt_count(state.dataset.job_titles.len())
    ));
}

fn feature_selectors(ui: &mut Ui, state: &mut AppState) {
    ui.strong("Predict Cybersecurity Salary");
    ui.add_space(4.0);

    // first row: role, experience, employment
    ui.columns(3, |cols| {
        let input = &mut state.predictor.input;

        cols[0].label("Job Title");
        egui::ComboBox::from_id_salt("predict_job")
            .selected_text(input.job_title.clone())
            .show_ui(&mut cols[0], |ui: &mut Ui| {
                for title in &state.dataset.job_titles {
                    ui.selectable_value(&mut input.job_title, title.clone(), title);
                }
            });

        cols[1].label("Experience Level");
        egui::ComboBox::from_id_salt("predict_experience")
            .selected_text(input.experience.label())
            .show_ui(&mut cols[1], |ui: &mut Ui| {
                for level in ExperienceLevel::ALL {
                    ui.selectable_value(&mut input.experience, level, level.label());
                }
            });

        cols[2].label("Employment Type");
        egui::ComboBox::from_id_salt("predict_employment")
            .selected_text(input.employment.label())
            .show_ui(&mut cols[2], |ui: &mut Ui| {
                for emp in EmploymentType::ALL {
                    ui.selectable_value(&mut input.employment, emp, emp.label());
                }
            });
    });

    ui.add_space(4.0);

    // second row: geography, remote, size
    ui.columns(3, |cols| {
        let input = &mut state.predictor.input;

        cols[0].label("Company Location");
        egui::ComboBox::from_id_salt("predict_location")
            .selected_text(geo::display_label(&input.company_location))
            .show_ui(&mut cols[0], |ui: &mut Ui| {
                for code in &state.dataset.company_locations {
                    ui.selectable_value(
                        &mut input.company_location,
                        code.clone(),
                        geo::display_label(code),
                    );
                }
            });

        cols[1].label("Employee Residence");
        egui::ComboBox::from_id_salt("predict_residence")
            .selected_text(geo::display_label(&input.employee_residence))
            .show_ui(&mut cols[1], |ui: &mut Ui| {
                for code in &state.dataset.employee_residences {
                    ui.selectable_value(
                        &mut input.employee_residence,
                        code.clone(),
                        geo::display_label(code),
                    );
                }
            });

        cols[2].label("Remote Ratio / Company Size");
        cols[2].horizontal(|ui: &mut Ui| {
            egui::ComboBox::from_id_salt("predict_remote")
                .selected_text(format!("{}%", input.remote_ratio))
                .show_ui(ui, |ui: &mut Ui| {
                    for ratio in RemoteMode::RATIOS {
                        ui.selectable_value(&mut input.remote_ratio, ratio, format!("{ratio}%"));
                    }
                });
            egui::ComboBox::from_id_salt("predict_size")
                .selected_text(input.company_size.label())
                .show_ui(ui, |ui: &mut Ui| {
                    for size in CompanySize::ALL {
                        ui.selectable_value(&mut input.company_size, size, size.label());
                    }
                });
        });
    });
}

fn prediction_box(ui: &mut Ui, state: &AppState) {
    let Some(predicted) = state.predictor.last_prediction else {
        return;
    };
    egui::Frame::default()
        .fill(ui.visuals().faint_bg_color)
        .inner_margin(egui::Margin::symmetric(16, 12))
        .show(ui, |ui: &mut Ui| {
            ui.label(RichText::new("Predicted Salary").strong());
            ui.label(RichText::new(fmt_usd(predicted)).size(30.0).strong());
        });
}

fn distribution_chart(ui: &mut Ui, state: &AppState) {
    let Some(predicted) = state.predictor.last_prediction else {
        return;
    };

    ui.strong("Salary Distribution Comparison");
    ui.label(RichText::new(
        "Observed salary distribution with the predicted value marked.",
    )
    .weak());

    let salaries = state.dataset.records.iter().filter_map(|r| r.salary_in_usd);
    let bins = aggregate::histogram(salaries, 40);
    if bins.is_empty() {
        return;
    }
    let width = if bins.len() > 1 {
        bins[1].0 - bins[0].0
    } else {
        1.0
    };

    let bars: Vec<Bar> = bins
        .iter()
        .map(|(center, count)| {
            Bar::new(*center, *count as f64)
                .width(width * 0.95)
                .name(format!("{}: {}", fmt_usd(*center), count))
        })
        .collect();

    Plot::new("salary_histogram")
        .height(320.0)
        .x_axis_label("Salary (USD)")
        .y_axis_label("Count")
        .allow_drag(false)
        .allow_scroll(false)
        .allow_zoom(false)
        .allow_boxed_zoom(false)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars));
            plot_ui.vline(
                VLine::new(predicted)
                    .name("Predicted salary")
                    .color(Color32::RED)
                    .width(2.0),
            );
        });
}
