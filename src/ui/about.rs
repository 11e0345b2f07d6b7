use eframe::egui::{RichText, ScrollArea, Ui};
use egui_extras::{Column, TableBuilder};

use crate::state::AppState;
use crate::ui::widgets::fmt_count;

const COLUMN_DESCRIPTIONS: [(&str, &str); 9] = [
    ("work_year", "Year of the salary record"),
    ("job_title", "Role or job title"),
    ("experience_level", "Experience level of the employee (EN/MI/SE/EX)"),
    ("employment_type", "Full-time, part-time, contract or freelance"),
    ("salary_in_usd", "Salary standardized to USD"),
    ("employee_residence", "Country of the employee (ISO alpha-2)"),
    ("company_location", "Location of the company HQ (ISO alpha-2)"),
    ("remote_ratio", "Remote work percentage (0, 50 or 100)"),
    ("company_size", "Company size (S/M/L)"),
];

/// Static project page: mission, objectives, and the column glossary.
pub fn show(ui: &mut Ui, state: &AppState) {
    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            ui.heading("About");
            ui.separator();

            ui.strong("Mission");
            ui.label(
                "Support career development by providing practical salary \
                 insights to cybersecurity professionals and students.",
            );
            ui.add_space(6.0);

            ui.strong("Objectives");
            ui.label("• Visualize global cybersecurity job salary trends with interactive charts.");
            ui.label("• Predict salaries from user-selected conditions with a regression model.");
            ui.label(
                "• Analyze the impact of role, experience, location, and remote \
                 work on compensation.",
            );
            ui.separator();

            ui.strong("Dataset");
            let coverage = match state.dataset.year_range() {
                Some((first, last)) => format!(" from {first} to {last}"),
                None => String::new(),
            };
            ui.label(format!(
                "The current session holds {} salary records covering {} job titles{coverage}.",
                fmt_count(state.dataset.len()),
                fmt_count(state.dataset.job_titles.len())
            ));
            ui.add_space(6.0);

            ui.strong("Column Descriptions");
            ui.add_space(4.0);
            TableBuilder::new(ui)
                .striped(true)
                .column(Column::auto())
                .column(Column::remainder())
                .header(20.0, |mut header| {
                    header.col(|ui| {
                        ui.strong("Column");
                    });
                    header.col(|ui| {
                        ui.strong("Description");
                    });
                })
                .body(|mut body| {
                    for (column, description) in COLUMN_DESCRIPTIONS {
                        body.row(18.0, |mut row| {
                            row.col(|ui| {
                                ui.label(column);
                            });
                            row.col(|ui| {
                                ui.label(description);
                            });
                        });
                    }
                });

            ui.add_space(8.0);
            ui.label(RichText::new(
                "Salary and job distributions are based on publicly available \
                 and user-submitted data and may not fully represent global \
                 conditions.",
            )
            .weak());
        });
}
