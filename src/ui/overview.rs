use std::collections::BTreeSet;

use eframe::egui::{RichText, ScrollArea, Ui};
use egui_plot::{Legend, Line, Plot, PlotPoints};
use egui_extras::{Column, TableBuilder};

use crate::color::ColorMap;
use crate::data::aggregate::{self, GroupKey, Metric};
use crate::state::AppState;
use crate::ui::widgets::{self, CategoryBar, fmt_count, fmt_usd};

/// Landing page: dataset at a glance plus the headline charts.
pub fn show(ui: &mut Ui, state: &mut AppState) {
    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            ui.heading("Cybersecurity Jobs: Salary Explorer");
            ui.label(
                "Explore the landscape of cybersecurity careers: analyze salary trends, \
                 compare roles across countries, and predict earnings from real data.",
            );
            ui.add_space(8.0);

            glance_row(ui, state);
            ui.separator();

            salary_trend(ui, state);
            ui.add_space(8.0);

            ui.columns(2, |cols| {
                top_titles(&mut cols[0], state);
                experience_distribution(&mut cols[1], state);
            });
            ui.separator();

            sample_table(ui, state);
        });
}

fn glance_row(ui: &mut Ui, state: &AppState) {
    let records: Vec<_> = state.visible_records().collect();

    let titles: BTreeSet<&str> = records.iter().map(|r| r.job_title.as_str()).collect();
    let countries: BTreeSet<&str> =
        records.iter().map(|r| r.company_location.as_str()).collect();
    let years = records.iter().map(|r| r.work_year);
    let year_range = match (years.clone().min(), years.max()) {
        (Some(a), Some(b)) => format!("{a}-{b}"),
        _ => "n/a".to_string(),
    };

    ui.columns(4, |cols| {
        widgets::metric_tile(&mut cols[0], "Total Records", &fmt_count(records.len()));
        widgets::metric_tile(&mut cols[1], "Unique Job Titles", &fmt_count(titles.len()));
        widgets::metric_tile(&mut cols[2], "Years Covered", &year_range);
        widgets::metric_tile(&mut cols[3], "Countries", &fmt_count(countries.len()));
    });
}

fn salary_trend(ui: &mut Ui, state: &AppState) {
    ui.strong("Salary Trend Over Years");
    ui.label(
        RichText::new("Average and median salary per work year across the selected records.")
            .weak(),
    );

    let year_points = |by_year: std::collections::BTreeMap<String, f64>| -> PlotPoints {
        by_year
            .iter()
            .filter_map(|(year, value)| year.parse::<f64>().ok().map(|y| [y, *value]))
            .collect()
    };
    let means = year_points(aggregate::group_mean(
        state.visible_records(),
        GroupKey::WorkYear,
    ));
    let medians = year_points(aggregate::group_median(
        state.visible_records(),
        GroupKey::WorkYear,
    ));

    Plot::new("salary_trend")
        .height(240.0)
        .legend(Legend::default())
        .x_axis_label("Year")
        .y_axis_label("Salary (USD)")
        .allow_drag(false)
        .allow_scroll(false)
        .allow_zoom(false)
        .allow_boxed_zoom(false)
        .show(ui, |plot_ui| {
            plot_ui.line(Line::new(means).name("Average salary").width(2.0));
            plot_ui.line(Line::new(medians).name("Median salary").width(2.0));
        });
}

fn top_titles(ui: &mut Ui, state: &AppState) {
    ui.strong("Top 5 Most Common Job Titles");

    let top = aggregate::top_n(state.visible_records(), GroupKey::JobTitle, Metric::Count, 5);
    let labels: Vec<String> = top.iter().map(|s| s.key.clone()).collect();
    let colors = ColorMap::new(&labels);

    let entries: Vec<CategoryBar> = top
        .iter()
        .map(|s| CategoryBar {
            label: s.key.clone(),
            value: s.count as f64,
            color: colors.color_for(&s.key),
        })
        .collect();

    widgets::category_bars(ui, "top_titles", &entries, "Count", 260.0, |v| {
        fmt_count(v as usize)
    });
}

fn experience_distribution(ui: &mut Ui, state: &AppState) {
    use crate::data::model::ExperienceLevel;

    ui.strong("Experience Level Distribution");

    let counts = aggregate::group_count(state.visible_records(), GroupKey::Experience);
    let labels: Vec<String> = ExperienceLevel::ALL
        .iter()
        .map(|l| l.label().to_string())
        .collect();
    let colors = ColorMap::new(&labels);

    let entries: Vec<CategoryBar> = labels
        .iter()
        .map(|label| CategoryBar {
            label: label.clone(),
            value: counts.get(label).copied().unwrap_or(0) as f64,
            color: colors.color_for(label),
        })
        .collect();

    widgets::category_bars(ui, "experience_dist", &entries, "Count", 260.0, |v| {
        fmt_count(v as usize)
    });
}

fn sample_table(ui: &mut Ui, state: &mut AppState) {
    ui.strong("Sample Data");
    ui.horizontal(|ui: &mut Ui| {
        ui.label("Search job title:");
        ui.text_edit_singleline(&mut state.overview.sample_search);
    });
    ui.add_space(4.0);

    let matches = aggregate::search_records(
        state.visible_records(),
        GroupKey::JobTitle,
        &state.overview.sample_search,
    );
    let sample: Vec<_> = matches.into_iter().take(10).collect();

    TableBuilder::new(ui)
        .striped(true)
        .column(Column::auto())
        .column(Column::remainder())
        .column(Column::auto())
        .column(Column::auto())
        .column(Column::auto())
        .column(Column::auto())
        .column(Column::auto())
        .column(Column::auto())
        .header(20.0, |mut header| {
            for title in [
                "Year",
                "Job Title",
                "Experience",
                "Employment",
                "Salary (USD)",
                "Residence",
                "Company",
                "Remote",
            ] {
                header.col(|ui| {
                    ui.strong(title);
                });
            }
        })
        .body(|mut body| {
            for record in sample {
                body.row(18.0, |mut row| {
                    row.col(|ui| {
                        ui.label(record.work_year.to_string());
                    });
                    row.col(|ui| {
                        ui.label(&record.job_title);
                    });
                    row.col(|ui| {
                        ui.label(record.experience.label());
                    });
                    row.col(|ui| {
                        ui.label(record.employment.label());
                    });
                    row.col(|ui| {
                        ui.label(
                            record
                                .salary_in_usd
                                .map(fmt_usd)
                                .unwrap_or_else(|| "n/a".to_string()),
                        );
                    });
                    row.col(|ui| {
                        ui.label(&record.employee_residence);
                    });
                    row.col(|ui| {
                        ui.label(&record.company_location);
                    });
                    row.col(|ui| {
                        ui.label(record.remote_mode.label());
                    });
                });
            }
        });
}
