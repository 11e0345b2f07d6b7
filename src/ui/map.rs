use eframe::egui::{self, RichText, ScrollArea, Ui};
use egui_extras::{Column, TableBuilder};

use crate::data::aggregate::{self, LocationField};
use crate::geo::{self, MapMetric, Region};
use crate::state::AppState;
use crate::ui::widgets::{self, fmt_count, fmt_usd};

/// Geographic page: per-country aggregates plus a drill-down summary.
///
/// Aggregates run over the full record set; countries whose code does not
/// resolve are excluded from this page only.
pub fn show(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Global Cybersecurity Workforce & Salary Distribution");
    ui.label(
        "Explore how cybersecurity talent and salaries are spread across the \
         world: employee residence, company location, and regional salary \
         differences.",
    );
    ui.add_space(6.0);

    ui.horizontal(|ui: &mut Ui| {
        ui.strong("Metric:");
        for metric in [
            MapMetric::MeanSalaryByCompanyLocation,
            MapMetric::EmployeeCountByResidence,
        ] {
            ui.radio_value(&mut state.map.metric, metric, metric.label());
        }
    });

    ui.horizontal(|ui: &mut Ui| {
        ui.strong("Map scope:");
        for region in Region::ALL {
            ui.radio_value(&mut state.map.region, region, region.code())
                .on_hover_text(region.label());
        }
    });
    ui.separator();

    let rows = geo::map_rows(
        &state.dataset.records,
        state.map.metric,
        Some(state.map.region),
    );

    if rows.is_empty() {
        ui.label("No data for this region.");
        return;
    }

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            let x_label = match state.map.metric {
                MapMetric::MeanSalaryByCompanyLocation => "Average Salary (USD)",
                MapMetric::EmployeeCountByResidence => "Number of Employees",
            };
            let entries: Vec<(String, f64)> = rows
                .iter()
                .take(20)
                .map(|r| (r.name.to_string(), r.value))
                .collect();
            let fmt: fn(f64) -> String = match state.map.metric {
                MapMetric::MeanSalaryByCompanyLocation => fmt_usd,
                MapMetric::EmployeeCountByResidence => |v: f64| widgets::fmt_count(v as usize),
            };
            widgets::ranked_hbars(ui, "country_ranking", &entries, x_label, 420.0, fmt);

            ui.add_space(8.0);
            country_selection(ui, state, &rows);

            ui.add_space(8.0);
            ui.label(RichText::new(
                "Note: this dataset is based on publicly available and \
                 user-submitted data; distributions may not fully represent \
                 real-world global conditions.",
            )
            .weak());
        });
}

fn country_selection(ui: &mut Ui, state: &mut AppState, rows: &[geo::MapRow]) {
    ui.strong("Country Selection");

    // keep the selection valid for the current region/metric
    if !state
        .map
        .selected_country
        .as_ref()
        .is_some_and(|code| rows.iter().any(|r| &r.alpha2 == code))
    {
        state.map.selected_country = rows.first().map(|r| r.alpha2.clone());
    }
    let Some(selected) = state.map.selected_country.clone() else {
        return;
    };
    let selected_name = rows
        .iter()
        .find(|r| r.alpha2 == selected)
        .map(|r| r.name)
        .unwrap_or("Unknown");

    egui::ComboBox::from_id_salt("country_selection")
        .selected_text(selected_name)
        .show_ui(ui, |ui: &mut Ui| {
            let mut sorted: Vec<&geo::MapRow> = rows.iter().collect();
            sorted.sort_by_key(|r| r.name);
            for row in sorted {
                if ui
                    .selectable_label(
                        state.map.selected_country.as_deref() == Some(row.alpha2.as_str()),
                        row.name,
                    )
                    .clicked()
                {
                    state.map.selected_country = Some(row.alpha2.clone());
                }
            }
        });

    let field = state.map.metric.location_field();
    let summary = aggregate::country_summary(&state.dataset.records, &selected, field);

    ui.add_space(4.0);
    ui.strong(format!("Overview for {selected_name}"));
    summary_table(ui, &selected, &summary, field);
}

fn summary_table(
    ui: &mut Ui,
    alpha2: &str,
    summary: &aggregate::CountrySummary,
    field: LocationField,
) {
    let fmt_opt_usd =
        |v: Option<f64>| v.map(fmt_usd).unwrap_or_else(|| "n/a".to_string());
    let fmt_opt_str =
        |v: &Option<String>| v.clone().unwrap_or_else(|| "n/a".to_string());

    let mut rows: Vec<(String, String)> = vec![
        (
            "ISO alpha-3 code".to_string(),
            geo::code_to_alpha3(alpha2).unwrap_or("n/a").to_string(),
        ),
        (
            match field {
                LocationField::CompanyLocation => "Total records".to_string(),
                LocationField::EmployeeResidence => "Total records (residence)".to_string(),
            },
            fmt_count(summary.records),
        ),
        ("Average salary (USD)".to_string(), fmt_opt_usd(summary.mean_salary)),
    ];
    if field == LocationField::CompanyLocation {
        rows.push((
            "Median salary (USD)".to_string(),
            fmt_opt_usd(summary.median_salary),
        ));
        rows.push((
            "Highest-paying role".to_string(),
            fmt_opt_str(&summary.top_paid_title),
        ));
    }
    rows.push((
        "Most common job title".to_string(),
        fmt_opt_str(&summary.common_title),
    ));
    rows.push((
        "Most common experience level".to_string(),
        summary
            .common_experience
            .map(|l| l.label().to_string())
            .unwrap_or_else(|| "n/a".to_string()),
    ));

    TableBuilder::new(ui)
        .striped(true)
        .column(Column::auto())
        .column(Column::remainder())
        .header(20.0, |mut header| {
            header.col(|ui| {
                ui.strong("Metric");
            });
            header.col(|ui| {
                ui.strong("Value");
            });
        })
        .body(|mut body| {
            for (metric, value) in rows {
                body.row(18.0, |mut row| {
                    row.col(|ui| {
                        ui.label(metric);
                    });
                    row.col(|ui| {
                        ui.label(value);
                    });
                });
            }
        });
}
