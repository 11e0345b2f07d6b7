use eframe::egui::{RichText, ScrollArea, Ui};
use egui_plot::{BoxElem, BoxPlot, BoxSpread, GridMark, Plot};
use egui_extras::{Column, TableBuilder};

use crate::data::aggregate::{self, Aggregate, GroupKey, GroupStats, Metric};
use crate::state::{AppState, CompareBy, DescriptiveTab};
use crate::ui::widgets::{self, fmt_count, fmt_usd, short_label};

/// Descriptive-statistics page with one tab per view.
pub fn show(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Salary Descriptive: Cybersecurity Job Market Insights");
    ui.label(
        "Explore salary patterns, job distribution, and structural insights \
         in the cybersecurity industry.",
    );
    ui.add_space(6.0);

    ui.horizontal(|ui: &mut Ui| {
        for tab in DescriptiveTab::ALL {
            ui.selectable_value(&mut state.descriptive.tab, tab, tab.label());
        }
    });
    ui.separator();

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| match state.descriptive.tab {
            DescriptiveTab::TopSalaries => top_salaries(ui, state),
            DescriptiveTab::Distribution => distribution(ui, state),
            DescriptiveTab::Heatmap => size_experience_heatmap(ui, state),
            DescriptiveTab::Comparison => comparison(ui, state),
            DescriptiveTab::JobExplorer => job_explorer(ui, state),
        });
}

// ---------------------------------------------------------------------------
// Tab 1: highest average salary by profession
// ---------------------------------------------------------------------------

fn top_salaries(ui: &mut Ui, state: &mut AppState) {
    ui.strong("Highest Salary by Profession (Top 15)");
    ui.label(RichText::new("Bar shade intensity represents the salary level.").weak());

    ui.horizontal(|ui: &mut Ui| {
        ui.label("Rank by:");
        ui.selectable_value(
            &mut state.descriptive.top_metric,
            Metric::MeanSalary,
            "Average",
        );
        ui.selectable_value(
            &mut state.descriptive.top_metric,
            Metric::MedianSalary,
            "Median",
        );
    });
    ui.add_space(4.0);

    let metric = state.descriptive.top_metric;
    let top = aggregate::top_n(state.visible_records(), GroupKey::JobTitle, metric, 15);
    let entries: Vec<(String, f64)> = top
        .iter()
        .filter_map(|s| {
            let value = match metric {
                Metric::MedianSalary => s.median,
                _ => s.mean,
            };
            value.map(|v| (s.key.clone(), v))
        })
        .collect();
    let x_label = match metric {
        Metric::MedianSalary => "Median Salary (USD)",
        _ => "Average Salary (USD)",
    };

    widgets::ranked_hbars(ui, "top_salaries", &entries, x_label, 480.0, fmt_usd);

    ui.add_space(10.0);
    ui.strong("Explore the Top 15 Highest Paying Roles");
    ui.horizontal(|ui: &mut Ui| {
        ui.label("Search job title:");
        ui.text_edit_singleline(&mut state.descriptive.top_search);
    });

    let filtered = aggregate::filter_groups(&top, &state.descriptive.top_search);
    stats_table(ui, "top_salaries_table", &filtered, false);
}

// ---------------------------------------------------------------------------
// Tab 2: salary distribution for the most common roles
// ---------------------------------------------------------------------------

fn distribution(ui: &mut Ui, state: &AppState) {
    ui.strong("Salary Distribution by Top 10 Roles");
    ui.label(RichText::new("Box = quartiles, whiskers = observed range.").weak());
    ui.add_space(4.0);

    let top = aggregate::top_n(state.visible_records(), GroupKey::JobTitle, Metric::Count, 10);

    let mut boxes = Vec::new();
    let mut labels = Vec::new();
    for (i, stats) in top.iter().enumerate() {
        let salaries: Vec<f64> = state
            .visible_records()
            .filter(|r| r.job_title == stats.key)
            .filter_map(|r| r.salary_in_usd)
            .collect();
        let Some((q1, med, q3)) = aggregate::quartiles(&salaries) else {
            continue;
        };
        let min = salaries.iter().cloned().fold(f64::INFINITY, f64::min);
        let max = salaries.iter().cloned().fold(f64::NEG_INFINITY, f64::max);

        boxes.push(
            BoxElem::new(i as f64, BoxSpread::new(min, q1, med, q3, max))
                .name(&stats.key)
                .box_width(0.5),
        );
        labels.push(short_label(&stats.key, 14));
    }

    Plot::new("salary_distribution")
        .height(420.0)
        .y_axis_label("Salary (USD)")
        .allow_drag(false)
        .allow_scroll(false)
        .allow_zoom(false)
        .allow_boxed_zoom(false)
        .x_axis_formatter(move |mark: GridMark, _range: &std::ops::RangeInclusive<f64>| {
            let rounded = mark.value.round();
            if (mark.value - rounded).abs() > 0.05 || rounded < 0.0 {
                return String::new();
            }
            labels.get(rounded as usize).cloned().unwrap_or_default()
        })
        .show(ui, |plot_ui| {
            plot_ui.box_plot(BoxPlot::new(boxes));
        });

    ui.label(RichText::new(
        "Broad boxes indicate pay variation within a role; tight boxes indicate \
         stable market rates.",
    )
    .weak());
}

// ---------------------------------------------------------------------------
// Tab 3: company size × experience level heatmap
// ---------------------------------------------------------------------------

fn size_experience_heatmap(ui: &mut Ui, state: &mut AppState) {
    use crate::data::model::{CompanySize, ExperienceLevel};
    use crate::ui::widgets::fmt_usd_k;

    ui.strong("Salary Heatmap: Company Size × Experience Level");
    ui.label(RichText::new("Darker cells carry a higher value.").weak());

    ui.horizontal(|ui: &mut Ui| {
        ui.label("Cell value:");
        ui.selectable_value(&mut state.descriptive.heatmap_agg, Aggregate::Mean, "Average");
        ui.selectable_value(&mut state.descriptive.heatmap_agg, Aggregate::Median, "Median");
        ui.selectable_value(&mut state.descriptive.heatmap_agg, Aggregate::Count, "Records");
        ui.separator();
        ui.checkbox(&mut state.descriptive.heatmap_swapped, "Swap axes");
    });
    ui.add_space(6.0);

    let agg = state.descriptive.heatmap_agg;
    let table = aggregate::pivot(
        state.visible_records(),
        GroupKey::CompanySize,
        GroupKey::Experience,
        agg,
    );

    let fmt: fn(f64) -> String = match agg {
        Aggregate::Count => |v: f64| fmt_count(v as usize),
        _ => fmt_usd_k,
    };
    let sizes: Vec<&str> = CompanySize::ALL.iter().map(|s| s.label()).collect();
    let levels: Vec<&str> = ExperienceLevel::ALL.iter().map(|l| l.label()).collect();
    if state.descriptive.heatmap_swapped {
        let table = table.transpose();
        widgets::heatmap(ui, "size_experience_heatmap", &table, &levels, &sizes, fmt);
    } else {
        widgets::heatmap(ui, "size_experience_heatmap", &table, &sizes, &levels, fmt);
    }

    ui.add_space(6.0);
    ui.label(RichText::new(
        "Salaries rise with both experience and company size; the gap widens \
         with seniority.",
    )
    .weak());
}

// ---------------------------------------------------------------------------
// Tab 4: average salary by a selectable dimension
// ---------------------------------------------------------------------------

fn comparison(ui: &mut Ui, state: &mut AppState) {
    use crate::color::ColorMap;
    use crate::data::model::{EmploymentType, ExperienceLevel, RemoteMode};
    use crate::ui::widgets::CategoryBar;

    ui.strong("Custom Salary Comparison");
    ui.horizontal(|ui: &mut Ui| {
        ui.label("Compare average salary by:");
        eframe::egui::ComboBox::from_id_salt("compare_by")
            .selected_text(state.descriptive.compare_by.label())
            .show_ui(ui, |ui: &mut Ui| {
                for dim in CompareBy::ALL {
                    ui.selectable_value(&mut state.descriptive.compare_by, dim, dim.label());
                }
            });
    });
    ui.add_space(4.0);

    let key = state.descriptive.compare_by.group_key();
    let means = aggregate::group_mean(state.visible_records(), key);

    // canonical enum order, not alphabetical
    let ordered: Vec<String> = match state.descriptive.compare_by {
        CompareBy::RemoteMode => RemoteMode::ALL.iter().map(|v| v.label().to_string()).collect(),
        CompareBy::Experience => ExperienceLevel::ALL
            .iter()
            .map(|v| v.label().to_string())
            .collect(),
        CompareBy::Employment => EmploymentType::ALL
            .iter()
            .map(|v| v.label().to_string())
            .collect(),
    };
    let colors = ColorMap::new(&ordered);

    let entries: Vec<CategoryBar> = ordered
        .iter()
        .filter_map(|label| {
            means.get(label).map(|mean| CategoryBar {
                label: label.clone(),
                value: *mean,
                color: colors.color_for(label),
            })
        })
        .collect();

    if entries.is_empty() {
        ui.label("No data for the current selection.");
        return;
    }
    widgets::category_bars(ui, "comparison", &entries, "Average Salary (USD)", 320.0, fmt_usd);
}

// ---------------------------------------------------------------------------
// Tab 5: searchable per-title table over the whole selection
// ---------------------------------------------------------------------------

fn job_explorer(ui: &mut Ui, state: &mut AppState) {
    ui.strong("Explore All Cybersecurity Jobs & Salaries");
    ui.label(RichText::new(
        "Search for any role to see its salary statistics across the selected records.",
    )
    .weak());

    ui.horizontal(|ui: &mut Ui| {
        ui.label("Search by job title:");
        ui.text_edit_singleline(&mut state.descriptive.job_search);
    });
    ui.add_space(4.0);

    let stats = aggregate::group_stats(state.visible_records(), GroupKey::JobTitle);
    let filtered = aggregate::filter_groups(&stats, &state.descriptive.job_search);

    ui.label(format!(
        "{} of {} roles match",
        fmt_count(filtered.len()),
        fmt_count(stats.len())
    ));
    stats_table(ui, "job_explorer_table", &filtered, true);
}

// ---------------------------------------------------------------------------
// Shared stats table
// ---------------------------------------------------------------------------

fn stats_table(ui: &mut Ui, id: &str, stats: &[GroupStats], with_details: bool) {
    ui.push_id(id, |ui: &mut Ui| {
        let mut table = TableBuilder::new(ui)
            .striped(true)
            .column(Column::remainder())
            .column(Column::auto());
        if with_details {
            table = table.column(Column::auto()).column(Column::auto());
        }

        table
            .header(20.0, |mut header| {
                header.col(|ui| {
                    ui.strong("Job Title");
                });
                header.col(|ui| {
                    ui.strong("Avg Salary");
                });
                if with_details {
                    header.col(|ui| {
                        ui.strong("Median Salary");
                    });
                    header.col(|ui| {
                        ui.strong("Records");
                    });
                }
            })
            .body(|mut body| {
                for s in stats {
                    body.row(18.0, |mut row| {
                        row.col(|ui| {
                            ui.label(&s.key);
                        });
                        row.col(|ui| {
                            ui.label(
                                s.mean.map(fmt_usd).unwrap_or_else(|| "n/a".to_string()),
                            );
                        });
                        if with_details {
                            row.col(|ui| {
                                ui.label(
                                    s.median
                                        .map(fmt_usd)
                                        .unwrap_or_else(|| "n/a".to_string()),
                                );
                            });
                            row.col(|ui| {
                                ui.label(fmt_count(s.count));
                            });
                        }
                    });
                }
            });
    });
}
