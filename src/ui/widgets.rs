use eframe::egui::{self, RichText, Ui};
use egui_plot::{Bar, BarChart, GridMark, Plot};

use crate::color::{contrast_text, sequential_color};
use crate::data::aggregate::PivotTable;

// ---------------------------------------------------------------------------
// Number formatting
// ---------------------------------------------------------------------------

fn thousands(n: i64) -> String {
    let digits = n.abs().to_string();
    let mut out = String::new();
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    if n < 0 {
        format!("-{out}")
    } else {
        out
    }
}

/// `1234567.8` → `"$1,234,568"`.
pub fn fmt_usd(value: f64) -> String {
    format!("${}", thousands(value.round() as i64))
}

/// `163_400.0` → `"$163k"`.
pub fn fmt_usd_k(value: f64) -> String {
    format!("${}k", (value / 1000.0).round() as i64)
}

/// `6234` → `"6,234"`.
pub fn fmt_count(n: usize) -> String {
    thousands(n as i64)
}

/// Shorten long category labels for axis ticks.
pub fn short_label(label: &str, max: usize) -> String {
    if label.chars().count() <= max {
        label.to_string()
    } else {
        let head: String = label.chars().take(max.saturating_sub(2)).collect();
        format!("{head}..")
    }
}

// ---------------------------------------------------------------------------
// Metric tiles
// ---------------------------------------------------------------------------

/// A small "big number over caption" tile for the overview header row.
pub fn metric_tile(ui: &mut Ui, label: &str, value: &str) {
    ui.vertical_centered(|ui: &mut Ui| {
        ui.label(RichText::new(value).size(22.0).strong());
        ui.label(RichText::new(label).weak());
    });
}

// ---------------------------------------------------------------------------
// Categorical bar charts
// ---------------------------------------------------------------------------

/// One bar of a categorical chart.
pub struct CategoryBar {
    pub label: String,
    pub value: f64,
    pub color: egui::Color32,
}

/// Vertical bar chart with one bar per category; labels become x-axis ticks.
pub fn category_bars(
    ui: &mut Ui,
    id: &str,
    entries: &[CategoryBar],
    y_label: &str,
    height: f32,
    fmt: fn(f64) -> String,
) {
    let bars: Vec<Bar> = entries
        .iter()
        .enumerate()
        .map(|(i, e)| {
            Bar::new(i as f64, e.value)
                .width(0.6)
                .fill(e.color)
                .name(format!("{}: {}", e.label, fmt(e.value)))
        })
        .collect();

    let labels: Vec<String> = entries
        .iter()
        .map(|e| short_label(&e.label, 16))
        .collect();

    Plot::new(id.to_string())
        .height(height)
        .y_axis_label(y_label)
        .allow_drag(false)
        .allow_scroll(false)
        .allow_zoom(false)
        .allow_boxed_zoom(false)
        .x_axis_formatter(move |mark: GridMark, _range: &std::ops::RangeInclusive<f64>| {
            index_label(mark.value, &labels)
        })
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars));
        });
}

/// Horizontal bar chart, largest on top, colored by a sequential ramp.
pub fn ranked_hbars(
    ui: &mut Ui,
    id: &str,
    entries: &[(String, f64)],
    x_label: &str,
    height: f32,
    fmt: fn(f64) -> String,
) {
    let max = entries
        .iter()
        .map(|(_, v)| *v)
        .fold(f64::NEG_INFINITY, f64::max);
    let n = entries.len();

    let bars: Vec<Bar> = entries
        .iter()
        .enumerate()
        .map(|(i, (label, value))| {
            let t = if max > 0.0 { (value / max) as f32 } else { 0.0 };
            Bar::new((n - 1 - i) as f64, *value)
                .width(0.6)
                .fill(sequential_color(t))
                .name(format!("{label}: {}", fmt(*value)))
        })
        .collect();

    // y tick i maps to entry n-1-i (descending order, top first)
    let labels: Vec<String> = entries
        .iter()
        .rev()
        .map(|(label, _)| short_label(label, 26))
        .collect();

    Plot::new(id.to_string())
        .height(height)
        .x_axis_label(x_label)
        .allow_drag(false)
        .allow_scroll(false)
        .allow_zoom(false)
        .allow_boxed_zoom(false)
        .y_axis_formatter(move |mark: GridMark, _range: &std::ops::RangeInclusive<f64>| {
            index_label(mark.value, &labels)
        })
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).horizontal());
        });
}

/// Label for integer axis positions, empty elsewhere.
fn index_label(value: f64, labels: &[String]) -> String {
    let rounded = value.round();
    if (value - rounded).abs() > 0.05 || rounded < 0.0 {
        return String::new();
    }
    labels
        .get(rounded as usize)
        .cloned()
        .unwrap_or_default()
}

// ---------------------------------------------------------------------------
// Pivot heatmap
// ---------------------------------------------------------------------------

/// Painted cross-tabulation: one colored cell per (row, col) combination.
/// Combinations absent from the data render as "n/a", never as zero.
pub fn heatmap(
    ui: &mut Ui,
    id: &str,
    table: &PivotTable,
    rows: &[&str],
    cols: &[&str],
    fmt: fn(f64) -> String,
) {
    let Some((min, max)) = table.value_range() else {
        ui.label("No data for the current selection.");
        return;
    };
    let span = (max - min).max(f64::EPSILON);

    egui::Grid::new(id.to_string())
        .spacing([6.0, 6.0])
        .show(ui, |ui: &mut Ui| {
            ui.label("");
            for col in cols {
                ui.strong(*col);
            }
            ui.end_row();

            for row in rows {
                ui.strong(*row);
                for col in cols {
                    match table.value(row, col) {
                        Some(v) => {
                            let t = ((v - min) / span) as f32;
                            egui::Frame::default()
                                .fill(sequential_color(t))
                                .inner_margin(egui::Margin::symmetric(10, 6))
                                .show(ui, |ui: &mut Ui| {
                                    ui.label(RichText::new(fmt(v)).color(contrast_text(t)));
                                });
                        }
                        None => {
                            ui.label(RichText::new("n/a").weak());
                        }
                    }
                }
                ui.end_row();
            }
        });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn usd_formatting_groups_thousands() {
        assert_eq!(fmt_usd(1_234_567.8), "$1,234,568");
        assert_eq!(fmt_usd(0.0), "$0");
        assert_eq!(fmt_usd(999.0), "$999");
        assert_eq!(fmt_usd_k(163_400.0), "$163k");
        assert_eq!(fmt_count(6234), "6,234");
    }

    #[test]
    fn short_labels_are_truncated() {
        assert_eq!(short_label("Security", 16), "Security");
        assert_eq!(short_label("Data Science Tech Lead", 10), "Data Sci..");
    }

    #[test]
    fn index_labels_only_on_integer_ticks() {
        let labels = vec!["a".to_string(), "b".to_string()];
        assert_eq!(index_label(0.0, &labels), "a");
        assert_eq!(index_label(1.0, &labels), "b");
        assert_eq!(index_label(0.5, &labels), "");
        assert_eq!(index_label(5.0, &labels), "");
        assert_eq!(index_label(-1.0, &labels), "");
    }
}
