//! Shared chart utilities for all UI views that render plots.

use chrono::{Duration, NaiveDate};
use eframe::egui;

/// Inline height-adjustment drag control placed immediately above a chart.
pub fn height_control(ui: &mut egui::Ui, height: &mut f32, label: &str) {
    egui::Frame::none()
        .fill(egui::Color32::from_rgba_unmultiplied(80, 120, 200, 18))
        .inner_margin(egui::Margin::symmetric(8.0, 3.0))
        .rounding(egui::Rounding::same(4.0))
        .show(ui, |ui| {
            ui.horizontal(|ui| {
                ui.colored_label(egui::Color32::from_rgb(100, 160, 255), "⇕");
                ui.colored_label(egui::Color32::from_gray(170), label);
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    ui.add(
                        egui::DragValue::new(height)
                            .speed(2.0)
                            .range(80.0..=800.0)
                            .suffix(" px"),
                    );
                    ui.colored_label(egui::Color32::from_gray(130), "drag to resize ·");
                });
            });
        });
    ui.add_space(2.0);
}

/// Small framed label/value pair
pub fn metric_card(ui: &mut egui::Ui, label: &str, value: &str) {
    egui::Frame::group(ui.style())
        .inner_margin(egui::Margin::same(8.0))
        .show(ui, |ui| {
            ui.vertical(|ui| {
                ui.small(label);
                ui.strong(value);
            });
        });
}

fn epoch() -> NaiveDate {
    NaiveDate::from_ymd_opt(1970, 1, 1).unwrap_or_default()
}

/// Plot x coordinate for a date (days since 1970-01-01)
pub fn date_to_x(date: NaiveDate) -> f64 {
    (date - epoch()).num_days() as f64
}

/// Plot bounds far outside chrono's range map to no date
const MAX_DAY_OFFSET: f64 = 50_000_000.0;

pub fn x_to_date(x: f64) -> Option<NaiveDate> {
    if !x.is_finite() || x.abs() > MAX_DAY_OFFSET {
        return None;
    }
    epoch().checked_add_signed(Duration::days(x.round() as i64))
}

/// Axis/tooltip label for a date coordinate
pub fn format_date_x(x: f64) -> String {
    x_to_date(x)
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}
