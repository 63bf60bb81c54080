use chrono::Duration;
use eframe::egui;
use egui_plot::{Line, Plot, PlotPoints, Points};

use crate::app::{AppState, Page, UiEvent};
use crate::ui::chart_utils::{height_control, metric_card};

pub fn render(ui: &mut egui::Ui, state: &mut AppState) {
    ui.heading("US Treasury Yield Curve");
    ui.label("Select a date to see the yield curve across maturities. Data source: FRED.");
    ui.add_space(8.0);

    let Some(table) = &state.treasury.table else {
        if state.is_loading(Page::TreasuryCurve) {
            ui.label("Fetching treasury yields...");
        } else {
            ui.label("No treasury yield data loaded. Click 'Refresh Data' to fetch it.");
        }
        return;
    };

    let (Some(first), Some(last)) = (table.first_date(), table.last_date()) else {
        ui.label("No treasury yield data available.");
        return;
    };

    // Date slider over calendar days; the lookup snaps back to the prior trading day
    let selected = state.treasury.selected_date.unwrap_or(last);
    let span = (last - first).num_days();
    let mut offset = (selected - first).num_days().clamp(0, span);
    ui.horizontal(|ui| {
        ui.label("Select date");
        let slider = egui::Slider::new(&mut offset, 0..=span)
            .show_value(false)
            .step_by(1.0);
        if ui.add(slider).changed() {
            state
                .events
                .push(UiEvent::SelectCurveDate(first + Duration::days(offset)));
        }
        ui.strong((first + Duration::days(offset)).format("%Y-%m-%d").to_string());
        if ui.small_button("Latest").clicked() {
            state.events.push(UiEvent::SelectCurveDate(last));
        }
    });

    ui.add_space(8.0);

    let Some(curve) = state.treasury.curve.clone() else {
        ui.label("No curve for the selected date.");
        return;
    };

    ui.horizontal(|ui| {
        metric_card(ui, "Curve Date", &curve.date.format("%Y-%m-%d").to_string());
        if let Some(spread) = curve.spread_10y_2y() {
            metric_card(ui, "10Y-2Y Spread", &format!("{:.2} pp", spread));
        }
        if let (Some(short), Some(long)) = (curve.points.first(), curve.points.last()) {
            metric_card(
                ui,
                &format!("{} / {}", short.label, long.label),
                &format!("{:.2}% / {:.2}%", short.yield_pct, long.yield_pct),
            );
        }
    });
    if curve.date != curve.requested {
        ui.small(format!(
            "No observation on {}; showing the prior available date {}",
            curve.requested, curve.date
        ));
    }
    if curve.is_inverted() {
        ui.colored_label(
            egui::Color32::from_rgb(220, 50, 50),
            "Yield curve is INVERTED (10Y below 2Y)",
        );
    }

    ui.add_space(8.0);

    let line: PlotPoints = curve.points.iter().map(|p| [p.years, p.yield_pct]).collect();
    let markers: PlotPoints = curve.points.iter().map(|p| [p.years, p.yield_pct]).collect();

    height_control(ui, &mut state.chart_heights.yield_curve, "Yield Curve Chart Height");
    Plot::new("yield_curve")
        .height(state.chart_heights.yield_curve)
        .allow_drag(true)
        .allow_zoom(true)
        .x_axis_label("Maturity (years)")
        .y_axis_label("Yield (%)")
        .label_formatter(|_name, value| format!("{:.2}y\n{:.2}%", value.x, value.y))
        .show(ui, |plot_ui| {
            plot_ui.line(
                Line::new(line)
                    .name(format!("Yield Curve {}", curve.date))
                    .color(egui::Color32::from_rgb(70, 130, 220)),
            );
            plot_ui.points(
                Points::new(markers)
                    .radius(3.0)
                    .color(egui::Color32::from_rgb(70, 130, 220)),
            );
        });

    // Show maturity labels
    ui.horizontal_wrapped(|ui| {
        for p in &curve.points {
            ui.label(format!("{} = {:.2}%", p.label, p.yield_pct));
        }
    });
}
