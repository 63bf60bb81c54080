use eframe::egui;
use egui_plot::{Line, Plot, PlotPoints};

use crate::analysis::vix;
use crate::app::{AppState, Page};
use crate::ui::chart_utils::{date_to_x, format_date_x, height_control, metric_card};

pub fn render(ui: &mut egui::Ui, state: &mut AppState) {
    ui.heading("CBOE Volatility Index (VIX)");
    ui.label(
        "The VIX measures the market's expectation of 30-day volatility as implied by \
         S&P 500 option prices. Data source: FRED.",
    );
    ui.add_space(8.0);

    let Some(series) = &state.vix.series else {
        if state.is_loading(Page::Vix) {
            ui.label("Fetching VIX history...");
        } else {
            ui.label("No VIX data loaded. Click 'Refresh Data' to fetch it.");
        }
        return;
    };

    let Some(latest) = state.vix.latest else {
        ui.label("No VIX data available.");
        return;
    };

    let points: PlotPoints = series
        .iter()
        .map(|r| [date_to_x(r.date), r.level])
        .collect();

    height_control(ui, &mut state.chart_heights.vix_history, "VIX Chart Height");
    Plot::new("vix_history")
        .height(state.chart_heights.vix_history)
        .allow_drag(true)
        .allow_zoom(true)
        .x_axis_formatter(|mark, _range| format_date_x(mark.value))
        .label_formatter(|_name, value| format!("{}\n{:.2}", format_date_x(value.x), value.y))
        .y_axis_label("VIX Level")
        .show(ui, |plot_ui| {
            plot_ui.line(
                Line::new(points)
                    .name("VIXCLS")
                    .color(egui::Color32::from_rgb(255, 150, 50)),
            );
        });

    ui.add_space(8.0);
    ui.horizontal(|ui| {
        metric_card(
            ui,
            &format!("Latest VIX (as of {})", latest.date),
            &format!("{:.2}", latest.level),
        );
        if let Some((low, high)) = vix::level_range(series) {
            metric_card(ui, &format!("Low ({})", low.date), &format!("{:.2}", low.level));
            metric_card(ui, &format!("High ({})", high.date), &format!("{:.2}", high.level));
        }
    });
}
