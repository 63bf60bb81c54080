use eframe::egui;
use egui_plot::{Line, Plot, PlotPoints};

use crate::analysis::deviation::DeviationRule;
use crate::app::{AppState, Page, UiEvent};
use crate::config;
use crate::ui::chart_utils::{date_to_x, format_date_x, height_control};

/// Sidebar for managing the watchlist
pub fn render_sidebar(ui: &mut egui::Ui, state: &mut AppState) {
    ui.heading("Manage Tickers");
    ui.add_space(8.0);

    ui.label("Add ticker symbol");
    let response = ui.text_edit_singleline(&mut state.movers.add_input);
    let submitted = response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
    if (ui.button("Add").clicked() || submitted) && !state.movers.add_input.trim().is_empty() {
        state
            .events
            .push(UiEvent::AddTicker(state.movers.add_input.clone()));
    }

    if let Some(warning) = &state.movers.warning {
        ui.colored_label(egui::Color32::from_rgb(220, 150, 50), warning);
    }

    ui.add_space(12.0);

    let symbols = state.movers.watchlist.symbols().to_vec();
    if symbols.is_empty() {
        return;
    }

    // Selection is always one of the listed tickers
    let selected = state
        .movers
        .remove_selection
        .clone()
        .filter(|s| symbols.contains(s))
        .unwrap_or_else(|| symbols[0].clone());

    ui.label("Remove ticker");
    let mut choice = selected.clone();
    egui::ComboBox::from_id_salt("remove_ticker")
        .selected_text(&choice)
        .show_ui(ui, |ui| {
            for sym in &symbols {
                ui.selectable_value(&mut choice, sym.clone(), sym);
            }
        });
    state.movers.remove_selection = Some(choice.clone());

    if ui.button("Remove").clicked() {
        state.events.push(UiEvent::RemoveTicker(choice));
    }

    ui.add_space(12.0);
    ui.separator();
    ui.small(format!(
        "{} / {} tickers",
        state.movers.watchlist.len(),
        config::MAX_TICKERS
    ));
}

pub fn render(ui: &mut egui::Ui, state: &mut AppState) {
    ui.heading("Financial Trend Deviation Monitor");
    ui.add_space(8.0);

    ui.horizontal_wrapped(|ui| {
        ui.strong("Current tickers:");
        ui.label(state.movers.watchlist.symbols().join(", "));
    });

    ui.add_space(4.0);
    ui.horizontal(|ui| {
        ui.label("Off-trend rule:");
        let mut rule = state.movers.rule;
        for r in DeviationRule::ALL {
            ui.selectable_value(&mut rule, r, r.label())
                .on_hover_text(r.description());
        }
        if rule != state.movers.rule {
            state.events.push(UiEvent::SetDeviationRule(rule));
        }
    });
    ui.small(format!(
        "Last {} days compared with the trailing {} days, threshold {:.0} std",
        config::RECENT_DAYS,
        config::HISTORY_DAYS,
        config::DEVIATION_MULTIPLIER
    ));

    ui.add_space(8.0);
    ui.separator();
    ui.add_space(8.0);

    let Some(scan) = state.movers.scan.clone() else {
        if state.is_loading(Page::BigMovers) {
            ui.label("Fetching price history...");
        } else {
            ui.label("No data loaded. Click 'Refresh Data' to fetch price history.");
        }
        return;
    };

    let flagged: Vec<_> = scan.flagged().collect();
    if flagged.is_empty() {
        ui.label("No tickers are off trend based on the last two weeks of trading.");
    } else {
        ui.heading("Tickers Off Trend");
        ui.add_space(4.0);
        height_control(ui, &mut state.chart_heights.mover_price, "Price Chart Height");

        for report in flagged {
            ui.add_space(8.0);
            ui.strong(&report.symbol);
            if let (Some(m), Some(s), Some(dev)) =
                (report.baseline_mean, report.baseline_std, report.max_recent_deviation)
            {
                ui.small(format!(
                    "Baseline mean {:.3}% | std {:.3}% | \
                     largest recent move {:.1} std | recent mean {:.3}%",
                    m * 100.0,
                    s * 100.0,
                    if s > 0.0 { dev / s } else { 0.0 },
                    report.recent_mean.unwrap_or(0.0) * 100.0
                ));
            }

            let prices: PlotPoints = report
                .recent
                .iter()
                .map(|p| [date_to_x(p.date), p.close])
                .collect();

            Plot::new(format!("mover_plot_{}", report.symbol))
                .height(state.chart_heights.mover_price)
                .allow_drag(true)
                .allow_scroll(false)
                .allow_zoom(false)
                .x_axis_formatter(|mark, _range| format_date_x(mark.value))
                .label_formatter(|_name, value| {
                    format!("{}\n${:.2}", format_date_x(value.x), value.y)
                })
                .y_axis_label("Close ($)")
                .show(ui, |plot_ui| {
                    plot_ui.line(
                        Line::new(prices)
                            .name(&report.symbol)
                            .color(egui::Color32::from_rgb(255, 100, 100)),
                    );
                });
        }
    }

    if !scan.no_data.is_empty() {
        ui.add_space(8.0);
        ui.colored_label(
            egui::Color32::from_gray(150),
            format!("No data available for: {}", scan.no_data.join(", ")),
        );
    }

    // Per-ticker summary
    ui.add_space(12.0);
    ui.collapsing("All evaluated tickers", |ui| {
        egui::Grid::new("mover_summary")
            .striped(true)
            .min_col_width(90.0)
            .show(ui, |ui| {
                ui.strong("Symbol");
                ui.strong("Last Close");
                ui.strong("Recent Mean");
                ui.strong("Baseline Std");
                ui.strong("Status");
                ui.end_row();

                for report in &scan.reports {
                    ui.label(&report.symbol);
                    match report.recent.last() {
                        Some(p) => ui.label(format!("${:.2}", p.close)),
                        None => ui.label("-"),
                    };
                    match report.recent_mean {
                        Some(m) => ui.label(format!("{:.3}%", m * 100.0)),
                        None => ui.label("-"),
                    };
                    match report.baseline_std {
                        Some(s) => ui.label(format!("{:.3}%", s * 100.0)),
                        None => ui.label("-"),
                    };
                    if report.flagged {
                        ui.colored_label(egui::Color32::from_rgb(220, 50, 50), "OFF TREND");
                    } else {
                        ui.colored_label(egui::Color32::from_rgb(50, 180, 50), "Normal");
                    }
                    ui.end_row();
                }
            });
    });
}
