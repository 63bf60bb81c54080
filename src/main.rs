mod analysis;
mod app;
mod config;
mod data;
mod ui;
mod watchlist;

use app::MarketPagesApp;

fn main() -> eframe::Result<()> {
    tracing_subscriber::fmt::init();

    let tokio_rt = tokio::runtime::Runtime::new().expect("Failed to create tokio runtime");
    let http = data::http_client().expect("Failed to build HTTP client");

    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size([800.0, 600.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Market Pages",
        options,
        Box::new(|_cc| Ok(Box::new(MarketPagesApp::new(tokio_rt, http)))),
    )
}
