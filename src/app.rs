use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex};

use chrono::NaiveDate;
use eframe::egui;

use crate::analysis::deviation::{self, DeviationParams, DeviationRule};
use crate::analysis::yield_curve::{self, YieldTable};
use crate::analysis::vix;
use crate::config::{self, Maturity};
use crate::data::cache::FetchCache;
use crate::data::loader::{self, SharedFetchCache};
use crate::data::models::{MoversScan, Observation, PriceHistory, VixReading, YieldCurveSnapshot};
use crate::ui;
use crate::watchlist::{AddOutcome, RemoveOutcome, Watchlist};

/// Active page in the main UI
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Page {
    BigMovers,
    TreasuryCurve,
    Vix,
}

impl Page {
    pub const ALL: [Page; 3] = [Page::BigMovers, Page::TreasuryCurve, Page::Vix];

    pub fn title(self) -> &'static str {
        match self {
            Page::BigMovers => "Big Movers",
            Page::TreasuryCurve => "Treasury Curve",
            Page::Vix => "VIX",
        }
    }
}

/// User interactions, applied in order after each frame
#[derive(Debug, Clone, PartialEq)]
pub enum UiEvent {
    PageOpened(Page),
    Refresh(Page),
    AddTicker(String),
    RemoveTicker(String),
    SetDeviationRule(DeviationRule),
    SelectCurveDate(NaiveDate),
}

/// Work the app must run off the UI thread
#[derive(Debug, Clone, PartialEq)]
pub enum FetchRequest {
    PriceHistories {
        symbols: Vec<String>,
        start: NaiveDate,
        end: NaiveDate,
        /// Drop memoized results for these symbols first
        invalidate: bool,
    },
    TreasurySeries {
        start: NaiveDate,
        end: NaiveDate,
        invalidate: bool,
    },
    VixSeries {
        start: NaiveDate,
        end: NaiveDate,
        invalidate: bool,
    },
}

impl FetchRequest {
    pub fn page(&self) -> Page {
        match self {
            FetchRequest::PriceHistories { .. } => Page::BigMovers,
            FetchRequest::TreasurySeries { .. } => Page::TreasuryCurve,
            FetchRequest::VixSeries { .. } => Page::Vix,
        }
    }
}

/// Data handed back by a finished fetch
#[derive(Debug, Clone)]
pub enum FetchResult {
    PriceHistories {
        as_of: NaiveDate,
        histories: Vec<PriceHistory>,
    },
    TreasurySeries(Vec<(Maturity, Vec<Observation>)>),
    VixSeries(Vec<VixReading>),
}

impl FetchResult {
    pub fn page(&self) -> Page {
        match self {
            FetchResult::PriceHistories { .. } => Page::BigMovers,
            FetchResult::TreasurySeries(_) => Page::TreasuryCurve,
            FetchResult::VixSeries(_) => Page::Vix,
        }
    }
}

/// Per-chart height overrides (pixels), adjustable by the user at runtime
#[derive(Debug, Clone)]
pub struct ChartHeights {
    pub mover_price: f32,
    pub yield_curve: f32,
    pub vix_history: f32,
}

impl Default for ChartHeights {
    fn default() -> Self {
        Self {
            mover_price: 200.0,
            yield_curve: 320.0,
            vix_history: 400.0,
        }
    }
}

/// Big Movers page state
#[derive(Debug, Clone, Default)]
pub struct MoversState {
    pub watchlist: Watchlist,
    /// Text typed into the "Add ticker" box
    pub add_input: String,
    /// Ticker currently picked in the "Remove ticker" dropdown
    pub remove_selection: Option<String>,
    pub warning: Option<String>,
    pub rule: DeviationRule,
    /// As-of date of the fetched histories
    pub as_of: Option<NaiveDate>,
    /// Latest as-of date of any price fetch issued, loaded or not
    pub requested_as_of: Option<NaiveDate>,
    pub histories: BTreeMap<String, PriceHistory>,
    pub scan: Option<MoversScan>,
}

/// Treasury Curve page state
#[derive(Debug, Clone, Default)]
pub struct TreasuryState {
    pub table: Option<YieldTable>,
    pub selected_date: Option<NaiveDate>,
    pub curve: Option<YieldCurveSnapshot>,
}

#[derive(Debug, Clone, Default)]
pub struct VixState {
    pub series: Option<Vec<VixReading>>,
    pub latest: Option<VixReading>,
}

/// Shared application state
pub struct AppState {
    pub active_page: Page,
    pub movers: MoversState,
    pub treasury: TreasuryState,
    pub vix: VixState,
    pub status_message: String,
    pub chart_heights: ChartHeights,
    /// Outstanding fetches per page
    pub in_flight: HashMap<Page, usize>,
    /// Events raised by the UI during the current frame
    pub events: Vec<UiEvent>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            active_page: Page::BigMovers,
            movers: MoversState::default(),
            treasury: TreasuryState::default(),
            vix: VixState::default(),
            status_message: "Ready.".to_string(),
            chart_heights: ChartHeights::default(),
            in_flight: HashMap::new(),
            events: Vec::new(),
        }
    }
}

impl AppState {
    pub fn is_loading(&self, page: Page) -> bool {
        self.in_flight.get(&page).copied().unwrap_or(0) > 0
    }

    pub fn any_loading(&self) -> bool {
        self.in_flight.values().any(|n| *n > 0)
    }

    fn is_loaded(&self, page: Page) -> bool {
        match page {
            Page::BigMovers => self.movers.as_of.is_some(),
            Page::TreasuryCurve => self.treasury.table.is_some(),
            Page::Vix => self.vix.series.is_some(),
        }
    }

    fn mover_params(&self) -> DeviationParams {
        DeviationParams::with_rule(self.movers.rule)
    }

    /// Apply one event and return the fetches it requires
    pub fn apply(&mut self, event: UiEvent, today: NaiveDate) -> Vec<FetchRequest> {
        let requests = match event {
            UiEvent::PageOpened(page) => {
                self.active_page = page;
                if self.is_loaded(page) || self.is_loading(page) {
                    vec![]
                } else {
                    vec![self.full_request(page, today, false)]
                }
            }
            UiEvent::Refresh(page) => vec![self.full_request(page, today, true)],
            UiEvent::AddTicker(raw) => self.add_ticker(&raw, today),
            UiEvent::RemoveTicker(symbol) => {
                if let RemoveOutcome::Removed(symbol) = self.movers.watchlist.remove(&symbol) {
                    tracing::info!("Removed ticker {}", symbol);
                    self.movers.histories.remove(&symbol);
                    self.movers.remove_selection = None;
                    self.movers.warning = None;
                    self.recompute_movers();
                }
                vec![]
            }
            UiEvent::SetDeviationRule(rule) => {
                self.movers.rule = rule;
                self.recompute_movers();
                vec![]
            }
            UiEvent::SelectCurveDate(date) => {
                self.treasury.selected_date = Some(date);
                self.recompute_curve();
                vec![]
            }
        };

        for req in &requests {
            *self.in_flight.entry(req.page()).or_insert(0) += 1;
            if let FetchRequest::PriceHistories { end, .. } = req {
                self.movers.requested_as_of = self.movers.requested_as_of.max(Some(*end));
            }
        }
        if !requests.is_empty() {
            self.status_message = "Fetching data...".to_string();
        }
        requests
    }

    fn add_ticker(&mut self, raw: &str, today: NaiveDate) -> Vec<FetchRequest> {
        match self.movers.watchlist.add(raw) {
            AddOutcome::Added(symbol) => {
                tracing::info!("Added ticker {}", symbol);
                self.movers.warning = None;
                self.movers.add_input.clear();
                self.recompute_movers();
                // Share the window of the newest fetch, even one still in flight,
                // so a refresh that crosses midnight does not orphan this ticker
                let as_of = self
                    .movers
                    .requested_as_of
                    .max(self.movers.as_of)
                    .unwrap_or(today);
                let (start, end) = self.mover_params().fetch_range(as_of);
                vec![FetchRequest::PriceHistories {
                    symbols: vec![symbol],
                    start,
                    end,
                    invalidate: false,
                }]
            }
            AddOutcome::Full => {
                self.movers.warning =
                    Some(format!("Maximum of {} tickers allowed.", config::MAX_TICKERS));
                vec![]
            }
            AddOutcome::Duplicate(_) | AddOutcome::Blank => vec![],
        }
    }

    fn full_request(&self, page: Page, today: NaiveDate, invalidate: bool) -> FetchRequest {
        match page {
            Page::BigMovers => {
                let (start, end) = self.mover_params().fetch_range(today);
                FetchRequest::PriceHistories {
                    symbols: self.movers.watchlist.symbols().to_vec(),
                    start,
                    end,
                    invalidate,
                }
            }
            Page::TreasuryCurve => FetchRequest::TreasurySeries {
                start: loader::fred_start(),
                end: today,
                invalidate,
            },
            Page::Vix => FetchRequest::VixSeries {
                start: loader::fred_start(),
                end: today,
                invalidate,
            },
        }
    }

    /// Merge a finished fetch into the state and recompute the affected page
    pub fn receive(&mut self, result: FetchResult) {
        let page = result.page();
        if let Some(n) = self.in_flight.get_mut(&page) {
            *n = n.saturating_sub(1);
        }

        match result {
            FetchResult::PriceHistories { as_of, histories } => {
                if self.movers.as_of.is_some_and(|current| as_of < current) {
                    // Superseded by a newer window whose request covered these symbols
                    tracing::debug!("Dropping price histories as of {}", as_of);
                    return;
                }
                if self.movers.as_of != Some(as_of) {
                    self.movers.histories.clear();
                    self.movers.as_of = Some(as_of);
                }
                for h in histories {
                    // A ticker removed while its fetch was running stays removed
                    if self.movers.watchlist.contains(&h.symbol) {
                        self.movers.histories.insert(h.symbol.clone(), h);
                    }
                }
                self.recompute_movers();
                self.status_message = match &self.movers.scan {
                    Some(scan) => format!(
                        "Evaluated {} tickers as of {}, {} off trend, {} without data",
                        scan.reports.len(),
                        as_of,
                        scan.flagged().count(),
                        scan.no_data.len()
                    ),
                    None => "No tickers to evaluate".to_string(),
                };
            }
            FetchResult::TreasurySeries(series) => {
                let table = yield_curve::align_series(&series);
                self.status_message = match (table.first_date(), table.last_date()) {
                    (Some(first), Some(last)) => format!(
                        "Loaded {} yield curve dates ({} to {})",
                        table.dates.len(),
                        first,
                        last
                    ),
                    _ => "No treasury yield data available".to_string(),
                };
                let keep_selection = self
                    .treasury
                    .selected_date
                    .zip(table.first_date())
                    .zip(table.last_date())
                    .is_some_and(|((sel, first), last)| sel >= first && sel <= last);
                if !keep_selection {
                    self.treasury.selected_date = table.last_date();
                }
                self.treasury.table = Some(table);
                self.recompute_curve();
            }
            FetchResult::VixSeries(series) => {
                self.vix.latest = vix::latest_reading(&series);
                self.status_message = match &self.vix.latest {
                    Some(latest) => format!(
                        "Loaded {} VIX observations, latest {:.2} on {}",
                        series.len(),
                        latest.level,
                        latest.date
                    ),
                    None => "No VIX data available".to_string(),
                };
                self.vix.series = Some(series);
            }
        }
    }

    /// Re-evaluate every watchlist ticker from the loaded histories
    pub fn recompute_movers(&mut self) {
        let Some(as_of) = self.movers.as_of else {
            self.movers.scan = None;
            return;
        };
        let params = self.mover_params();
        let symbols = self.movers.watchlist.symbols();
        // Tickers whose fetch is still running are not "no data" yet
        let loaded: Vec<String> = symbols
            .iter()
            .filter(|s| self.movers.histories.contains_key(*s))
            .cloned()
            .collect();
        self.movers.scan = Some(deviation::scan_watchlist(
            &loaded,
            &self.movers.histories,
            as_of,
            &params,
        ));
    }

    pub fn recompute_curve(&mut self) {
        self.treasury.curve = match (&self.treasury.table, self.treasury.selected_date) {
            (Some(table), Some(date)) => yield_curve::snapshot_on(table, date),
            _ => None,
        };
    }
}

/// Main application struct for eframe
pub struct MarketPagesApp {
    pub state: AppState,
    pub tokio_rt: tokio::runtime::Runtime,
    http: reqwest::Client,
    fetch_cache: SharedFetchCache,
    /// Results written by background fetches, drained every frame
    results: Arc<Mutex<Vec<FetchResult>>>,
}

impl MarketPagesApp {
    pub fn new(tokio_rt: tokio::runtime::Runtime, http: reqwest::Client) -> Self {
        let mut app = Self {
            state: AppState::default(),
            tokio_rt,
            http,
            fetch_cache: Arc::new(Mutex::new(FetchCache::default())),
            results: Arc::new(Mutex::new(Vec::new())),
        };
        let first_page = app.state.active_page;
        app.dispatch(UiEvent::PageOpened(first_page));
        app
    }

    fn dispatch(&mut self, event: UiEvent) {
        let today = chrono::Local::now().date_naive();
        for request in self.state.apply(event, today) {
            self.start_fetch(request);
        }
    }

    fn start_fetch(&mut self, request: FetchRequest) {
        let client = self.http.clone();
        let cache = self.fetch_cache.clone();
        let results = self.results.clone();

        if let Ok(mut guard) = cache.lock() {
            guard.purge_expired(std::time::Instant::now());
            match &request {
                FetchRequest::PriceHistories { symbols, invalidate: true, .. } => {
                    guard.invalidate(symbols);
                }
                FetchRequest::TreasurySeries { invalidate: true, .. } => {
                    let codes: Vec<&str> =
                        config::TREASURY_MATURITIES.iter().map(|m| m.code).collect();
                    guard.invalidate(&codes);
                }
                FetchRequest::VixSeries { invalidate: true, .. } => {
                    guard.invalidate(&[config::VIX_SERIES]);
                }
                _ => {}
            }
        }

        self.tokio_rt.spawn(async move {
            let result = match request {
                FetchRequest::PriceHistories { symbols, start, end, .. } => {
                    let histories =
                        loader::load_price_histories(&client, &cache, &symbols, start, end).await;
                    FetchResult::PriceHistories { as_of: end, histories }
                }
                FetchRequest::TreasurySeries { start, end, .. } => {
                    let maturities = config::TREASURY_MATURITIES;
                    FetchResult::TreasurySeries(
                        loader::load_treasury_series(&client, &cache, maturities, start, end)
                            .await,
                    )
                }
                FetchRequest::VixSeries { start, end, .. } => {
                    FetchResult::VixSeries(loader::load_vix(&client, &cache, start, end).await)
                }
            };

            if let Ok(mut slot) = results.lock() {
                slot.push(result);
            }
        });
    }

    fn check_data_ready(&mut self) {
        let ready: Vec<FetchResult> = self
            .results
            .lock()
            .map(|mut slot| std::mem::take(&mut *slot))
            .unwrap_or_default();
        for result in ready {
            self.state.receive(result);
        }
    }
}

impl eframe::App for MarketPagesApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Poll for async data
        self.check_data_ready();
        if self.state.any_loading() {
            ctx.request_repaint_after(std::time::Duration::from_millis(100));
        }

        // Top panel with tabs
        egui::TopBottomPanel::top("tab_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                for page in Page::ALL {
                    if ui
                        .selectable_label(self.state.active_page == page, page.title())
                        .clicked()
                        && self.state.active_page != page
                    {
                        self.state.events.push(UiEvent::PageOpened(page));
                    }
                }

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    let page = self.state.active_page;
                    if self.state.is_loading(page) {
                        ui.spinner();
                        ui.label("Loading...");
                    } else if ui.button("Refresh Data").clicked() {
                        self.state.events.push(UiEvent::Refresh(page));
                    }
                });
            });
        });

        // Bottom status bar
        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label(&self.state.status_message);
            });
        });

        if self.state.active_page == Page::BigMovers {
            egui::SidePanel::left("ticker_panel")
                .resizable(false)
                .default_width(200.0)
                .show(ctx, |ui| ui::movers_view::render_sidebar(ui, &mut self.state));
        }

        // Central panel with active page content (scrollable when content overflows)
        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical()
                .auto_shrink(false)
                .show(ui, |ui| match self.state.active_page {
                    Page::BigMovers => ui::movers_view::render(ui, &mut self.state),
                    Page::TreasuryCurve => ui::treasury_view::render(ui, &mut self.state),
                    Page::Vix => ui::vix_view::render(ui, &mut self.state),
                });
        });

        let events = std::mem::take(&mut self.state.events);
        for event in events {
            self.dispatch(event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::models::PricePoint;
    use chrono::Duration;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 28).unwrap()
    }

    fn flat_history(symbol: &str) -> PriceHistory {
        let closes = [100.0, 101.0, 100.0, 99.0, 100.0].repeat(36);
        PriceHistory {
            symbol: symbol.to_string(),
            points: closes
                .iter()
                .enumerate()
                .map(|(i, &close)| PricePoint {
                    date: today() - Duration::days(179 - i as i64),
                    close,
                })
                .collect(),
        }
    }

    #[test]
    fn test_opening_movers_requests_watchlist() {
        let mut state = AppState::default();
        let reqs = state.apply(UiEvent::PageOpened(Page::BigMovers), today());
        assert_eq!(reqs.len(), 1);
        match &reqs[0] {
            FetchRequest::PriceHistories { symbols, start, end, invalidate } => {
                assert_eq!(symbols.len(), 5);
                assert_eq!(*end, today());
                assert_eq!(*start, today() - Duration::days(180));
                assert!(!invalidate);
            }
            other => panic!("unexpected request {:?}", other),
        }
        assert!(state.is_loading(Page::BigMovers));
        // Reopening while loading does not fetch twice
        assert!(state.apply(UiEvent::PageOpened(Page::BigMovers), today()).is_empty());
    }

    #[test]
    fn test_overflow_warns_without_mutation() {
        let mut state = AppState::default();
        for i in 0..15 {
            state.apply(UiEvent::AddTicker(format!("T{}", i)), today());
        }
        assert_eq!(state.movers.watchlist.len(), config::MAX_TICKERS);
        assert!(state.movers.warning.is_none());

        let before = state.movers.watchlist.clone();
        let reqs = state.apply(UiEvent::AddTicker("ONEMORE".into()), today());
        assert!(reqs.is_empty());
        assert_eq!(state.movers.watchlist, before);
        assert_eq!(state.movers.warning.as_deref(), Some("Maximum of 20 tickers allowed."));
    }

    #[test]
    fn test_remove_clears_overflow_warning() {
        let mut state = AppState::default();
        for i in 0..15 {
            state.apply(UiEvent::AddTicker(format!("T{}", i)), today());
        }
        state.apply(UiEvent::AddTicker("ONEMORE".into()), today());
        assert!(state.movers.warning.is_some());

        state.apply(UiEvent::RemoveTicker("T0".into()), today());
        assert!(state.movers.warning.is_none(), "a slot is free again");
        assert_eq!(state.movers.watchlist.len(), config::MAX_TICKERS - 1);
    }

    #[test]
    fn test_duplicate_and_blank_add_are_silent() {
        let mut state = AppState::default();
        assert!(state.apply(UiEvent::AddTicker("msft".into()), today()).is_empty());
        assert!(state.apply(UiEvent::AddTicker("  ".into()), today()).is_empty());
        assert_eq!(state.movers.watchlist.len(), 5);
        assert!(state.movers.warning.is_none());
    }

    #[test]
    fn test_added_ticker_fetches_only_itself() {
        let mut state = AppState::default();
        let reqs = state.apply(UiEvent::AddTicker("nvda".into()), today());
        assert!(matches!(
            &reqs[..],
            [FetchRequest::PriceHistories { symbols, .. }] if symbols == &["NVDA".to_string()]
        ));
    }

    #[test]
    fn test_empty_fetch_is_listed_as_no_data() {
        let mut state = AppState::default();
        state.apply(UiEvent::PageOpened(Page::BigMovers), today());
        let mut histories: Vec<PriceHistory> = ["AAPL", "MSFT", "GOOGL", "AMZN"]
            .iter()
            .map(|s| flat_history(s))
            .collect();
        histories.push(PriceHistory::empty("TSLA"));
        state.receive(FetchResult::PriceHistories { as_of: today(), histories });

        assert!(!state.is_loading(Page::BigMovers));
        let scan = state.movers.scan.as_ref().unwrap();
        assert_eq!(scan.reports.len(), 4);
        assert_eq!(scan.no_data, vec!["TSLA".to_string()]);
        assert_eq!(scan.flagged().count(), 0);
    }

    #[test]
    fn test_add_during_refresh_across_midnight_keeps_ticker() {
        let tomorrow = today() + Duration::days(1);
        let mut state = AppState::default();
        state.receive(FetchResult::PriceHistories {
            as_of: today(),
            histories: vec![flat_history("AAPL")],
        });

        let refresh = state.apply(UiEvent::Refresh(Page::BigMovers), tomorrow);
        let add = state.apply(UiEvent::AddTicker("nvda".into()), tomorrow);
        assert!(matches!(
            &add[..],
            [FetchRequest::PriceHistories { end, .. }] if *end == tomorrow
        ));

        // The single-symbol fetch finishes first; the refresh never saw NVDA
        state.receive(FetchResult::PriceHistories {
            as_of: tomorrow,
            histories: vec![flat_history("NVDA")],
        });
        let FetchRequest::PriceHistories { symbols, .. } = &refresh[0] else {
            panic!("unexpected request {:?}", refresh);
        };
        assert!(!symbols.contains(&"NVDA".to_string()));
        state.receive(FetchResult::PriceHistories {
            as_of: tomorrow,
            histories: symbols.iter().map(|s| flat_history(s)).collect(),
        });

        assert!(!state.is_loading(Page::BigMovers));
        assert_eq!(state.movers.as_of, Some(tomorrow));
        let scan = state.movers.scan.as_ref().unwrap();
        assert!(scan.reports.iter().any(|r| r.symbol == "NVDA"));
        assert_eq!(scan.reports.len(), 6);
    }

    #[test]
    fn test_result_for_older_window_is_dropped() {
        let tomorrow = today() + Duration::days(1);
        let mut state = AppState::default();
        state.receive(FetchResult::PriceHistories {
            as_of: tomorrow,
            histories: vec![flat_history("AAPL")],
        });
        state.receive(FetchResult::PriceHistories {
            as_of: today(),
            histories: vec![flat_history("MSFT")],
        });
        assert_eq!(state.movers.as_of, Some(tomorrow));
        assert!(state.movers.histories.contains_key("AAPL"));
        assert!(!state.movers.histories.contains_key("MSFT"));
    }

    #[test]
    fn test_remove_drops_history_and_report() {
        let mut state = AppState::default();
        state.receive(FetchResult::PriceHistories {
            as_of: today(),
            histories: vec![flat_history("AAPL"), flat_history("MSFT")],
        });
        state.apply(UiEvent::RemoveTicker("AAPL".into()), today());
        let scan = state.movers.scan.as_ref().unwrap();
        assert_eq!(scan.reports.len(), 1);
        assert_eq!(scan.reports[0].symbol, "MSFT");
        assert!(!state.movers.histories.contains_key("AAPL"));
    }

    #[test]
    fn test_removing_unknown_ticker_is_noop() {
        let mut state = AppState::default();
        let before = state.movers.watchlist.clone();
        assert!(state.apply(UiEvent::RemoveTicker("ZZZZ".into()), today()).is_empty());
        assert_eq!(state.movers.watchlist, before);
    }

    #[test]
    fn test_empty_vix_renders_no_data_state() {
        let mut state = AppState::default();
        state.apply(UiEvent::PageOpened(Page::Vix), today());
        state.receive(FetchResult::VixSeries(vec![]));
        assert!(state.vix.latest.is_none());
        assert_eq!(state.vix.series.as_deref(), Some(&[][..]));
        assert_eq!(state.status_message, "No VIX data available");
        // Loaded, even if empty: reopening does not refetch
        assert!(state.apply(UiEvent::PageOpened(Page::Vix), today()).is_empty());
    }

    #[test]
    fn test_curve_selection_resolves_prior_date() {
        let friday = NaiveDate::from_ymd_opt(2024, 6, 21).unwrap();
        let series: Vec<(Maturity, Vec<Observation>)> = config::TREASURY_MATURITIES
            .iter()
            .map(|m| (*m, vec![Observation { date: friday, value: m.years }]))
            .collect();
        let mut state = AppState::default();
        state.receive(FetchResult::TreasurySeries(series));
        assert_eq!(state.treasury.selected_date, Some(friday));

        let sunday = NaiveDate::from_ymd_opt(2024, 6, 23).unwrap();
        state.apply(UiEvent::SelectCurveDate(sunday), today());
        let curve = state.treasury.curve.as_ref().unwrap();
        assert_eq!(curve.date, friday);
        assert_eq!(curve.requested, sunday);
    }

    #[test]
    fn test_refresh_always_requests_with_invalidation() {
        let mut state = AppState::default();
        state.receive(FetchResult::VixSeries(vec![]));
        let reqs = state.apply(UiEvent::Refresh(Page::Vix), today());
        assert!(matches!(&reqs[..], [FetchRequest::VixSeries { invalidate: true, .. }]));
    }
}
