/// Tickers shown when the app first starts
pub const DEFAULT_TICKERS: &[&str] = &["AAPL", "MSFT", "GOOGL", "AMZN", "TSLA"];

/// Upper bound on the watchlist size
pub const MAX_TICKERS: usize = 20;

/// Trailing history window fetched per ticker (calendar days)
pub const HISTORY_DAYS: i64 = 180;

/// Recent window compared against the baseline (calendar days)
pub const RECENT_DAYS: i64 = 14;

/// Standard-deviation multiplier beyond which a ticker counts as off trend
pub const DEVIATION_MULTIPLIER: f64 = 5.0;

/// A fixed-maturity Treasury constant maturity series on FRED
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Maturity {
    pub label: &'static str,
    pub code: &'static str,
    pub years: f64,
}

/// Treasury constant maturity series, shortest first
pub const TREASURY_MATURITIES: &[Maturity] = &[
    Maturity { label: "1M", code: "DGS1MO", years: 1.0 / 12.0 },
    Maturity { label: "3M", code: "DGS3MO", years: 3.0 / 12.0 },
    Maturity { label: "6M", code: "DGS6MO", years: 6.0 / 12.0 },
    Maturity { label: "1Y", code: "DGS1", years: 1.0 },
    Maturity { label: "2Y", code: "DGS2", years: 2.0 },
    Maturity { label: "3Y", code: "DGS3", years: 3.0 },
    Maturity { label: "5Y", code: "DGS5", years: 5.0 },
    Maturity { label: "7Y", code: "DGS7", years: 7.0 },
    Maturity { label: "10Y", code: "DGS10", years: 10.0 },
    Maturity { label: "20Y", code: "DGS20", years: 20.0 },
    Maturity { label: "30Y", code: "DGS30", years: 30.0 },
];

/// FRED series code for the VIX closing level
pub const VIX_SERIES: &str = "VIXCLS";

/// First date requested for the long FRED histories (yields and VIX)
pub const FRED_START: (i32, u32, u32) = (1990, 1, 1);

/// Lifetime of an in-memory fetch result
pub const FETCH_TTL_SECS: u64 = 60 * 60;

/// Age after which an on-disk FRED response is refetched
pub const DISK_CACHE_AGE_HOURS: u64 = 12;

pub const YAHOO_CHART_URL: &str = "https://query1.finance.yahoo.com/v8/finance/chart";
pub const FRED_GRAPH_URL: &str = "https://fred.stlouisfed.org/graph/fredgraph.csv";

/// Yahoo rejects requests without a browser-like user agent
pub const USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) market-pages/0.1";
pub const HTTP_TIMEOUT_SECS: u64 = 30;

/// Optional override for the on-disk cache location
pub fn cache_dir_override() -> Option<String> {
    std::env::var("MARKET_PAGES_CACHE_DIR")
        .ok()
        .filter(|s| !s.trim().is_empty())
}
