use crate::config;

/// Result of trying to add a ticker
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddOutcome {
    Added(String),
    Duplicate(String),
    Blank,
    Full,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoveOutcome {
    Removed(String),
    NotFound,
}

/// Session-scoped, ordered, bounded list of unique ticker symbols
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Watchlist {
    symbols: Vec<String>,
    capacity: usize,
}

impl Default for Watchlist {
    fn default() -> Self {
        let mut list = Self::with_capacity(config::MAX_TICKERS);
        for symbol in config::DEFAULT_TICKERS {
            list.add(symbol);
        }
        list
    }
}

/// Trim and uppercase a user-typed symbol
pub fn normalize(raw: &str) -> String {
    raw.trim().to_uppercase()
}

impl Watchlist {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            symbols: Vec::new(),
            capacity,
        }
    }

    pub fn symbols(&self) -> &[String] {
        &self.symbols
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    pub fn contains(&self, symbol: &str) -> bool {
        let symbol = normalize(symbol);
        self.symbols.iter().any(|s| *s == symbol)
    }

    /// Blank and duplicate input is ignored before the capacity check
    pub fn add(&mut self, raw: &str) -> AddOutcome {
        let symbol = normalize(raw);
        if symbol.is_empty() {
            return AddOutcome::Blank;
        }
        if self.symbols.contains(&symbol) {
            return AddOutcome::Duplicate(symbol);
        }
        if self.symbols.len() >= self.capacity {
            return AddOutcome::Full;
        }
        self.symbols.push(symbol.clone());
        AddOutcome::Added(symbol)
    }

    pub fn remove(&mut self, raw: &str) -> RemoveOutcome {
        let symbol = normalize(raw);
        match self.symbols.iter().position(|s| *s == symbol) {
            Some(idx) => RemoveOutcome::Removed(self.symbols.remove(idx)),
            None => RemoveOutcome::NotFound,
        }
    }
}
