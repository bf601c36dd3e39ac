// In-memory market data sources and candle builders shared by unit tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use parking_lot::Mutex;

use crate::market_data::{Candle, CandleSource, SymbolSource};
use crate::registry::{Symbol, SymbolRegistry};
use crate::runtime_config::RuntimeConfig;
use crate::types::Timeframe;

const MINUTE_MS: i64 = 60_000;

/// Ascending candles where every OHLC field equals the close.
pub fn flat_candles(closes: &[f64]) -> Vec<Candle> {
    closes
        .iter()
        .enumerate()
        .map(|(i, &c)| {
            let t = i as i64 * MINUTE_MS;
            Candle::new(t, c, c, c, c, 1.0, t + MINUTE_MS - 1)
        })
        .collect()
}

/// `flat_candles` with an explicit low on the most recent candle.
pub fn candles_with_last_low(closes: &[f64], last_low: f64) -> Vec<Candle> {
    let mut candles = flat_candles(closes);
    if let Some(last) = candles.last_mut() {
        last.low = last_low;
    }
    candles
}

/// 100 closes rising by one per candle from 100.
pub fn rising_closes() -> Vec<f64> {
    (0..100).map(|i| 100.0 + i as f64).collect()
}

pub fn resolved(symbol: &str) -> Symbol {
    SymbolRegistry::from_symbols([symbol], "USDT")
        .resolve(symbol)
        .unwrap()
}

pub fn test_config() -> RuntimeConfig {
    RuntimeConfig {
        fetch_timeout_secs: 1,
        ..RuntimeConfig::default()
    }
}

// =============================================================================
// Candle source
// =============================================================================

/// What the mock returns for one timeframe.
#[derive(Clone)]
pub enum Feed {
    Candles(Vec<Candle>),
    Empty,
    Error(&'static str),
    /// Never resolves; exercises the per-fetch timeout.
    Hang,
}

/// Per-timeframe scripted candle source.  Unscripted timeframes are `Empty`.
pub struct MockCandles {
    feeds: HashMap<Timeframe, Feed>,
    calls: AtomicUsize,
}

impl MockCandles {
    pub fn new() -> Self {
        Self {
            feeds: HashMap::new(),
            calls: AtomicUsize::new(0),
        }
    }

    /// Same feed for every timeframe.
    pub fn uniform(feed: Feed) -> Self {
        let mut mock = Self::new();
        for tf in Timeframe::ALL {
            mock = mock.with(tf, feed.clone());
        }
        mock
    }

    pub fn with(mut self, timeframe: Timeframe, feed: Feed) -> Self {
        self.feeds.insert(timeframe, feed);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::Relaxed)
    }
}

impl CandleSource for MockCandles {
    async fn fetch_candles(
        &self,
        _symbol: &str,
        timeframe: Timeframe,
        limit: u32,
    ) -> anyhow::Result<Vec<Candle>> {
        self.calls.fetch_add(1, Ordering::Relaxed);
        match self.feeds.get(&timeframe).cloned().unwrap_or(Feed::Empty) {
            Feed::Candles(candles) => {
                let skip = candles.len().saturating_sub(limit as usize);
                Ok(candles.into_iter().skip(skip).collect())
            }
            Feed::Empty => Ok(Vec::new()),
            Feed::Error(msg) => Err(anyhow::anyhow!(msg)),
            Feed::Hang => std::future::pending().await,
        }
    }
}

// =============================================================================
// Symbol source
// =============================================================================

/// Symbol source returning a scripted sequence of results.
pub struct ScriptedSymbols {
    responses: Mutex<Vec<anyhow::Result<Vec<String>>>>,
}

impl ScriptedSymbols {
    pub fn new(responses: Vec<anyhow::Result<Vec<String>>>) -> Self {
        Self {
            responses: Mutex::new(responses),
        }
    }
}

impl SymbolSource for ScriptedSymbols {
    async fn fetch_symbols(&self) -> anyhow::Result<Vec<String>> {
        let mut responses = self.responses.lock();
        if responses.is_empty() {
            anyhow::bail!("no scripted response left");
        }
        responses.remove(0)
    }
}

/// Both sources in one value, as `AppState` expects.
pub struct MockExchange {
    pub symbols: ScriptedSymbols,
    pub candles: MockCandles,
}

impl SymbolSource for MockExchange {
    async fn fetch_symbols(&self) -> anyhow::Result<Vec<String>> {
        self.symbols.fetch_symbols().await
    }
}

impl CandleSource for MockExchange {
    async fn fetch_candles(
        &self,
        symbol: &str,
        timeframe: Timeframe,
        limit: u32,
    ) -> anyhow::Result<Vec<Candle>> {
        self.candles.fetch_candles(symbol, timeframe, limit).await
    }
}
