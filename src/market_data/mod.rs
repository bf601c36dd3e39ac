// =============================================================================
// Market Data Gateway
// =============================================================================
//
// The analysis path only sees these two traits.  `BinanceClient` implements
// both against the public REST API; tests plug in in-memory sources.

pub mod candle;

use std::future::Future;

use anyhow::Result;

use crate::types::Timeframe;

// Re-export for convenient access (e.g. `use crate::market_data::Candle`).
pub use candle::{Candle, CandleSeries};

/// Supplies the full list of tradable symbol strings.
pub trait SymbolSource: Send + Sync {
    fn fetch_symbols(&self) -> impl Future<Output = Result<Vec<String>>> + Send;
}

/// Supplies candles for one (symbol, timeframe), oldest first.
///
/// An `Err` or an empty vector is treated as "no data" for that timeframe.
pub trait CandleSource: Send + Sync {
    fn fetch_candles(
        &self,
        symbol: &str,
        timeframe: Timeframe,
        limit: u32,
    ) -> impl Future<Output = Result<Vec<Candle>>> + Send;
}
