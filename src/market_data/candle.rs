use serde::{Deserialize, Serialize};

use crate::error::AnalysisError;

// ---------------------------------------------------------------------------
// Data types
// ---------------------------------------------------------------------------

/// A single OHLCV candle from the exchange kline endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    pub open_time: i64,
    pub close_time: i64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl Candle {
    pub fn new(
        open_time: i64,
        open: f64,
        high: f64,
        low: f64,
        close: f64,
        volume: f64,
        close_time: i64,
    ) -> Self {
        Self {
            open_time,
            close_time,
            open,
            high,
            low,
            close,
            volume,
        }
    }
}

// ---------------------------------------------------------------------------
// CandleSeries -- validated, ascending, non-empty
// ---------------------------------------------------------------------------

/// Candles for one (symbol, timeframe), oldest first, strictly ascending by
/// `open_time`.  The last element is the most recent candle.
#[derive(Debug, Clone)]
pub struct CandleSeries {
    candles: Vec<Candle>,
}

impl CandleSeries {
    /// Build a series from raw gateway output.
    ///
    /// Out-of-order input is sorted and duplicate `open_time`s keep the last
    /// occurrence.  An empty payload is `NoData`.
    pub fn new(mut candles: Vec<Candle>) -> Result<Self, AnalysisError> {
        if candles.is_empty() {
            return Err(AnalysisError::NoData("empty candle payload".to_string()));
        }

        if !candles.windows(2).all(|w| w[0].open_time < w[1].open_time) {
            // Stable sort keeps arrival order among equal timestamps, so the
            // reverse + dedup below retains the latest update.
            candles.sort_by_key(|c| c.open_time);
            candles.reverse();
            candles.dedup_by_key(|c| c.open_time);
            candles.reverse();
        }

        Ok(Self { candles })
    }

    pub fn len(&self) -> usize {
        self.candles.len()
    }

    #[cfg(test)]
    pub fn candles(&self) -> &[Candle] {
        &self.candles
    }

    /// Close prices, oldest first.
    pub fn closes(&self) -> Vec<f64> {
        self.candles.iter().map(|c| c.close).collect()
    }

    /// Most recent candle. A series is never empty.
    pub fn latest(&self) -> &Candle {
        &self.candles[self.candles.len() - 1]
    }
}
