// =============================================================================
// Technical Indicators Module
// =============================================================================
//
// Pure, side-effect-free indicator functions.  Each indicator has a series
// form returning an empty `Vec` on bad input, and a `latest_*` form returning
// a typed `AnalysisError` so the orchestrator can contain the failure.

pub mod ema;
pub mod rsi;

use serde::{Deserialize, Serialize};

use crate::error::AnalysisError;
use crate::market_data::CandleSeries;
use crate::runtime_config::RuntimeConfig;

pub use ema::latest_ema;
pub use rsi::latest_rsi;

/// Indicator readings for the most recent candle of one timeframe.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IndicatorSet {
    /// Latest close.
    pub price: f64,
    pub rsi: f64,
    pub ema9: f64,
    pub ema21: f64,
}

impl IndicatorSet {
    /// Recompute every indicator from the full `series` window.
    pub fn compute(series: &CandleSeries, config: &RuntimeConfig) -> Result<Self, AnalysisError> {
        let closes = series.closes();
        Ok(Self {
            price: series.latest().close,
            rsi: latest_rsi(&closes, config.rsi_period)?,
            ema9: latest_ema(&closes, config.ema_fast_period, "EMA9")?,
            ema21: latest_ema(&closes, config.ema_slow_period, "EMA21")?,
        })
    }
}
