// =============================================================================
// Signal Classifier — RSI zone + EMA crossover + price vs slow EMA
// =============================================================================
//
// Decision rule (first match wins):
//   LONG    RSI < 30 and price > EMA21
//   SHORT   RSI > 70 and price < EMA21
//   NEUTRAL otherwise
//
// Crossover is bullish iff EMA9 > EMA21; an exact tie is bearish.
// =============================================================================

use serde::Serialize;

use crate::indicators::IndicatorSet;
use crate::types::{Crossover, RsiZone, Signal};

pub const RSI_OVERSOLD: f64 = 30.0;
pub const RSI_OVERBOUGHT: f64 = 70.0;

/// Labels and decision for one timeframe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Classification {
    pub signal: Signal,
    pub zone: RsiZone,
    pub crossover: Crossover,
}

pub fn rsi_zone(rsi: f64) -> RsiZone {
    if rsi < RSI_OVERSOLD {
        RsiZone::Oversold
    } else if rsi > RSI_OVERBOUGHT {
        RsiZone::Overbought
    } else {
        RsiZone::Neutral
    }
}

pub fn crossover(ema9: f64, ema21: f64) -> Crossover {
    if ema9 > ema21 {
        Crossover::Bullish
    } else {
        Crossover::Bearish
    }
}

/// Pure and total: any input (NaN included) maps to exactly one signal.
pub fn classify_signal(price: f64, rsi: f64, ema21: f64) -> Signal {
    if rsi < RSI_OVERSOLD && price > ema21 {
        Signal::Long
    } else if rsi > RSI_OVERBOUGHT && price < ema21 {
        Signal::Short
    } else {
        Signal::Neutral
    }
}

pub fn classify(set: &IndicatorSet) -> Classification {
    Classification {
        signal: classify_signal(set.price, set.rsi, set.ema21),
        zone: rsi_zone(set.rsi),
        crossover: crossover(set.ema9, set.ema21),
    }
}
