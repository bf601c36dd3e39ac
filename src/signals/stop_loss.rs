// =============================================================================
// Stop-Loss Calculator
// =============================================================================
//
//   LONG            stop = latest_low * 0.99   (below price)
//   SHORT, NEUTRAL  stop = latest_low * 1.03   (above price)
//
// NEUTRAL shares the short-side formula; the report still shows it so the
// output stays comparable across timeframes.
// =============================================================================

use serde::Serialize;

use crate::types::{Signal, StopSide};

const LONG_BUFFER: f64 = 0.99;
const SHORT_BUFFER: f64 = 1.03;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StopLoss {
    pub price: f64,
    pub side: StopSide,
}

pub fn stop_loss(signal: Signal, latest_low: f64) -> StopLoss {
    match signal {
        Signal::Long => StopLoss {
            price: latest_low * LONG_BUFFER,
            side: StopSide::BelowPrice,
        },
        Signal::Short | Signal::Neutral => StopLoss {
            price: latest_low * SHORT_BUFFER,
            side: StopSide::AbovePrice,
        },
    }
}
