// =============================================================================
// Signals Module
// =============================================================================
//
// Per-timeframe decision logic:
// - Signal classification from RSI zone and EMA stack
// - Protective stop-loss level derived from the signal and latest low

pub mod classifier;
pub mod stop_loss;

pub use classifier::{classify, Classification};
pub use stop_loss::{stop_loss, StopLoss};
