// =============================================================================
// Exponential Moving Average (EMA)
// =============================================================================
//
// Formula:
//   multiplier = 2 / (period + 1)
//   EMA_t      = close_t * multiplier + EMA_{t-1} * (1 - multiplier)
//
// The very first EMA value is seeded with the SMA of the first `period` closes.
// =============================================================================

use crate::error::AnalysisError;

/// Compute the EMA series for the given `closes` slice and look-back `period`.
///
/// Returns an empty `Vec` when the input is too short or the period is zero.
/// Each output element corresponds to a close starting at index `period - 1`.
///
/// # Edge cases
/// - `period == 0` => empty vec
/// - `closes.len() < period` => empty vec
/// - A non-finite intermediate value truncates the series.
pub fn calculate_ema(closes: &[f64], period: usize) -> Vec<f64> {
    if period == 0 || closes.len() < period {
        return Vec::new();
    }

    let multiplier = 2.0 / (period + 1) as f64;

    let sma: f64 = closes[..period].iter().sum::<f64>() / period as f64;
    if !sma.is_finite() {
        return Vec::new();
    }

    let mut result = Vec::with_capacity(closes.len() - period + 1);
    result.push(sma);

    let mut prev_ema = sma;
    for &close in &closes[period..] {
        let ema = close * multiplier + prev_ema * (1.0 - multiplier);
        if !ema.is_finite() {
            break;
        }
        result.push(ema);
        prev_ema = ema;
    }

    result
}

/// Final EMA value over the whole `closes` window.
///
/// `label` names the indicator in the `InsufficientData` error (e.g. "EMA21").
pub fn latest_ema(closes: &[f64], period: usize, label: &'static str) -> Result<f64, AnalysisError> {
    if period == 0 || closes.len() < period {
        return Err(AnalysisError::InsufficientData {
            indicator: label,
            required: period.max(1),
            available: closes.len(),
        });
    }

    let series = calculate_ema(closes, period);
    if series.len() != closes.len() - period + 1 {
        return Err(AnalysisError::NoData(format!("non-finite close in {label} window")));
    }
    series
        .last()
        .copied()
        .ok_or_else(|| AnalysisError::NoData(format!("empty {label} series")))
}
