// =============================================================================
// Relative Strength Index (RSI) — Wilder's Smoothing
// =============================================================================
//
// Step 1 — Compute price changes (deltas) from consecutive closes.
// Step 2 — Seed average gain / average loss with the SMA of the first `period`
//          gains / losses.
// Step 3 — Apply Wilder's smoothing over the remaining deltas:
//            avg_gain = (prev_avg_gain * (period - 1) + current_gain) / period
//            avg_loss = (prev_avg_loss * (period - 1) + current_loss) / period
// Step 4 — RS  = avg_gain / avg_loss
//          RSI = 100 - 100 / (1 + RS)
// =============================================================================

use crate::error::AnalysisError;

/// Compute the full RSI series for the given `closes` and `period`.
///
/// The returned vector has one RSI value for each close starting at index
/// `period` (the first `period` closes are consumed to seed the averages).
///
/// # Edge cases
/// - `period == 0` => empty vec
/// - `closes.len() < period + 1` => empty vec (need at least `period` deltas)
/// - If average loss is zero (no down moves), RSI is 100.0.
/// - Non-finite results are dropped and the series is truncated.
pub fn calculate_rsi(closes: &[f64], period: usize) -> Vec<f64> {
    if period == 0 || closes.len() < period + 1 {
        return Vec::new();
    }

    let deltas: Vec<f64> = closes.windows(2).map(|w| w[1] - w[0]).collect();

    let (sum_gain, sum_loss) = deltas[..period].iter().fold((0.0_f64, 0.0_f64), |(g, l), &d| {
        if d > 0.0 {
            (g + d, l)
        } else {
            (g, l + d.abs())
        }
    });

    let period_f = period as f64;
    let mut avg_gain = sum_gain / period_f;
    let mut avg_loss = sum_loss / period_f;

    let Some(first_rsi) = rsi_from_averages(avg_gain, avg_loss) else {
        return Vec::new();
    };

    let mut result = Vec::with_capacity(deltas.len() - period + 1);
    result.push(first_rsi);

    for &delta in &deltas[period..] {
        let gain = delta.max(0.0);
        let loss = (-delta).max(0.0);

        avg_gain = (avg_gain * (period_f - 1.0) + gain) / period_f;
        avg_loss = (avg_loss * (period_f - 1.0) + loss) / period_f;

        match rsi_from_averages(avg_gain, avg_loss) {
            Some(rsi) => result.push(rsi),
            None => break,
        }
    }

    result
}

/// Most recent RSI value over the whole `closes` window.
///
/// Fails with `InsufficientData` when fewer than `period + 1` closes are given,
/// and with `NoData` when the input contains non-finite prices.
pub fn latest_rsi(closes: &[f64], period: usize) -> Result<f64, AnalysisError> {
    let required = period + 1;
    if period == 0 || closes.len() < required {
        return Err(AnalysisError::InsufficientData {
            indicator: "RSI",
            required,
            available: closes.len(),
        });
    }

    if closes.iter().any(|c| !c.is_finite()) {
        return Err(AnalysisError::NoData("non-finite close in RSI window".to_string()));
    }

    calculate_rsi(closes, period)
        .last()
        .copied()
        .ok_or_else(|| AnalysisError::NoData("empty RSI series".to_string()))
}

// =============================================================================
// Internal helpers
// =============================================================================

/// Convert average gain / average loss into an RSI value in [0, 100].
///
/// - If both averages are zero, RSI is 50.0 (no movement).
/// - If average loss is zero (only gains), RSI is 100.0.
/// - Returns `None` when the result is non-finite.
fn rsi_from_averages(avg_gain: f64, avg_loss: f64) -> Option<f64> {
    let rsi = if avg_loss == 0.0 && avg_gain == 0.0 {
        50.0
    } else if avg_loss == 0.0 {
        100.0
    } else {
        let rs = avg_gain / avg_loss;
        100.0 - 100.0 / (1.0 + rs)
    };

    rsi.is_finite().then_some(rsi)
}

// =============================================================================
// Unit Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn latest_rsi_matches_wilder_reference() {
        // Wilder's textbook closes; SMA-seeded first RSI(14) is ~70.46.
        let closes = vec![
            44.34, 44.09, 44.15, 43.61, 44.33, 44.83, 45.10, 45.42, 45.84, 46.08,
            45.89, 46.03, 45.61, 46.28, 46.28,
        ];
        let rsi = latest_rsi(&closes, 14).unwrap();
        assert!((rsi - 70.464).abs() < 0.01, "got {rsi}");
    }

    #[test]
    fn one_way_markets_pin_the_bounds() {
        let rally: Vec<f64> = (1..=100).map(|x| 30_000.0 + x as f64 * 5.0).collect();
        assert!((latest_rsi(&rally, 14).unwrap() - 100.0).abs() < 1e-10);

        let selloff: Vec<f64> = rally.iter().rev().copied().collect();
        assert!(latest_rsi(&selloff, 14).unwrap().abs() < 1e-10);
    }

    #[test]
    fn unchanged_closes_sit_at_midpoint() {
        let closes = vec![30_500.0; 100];
        assert!((latest_rsi(&closes, 14).unwrap() - 50.0).abs() < 1e-10);
    }

    #[test]
    fn rsi_range_check() {
        // Zig-zag data of various lengths >= 15 stays within [0, 100].
        for n in 15..80 {
            let closes: Vec<f64> = (0..n)
                .map(|i| 100.0 + ((i * 7919) % 23) as f64 - 11.0 + i as f64 * 0.1)
                .collect();
            let rsi = latest_rsi(&closes, 14).unwrap();
            assert!((0.0..=100.0).contains(&rsi), "RSI {rsi} out of range for n={n}");
        }
    }

    #[test]
    fn latest_rsi_needs_period_plus_one() {
        let closes: Vec<f64> = (1..=14).map(|x| x as f64).collect();
        assert_eq!(
            latest_rsi(&closes, 14),
            Err(AnalysisError::InsufficientData {
                indicator: "RSI",
                required: 15,
                available: 14,
            })
        );
        let closes: Vec<f64> = (1..=15).map(|x| x as f64).collect();
        assert!((latest_rsi(&closes, 14).unwrap() - 100.0).abs() < 1e-10);
    }

    #[test]
    fn empty_window_or_zero_period_is_insufficient() {
        assert_eq!(
            latest_rsi(&[], 14),
            Err(AnalysisError::InsufficientData {
                indicator: "RSI",
                required: 15,
                available: 0,
            })
        );
        assert!(matches!(
            latest_rsi(&[1.0, 2.0, 3.0], 0),
            Err(AnalysisError::InsufficientData { available: 3, .. })
        ));
    }

    #[test]
    fn latest_rsi_rejects_nan() {
        let mut closes: Vec<f64> = (1..=30).map(|x| x as f64).collect();
        closes[20] = f64::NAN;
        assert!(matches!(latest_rsi(&closes, 14), Err(AnalysisError::NoData(_))));
    }
}
