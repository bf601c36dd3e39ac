// =============================================================================
// Report Formatter
// =============================================================================
//
// One block per timeframe, blocks joined by a blank line:
//
//   [15m]
//   - RSI: 25.0 (oversold)
//   - bullish crossover (EMA9 > EMA21)
//   - Advice: LONG signal
//   - Stop-loss: 30492.00 (below price)
//
// Failed timeframes render a single placeholder line instead.
// =============================================================================

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::error::AnalysisError;
use crate::indicators::IndicatorSet;
use crate::registry::Symbol;
use crate::signals::{Classification, StopLoss};
use crate::types::{Crossover, Timeframe};

// =============================================================================
// Result types
// =============================================================================

/// Everything computed for a timeframe that had usable candles.
#[derive(Debug, Clone, Serialize)]
pub struct TimeframeAnalysis {
    pub indicators: IndicatorSet,
    pub classification: Classification,
    pub stop_loss: StopLoss,
    pub latest_low: f64,
    pub candles: usize,
}

/// Outcome for one timeframe.  Exactly one of `analysis` / `error` is set.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisResult {
    pub timeframe: Timeframe,
    pub analysis: Option<TimeframeAnalysis>,
    pub error: Option<String>,
    pub rendered: String,
}

impl AnalysisResult {
    pub fn analyzed(timeframe: Timeframe, analysis: TimeframeAnalysis) -> Self {
        Self {
            timeframe,
            rendered: render_analysis(timeframe, &analysis),
            analysis: Some(analysis),
            error: None,
        }
    }

    pub fn failed(timeframe: Timeframe, error: &AnalysisError) -> Self {
        Self {
            timeframe,
            analysis: None,
            error: Some(error.to_string()),
            rendered: render_placeholder(timeframe, error),
        }
    }
}

#[cfg(test)]
impl AnalysisResult {
    pub fn indicators(&self) -> Option<&IndicatorSet> {
        self.analysis.as_ref().map(|a| &a.indicators)
    }

    pub fn signal(&self) -> Option<crate::types::Signal> {
        self.analysis.as_ref().map(|a| a.classification.signal)
    }

    pub fn stop_loss(&self) -> Option<StopLoss> {
        self.analysis.as_ref().map(|a| a.stop_loss)
    }
}

/// Multi-timeframe report for one symbol, results in `Timeframe::ALL` order.
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub symbol: Symbol,
    pub request_id: Uuid,
    pub generated_at: DateTime<Utc>,
    pub results: Vec<AnalysisResult>,
}

impl Report {
    #[cfg(test)]
    pub fn result(&self, timeframe: Timeframe) -> Option<&AnalysisResult> {
        self.results.iter().find(|r| r.timeframe == timeframe)
    }

    /// Final user-facing text.
    pub fn render(&self) -> String {
        render_report(&self.results)
    }
}

// =============================================================================
// Rendering
// =============================================================================

pub fn render_report(results: &[AnalysisResult]) -> String {
    results
        .iter()
        .map(|r| r.rendered.as_str())
        .collect::<Vec<_>>()
        .join("\n\n")
}

pub fn render_analysis(timeframe: Timeframe, analysis: &TimeframeAnalysis) -> String {
    let ind = &analysis.indicators;
    let cls = &analysis.classification;
    format!(
        "[{timeframe}]\n\
         - RSI: {:.1} ({})\n\
         - {}\n\
         - Advice: {}\n\
         - Stop-loss: {:.2} ({})",
        ind.rsi,
        cls.zone,
        crossover_line(cls.crossover, ind.ema9, ind.ema21),
        cls.signal.advice(),
        analysis.stop_loss.price,
        analysis.stop_loss.side,
    )
}

pub fn render_placeholder(timeframe: Timeframe, error: &AnalysisError) -> String {
    match error {
        AnalysisError::NoData(_) => {
            format!("[{timeframe}] No data available - possibly not listed on Binance.")
        }
        AnalysisError::InsufficientData { .. } => format!("[{timeframe}] Insufficient data: {error}."),
        AnalysisError::Timeout(_) => format!("[{timeframe}] Candle {error}."),
    }
}

fn crossover_line(crossover: Crossover, ema9: f64, ema21: f64) -> String {
    let relation = match crossover {
        Crossover::Bullish => ">",
        Crossover::Bearish if ema9 == ema21 => "=",
        Crossover::Bearish => "<",
    };
    format!("{crossover} crossover (EMA9 {relation} EMA21)")
}
