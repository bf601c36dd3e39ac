// =============================================================================
// Multi Time Frame (MTF) Analysis
// =============================================================================
//
// Runs the indicator -> classifier -> stop-loss pipeline on 15m, 30m, 1h and
// 1d candles for a single symbol.
//
// The four fetches are independent and run concurrently, each bounded by
// `fetch_timeout_secs`.  Any per-timeframe failure (no data, too few candles,
// timeout) becomes a placeholder for that timeframe only; the other
// timeframes are still reported, in declaration order.

use std::time::Duration;

use chrono::Utc;
use futures_util::future::join_all;
use tracing::{debug, info, info_span, warn, Instrument};
use uuid::Uuid;

use crate::error::AnalysisError;
use crate::indicators::IndicatorSet;
use crate::market_data::{CandleSeries, CandleSource};
use crate::registry::Symbol;
use crate::report::{AnalysisResult, Report, TimeframeAnalysis};
use crate::runtime_config::RuntimeConfig;
use crate::signals::{classify, stop_loss};
use crate::types::Timeframe;

/// Analyse `symbol` on every timeframe.
///
/// Never fails as a whole: each timeframe's failure is contained in its own
/// `AnalysisResult`.
pub async fn analyze<S: CandleSource>(source: &S, config: &RuntimeConfig, symbol: &Symbol) -> Report {
    let request_id = Uuid::new_v4();
    let span = info_span!("mtf_analysis", symbol = %symbol, %request_id);

    async move {
        let results = join_all(
            Timeframe::ALL
                .iter()
                .map(|&tf| analyze_timeframe(source, config, symbol, tf)),
        )
        .await;

        let analysed = results.iter().filter(|r| r.analysis.is_some()).count();
        info!(analysed, total = results.len(), "MTF analysis complete");

        Report {
            symbol: symbol.clone(),
            request_id,
            generated_at: Utc::now(),
            results,
        }
    }
    .instrument(span)
    .await
}

/// Analyse a single timeframe, turning any failure into a placeholder result.
pub async fn analyze_timeframe<S: CandleSource>(
    source: &S,
    config: &RuntimeConfig,
    symbol: &Symbol,
    timeframe: Timeframe,
) -> AnalysisResult {
    match evaluate(source, config, symbol, timeframe).await {
        Ok(analysis) => {
            debug!(
                timeframe = %timeframe,
                signal = %analysis.classification.signal,
                rsi = format!("{:.2}", analysis.indicators.rsi),
                "timeframe analysed"
            );
            AnalysisResult::analyzed(timeframe, analysis)
        }
        Err(e) => {
            warn!(timeframe = %timeframe, error = %e, "timeframe skipped");
            AnalysisResult::failed(timeframe, &e)
        }
    }
}

async fn evaluate<S: CandleSource>(
    source: &S,
    config: &RuntimeConfig,
    symbol: &Symbol,
    timeframe: Timeframe,
) -> Result<TimeframeAnalysis, AnalysisError> {
    let fetch = source.fetch_candles(symbol.as_str(), timeframe, config.candle_limit);

    // Dropping the fetch future on timeout cancels the request.
    let candles = match tokio::time::timeout(Duration::from_secs(config.fetch_timeout_secs), fetch).await {
        Err(_) => return Err(AnalysisError::Timeout(config.fetch_timeout_secs)),
        Ok(Err(e)) => return Err(fetch_error(e, config.fetch_timeout_secs)),
        Ok(Ok(candles)) => candles,
    };

    let series = CandleSeries::new(candles)?;
    let indicators = IndicatorSet::compute(&series, config)?;
    let classification = classify(&indicators);
    let latest_low = series.latest().low;

    Ok(TimeframeAnalysis {
        indicators,
        classification,
        stop_loss: stop_loss(classification.signal, latest_low),
        latest_low,
        candles: series.len(),
    })
}

/// A transport deadline inside the gateway is still a timeout, not missing data.
fn fetch_error(e: anyhow::Error, timeout_secs: u64) -> AnalysisError {
    let timed_out = e
        .chain()
        .any(|cause| cause.downcast_ref::<reqwest::Error>().is_some_and(reqwest::Error::is_timeout));
    if timed_out {
        AnalysisError::Timeout(timeout_secs)
    } else {
        AnalysisError::NoData(format!("{e:#}"))
    }
}
