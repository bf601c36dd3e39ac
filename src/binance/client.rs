// =============================================================================
// Binance REST API Client — public market data endpoints
// =============================================================================
//
// Only unsigned endpoints are used: exchangeInfo for the symbol registry and
// klines for candle history.  Every request is bounded by the client-wide
// timeout configured at construction, which sits above the orchestrator's
// per-fetch bound.
// =============================================================================

use std::time::Duration;

use anyhow::{Context, Result};
use tracing::{debug, instrument, warn};

use crate::market_data::{Candle, CandleSource, SymbolSource};
use crate::types::Timeframe;

/// Binance public REST client.
#[derive(Clone)]
pub struct BinanceClient {
    base_url: String,
    client: reqwest::Client,
}

impl BinanceClient {
    // -------------------------------------------------------------------------
    // Construction
    // -------------------------------------------------------------------------

    /// Create a new `BinanceClient` against `base_url` (no trailing slash).
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let base_url = base_url.into();

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("failed to build reqwest client")?;

        debug!(base_url = %base_url, ?timeout, "BinanceClient initialised");

        Ok(Self { base_url, client })
    }

    // -------------------------------------------------------------------------
    // Public market data
    // -------------------------------------------------------------------------

    /// GET /api/v3/exchangeInfo — every symbol currently in `TRADING` status.
    #[instrument(skip(self), name = "binance::get_trading_symbols")]
    pub async fn get_trading_symbols(&self) -> Result<Vec<String>> {
        let url = format!("{}/api/v3/exchangeInfo", self.base_url);
        let body = self.get_json(&url, "/api/v3/exchangeInfo").await?;
        let symbols = parse_symbols(&body)?;
        debug!(count = symbols.len(), "exchange symbols retrieved");
        Ok(symbols)
    }

    /// GET /api/v3/klines (public — no signature required).
    ///
    /// Returns a vector of [`Candle`] structs parsed from Binance's array-of-
    /// arrays response format.
    #[instrument(skip(self), name = "binance::get_klines")]
    pub async fn get_klines(
        &self,
        symbol: &str,
        interval: &str,
        limit: u32,
    ) -> Result<Vec<Candle>> {
        let url = format!(
            "{}/api/v3/klines?symbol={}&interval={}&limit={}",
            self.base_url, symbol, interval, limit
        );
        let body = self.get_json(&url, "/api/v3/klines").await?;
        let candles = parse_klines(&body)?;
        debug!(symbol, interval, count = candles.len(), "klines fetched");
        Ok(candles)
    }

    // -------------------------------------------------------------------------
    // Internal helpers
    // -------------------------------------------------------------------------

    async fn get_json(&self, url: &str, endpoint: &str) -> Result<serde_json::Value> {
        let resp = self
            .client
            .get(url)
            .send()
            .await
            .with_context(|| format!("GET {endpoint} request failed"))?;

        let status = resp.status();
        let body: serde_json::Value = resp
            .json()
            .await
            .with_context(|| format!("failed to parse {endpoint} response"))?;

        if !status.is_success() {
            anyhow::bail!("Binance GET {} returned {}: {}", endpoint, status, body);
        }

        Ok(body)
    }
}

impl SymbolSource for BinanceClient {
    async fn fetch_symbols(&self) -> Result<Vec<String>> {
        self.get_trading_symbols().await
    }
}

impl CandleSource for BinanceClient {
    async fn fetch_candles(
        &self,
        symbol: &str,
        timeframe: Timeframe,
        limit: u32,
    ) -> Result<Vec<Candle>> {
        self.get_klines(symbol, timeframe.code(), limit).await
    }
}

impl std::fmt::Debug for BinanceClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BinanceClient")
            .field("base_url", &self.base_url)
            .finish()
    }
}

// =============================================================================
// Response parsing
// =============================================================================

/// Extract symbol names from an exchangeInfo body.  Entries without a
/// `status` field are kept.
fn parse_symbols(body: &serde_json::Value) -> Result<Vec<String>> {
    let raw = body["symbols"]
        .as_array()
        .context("exchangeInfo response missing 'symbols' array")?;

    Ok(raw
        .iter()
        .filter(|s| s["status"].as_str().map_or(true, |st| st == "TRADING"))
        .filter_map(|s| s["symbol"].as_str())
        .map(str::to_string)
        .collect())
}

/// Parse a klines body.
///
/// Array indices:
///   [0] openTime, [1] open, [2] high, [3] low, [4] close, [5] volume,
///   [6] closeTime, [7..] quote volume / trade counts (unused)
fn parse_klines(body: &serde_json::Value) -> Result<Vec<Candle>> {
    let raw = body.as_array().context("klines response is not an array")?;

    let mut candles = Vec::with_capacity(raw.len());

    for entry in raw {
        let arr = entry.as_array().context("kline entry is not an array")?;

        if arr.len() < 7 {
            warn!("skipping malformed kline entry with {} elements", arr.len());
            continue;
        }

        let open_time = arr[0]
            .as_i64()
            .with_context(|| format!("kline openTime is not an integer: {}", arr[0]))?;
        let open = parse_str_f64(&arr[1])?;
        let high = parse_str_f64(&arr[2])?;
        let low = parse_str_f64(&arr[3])?;
        let close = parse_str_f64(&arr[4])?;
        let volume = parse_str_f64(&arr[5])?;
        let close_time = arr[6]
            .as_i64()
            .with_context(|| format!("kline closeTime is not an integer: {}", arr[6]))?;

        candles.push(Candle::new(open_time, open, high, low, close, volume, close_time));
    }

    Ok(candles)
}

/// Parse a JSON value that may be either a string or a number into a finite
/// `f64`.  "NaN" and "inf" strings are rejected.
fn parse_str_f64(val: &serde_json::Value) -> Result<f64> {
    let n = if let Some(s) = val.as_str() {
        s.parse::<f64>()
            .with_context(|| format!("failed to parse '{s}' as f64"))?
    } else if let Some(n) = val.as_f64() {
        n
    } else {
        anyhow::bail!("expected string or number, got: {val}")
    };

    if !n.is_finite() {
        anyhow::bail!("non-finite price value: {val}");
    }
    Ok(n)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_kline_arrays() {
        let body = json!([
            [1700000000000_i64, "100.0", "110.0", "95.5", "105.25", "12.5", 1700000899999_i64,
             "1300.0", 42, "6.0", "630.0", "0"],
            [1700000900000_i64, "105.25", "106.0", "101.0", "102.0", "3", 1700001799999_i64,
             "300.0", 7, "1.0", "100.0", "0"]
        ]);
        let candles = parse_klines(&body).unwrap();
        assert_eq!(candles.len(), 2);
        assert_eq!(candles[0].open_time, 1_700_000_000_000);
        assert!((candles[0].low - 95.5).abs() < 1e-12);
        assert!((candles[0].close - 105.25).abs() < 1e-12);
        assert!((candles[1].volume - 3.0).abs() < 1e-12);
    }

    #[test]
    fn skips_short_kline_entries() {
        let body = json!([[1, "1", "1", "1"]]);
        assert!(parse_klines(&body).unwrap().is_empty());
    }

    #[test]
    fn rejects_non_numeric_price() {
        let body = json!([[1, "abc", "1", "1", "1", "1", 2]]);
        assert!(parse_klines(&body).is_err());
    }

    #[test]
    fn rejects_missing_or_fractional_open_time() {
        let body = json!([[null, "1", "1", "1", "1", "1", 2]]);
        let err = parse_klines(&body).unwrap_err();
        assert!(format!("{err:#}").contains("openTime"), "{err:#}");

        let body = json!([[1.5, "1", "1", "1", "1", "1", 2]]);
        assert!(parse_klines(&body).is_err());
    }

    #[test]
    fn rejects_missing_close_time() {
        let body = json!([[1, "1", "1", "1", "1", "1", "later"]]);
        let err = parse_klines(&body).unwrap_err();
        assert!(format!("{err:#}").contains("closeTime"), "{err:#}");
    }

    #[test]
    fn rejects_non_finite_close() {
        let body = json!([[1, "1", "1", "1", "NaN", "1", 2]]);
        assert!(parse_klines(&body).is_err());
        assert!(parse_str_f64(&json!("inf")).is_err());
        assert!(parse_str_f64(&json!("-infinity")).is_err());
    }

    #[test]
    fn rejects_error_object_as_klines() {
        let body = json!({ "code": -1121, "msg": "Invalid symbol." });
        assert!(parse_klines(&body).is_err());
    }

    #[test]
    fn parses_trading_symbols_only() {
        let body = json!({
            "symbols": [
                { "symbol": "BTCUSDT", "status": "TRADING" },
                { "symbol": "LUNAUSDT", "status": "BREAK" },
                { "symbol": "ETHUSDT" }
            ]
        });
        assert_eq!(parse_symbols(&body).unwrap(), vec!["BTCUSDT", "ETHUSDT"]);
    }

    #[test]
    fn missing_symbols_array_is_error() {
        assert!(parse_symbols(&json!({})).is_err());
    }

    #[test]
    fn parse_str_f64_accepts_numbers_and_strings() {
        assert_eq!(parse_str_f64(&json!("1.5")).unwrap(), 1.5);
        assert_eq!(parse_str_f64(&json!(2.5)).unwrap(), 2.5);
        assert!(parse_str_f64(&json!(null)).is_err());
    }
}
