// =============================================================================
// Runtime Configuration — analyst settings loaded from JSON
// =============================================================================
//
// All fields carry `#[serde(default)]` so that a partial (or empty) config file
// still loads.  The timeframe set and signal thresholds are fixed and do not
// live here.
// =============================================================================

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

// =============================================================================
// Default-value helpers (required by serde `default = "..."` attribute)
// =============================================================================

fn default_base_url() -> String {
    "https://api.binance.com".to_string()
}

fn default_quote_asset() -> String {
    "USDT".to_string()
}

fn default_candle_limit() -> u32 {
    100
}

fn default_rsi_period() -> usize {
    14
}

fn default_ema_fast_period() -> usize {
    9
}

fn default_ema_slow_period() -> usize {
    21
}

fn default_fetch_timeout_secs() -> u64 {
    10
}

fn default_http_timeout_secs() -> u64 {
    30
}

fn default_registry_refresh_secs() -> u64 {
    3600
}

fn default_bind_addr() -> String {
    "0.0.0.0:3001".to_string()
}

// =============================================================================
// RuntimeConfig
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuntimeConfig {
    // --- Exchange ------------------------------------------------------------

    /// REST base endpoint of the exchange.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Quote asset appended to short tickers ("BTC" -> "BTCUSDT").
    #[serde(default = "default_quote_asset")]
    pub quote_asset: String,

    /// Candles requested per timeframe.
    #[serde(default = "default_candle_limit")]
    pub candle_limit: u32,

    // --- Indicators ----------------------------------------------------------

    #[serde(default = "default_rsi_period")]
    pub rsi_period: usize,

    #[serde(default = "default_ema_fast_period")]
    pub ema_fast_period: usize,

    #[serde(default = "default_ema_slow_period")]
    pub ema_slow_period: usize,

    // --- Runtime -------------------------------------------------------------

    /// Upper bound on a single timeframe's candle fetch.
    #[serde(default = "default_fetch_timeout_secs")]
    pub fetch_timeout_secs: u64,

    /// Client-wide HTTP deadline. Bounds the exchangeInfo download and must
    /// outlast `fetch_timeout_secs` so a stalled candle fetch is reported as
    /// a timeout by the orchestrator.
    #[serde(default = "default_http_timeout_secs")]
    pub http_timeout_secs: u64,

    /// Interval between symbol registry refreshes. Zero disables the task.
    #[serde(default = "default_registry_refresh_secs")]
    pub registry_refresh_secs: u64,

    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            quote_asset: default_quote_asset(),
            candle_limit: default_candle_limit(),
            rsi_period: default_rsi_period(),
            ema_fast_period: default_ema_fast_period(),
            ema_slow_period: default_ema_slow_period(),
            fetch_timeout_secs: default_fetch_timeout_secs(),
            http_timeout_secs: default_http_timeout_secs(),
            registry_refresh_secs: default_registry_refresh_secs(),
            bind_addr: default_bind_addr(),
        }
    }
}

impl RuntimeConfig {
    /// Load and validate configuration from a JSON file at `path`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read runtime config from {}", path.display()))?;

        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse runtime config from {}", path.display()))?;

        config.validate()?;

        info!(
            path = %path.display(),
            base_url = %config.base_url,
            candle_limit = config.candle_limit,
            "runtime config loaded"
        );

        Ok(config)
    }

    /// Like [`load`](Self::load), but a missing file yields the defaults.
    ///
    /// A file that exists and fails to parse or validate is still an error.
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        match std::fs::metadata(path) {
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                warn!(path = %path.display(), "runtime config not found, using defaults");
                Ok(Self::default())
            }
            _ => Self::load(path),
        }
    }

    /// Apply `MTF_*` environment overrides on top of the loaded values.
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(
            std::env::var("MTF_BASE_URL").ok().as_deref(),
            std::env::var("MTF_BIND_ADDR").ok().as_deref(),
        );
    }

    /// Blank values are ignored; the base URL loses any trailing slash.
    fn apply_overrides(&mut self, base_url: Option<&str>, bind_addr: Option<&str>) {
        if let Some(url) = base_url.map(|u| u.trim().trim_end_matches('/')) {
            if !url.is_empty() {
                self.base_url = url.to_string();
            }
        }
        if let Some(addr) = bind_addr.map(str::trim) {
            if !addr.is_empty() {
                self.bind_addr = addr.to_string();
            }
        }
    }

    /// Smallest candle count that can feed every indicator.
    pub fn min_candles(&self) -> usize {
        (self.rsi_period + 1)
            .max(self.ema_fast_period)
            .max(self.ema_slow_period)
    }

    /// Reject settings under which no timeframe could ever be analysed.
    pub fn validate(&self) -> Result<()> {
        if self.rsi_period == 0 || self.ema_fast_period == 0 || self.ema_slow_period == 0 {
            anyhow::bail!("indicator periods must be non-zero");
        }
        if self.fetch_timeout_secs == 0 {
            anyhow::bail!("fetch_timeout_secs must be non-zero");
        }
        if self.http_timeout_secs <= self.fetch_timeout_secs {
            anyhow::bail!(
                "http_timeout_secs ({}) must exceed fetch_timeout_secs ({})",
                self.http_timeout_secs,
                self.fetch_timeout_secs
            );
        }
        if (self.candle_limit as usize) < self.min_candles() {
            anyhow::bail!(
                "candle_limit {} is below the {} candles the indicators need",
                self.candle_limit,
                self.min_candles()
            );
        }
        if self.quote_asset.trim().is_empty() {
            anyhow::bail!("quote_asset must not be empty");
        }
        Ok(())
    }
}

// =============================================================================
// Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_has_expected_values() {
        let cfg = RuntimeConfig::default();
        assert_eq!(cfg.base_url, "https://api.binance.com");
        assert_eq!(cfg.quote_asset, "USDT");
        assert_eq!(cfg.candle_limit, 100);
        assert_eq!(cfg.rsi_period, 14);
        assert_eq!(cfg.ema_fast_period, 9);
        assert_eq!(cfg.ema_slow_period, 21);
        assert_eq!(cfg.min_candles(), 21);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn deserialise_empty_json_uses_defaults() {
        let cfg: RuntimeConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(cfg.candle_limit, 100);
        assert_eq!(cfg.fetch_timeout_secs, 10);
        assert_eq!(cfg.bind_addr, "0.0.0.0:3001");
    }

    #[test]
    fn deserialise_partial_json_fills_defaults() {
        let json = r#"{ "candle_limit": 250, "quote_asset": "BUSD" }"#;
        let cfg: RuntimeConfig = serde_json::from_str(json).unwrap();
        assert_eq!(cfg.candle_limit, 250);
        assert_eq!(cfg.quote_asset, "BUSD");
        assert_eq!(cfg.rsi_period, 14);
    }

    #[test]
    fn validate_rejects_short_candle_limit() {
        let cfg = RuntimeConfig {
            candle_limit: 20,
            ..RuntimeConfig::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn validate_rejects_zero_period() {
        let cfg = RuntimeConfig {
            rsi_period: 0,
            ..RuntimeConfig::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn validate_rejects_http_timeout_not_above_fetch_timeout() {
        let cfg = RuntimeConfig {
            fetch_timeout_secs: 10,
            http_timeout_secs: 10,
            ..RuntimeConfig::default()
        };
        assert!(cfg.validate().is_err());
    }

    fn temp_config(contents: &str) -> std::path::PathBuf {
        let path = std::env::temp_dir().join(format!("mtf-config-{}.json", uuid::Uuid::new_v4()));
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn load_missing_file_is_error() {
        assert!(RuntimeConfig::load("/nonexistent/runtime_config.json").is_err());
    }

    #[test]
    fn load_or_default_falls_back_only_for_missing_file() {
        let cfg = RuntimeConfig::load_or_default("/nonexistent/runtime_config.json").unwrap();
        assert_eq!(cfg.candle_limit, 100);

        let path = temp_config(r#"{ "candle_limit": 150 }"#);
        assert_eq!(RuntimeConfig::load_or_default(&path).unwrap().candle_limit, 150);
        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn load_or_default_rejects_invalid_file() {
        let path = temp_config(r#"{ "candle_limit": 5 }"#);
        assert!(RuntimeConfig::load_or_default(&path).is_err());
        std::fs::remove_file(&path).unwrap();

        let path = temp_config("{ not json");
        assert!(RuntimeConfig::load_or_default(&path).is_err());
        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn overrides_trim_trailing_slash() {
        let mut cfg = RuntimeConfig::default();
        cfg.apply_overrides(Some(" http://127.0.0.1:8080/ "), Some(" 127.0.0.1:4000 "));
        assert_eq!(cfg.base_url, "http://127.0.0.1:8080");
        assert_eq!(cfg.bind_addr, "127.0.0.1:4000");
    }

    #[test]
    fn blank_overrides_are_ignored() {
        let mut cfg = RuntimeConfig::default();
        cfg.apply_overrides(Some("  "), Some(""));
        assert_eq!(cfg.base_url, "https://api.binance.com");
        assert_eq!(cfg.bind_addr, "0.0.0.0:3001");

        cfg.apply_overrides(Some("/"), None);
        assert_eq!(cfg.base_url, "https://api.binance.com");
    }
}
