// =============================================================================
// Symbol Registry — immutable snapshot of tradable symbols
// =============================================================================
//
// A `SymbolRegistry` is built once per load and never mutated.  Readers clone
// the `Arc` out of `RegistryHandle` and resolve against that snapshot; a
// refresh swaps in a whole new snapshot.
//
// Resolution rules:
//   - input is trimmed and uppercased
//   - 4 characters or fewer: treated as a base asset, quote suffix appended
//   - longer: checked as a full pair
// =============================================================================

use std::collections::HashSet;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::Serialize;
use tracing::{info, warn};

use crate::error::ResolveError;
use crate::market_data::SymbolSource;

/// Tickers up to this length are treated as a base asset.
const MAX_BASE_ASSET_LEN: usize = 4;

// =============================================================================
// Symbol
// =============================================================================

/// Canonical, registry-validated trading pair (e.g. "BTCUSDT").
///
/// Only `SymbolRegistry::resolve` can construct one.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Symbol(String);

impl Symbol {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Symbol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

// =============================================================================
// SymbolRegistry
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum RegistryStatus {
    Loaded,
    Unavailable { reason: String },
}

#[derive(Debug, Clone)]
pub struct SymbolRegistry {
    symbols: HashSet<String>,
    quote_asset: String,
    status: RegistryStatus,
    loaded_at: DateTime<Utc>,
}

impl SymbolRegistry {
    /// Build a loaded snapshot from known symbol strings.
    pub fn from_symbols<I, S>(symbols: I, quote_asset: &str) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            symbols: symbols
                .into_iter()
                .map(|s| s.as_ref().trim().to_uppercase())
                .filter(|s| !s.is_empty())
                .collect(),
            quote_asset: quote_asset.trim().to_uppercase(),
            status: RegistryStatus::Loaded,
            loaded_at: Utc::now(),
        }
    }

    /// Empty snapshot recording why the symbol list could not be loaded.
    pub fn unavailable(reason: impl Into<String>, quote_asset: &str) -> Self {
        Self {
            symbols: HashSet::new(),
            quote_asset: quote_asset.trim().to_uppercase(),
            status: RegistryStatus::Unavailable {
                reason: reason.into(),
            },
            loaded_at: Utc::now(),
        }
    }

    /// Fetch the symbol list from `source`.
    ///
    /// Never fails: a transport error yields an `Unavailable` snapshot on which
    /// every resolution reports `RegistryUnavailable`.
    pub async fn load<S: SymbolSource>(source: &S, quote_asset: &str) -> Self {
        match source.fetch_symbols().await {
            Ok(symbols) => {
                let registry = Self::from_symbols(symbols, quote_asset);
                info!(count = registry.len(), "symbol registry loaded");
                registry
            }
            Err(e) => {
                warn!(error = %e, "symbol registry unavailable");
                Self::unavailable(format!("{e:#}"), quote_asset)
            }
        }
    }

    /// Validate and canonicalise a user-supplied ticker.
    pub fn resolve(&self, input: &str) -> Result<Symbol, ResolveError> {
        let ticker = input.trim().to_uppercase();
        if ticker.is_empty() {
            return Err(ResolveError::EmptyInput);
        }

        if let RegistryStatus::Unavailable { reason } = &self.status {
            return Err(ResolveError::RegistryUnavailable(reason.clone()));
        }

        let candidate = if ticker.chars().count() <= MAX_BASE_ASSET_LEN {
            format!("{ticker}{}", self.quote_asset)
        } else {
            ticker.clone()
        };

        if self.contains(&candidate) {
            Ok(Symbol(candidate))
        } else {
            Err(ResolveError::UnknownSymbol(ticker))
        }
    }

    pub fn contains(&self, symbol: &str) -> bool {
        self.symbols.contains(symbol)
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    pub fn status(&self) -> &RegistryStatus {
        &self.status
    }

    pub fn is_loaded(&self) -> bool {
        self.status == RegistryStatus::Loaded
    }

    pub fn loaded_at(&self) -> DateTime<Utc> {
        self.loaded_at
    }
}

// =============================================================================
// RegistryHandle — swap point for snapshots
// =============================================================================

/// Holds the current snapshot.  The lock is only held to clone or replace the
/// `Arc`, never across a resolution or a network call.
pub struct RegistryHandle {
    current: RwLock<Arc<SymbolRegistry>>,
}

impl RegistryHandle {
    pub fn new(initial: SymbolRegistry) -> Self {
        Self {
            current: RwLock::new(Arc::new(initial)),
        }
    }

    pub fn snapshot(&self) -> Arc<SymbolRegistry> {
        self.current.read().clone()
    }

    /// Reload from `source` and publish the result.
    ///
    /// A failed reload keeps a previously loaded snapshot.  Returns the
    /// snapshot in effect afterwards.
    pub async fn refresh<S: SymbolSource>(&self, source: &S) -> Arc<SymbolRegistry> {
        let quote_asset = self.snapshot().quote_asset.clone();
        let fresh = SymbolRegistry::load(source, &quote_asset).await;

        let mut current = self.current.write();
        if !fresh.is_loaded() && current.is_loaded() {
            warn!(
                kept = current.len(),
                "registry refresh failed, keeping previous snapshot"
            );
        } else {
            *current = Arc::new(fresh);
        }
        Arc::clone(&current)
    }
}
