// =============================================================================
// Central Application State
// =============================================================================
//
// Shared across the HTTP handlers and background tasks via `Arc<AppState>`.
//
// Thread safety:
//   - The registry is an immutable snapshot behind `RegistryHandle`.
//   - The runtime config is fixed after startup and shared read-only.
//   - Atomic counters for lock-free request statistics.
// =============================================================================

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tracing::info;

use crate::market_data::{CandleSource, SymbolSource};
use crate::mtf_analysis;
use crate::registry::{RegistryHandle, Symbol, SymbolRegistry};
use crate::report::Report;
use crate::runtime_config::RuntimeConfig;

/// Central application state, generic over the exchange gateway so tests can
/// plug in an in-memory source.
pub struct AppState<S> {
    pub runtime_config: Arc<RuntimeConfig>,
    pub registry: RegistryHandle,
    pub exchange: Arc<S>,

    /// Completed multi-timeframe analyses since startup.
    pub analyses_served: AtomicU64,
}

impl<S> AppState<S>
where
    S: SymbolSource + CandleSource,
{
    pub fn new(config: RuntimeConfig, exchange: Arc<S>, registry: SymbolRegistry) -> Self {
        Self {
            runtime_config: Arc::new(config),
            registry: RegistryHandle::new(registry),
            exchange,
            analyses_served: AtomicU64::new(0),
        }
    }

    /// Load the initial registry from `exchange` and build the state.
    pub async fn bootstrap(config: RuntimeConfig, exchange: Arc<S>) -> Self {
        let registry = SymbolRegistry::load(exchange.as_ref(), &config.quote_asset).await;
        info!(
            symbols = registry.len(),
            loaded = registry.is_loaded(),
            "application state ready"
        );
        Self::new(config, exchange, registry)
    }

    /// Run the multi-timeframe analysis for an already-resolved symbol.
    pub async fn analyze(&self, symbol: &Symbol) -> Report {
        let report = mtf_analysis::analyze(self.exchange.as_ref(), &self.runtime_config, symbol).await;
        self.analyses_served.fetch_add(1, Ordering::Relaxed);
        report
    }

    pub async fn refresh_registry(&self) -> Arc<SymbolRegistry> {
        self.registry.refresh(self.exchange.as_ref()).await
    }

    pub fn analyses_served(&self) -> u64 {
        self.analyses_served.load(Ordering::Relaxed)
    }
}
