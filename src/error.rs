// =============================================================================
// Error kinds surfaced by symbol resolution and per-timeframe analysis
// =============================================================================

use thiserror::Error;

/// Why a user-supplied ticker could not be turned into a tradable symbol.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    #[error("no ticker given")]
    EmptyInput,
    #[error("no trading pairs found for {0}")]
    UnknownSymbol(String),
    #[error("symbol list unavailable: {0}")]
    RegistryUnavailable(String),
}

/// Failure of a single timeframe. Always contained by the orchestrator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnalysisError {
    #[error("no data: {0}")]
    NoData(String),
    #[error("{indicator} needs {required} candles, got {available}")]
    InsufficientData {
        indicator: &'static str,
        required: usize,
        available: usize,
    },
    #[error("fetch timed out after {0}s")]
    Timeout(u64),
}
