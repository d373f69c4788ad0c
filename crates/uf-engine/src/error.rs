//! Engine error type.

use thiserror::Error;

/// Errors surfaced by `uf-engine`'s fallible entry points.
///
/// Only ingestion can fail; the recompute pipeline itself is never fatal —
/// it falls back to the previously published snapshot instead.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("network ingestion failed: {0}")]
    Ingest(#[from] uf_net::NetError),
}

pub type EngineResult<T> = Result<T, EngineError>;
