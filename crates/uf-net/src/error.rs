//! Network-subsystem error type.

use thiserror::Error;

/// Errors produced by `uf-net`.
#[derive(Debug, Error)]
pub enum NetError {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("GeoJSON parse error: {0}")]
    GeoJson(String),
}

pub type NetResult<T> = Result<T, NetError>;
