//! Transport-level error types.

use thiserror::Error;

use blockwatch_core::error::SyncError;

use crate::request::JsonRpcError;

/// Errors that can occur while talking to the node.
#[derive(Debug, Error)]
pub enum TransportError {
    /// HTTP request failed (connection refused, timeout, non-2xx status).
    #[error("HTTP error: {0}")]
    Http(String),

    /// JSON-RPC error object returned by the node.
    #[error("RPC error {}: {}", .0.code, .0.message)]
    Rpc(JsonRpcError),

    /// Response body or result could not be deserialized.
    #[error("Deserialization error: {0}")]
    Deserialization(#[from] serde_json::Error),
}

impl TransportError {
    /// Returns `true` if this is a node-side error (the request reached it).
    pub fn is_execution_error(&self) -> bool {
        matches!(self, Self::Rpc(_))
    }
}

impl From<TransportError> for SyncError {
    fn from(e: TransportError) -> Self {
        match e {
            TransportError::Deserialization(inner) => SyncError::Decode(inner.to_string()),
            other => SyncError::Rpc(other.to_string()),
        }
    }
}
