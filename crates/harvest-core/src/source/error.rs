//! Fetch error type for classification and per-task failure logs.

use thiserror::Error;

/// Error returned by one page request. Any of these aborts the whole task.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Curl reported an error (timeout, connection, etc.).
    #[error("transport: {0}")]
    Transport(#[from] curl::Error),
    /// HTTP response had a non-2xx status.
    #[error("HTTP {0}")]
    Http(u32),
    /// Request body could not be encoded or response body could not be decoded.
    #[error("decode: {0}")]
    Decode(#[from] serde_json::Error),
}
