/*!
 * Gateway Error Types
 * Structured, type-safe error handling shared by the file service and proxy
 */

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Gateway operation result
///
/// # Must Use
/// Gateway operations can fail and must be handled at the request boundary
#[must_use = "gateway operations can fail and must be handled"]
pub type GatewayResult<T> = Result<T, GatewayError>;

/// Gateway errors
///
/// Every variant carries only caller-relative context. Absolute filesystem
/// paths never appear in these messages, so they are safe to echo back to
/// HTTP clients verbatim.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case", tag = "error", content = "details")]
pub enum GatewayError {
    #[error("Path escapes root: {0}")]
    PathEscape(String),

    #[error("Hidden path denied: {0}")]
    HiddenPathDenied(String),

    #[error("Not a directory: {0}")]
    NotADirectory(String),

    #[error("Not a file: {0}")]
    NotAFile(String),

    #[error("Unknown root: {0}")]
    RootNotFound(String),

    #[error("No file roots configured")]
    NoRootsConfigured,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Upstream unavailable: {0}")]
    UpstreamUnavailable(String),

    #[error("I/O error: {0}")]
    Io(String),
}

impl GatewayError {
    /// Convert std::io::Error to GatewayError with caller-relative context
    pub fn from_io(e: std::io::Error, context: impl Into<String>) -> Self {
        use std::io::ErrorKind;
        match e.kind() {
            ErrorKind::NotFound => GatewayError::NotFound(context.into()),
            _ => GatewayError::Io(format!("{}: {}", context.into(), e)),
        }
    }
}
