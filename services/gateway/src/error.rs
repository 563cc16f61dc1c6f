//! services/gateway/src/error.rs
//!
//! Defines the primary error type for the entire gateway service.

use crate::config::ConfigError;

/// The primary error type for the `gateway` service.
///
/// Backend failures during a chat turn never surface through this type:
/// handlers degrade them to user-visible notices. `ApiError` covers the
/// failures that can only happen at startup.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Represents an error that occurred during configuration loading.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Represents a standard Input/Output error (e.g., binding to a network socket).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
