//! Proxy error types

use thiserror::Error;

/// Proxy errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProxyError {
    #[error("composition failed: non-function transform argument ({found} at position {position})")]
    InvalidArgument {
        /// Zero-based index in the argument list
        position: usize,
        /// Kind of value found there
        found: &'static str,
    },

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type for proxy operations
pub type ProxyResult<T> = Result<T, ProxyError>;
