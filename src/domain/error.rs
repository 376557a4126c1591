//! Error types for seer domain and client operations.
//!
//! Failures from the primary transfer fetch are surfaced to the user, so every
//! variant renders a message that can be shown directly in the error banner.

use thiserror::Error;

// ============================================================================
// Error Types
// ============================================================================

/// Custom error type for seer client operations.
#[derive(Debug, Error)]
pub enum SeerError {
    /// Network-related errors from HTTP requests.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// JSON parsing or data structure errors.
    #[error("Parse error: {message}")]
    Parse {
        /// Description of what failed to parse.
        message: String,
    },

    /// Upstream answered with a non-success status.
    #[error("{message}")]
    Upstream {
        /// HTTP status code returned by the upstream service.
        status: u16,
        /// Upstream message, or `HTTP <status>` when the body carried none.
        message: String,
    },

    /// JSON-RPC level error object.
    #[error("RPC error {code}: {message}")]
    Rpc {
        /// JSON-RPC error code.
        code: i64,
        /// JSON-RPC error message.
        message: String,
    },

    /// The HTTP client could not be constructed.
    #[error("Failed to initialize HTTP client: {0}")]
    ClientInit(String),
}

impl SeerError {
    /// Create a new parse error with the given message.
    #[must_use]
    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse {
            message: message.into(),
        }
    }

    /// Create an upstream error, falling back to `HTTP <status>` for an empty message.
    #[must_use]
    pub fn upstream(status: u16, message: Option<String>) -> Self {
        let message = message
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| format!("HTTP {status}"));
        Self::Upstream { status, message }
    }


    /// Create a new client initialization error.
    #[must_use]
    pub fn client_init(message: impl Into<String>) -> Self {
        Self::ClientInit(message.into())
    }

    /// Convert to a `color_eyre::Report`.
    #[must_use = "this converts the error into a Report for display"]
    pub fn into_report(self) -> color_eyre::Report {
        color_eyre::eyre::eyre!("{}", self)
    }
}

// ============================================================================
// Tests
// ============================================================================
