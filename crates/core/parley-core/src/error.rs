//! Error types for Parley

use thiserror::Error;

/// Main error type for Parley operations
#[derive(Debug, Error)]
pub enum ParleyError {
    /// Network/HTTP error
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// Authentication/authorization error
    #[error("Auth error: {0}")]
    Auth(String),

    /// Not found error (generic)
    #[error("Not found: {0}")]
    NotFound(String),

    /// Timeout error
    #[error("Timeout: {0}")]
    Timeout(String),

    /// Runtime error
    #[error("Runtime error: {0}")]
    Runtime(String),

    /// Error reported by a backend function
    #[error("Backend error in '{function}': {message}")]
    Backend {
        /// Function path that failed (e.g. `public/organizations:validate`)
        function: String,
        /// Application error code, when the backend supplied one
        code: Option<String>,
        /// Error message
        message: String,
    },

    /// Generic error with context
    #[error("{0}")]
    Other(String),
}

/// Convenient Result type using ParleyError
pub type Result<T> = std::result::Result<T, ParleyError>;

impl ParleyError {
    /// Create a config error
    pub fn config(msg: impl Into<String>) -> Self {
        ParleyError::Config(msg.into())
    }

    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        ParleyError::Validation(msg.into())
    }

    /// Create an auth error
    pub fn auth(msg: impl Into<String>) -> Self {
        ParleyError::Auth(msg.into())
    }

    /// Create a not found error
    pub fn not_found(msg: impl Into<String>) -> Self {
        ParleyError::NotFound(msg.into())
    }

    /// Create a timeout error
    pub fn timeout(msg: impl Into<String>) -> Self {
        ParleyError::Timeout(msg.into())
    }

    /// Create a runtime error
    pub fn runtime(msg: impl Into<String>) -> Self {
        ParleyError::Runtime(msg.into())
    }

    /// Create a backend function error
    pub fn backend(
        function: impl Into<String>,
        code: Option<String>,
        message: impl Into<String>,
    ) -> Self {
        ParleyError::Backend {
            function: function.into(),
            code,
            message: message.into(),
        }
    }

    /// Create a generic error
    pub fn other(msg: impl Into<String>) -> Self {
        ParleyError::Other(msg.into())
    }

    /// Whether the error came from the transport rather than the application
    pub fn is_transport(&self) -> bool {
        matches!(self, ParleyError::Network(_) | ParleyError::Timeout(_))
    }
}
