//! Error types for doorstep-core

use std::collections::HashMap;

use thiserror::Error;

/// Result type alias using doorstep-core's `ApiError`
pub type ApiResult<T> = std::result::Result<T, ApiError>;

/// Normalized outcome of any call against the remote marketplace API.
///
/// Validation errors are field-scoped and rendered inline next to the
/// offending input; everything else is action-scoped. An `Authorization`
/// error is never shown raw to the user: it is consumed either by the
/// refresh interceptor or the deferred-action gate.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Per-field validation problems reported by the server (or by a local
    /// pre-check that exists purely to avoid a round trip).
    #[error("Validation failed")]
    Validation {
        field_errors: HashMap<String, Vec<String>>,
    },

    /// Any other non-2xx response, carrying the server's message.
    #[error("{message}")]
    General { message: String },

    /// The server rate-limited the request (HTTP 429).
    #[error("{message}")]
    RateLimited { message: String },

    /// Transport-level failure; no response was received.
    #[error("Could not reach the server. Check your connection.")]
    Network(#[from] reqwest::Error),

    /// HTTP 401-equivalent. Recovered close to the origin, never surfaced.
    #[error("Not authorized")]
    Authorization,

    /// Durable client storage failed.
    #[error("Client storage error: {0}")]
    Storage(String),

    /// The user dismissed an inline sign-in prompt; aborts silently.
    #[error("Cancelled by user")]
    Cancelled,
}

impl ApiError {
    /// Build a `General` error from any message.
    pub fn general(message: impl Into<String>) -> Self {
        Self::General {
            message: message.into(),
        }
    }

    /// Build a `Validation` error for a single field.
    pub fn field(name: impl Into<String>, message: impl Into<String>) -> Self {
        let mut field_errors = HashMap::new();
        field_errors.insert(name.into(), vec![message.into()]);
        Self::Validation { field_errors }
    }

    #[must_use]
    pub const fn is_authorization(&self) -> bool {
        matches!(self, Self::Authorization)
    }

    #[must_use]
    pub const fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}
