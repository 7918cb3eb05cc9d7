//! Error taxonomy for everything that talks to the Spotify Web API.

use serde_json::{Value, json};
use thiserror::Error;

/// Result alias used throughout the library.
pub type Result<T> = std::result::Result<T, SpotifyError>;

/// Errors surfaced by the request dispatcher and the owning client.
#[derive(Error, Debug)]
pub enum SpotifyError {
    /// No connection pool, no usable token, invalid preferences or an
    /// unsupported method. Raised before any network traffic.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The API answered 401 and no renewal was possible (or it was already used).
    #[error("Token expired: {0}")]
    TokenExpired(Value),

    /// The API answered 429. Backoff is left to the caller.
    #[error("Rate limit exceeded: {0}")]
    RateLimitExceeded(Value),

    /// Any other non-success status from the Web API.
    #[error("Spotify API error (status {status}): {payload}")]
    Api { status: u16, payload: Value },

    /// The accounts token endpoint refused a code exchange or refresh.
    #[error("Authorization failed (status {status}): {payload}")]
    Authorization { status: u16, payload: Value },

    /// Timeout, refused connection, TLS failure. No response was received.
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),
}

impl SpotifyError {
    /// Builds a message-only error payload in the same shape Spotify uses.
    pub fn message_payload(status: u16, message: impl Into<String>) -> Value {
        json!({ "error": { "status": status, "message": message.into() } })
    }

    /// Returns the API payload carried by this error, or a synthesized one.
    pub fn payload(&self) -> Value {
        match self {
            SpotifyError::TokenExpired(payload) | SpotifyError::RateLimitExceeded(payload) => {
                payload.clone()
            }
            SpotifyError::Api { payload, .. } | SpotifyError::Authorization { payload, .. } => {
                payload.clone()
            }
            SpotifyError::Configuration(message) => Self::message_payload(0, message.as_str()),
            SpotifyError::Transport(err) => Self::message_payload(
                err.status().map(|s| s.as_u16()).unwrap_or(0),
                err.to_string(),
            ),
        }
    }

    /// HTTP status associated with the error, when one was received.
    pub fn status(&self) -> Option<u16> {
        match self {
            SpotifyError::TokenExpired(_) => Some(401),
            SpotifyError::RateLimitExceeded(_) => Some(429),
            SpotifyError::Api { status, .. } | SpotifyError::Authorization { status, .. } => {
                Some(*status)
            }
            SpotifyError::Transport(err) => err.status().map(|s| s.as_u16()),
            SpotifyError::Configuration(_) => None,
        }
    }

    /// True for a 401 that could not be recovered by renewal.
    pub fn is_token_expired(&self) -> bool {
        matches!(self, SpotifyError::TokenExpired(_))
    }

    /// True for a 429; the caller decides when to try again.
    pub fn is_rate_limit(&self) -> bool {
        matches!(self, SpotifyError::RateLimitExceeded(_))
    }
}
