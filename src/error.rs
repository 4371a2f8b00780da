// Gateway Error Types
use serde_json::Value;
use thiserror::Error;

/// Error message the backend sends when the presented token has expired
pub const TOKEN_EXPIRED_MESSAGE: &str = "jwt expired";

/// Error message the backend sends when no token was presented
pub const TOKEN_MISSING_MESSAGE: &str = "jwt must be provided";

/// Every failure surfaced by the gateway, transports and services
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    #[error("Unknown resource: {0}")]
    UnknownResource(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Failed to decode JSON: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Not authenticated")]
    NotAuthenticated,

    #[error("Credential store error: {0}")]
    CredentialStore(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl GatewayError {
    pub fn http(status: u16, body: impl Into<String>) -> Self {
        GatewayError::Http {
            status,
            body: body.into(),
        }
    }

    /// HTTP status carried by the error, if the server answered at all
    pub fn status(&self) -> Option<u16> {
        match self {
            GatewayError::Http { status, .. } => Some(*status),
            GatewayError::Network(err) => err.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Response body parsed as JSON, when it is JSON
    pub fn body_json(&self) -> Option<Value> {
        match self {
            GatewayError::Http { body, .. } => serde_json::from_str(body).ok(),
            _ => None,
        }
    }

    /// Backend-provided error message.
    ///
    /// Reads the `message` field of the error body; when the backend sends a
    /// list of messages the first one wins.
    pub fn message(&self) -> Option<String> {
        let body = self.body_json()?;
        match body.get("message")? {
            Value::String(msg) => Some(msg.clone()),
            Value::Array(items) => items.first().map(|first| match first {
                Value::String(msg) => msg.clone(),
                other => other.to_string(),
            }),
            _ => None,
        }
    }

    /// 401 or 403
    pub fn is_auth_failure(&self) -> bool {
        matches!(self.status(), Some(401) | Some(403))
    }

    /// Authentication-expiry signal: an auth failure status or an explicit
    /// expired/missing token message in the error body
    pub fn is_token_expired(&self) -> bool {
        if self.is_auth_failure() {
            return true;
        }
        matches!(
            self.message().as_deref(),
            Some(TOKEN_EXPIRED_MESSAGE) | Some(TOKEN_MISSING_MESSAGE)
        )
    }
}
