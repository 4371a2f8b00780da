use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use reqwest::header::{HeaderName, HeaderValue};
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::credentials::{CredentialProvider, TokenData};
use super::fetch::{apply_body, read_json_response};
use super::RequestBody;
use crate::error::{GatewayError, TOKEN_EXPIRED_MESSAGE};
use crate::models::AuthResponse;

pub const REFRESH_PATH: &str = "authentication/v1/refresh";
pub const DEFAULT_TOKEN_HEADER: &str = "token";

/// What an authorized request does when the backend signals an expired session
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RefreshPolicy {
    /// Return the original error untouched
    #[default]
    Propagate,
    /// Refresh the token, then retry the original request exactly once
    RefreshOnce,
}

impl FromStr for RefreshPolicy {
    type Err = GatewayError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "propagate" | "off" | "none" => Ok(RefreshPolicy::Propagate),
            "refresh" | "refresh_once" | "retry" => Ok(RefreshPolicy::RefreshOnce),
            other => Err(GatewayError::InvalidRequest(format!("Unknown refresh policy: {}", other))),
        }
    }
}

impl fmt::Display for RefreshPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RefreshPolicy::Propagate => f.write_str("propagate"),
            RefreshPolicy::RefreshOnce => f.write_str("refresh_once"),
        }
    }
}

/// JSON client for the portal API.
///
/// Authorized calls carry the raw token in a custom header rather than a
/// bearer `Authorization` header. Cookies are kept for the lifetime of the
/// client so the refresh endpoint sees the session cookie it issued.
pub struct ContentClient {
    http: reqwest::Client,
    base_url: String,
    credentials: Arc<dyn CredentialProvider>,
    token_header: HeaderName,
    refresh_policy: RefreshPolicy,
}

impl ContentClient {
    pub fn new(
        base_url: impl Into<String>,
        credentials: Arc<dyn CredentialProvider>,
        timeout: Option<Duration>,
    ) -> Result<Self, GatewayError> {
        let mut builder = reqwest::Client::builder().cookie_store(true);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            http: builder.build()?,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            credentials,
            token_header: HeaderName::from_static(DEFAULT_TOKEN_HEADER),
            refresh_policy: RefreshPolicy::default(),
        })
    }

    pub fn with_refresh_policy(mut self, policy: RefreshPolicy) -> Self {
        self.refresh_policy = policy;
        self
    }

    pub fn with_token_header(mut self, header: &str) -> Result<Self, GatewayError> {
        self.token_header = HeaderName::from_bytes(header.as_bytes())
            .map_err(|_| GatewayError::InvalidRequest(format!("Invalid token header name: {}", header)))?;
        Ok(self)
    }

    pub fn refresh_policy(&self) -> RefreshPolicy {
        self.refresh_policy
    }

    pub fn credentials(&self) -> &Arc<dyn CredentialProvider> {
        &self.credentials
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Request without session credentials
    pub async fn public<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
    ) -> Result<T, GatewayError> {
        let json = self.send(method, path, body, false).await?;
        Ok(serde_json::from_value(json)?)
    }

    /// Request carrying the session token, subject to the refresh policy
    pub async fn authorized<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
    ) -> Result<T, GatewayError> {
        let err = match self.send(method.clone(), path, body, true).await {
            Ok(json) => return Ok(serde_json::from_value(json)?),
            Err(err) => err,
        };

        if !err.is_token_expired() {
            return Err(err);
        }

        match self.refresh_policy {
            RefreshPolicy::Propagate => {
                tracing::debug!("Session expired on {}, propagating", path);
                Err(err)
            }
            RefreshPolicy::RefreshOnce => {
                tracing::warn!("Session expired on {}, refreshing token", path);
                match self.refresh_tokens().await {
                    Ok(_) => {
                        let json = self.send(method, path, body, true).await?;
                        Ok(serde_json::from_value(json)?)
                    }
                    Err(refresh_err) => {
                        tracing::warn!("Token refresh failed: {}", refresh_err);
                        if refresh_err.message().as_deref() == Some(TOKEN_EXPIRED_MESSAGE) {
                            self.credentials.clear()?;
                        }
                        Err(err)
                    }
                }
            }
        }
    }

    /// Exchange the session cookie for a new access token and store it
    pub async fn refresh_tokens(&self) -> Result<AuthResponse, GatewayError> {
        let json = self.send(Method::POST, REFRESH_PATH, None, false).await?;
        let response: AuthResponse = serde_json::from_value(json.clone())?;
        self.credentials.set(TokenData::from_payload(json)?)?;
        Ok(response)
    }

    async fn send(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
        authorized: bool,
    ) -> Result<Value, GatewayError> {
        let url = self.url(path);
        let mut builder = self.http.request(method.clone(), &url);

        if authorized {
            if let Some(token) = self.credentials.access_token()? {
                let value = HeaderValue::from_str(&token).map_err(|_| {
                    GatewayError::CredentialStore("Stored access token is not a valid header value".to_string())
                })?;
                builder = builder.header(self.token_header.clone(), value);
            }
        }

        if let Some(body) = body {
            builder = apply_body(builder, RequestBody::Json(body.clone()))?;
        }

        tracing::debug!("{} {}", method, url);
        let response = builder.send().await?;
        Ok(read_json_response(response).await?.json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::MemoryCredentials;

    #[test]
    fn test_refresh_policy_parse() {
        assert_eq!("propagate".parse::<RefreshPolicy>().unwrap(), RefreshPolicy::Propagate);
        assert_eq!("REFRESH".parse::<RefreshPolicy>().unwrap(), RefreshPolicy::RefreshOnce);
        assert_eq!("refresh_once".parse::<RefreshPolicy>().unwrap(), RefreshPolicy::RefreshOnce);
        assert!("sometimes".parse::<RefreshPolicy>().is_err());
        assert_eq!(RefreshPolicy::default(), RefreshPolicy::Propagate);
    }

    #[test]
    fn test_url_joining() {
        let client = ContentClient::new("http://localhost:80/api/", Arc::new(MemoryCredentials::new()), None).unwrap();
        assert_eq!(client.url("/news/v1/get"), "http://localhost:80/api/news/v1/get");
        assert_eq!(client.url("profile/v1/me"), "http://localhost:80/api/profile/v1/me");
    }

    #[test]
    fn test_token_header_validation() {
        let client = ContentClient::new("http://x", Arc::new(MemoryCredentials::new()), None).unwrap();
        assert!(client.with_token_header("bad header").is_err());
    }
}
