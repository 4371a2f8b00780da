use std::sync::Arc;
use std::time::Duration;

use reqwest::header::{HeaderValue, ACCEPT};

use crate::error::GatewayError;
use crate::models::{Identity, LoginCredentials};
use crate::transport::fetch::read_json_response;
use crate::transport::{CredentialProvider, TokenData};

pub const LOGIN_PATH: &str = "api/users/v1/authentication";

/// Admin session lifecycle against the users backend.
///
/// Shares its credential provider with the data gateway transport, so a
/// successful login is immediately visible to gateway requests.
pub struct AuthProvider {
    http: reqwest::Client,
    base_url: String,
    credentials: Arc<dyn CredentialProvider>,
}

impl AuthProvider {
    pub fn new(
        base_url: impl Into<String>,
        credentials: Arc<dyn CredentialProvider>,
        timeout: Option<Duration>,
    ) -> Result<Self, GatewayError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            http: builder.build()?,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            credentials,
        })
    }

    pub fn credentials(&self) -> &Arc<dyn CredentialProvider> {
        &self.credentials
    }

    /// Authenticate and store the whole response payload as the session
    pub async fn login(&self, credentials: &LoginCredentials) -> Result<TokenData, GatewayError> {
        let url = format!("{}/{}", self.base_url, LOGIN_PATH);
        tracing::debug!("POST {}", url);

        let response = self
            .http
            .post(&url)
            .header(ACCEPT, HeaderValue::from_static("application/json"))
            .json(credentials)
            .send()
            .await?;
        let json = read_json_response(response).await?.json;

        let token = TokenData::from_payload(json)
            .map_err(|e| GatewayError::InvalidResponse(format!("login response has no access token: {}", e)))?;
        self.credentials.set(token.clone())?;
        tracing::info!("Logged in as {}", credentials.email);
        Ok(token)
    }

    pub fn logout(&self) -> Result<(), GatewayError> {
        self.credentials.clear()?;
        tracing::info!("Logged out");
        Ok(())
    }

    pub fn check_auth(&self) -> Result<(), GatewayError> {
        match self.credentials.get()? {
            Some(_) => Ok(()),
            None => Err(GatewayError::NotAuthenticated),
        }
    }

    /// Drop the session when the backend rejected it; other errors pass
    pub fn check_error(&self, error: &GatewayError) -> Result<(), GatewayError> {
        if error.is_auth_failure() {
            tracing::warn!("Backend rejected the session ({:?}), clearing credentials", error.status());
            self.credentials.clear()?;
            return Err(GatewayError::NotAuthenticated);
        }
        Ok(())
    }

    pub fn identity(&self) -> Result<Identity, GatewayError> {
        let token = self.credentials.get()?.ok_or(GatewayError::NotAuthenticated)?;
        Ok(token.identity())
    }
}
