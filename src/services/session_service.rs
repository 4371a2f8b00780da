use std::sync::Arc;

use serde_json::Value;

use crate::error::GatewayError;
use crate::models::{AuthForm, AuthResponse, EmailVerificationConfirm, EmailVerificationRequest, RegistrationForm};
use crate::transport::{ContentClient, Method, TokenData};

pub const LOGIN_PATH: &str = "authentication/v1/authentication";
pub const REGISTRATION_PATH: &str = "authentication/v1/registration";
pub const VERIFICATION_REQUEST_PATH: &str = "authentication/v1/email/verification/request";
pub const VERIFICATION_CONFIRM_PATH: &str = "authentication/v1/email/verification/confirm";
pub const LOGOUT_PATH: &str = "auth/logout";

/// Portal sign-in, registration and session upkeep
pub struct SessionService {
    client: Arc<ContentClient>,
}

impl SessionService {
    pub fn new(client: Arc<ContentClient>) -> Self {
        Self { client }
    }

    /// Stores the token when the backend issued one; `None` means the
    /// backend answered without a token (e.g. a verification code is pending)
    pub async fn login(&self, form: &AuthForm) -> Result<Option<AuthResponse>, GatewayError> {
        let body = serde_json::to_value(form)?;
        let json: Value = self.client.public(Method::POST, LOGIN_PATH, Some(&body)).await?;

        if json.get("accessToken").and_then(Value::as_str).is_none() {
            tracing::info!("Login for {} returned no token", form.email);
            return Ok(None);
        }

        let response: AuthResponse = serde_json::from_value(json.clone())?;
        self.client.credentials().set(TokenData::from_payload(json)?)?;
        tracing::info!("Logged in as {}", form.email);
        Ok(Some(response))
    }

    pub async fn register(&self, form: &RegistrationForm) -> Result<Value, GatewayError> {
        let body = serde_json::to_value(form)?;
        self.client.public(Method::POST, REGISTRATION_PATH, Some(&body)).await
    }

    pub async fn request_email_verification(&self, email: &str) -> Result<Value, GatewayError> {
        let body = serde_json::to_value(EmailVerificationRequest { email: email.to_string() })?;
        self.client.public(Method::POST, VERIFICATION_REQUEST_PATH, Some(&body)).await
    }

    pub async fn confirm_email_verification(&self, email: &str, code: &str) -> Result<Value, GatewayError> {
        let body = serde_json::to_value(EmailVerificationConfirm {
            email: email.to_string(),
            code: code.to_string(),
        })?;
        self.client.public(Method::POST, VERIFICATION_CONFIRM_PATH, Some(&body)).await
    }

    pub async fn refresh(&self) -> Result<AuthResponse, GatewayError> {
        self.client.refresh_tokens().await
    }

    /// Clears the stored token only when the backend confirms the logout
    pub async fn logout(&self) -> Result<bool, GatewayError> {
        let json: Value = self.client.public(Method::POST, LOGOUT_PATH, None).await?;
        let confirmed = is_truthy(&json);
        if confirmed {
            self.client.credentials().clear()?;
            tracing::info!("Logged out");
        }
        Ok(confirmed)
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map_or(false, |n| n != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
