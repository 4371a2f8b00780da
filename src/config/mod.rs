use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;

use crate::transport::RefreshPolicy;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub backend: BackendConfig,
    pub http: HttpConfig,
    pub auth: AuthConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Admin data backend, resource paths are appended to it
    pub base_url: String,
    /// Portal API root used by the content, session and profile services
    pub content_api_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// `None` leaves requests without a client-side timeout
    pub request_timeout_secs: Option<u64>,
    pub enable_request_logging: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    pub refresh_policy: RefreshPolicy,
    pub token_header: String,
}

impl HttpConfig {
    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from an arbitrary variable source; `from_env` passes the process environment
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let environment = match lookup("APP_ENV").as_deref() {
            Some("production") | Some("prod") => Environment::Production,
            Some("staging") | Some("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        // Set defaults based on environment, then override with specific env vars
        match environment {
            Environment::Production => Self::production(),
            Environment::Staging => Self::staging(),
            Environment::Development => Self::development(),
        }
        .with_overrides(lookup)
    }

    fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        // Backend overrides
        if let Some(v) = lookup("PORTAL_BACKEND_URI") {
            self.backend.base_url = v;
        }
        if let Some(v) = lookup("PORTAL_CONTENT_API_URL") {
            self.backend.content_api_url = v;
        }

        // HTTP overrides
        if let Some(v) = lookup("HTTP_REQUEST_TIMEOUT_SECS") {
            // 0 disables the timeout
            self.http.request_timeout_secs = match v.parse::<u64>() {
                Ok(0) => None,
                Ok(secs) => Some(secs),
                Err(_) => self.http.request_timeout_secs,
            };
        }
        if let Some(v) = lookup("HTTP_ENABLE_REQUEST_LOGGING") {
            self.http.enable_request_logging = v.parse().unwrap_or(self.http.enable_request_logging);
        }

        // Auth overrides
        if let Some(v) = lookup("AUTH_REFRESH_POLICY") {
            self.auth.refresh_policy = v.parse().unwrap_or(self.auth.refresh_policy);
        }
        if let Some(v) = lookup("AUTH_TOKEN_HEADER") {
            self.auth.token_header = v;
        }

        self
    }

    fn development() -> Self {
        Self {
            environment: Environment::Development,
            backend: BackendConfig {
                base_url: "http://localhost:80".to_string(),
                content_api_url: "http://localhost:80/api".to_string(),
            },
            http: HttpConfig {
                request_timeout_secs: None,
                enable_request_logging: true,
            },
            auth: AuthConfig {
                refresh_policy: RefreshPolicy::Propagate,
                token_header: "token".to_string(),
            },
        }
    }

    fn staging() -> Self {
        Self {
            environment: Environment::Staging,
            backend: BackendConfig {
                base_url: "https://staging.example.com".to_string(),
                content_api_url: "https://staging.example.com/api".to_string(),
            },
            http: HttpConfig {
                request_timeout_secs: Some(60),
                enable_request_logging: true,
            },
            auth: AuthConfig {
                refresh_policy: RefreshPolicy::RefreshOnce,
                token_header: "token".to_string(),
            },
        }
    }

    fn production() -> Self {
        Self {
            environment: Environment::Production,
            backend: BackendConfig {
                base_url: "https://app.example.com".to_string(),
                content_api_url: "https://app.example.com/api".to_string(),
            },
            http: HttpConfig {
                request_timeout_secs: Some(30),
                enable_request_logging: false,
            },
            auth: AuthConfig {
                refresh_policy: RefreshPolicy::RefreshOnce,
                token_header: "token".to_string(),
            },
        }
    }
}

// Global singleton config - initialized once at startup
pub static CONFIG: Lazy<AppConfig> = Lazy::new(AppConfig::from_env);

// Convenience function for accessing config
pub fn config() -> &'static AppConfig {
    &CONFIG
}
