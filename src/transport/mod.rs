pub mod content_client;
pub mod credentials;
pub mod fetch;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use url::Url;

use crate::error::GatewayError;

pub use content_client::{ContentClient, RefreshPolicy};
pub use credentials::{CredentialProvider, FileCredentials, MemoryCredentials, StoredSession, TokenData};
pub use fetch::FetchTransport;
pub use reqwest::header::HeaderMap;
pub use reqwest::Method;

#[derive(Debug, Clone)]
pub enum RequestBody {
    Empty,
    Json(Value),
    Multipart(Vec<FilePart>),
}

impl RequestBody {
    pub fn json<T: Serialize + ?Sized>(value: &T) -> Result<Self, GatewayError> {
        Ok(RequestBody::Json(serde_json::to_value(value)?))
    }
}

/// One file field of a multipart body
#[derive(Debug, Clone)]
pub struct FilePart {
    pub field: String,
    pub file_name: String,
    pub mime_type: Option<String>,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: Method,
    pub url: Url,
    /// Caller-supplied headers; `None` lets the transport pick its defaults
    pub headers: Option<HeaderMap>,
    pub body: RequestBody,
}

impl ApiRequest {
    pub fn new(method: Method, url: Url) -> Self {
        Self {
            method,
            url,
            headers: None,
            body: RequestBody::Empty,
        }
    }

    pub fn get(url: Url) -> Self {
        Self::new(Method::GET, url)
    }

    pub fn with_body(mut self, body: RequestBody) -> Self {
        self.body = body;
        self
    }

    pub fn with_headers(mut self, headers: HeaderMap) -> Self {
        self.headers = Some(headers);
        self
    }
}

#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub status: u16,
    pub headers: HeaderMap,
    /// Parsed body; `null` when the body was empty or not JSON
    pub json: Value,
}

/// Performs one HTTP exchange and parses the JSON body.
///
/// Implementations must fail with [`GatewayError::Http`] for any status
/// outside `200..300`.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn fetch_json(&self, request: ApiRequest) -> Result<ApiResponse, GatewayError>;
}
