use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION};
use reqwest::RequestBuilder;
use serde_json::Value;

use super::credentials::CredentialProvider;
use super::{ApiRequest, ApiResponse, RequestBody, Transport};
use crate::error::GatewayError;

/// Bearer-token JSON transport used by the data gateway
pub struct FetchTransport {
    http: reqwest::Client,
    credentials: Arc<dyn CredentialProvider>,
}

impl FetchTransport {
    pub fn new(credentials: Arc<dyn CredentialProvider>, timeout: Option<Duration>) -> Result<Self, GatewayError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            http: builder.build()?,
            credentials,
        })
    }

    fn default_headers() -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers
    }
}

#[async_trait]
impl Transport for FetchTransport {
    async fn fetch_json(&self, request: ApiRequest) -> Result<ApiResponse, GatewayError> {
        let ApiRequest { method, url, headers, body } = request;

        let mut headers = headers.unwrap_or_else(Self::default_headers);
        if let Some(token) = self.credentials.access_token()? {
            let value = HeaderValue::from_str(&format!("Bearer {}", token)).map_err(|_| {
                GatewayError::CredentialStore("Stored access token is not a valid header value".to_string())
            })?;
            headers.insert(AUTHORIZATION, value);
        }

        tracing::debug!("{} {}", method, url);

        let builder = self.http.request(method, url).headers(headers);
        let response = apply_body(builder, body)?.send().await?;
        read_json_response(response).await
    }
}

pub(crate) fn apply_body(builder: RequestBuilder, body: RequestBody) -> Result<RequestBuilder, GatewayError> {
    Ok(match body {
        RequestBody::Empty => builder,
        RequestBody::Json(value) => builder.json(&value),
        RequestBody::Multipart(parts) => {
            let mut form = reqwest::multipart::Form::new();
            for part in parts {
                let mut file = reqwest::multipart::Part::bytes(part.bytes).file_name(part.file_name);
                if let Some(mime) = part.mime_type {
                    file = file.mime_str(&mime)?;
                }
                form = form.part(part.field, file);
            }
            builder.multipart(form)
        }
    })
}

/// Reject non-2xx statuses with the body intact, otherwise parse the body
pub(crate) async fn read_json_response(response: reqwest::Response) -> Result<ApiResponse, GatewayError> {
    let status = response.status().as_u16();
    let headers = response.headers().clone();
    let text = response.text().await?;

    if !(200..300).contains(&status) {
        tracing::debug!("HTTP {} response: {}", status, text);
        return Err(GatewayError::http(status, text));
    }

    let json = if text.trim().is_empty() {
        Value::Null
    } else {
        serde_json::from_str(&text).unwrap_or_else(|e| {
            tracing::debug!("Response body is not JSON ({}), treating as null", e);
            Value::Null
        })
    };

    Ok(ApiResponse { status, headers, json })
}
