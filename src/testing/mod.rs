use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::Barrier;

use crate::error::GatewayError;
use crate::transport::{ApiRequest, ApiResponse, HeaderMap, Transport};

type Responder = Box<dyn Fn(&ApiRequest) -> Result<Value, GatewayError> + Send + Sync>;

/// In-process transport that records every request and answers from a closure
pub struct RecordingTransport {
    responder: Responder,
    requests: Mutex<Vec<ApiRequest>>,
    barrier: Option<Arc<Barrier>>,
}

impl RecordingTransport {
    pub fn new<F>(responder: F) -> Self
    where
        F: Fn(&ApiRequest) -> Result<Value, GatewayError> + Send + Sync + 'static,
    {
        Self {
            responder: Box::new(responder),
            requests: Mutex::new(Vec::new()),
            barrier: None,
        }
    }

    /// Hold every request until `n` of them are in flight
    pub fn with_barrier(mut self, n: usize) -> Self {
        self.barrier = Some(Arc::new(Barrier::new(n)));
        self
    }

    pub fn requests(&self) -> Vec<ApiRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl Transport for RecordingTransport {
    async fn fetch_json(&self, request: ApiRequest) -> Result<ApiResponse, GatewayError> {
        self.requests.lock().unwrap().push(request.clone());

        if let Some(barrier) = &self.barrier {
            barrier.wait().await;
        }

        let json = (self.responder)(&request)?;
        Ok(ApiResponse {
            status: 200,
            headers: HeaderMap::new(),
            json,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use url::Url;

    #[tokio::test]
    async fn test_records_requests_in_order() {
        let transport = RecordingTransport::new(|req| Ok(Value::String(req.url.path().to_string())));
        let first = transport
            .fetch_json(ApiRequest::get(Url::parse("http://x/a").unwrap()))
            .await
            .unwrap();
        transport
            .fetch_json(ApiRequest::get(Url::parse("http://x/b").unwrap()))
            .await
            .unwrap();

        assert_eq!(first.json, Value::String("/a".to_string()));
        let paths: Vec<String> = transport.requests().iter().map(|r| r.url.path().to_string()).collect();
        assert_eq!(paths, vec!["/a", "/b"]);
    }
}
