#![allow(dead_code)]

use std::sync::Arc;

use anyhow::Result;
use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use serde_json::Value;
use tower::ServiceExt;

use prize_history_server::config::{HistoryConfig, SecurityConfig};
use prize_history_server::database::{MemoryStore, StoreHandle};

/// The full router over a fresh in-memory store, driven in-process
pub struct TestServer {
    pub store: Arc<MemoryStore>,
    router: Router,
}

impl TestServer {
    pub fn new() -> Self {
        Self::with_history(HistoryConfig {
            default_limit: 20,
            max_limit: None,
        })
    }

    pub fn with_history(history: HistoryConfig) -> Self {
        let store = Arc::new(MemoryStore::new());
        let security = SecurityConfig {
            enable_cors: false,
            cors_origins: Vec::new(),
        };
        let router = prize_history_server::app(StoreHandle(store.clone()), history, &security);
        Self { store, router }
    }

    pub async fn send(
        &self,
        method: &str,
        uri: &str,
        body: Option<Value>,
    ) -> Result<(StatusCode, Value)> {
        match body {
            Some(json) => {
                self.send_raw(method, uri, Some("application/json"), serde_json::to_vec(&json)?)
                    .await
            }
            None => self.send_raw(method, uri, None, Vec::new()).await,
        }
    }

    pub async fn send_raw(
        &self,
        method: &str,
        uri: &str,
        content_type: Option<&str>,
        body: Vec<u8>,
    ) -> Result<(StatusCode, Value)> {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(content_type) = content_type {
            builder = builder.header("content-type", content_type);
        }
        let request = builder.body(Body::from(body))?;

        let response = self.router.clone().oneshot(request).await?;
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await?;
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes)?
        };
        Ok((status, value))
    }

    pub async fn get(&self, uri: &str) -> Result<(StatusCode, Value)> {
        self.send("GET", uri, None).await
    }

    pub async fn post(&self, uri: &str, body: Value) -> Result<(StatusCode, Value)> {
        self.send("POST", uri, Some(body)).await
    }

    pub async fn put(&self, uri: &str, body: Value) -> Result<(StatusCode, Value)> {
        self.send("PUT", uri, Some(body)).await
    }

    pub async fn delete(&self, uri: &str) -> Result<(StatusCode, Value)> {
        self.send("DELETE", uri, None).await
    }
}

/// Pull a string field out of a response body, failing loudly when absent
pub fn str_field<'a>(body: &'a Value, field: &str) -> &'a str {
    body.get(field)
        .and_then(Value::as_str)
        .unwrap_or_else(|| panic!("missing string field '{}' in {}", field, body))
}
