//! Canned-response source used in tests instead of HTTP.

use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Mutex;
use crate::endpoint::Endpoint;
use crate::error::TmdbError;
use crate::traits::MetadataSource;

/// Serves JSON bodies keyed by canonical endpoint (`path?k=v` with sorted
/// params). Unknown endpoints answer 404; every call is recorded.
#[derive(Default)]
pub struct FakeSource {
    responses: HashMap<String, Value>,
    statuses: HashMap<String, u16>,
    calls: Mutex<Vec<String>>,
}

impl FakeSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, endpoint: &str, body: Value) -> Self {
        self.responses.insert(Endpoint::parse(endpoint).to_string(), body);
        self
    }

    /// Answer `endpoint` with a non-2xx status.
    pub fn with_status(mut self, endpoint: &str, status: u16) -> Self {
        self.statuses.insert(Endpoint::parse(endpoint).to_string(), status);
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    pub fn call_count(&self, endpoint: &str) -> usize {
        let key = Endpoint::parse(endpoint).to_string();
        self.calls().iter().filter(|c| **c == key).count()
    }
}

#[async_trait]
impl MetadataSource for FakeSource {
    fn source_name(&self) -> &str {
        "fake"
    }

    async fn fetch(&self, endpoint: &Endpoint) -> Result<Value, TmdbError> {
        let key = endpoint.to_string();
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(key.clone());
        }
        if let Some(status) = self.statuses.get(&key) {
            return Err(TmdbError::Status { status: *status, endpoint: key });
        }
        self.responses
            .get(&key)
            .cloned()
            .ok_or(TmdbError::Status { status: 404, endpoint: key })
    }
}
