//! Test doubles shared by the in-crate test modules.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use ghp_core::{Error, GraphqlClient, Result};
use serde_json::Value;

/// Scripted GraphQL client.
///
/// Pops a pre-arranged result per call and records every issued document and
/// variable set, so tests can assert both call counts and call order.
pub struct StubClient {
    responses: Mutex<VecDeque<Result<Value>>>,
    calls: Mutex<Vec<(String, Value)>>,
}

impl StubClient {
    pub fn new(responses: Vec<Result<Value>>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Client whose single call succeeds with the given data.
    pub fn returning(data: Value) -> Self {
        Self::new(vec![Ok(data)])
    }

    /// Recorded `(document, variables)` pairs, in call order.
    pub fn calls(&self) -> Vec<(String, Value)> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl GraphqlClient for StubClient {
    async fn execute(&self, document: &str, variables: Value) -> Result<Value> {
        self.calls
            .lock()
            .unwrap()
            .push((document.to_string(), variables));
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(Error::Remote("no scripted response left".to_string())))
    }
}
