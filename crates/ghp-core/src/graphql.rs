//! The remote GraphQL API boundary.
//!
//! Every resolver and operation executor takes this trait by reference
//! instead of reaching for a global client, so the whole call tree can be
//! exercised against a substitute in tests.

use async_trait::async_trait;
use serde_json::Value;

use crate::error::Result;

/// A client capable of executing GraphQL documents against the remote API.
///
/// `execute` returns the `data` object of a successful response. Remote-side
/// rejections (the GraphQL `errors` array, HTTP failures) surface as errors
/// with the remote message preserved.
#[async_trait]
pub trait GraphqlClient: Send + Sync {
    /// Execute a query or mutation with the given variables.
    async fn execute(&self, document: &str, variables: Value) -> Result<Value>;
}
