//! GitHub GraphQL API client.

use async_trait::async_trait;
use ghp_core::{Error, GraphqlClient, Result};
use serde::Deserialize;
use serde_json::{json, Value};

/// Default GitHub GraphQL endpoint.
pub const DEFAULT_GRAPHQL_URL: &str = "https://api.github.com/graphql";

/// User agent sent with every request.
pub(crate) const USER_AGENT: &str = "ghp-tools";

/// GraphQL client authenticated with a bearer token.
///
/// The token is set once at construction and is read-only thereafter; the
/// same client handle serves every request for the lifetime of the server.
pub struct GithubGraphql {
    endpoint: String,
    token: String,
    client: reqwest::Client,
}

impl GithubGraphql {
    /// Create a client against the public GitHub API.
    pub fn new(token: impl Into<String>) -> Self {
        Self::with_endpoint(DEFAULT_GRAPHQL_URL, token)
    }

    /// Create a client against a custom endpoint (GitHub Enterprise, tests).
    pub fn with_endpoint(endpoint: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            token: token.into(),
            client: reqwest::Client::builder()
                .user_agent(USER_AGENT)
                .build()
                .expect("Failed to create HTTP client"),
        }
    }
}

/// Wire shape of a GraphQL response.
#[derive(Debug, Deserialize)]
struct GraphqlResponse {
    data: Option<Value>,
    errors: Option<Vec<GraphqlError>>,
}

#[derive(Debug, Deserialize)]
struct GraphqlError {
    message: String,
}

#[async_trait]
impl GraphqlClient for GithubGraphql {
    async fn execute(&self, document: &str, variables: Value) -> Result<Value> {
        let response = self
            .client
            .post(&self.endpoint)
            .header("Authorization", format!("bearer {}", self.token))
            .json(&json!({ "query": document, "variables": variables }))
            .send()
            .await
            .map_err(|e| Error::Http(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response.text().await.unwrap_or_default();
            return Err(Error::Api { status, message });
        }

        let body: GraphqlResponse = response
            .json()
            .await
            .map_err(|e| Error::Http(e.to_string()))?;

        if let Some(errors) = body.errors {
            if !errors.is_empty() {
                let message = errors
                    .into_iter()
                    .map(|e| e.message)
                    .collect::<Vec<_>>()
                    .join("; ");
                tracing::debug!("GraphQL call rejected: {}", message);
                return Err(Error::Remote(message));
            }
        }

        body.data
            .ok_or_else(|| Error::Remote("GraphQL response contained no data".to_string()))
    }
}
