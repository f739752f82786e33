//! Tool dispatch.
//!
//! Routes a tool name to its operation executor, deserializes the argument
//! bag into the executor's typed input, and packages the outcome as a tool
//! result. Every failure, including an unrecognized name, becomes an error
//! content block; nothing propagates past this boundary.

use std::sync::Arc;

use ghp_core::{Error, GraphqlClient, Result};
use ghp_github::ops;
use serde::de::DeserializeOwned;
use serde_json::{json, Value};

use crate::protocol::{ToolCallResult, ToolDefinition};
use crate::tools;

/// Executes tools against a shared GraphQL client handle.
pub struct ToolHandler {
    client: Arc<dyn GraphqlClient>,
}

impl ToolHandler {
    /// Create a handler backed by the given client.
    pub fn new(client: Arc<dyn GraphqlClient>) -> Self {
        Self { client }
    }

    /// Get the tool catalog.
    pub fn available_tools(&self) -> Vec<ToolDefinition> {
        tools::catalog()
    }

    /// Execute a tool by name with arguments, packaging the outcome.
    pub async fn execute(&self, name: &str, arguments: Option<Value>) -> ToolCallResult {
        match self.dispatch(name, arguments).await {
            Ok(payload) => match serde_json::to_string_pretty(&payload) {
                Ok(text) => ToolCallResult::text(text),
                Err(e) => ToolCallResult::error(format!("Error: {}", e)),
            },
            Err(e) => {
                tracing::warn!("Tool '{}' failed: {}", name, e);
                ToolCallResult::error(format!("Error: {}", e))
            }
        }
    }

    async fn dispatch(&self, name: &str, arguments: Option<Value>) -> Result<Value> {
        let args = arguments.unwrap_or_else(|| json!({}));
        let client = self.client.as_ref();

        match name {
            "create_project" => ops::create_project(client, parse(args)?).await,
            "create_milestone" => ops::create_milestone(client, parse(args)?).await,
            "create_issue" => ops::create_issue(client, parse(args)?).await,
            "add_issue_to_project" => ops::add_issue_to_project(client, parse(args)?).await,
            "create_iteration_field" => ops::create_iteration_field(client, parse(args)?).await,
            "assign_issue_to_iteration" => {
                ops::assign_issue_to_iteration(client, parse(args)?).await
            }
            "add_subissue" => ops::add_subissue(client, parse(args)?).await,
            "remove_subissue" => ops::remove_subissue(client, parse(args)?).await,
            "reprioritize_subissue" => ops::reprioritize_subissue(client, parse(args)?).await,
            "get_repository_info" => ops::get_repository_info(client, parse(args)?).await,
            "get_project_info" => ops::get_project_info(client, parse(args)?).await,
            "update_item_status" => ops::update_item_status(client, parse(args)?).await,
            "update_project_settings" => ops::update_project_settings(client, parse(args)?).await,
            other => Err(Error::UnknownTool(other.to_string())),
        }
    }
}

/// Deserialize the argument bag into a typed input, mapping shape errors to
/// a structured argument failure.
fn parse<T: DeserializeOwned>(args: Value) -> Result<T> {
    serde_json::from_value::<T>(args).map_err(|e| Error::InvalidArgument(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// Scripted client mirroring the one the github crate tests use. An
    /// exhausted script fails every further call.
    struct StubClient {
        responses: Mutex<VecDeque<Result<Value>>>,
    }

    impl StubClient {
        fn new(responses: Vec<Result<Value>>) -> Self {
            Self {
                responses: Mutex::new(responses.into()),
            }
        }
    }

    #[async_trait]
    impl GraphqlClient for StubClient {
        async fn execute(&self, _document: &str, _variables: Value) -> Result<Value> {
            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(Error::Remote("remote unavailable".to_string())))
        }
    }

    fn handler(responses: Vec<Result<Value>>) -> ToolHandler {
        ToolHandler::new(Arc::new(StubClient::new(responses)))
    }

    fn minimal_args(tool: &str) -> Value {
        match tool {
            "create_project" => json!({ "owner": "acme", "title": "Roadmap" }),
            "create_milestone" => json!({ "owner": "acme", "repo": "widgets", "title": "v1" }),
            "create_issue" => {
                json!({ "owner": "acme", "repo": "widgets", "title": "t", "body": "b" })
            }
            "add_issue_to_project" => json!({ "projectId": "PVT_1", "issueId": "I_1" }),
            "create_iteration_field" => json!({
                "projectId": "PVT_1", "fieldName": "Sprint", "duration": 7,
                "startDate": "2025-01-06", "iterations": []
            }),
            "assign_issue_to_iteration" => json!({
                "owner": "acme", "repo": "widgets", "projectNumber": 7,
                "issueNumber": 42, "fieldId": "F_1", "iterationId": "IT_1"
            }),
            "add_subissue" => json!({ "issueId": "I_1" }),
            "remove_subissue" => json!({ "issueId": "I_1", "subIssueId": "I_2" }),
            "reprioritize_subissue" => json!({ "issueId": "I_1", "subIssueId": "I_2" }),
            "get_repository_info" => json!({ "owner": "acme", "repo": "widgets" }),
            "get_project_info" => json!({ "owner": "acme", "projectNumber": 7 }),
            "update_item_status" => {
                json!({ "projectId": "PVT_1", "itemId": "PVTI_1", "status": "Done" })
            }
            "update_project_settings" => json!({ "projectId": "PVT_1", "title": "T" }),
            other => panic!("no minimal args for {}", other),
        }
    }

    #[tokio::test]
    async fn test_every_catalog_tool_dispatches() {
        // A client that fails every remote call proves each catalog name
        // reaches its executor rather than the unknown-tool arm.
        for tool in tools::catalog() {
            let handler = handler(vec![]);
            let result = handler
                .execute(&tool.name, Some(minimal_args(&tool.name)))
                .await;

            assert_eq!(result.is_error, Some(true), "{}", tool.name);
            let text = result.text_content();
            assert!(
                !text.contains("Unknown tool"),
                "{} fell through to unknown-tool: {}",
                tool.name,
                text
            );
            assert!(
                text.contains("remote unavailable"),
                "{} did not reach the client: {}",
                tool.name,
                text
            );
        }
    }

    #[tokio::test]
    async fn test_unknown_tool_names_offender() {
        let handler = handler(vec![]);
        let result = handler.execute("frobnicate", None).await;

        assert_eq!(result.is_error, Some(true));
        assert!(result.text_content().contains("frobnicate"));
    }

    #[tokio::test]
    async fn test_invalid_arguments_are_reported() {
        let handler = handler(vec![]);
        let result = handler
            .execute("create_project", Some(json!({ "owner": "acme" })))
            .await;

        assert_eq!(result.is_error, Some(true));
        assert!(result.text_content().contains("Invalid arguments"));
    }

    #[tokio::test]
    async fn test_missing_arguments_are_reported() {
        let handler = handler(vec![]);
        let result = handler.execute("remove_subissue", None).await;

        assert_eq!(result.is_error, Some(true));
        assert!(result.text_content().contains("Invalid arguments"));
    }

    #[tokio::test]
    async fn test_success_payload_is_pretty_json() {
        let handler = handler(vec![
            Ok(json!({ "repositoryOwner": { "id": "O_1" } })),
            Ok(json!({ "createProjectV2": { "projectV2": {
                "id": "PVT_1", "number": 7, "title": "Roadmap", "url": "https://example.test/p/7"
            } } })),
        ]);

        let result = handler
            .execute("create_project", Some(minimal_args("create_project")))
            .await;

        assert!(result.is_error.is_none());
        let text = result.text_content();
        assert!(text.contains("\"id\": \"PVT_1\""));
        assert!(text.contains("\"number\": 7"));
    }

    #[tokio::test]
    async fn test_remote_failure_text_is_verbatim() {
        let handler = handler(vec![Err(Error::Remote(
            "Could not resolve to a Repository".to_string(),
        ))]);

        let result = handler
            .execute("get_repository_info", Some(minimal_args("get_repository_info")))
            .await;

        assert_eq!(result.is_error, Some(true));
        assert_eq!(
            result.text_content(),
            "Error: Could not resolve to a Repository"
        );
    }

    #[tokio::test]
    async fn test_update_item_status_error_lists_fields() {
        let handler = handler(vec![Ok(json!({ "node": { "fields": { "nodes": [
            { "id": "F_1", "name": "Title", "dataType": "TITLE" },
            { "id": "F_2", "name": "Priority", "dataType": "SINGLE_SELECT", "options": [] }
        ] } } }))]);

        let result = handler
            .execute("update_item_status", Some(minimal_args("update_item_status")))
            .await;

        assert_eq!(result.is_error, Some(true));
        let text = result.text_content();
        assert!(text.contains("No 'Status' field found"));
        assert!(text.contains("Title"));
        assert!(text.contains("Priority"));
    }
}
