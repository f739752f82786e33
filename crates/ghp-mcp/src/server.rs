//! The MCP server loop.
//!
//! Reads newline-delimited JSON-RPC messages from the transport, dispatches
//! them, and writes responses. Stdout carries protocol traffic only; all
//! diagnostics go through tracing to stderr.

use std::sync::Arc;

use ghp_core::GraphqlClient;
use serde_json::Value;

use crate::handlers::ToolHandler;
use crate::protocol::{
    InitializeParams, InitializeResult, JsonRpcError, JsonRpcNotification, JsonRpcRequest,
    JsonRpcResponse, RequestId, ServerCapabilities, ServerInfo, ToolCallParams, ToolsCapability,
    ToolsListResult, MCP_VERSION,
};
use crate::transport::{IncomingMessage, StdioTransport};
use crate::tools;

const SERVER_NAME: &str = "github-projects-mcp";

/// MCP server: owns the tool handler and the session state.
pub struct McpServer {
    handler: ToolHandler,
    initialized: bool,
}

impl McpServer {
    /// Create a server backed by the given GraphQL client.
    pub fn new(client: Arc<dyn GraphqlClient>) -> Self {
        Self {
            handler: ToolHandler::new(client),
            initialized: false,
        }
    }

    /// Run the server loop over stdio until EOF.
    pub async fn run(mut self) -> std::io::Result<()> {
        let mut transport = StdioTransport::stdio();

        tracing::info!(
            "{} v{} listening on stdio ({} tools)",
            SERVER_NAME,
            env!("CARGO_PKG_VERSION"),
            tools::catalog().len()
        );

        loop {
            match transport.read_message() {
                Ok(Some(IncomingMessage::Request(request))) => {
                    let response = self.handle_request(request).await;
                    transport.write_response(&response)?;
                }
                Ok(Some(IncomingMessage::Notification(notification))) => {
                    self.handle_notification(&notification);
                }
                Ok(None) => {
                    tracing::info!("Client disconnected, shutting down");
                    return Ok(());
                }
                Err(e) if e.kind() == std::io::ErrorKind::InvalidData => {
                    tracing::warn!("Skipping malformed message: {}", e);
                }
                Err(e) => return Err(e),
            }
        }
    }

    async fn handle_request(&mut self, request: JsonRpcRequest) -> JsonRpcResponse {
        tracing::debug!("Handling request: {}", request.method);

        match request.method.as_str() {
            "initialize" => self.handle_initialize(request.id, request.params),
            "tools/list" => self.handle_tools_list(request.id),
            "tools/call" => self.handle_tools_call(request.id, request.params).await,
            "ping" => JsonRpcResponse::success(request.id, serde_json::json!({})),
            other => {
                tracing::warn!("Unknown method: {}", other);
                JsonRpcResponse::error(request.id, JsonRpcError::method_not_found(other))
            }
        }
    }

    fn handle_initialize(&mut self, id: RequestId, params: Option<Value>) -> JsonRpcResponse {
        if self.initialized {
            return JsonRpcResponse::error(
                id,
                JsonRpcError::invalid_request("Server already initialized"),
            );
        }

        let params: InitializeParams = match parse_params(params) {
            Ok(p) => p,
            Err(e) => return JsonRpcResponse::error(id, e),
        };

        tracing::info!(
            "Initializing for client {} v{} (protocol {})",
            params.client_info.name,
            params.client_info.version,
            params.protocol_version
        );

        self.initialized = true;

        let result = InitializeResult {
            protocol_version: MCP_VERSION.to_string(),
            capabilities: ServerCapabilities {
                tools: ToolsCapability {
                    list_changed: false,
                },
            },
            server_info: ServerInfo {
                name: SERVER_NAME.to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
        };

        match serde_json::to_value(&result) {
            Ok(value) => JsonRpcResponse::success(id, value),
            Err(e) => JsonRpcResponse::error(id, JsonRpcError::parse_error(&e.to_string())),
        }
    }

    fn handle_tools_list(&self, id: RequestId) -> JsonRpcResponse {
        let result = ToolsListResult {
            tools: self.handler.available_tools(),
        };

        match serde_json::to_value(&result) {
            Ok(value) => JsonRpcResponse::success(id, value),
            Err(e) => JsonRpcResponse::error(id, JsonRpcError::parse_error(&e.to_string())),
        }
    }

    async fn handle_tools_call(&self, id: RequestId, params: Option<Value>) -> JsonRpcResponse {
        let params: ToolCallParams = match parse_params(params) {
            Ok(p) => p,
            Err(e) => return JsonRpcResponse::error(id, e),
        };

        tracing::info!("Calling tool: {}", params.name);

        let result = self.handler.execute(&params.name, params.arguments).await;

        match serde_json::to_value(&result) {
            Ok(value) => JsonRpcResponse::success(id, value),
            Err(e) => JsonRpcResponse::error(id, JsonRpcError::parse_error(&e.to_string())),
        }
    }

    fn handle_notification(&self, notification: &JsonRpcNotification) {
        match notification.method.as_str() {
            "initialized" | "notifications/initialized" => {
                tracing::debug!("Client reports ready");
            }
            "notifications/cancelled" => {
                tracing::debug!("Client cancelled a request");
            }
            other => {
                tracing::debug!("Ignoring notification: {}", other);
            }
        }
    }
}

fn parse_params<T: serde::de::DeserializeOwned>(
    params: Option<Value>,
) -> Result<T, JsonRpcError> {
    let params = params.ok_or_else(|| JsonRpcError::invalid_params("missing params"))?;
    serde_json::from_value(params).map_err(|e| JsonRpcError::invalid_params(&e.to_string()))
}
