//! MCP (Model Context Protocol) server for GitHub Projects.
//!
//! Exposes the project-management tool catalog to MCP clients over stdio and
//! routes tool calls to the GitHub operation executors.

pub mod handlers;
pub mod protocol;
pub mod server;
pub mod tools;
pub mod transport;

pub use handlers::ToolHandler;
pub use server::McpServer;
