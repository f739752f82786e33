//! Core traits, types, and error handling for the GitHub Projects MCP server.
//!
//! This crate provides the foundational abstractions shared by the GitHub
//! client, the operation executors, and the MCP server.

pub mod config;
pub mod error;
pub mod graphql;

pub use config::Config;
pub use error::{Error, Result};
pub use graphql::GraphqlClient;
