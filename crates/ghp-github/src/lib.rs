//! GitHub side of the Projects MCP server.
//!
//! Contains the GraphQL client, token acquisition, identifier and field
//! resolution, and the per-tool operation executors.

pub mod auth;
pub mod client;
pub mod fields;
pub mod ops;
pub mod resolve;
pub mod types;

pub use client::GithubGraphql;

#[cfg(test)]
pub(crate) mod test_support;
