//! Error types for the GitHub Projects MCP server.

use thiserror::Error;

/// Main error type for project-management operations.
#[derive(Error, Debug)]
pub enum Error {
    /// An identifier lookup found no match
    #[error("{0}")]
    NotFound(String),

    /// A named project field is absent; lists the fields actually present
    #[error("No '{field}' field found in project. Available fields: {available}")]
    FieldNotFound { field: String, available: String },

    /// A named field option is absent; lists the options actually present
    #[error("'{value}' not found on field '{field}'. Available options: {available}")]
    OptionNotFound {
        value: String,
        field: String,
        available: String,
    },

    /// Tool name not present in the catalog
    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    /// Tool arguments did not match the declared schema
    #[error("Invalid arguments: {0}")]
    InvalidArgument(String),

    /// The GraphQL API rejected a call; message preserved verbatim
    #[error("{0}")]
    Remote(String),

    /// HTTP-level failure from the API endpoint
    #[error("GitHub API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// HTTP request failed before a response was received
    #[error("HTTP error: {0}")]
    Http(String),

    /// No usable credential could be obtained
    #[error("Authentication error: {0}")]
    Auth(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Serialization/deserialization failed
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type alias for project-management operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_message_is_verbatim() {
        let err = Error::NotFound("Repository 'acme/widgets' not found".to_string());
        assert_eq!(err.to_string(), "Repository 'acme/widgets' not found");
    }

    #[test]
    fn test_field_not_found_enumerates_fields() {
        let err = Error::FieldNotFound {
            field: "Status".to_string(),
            available: "Title, Assignees, Sprint".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("No 'Status' field found"));
        assert!(msg.contains("Title, Assignees, Sprint"));
    }

    #[test]
    fn test_option_not_found_enumerates_options() {
        let err = Error::OptionNotFound {
            value: "Blocked".to_string(),
            field: "Status".to_string(),
            available: "Todo, In Progress, Done".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("'Blocked' not found"));
        assert!(msg.contains("Todo, In Progress, Done"));
    }

    #[test]
    fn test_unknown_tool_names_offender() {
        let err = Error::UnknownTool("frobnicate".to_string());
        assert!(err.to_string().contains("frobnicate"));
    }

    #[test]
    fn test_remote_message_passes_through() {
        let err = Error::Remote("Could not resolve to a ProjectV2".to_string());
        assert_eq!(err.to_string(), "Could not resolve to a ProjectV2");
    }
}
