//! The declarative tool catalog.
//!
//! Names, argument schemas, and descriptions for every exposed tool. No
//! logic lives here; dispatch happens in [`crate::handlers`].

use serde_json::json;

use crate::protocol::ToolDefinition;

/// All tools this server exposes, in catalog order.
pub fn catalog() -> Vec<ToolDefinition> {
    vec![
        ToolDefinition {
            name: "create_project".to_string(),
            description: "Create a new GitHub Project (ProjectsV2). Returns the project ID and number.".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "owner": {
                        "type": "string",
                        "description": "GitHub username or organization name"
                    },
                    "title": {
                        "type": "string",
                        "description": "Project title"
                    },
                    "description": {
                        "type": "string",
                        "description": "Project description (optional)"
                    }
                },
                "required": ["owner", "title"]
            }),
        },
        ToolDefinition {
            name: "create_milestone".to_string(),
            description: "Create a milestone in a repository. Returns the milestone number and ID.".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "owner": {
                        "type": "string",
                        "description": "Repository owner"
                    },
                    "repo": {
                        "type": "string",
                        "description": "Repository name"
                    },
                    "title": {
                        "type": "string",
                        "description": "Milestone title"
                    },
                    "description": {
                        "type": "string",
                        "description": "Milestone description (optional)"
                    },
                    "dueOn": {
                        "type": "string",
                        "description": "Due date in ISO 8601 format (optional)"
                    }
                },
                "required": ["owner", "repo", "title"]
            }),
        },
        ToolDefinition {
            name: "create_issue".to_string(),
            description: "Create an issue with optional milestone and labels. Returns the issue number and URL.".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "owner": {
                        "type": "string",
                        "description": "Repository owner"
                    },
                    "repo": {
                        "type": "string",
                        "description": "Repository name"
                    },
                    "title": {
                        "type": "string",
                        "description": "Issue title"
                    },
                    "body": {
                        "type": "string",
                        "description": "Issue body (markdown)"
                    },
                    "milestoneNumber": {
                        "type": "number",
                        "description": "Milestone number to assign (optional)"
                    },
                    "labelIds": {
                        "type": "array",
                        "items": { "type": "string" },
                        "description": "Array of label IDs to assign (optional)"
                    },
                    "assignees": {
                        "type": "array",
                        "items": { "type": "string" },
                        "description": "Array of usernames to assign (optional)"
                    }
                },
                "required": ["owner", "repo", "title", "body"]
            }),
        },
        ToolDefinition {
            name: "add_issue_to_project".to_string(),
            description: "Add an issue to a ProjectsV2 board. Returns the project item ID.".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "projectId": {
                        "type": "string",
                        "description": "Project node ID (e.g., PVT_kwHOAwJiCM4BNC20)"
                    },
                    "issueId": {
                        "type": "string",
                        "description": "Issue node ID"
                    }
                },
                "required": ["projectId", "issueId"]
            }),
        },
        ToolDefinition {
            name: "create_iteration_field".to_string(),
            description: "Create an iteration field on a ProjectsV2 with weekly sprints. Returns field ID and iteration IDs.".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "projectId": {
                        "type": "string",
                        "description": "Project node ID"
                    },
                    "fieldName": {
                        "type": "string",
                        "description": "Field name (e.g., 'Sprint', 'Iteration')"
                    },
                    "duration": {
                        "type": "number",
                        "description": "Duration in days for each iteration (typically 7 for weekly)"
                    },
                    "startDate": {
                        "type": "string",
                        "description": "Start date in YYYY-MM-DD format"
                    },
                    "iterations": {
                        "type": "array",
                        "items": {
                            "type": "object",
                            "properties": {
                                "title": { "type": "string" },
                                "startDate": { "type": "string" },
                                "duration": { "type": "number" }
                            },
                            "required": ["title", "startDate", "duration"]
                        },
                        "description": "Array of iteration definitions"
                    }
                },
                "required": ["projectId", "fieldName", "duration", "startDate", "iterations"]
            }),
        },
        ToolDefinition {
            name: "assign_issue_to_iteration".to_string(),
            description: "Assign an issue to a specific iteration in a ProjectsV2. The issue must already be in the project.".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "owner": {
                        "type": "string",
                        "description": "Repository owner"
                    },
                    "repo": {
                        "type": "string",
                        "description": "Repository name"
                    },
                    "projectNumber": {
                        "type": "number",
                        "description": "Project number (not ID)"
                    },
                    "issueNumber": {
                        "type": "number",
                        "description": "Issue number"
                    },
                    "fieldId": {
                        "type": "string",
                        "description": "Iteration field ID"
                    },
                    "iterationId": {
                        "type": "string",
                        "description": "Iteration ID to assign to"
                    }
                },
                "required": ["owner", "repo", "projectNumber", "issueNumber", "fieldId", "iterationId"]
            }),
        },
        ToolDefinition {
            name: "add_subissue".to_string(),
            description: "Add a sub-issue to a given issue.".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "issueId": {
                        "type": "string",
                        "description": "The node ID of the parent issue."
                    },
                    "subIssueId": {
                        "type": "string",
                        "description": "The node ID of the sub-issue."
                    },
                    "subIssueUrl": {
                        "type": "string",
                        "description": "The URL of the sub-issue."
                    },
                    "replaceParent": {
                        "type": "boolean",
                        "description": "Option to replace parent issue if one already exists."
                    }
                },
                "required": ["issueId"]
            }),
        },
        ToolDefinition {
            name: "remove_subissue".to_string(),
            description: "Remove a sub-issue from a given issue.".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "issueId": {
                        "type": "string",
                        "description": "The node ID of the parent issue."
                    },
                    "subIssueId": {
                        "type": "string",
                        "description": "The node ID of the sub-issue to remove."
                    }
                },
                "required": ["issueId", "subIssueId"]
            }),
        },
        ToolDefinition {
            name: "reprioritize_subissue".to_string(),
            description: "Reprioritize a sub-issue within a given issue.".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "issueId": {
                        "type": "string",
                        "description": "The node ID of the parent issue."
                    },
                    "subIssueId": {
                        "type": "string",
                        "description": "The node ID of the sub-issue to reprioritize."
                    },
                    "afterId": {
                        "type": "string",
                        "description": "The ID of the sub-issue to be prioritized after (either afterId OR beforeId should be specified)."
                    },
                    "beforeId": {
                        "type": "string",
                        "description": "The ID of the sub-issue to be prioritized before (either afterId OR beforeId should be specified)."
                    }
                },
                "required": ["issueId", "subIssueId"]
            }),
        },
        ToolDefinition {
            name: "get_repository_info".to_string(),
            description: "Get repository ID, label IDs, and milestone info. Useful for gathering IDs needed for other operations.".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "owner": {
                        "type": "string",
                        "description": "Repository owner"
                    },
                    "repo": {
                        "type": "string",
                        "description": "Repository name"
                    }
                },
                "required": ["owner", "repo"]
            }),
        },
        ToolDefinition {
            name: "get_project_info".to_string(),
            description: "Get project ID, field IDs, and iteration IDs. Useful for configuring iterations.".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "owner": {
                        "type": "string",
                        "description": "Project owner (username or org)"
                    },
                    "projectNumber": {
                        "type": "number",
                        "description": "Project number"
                    }
                },
                "required": ["owner", "projectNumber"]
            }),
        },
        ToolDefinition {
            name: "update_item_status".to_string(),
            description: "Update the status of a project item using human-readable status values. Automatically resolves field and option IDs.".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "projectId": {
                        "type": "string",
                        "description": "Project node ID (e.g., PVT_kwHOAwJiCM4BNC20)"
                    },
                    "itemId": {
                        "type": "string",
                        "description": "Project item node ID (e.g., PVTI_lAHOAwJiCM4BNC20...)"
                    },
                    "status": {
                        "type": "string",
                        "description": "Human-readable status value (e.g., 'Todo', 'In Progress', 'Done')"
                    }
                },
                "required": ["projectId", "itemId", "status"]
            }),
        },
        ToolDefinition {
            name: "update_project_settings".to_string(),
            description: "Update project settings like title, description, readme, or visibility.".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "projectId": {
                        "type": "string",
                        "description": "Project node ID (e.g., PVT_kwHOAwJiCM4BNC20)"
                    },
                    "title": {
                        "type": "string",
                        "description": "New project title (optional)"
                    },
                    "shortDescription": {
                        "type": "string",
                        "description": "New short description (optional)"
                    },
                    "readme": {
                        "type": "string",
                        "description": "New README content (optional)"
                    },
                    "public": {
                        "type": "boolean",
                        "description": "Set project visibility (optional)"
                    }
                },
                "required": ["projectId"]
            }),
        },
    ]
}
