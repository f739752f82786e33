//! Typed tool inputs.
//!
//! Tool arguments arrive as an untyped JSON bag; each operation deserializes
//! into one of these structs before doing any work, so a malformed call
//! fails with a structured argument error instead of partway through a
//! remote protocol. Field names follow the tool schemas (camelCase).

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProjectInput {
    pub owner: String,
    pub title: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateMilestoneInput {
    pub owner: String,
    pub repo: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub due_on: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateIssueInput {
    pub owner: String,
    pub repo: String,
    pub title: String,
    pub body: String,
    #[serde(default)]
    pub milestone_number: Option<u64>,
    #[serde(default)]
    pub label_ids: Option<Vec<String>>,
    #[serde(default)]
    pub assignees: Option<Vec<String>>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddIssueToProjectInput {
    pub project_id: String,
    pub issue_id: String,
}

/// One named, dated iteration period within an iteration field.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IterationSpec {
    pub title: String,
    pub start_date: String,
    pub duration: u32,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateIterationFieldInput {
    pub project_id: String,
    pub field_name: String,
    pub duration: u32,
    pub start_date: String,
    pub iterations: Vec<IterationSpec>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignIterationInput {
    pub owner: String,
    pub repo: String,
    pub project_number: u64,
    pub issue_number: u64,
    pub field_id: String,
    pub iteration_id: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddSubIssueInput {
    pub issue_id: String,
    #[serde(default)]
    pub sub_issue_id: Option<String>,
    #[serde(default)]
    pub sub_issue_url: Option<String>,
    #[serde(default)]
    pub replace_parent: Option<bool>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoveSubIssueInput {
    pub issue_id: String,
    pub sub_issue_id: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReprioritizeSubIssueInput {
    pub issue_id: String,
    pub sub_issue_id: String,
    #[serde(default)]
    pub after_id: Option<String>,
    #[serde(default)]
    pub before_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepositoryInfoInput {
    pub owner: String,
    pub repo: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectInfoInput {
    pub owner: String,
    pub project_number: u64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateItemStatusInput {
    pub project_id: String,
    pub item_id: String,
    pub status: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProjectSettingsInput {
    pub project_id: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub short_description: Option<String>,
    #[serde(default)]
    pub readme: Option<String>,
    #[serde(default)]
    pub public: Option<bool>,
}
