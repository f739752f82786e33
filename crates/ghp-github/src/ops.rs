//! Operation executors.
//!
//! One function per tool. Each executor resolves whatever human-facing
//! references its input carries, issues the remote calls in dependency
//! order, and returns the mutation/query result substructure verbatim as
//! JSON. A failure at any step short-circuits the remaining steps.

use ghp_core::{Error, GraphqlClient, Result};
use serde_json::{json, Map, Value};

use crate::fields;
use crate::resolve;
use crate::types::*;

/// The project field consulted by `update_item_status`. The lookup itself is
/// case-insensitive; only this canonical name is assumed.
pub const STATUS_FIELD_NAME: &str = "Status";

const CREATE_PROJECT_MUTATION: &str = r#"
mutation($ownerId: ID!, $title: String!) {
  createProjectV2(input: {
    ownerId: $ownerId
    title: $title
  }) {
    projectV2 {
      id
      number
      title
      url
    }
  }
}
"#;

const CREATE_MILESTONE_MUTATION: &str = r#"
mutation($repoId: ID!, $title: String!, $description: String, $dueOn: DateTime) {
  createMilestone(input: {
    repositoryId: $repoId
    title: $title
    description: $description
    dueOn: $dueOn
  }) {
    milestone {
      id
      number
      title
      url
    }
  }
}
"#;

const CREATE_ISSUE_MUTATION: &str = r#"
mutation($repoId: ID!, $title: String!, $body: String!, $milestoneId: ID, $labelIds: [ID!], $assigneeIds: [ID!]) {
  createIssue(input: {
    repositoryId: $repoId
    title: $title
    body: $body
    milestoneId: $milestoneId
    labelIds: $labelIds
    assigneeIds: $assigneeIds
  }) {
    issue {
      id
      number
      title
      url
    }
  }
}
"#;

const ADD_ITEM_MUTATION: &str = r#"
mutation($projectId: ID!, $contentId: ID!) {
  addProjectV2ItemById(input: {
    projectId: $projectId
    contentId: $contentId
  }) {
    item {
      id
    }
  }
}
"#;

const CREATE_ITERATION_FIELD_MUTATION: &str = r#"
mutation($projectId: ID!, $name: String!) {
  createProjectV2Field(input: {
    projectId: $projectId
    dataType: ITERATION
    name: $name
  }) {
    projectV2Field {
      ... on ProjectV2IterationField {
        id
        name
      }
    }
  }
}
"#;

const CONFIGURE_ITERATION_FIELD_MUTATION: &str = r#"
mutation($projectId: ID!, $fieldId: ID!, $duration: Int!, $startDate: Date!, $iterations: [ProjectV2IterationFieldIterationInput!]!) {
  updateProjectV2Field(input: {
    projectId: $projectId
    fieldId: $fieldId
    iterationConfiguration: {
      duration: $duration
      startDate: $startDate
      iterations: $iterations
    }
  }) {
    projectV2Field {
      ... on ProjectV2IterationField {
        id
        name
        configuration {
          iterations {
            id
            title
            startDate
            duration
          }
        }
      }
    }
  }
}
"#;

const SET_ITERATION_VALUE_MUTATION: &str = r#"
mutation($projectId: ID!, $itemId: ID!, $fieldId: ID!, $iterationId: String!) {
  updateProjectV2ItemFieldValue(input: {
    projectId: $projectId
    itemId: $itemId
    fieldId: $fieldId
    value: {
      iterationId: $iterationId
    }
  }) {
    projectV2Item {
      id
    }
  }
}
"#;

const ADD_SUB_ISSUE_MUTATION: &str = r#"
mutation($issueId: ID!, $subIssueId: ID, $subIssueUrl: String, $replaceParent: Boolean) {
  addSubIssue(input: {
    issueId: $issueId
    subIssueId: $subIssueId
    subIssueUrl: $subIssueUrl
    replaceParent: $replaceParent
  }) {
    issue {
      id
      number
      title
    }
    subIssue {
      id
      number
      title
    }
  }
}
"#;

const REMOVE_SUB_ISSUE_MUTATION: &str = r#"
mutation($issueId: ID!, $subIssueId: ID!) {
  removeSubIssue(input: {
    issueId: $issueId
    subIssueId: $subIssueId
  }) {
    issue {
      id
      number
      title
    }
    subIssue {
      id
      number
      title
    }
  }
}
"#;

const REPRIORITIZE_SUB_ISSUE_MUTATION: &str = r#"
mutation($issueId: ID!, $subIssueId: ID!, $afterId: ID, $beforeId: ID) {
  reprioritizeSubIssue(input: {
    issueId: $issueId
    subIssueId: $subIssueId
    afterId: $afterId
    beforeId: $beforeId
  }) {
    issue {
      id
      number
      title
    }
  }
}
"#;

const REPOSITORY_INFO_QUERY: &str = r#"
query($owner: String!, $repo: String!) {
  repository(owner: $owner, name: $repo) {
    id
    name
    labels(first: 100) {
      nodes {
        id
        name
      }
    }
    milestones(first: 100, orderBy: {field: CREATED_AT, direction: DESC}) {
      nodes {
        id
        number
        title
      }
    }
  }
}
"#;

const PROJECT_INFO_QUERY: &str = r#"
query($owner: String!, $number: Int!) {
  user(login: $owner) {
    projectV2(number: $number) {
      id
      title
      number
      fields(first: 100) {
        nodes {
          ... on ProjectV2Field {
            id
            name
            dataType
          }
          ... on ProjectV2IterationField {
            id
            name
            dataType
            configuration {
              iterations {
                id
                title
                startDate
                duration
              }
            }
          }
          ... on ProjectV2SingleSelectField {
            id
            name
            dataType
            options {
              id
              name
            }
          }
        }
      }
    }
  }
}
"#;

const PROJECT_FIELDS_QUERY: &str = r#"
query($projectId: ID!) {
  node(id: $projectId) {
    ... on ProjectV2 {
      fields(first: 100) {
        nodes {
          ... on ProjectV2SingleSelectField {
            id
            name
            dataType
            options {
              id
              name
            }
          }
        }
      }
    }
  }
}
"#;

const SET_SELECT_VALUE_MUTATION: &str = r#"
mutation($projectId: ID!, $itemId: ID!, $fieldId: ID!, $value: ProjectV2FieldValue!) {
  updateProjectV2ItemFieldValue(input: {
    projectId: $projectId
    itemId: $itemId
    fieldId: $fieldId
    value: $value
  }) {
    projectV2Item {
      id
    }
  }
}
"#;

const UPDATE_PROJECT_MUTATION: &str = r#"
mutation($input: UpdateProjectV2Input!) {
  updateProjectV2(input: $input) {
    projectV2 {
      id
      title
      shortDescription
      readme
      public
      url
    }
  }
}
"#;

/// Create a ProjectsV2 board for a user or organization.
pub async fn create_project(client: &dyn GraphqlClient, input: CreateProjectInput) -> Result<Value> {
    let owner_id = resolve::owner_id(client, &input.owner).await?;
    let data = client
        .execute(
            CREATE_PROJECT_MUTATION,
            json!({ "ownerId": owner_id, "title": input.title }),
        )
        .await?;
    extract(data, "/createProjectV2/projectV2")
}

/// Create a milestone in a repository.
pub async fn create_milestone(
    client: &dyn GraphqlClient,
    input: CreateMilestoneInput,
) -> Result<Value> {
    let repo_id = resolve::repository_id(client, &input.owner, &input.repo).await?;
    let data = client
        .execute(
            CREATE_MILESTONE_MUTATION,
            json!({
                "repoId": repo_id,
                "title": input.title,
                "description": input.description.unwrap_or_default(),
                "dueOn": input.due_on,
            }),
        )
        .await?;
    extract(data, "/createMilestone/milestone")
}

/// Create an issue, resolving the milestone and assignees only when supplied.
pub async fn create_issue(client: &dyn GraphqlClient, input: CreateIssueInput) -> Result<Value> {
    let repo_id = resolve::repository_id(client, &input.owner, &input.repo).await?;

    let milestone_id = match input.milestone_number {
        Some(number) => {
            Some(resolve::milestone_id(client, &input.owner, &input.repo, number).await?)
        }
        None => None,
    };

    let mut assignee_ids = Vec::new();
    if let Some(assignees) = &input.assignees {
        for username in assignees {
            assignee_ids.push(resolve::user_id(client, username).await?);
        }
    }

    let data = client
        .execute(
            CREATE_ISSUE_MUTATION,
            json!({
                "repoId": repo_id,
                "title": input.title,
                "body": input.body,
                "milestoneId": milestone_id,
                "labelIds": input.label_ids.unwrap_or_default(),
                "assigneeIds": assignee_ids,
            }),
        )
        .await?;
    extract(data, "/createIssue/issue")
}

/// Add an issue to a project board.
pub async fn add_issue_to_project(
    client: &dyn GraphqlClient,
    input: AddIssueToProjectInput,
) -> Result<Value> {
    let data = client
        .execute(
            ADD_ITEM_MUTATION,
            json!({ "projectId": input.project_id, "contentId": input.issue_id }),
        )
        .await?;
    extract(data, "/addProjectV2ItemById/item")
}

/// Create an iteration field and attach its configuration.
///
/// Two-phase: the field must exist before the iteration configuration can be
/// attached, so the configure call only runs once the create call has
/// returned a field ID.
pub async fn create_iteration_field(
    client: &dyn GraphqlClient,
    input: CreateIterationFieldInput,
) -> Result<Value> {
    let created = client
        .execute(
            CREATE_ITERATION_FIELD_MUTATION,
            json!({ "projectId": input.project_id, "name": input.field_name }),
        )
        .await?;

    let field_id = created
        .pointer("/createProjectV2Field/projectV2Field/id")
        .and_then(Value::as_str)
        .ok_or_else(|| {
            Error::Remote("Field creation returned no field ID".to_string())
        })?
        .to_string();

    let configured = client
        .execute(
            CONFIGURE_ITERATION_FIELD_MUTATION,
            json!({
                "projectId": input.project_id,
                "fieldId": field_id,
                "duration": input.duration,
                "startDate": input.start_date,
                "iterations": input.iterations,
            }),
        )
        .await?;
    extract(configured, "/updateProjectV2Field/projectV2Field")
}

/// Assign an issue already on a project board to an iteration.
///
/// The iteration ID comes from the caller (obtained via `get_project_info`);
/// the project ID and the board membership are resolved here.
pub async fn assign_issue_to_iteration(
    client: &dyn GraphqlClient,
    input: AssignIterationInput,
) -> Result<Value> {
    let item_id = resolve::project_item_id(
        client,
        &input.owner,
        &input.repo,
        input.issue_number,
        input.project_number,
    )
    .await?;
    let project_id = resolve::project_id(client, &input.owner, input.project_number).await?;

    let data = client
        .execute(
            SET_ITERATION_VALUE_MUTATION,
            json!({
                "projectId": project_id,
                "itemId": item_id,
                "fieldId": input.field_id,
                "iterationId": input.iteration_id,
            }),
        )
        .await?;
    extract(data, "/updateProjectV2ItemFieldValue/projectV2Item")
}

/// Attach a sub-issue to a parent issue.
pub async fn add_subissue(client: &dyn GraphqlClient, input: AddSubIssueInput) -> Result<Value> {
    let data = client
        .execute(
            ADD_SUB_ISSUE_MUTATION,
            json!({
                "issueId": input.issue_id,
                "subIssueId": input.sub_issue_id,
                "subIssueUrl": input.sub_issue_url,
                "replaceParent": input.replace_parent.unwrap_or(false),
            }),
        )
        .await?;
    extract(data, "/addSubIssue")
}

/// Detach a sub-issue from a parent issue.
pub async fn remove_subissue(
    client: &dyn GraphqlClient,
    input: RemoveSubIssueInput,
) -> Result<Value> {
    let data = client
        .execute(
            REMOVE_SUB_ISSUE_MUTATION,
            json!({ "issueId": input.issue_id, "subIssueId": input.sub_issue_id }),
        )
        .await?;
    extract(data, "/removeSubIssue")
}

/// Move a sub-issue within its parent's ordered list.
pub async fn reprioritize_subissue(
    client: &dyn GraphqlClient,
    input: ReprioritizeSubIssueInput,
) -> Result<Value> {
    let data = client
        .execute(
            REPRIORITIZE_SUB_ISSUE_MUTATION,
            json!({
                "issueId": input.issue_id,
                "subIssueId": input.sub_issue_id,
                "afterId": input.after_id,
                "beforeId": input.before_id,
            }),
        )
        .await?;
    extract(data, "/reprioritizeSubIssue")
}

/// Fetch repository ID, labels, and milestones.
pub async fn get_repository_info(
    client: &dyn GraphqlClient,
    input: RepositoryInfoInput,
) -> Result<Value> {
    let data = client
        .execute(
            REPOSITORY_INFO_QUERY,
            json!({ "owner": input.owner, "repo": input.repo }),
        )
        .await?;
    extract(data, "/repository")
}

/// Fetch project ID, fields, and iteration IDs.
pub async fn get_project_info(
    client: &dyn GraphqlClient,
    input: ProjectInfoInput,
) -> Result<Value> {
    let data = client
        .execute(
            PROJECT_INFO_QUERY,
            json!({ "owner": input.owner, "number": input.project_number }),
        )
        .await?;
    extract(data, "/user/projectV2")
}

/// Set a project item's status by human-readable option name.
///
/// Four dependent steps: fetch the field page, find the status field, find
/// the requested option, then write the value. Each failure stops the chain.
pub async fn update_item_status(
    client: &dyn GraphqlClient,
    input: UpdateItemStatusInput,
) -> Result<Value> {
    let data = client
        .execute(PROJECT_FIELDS_QUERY, json!({ "projectId": input.project_id }))
        .await?;

    let nodes = data
        .pointer("/node/fields/nodes")
        .and_then(Value::as_array)
        .cloned()
        .ok_or_else(|| {
            Error::NotFound(format!("Project '{}' not found", input.project_id))
        })?;

    let field = fields::single_select_by_name(&nodes, STATUS_FIELD_NAME)?;
    let option = fields::option_by_name(&field, &input.status)?;

    let updated = client
        .execute(
            SET_SELECT_VALUE_MUTATION,
            json!({
                "projectId": input.project_id,
                "itemId": input.item_id,
                "fieldId": field.id,
                "value": { "singleSelectOptionId": option.id },
            }),
        )
        .await?;

    let item_id = extract(updated, "/updateProjectV2ItemFieldValue/projectV2Item/id")?;
    Ok(json!({
        "success": true,
        "message": format!("Status updated to '{}'", option.name),
        "itemId": item_id,
    }))
}

/// Update a subset of project settings.
///
/// Only the attributes the caller actually supplied go into the mutation
/// input; everything else is omitted entirely so the remote system leaves it
/// unchanged.
pub async fn update_project_settings(
    client: &dyn GraphqlClient,
    input: UpdateProjectSettingsInput,
) -> Result<Value> {
    let mut update = Map::new();
    update.insert("projectId".to_string(), json!(input.project_id));
    if let Some(title) = input.title {
        update.insert("title".to_string(), json!(title));
    }
    if let Some(short_description) = input.short_description {
        update.insert("shortDescription".to_string(), json!(short_description));
    }
    if let Some(readme) = input.readme {
        update.insert("readme".to_string(), json!(readme));
    }
    if let Some(public) = input.public {
        update.insert("public".to_string(), json!(public));
    }

    let data = client
        .execute(UPDATE_PROJECT_MUTATION, json!({ "input": update }))
        .await?;

    let project = extract(data, "/updateProjectV2/projectV2")?;
    Ok(json!({
        "success": true,
        "message": "Project settings updated successfully",
        "project": project,
    }))
}

/// Pull the relevant substructure out of a response, or fail if the shape is
/// not what the document asked for.
fn extract(data: Value, pointer: &str) -> Result<Value> {
    data.pointer(pointer)
        .cloned()
        .ok_or_else(|| Error::Remote(format!("Unexpected response shape: missing {}", pointer)))
}
