//! Identifier resolution.
//!
//! GitHub mutations take opaque node IDs, while callers supply human-facing
//! references (logins, repo names, milestone numbers). Each resolver here
//! performs one read-only round trip and returns the node ID, or `NotFound`
//! naming the reference that failed. Nothing is cached: remote state is
//! authoritative, so every call is a fresh lookup.

use ghp_core::{Error, GraphqlClient, Result};
use serde_json::{json, Value};

const OWNER_ID_QUERY: &str = r#"
query($login: String!) {
  repositoryOwner(login: $login) {
    id
  }
}
"#;

const REPOSITORY_ID_QUERY: &str = r#"
query($owner: String!, $repo: String!) {
  repository(owner: $owner, name: $repo) {
    id
  }
}
"#;

const MILESTONE_ID_QUERY: &str = r#"
query($owner: String!, $repo: String!, $number: Int!) {
  repository(owner: $owner, name: $repo) {
    milestone(number: $number) {
      id
    }
  }
}
"#;

const USER_ID_QUERY: &str = r#"
query($login: String!) {
  user(login: $login) {
    id
  }
}
"#;

const PROJECT_ID_QUERY: &str = r#"
query($owner: String!, $number: Int!) {
  user(login: $owner) {
    projectV2(number: $number) {
      id
    }
  }
}
"#;

const PROJECT_ITEMS_QUERY: &str = r#"
query($owner: String!, $repo: String!, $issueNumber: Int!) {
  repository(owner: $owner, name: $repo) {
    issue(number: $issueNumber) {
      projectItems(first: 10) {
        nodes {
          id
          project {
            number
          }
        }
      }
    }
  }
}
"#;

/// Resolve a user or organization login to its node ID.
pub async fn owner_id(client: &dyn GraphqlClient, login: &str) -> Result<String> {
    let data = client
        .execute(OWNER_ID_QUERY, json!({ "login": login }))
        .await?;
    id_at(&data, "/repositoryOwner/id")
        .ok_or_else(|| Error::NotFound(format!("Owner '{}' not found", login)))
}

/// Resolve an `owner/repo` pair to the repository node ID.
pub async fn repository_id(client: &dyn GraphqlClient, owner: &str, repo: &str) -> Result<String> {
    let data = client
        .execute(REPOSITORY_ID_QUERY, json!({ "owner": owner, "repo": repo }))
        .await?;
    id_at(&data, "/repository/id")
        .ok_or_else(|| Error::NotFound(format!("Repository '{}/{}' not found", owner, repo)))
}

/// Resolve a milestone by its number within a repository.
pub async fn milestone_id(
    client: &dyn GraphqlClient,
    owner: &str,
    repo: &str,
    number: u64,
) -> Result<String> {
    let data = client
        .execute(
            MILESTONE_ID_QUERY,
            json!({ "owner": owner, "repo": repo, "number": number }),
        )
        .await?;
    id_at(&data, "/repository/milestone/id").ok_or_else(|| {
        Error::NotFound(format!(
            "Milestone #{} not found in {}/{}",
            number, owner, repo
        ))
    })
}

/// Resolve an assignee username to its user node ID.
pub async fn user_id(client: &dyn GraphqlClient, username: &str) -> Result<String> {
    let data = client
        .execute(USER_ID_QUERY, json!({ "login": username }))
        .await?;
    id_at(&data, "/user/id").ok_or_else(|| Error::NotFound(format!("User '{}' not found", username)))
}

/// Resolve a project by its owner and number.
pub async fn project_id(client: &dyn GraphqlClient, owner: &str, number: u64) -> Result<String> {
    let data = client
        .execute(PROJECT_ID_QUERY, json!({ "owner": owner, "number": number }))
        .await?;
    id_at(&data, "/user/projectV2/id").ok_or_else(|| {
        Error::NotFound(format!("Project #{} not found for owner '{}'", number, owner))
    })
}

/// Resolve the project-item ID linking an issue to a specific project.
///
/// Fetches the issue's project memberships (first page of 10) and scans for
/// the one whose project number matches. An issue attached to more than 10
/// projects can have its membership fall outside the fetched page; that
/// membership is then reported as not found.
pub async fn project_item_id(
    client: &dyn GraphqlClient,
    owner: &str,
    repo: &str,
    issue_number: u64,
    project_number: u64,
) -> Result<String> {
    let data = client
        .execute(
            PROJECT_ITEMS_QUERY,
            json!({ "owner": owner, "repo": repo, "issueNumber": issue_number }),
        )
        .await?;

    let nodes = data
        .pointer("/repository/issue/projectItems/nodes")
        .and_then(Value::as_array)
        .ok_or_else(|| {
            Error::NotFound(format!(
                "Issue #{} not found in {}/{}",
                issue_number, owner, repo
            ))
        })?;

    nodes
        .iter()
        .find(|node| {
            node.pointer("/project/number").and_then(Value::as_u64) == Some(project_number)
        })
        .and_then(|node| node.get("id").and_then(Value::as_str))
        .map(str::to_string)
        .ok_or_else(|| {
            Error::NotFound(format!(
                "Issue #{} not found in project #{}",
                issue_number, project_number
            ))
        })
}

fn id_at(data: &Value, pointer: &str) -> Option<String> {
    data.pointer(pointer)
        .and_then(Value::as_str)
        .map(str::to_string)
}
