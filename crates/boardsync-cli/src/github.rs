//! GitHub GraphQL implementation of the tracker-client seam.
//!
//! One blocking HTTPS request per GraphQL operation, issued in the
//! order the pipeline calls them. `create_issue_add_to_project` is
//! three operations under the hood (create, link to parent, add to
//! board); the board is assumed to order cards by call sequence, which
//! is why the pipeline never issues calls concurrently.

use serde_json::{Value, json};

use boardsync_core::error::{Result, SyncError};
use boardsync_core::model::{IssueId, LabelId};
use boardsync_core::tracker::{NewIssue, ProjectInfo, RepositoryId, TrackerClient};

const DEFAULT_ENDPOINT: &str = "https://api.github.com/graphql";
const USER_AGENT: &str = "boardsync-cli";

/// Color assigned to labels this tool creates; GitHub requires one.
const LABEL_COLOR: &str = "ededed";

pub struct GitHubClient {
    token: String,
    endpoint: String,
    requests: usize,
}

impl GitHubClient {
    #[must_use]
    pub fn new(token: String) -> Self {
        Self::with_endpoint(token, DEFAULT_ENDPOINT.to_string())
    }

    /// Point the client at a non-default endpoint (GitHub Enterprise,
    /// or a local stub in tests).
    #[must_use]
    pub fn with_endpoint(token: String, endpoint: String) -> Self {
        Self {
            token,
            endpoint,
            requests: 0,
        }
    }

    /// Number of HTTPS requests issued so far.
    #[must_use]
    pub const fn request_count(&self) -> usize {
        self.requests
    }

    /// Execute one GraphQL operation and return its `data` object.
    fn graphql(&mut self, operation: &str, query: &str, variables: Value) -> Result<Value> {
        self.requests += 1;

        let response = ureq::post(&self.endpoint)
            .set("Authorization", &format!("Bearer {}", self.token))
            .set("User-Agent", USER_AGENT)
            .send_json(json!({ "query": query, "variables": variables }))
            .map_err(|err| SyncError::external(operation, err.to_string()))?;

        let body: Value = response
            .into_json()
            .map_err(|err| SyncError::external(operation, format!("invalid JSON reply: {err}")))?;

        if let Some(errors) = body.get("errors").and_then(Value::as_array) {
            if !errors.is_empty() {
                let message = errors
                    .iter()
                    .filter_map(|e| e.get("message").and_then(Value::as_str))
                    .collect::<Vec<_>>()
                    .join("; ");
                return Err(SyncError::external(operation, message));
            }
        }

        body.get("data")
            .cloned()
            .ok_or_else(|| SyncError::external(operation, "reply has no data object"))
    }

    /// Pull a string out of the reply at a JSON pointer path.
    fn extract(operation: &str, data: &Value, pointer: &str) -> Result<String> {
        data.pointer(pointer)
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| {
                SyncError::external(operation, format!("reply is missing {pointer}"))
            })
    }
}

impl TrackerClient for GitHubClient {
    fn repository_id(&mut self, owner: &str, repo: &str) -> Result<RepositoryId> {
        let op = "repository_id";
        let data = self.graphql(
            op,
            "query($owner: String!, $repo: String!) {\n  repository(owner: $owner, name: $repo) { id }\n}",
            json!({ "owner": owner, "repo": repo }),
        )?;
        Ok(RepositoryId(Self::extract(op, &data, "/repository/id")?))
    }

    fn project_info(&mut self, owner: &str, repo: &str) -> Result<ProjectInfo> {
        let op = "project_info";
        let data = self.graphql(
            op,
            "query($owner: String!, $repo: String!) {\n  repository(owner: $owner, name: $repo) {\n    projectsV2(first: 1) { nodes { id title } }\n  }\n}",
            json!({ "owner": owner, "repo": repo }),
        )?;
        let project_id = Self::extract(op, &data, "/repository/projectsV2/nodes/0/id")
            .map_err(|_| {
                SyncError::external(op, format!("repository {owner}/{repo} has no project board"))
            })?;
        let title = Self::extract(op, &data, "/repository/projectsV2/nodes/0/title")
            .unwrap_or_default();
        Ok(ProjectInfo { project_id, title })
    }

    fn create_label_if_not_exists(
        &mut self,
        repository: &RepositoryId,
        name: &str,
    ) -> Result<LabelId> {
        let op = "create_label_if_not_exists";

        // Get-or-create: look the name up first so repeated runs never
        // duplicate a label.
        let data = self.graphql(
            op,
            "query($id: ID!, $name: String!) {\n  node(id: $id) { ... on Repository { label(name: $name) { id } } }\n}",
            json!({ "id": repository.0, "name": name }),
        )?;
        if let Some(id) = data.pointer("/node/label/id").and_then(Value::as_str) {
            return Ok(LabelId(id.to_string()));
        }

        let data = self.graphql(
            op,
            "mutation($repo: ID!, $name: String!, $color: String!) {\n  createLabel(input: { repositoryId: $repo, name: $name, color: $color }) {\n    label { id }\n  }\n}",
            json!({ "repo": repository.0, "name": name, "color": LABEL_COLOR }),
        )?;
        Ok(LabelId(Self::extract(op, &data, "/createLabel/label/id")?))
    }

    fn create_issue(
        &mut self,
        repository: &RepositoryId,
        issue: &NewIssue<'_>,
        label: &LabelId,
    ) -> Result<IssueId> {
        let op = "create_issue";
        let data = self.graphql(
            op,
            "mutation($repo: ID!, $title: String!, $body: String!, $labels: [ID!]) {\n  createIssue(input: { repositoryId: $repo, title: $title, body: $body, labelIds: $labels }) {\n    issue { id }\n  }\n}",
            json!({ "repo": repository.0, "title": issue.title, "body": issue.body, "labels": [label.0] }),
        )?;
        Ok(IssueId(Self::extract(op, &data, "/createIssue/issue/id")?))
    }

    fn create_issue_add_to_project(
        &mut self,
        repository: &RepositoryId,
        project: &ProjectInfo,
        issue: &NewIssue<'_>,
        label: &LabelId,
    ) -> Result<IssueId> {
        let op = "create_issue_add_to_project";
        let issue_id = self.create_issue(repository, issue, label)?;

        if let Some(parent) = issue.parent_issue_id {
            self.graphql(
                op,
                "mutation($parent: ID!, $child: ID!) {\n  addSubIssue(input: { issueId: $parent, subIssueId: $child }) {\n    issue { id }\n  }\n}",
                json!({ "parent": parent.0, "child": issue_id.0 }),
            )?;
        }

        self.graphql(
            op,
            "mutation($project: ID!, $content: ID!) {\n  addProjectV2ItemById(input: { projectId: $project, contentId: $content }) {\n    item { id }\n  }\n}",
            json!({ "project": project.project_id, "content": issue_id.0 }),
        )?;

        Ok(issue_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extract_reads_nested_string() {
        let data = json!({ "repository": { "id": "R_abc" } });
        let id = GitHubClient::extract("op", &data, "/repository/id").expect("extract");
        assert_eq!(id, "R_abc");
    }

    #[test]
    fn extract_missing_path_is_an_external_error() {
        let data = json!({ "repository": {} });
        let err = GitHubClient::extract("repository_id", &data, "/repository/id")
            .expect_err("must fail");
        assert!(err.to_string().contains("repository_id"));
    }

    #[test]
    fn request_count_starts_at_zero() {
        let client = GitHubClient::new("tok".to_string());
        assert_eq!(client.request_count(), 0);
    }
}
