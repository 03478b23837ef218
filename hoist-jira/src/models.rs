use hoist_core::FieldPayload;
use serde::Serialize;

/// Represents Jira authentication credentials
#[derive(Clone)]
pub struct JiraAuth {
  pub username: String,
  pub api_token: String,
}

impl std::fmt::Debug for JiraAuth {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("JiraAuth")
      .field("username", &self.username)
      .field("api_token", &"<redacted>")
      .finish()
  }
}

/// Represents a create-issue request payload
#[derive(Debug, Serialize)]
pub struct CreateIssueRequest<'a> {
  pub fields: &'a FieldPayload,
}
