//! # Jira Issue Endpoints
//!
//! Issue creation. One row is one request; there is no bulk endpoint use.

use hoist_core::{CreatedIssue, FieldPayload, RequestError};
use reqwest::Method;
use tracing::debug;

use crate::client::JiraClient;
use crate::consts::ISSUE_PATH;
use crate::models::CreateIssueRequest;

impl JiraClient {
  /// Create an issue from a prepared `fields` payload
  ///
  /// `description` names the request in logs and errors, e.g. the row's
  /// local id.
  pub async fn create_issue(&self, fields: &FieldPayload, description: &str) -> Result<CreatedIssue, RequestError> {
    let payload = CreateIssueRequest { fields };
    let response = self
      .execute(description, || self.request(Method::POST, ISSUE_PATH).json(&payload).send())
      .await?;

    let created = response
      .json::<CreatedIssue>()
      .await
      .map_err(|e| RequestError::InvalidResponse {
        description: description.to_string(),
        message: e.to_string(),
      })?;
    debug!("{description}: created {} (id {})", created.key, created.id);
    Ok(created)
  }
}
