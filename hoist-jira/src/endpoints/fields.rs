//! # Jira Field Endpoints
//!
//! Field catalog lookup and discovery of the optional custom fields an import
//! can populate.

use hoist_core::{FieldDescriptor, FieldSchema, RequestError};
use reqwest::Method;
use tracing::info;

use crate::client::JiraClient;
use crate::consts::FIELDS_PATH;

impl JiraClient {
  /// List every field known to the Jira instance
  pub async fn list_fields(&self) -> Result<Vec<FieldDescriptor>, RequestError> {
    let description = "list fields";
    let response = self
      .execute(description, || self.request(Method::GET, FIELDS_PATH).send())
      .await?;

    response
      .json::<Vec<FieldDescriptor>>()
      .await
      .map_err(|e| RequestError::InvalidResponse {
        description: description.to_string(),
        message: e.to_string(),
      })
  }

  /// Resolve the epic link, story points and epic name custom fields
  pub async fn discover_field_schema(&self) -> Result<FieldSchema, RequestError> {
    let fields = self.list_fields().await?;
    let schema = FieldSchema::from_catalog(&fields);
    info!(
      "Discovered {} fields (epic link: {}, story points: {}, epic name: {})",
      fields.len(),
      schema.epic_link.as_deref().unwrap_or("-"),
      schema.story_points.as_deref().unwrap_or("-"),
      schema.epic_name.as_deref().unwrap_or("-"),
    );
    Ok(schema)
  }
}
