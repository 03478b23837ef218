//! # Field Schema
//!
//! Resolves the optional custom fields an import can populate from the
//! destination's field catalog. Each one is either a concrete field id or
//! absent, and absent simply means the destination does not offer it.

use serde::Deserialize;
use tracing::debug;

/// Display name of the epic link custom field.
pub const EPIC_LINK_FIELD: &str = "epic link";
/// Display name of the story points custom field.
pub const STORY_POINTS_FIELD: &str = "story points";
/// Display name of the epic name custom field.
pub const EPIC_NAME_FIELD: &str = "epic name";

/// One entry of the destination's field catalog.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FieldDescriptor {
  pub id: String,
  pub name: String,
}

/// Optional custom fields available in the destination.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldSchema {
  pub epic_link: Option<String>,
  pub story_points: Option<String>,
  pub epic_name: Option<String>,
}

impl FieldSchema {
  /// Match catalog entries by case-insensitive display name.
  ///
  /// The first entry with a matching name wins.
  pub fn from_catalog(fields: &[FieldDescriptor]) -> Self {
    let find = |label: &str| {
      let found = fields
        .iter()
        .find(|field| field.name.eq_ignore_ascii_case(label))
        .map(|field| field.id.clone());
      debug!("Custom field '{label}': {}", found.as_deref().unwrap_or("not available"));
      found
    };

    Self {
      epic_link: find(EPIC_LINK_FIELD),
      story_points: find(STORY_POINTS_FIELD),
      epic_name: find(EPIC_NAME_FIELD),
    }
  }

  /// `(label, field id)` pairs in a fixed order, for display.
  pub fn entries(&self) -> [(&'static str, Option<&str>); 3] {
    [
      (EPIC_LINK_FIELD, self.epic_link.as_deref()),
      (STORY_POINTS_FIELD, self.story_points.as_deref()),
      (EPIC_NAME_FIELD, self.epic_name.as_deref()),
    ]
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn field(id: &str, name: &str) -> FieldDescriptor {
    FieldDescriptor {
      id: id.to_string(),
      name: name.to_string(),
    }
  }

  #[test]
  fn test_resolves_fields_case_insensitively() {
    let catalog = vec![
      field("summary", "Summary"),
      field("customfield_10014", "Epic Link"),
      field("customfield_10016", "STORY POINTS"),
      field("customfield_10011", "epic name"),
    ];

    let schema = FieldSchema::from_catalog(&catalog);
    assert_eq!(schema.epic_link.as_deref(), Some("customfield_10014"));
    assert_eq!(schema.story_points.as_deref(), Some("customfield_10016"));
    assert_eq!(schema.epic_name.as_deref(), Some("customfield_10011"));
  }

  #[test]
  fn test_partial_names_do_not_match() {
    let catalog = vec![
      field("customfield_1", "Story Points Estimate"),
      field("customfield_2", "Epic Link Status"),
    ];

    assert_eq!(FieldSchema::from_catalog(&catalog), FieldSchema::default());
  }

  #[test]
  fn test_catalog_entries_deserialize_with_extra_keys() {
    let catalog: Vec<FieldDescriptor> = serde_json::from_value(serde_json::json!([
      { "id": "customfield_10016", "name": "Story Points", "custom": true, "schema": { "type": "number" } }
    ]))
    .unwrap();

    assert_eq!(
      FieldSchema::from_catalog(&catalog).story_points.as_deref(),
      Some("customfield_10016")
    );
  }
}
