//! # Field Mapper
//!
//! Translates one [`Row`] into the `fields` object of a Jira create-issue
//! request. Mapping is pure: it reads the row, the resolved [`FieldSchema`]
//! and the [`IdentifierMap`] built so far, and never performs I/O.
//!
//! References to other rows are resolved leniently. A parent or epic link
//! that is not in the map yet is left out of the payload and reported as a
//! [`MappingWarning`] instead of failing the row.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde_json::{Map, Number, Value, json};

use crate::adf::build_document;
use crate::config::ImportMode;
use crate::error::ValidationError;
use crate::ident::IdentifierMap;
use crate::schema::FieldSchema;
use crate::source::{Row, columns};

/// `fields` object of a create-issue request.
pub type FieldPayload = Map<String, Value>;

static LABEL_SEPARATORS: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"[,;\s]+").expect("Failed to compile label separator regex"));

/// Something the mapper left out of a payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MappingWarning {
  /// A sub-task names a parent that has not been created.
  UnresolvedParent { parent_id: String },
  /// A row names an epic that has not been created.
  UnresolvedEpicLink { epic_id: String },
  /// The epic exists but the destination has no epic link field.
  EpicLinkFieldUnavailable { epic_id: String },
  /// Story points were given but are not a number.
  InvalidStoryPoints { value: String },
}

impl fmt::Display for MappingWarning {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::UnresolvedParent { parent_id } => {
        write!(f, "parent '{parent_id}' was not created in this run; sub-task left unparented")
      }
      Self::UnresolvedEpicLink { epic_id } => {
        write!(f, "epic '{epic_id}' was not created in this run; epic link skipped")
      }
      Self::EpicLinkFieldUnavailable { epic_id } => {
        write!(f, "destination has no 'Epic Link' field; link to epic '{epic_id}' skipped")
      }
      Self::InvalidStoryPoints { value } => write!(f, "story points '{value}' is not a number; skipped"),
    }
  }
}

/// Payload for one row plus anything that was dropped on the way.
#[derive(Debug, Clone, PartialEq)]
pub struct MappedRow {
  pub fields: FieldPayload,
  pub warnings: Vec<MappingWarning>,
}

/// Row-to-payload translation for one run.
#[derive(Debug, Clone, Copy)]
pub struct FieldMapper<'a> {
  schema: &'a FieldSchema,
  default_project_key: &'a str,
  mode: ImportMode,
}

impl<'a> FieldMapper<'a> {
  pub const fn new(schema: &'a FieldSchema, default_project_key: &'a str, mode: ImportMode) -> Self {
    Self {
      schema,
      default_project_key,
      mode,
    }
  }

  pub const fn mode(&self) -> ImportMode {
    self.mode
  }

  /// Build the create-issue fields for `row`.
  ///
  /// # Errors
  ///
  /// Fails only when the row has no summary.
  pub fn build(&self, row: &Row, ids: &IdentifierMap) -> Result<MappedRow, ValidationError> {
    let mut fields = FieldPayload::new();
    let mut warnings = Vec::new();

    let project_key = row.value(columns::PROJECT_KEY).unwrap_or(self.default_project_key);
    let issue_type = row.issue_type();
    let summary = row
      .value(columns::SUMMARY)
      .ok_or(ValidationError::MissingSummary { row: row.line })?;

    fields.insert("project".into(), json!({ "key": project_key }));
    fields.insert("issuetype".into(), json!({ "name": issue_type }));
    fields.insert("summary".into(), json!(summary));
    fields.insert("labels".into(), json!(split_labels(row.get(columns::LABELS).unwrap_or(""))));

    if let Some(document) = row.get(columns::DESCRIPTION).and_then(build_document) {
      fields.insert("description".into(), json!(document));
    }

    if let (Some(raw), Some(field)) = (row.value(columns::STORY_POINTS), self.schema.story_points.as_deref()) {
      match parse_story_points(raw) {
        Some(points) => {
          fields.insert(field.to_string(), Value::Number(points));
        }
        None => warnings.push(MappingWarning::InvalidStoryPoints { value: raw.to_string() }),
      }
    }

    if row.is_epic() {
      if let (ImportMode::CompanyManaged, Some(field)) = (self.mode, self.schema.epic_name.as_deref()) {
        let epic_name = row.value(columns::EPIC_NAME).unwrap_or(summary);
        fields.insert(field.to_string(), json!(epic_name));
      }
      return Ok(MappedRow { fields, warnings });
    }

    if issue_type.eq_ignore_ascii_case("sub-task")
      && let Some(parent_id) = row.value(columns::PARENT_ID)
    {
      match ids.get(parent_id) {
        Some(parent) => {
          fields.insert("parent".into(), json!({ "id": parent.id }));
        }
        None => warnings.push(MappingWarning::UnresolvedParent {
          parent_id: parent_id.to_string(),
        }),
      }
    }

    if let Some(epic_id) = row.value(columns::EPIC_LINK) {
      match (ids.get(epic_id), self.mode) {
        (None, _) => warnings.push(MappingWarning::UnresolvedEpicLink {
          epic_id: epic_id.to_string(),
        }),
        (Some(epic), ImportMode::TeamManaged) => {
          fields.insert("parent".into(), json!({ "id": epic.id }));
        }
        (Some(epic), ImportMode::CompanyManaged) => match self.schema.epic_link.as_deref() {
          Some(field) => {
            fields.insert(field.to_string(), json!(epic.key));
          }
          None => warnings.push(MappingWarning::EpicLinkFieldUnavailable {
            epic_id: epic_id.to_string(),
          }),
        },
      }
    }

    Ok(MappedRow { fields, warnings })
  }
}

/// Split a labels cell on commas, semicolons and whitespace.
pub fn split_labels(raw: &str) -> Vec<String> {
  LABEL_SEPARATORS
    .split(raw)
    .filter(|label| !label.is_empty())
    .map(str::to_string)
    .collect()
}

/// Parse a story points value, keeping whole numbers integral.
fn parse_story_points(raw: &str) -> Option<Number> {
  if let Ok(whole) = raw.parse::<i64>() {
    return Some(Number::from(whole));
  }
  raw.parse::<f64>().ok().and_then(Number::from_f64)
}
