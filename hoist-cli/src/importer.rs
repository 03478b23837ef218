//! # Import Orchestrator
//!
//! Creates issues for every input row in two strictly ordered passes: epics
//! first, then everything else, so that dependent rows can reference the
//! epics created before them. Any validation or request failure aborts the
//! run; issues already created stay where they are.

use std::future::Future;
use std::path::PathBuf;

use hoist_core::output::{format_issue_key, format_local_id, print_info, print_warning};
use hoist_core::source::read_rows;
use hoist_core::{
  CreatedIssue, FieldMapper, FieldPayload, IdentifierMap, ImportError, MappingWarning, ReadError, RequestError, Row,
  RunConfig,
};
use hoist_jira::JiraClient;
use serde_json::Value;
use tracing::{debug, info};

/// Something that turns a prepared payload into a destination issue.
pub trait IssueCreator {
  fn create(&mut self, row: &Row, fields: &FieldPayload) -> impl Future<Output = Result<CreatedIssue, RequestError>>;
}

/// Creates issues through the Jira API.
pub struct LiveCreator<'a> {
  client: &'a JiraClient,
}

impl<'a> LiveCreator<'a> {
  pub const fn new(client: &'a JiraClient) -> Self {
    Self { client }
  }
}

impl IssueCreator for LiveCreator<'_> {
  async fn create(&mut self, row: &Row, fields: &FieldPayload) -> Result<CreatedIssue, RequestError> {
    let description = format!("create issue for row {} ('{}')", row.line, row.local_id());
    self.client.create_issue(fields, &description).await
  }
}

/// Prints payloads instead of sending them and hands out synthetic ids.
#[derive(Debug, Default)]
pub struct DryRunCreator {
  next: usize,
}

impl DryRunCreator {
  pub fn new() -> Self {
    Self::default()
  }
}

impl IssueCreator for DryRunCreator {
  async fn create(&mut self, row: &Row, fields: &FieldPayload) -> Result<CreatedIssue, RequestError> {
    self.next += 1;
    let project = fields
      .get("project")
      .and_then(|project| project.get("key"))
      .and_then(Value::as_str)
      .unwrap_or("DRY");

    let rendered = serde_json::to_string_pretty(fields).unwrap_or_else(|_| format!("{fields:?}"));
    print_info(&format!("Row {} ({}) would be created with:", row.line, format_local_id(row.local_id())));
    println!("{rendered}");

    Ok(CreatedIssue::new(format!("dry-run-{}", self.next), format!("{project}-DRY-{}", self.next)))
  }
}

/// Pass over the input rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
  Containers,
  Dependents,
}

impl Phase {
  const ORDER: [Self; 2] = [Self::Containers, Self::Dependents];

  fn includes(self, row: &Row) -> bool {
    match self {
      Self::Containers => row.is_epic(),
      Self::Dependents => !row.is_epic(),
    }
  }

  const fn label(self) -> &'static str {
    match self {
      Self::Containers => "containers",
      Self::Dependents => "dependents",
    }
  }
}

/// A warning raised while mapping a particular row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowWarning {
  pub line: usize,
  pub local_id: String,
  pub warning: MappingWarning,
}

/// Result of a completed run.
#[derive(Debug, Default)]
pub struct ImportOutcome {
  pub ids: IdentifierMap,
  pub containers_created: usize,
  pub dependents_created: usize,
  pub warnings: Vec<RowWarning>,
  /// Where the report was written; `None` for a dry run.
  pub report_path: Option<PathBuf>,
}

impl ImportOutcome {
  pub const fn total_created(&self) -> usize {
    self.containers_created + self.dependents_created
  }
}

/// Create an issue for every row, epics first.
pub async fn run_import<C: IssueCreator>(
  rows: &[Row],
  mapper: &FieldMapper<'_>,
  creator: &mut C,
) -> Result<ImportOutcome, ImportError> {
  let mut outcome = ImportOutcome::default();

  for phase in Phase::ORDER {
    let pending: Vec<&Row> = rows.iter().filter(|row| phase.includes(row)).collect();
    info!("Phase {}: {} rows", phase.label(), pending.len());

    for row in pending {
      let local_id = row.local_id();
      let mapped = mapper.build(row, &outcome.ids)?;

      for warning in mapped.warnings {
        debug!("Row {} ('{}'): {}", row.line, local_id, warning);
        print_warning(&format!("Row {} ({}): {}", row.line, format_local_id(local_id), warning));
        outcome.warnings.push(RowWarning {
          line: row.line,
          local_id: local_id.to_string(),
          warning,
        });
      }

      let created = creator.create(row, &mapped.fields).await?;
      info!("Created {} for '{}'", created.key, local_id);

      if let Some(previous) = outcome.ids.insert(local_id, created) {
        debug!("Local id '{}' was already mapped to {}; replaced", local_id, previous.key);
      }
      match phase {
        Phase::Containers => outcome.containers_created += 1,
        Phase::Dependents => outcome.dependents_created += 1,
      }
    }
  }

  Ok(outcome)
}

/// Read the configured input file, rejecting one without records.
pub fn load_rows(config: &RunConfig) -> Result<Vec<Row>, ImportError> {
  let rows = read_rows(&config.csv_path, config.delimiter)?;
  if rows.is_empty() {
    return Err(ReadError::NoRows(config.csv_path.clone()).into());
  }
  Ok(rows)
}

/// Discover the destination schema, import `rows` and write the report.
///
/// A dry run sends no create requests and writes no report.
pub async fn execute_import(
  config: &RunConfig,
  client: &JiraClient,
  rows: &[Row],
  dry_run: bool,
) -> Result<ImportOutcome, ImportError> {
  let schema = client.discover_field_schema().await?;
  let mapper = FieldMapper::new(&schema, &config.default_project_key, config.mode);
  info!(
    "Importing {} rows into {} ({})",
    rows.len(),
    config.jira.base_url,
    mapper.mode().label()
  );

  if dry_run {
    return run_import(rows, &mapper, &mut DryRunCreator::new()).await;
  }

  let mut outcome = run_import(rows, &mapper, &mut LiveCreator::new(client)).await?;
  outcome
    .ids
    .to_report()
    .write_to(&config.report_path)
    .map_err(|source| ImportError::Report {
      path: config.report_path.clone(),
      source,
    })?;
  info!("Wrote import report to {}", config.report_path.display());
  outcome.report_path = Some(config.report_path.clone());

  Ok(outcome)
}

/// One line per created issue, in report order.
pub fn describe_created(ids: &IdentifierMap) -> Vec<String> {
  ids
    .iter()
    .map(|(local_id, issue)| format!("{} -> {}", format_local_id(local_id), format_issue_key(&issue.key)))
    .collect()
}

#[cfg(test)]
mod tests {
  use hoist_core::{FieldSchema, ImportMode, ValidationError};
  use serde_json::json;

  use super::*;

  /// Records every payload and fails on request for a given summary.
  #[derive(Default)]
  struct RecordingCreator {
    created: Vec<(String, FieldPayload)>,
    fail_on: Option<String>,
  }

  impl IssueCreator for RecordingCreator {
    async fn create(&mut self, row: &Row, fields: &FieldPayload) -> Result<CreatedIssue, RequestError> {
      if self.fail_on.as_deref() == Some(row.local_id()) {
        return Err(RequestError::Status {
          description: "create".to_string(),
          status: 400,
          body: "rejected".to_string(),
        });
      }
      self.created.push((row.local_id().to_string(), fields.clone()));
      let n = self.created.len();
      Ok(CreatedIssue::new((10_000 + n).to_string(), format!("PROJ-{n}")))
    }
  }

  fn schema() -> FieldSchema {
    FieldSchema {
      epic_link: Some("customfield_10014".to_string()),
      story_points: Some("customfield_10016".to_string()),
      epic_name: Some("customfield_10011".to_string()),
    }
  }

  fn row(line: usize, fields: &[(&str, &str)]) -> Row {
    Row::new(line, fields.iter().copied())
  }

  #[tokio::test]
  async fn test_epics_are_created_before_dependents() {
    let rows = vec![
      row(2, &[("Issue Type", "Task"), ("Summary", "Write docs"), ("Epic Link", "E1")]),
      row(3, &[("Issue Id", "E1"), ("Issue Type", "Epic"), ("Summary", "Docs")]),
    ];
    let schema = schema();
    let mapper = FieldMapper::new(&schema, "PROJ", ImportMode::CompanyManaged);
    let mut creator = RecordingCreator::default();

    let outcome = run_import(&rows, &mapper, &mut creator).await.unwrap();

    let order: Vec<&str> = creator.created.iter().map(|(id, _)| id.as_str()).collect();
    assert_eq!(order, vec!["E1", "Write docs"]);
    assert_eq!(creator.created[1].1["customfield_10014"], json!("PROJ-1"));
    assert_eq!(outcome.containers_created, 1);
    assert_eq!(outcome.dependents_created, 1);
    assert!(outcome.warnings.is_empty());
    assert_eq!(outcome.ids.get("Write docs").map(|i| i.key.as_str()), Some("PROJ-2"));
  }

  #[tokio::test]
  async fn test_team_managed_links_epic_as_parent() {
    let rows = vec![
      row(2, &[("Issue Id", "E1"), ("Issue Type", "Epic"), ("Summary", "Docs")]),
      row(3, &[("Summary", "Write docs"), ("Epic Link", "E1")]),
    ];
    let schema = schema();
    let mapper = FieldMapper::new(&schema, "PROJ", ImportMode::TeamManaged);
    let mut creator = RecordingCreator::default();

    run_import(&rows, &mapper, &mut creator).await.unwrap();

    assert_eq!(creator.created[1].1["parent"], json!({ "id": "10001" }));
    assert!(!creator.created[1].1.contains_key("customfield_10014"));
  }

  #[tokio::test]
  async fn test_missing_summary_aborts_after_earlier_rows() {
    let rows = vec![
      row(2, &[("Issue Type", "Epic"), ("Summary", "Docs")]),
      row(3, &[("Summary", "First")]),
      row(4, &[("Summary", "  ")]),
      row(5, &[("Summary", "Never created")]),
    ];
    let schema = schema();
    let mapper = FieldMapper::new(&schema, "PROJ", ImportMode::CompanyManaged);
    let mut creator = RecordingCreator::default();

    let err = run_import(&rows, &mapper, &mut creator).await.unwrap_err();

    assert!(matches!(
      err,
      ImportError::Validation(ValidationError::MissingSummary { row: 4 })
    ));
    assert_eq!(creator.created.len(), 2);
    assert_eq!(err.exit_code(), 4);
  }

  #[tokio::test]
  async fn test_request_failure_aborts_run() {
    let rows = vec![
      row(2, &[("Summary", "Ok")]),
      row(3, &[("Summary", "Bad")]),
      row(4, &[("Summary", "After")]),
    ];
    let schema = FieldSchema::default();
    let mapper = FieldMapper::new(&schema, "PROJ", ImportMode::CompanyManaged);
    let mut creator = RecordingCreator {
      fail_on: Some("Bad".to_string()),
      ..RecordingCreator::default()
    };

    let err = run_import(&rows, &mapper, &mut creator).await.unwrap_err();

    assert!(matches!(err, ImportError::Request(_)));
    assert_eq!(creator.created.len(), 1);
  }

  #[tokio::test]
  async fn test_warnings_are_collected_per_row() {
    let rows = vec![
      row(2, &[("Summary", "Orphan"), ("Epic Link", "E9")]),
      row(3, &[("Summary", "Sized"), ("Story Points", "lots")]),
    ];
    let schema = schema();
    let mapper = FieldMapper::new(&schema, "PROJ", ImportMode::CompanyManaged);
    let mut creator = RecordingCreator::default();

    let outcome = run_import(&rows, &mapper, &mut creator).await.unwrap();

    assert_eq!(
      outcome.warnings,
      vec![
        RowWarning {
          line: 2,
          local_id: "Orphan".to_string(),
          warning: MappingWarning::UnresolvedEpicLink {
            epic_id: "E9".to_string()
          },
        },
        RowWarning {
          line: 3,
          local_id: "Sized".to_string(),
          warning: MappingWarning::InvalidStoryPoints {
            value: "lots".to_string()
          },
        },
      ]
    );
    assert_eq!(outcome.total_created(), 2);
  }

  #[tokio::test]
  async fn test_dry_run_assigns_synthetic_ids() {
    let rows = vec![
      row(2, &[("Issue Id", "E1"), ("Issue Type", "Epic"), ("Summary", "Docs")]),
      row(3, &[("Summary", "Write docs"), ("Epic Link", "E1"), ("Project Key", "OPS")]),
    ];
    let schema = schema();
    let mapper = FieldMapper::new(&schema, "PROJ", ImportMode::TeamManaged);

    let outcome = run_import(&rows, &mapper, &mut DryRunCreator::new()).await.unwrap();

    assert_eq!(outcome.ids.get("E1"), Some(&CreatedIssue::new("dry-run-1", "PROJ-DRY-1")));
    assert_eq!(
      outcome.ids.get("Write docs"),
      Some(&CreatedIssue::new("dry-run-2", "OPS-DRY-2"))
    );
    assert!(outcome.report_path.is_none());
  }
}
