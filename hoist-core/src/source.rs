//! # Record Source
//!
//! Reads the delimited input file into ordered [`Row`]s. Parsing is tolerant:
//! a UTF-8 byte-order mark is skipped, rows may have more or fewer columns
//! than the header, and quoted fields may contain delimiters or line breaks.

use std::fs;
use std::path::Path;

use csv::{ReaderBuilder, StringRecord, Trim};
use tracing::{debug, trace};

use crate::error::ReadError;

/// Column names the importer understands.
pub mod columns {
  pub const PROJECT_KEY: &str = "Project Key";
  pub const ISSUE_TYPE: &str = "Issue Type";
  pub const SUMMARY: &str = "Summary";
  pub const LABELS: &str = "Labels";
  pub const DESCRIPTION: &str = "Description";
  pub const STORY_POINTS: &str = "Story Points";
  pub const EPIC_NAME: &str = "Epic Name";
  pub const PARENT_ID: &str = "Parent Id";
  pub const EPIC_LINK: &str = "Epic Link";
  pub const ISSUE_ID: &str = "Issue Id";
}

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// One input record: column name to trimmed value, in header order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Row {
  /// 1-based line of the record in the source file, header included.
  pub line: usize,
  fields: Vec<(String, String)>,
}

impl Row {
  pub fn new<K, V>(line: usize, fields: impl IntoIterator<Item = (K, V)>) -> Self
  where
    K: Into<String>,
    V: Into<String>,
  {
    Self {
      line,
      fields: fields.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
    }
  }

  /// Raw value of `column`, `None` when the column is missing from this row.
  pub fn get(&self, column: &str) -> Option<&str> {
    self
      .fields
      .iter()
      .find(|(name, _)| name == column)
      .map(|(_, value)| value.as_str())
  }

  /// Trimmed value of `column`, `None` when missing or blank.
  pub fn value(&self, column: &str) -> Option<&str> {
    self.get(column).map(str::trim).filter(|value| !value.is_empty())
  }

  /// Trimmed issue type, defaulting to `Task`.
  pub fn issue_type(&self) -> &str {
    self.value(columns::ISSUE_TYPE).unwrap_or("Task")
  }

  /// Whether this row creates an epic.
  pub fn is_epic(&self) -> bool {
    self.issue_type().eq_ignore_ascii_case("epic")
  }

  /// The id later rows use to reference this one: `Issue Id`, else `Summary`.
  pub fn local_id(&self) -> &str {
    self
      .value(columns::ISSUE_ID)
      .or_else(|| self.value(columns::SUMMARY))
      .unwrap_or("")
  }

  pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
    self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
  }
}

/// Read every record of the delimited file at `path`.
///
/// A file containing only a header yields an empty vector; deciding whether
/// that is an error is up to the caller.
pub fn read_rows(path: &Path, delimiter: u8) -> Result<Vec<Row>, ReadError> {
  let bytes = fs::read(path).map_err(|source| ReadError::Open {
    path: path.to_path_buf(),
    source,
  })?;
  let rows = parse_rows(&bytes, delimiter).map_err(|source| ReadError::Parse {
    path: path.to_path_buf(),
    source,
  })?;
  debug!("Read {} rows from {}", rows.len(), path.display());
  Ok(rows)
}

/// Parse delimited bytes into rows.
pub fn parse_rows(bytes: &[u8], delimiter: u8) -> Result<Vec<Row>, csv::Error> {
  let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);

  let mut reader = ReaderBuilder::new()
    .has_headers(true)
    .delimiter(delimiter)
    .flexible(true)
    .trim(Trim::All)
    .from_reader(bytes);

  let headers = reader.headers()?.clone();
  let mut rows = Vec::new();

  for result in reader.records() {
    let record = result?;
    let line = record.position().map_or(rows.len() + 2, |pos| pos.line() as usize);
    if record.iter().all(str::is_empty) {
      trace!("Skipping empty record at line {line}");
      continue;
    }
    if record.len() != headers.len() {
      debug!(
        "Line {line} has {} columns, header has {}; extra values are ignored, missing ones treated as absent",
        record.len(),
        headers.len()
      );
    }
    rows.push(to_row(&headers, &record, line));
  }

  Ok(rows)
}

fn to_row(headers: &StringRecord, record: &StringRecord, line: usize) -> Row {
  Row::new(
    line,
    headers
      .iter()
      .zip(record.iter())
      .filter(|(name, _)| !name.is_empty()),
  )
}

#[cfg(test)]
mod tests {
  use hoist_test_utils::CsvFixture;

  use super::*;

  #[test]
  fn test_reads_rows_in_order_with_trimmed_values() {
    let rows = parse_rows(b"Summary,Issue Type\n  First  , Epic \nSecond,Task\n", b',').unwrap();

    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].get("Summary"), Some("First"));
    assert_eq!(rows[0].issue_type(), "Epic");
    assert!(rows[0].is_epic());
    assert_eq!(rows[1].get("Summary"), Some("Second"));
    assert_eq!(rows[1].line, 3);
  }

  #[test]
  fn test_skips_byte_order_mark() {
    let rows = parse_rows(b"\xEF\xBB\xBFSummary,Labels\nHello,a b\n", b',').unwrap();
    assert_eq!(rows[0].get("Summary"), Some("Hello"));
  }

  #[test]
  fn test_tolerates_ragged_rows() {
    let rows = parse_rows(b"Summary,Labels,Description\nShort\nLong,x,y,extra,more\n", b',').unwrap();

    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].get("Summary"), Some("Short"));
    assert_eq!(rows[0].get("Labels"), None);
    assert_eq!(rows[1].get("Description"), Some("y"));
    assert_eq!(rows[1].iter().count(), 3);
  }

  #[test]
  fn test_quoted_fields_keep_delimiters_and_line_breaks() {
    let rows = parse_rows(b"Summary;Description\n\"A; B\";\"line one\nline two\"\n", b';').unwrap();

    assert_eq!(rows[0].get("Summary"), Some("A; B"));
    assert_eq!(rows[0].get("Description"), Some("line one\nline two"));
  }

  #[test]
  fn test_header_only_yields_no_rows() {
    assert!(parse_rows(b"Summary,Issue Type\n", b',').unwrap().is_empty());
  }

  #[test]
  fn test_local_id_prefers_issue_id() {
    let with_id = Row::new(2, [("Issue Id", " E1 "), ("Summary", "Release")]);
    let without_id = Row::new(3, [("Issue Id", ""), ("Summary", " Release ")]);

    assert_eq!(with_id.local_id(), "E1");
    assert_eq!(without_id.local_id(), "Release");
  }

  #[test]
  fn test_issue_type_defaults_to_task() {
    let row = Row::new(2, [("Summary", "x")]);
    assert_eq!(row.issue_type(), "Task");
    assert!(!row.is_epic());
  }

  #[test]
  fn test_read_rows_from_file() {
    let fixture = CsvFixture::new("Summary\tIssue Type\nHello\tStory\n");
    let rows = read_rows(fixture.path(), b'\t').unwrap();

    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].issue_type(), "Story");
  }

  #[test]
  fn test_read_rows_missing_file() {
    let err = read_rows(Path::new("/definitely/not/here.csv"), b',').unwrap_err();
    assert!(matches!(err, ReadError::Open { .. }));
  }
}
