//! # Identifier Map
//!
//! Tracks which destination issue each local id turned into, so later rows
//! can reference issues created earlier in the same run. The map only grows;
//! a repeated local id replaces the earlier value but keeps its original
//! position, and that order is what the import report preserves.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// Identifiers Jira assigned to a created issue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatedIssue {
  pub id: String,
  pub key: String,
}

impl CreatedIssue {
  pub fn new(id: impl Into<String>, key: impl Into<String>) -> Self {
    Self {
      id: id.into(),
      key: key.into(),
    }
  }
}

/// Insertion-ordered map from local id to created issue.
#[derive(Debug, Clone, Default)]
pub struct IdentifierMap {
  entries: Vec<(String, CreatedIssue)>,
  index: HashMap<String, usize>,
}

impl IdentifierMap {
  pub fn new() -> Self {
    Self::default()
  }

  /// Record `issue` under `local_id`, returning the value it replaced.
  pub fn insert(&mut self, local_id: impl Into<String>, issue: CreatedIssue) -> Option<CreatedIssue> {
    let local_id = local_id.into();
    match self.index.get(&local_id) {
      Some(&position) => Some(std::mem::replace(&mut self.entries[position].1, issue)),
      None => {
        self.index.insert(local_id.clone(), self.entries.len());
        self.entries.push((local_id, issue));
        None
      }
    }
  }

  pub fn get(&self, local_id: &str) -> Option<&CreatedIssue> {
    self.index.get(local_id).map(|&position| &self.entries[position].1)
  }

  pub fn contains(&self, local_id: &str) -> bool {
    self.index.contains_key(local_id)
  }

  pub fn len(&self) -> usize {
    self.entries.len()
  }

  pub fn is_empty(&self) -> bool {
    self.entries.is_empty()
  }

  pub fn iter(&self) -> impl Iterator<Item = (&str, &CreatedIssue)> {
    self.entries.iter().map(|(local_id, issue)| (local_id.as_str(), issue))
  }

  /// Snapshot the map as a report.
  pub fn to_report(&self) -> ImportReport {
    ImportReport {
      entries: self.entries.clone(),
    }
  }
}

/// Final mapping of a successful run, serialized as `[localId, {id, key}]`
/// pairs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ImportReport {
  pub entries: Vec<(String, CreatedIssue)>,
}

impl ImportReport {
  pub fn to_json(&self) -> serde_json::Result<String> {
    serde_json::to_string_pretty(self)
  }

  /// Write the report to `path`, replacing any existing file.
  pub fn write_to(&self, path: &Path) -> std::io::Result<()> {
    let json = self.to_json().map_err(std::io::Error::other)?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
      fs::create_dir_all(parent)?;
    }
    fs::write(path, json + "\n")
  }
}
