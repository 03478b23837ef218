//! Temporary delimited input files.

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

/// A CSV file living in its own temporary directory.
///
/// The directory, and everything written next to the file (such as an import
/// report), is removed when the fixture is dropped.
pub struct CsvFixture {
  temp_dir: TempDir,
  path: PathBuf,
}

impl CsvFixture {
  /// Create `input.csv` with the given content.
  pub fn new(content: &str) -> Self {
    Self::with_bytes(content.as_bytes())
  }

  /// Create `input.csv` with raw bytes, e.g. to prepend a byte-order mark.
  pub fn with_bytes(content: &[u8]) -> Self {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let path = temp_dir.path().join("input.csv");
    fs::write(&path, content).expect("Failed to write test CSV");
    Self { temp_dir, path }
  }

  /// Get the path to the CSV file
  pub fn path(&self) -> &Path {
    &self.path
  }

  /// Get the path to the temporary directory holding the file
  pub fn dir(&self) -> &Path {
    self.temp_dir.path()
  }

  /// Path for a sibling file in the same temporary directory
  pub fn sibling(&self, name: &str) -> PathBuf {
    self.temp_dir.path().join(name)
  }
}
