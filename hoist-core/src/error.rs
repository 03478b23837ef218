//! # Error Taxonomy
//!
//! Typed failures for every stage of an import run. Nothing past the request
//! executor's own retry loop is recovered locally, so each variant here ends
//! the run; the binary maps them onto distinct exit codes.

use std::path::PathBuf;

use thiserror::Error;

/// Missing or malformed run configuration, detected before any row is read.
#[derive(Debug, Error)]
pub enum ConfigError {
  #[error("missing required setting '{setting}': {hint}")]
  Missing { setting: &'static str, hint: &'static str },

  #[error("invalid delimiter '{0}': expected a single ASCII character")]
  InvalidDelimiter(String),

  #[error("invalid Jira host '{host}': {reason}")]
  InvalidHost { host: String, reason: String },

  #[error("config file {} not found", .0.display())]
  FileNotFound(PathBuf),

  #[error("failed to read config file {}", path.display())]
  Io {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error("failed to parse config file {}", path.display())]
  Parse {
    path: PathBuf,
    #[source]
    source: toml::de::Error,
  },
}

/// The input file could not be opened, parsed, or held no records.
#[derive(Debug, Error)]
pub enum ReadError {
  #[error("failed to open input file {}", path.display())]
  Open {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error("failed to parse input file {}", path.display())]
  Parse {
    path: PathBuf,
    #[source]
    source: csv::Error,
  },

  #[error("input file {} contains a header but no records", .0.display())]
  NoRows(PathBuf),
}

/// A row failed a mandatory-field check.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
  #[error("row {row}: Summary is required")]
  MissingSummary { row: usize },
}

/// An outbound call failed permanently or ran out of attempts.
#[derive(Debug, Error)]
pub enum RequestError {
  #[error("{description} failed: HTTP {status} - {body}")]
  Status {
    description: String,
    status: u16,
    body: String,
  },

  #[error("{description} failed after {attempts} attempts: last response was HTTP {status} - {body}")]
  Exhausted {
    description: String,
    attempts: u32,
    status: u16,
    body: String,
  },

  #[error("{description} failed: destination unreachable ({message})")]
  Transport { description: String, message: String },

  #[error("{description} returned an unexpected response: {message}")]
  InvalidResponse { description: String, message: String },
}

impl RequestError {
  /// HTTP status of the last observed response, if one was received.
  pub const fn status(&self) -> Option<u16> {
    match self {
      Self::Status { status, .. } | Self::Exhausted { status, .. } => Some(*status),
      Self::Transport { .. } | Self::InvalidResponse { .. } => None,
    }
  }
}

/// Any failure that aborts an import run.
#[derive(Debug, Error)]
pub enum ImportError {
  #[error(transparent)]
  Config(#[from] ConfigError),

  #[error(transparent)]
  Read(#[from] ReadError),

  #[error(transparent)]
  Validation(#[from] ValidationError),

  #[error(transparent)]
  Request(#[from] RequestError),

  #[error("failed to write import report to {}", path.display())]
  Report {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },
}

impl ImportError {
  /// Process exit code for this failure.
  pub const fn exit_code(&self) -> u8 {
    match self {
      Self::Config(_) => 2,
      Self::Read(_) => 3,
      Self::Validation(_) => 4,
      Self::Request(_) => 5,
      Self::Report { .. } => 1,
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_exit_codes_are_distinct_per_kind() {
    let config = ImportError::from(ConfigError::InvalidDelimiter("ab".to_string()));
    let read = ImportError::from(ReadError::NoRows(PathBuf::from("in.csv")));
    let validation = ImportError::from(ValidationError::MissingSummary { row: 2 });
    let request = ImportError::from(RequestError::Status {
      description: "create issue".to_string(),
      status: 400,
      body: "{}".to_string(),
    });

    assert_eq!(config.exit_code(), 2);
    assert_eq!(read.exit_code(), 3);
    assert_eq!(validation.exit_code(), 4);
    assert_eq!(request.exit_code(), 5);
  }

  #[test]
  fn test_request_error_message_embeds_status_and_body() {
    let error = RequestError::Exhausted {
      description: "create issue for 'E1'".to_string(),
      attempts: 5,
      status: 503,
      body: "unavailable".to_string(),
    };

    let message = error.to_string();
    assert!(message.contains("5 attempts"));
    assert!(message.contains("503"));
    assert!(message.contains("unavailable"));
    assert_eq!(error.status(), Some(503));
  }
}
