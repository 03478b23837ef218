//! # Configuration Management
//!
//! Builds the immutable [`RunConfig`] that every stage of an import receives.
//! Values are layered: explicit overrides (CLI flags and their environment
//! variables), then the TOML config file, then `.netrc` for credentials, then
//! built-in defaults. Nothing downstream reads process state directly.

use std::fs;
use std::path::{Path, PathBuf};

use directories::{BaseDirs, ProjectDirs};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::creds::lookup_netrc_credentials;
use crate::error::ConfigError;
use crate::url::ensure_url_scheme;

/// Environment variable storing the Jira host.
pub const ENV_JIRA_HOST: &str = "JIRA_HOST";
/// Environment variable storing the Jira account email.
pub const ENV_JIRA_EMAIL: &str = "JIRA_EMAIL";
/// Environment variable storing the Jira API token.
pub const ENV_JIRA_API_TOKEN: &str = "JIRA_API_TOKEN";
/// Environment variable storing the default project key.
pub const ENV_JIRA_PROJECT_KEY: &str = "JIRA_PROJECT_KEY";
/// Environment variable storing the input CSV path.
pub const ENV_CSV_PATH: &str = "HOIST_CSV_PATH";
/// Environment variable storing the CSV delimiter.
pub const ENV_CSV_DELIMITER: &str = "HOIST_CSV_DELIMITER";
/// Environment variable selecting team-managed linking rules.
pub const ENV_TEAM_MANAGED: &str = "HOIST_TEAM_MANAGED";
/// Environment variable storing the report output path.
pub const ENV_REPORT_PATH: &str = "HOIST_REPORT_PATH";

/// Default CSV delimiter.
pub const DEFAULT_DELIMITER: u8 = b',';
/// Default location of the import report.
pub const DEFAULT_REPORT_PATH: &str = "import-report.json";
/// File name of the config file inside the platform config directory.
pub const CONFIG_FILE_NAME: &str = "hoist.toml";

/// How the destination project models parent and epic links.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ImportMode {
  /// Epics are linked through the "Epic Link" custom field by issue key, and
  /// carry an "Epic Name".
  #[default]
  CompanyManaged,
  /// Epics are ordinary parents, linked through `parent` by issue id.
  TeamManaged,
}

impl ImportMode {
  pub const fn from_team_managed(team_managed: bool) -> Self {
    if team_managed { Self::TeamManaged } else { Self::CompanyManaged }
  }

  pub const fn label(self) -> &'static str {
    match self {
      Self::CompanyManaged => "company-managed",
      Self::TeamManaged => "team-managed",
    }
  }
}

/// `[jira]` table of the config file.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct JiraFileSection {
  pub host: Option<String>,
  pub email: Option<String>,
  pub api_token: Option<String>,
  pub project_key: Option<String>,
}

/// `[import]` table of the config file.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct ImportFileSection {
  pub csv_path: Option<PathBuf>,
  pub delimiter: Option<String>,
  pub team_managed: Option<bool>,
  pub report_path: Option<PathBuf>,
}

/// Contents of `hoist.toml`.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
  pub jira: JiraFileSection,
  pub import: ImportFileSection,
}

/// Values supplied explicitly for this run, usually from CLI flags.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
  pub host: Option<String>,
  pub email: Option<String>,
  pub api_token: Option<String>,
  pub project_key: Option<String>,
  pub csv_path: Option<PathBuf>,
  pub delimiter: Option<String>,
  pub team_managed: Option<bool>,
  pub report_path: Option<PathBuf>,
}

/// Connection settings for the destination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JiraSettings {
  /// Base URL with scheme and without a trailing slash.
  pub base_url: String,
  pub email: String,
  pub api_token: String,
}

/// The fully resolved, immutable configuration of one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
  pub jira: JiraSettings,
  pub default_project_key: String,
  pub csv_path: PathBuf,
  pub delimiter: u8,
  pub mode: ImportMode,
  pub report_path: PathBuf,
}

/// Connection-only configuration, for commands that never read a CSV file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionConfig {
  pub jira: JiraSettings,
}

impl RunConfig {
  /// Resolve a run configuration from overrides and file config.
  ///
  /// `home` is where `.netrc` is looked up when credentials are not set
  /// explicitly; pass `None` to skip the `.netrc` fallback.
  pub fn resolve(overrides: ConfigOverrides, file: FileConfig, home: Option<&Path>) -> Result<Self, ConfigError> {
    let jira = resolve_jira(&overrides, &file, home)?;

    let default_project_key = first_present(overrides.project_key, file.jira.project_key).ok_or(
      ConfigError::Missing {
        setting: "project_key",
        hint: "pass --project, set JIRA_PROJECT_KEY, or add jira.project_key to hoist.toml",
      },
    )?;

    let csv_path = overrides
      .csv_path
      .or(file.import.csv_path)
      .filter(|p| !p.as_os_str().is_empty())
      .ok_or(ConfigError::Missing {
        setting: "csv_path",
        hint: "pass the input file path, set HOIST_CSV_PATH, or add import.csv_path to hoist.toml",
      })?;

    let delimiter = match first_present(overrides.delimiter, file.import.delimiter) {
      Some(raw) => parse_delimiter(&raw)?,
      None => DEFAULT_DELIMITER,
    };

    let team_managed = overrides.team_managed.or(file.import.team_managed).unwrap_or(false);

    let report_path = overrides
      .report_path
      .or(file.import.report_path)
      .unwrap_or_else(|| PathBuf::from(DEFAULT_REPORT_PATH));

    Ok(Self {
      jira,
      default_project_key,
      csv_path,
      delimiter,
      mode: ImportMode::from_team_managed(team_managed),
      report_path,
    })
  }
}

impl ConnectionConfig {
  pub fn resolve(overrides: ConfigOverrides, file: FileConfig, home: Option<&Path>) -> Result<Self, ConfigError> {
    Ok(Self {
      jira: resolve_jira(&overrides, &file, home)?,
    })
  }
}

fn resolve_jira(overrides: &ConfigOverrides, file: &FileConfig, home: Option<&Path>) -> Result<JiraSettings, ConfigError> {
  let raw_host = first_present(overrides.host.clone(), file.jira.host.clone()).ok_or(ConfigError::Missing {
    setting: "host",
    hint: "pass --host, set JIRA_HOST, or add jira.host to hoist.toml",
  })?;
  let base_url = ensure_url_scheme(&raw_host)?;

  let email = first_present(overrides.email.clone(), file.jira.email.clone());
  let api_token = first_present(overrides.api_token.clone(), file.jira.api_token.clone());

  let (email, api_token) = match (email, api_token) {
    (Some(email), Some(api_token)) => (email, api_token),
    (email, api_token) => {
      let netrc = home.and_then(|home| lookup_netrc_credentials(home, &base_url));
      let email = email
        .or_else(|| netrc.as_ref().map(|creds| creds.username.clone()))
        .ok_or(ConfigError::Missing {
          setting: "email",
          hint: "pass --email, set JIRA_EMAIL, add jira.email to hoist.toml, or add a .netrc entry",
        })?;
      let api_token = api_token
        .or_else(|| netrc.map(|creds| creds.password))
        .ok_or(ConfigError::Missing {
          setting: "api_token",
          hint: "set JIRA_API_TOKEN, add jira.api_token to hoist.toml, or add a .netrc entry",
        })?;
      (email, api_token)
    }
  };

  Ok(JiraSettings {
    base_url,
    email,
    api_token,
  })
}

/// Returns the first value that is present and not blank, trimmed.
fn first_present(primary: Option<String>, fallback: Option<String>) -> Option<String> {
  primary
    .into_iter()
    .chain(fallback)
    .map(|value| value.trim().to_string())
    .find(|value| !value.is_empty())
}

/// Parse a delimiter setting into a single byte. `\t` and `tab` mean a tab.
pub fn parse_delimiter(raw: &str) -> Result<u8, ConfigError> {
  match raw {
    "\\t" | "tab" | "\t" => return Ok(b'\t'),
    _ => {}
  }

  let mut chars = raw.chars();
  match (chars.next(), chars.next()) {
    (Some(c), None) if c.is_ascii() => Ok(c as u8),
    _ => Err(ConfigError::InvalidDelimiter(raw.to_string())),
  }
}

/// Path of the default config file in the platform config directory.
pub fn default_config_path() -> Option<PathBuf> {
  ProjectDirs::from("dev", "hoist", "hoist").map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
}

/// The current user's home directory, used for the `.netrc` fallback.
pub fn home_dir() -> Option<PathBuf> {
  BaseDirs::new().map(|dirs| dirs.home_dir().to_path_buf())
}

/// Load the config file.
///
/// An explicit path must exist. Without one, the default location is tried
/// and an absent file yields an empty [`FileConfig`].
pub fn load_file_config(explicit: Option<&Path>) -> Result<FileConfig, ConfigError> {
  let path = match explicit {
    Some(path) if !path.exists() => return Err(ConfigError::FileNotFound(path.to_path_buf())),
    Some(path) => path.to_path_buf(),
    None => match default_config_path() {
      Some(path) if path.exists() => path,
      _ => {
        debug!("No config file found, using flags and environment only");
        return Ok(FileConfig::default());
      }
    },
  };

  debug!("Loading config from {}", path.display());
  let content = fs::read_to_string(&path).map_err(|source| ConfigError::Io {
    path: path.clone(),
    source,
  })?;
  toml::from_str(&content).map_err(|source| ConfigError::Parse { path, source })
}
