//! Connection settings shared by every command that talks to Jira.

use std::path::PathBuf;

use clap::Args;
use hoist_core::ConfigOverrides;
use hoist_core::config::{ENV_JIRA_API_TOKEN, ENV_JIRA_EMAIL, ENV_JIRA_HOST};

/// Where to find Jira and how to authenticate
#[derive(Args, Debug, Default, Clone)]
pub struct ConnectionArgs {
  /// Path to a hoist.toml config file
  #[arg(
    long,
    value_name = "PATH",
    long_help = "Path to a hoist.toml config file.\n\
                 Defaults to hoist.toml in the platform config directory, if present."
  )]
  pub config: Option<PathBuf>,

  /// Jira host (e.g., company.atlassian.net)
  #[arg(long, env = ENV_JIRA_HOST, value_name = "HOST")]
  pub host: Option<String>,

  /// Email address used to authenticate
  #[arg(long, env = ENV_JIRA_EMAIL, value_name = "EMAIL")]
  pub email: Option<String>,

  /// Jira API token
  #[arg(long, env = ENV_JIRA_API_TOKEN, value_name = "TOKEN", hide_env_values = true)]
  pub api_token: Option<String>,
}

impl ConnectionArgs {
  /// Overrides carrying only the connection settings.
  pub fn to_overrides(&self) -> ConfigOverrides {
    ConfigOverrides {
      host: self.host.clone(),
      email: self.email.clone(),
      api_token: self.api_token.clone(),
      ..ConfigOverrides::default()
    }
  }
}
