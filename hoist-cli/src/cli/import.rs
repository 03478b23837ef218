//! # Import Command
//!
//! Derive-based implementation of the import command: resolves the run
//! configuration, reads the input file and drives the orchestrator.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use hoist_core::config::{
  ENV_CSV_DELIMITER, ENV_CSV_PATH, ENV_JIRA_PROJECT_KEY, ENV_REPORT_PATH, ENV_TEAM_MANAGED, home_dir, load_file_config,
};
use hoist_core::output::{print_header, print_info, print_success, print_warning};
use hoist_core::{ConfigOverrides, ImportError, RunConfig};
use hoist_jira::create_jira_client;
use owo_colors::OwoColorize;
use tokio::runtime::Runtime;
use tracing::info;

use super::connection::ConnectionArgs;
use crate::importer::{ImportOutcome, describe_created, execute_import, load_rows};

/// Command for importing a CSV file
#[derive(Args, Debug)]
pub struct ImportArgs {
  /// Input CSV file
  #[arg(index = 1, env = ENV_CSV_PATH, value_name = "CSV")]
  pub csv: Option<PathBuf>,

  /// Default project key for rows without a Project Key column
  #[arg(long, short = 'p', env = ENV_JIRA_PROJECT_KEY, value_name = "KEY")]
  pub project: Option<String>,

  /// Field delimiter of the input file (a single character, or 'tab')
  #[arg(long, short = 'd', env = ENV_CSV_DELIMITER, value_name = "CHAR")]
  pub delimiter: Option<String>,

  /// Link epics the way team-managed projects do
  #[arg(
    long,
    env = ENV_TEAM_MANAGED,
    long_help = "Link epics the way team-managed projects do.\n\n\
                 Team-managed projects link issues to epics through the parent field\n\
                 and have no Epic Name. Without this flag, the company-managed Epic Link\n\
                 and Epic Name custom fields are used."
  )]
  pub team_managed: bool,

  /// Where to write the import report
  #[arg(long, short = 'o', env = ENV_REPORT_PATH, value_name = "PATH")]
  pub report: Option<PathBuf>,

  /// Build and print every payload without creating any issues
  #[arg(long)]
  pub dry_run: bool,

  #[command(flatten)]
  pub connection: ConnectionArgs,
}

impl ImportArgs {
  fn to_overrides(&self) -> ConfigOverrides {
    ConfigOverrides {
      project_key: self.project.clone(),
      csv_path: self.csv.clone(),
      delimiter: self.delimiter.clone(),
      // An unset flag leaves the decision to the config file
      team_managed: self.team_managed.then_some(true),
      report_path: self.report.clone(),
      ..self.connection.to_overrides()
    }
  }
}

/// Handle the import command
pub(crate) fn handle_import_command(args: ImportArgs) -> Result<()> {
  let file = load_file_config(args.connection.config.as_deref()).map_err(ImportError::from)?;
  let home = home_dir();
  let config = RunConfig::resolve(args.to_overrides(), file, home.as_deref()).map_err(ImportError::from)?;

  let rows = load_rows(&config)?;
  info!("Loaded {} rows from {}", rows.len(), config.csv_path.display());

  let rt = Runtime::new().context("Failed to create async runtime")?;
  let client = create_jira_client(&config.jira);
  let outcome = rt.block_on(execute_import(&config, &client, &rows, args.dry_run))?;

  print_summary(&outcome, args.dry_run);
  Ok(())
}

fn print_summary(outcome: &ImportOutcome, dry_run: bool) {
  if dry_run {
    print_header("Dry run summary");
  } else {
    print_header("Import summary");
    for line in describe_created(&outcome.ids) {
      println!("  {line}");
    }
  }

  print_info(&format!("Epics: {}", outcome.containers_created.to_string().bold()));
  print_info(&format!("Other issues: {}", outcome.dependents_created.to_string().bold()));

  if !outcome.warnings.is_empty() {
    print_warning(&format!("{} warnings; see above for details", outcome.warnings.len()));
  }

  match &outcome.report_path {
    Some(path) => print_success(&format!(
      "Created {} issues; report written to {}",
      outcome.total_created(),
      path.display()
    )),
    None => print_success(&format!(
      "Built {} payloads; no issues were created",
      outcome.total_created()
    )),
  }
}
