//! # Fields Command
//!
//! Reports which optional custom fields a Jira instance offers.

use anyhow::{Context, Result};
use clap::Args;
use hoist_core::config::{home_dir, load_file_config};
use hoist_core::output::{print_header, print_success, print_warning};
use hoist_core::{ConnectionConfig, FieldSchema, ImportError};
use hoist_jira::create_jira_client;
use tokio::runtime::Runtime;

use super::connection::ConnectionArgs;

/// Command for inspecting custom fields
#[derive(Args, Debug)]
pub struct FieldsArgs {
  #[command(flatten)]
  pub connection: ConnectionArgs,
}

/// Handle the fields command
pub(crate) fn handle_fields_command(args: FieldsArgs) -> Result<()> {
  let file = load_file_config(args.connection.config.as_deref()).map_err(ImportError::from)?;
  let home = home_dir();
  let config =
    ConnectionConfig::resolve(args.connection.to_overrides(), file, home.as_deref()).map_err(ImportError::from)?;

  let rt = Runtime::new().context("Failed to create async runtime")?;
  let client = create_jira_client(&config.jira);
  let schema = rt
    .block_on(client.discover_field_schema())
    .map_err(ImportError::from)?;

  print_header(&format!("Custom fields on {}", client.base_url()));
  for line in describe_schema(&schema) {
    match line {
      Ok(found) => print_success(&found),
      Err(missing) => print_warning(&missing),
    }
  }

  Ok(())
}

/// One line per optional field; `Err` for fields that are not available.
fn describe_schema(schema: &FieldSchema) -> Vec<Result<String, String>> {
  schema
    .entries()
    .into_iter()
    .map(|(label, id)| match id {
      Some(id) => Ok(format!("{label}: {id}")),
      None => Err(format!("{label}: not available; values in this column are skipped")),
    })
    .collect()
}
