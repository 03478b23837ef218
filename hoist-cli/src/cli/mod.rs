//! # Command Line Interface
//!
//! Defines the CLI structure and command handlers for hoist, and maps
//! failures to process exit codes.

mod connection;
mod fields;
mod import;

use anyhow::Result;
use clap::builder::Styles;
use clap::builder::styling::AnsiColor;
use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use hoist_core::output::ColorMode;
use hoist_core::{ConfigError, ImportError, ReadError, RequestError, ValidationError};

pub use connection::ConnectionArgs;
pub use fields::FieldsArgs;
pub use import::ImportArgs;

/// Top-level CLI command for hoist
#[derive(Parser)]
#[command(name = "hoist")]
#[command(display_name = "🏗️ Hoist")]
#[command(about = "Bulk-import issues from a CSV file into Jira")]
#[command(
  long_about = "Hoist creates one Jira issue per row of a delimited file.\n\n\
        Epics are created first so that the remaining rows can link to them by\n\
        the local id used in the file. The mapping from local ids to created\n\
        issue keys is written to a JSON report when the run completes."
)]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(propagate_version = true)]
#[command(subcommand_required(true))]
#[command(disable_help_subcommand = true)]
#[command(max_term_width = 120)]
#[command(styles = Styles::styled()
    .header(AnsiColor::BrightGreen.on_default().bold().underline())
    .usage(AnsiColor::Green.on_default().bold())
    .literal(AnsiColor::BrightGreen.on_default().bold())
    .placeholder(AnsiColor::BrightWhite.on_default().italic())
    .valid(AnsiColor::Green.on_default())
    .invalid(AnsiColor::BrightRed.on_default().bold())
)]
pub struct Cli {
  /// Sets the level of verbosity (can be used multiple times)
  #[arg(
    short = 'v',
    long = "verbose",
    action = ArgAction::Count,
    global = true,
    long_help = "Sets the level of verbosity for tracing and logging output.\n\n\
             -v: Show info level messages\n\
             -vv: Show debug level messages\n\
             -vvv: Show trace level messages"
  )]
  pub verbose: u8,

  /// Controls when colored output is used
  #[arg(
    long,
    value_enum,
    ignore_case = true,
    global = true,
    default_value_t = ColorArg::Auto,
  )]
  pub colors: ColorArg,

  /// Subcommands
  #[command(subcommand)]
  pub command: Commands,
}

/// Color mode argument for CLI
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ColorArg {
  /// Always use colors
  Always,
  /// Use colors when writing to a terminal
  Auto,
  /// Never use colors
  Never,
}

impl From<ColorArg> for ColorMode {
  fn from(arg: ColorArg) -> Self {
    match arg {
      ColorArg::Always => ColorMode::Always,
      ColorArg::Auto => ColorMode::Auto,
      ColorArg::Never => ColorMode::Never,
    }
  }
}

/// Subcommands for hoist
#[derive(Subcommand)]
pub enum Commands {
  /// Import issues from a CSV file
  #[command(long_about = "Create one Jira issue per row of a delimited file.\n\n\
            Rows with Issue Type 'Epic' are created first; every other row is\n\
            created afterwards and may reference an epic (Epic Link) or, for\n\
            sub-tasks, a parent (Parent Id) by its Issue Id or Summary.\n\n\
            The run stops at the first row that cannot be created. On success the\n\
            mapping of local ids to issue keys is written to the report file.")]
  Import(ImportArgs),

  /// Show which optional custom fields the Jira instance offers
  #[command(long_about = "Look up the Epic Link, Story Points and Epic Name custom fields.\n\n\
            Fields that are not available are skipped during an import, so this\n\
            is a quick way to check a Jira instance before importing.")]
  Fields(FieldsArgs),
}

/// Handle the parsed command line
pub fn handle_cli(cli: Cli) -> Result<()> {
  match cli.command {
    Commands::Import(args) => import::handle_import_command(args),
    Commands::Fields(args) => fields::handle_fields_command(args),
  }
}

/// Exit code for a failed run, based on the first typed error in the chain.
pub fn exit_code_for(err: &anyhow::Error) -> u8 {
  for cause in err.chain() {
    if let Some(err) = cause.downcast_ref::<ImportError>() {
      return err.exit_code();
    }
    if cause.is::<ConfigError>() {
      return 2;
    }
    if cause.is::<ReadError>() {
      return 3;
    }
    if cause.is::<ValidationError>() {
      return 4;
    }
    if cause.is::<RequestError>() {
      return 5;
    }
  }
  1
}
