//! # Output Formatting
//!
//! Operator-facing console messages with consistent symbols and colors.
//! Diagnostics go through `tracing`; these are for results the operator
//! asked for.

use owo_colors::OwoColorize;

/// When colored output is used
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorMode {
  /// Always emit colors
  Always,
  /// Detect terminal support
  Auto,
  /// Never emit colors
  Never,
}

impl ColorMode {
  /// Apply this mode process-wide.
  pub fn apply(self) {
    match self {
      Self::Always => owo_colors::set_override(true),
      Self::Never => owo_colors::set_override(false),
      Self::Auto => {}
    }
  }
}

/// Helper function to safely get an emoji or fallback to a default character
pub fn get_emoji_or_default(name: &str, default: &str) -> String {
  match emojis::get_by_shortcode(name) {
    Some(emoji) => emoji.to_string(),
    None => default.to_string(),
  }
}

/// Print a success message
pub fn print_success(message: &str) {
  let check = get_emoji_or_default("white_check_mark", "✓");
  println!("{} {}", check.green().bold(), message);
}

/// Print an error message
pub fn print_error(message: &str) {
  let cross = get_emoji_or_default("x", "✗");
  eprintln!("{} {}", cross.red().bold(), message);
}

/// Print a warning message
pub fn print_warning(message: &str) {
  let warning = get_emoji_or_default("warning", "⚠");
  eprintln!("{} {}", warning.yellow().bold(), message);
}

/// Print an info message
pub fn print_info(message: &str) {
  let info = get_emoji_or_default("information_source", "ℹ");
  println!("{} {}", info.blue().bold(), message);
}

/// Print a section header
pub fn print_header(header: &str) {
  println!("\n{}", header.blue().bold());
}

/// Format a Jira issue key
pub fn format_issue_key(key: &str) -> String {
  key.bright_cyan().bold().to_string()
}

/// Format a local id from the input file
pub fn format_local_id(local_id: &str) -> String {
  local_id.bright_green().to_string()
}
