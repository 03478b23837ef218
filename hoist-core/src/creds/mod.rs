//! # Credential Lookup
//!
//! Resolves Jira credentials when they are not supplied on the command line,
//! in the environment, or in the config file. The fallback source is the
//! user's `.netrc`, matched first on the exact Jira host and then on
//! `atlassian.net`, the same lookup order curl-style tools use for Atlassian
//! Cloud.

pub mod netrc;

use std::path::Path;

use tracing::debug;

use self::netrc::{get_netrc_path, normalize_host, parse_netrc_file};

/// Machine name used as a catch-all for Atlassian Cloud sites.
pub const ATLASSIAN_CLOUD_MACHINE: &str = "atlassian.net";

/// Represents credentials for a service
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
  pub username: String,
  pub password: String,
}

/// Look up Jira credentials for `jira_host` in `<home>/.netrc`.
///
/// Returns `None` when the file is absent, unreadable, or has no complete
/// entry for either the host or `atlassian.net`.
pub fn lookup_netrc_credentials(home: &Path, jira_host: &str) -> Option<Credentials> {
  let path = get_netrc_path(home);
  if !path.exists() {
    debug!("No .netrc found at {}", path.display());
    return None;
  }

  let host = normalize_host(jira_host);
  for machine in [host.as_str(), ATLASSIAN_CLOUD_MACHINE] {
    match parse_netrc_file(&path, machine) {
      Ok(Some(creds)) => {
        debug!("Using .netrc credentials for machine '{machine}'");
        return Some(creds);
      }
      Ok(None) => {}
      Err(e) => {
        debug!("Failed to read {}: {e}", path.display());
        return None;
      }
    }
  }

  None
}

#[cfg(test)]
mod tests {
  use hoist_test_utils::NetrcGuard;

  use super::*;

  #[test]
  fn test_lookup_prefers_exact_host() {
    let guard = NetrcGuard::new(
      r#"machine acme.atlassian.net
  login exact@example.com
  password exact-token

machine atlassian.net
  login cloud@example.com
  password cloud-token
"#,
    );

    let creds = lookup_netrc_credentials(guard.home_dir(), "https://acme.atlassian.net/").unwrap();
    assert_eq!(creds.username, "exact@example.com");
    assert_eq!(creds.password, "exact-token");
  }

  #[test]
  fn test_lookup_falls_back_to_atlassian_cloud() {
    let guard = NetrcGuard::new("machine atlassian.net login cloud@example.com password cloud-token\n");

    let creds = lookup_netrc_credentials(guard.home_dir(), "https://other.atlassian.net").unwrap();
    assert_eq!(creds.username, "cloud@example.com");
  }

  #[test]
  fn test_lookup_without_netrc_is_none() {
    let temp = tempfile::TempDir::new().unwrap();
    assert!(lookup_netrc_credentials(temp.path(), "acme.atlassian.net").is_none());
  }
}
