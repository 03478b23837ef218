//! Jira host normalization.

use url::Url;

use crate::error::ConfigError;

/// Ensure a Jira host has a proper scheme and no trailing slash.
///
/// A bare host such as `acme.atlassian.net` is assumed to be `https://`.
/// Only `http` and `https` hosts are accepted.
pub fn ensure_url_scheme(input: &str) -> Result<String, ConfigError> {
  let trimmed = input.trim();
  if trimmed.is_empty() {
    return Err(invalid(input, "host cannot be empty"));
  }

  let candidate = if trimmed.contains("://") {
    trimmed.to_string()
  } else {
    format!("https://{trimmed}")
  };

  let url = Url::parse(&candidate).map_err(|e| invalid(input, &e.to_string()))?;
  if !matches!(url.scheme(), "http" | "https") {
    return Err(invalid(input, "scheme must be http or https"));
  }
  if url.host_str().is_none_or(str::is_empty) {
    return Err(invalid(input, "missing host name"));
  }

  Ok(url.as_str().trim_end_matches('/').to_string())
}

fn invalid(host: &str, reason: &str) -> ConfigError {
  ConfigError::InvalidHost {
    host: host.to_string(),
    reason: reason.to_string(),
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_ensure_url_scheme_without_scheme() {
    assert_eq!(ensure_url_scheme("acme.atlassian.net").unwrap(), "https://acme.atlassian.net");
  }

  #[test]
  fn test_ensure_url_scheme_keeps_http_and_port() {
    assert_eq!(ensure_url_scheme("http://localhost:8080/").unwrap(), "http://localhost:8080");
  }

  #[test]
  fn test_ensure_url_scheme_keeps_context_path() {
    assert_eq!(
      ensure_url_scheme("https://jira.example.com/jira/").unwrap(),
      "https://jira.example.com/jira"
    );
  }

  #[test]
  fn test_ensure_url_scheme_rejects_empty_and_other_schemes() {
    assert!(ensure_url_scheme("   ").is_err());
    assert!(ensure_url_scheme("ftp://jira.example.com").is_err());
  }
}
