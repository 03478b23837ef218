//! Constants for the hoist-jira client.

/// User-Agent header value for the Jira API client
pub const USER_AGENT: &str = concat!("hoist/", env!("CARGO_PKG_VERSION"));

/// Field catalog endpoint
pub const FIELDS_PATH: &str = "/rest/api/3/field";

/// Issue creation endpoint
pub const ISSUE_PATH: &str = "/rest/api/3/issue";
