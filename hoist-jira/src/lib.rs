//! # Jira API Client
//!
//! Jira REST API integration for hoist: field catalog discovery and issue
//! creation, with every call routed through a status-aware retry policy.

mod client;
mod consts;
mod endpoints;
pub mod models;
pub mod retry;

// Re-export the client
pub use client::{JiraClient, create_jira_client};
pub use consts::USER_AGENT;
// Re-export models
pub use models::{CreateIssueRequest, JiraAuth};
pub use retry::{RetryPolicy, StatusClass, classify_status, execute_with_retry};
