//! # Jira API Endpoints
//!
//! Endpoint implementations used by an import: the field catalog, read once
//! per run, and issue creation, called once per row.

pub mod fields;
pub mod issues;
