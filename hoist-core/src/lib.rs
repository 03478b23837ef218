//! # Hoist Core Library
//!
//! Domain logic for importing CSV rows into Jira: configuration, input
//! parsing, rich-text conversion, field mapping and the identifier bookkeeping
//! that lets later rows reference issues created earlier in the same run.
//! Nothing in this crate talks to the network.

pub mod adf;
pub mod config;
pub mod creds;
pub mod error;
pub mod ident;
pub mod mapper;
pub mod output;
pub mod schema;
pub mod source;
pub mod url;

pub use config::{ConfigOverrides, ConnectionConfig, FileConfig, ImportMode, JiraSettings, RunConfig};
pub use error::{ConfigError, ImportError, ReadError, RequestError, ValidationError};
pub use ident::{CreatedIssue, IdentifierMap, ImportReport};
pub use mapper::{FieldMapper, FieldPayload, MappedRow, MappingWarning};
pub use schema::{FieldDescriptor, FieldSchema};
pub use source::{Row, read_rows};
