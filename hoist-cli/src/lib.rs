//! # Hoist CLI Library
//!
//! Command definitions and the import orchestrator behind the `hoist`
//! binary, exposed as a library so they can be driven from integration
//! tests.

pub mod cli;
pub mod importer;
