//! Test utilities shared across the hoist workspace
//!
//! This crate provides common testing infrastructure including:
//! - Temporary input files ([`CsvFixture`])
//! - Isolated `.netrc` homes ([`NetrcGuard`])
//! - Scoped environment variables ([`EnvVarGuard`])
//!
//! The clippy dead_code lint is disabled for this crate because test utilities
//! may not be used by all tests, and the compiler cannot detect usage across
//! crate boundaries in development dependencies.

#![allow(dead_code)]

pub mod csv;
pub mod env;
pub mod netrc;

// Re-export commonly used items
pub use csv::CsvFixture;
pub use env::EnvVarGuard;
pub use netrc::NetrcGuard;
