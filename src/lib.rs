//! Thin re-exports so integration tests (`tests/cli.rs`) can reach the binary's own helper
//! modules without going through the `paracmd-core` crate.
pub mod cli;
pub mod config;
pub mod tracing;
