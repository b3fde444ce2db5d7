//! Tooling
//!
//! The `statecheck` command-line interface: run the conformance harness
//! against a built-in backend, seed a backend with the initial reference
//! state, and inspect state files.

pub mod cli;
pub mod format;

pub use cli::{BackendArgs, Cli, CliContext, Commands};
