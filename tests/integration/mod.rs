//! Integration tests for the state backend conformance harness

mod backend_conformance;
mod cli_commands;
mod properties;
mod support;
