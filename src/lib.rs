//! Statecheck: Capability Contracts for State Backends
//!
//! A state backend stores a snapshot of managed-infrastructure metadata and
//! may read, write, refresh from, and persist to durable storage in any
//! combination. This crate defines those capabilities as independent traits
//! and provides a harness that checks any backend against the capabilities
//! it actually provides.

pub mod backend;
pub mod config;
pub mod error;
pub mod harness;
pub mod logging;
pub mod state;
pub mod tooling;
pub mod types;

pub use backend::{StateBackend, StatePersister, StateReader, StateRefresher, StateWriter};
pub use error::{ConformanceError, StateError};
pub use harness::{assert_conformance, initial_state, run_conformance_test, ConformanceHarness};
pub use state::{ModuleState, StateSnapshot};
