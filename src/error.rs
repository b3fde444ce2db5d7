//! Error types for backends, the conformance harness, and the command-line tool.

use crate::harness::Step;
use crate::state::{SnapshotDiff, StateSnapshot};
use thiserror::Error;

/// Errors surfaced by state backends and the snapshot codec.
#[derive(Debug, Error)]
pub enum StateError {
    #[error("Invalid state: {0}")]
    InvalidState(String),

    #[error("Write failed: {0}")]
    Write(String),

    #[error("Refresh failed: {0}")]
    Refresh(String),

    #[error("Persist failed: {0}")]
    Persist(String),

    #[error("Codec error: {0}")]
    Codec(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors that abort a conformance run.
///
/// Every variant is fatal. The message carries enough context (expected and
/// actual snapshots, or the underlying backend error) to diagnose a failure
/// without rerunning.
#[derive(Debug, Error)]
pub enum ConformanceError {
    /// The subject does not provide the reader capability.
    #[error("Setup error: subject must at least be a state reader")]
    Setup,

    #[error(
        "Contract violation at {step}:\n{diff}\nexpected: {expected:#?}\nactual: {actual:#?}"
    )]
    ContractViolation {
        step: Step,
        expected: StateSnapshot,
        actual: StateSnapshot,
        diff: SnapshotDiff,
    },

    #[error("Backend error at {step}: {source}")]
    Backend {
        step: Step,
        #[source]
        source: StateError,
    },

    #[error("Serial regressed at {step}: observed {before} before, {after} after")]
    SerialRegressed { step: Step, before: u64, after: u64 },
}

impl ConformanceError {
    /// Step at which the run aborted, if it got past setup.
    pub fn step(&self) -> Option<Step> {
        match self {
            ConformanceError::Setup => None,
            ConformanceError::ContractViolation { step, .. }
            | ConformanceError::Backend { step, .. }
            | ConformanceError::SerialRegressed { step, .. } => Some(*step),
        }
    }
}

/// Errors from the tool layer (configuration, logging, command execution).
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error(transparent)]
    State(#[from] StateError),

    #[error(transparent)]
    Conformance(#[from] ConformanceError),
}

impl From<config::ConfigError> for ApiError {
    fn from(err: config::ConfigError) -> Self {
        ApiError::ConfigError(err.to_string())
    }
}
