//! State Snapshot
//!
//! The structured snapshot of managed-infrastructure metadata that backends
//! store: an ordered list of modules, each with a set of string outputs, plus
//! a backend-owned serial. Content equality always ignores the serial.

pub mod diff;
pub mod format;

pub use diff::{Difference, SnapshotDiff};

use crate::error::StateError;
use crate::types::{ModulePath, Serial};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

/// One module entry in a snapshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleState {
    pub path: ModulePath,
    #[serde(default)]
    pub outputs: BTreeMap<String, String>,
}

impl ModuleState {
    pub fn new(path: ModulePath) -> Self {
        Self {
            path,
            outputs: BTreeMap::new(),
        }
    }

    pub fn with_output(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.outputs.insert(name.into(), value.into());
        self
    }

    /// Dot-joined path, e.g. `root.child`
    pub fn display_path(&self) -> String {
        self.path.join(".")
    }
}

/// Versioned collection of module states
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateSnapshot {
    #[serde(default)]
    pub serial: Serial,
    #[serde(default)]
    pub modules: Vec<ModuleState>,
}

impl StateSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a module. Order of appends is significant for equality.
    pub fn add_module(&mut self, module: ModuleState) {
        self.modules.push(module);
    }

    pub fn module(&self, path: &[String]) -> Option<&ModuleState> {
        self.modules.iter().find(|m| m.path == path)
    }

    /// Check that no two modules share a path.
    pub fn validate(&self) -> Result<(), StateError> {
        let mut seen = HashSet::new();
        for module in &self.modules {
            if !seen.insert(&module.path) {
                return Err(StateError::InvalidState(format!(
                    "duplicate module path: {}",
                    module.display_path()
                )));
            }
        }
        Ok(())
    }

    /// Copy of this snapshot with the serial replaced.
    pub fn normalized(&self, serial: Serial) -> StateSnapshot {
        StateSnapshot {
            serial,
            modules: self.modules.clone(),
        }
    }

    /// Structural equality: modules in order, outputs by key and value.
    /// The serial never takes part.
    pub fn content_eq(&self, other: &StateSnapshot) -> bool {
        self.normalized(other.serial) == *other
    }
}
