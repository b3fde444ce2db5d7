//! Capability detection for backends.

use super::StateBackend;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One independently testable facet of backend behavior
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Capability {
    Read,
    Write,
    Refresh,
    Persist,
}

/// Set of capabilities a backend value provides, resolved once per run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Capabilities {
    pub read: bool,
    pub write: bool,
    pub refresh: bool,
    pub persist: bool,
}

/// Named combination of capabilities
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BackendProfile {
    NotAReader,
    ReaderOnly,
    ReaderWriter,
    ReaderRefresher,
    ReaderPersister,
    ReaderWriterRefresher,
    ReaderWriterPersister,
    ReaderRefresherPersister,
    Full,
}

impl Capabilities {
    pub fn detect<B: StateBackend + ?Sized>(backend: &mut B) -> Self {
        Self {
            read: backend.as_reader().is_some(),
            write: backend.as_writer().is_some(),
            refresh: backend.as_refresher().is_some(),
            persist: backend.as_persister().is_some(),
        }
    }

    pub fn has(&self, capability: Capability) -> bool {
        match capability {
            Capability::Read => self.read,
            Capability::Write => self.write,
            Capability::Refresh => self.refresh,
            Capability::Persist => self.persist,
        }
    }

    pub fn list(&self) -> Vec<Capability> {
        [
            Capability::Read,
            Capability::Write,
            Capability::Refresh,
            Capability::Persist,
        ]
        .into_iter()
        .filter(|c| self.has(*c))
        .collect()
    }

    pub fn profile(&self) -> BackendProfile {
        if !self.read {
            return BackendProfile::NotAReader;
        }
        match (self.write, self.refresh, self.persist) {
            (false, false, false) => BackendProfile::ReaderOnly,
            (true, false, false) => BackendProfile::ReaderWriter,
            (false, true, false) => BackendProfile::ReaderRefresher,
            (false, false, true) => BackendProfile::ReaderPersister,
            (true, true, false) => BackendProfile::ReaderWriterRefresher,
            (true, false, true) => BackendProfile::ReaderWriterPersister,
            (false, true, true) => BackendProfile::ReaderRefresherPersister,
            (true, true, true) => BackendProfile::Full,
        }
    }
}

impl fmt::Display for Capabilities {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<String> = self.list().iter().map(|c| format!("{:?}", c)).collect();
        if names.is_empty() {
            write!(f, "none")
        } else {
            write!(f, "{}", names.join("+"))
        }
    }
}
