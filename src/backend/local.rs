//! Local file backend
//!
//! Keeps an in-memory view and mirrors it to a JSON state file. Refresh reads
//! the file into the view; persist re-reads the file, then writes the view out
//! atomically and bumps the durable serial when the content changed.

use super::{StateBackend, StatePersister, StateReader, StateRefresher, StateWriter};
use crate::error::StateError;
use crate::state::{format, StateSnapshot};
use std::ffi::OsString;
use std::path::{Path, PathBuf};

#[derive(Debug)]
pub struct LocalState {
    path: PathBuf,
    state: StateSnapshot,
}

impl LocalState {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            state: StateSnapshot::new(),
        }
    }

    /// Start from a seed view that is used until a state file exists.
    pub fn with_state(path: impl Into<PathBuf>, state: StateSnapshot) -> Result<Self, StateError> {
        state.validate()?;
        Ok(Self {
            path: path.into(),
            state,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_file(&self) -> Result<Option<StateSnapshot>, StateError> {
        if !self.path.exists() {
            return Ok(None);
        }
        let file = std::fs::File::open(&self.path)?;
        format::read_state(std::io::BufReader::new(file)).map(Some)
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = OsString::from(self.path.as_os_str());
        name.push(".tmp");
        PathBuf::from(name)
    }

    fn write_file(&self, state: &StateSnapshot) -> Result<(), StateError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let temp = self.temp_path();
        let bytes = format::encode(state)?;
        std::fs::write(&temp, bytes)?;
        std::fs::rename(&temp, &self.path)?;
        Ok(())
    }
}

impl StateReader for LocalState {
    fn state(&self) -> StateSnapshot {
        self.state.clone()
    }
}

impl StateWriter for LocalState {
    fn write_state(&mut self, state: &StateSnapshot) -> Result<(), StateError> {
        state.validate()?;
        self.state = state.normalized(self.state.serial);
        Ok(())
    }
}

impl StateRefresher for LocalState {
    fn refresh_state(&mut self) -> Result<(), StateError> {
        let loaded = self.read_file().map_err(|e| {
            StateError::Refresh(format!(
                "Failed to read state file {}: {}",
                self.path.display(),
                e
            ))
        })?;

        match loaded {
            Some(state) => {
                tracing::debug!(
                    path = %self.path.display(),
                    serial = state.serial,
                    "refreshed local state"
                );
                self.state = state;
            }
            None => {
                tracing::debug!(path = %self.path.display(), "no state file, keeping current view");
            }
        }
        Ok(())
    }
}

impl StatePersister for LocalState {
    fn persist_state(&mut self) -> Result<(), StateError> {
        // The file may have moved on since the last refresh
        let durable = self.read_file().map_err(|e| {
            StateError::Persist(format!(
                "Failed to read existing state file {}: {}",
                self.path.display(),
                e
            ))
        })?;

        let current = match &durable {
            Some(durable) if durable.content_eq(&self.state) => {
                tracing::debug!(path = %self.path.display(), "local state unchanged, skipping persist");
                return Ok(());
            }
            Some(durable) => durable.serial.max(self.state.serial),
            None => self.state.serial,
        };
        let serial = current.checked_add(1).ok_or_else(|| {
            StateError::Persist(format!(
                "serial {} of {} cannot be advanced",
                current,
                self.path.display()
            ))
        })?;

        let written = self.state.normalized(serial);
        self.write_file(&written).map_err(|e| {
            StateError::Persist(format!(
                "Failed to write state file {}: {}",
                self.path.display(),
                e
            ))
        })?;
        tracing::debug!(path = %self.path.display(), serial, "persisted local state");
        Ok(())
    }
}

impl StateBackend for LocalState {
    fn as_reader(&self) -> Option<&dyn StateReader> {
        Some(self)
    }

    fn as_writer(&mut self) -> Option<&mut dyn StateWriter> {
        Some(self)
    }

    fn as_refresher(&mut self) -> Option<&mut dyn StateRefresher> {
        Some(self)
    }

    fn as_persister(&mut self) -> Option<&mut dyn StatePersister> {
        Some(self)
    }
}
