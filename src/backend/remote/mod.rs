//! Remote backend
//!
//! [`RemoteState`] keeps the in-memory view locally and moves encoded
//! snapshots through a [`RemoteClient`], which only knows how to get, put,
//! and delete one opaque blob.

pub mod inmem;
pub mod kv;

pub use self::inmem::InmemClient;
pub use self::kv::SledClient;

use super::{StateBackend, StatePersister, StateReader, StateRefresher, StateWriter};
use crate::error::StateError;
use crate::state::{format, StateSnapshot};

/// Blob storage for encoded state
pub trait RemoteClient {
    fn get(&self) -> Result<Option<Vec<u8>>, StateError>;
    fn put(&self, data: &[u8]) -> Result<(), StateError>;
    fn delete(&self) -> Result<(), StateError>;
}

#[derive(Debug)]
pub struct RemoteState<C: RemoteClient> {
    client: C,
    state: StateSnapshot,
}

impl<C: RemoteClient> RemoteState<C> {
    pub fn new(client: C) -> Self {
        Self {
            client,
            state: StateSnapshot::new(),
        }
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    fn fetch(&self) -> Result<Option<StateSnapshot>, StateError> {
        match self.client.get()? {
            Some(bytes) => format::decode(&bytes).map(Some),
            None => Ok(None),
        }
    }
}

impl<C: RemoteClient> StateReader for RemoteState<C> {
    fn state(&self) -> StateSnapshot {
        self.state.clone()
    }
}

impl<C: RemoteClient> StateWriter for RemoteState<C> {
    fn write_state(&mut self, state: &StateSnapshot) -> Result<(), StateError> {
        state.validate()?;
        self.state = state.normalized(self.state.serial);
        Ok(())
    }
}

impl<C: RemoteClient> StateRefresher for RemoteState<C> {
    fn refresh_state(&mut self) -> Result<(), StateError> {
        let fetched = self
            .fetch()
            .map_err(|e| StateError::Refresh(format!("Failed to fetch remote state: {}", e)))?;
        if let Some(state) = fetched {
            tracing::debug!(serial = state.serial, "refreshed remote state");
            self.state = state;
        }
        Ok(())
    }
}

impl<C: RemoteClient> StatePersister for RemoteState<C> {
    fn persist_state(&mut self) -> Result<(), StateError> {
        // Another instance may have pushed since our last refresh
        let remote = self
            .fetch()
            .map_err(|e| StateError::Persist(format!("Failed to read current remote state: {}", e)))?
            .map(|s| s.serial);
        let current = remote.unwrap_or(0).max(self.state.serial);
        let serial = current.checked_add(1).ok_or_else(|| {
            StateError::Persist(format!("remote serial {} cannot be advanced", current))
        })?;

        let bytes = format::encode(&self.state.normalized(serial))?;
        self.client
            .put(&bytes)
            .map_err(|e| StateError::Persist(format!("Failed to upload state: {}", e)))?;
        tracing::debug!(serial, bytes = bytes.len(), "persisted remote state");
        Ok(())
    }
}

impl<C: RemoteClient> StateBackend for RemoteState<C> {
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
