//! In-memory backend: reader and writer, nothing durable.

use super::{StateBackend, StateReader, StateWriter};
use crate::error::StateError;
use crate::state::StateSnapshot;

#[derive(Debug, Clone, Default)]
pub struct InmemState {
    state: StateSnapshot,
}

impl InmemState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from a seed snapshot. The seed's serial becomes the backend's.
    pub fn with_state(state: StateSnapshot) -> Result<Self, StateError> {
        state.validate()?;
        Ok(Self { state })
    }
}

impl StateReader for InmemState {
    fn state(&self) -> StateSnapshot {
        self.state.clone()
    }
}

impl StateWriter for InmemState {
    fn write_state(&mut self, state: &StateSnapshot) -> Result<(), StateError> {
        state.validate()?;
        if self.state.content_eq(state) {
            return Ok(());
        }
        let serial = self.state.serial.checked_add(1).ok_or_else(|| {
            StateError::Write(format!("serial {} cannot be advanced", self.state.serial))
        })?;
        self.state = state.normalized(serial);
        tracing::debug!(serial, modules = self.state.modules.len(), "inmem state written");
        Ok(())
    }
}

impl StateBackend for InmemState {
    fn as_reader(&self) -> Option<&dyn StateReader> {
        Some(self)
    }

    fn as_writer(&mut self) -> Option<&mut dyn StateWriter> {
        Some(self)
    }
}
