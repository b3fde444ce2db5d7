use statecheck::state::format;
use statecheck::{initial_state, StateBackend, StateError, StateReader, StateSnapshot, StateWriter};
use std::path::Path;

/// Write the initial reference state to a state file.
pub fn write_initial_state_file(path: &Path) {
    let bytes = format::encode(&initial_state()).unwrap();
    std::fs::write(path, bytes).unwrap();
}

/// Writer that silently drops one output key from everything it stores.
pub struct LossyWriter {
    pub state: StateSnapshot,
    pub dropped_key: &'static str,
}

impl LossyWriter {
    pub fn seeded(dropped_key: &'static str) -> Self {
        Self {
            state: initial_state(),
            dropped_key,
        }
    }
}

impl StateReader for LossyWriter {
    fn state(&self) -> StateSnapshot {
        self.state.clone()
    }
}

impl StateWriter for LossyWriter {
    fn write_state(&mut self, state: &StateSnapshot) -> Result<(), StateError> {
        let mut stored = state.clone();
        for module in &mut stored.modules {
            module.outputs.remove(self.dropped_key);
        }
        self.state = stored;
        Ok(())
    }
}

impl StateBackend for LossyWriter {
    fn as_reader(&self) -> Option<&dyn StateReader> {
        Some(self)
    }

    fn as_writer(&mut self) -> Option<&mut dyn StateWriter> {
        Some(self)
    }
}
