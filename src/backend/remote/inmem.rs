//! In-memory remote client. Clones share one blob.

use super::RemoteClient;
use crate::error::StateError;
use parking_lot::Mutex;
use std::sync::Arc;

#[derive(Debug, Clone, Default)]
pub struct InmemClient {
    data: Arc<Mutex<Option<Vec<u8>>>>,
}

impl InmemClient {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RemoteClient for InmemClient {
    fn get(&self) -> Result<Option<Vec<u8>>, StateError> {
        Ok(self.data.lock().clone())
    }

    fn put(&self, data: &[u8]) -> Result<(), StateError> {
        *self.data.lock() = Some(data.to_vec());
        Ok(())
    }

    fn delete(&self) -> Result<(), StateError> {
        self.data.lock().take();
        Ok(())
    }
}
