//! Read-only wrapper: exposes only the reader capability of the inner backend.

use super::{StateBackend, StateReader};

#[derive(Debug, Clone)]
pub struct ReadOnly<B> {
    inner: B,
}

impl<B: StateBackend> ReadOnly<B> {
    pub fn new(inner: B) -> Self {
        Self { inner }
    }

    pub fn into_inner(self) -> B {
        self.inner
    }
}

impl<B: StateBackend> StateBackend for ReadOnly<B> {
    fn as_reader(&self) -> Option<&dyn StateReader> {
        self.inner.as_reader()
    }
}
