//! State Backends
//!
//! Four independent capability contracts a backend may provide, in any
//! combination that includes [`StateReader`]. A backend advertises what it
//! provides through the accessors on [`StateBackend`]; every accessor
//! defaults to `None`, so a backend overrides exactly the capabilities it has.

pub mod capability;
pub mod inmem;
pub mod local;
pub mod readonly;
pub mod remote;

pub use capability::{BackendProfile, Capabilities, Capability};
pub use inmem::InmemState;
pub use local::LocalState;
pub use readonly::ReadOnly;
pub use remote::{InmemClient, RemoteClient, RemoteState, SledClient};

use crate::error::StateError;
use crate::state::StateSnapshot;

/// Read the backend's current in-memory view. Never fails, no side effects.
pub trait StateReader {
    fn state(&self) -> StateSnapshot;
}

/// Replace the in-memory view. Visible to the next `state()` call.
///
/// The backend keeps ownership of the serial; the serial on the given
/// snapshot is not adopted.
pub trait StateWriter {
    fn write_state(&mut self, state: &StateSnapshot) -> Result<(), StateError>;
}

/// Reconcile the in-memory view with the durable source.
///
/// Calling this with no durable state leaves the current view in place. On
/// failure the in-memory view is unchanged.
pub trait StateRefresher {
    fn refresh_state(&mut self) -> Result<(), StateError>;
}

/// Copy the in-memory view out to durable storage.
///
/// The in-memory view is unchanged whether or not this succeeds.
pub trait StatePersister {
    fn persist_state(&mut self) -> Result<(), StateError>;
}

/// Structural capability lookup for an opaque backend value.
pub trait StateBackend {
    fn as_reader(&self) -> Option<&dyn StateReader> {
        None
    }

    fn as_writer(&mut self) -> Option<&mut dyn StateWriter> {
        None
    }

    fn as_refresher(&mut self) -> Option<&mut dyn StateRefresher> {
        None
    }

    fn as_persister(&mut self) -> Option<&mut dyn StatePersister> {
        None
    }
}

impl<B: StateBackend + ?Sized> StateBackend for Box<B> {
    fn as_reader(&self) -> Option<&dyn StateReader> {
        (**self).as_reader()
    }

    fn as_writer(&mut self) -> Option<&mut dyn StateWriter> {
        (**self).as_writer()
    }

    fn as_refresher(&mut self) -> Option<&mut dyn StateRefresher> {
        (**self).as_refresher()
    }

    fn as_persister(&mut self) -> Option<&mut dyn StatePersister> {
        (**self).as_persister()
    }
}
