//! Sled-backed remote client: the blob lives under one key of a sled tree.

use super::RemoteClient;
use crate::error::StateError;
use std::path::Path;

pub const DEFAULT_TREE: &str = "state";
pub const DEFAULT_KEY: &str = "default";

#[derive(Clone)]
pub struct SledClient {
    tree: ::sled::Tree,
    key: String,
}

fn storage_error(context: &str, err: ::sled::Error) -> StateError {
    StateError::Io(std::io::Error::new(
        std::io::ErrorKind::Other,
        format!("{}: {}", context, err),
    ))
}

impl SledClient {
    /// Open (or create) the database at `path` and use `tree`/`key` for the blob.
    pub fn open(path: &Path, tree: &str, key: &str) -> Result<Self, StateError> {
        let db = ::sled::open(path).map_err(|e| {
            storage_error(
                &format!("Failed to open sled database {}", path.display()),
                e,
            )
        })?;
        Self::from_db(&db, tree, key)
    }

    pub fn from_db(db: &::sled::Db, tree: &str, key: &str) -> Result<Self, StateError> {
        let tree = db
            .open_tree(tree)
            .map_err(|e| storage_error("Failed to open sled tree", e))?;
        Ok(Self {
            tree,
            key: key.to_string(),
        })
    }
}

impl RemoteClient for SledClient {
    fn get(&self) -> Result<Option<Vec<u8>>, StateError> {
        let value = self
            .tree
            .get(self.key.as_bytes())
            .map_err(|e| storage_error("Failed to read state blob", e))?;
        Ok(value.map(|v| v.to_vec()))
    }

    fn put(&self, data: &[u8]) -> Result<(), StateError> {
        self.tree
            .insert(self.key.as_bytes(), data)
            .map_err(|e| storage_error("Failed to write state blob", e))?;
        self.tree
            .flush()
            .map_err(|e| storage_error("Failed to flush state blob", e))?;
        Ok(())
    }

    fn delete(&self) -> Result<(), StateError> {
        self.tree
            .remove(self.key.as_bytes())
            .map_err(|e| storage_error("Failed to delete state blob", e))?;
        Ok(())
    }
}
