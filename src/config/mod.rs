//! Configuration
//!
//! Which backend the `statecheck` tool exercises, harness options, and
//! logging. Loaded by [`ConfigLoader`] from defaults, an optional file, and
//! `STATECHECK__*` environment variables.

mod facade;
mod sources;

pub use facade::ConfigLoader;

use crate::backend::remote::kv::{DEFAULT_KEY, DEFAULT_TREE};
use crate::harness::HarnessOptions;
use crate::logging::LoggingConfig;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

fn default_tree() -> String {
    DEFAULT_TREE.to_string()
}

fn default_key() -> String {
    DEFAULT_KEY.to_string()
}

/// Backend selection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum BackendConfig {
    /// In-memory reader/writer
    Inmem,
    /// JSON state file
    Local { path: PathBuf },
    /// Remote state stored in a sled database
    Sled {
        path: PathBuf,
        #[serde(default = "default_tree")]
        tree: String,
        #[serde(default = "default_key")]
        key: String,
    },
}

impl Default for BackendConfig {
    fn default() -> Self {
        BackendConfig::Inmem
    }
}

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckConfig {
    #[serde(default)]
    pub backend: BackendConfig,

    #[serde(default)]
    pub harness: HarnessOptions,

    #[serde(default)]
    pub logging: LoggingConfig,
}
