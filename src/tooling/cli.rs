//! CLI Tooling
//!
//! Command-line interface for running the conformance harness against the
//! built-in backends.

use crate::backend::remote::kv::{DEFAULT_KEY, DEFAULT_TREE};
use crate::backend::{
    InmemState, LocalState, RemoteState, SledClient, StateBackend, StateReader, StateRefresher,
};
use crate::config::{BackendConfig, CheckConfig, ConfigLoader};
use crate::error::{ApiError, StateError};
use crate::harness::{initial_state, ConformanceHarness, HarnessOptions};
use crate::logging::LoggingConfig;
use crate::state::format;
use crate::tooling::format::{format_report_text, format_state_text};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::info;

/// Statecheck CLI - conformance checks for state backends
#[derive(Parser)]
#[command(name = "statecheck")]
#[command(about = "Run the state backend conformance harness")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file path
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long, global = true)]
    pub log_format: Option<String>,
}

impl Cli {
    /// Apply CLI log flags on top of the configured logging.
    pub fn logging_config(&self, base: &LoggingConfig) -> LoggingConfig {
        let mut config = base.clone();
        if let Some(level) = &self.log_level {
            config.level = level.clone();
        }
        if let Some(format) = &self.log_format {
            config.format = format.clone();
        }
        config
    }
}

/// Backend selection flags; unset flags fall back to the config file.
#[derive(Args, Debug, Clone, Default)]
pub struct BackendArgs {
    /// Backend kind (inmem, local, sled)
    #[arg(long)]
    pub backend: Option<String>,

    /// State file (local) or database directory (sled)
    #[arg(long)]
    pub path: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the conformance harness against a backend
    Run {
        #[command(flatten)]
        target: BackendArgs,
        /// Write the initial reference state through the backend first
        #[arg(long)]
        seed: bool,
        /// Fail if the serial goes backwards across persist/refresh
        #[arg(long)]
        strict_serial: bool,
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Write the initial reference state through a backend
    Seed {
        #[command(flatten)]
        target: BackendArgs,
    },
    /// Print a local state file
    Show {
        /// State file path
        #[arg(long)]
        path: PathBuf,
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
}

/// CLI context: loaded configuration plus command execution
pub struct CliContext {
    config: CheckConfig,
}

impl CliContext {
    /// Create a new CLI context, loading configuration from the given file
    /// (if any) and the environment.
    pub fn new(config_path: Option<PathBuf>) -> Result<Self, ApiError> {
        let config = ConfigLoader::load(config_path.as_deref())?;
        Ok(Self { config })
    }

    pub fn with_config(config: CheckConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &CheckConfig {
        &self.config
    }

    pub fn execute(&self, command: &Commands) -> Result<String, ApiError> {
        match command {
            Commands::Run {
                target,
                seed,
                strict_serial,
                format,
            } => self.handle_run(target, *seed, *strict_serial, format),
            Commands::Seed { target } => self.handle_seed(target),
            Commands::Show { path, format } => self.handle_show(path, format),
        }
    }

    fn handle_run(
        &self,
        target: &BackendArgs,
        seed: bool,
        strict_serial: bool,
        output_format: &str,
    ) -> Result<String, ApiError> {
        check_output_format(output_format)?;
        let backend_config = self.resolve_backend(target)?;
        let mut backend = open_backend(&backend_config)?;
        if seed {
            seed_backend(backend.as_mut())?;
        }

        let options = HarnessOptions {
            strict_serial: strict_serial || self.config.harness.strict_serial,
        };
        let report = ConformanceHarness::new(options).run(backend.as_mut())?;
        info!(backend = %describe(&backend_config), "conformance run finished");

        if output_format == "json" {
            to_json(&report)
        } else {
            Ok(format_report_text(&report, &describe(&backend_config)))
        }
    }

    fn handle_seed(&self, target: &BackendArgs) -> Result<String, ApiError> {
        let backend_config = self.resolve_backend(target)?;
        let mut backend = open_backend(&backend_config)?;
        seed_backend(backend.as_mut())?;
        Ok(format!(
            "Seeded initial state into {}",
            describe(&backend_config)
        ))
    }

    fn handle_show(&self, path: &Path, output_format: &str) -> Result<String, ApiError> {
        check_output_format(output_format)?;
        if !path.exists() {
            return Err(ApiError::ConfigError(format!(
                "State file not found: {}",
                path.display()
            )));
        }
        let mut local = LocalState::new(path);
        local.refresh_state()?;
        let state = local.state();

        if output_format == "json" {
            let bytes = format::encode(&state)?;
            Ok(String::from_utf8_lossy(&bytes).trim_end().to_string())
        } else {
            Ok(format_state_text(&state))
        }
    }

    /// Merge backend flags over the configured backend.
    pub fn resolve_backend(&self, target: &BackendArgs) -> Result<BackendConfig, ApiError> {
        let configured = &self.config.backend;
        let kind = match &target.backend {
            Some(kind) => kind.as_str(),
            None => match configured {
                BackendConfig::Inmem => "inmem",
                BackendConfig::Local { .. } => "local",
                BackendConfig::Sled { .. } => "sled",
            },
        };

        let configured_path = match configured {
            BackendConfig::Local { path } | BackendConfig::Sled { path, .. } => Some(path.clone()),
            BackendConfig::Inmem => None,
        };
        let path = || {
            target
                .path
                .clone()
                .or_else(|| configured_path.clone())
                .ok_or_else(|| {
                    ApiError::ConfigError(format!("Backend '{}' requires --path", kind))
                })
        };

        match kind {
            "inmem" => Ok(BackendConfig::Inmem),
            "local" => Ok(BackendConfig::Local { path: path()? }),
            "sled" => {
                let (tree, key) = match configured {
                    BackendConfig::Sled { tree, key, .. } => (tree.clone(), key.clone()),
                    _ => (DEFAULT_TREE.to_string(), DEFAULT_KEY.to_string()),
                };
                Ok(BackendConfig::Sled {
                    path: path()?,
                    tree,
                    key,
                })
            }
            other => Err(ApiError::ConfigError(format!(
                "Unknown backend '{}' (must be 'inmem', 'local', or 'sled')",
                other
            ))),
        }
    }
}

/// Open a backend. The in-memory backend has no durable source and starts
/// from the initial reference state.
pub fn open_backend(config: &BackendConfig) -> Result<Box<dyn StateBackend>, ApiError> {
    let backend: Box<dyn StateBackend> = match config {
        BackendConfig::Inmem => Box::new(InmemState::with_state(initial_state())?),
        BackendConfig::Local { path } => Box::new(LocalState::new(path)),
        BackendConfig::Sled { path, tree, key } => {
            Box::new(RemoteState::new(SledClient::open(path, tree, key)?))
        }
    };
    Ok(backend)
}

/// Write the initial reference state and persist it when the backend can.
pub fn seed_backend(backend: &mut dyn StateBackend) -> Result<(), ApiError> {
    let writer = backend.as_writer().ok_or_else(|| {
        ApiError::ConfigError("Backend cannot be seeded: it is not a state writer".to_string())
    })?;
    writer.write_state(&initial_state())?;
    if let Some(persister) = backend.as_persister() {
        persister.persist_state()?;
    }
    Ok(())
}

fn describe(config: &BackendConfig) -> String {
    match config {
        BackendConfig::Inmem => "inmem".to_string(),
        BackendConfig::Local { path } => format!("local ({})", path.display()),
        BackendConfig::Sled { path, tree, key } => {
            format!("sled ({} tree={} key={})", path.display(), tree, key)
        }
    }
}

fn to_json<T: Serialize>(value: &T) -> Result<String, ApiError> {
    serde_json::to_string_pretty(value).map_err(|e| {
        ApiError::State(StateError::Codec(format!("Failed to serialize report: {}", e)))
    })
}

fn check_output_format(format: &str) -> Result<(), ApiError> {
    if format != "text" && format != "json" {
        return Err(ApiError::ConfigError(format!(
            "Invalid output format: {} (must be 'text' or 'json')",
            format
        )));
    }
    Ok(())
}
