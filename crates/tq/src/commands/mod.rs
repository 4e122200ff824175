//! Command implementations for the tq CLI.
//!
//! This module contains the actual command handlers that are invoked by the CLI.

pub mod config;
pub mod projects;
pub mod query;

use std::path::PathBuf;

use taskq_core::{CatalogStore, CatalogStoreError, ProjectCatalog};
use taskq_query::QueryError;
use tracing::debug;

use crate::cli::Cli;
use config::Config;

/// Error type for command execution.
#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    /// Query parsing or resolution error.
    #[error("query error: {0}")]
    Query(#[from] QueryError),

    /// Catalog store error.
    #[error("catalog error: {0}")]
    Catalog(#[from] CatalogStoreError),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for command execution.
pub type Result<T> = std::result::Result<T, CommandError>;

/// Context for command execution, containing common dependencies.
pub struct CommandContext {
    /// Whether to output JSON.
    pub json_output: bool,
    /// Whether to use colors.
    pub use_colors: bool,
    /// Whether to be quiet (errors only).
    pub quiet: bool,
    /// Whether to be verbose.
    pub verbose: bool,
    /// Catalog path given on the command line or in `TQ_CATALOG`.
    pub catalog: Option<PathBuf>,
}

impl CommandContext {
    /// Creates a new command context from CLI arguments.
    ///
    /// `--no-color` wins over the config file; otherwise `output.color`
    /// decides, defaulting to on.
    pub fn from_cli(cli: &Cli, config: &Config) -> Self {
        let use_colors = !cli.no_color && config.output.color.unwrap_or(true);
        Self {
            json_output: cli.json,
            use_colors,
            quiet: cli.quiet,
            verbose: cli.verbose,
            catalog: cli.catalog.clone(),
        }
    }

    /// Returns the catalog store, by priority: flag/env, config, data directory.
    pub fn catalog_store(&self, config: &Config) -> Result<CatalogStore> {
        if let Some(path) = &self.catalog {
            return Ok(CatalogStore::with_path(path.clone()));
        }
        if let Some(path) = &config.catalog.path {
            return Ok(CatalogStore::with_path(path.clone()));
        }
        Ok(CatalogStore::new()?)
    }

    /// Loads the project catalog. A missing file yields an empty catalog.
    pub async fn load_catalog(&self, config: &Config) -> Result<ProjectCatalog> {
        let store = self.catalog_store(config)?;
        let catalog = store.load_or_default_async().await?;
        debug!(path = %store.path().display(), projects = catalog.len(), "loaded catalog");
        Ok(catalog)
    }
}
