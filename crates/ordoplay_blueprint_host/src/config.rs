// SPDX-License-Identifier: MIT OR Apache-2.0
//! Host configuration: RON file plus command-line overrides.

use clap::Parser;
use ordoplay_blueprint_commands::{Blueprint, InMemoryStore, StaticCatalog};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default tracing directive when neither the file nor `RUST_LOG` sets one
pub const DEFAULT_LOG_FILTER: &str = "ordoplay_blueprint=info";

/// Command-line arguments
#[derive(Debug, Clone, Default, Parser)]
#[command(name = "ordoplay_blueprint", version, about = "Line-oriented JSON host for blueprint graph commands")]
pub struct Cli {
    /// RON configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// RON catalog snapshot, replacing the built-in engine catalog
    #[arg(long, value_name = "PATH")]
    pub catalog: Option<PathBuf>,

    /// RON blueprint document to load (repeatable)
    #[arg(long = "blueprint", value_name = "PATH")]
    pub blueprints: Vec<PathBuf>,

    /// Pretty-print responses
    #[arg(long)]
    pub pretty: bool,
}

/// Error loading configuration or the documents it names
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File could not be read
    #[error("Failed to read {}: {source}", path.display())]
    Io {
        /// Offending file
        path: PathBuf,
        /// Underlying error
        source: std::io::Error,
    },

    /// File is not valid RON for its type
    #[error("Failed to parse {}: {source}", path.display())]
    Parse {
        /// Offending file
        path: PathBuf,
        /// Underlying error
        source: ron::error::SpannedError,
    },
}

/// Host settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HostConfig {
    /// Tracing filter directive, overridden by `RUST_LOG`
    pub log_filter: String,
    /// Catalog snapshot; the built-in catalog when absent
    pub catalog: Option<PathBuf>,
    /// Blueprint documents to load at startup
    pub blueprints: Vec<PathBuf>,
    /// Graph used when a request names none
    pub default_graph: Option<String>,
    /// Pretty-print responses
    pub pretty: bool,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            log_filter: DEFAULT_LOG_FILTER.to_string(),
            catalog: None,
            blueprints: Vec::new(),
            default_graph: None,
            pretty: false,
        }
    }
}

fn read(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })
}

impl HostConfig {
    /// Parse from RON text
    pub fn from_ron(s: &str) -> Result<Self, ron::error::SpannedError> {
        ron::from_str(s)
    }

    /// Load from a RON file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        Self::from_ron(&read(path)?).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// File settings (or defaults) with command-line flags applied on top
    pub fn resolve(cli: &Cli) -> Result<Self, ConfigError> {
        let mut config = match &cli.config {
            Some(path) => Self::load(path)?,
            None => Self::default(),
        };
        if let Some(catalog) = &cli.catalog {
            config.catalog = Some(catalog.clone());
        }
        config.blueprints.extend(cli.blueprints.iter().cloned());
        config.pretty |= cli.pretty;
        Ok(config)
    }

    /// The configured catalog snapshot
    pub fn load_catalog(&self) -> Result<StaticCatalog, ConfigError> {
        let Some(path) = &self.catalog else {
            return Ok(StaticCatalog::builtin());
        };
        let catalog = StaticCatalog::from_ron(&read(path)?).map_err(|source| ConfigError::Parse {
            path: path.clone(),
            source,
        })?;
        tracing::info!(path = %path.display(), classes = catalog.classes.len(), structs = catalog.structs.len(), "catalog loaded");
        Ok(catalog)
    }

    /// A store holding every configured blueprint
    pub fn load_store(&self) -> Result<InMemoryStore, ConfigError> {
        let mut store = InMemoryStore::new();
        for path in &self.blueprints {
            let blueprint = Blueprint::from_ron(&read(path)?).map_err(|source| ConfigError::Parse {
                path: path.clone(),
                source,
            })?;
            tracing::info!(path = %path.display(), blueprint = %blueprint.name, "blueprint loaded");
            store.insert(blueprint);
        }
        Ok(store)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ordoplay_blueprint_commands::BlueprintStore;

    #[test]
    fn test_defaults() {
        let config = HostConfig::default();
        assert_eq!(config.log_filter, "ordoplay_blueprint=info");
        assert!(config.catalog.is_none());
        assert!(!config.pretty);
    }

    #[test]
    fn test_partial_ron_keeps_defaults() {
        let config = HostConfig::from_ron(r#"(default_graph: Some("BP_Door"), pretty: true)"#).unwrap();
        assert_eq!(config.default_graph.as_deref(), Some("BP_Door"));
        assert!(config.pretty);
        assert_eq!(config.log_filter, DEFAULT_LOG_FILTER);
    }

    #[test]
    fn test_flags_override_file_defaults() {
        let cli = Cli::parse_from([
            "ordoplay_blueprint",
            "--catalog",
            "engine.ron",
            "--blueprint",
            "a.ron",
            "--blueprint",
            "b.ron",
            "--pretty",
        ]);
        let config = HostConfig::resolve(&cli).unwrap();
        assert_eq!(config.catalog, Some(PathBuf::from("engine.ron")));
        assert_eq!(config.blueprints, vec![PathBuf::from("a.ron"), PathBuf::from("b.ron")]);
        assert!(config.pretty);
    }

    #[test]
    fn test_missing_config_file() {
        let cli = Cli {
            config: Some(PathBuf::from("/nonexistent/ordoplay_blueprint.ron")),
            ..Cli::default()
        };
        assert!(matches!(HostConfig::resolve(&cli), Err(ConfigError::Io { .. })));
    }

    #[test]
    fn test_load_documents_from_disk() {
        let dir = std::env::temp_dir().join(format!("ordoplay_blueprint_host_{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("BP_Door.ron");
        let text = Blueprint::new("BP_Door", "AActor").to_ron().unwrap();
        std::fs::write(&path, text).unwrap();

        let config = HostConfig {
            blueprints: vec![path],
            ..HostConfig::default()
        };
        let store = config.load_store().unwrap();
        assert!(store.blueprint("BP_Door").is_some());
        assert!(!config.load_catalog().unwrap().classes.is_empty());

        std::fs::remove_dir_all(&dir).unwrap();
    }
}
