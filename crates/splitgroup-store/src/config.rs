//! Tool configuration and tag store factory.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use splitgroup_core::traits::TagStore;

use crate::file::JsonFileTagStore;
use crate::memory::MemoryTagStore;

/// Which tag store backend to use.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum StoreConfig {
    Memory,
    File {
        #[serde(default = "default_store_path")]
        path: PathBuf,
    },
}

impl Default for StoreConfig {
    fn default() -> Self {
        StoreConfig::File {
            path: default_store_path(),
        }
    }
}

fn default_store_path() -> PathBuf {
    PathBuf::from(".splitgroup/tags.json")
}

/// Top-level splitgroup configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SplitgroupConfig {
    /// Partition definition file.
    #[serde(default = "default_partitions")]
    pub partitions: PathBuf,
    /// Tag store backend.
    #[serde(default)]
    pub store: StoreConfig,
    /// Fixed seed for reproducible assignments (tests and demos only).
    #[serde(default)]
    pub seed: Option<u64>,
    /// Log an event for every fresh assignment.
    #[serde(default = "default_true")]
    pub track_events: bool,
}

fn default_partitions() -> PathBuf {
    PathBuf::from("partitions.toml")
}

fn default_true() -> bool {
    true
}

impl Default for SplitgroupConfig {
    fn default() -> Self {
        Self {
            partitions: default_partitions(),
            store: StoreConfig::default(),
            seed: None,
            track_events: true,
        }
    }
}

/// Resolve environment variable references like `${VAR_NAME}` in a string.
fn resolve_env_vars(s: &str) -> String {
    let mut result = s.to_string();
    let mut pos = 0;
    while let Some(offset) = result[pos..].find("${") {
        let start = pos + offset;
        let Some(end) = result[start..].find('}') else {
            break;
        };
        let var_name = &result[start + 2..start + end];
        let value = std::env::var(var_name).unwrap_or_default();
        result = format!("{}{}{}", &result[..start], value, &result[start + end + 1..]);
        // Substituted text is never expanded again.
        pos = start + value.len();
    }
    result
}

fn resolve_path(path: &Path) -> PathBuf {
    PathBuf::from(resolve_env_vars(&path.to_string_lossy()))
}

/// Load configuration from well-known paths.
///
/// Search order:
/// 1. `splitgroup.toml` in the current directory
/// 2. `~/.config/splitgroup/config.toml`
///
/// Environment variable override: `SPLITGROUP_STORE_PATH` forces a file store
/// at that path.
pub fn load_config() -> Result<SplitgroupConfig> {
    load_config_from(None)
}

/// Load config from an explicit path, or search the default locations.
pub fn load_config_from(path: Option<&Path>) -> Result<SplitgroupConfig> {
    let config_path = match path {
        Some(p) if p.exists() => Some(p.to_path_buf()),
        Some(p) => anyhow::bail!("config file not found: {}", p.display()),
        None => {
            let local = PathBuf::from("splitgroup.toml");
            if local.exists() {
                Some(local)
            } else {
                dirs_path()
                    .map(|home| home.join("config.toml"))
                    .filter(|global| global.exists())
            }
        }
    };

    let mut config = match config_path {
        Some(path) => {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            parse_config_str(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?
        }
        None => SplitgroupConfig::default(),
    };

    if let Ok(store_path) = std::env::var("SPLITGROUP_STORE_PATH") {
        config.store = StoreConfig::File {
            path: PathBuf::from(store_path),
        };
    }

    Ok(config)
}

/// Parse a config document and resolve `${VAR}` references in its paths.
pub fn parse_config_str(content: &str) -> Result<SplitgroupConfig> {
    let mut config: SplitgroupConfig = toml::from_str(content)?;
    config.partitions = resolve_path(&config.partitions);
    if let StoreConfig::File { path } = &mut config.store {
        *path = resolve_path(path);
    }
    Ok(config)
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("splitgroup"))
}

/// Create a tag store instance from its configuration.
pub fn create_store(config: &StoreConfig) -> Arc<dyn TagStore> {
    match config {
        StoreConfig::Memory => Arc::new(MemoryTagStore::new()),
        StoreConfig::File { path } => Arc::new(JsonFileTagStore::new(path.clone())),
    }
}
