// src/config.rs

//! Defines the configuration of the shader scanner.
//!
//! The configuration is deserialized from a JSON file. Every field has a
//! default, so an empty object (or no file at all) gives the stock scanner:
//! word-boundary keyword search, last-wins struct redefinition and the
//! default builtin registry.
//!
//! Library entry points never read the global [`CONFIG`]; they take a
//! `ShaderScanner` built from a `Config` value. Only the binary consults it.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use log::{info, warn};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::scanner::{KeywordSearch, StructRedefinition};

/// Environment variable naming the configuration file read by [`CONFIG`].
pub const CONFIG_ENV_VAR: &str = "SHADER_SCAN_CONFIG";

/// Process-wide configuration, loaded on first access.
pub static CONFIG: Lazy<Config> = Lazy::new(Config::from_env);

/// Scanner configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(default)] // Missing fields take their default values.
pub struct Config {
    /// How `uniform`, `attribute` and `struct` keywords are located.
    pub keyword_search: KeywordSearch,
    /// What a second definition of the same struct name does.
    pub struct_redefinition: StructRedefinition,
    /// Extra builtin type names matched exactly (e.g. `"half"`).
    pub extra_exact_types: Vec<String>,
    /// Extra builtin family names matched by substring (e.g. `"subpassInput"`).
    pub extra_family_types: Vec<String>,
}

impl Config {
    /// Parses a configuration from JSON text.
    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str(text).context("Failed to parse scanner configuration")
    }

    /// Reads and parses a configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::from_json(&text).with_context(|| format!("In config file {}", path.display()))
    }

    /// Loads the file named by `SHADER_SCAN_CONFIG`, falling back to the
    /// defaults when the variable is unset or the file is unusable.
    pub fn from_env() -> Self {
        let Some(path) = std::env::var_os(CONFIG_ENV_VAR) else {
            return Config::default();
        };
        match Config::load(&path) {
            Ok(config) => {
                info!("Configuration loaded from {:?}.", path);
                config
            }
            Err(e) => {
                warn!("{:#}; using default configuration", e);
                Config::default()
            }
        }
    }
}
