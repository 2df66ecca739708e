//! # Configuration
//!
//! Curator configuration is managed by [`confique`], which handles layered
//! loading from a TOML file, environment variables and compiled defaults.
//!
//! ## Resolution Order
//!
//! 1. **Environment variables**: `CURATOR_PIN_CAPACITY`, `CURATOR_FEATURER`, etc.
//! 2. **Config file**: `curator.toml` in the data directory.
//! 3. **Compiled defaults**: via `#[config(default = ...)]`.
//!
//! ## Available Settings
//!
//! | Key | Default | Description |
//! |-----|---------|-------------|
//! | `post_types` | `["post"]` | Content types that may be curated |
//! | `default_status` | `publish` | Status given to newly created curated records |
//! | `pin_capacity` | `3` | Maximum number of pinned records |
//! | `featured_sizes` | none | Size keys selectable for featured records (e.g. `2x1`) |
//! | `modules.curator` | `true` | Curation itself |
//! | `modules.featurer` | `false` | Featuring curated records |
//! | `modules.pinner` | `false` | Pinning curated records to the top of the feed |
//!
//! The config is plain data. [`crate::modules::ModuleRegistry::from_config`]
//! validates it and is what the rest of the crate consumes.

use crate::error::{CuratorError, Result};
use confique::Config;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const CONFIG_FILENAME: &str = "curator.toml";

/// Which modules are switched on.
#[derive(Config, Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ModulesConfig {
    #[config(default = true, env = "CURATOR_CURATOR")]
    pub curator: bool,

    #[config(default = false, env = "CURATOR_FEATURER")]
    pub featurer: bool,

    #[config(default = false, env = "CURATOR_PINNER")]
    pub pinner: bool,
}

impl Default for ModulesConfig {
    fn default() -> Self {
        Self {
            curator: true,
            featurer: false,
            pinner: false,
        }
    }
}

/// Configuration for curator, stored in `curator.toml`.
#[derive(Config, Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct CuratorConfig {
    /// Content types whose items may be curated.
    #[config(default = ["post"])]
    pub post_types: Vec<String>,

    /// Status of newly created curated records ("publish", "draft", ...)
    #[config(default = "publish", env = "CURATOR_DEFAULT_STATUS")]
    pub default_status: String,

    /// How many records the pin list holds before evicting the oldest.
    #[config(default = 3, env = "CURATOR_PIN_CAPACITY")]
    pub pin_capacity: usize,

    /// Size keys an editor may pick for a featured record.
    /// When absent, featured records carry no size.
    pub featured_sizes: Option<Vec<String>>,

    #[config(nested)]
    pub modules: ModulesConfig,
}

impl Default for CuratorConfig {
    fn default() -> Self {
        Self {
            post_types: vec!["post".to_string()],
            default_status: "publish".to_string(),
            pin_capacity: 3,
            featured_sizes: None,
            modules: ModulesConfig::default(),
        }
    }
}

impl CuratorConfig {
    /// Load from `dir/curator.toml` (if present) layered under the environment.
    pub fn load<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let path = dir.as_ref().join(CONFIG_FILENAME);
        CuratorConfig::builder()
            .env()
            .file(path)
            .load()
            .map_err(|e| CuratorError::Config(e.to_string()))
    }

    /// Get featured sizes, empty if not configured.
    pub fn featured_sizes(&self) -> Vec<String> {
        self.featured_sizes.clone().unwrap_or_default()
    }

    /// Enable every module; handy for tests and demos.
    pub fn with_all_modules(mut self) -> Self {
        self.modules = ModulesConfig {
            curator: true,
            featurer: true,
            pinner: true,
        };
        self
    }
}
