//
//  devops-state
//  config/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Configuration Module
//!
//! Loads the `dvs` settings from a TOML file stored in the platform config
//! directory.
//!
//! ## Configuration File Location
//!
//! - **Linux**: `~/.config/dvs/config.toml`
//! - **macOS**: `~/Library/Application Support/dvs/config.toml`
//! - **Windows**: `C:\Users\<User>\AppData\Roaming\dvs\config\config.toml`
//!
//! ## Example Configuration File
//!
//! ```toml
//! [remote]
//! organization_url = "https://dev.azure.com/contoso"
//! project = "web"
//! username = "ana@contoso.com"
//! api_version = "7.1"
//!
//! [state]
//! path = "/home/ana/infra/state.json"
//! create_if_missing = false
//!
//! [polling]
//! interval_secs = 5
//! max_attempts = 120
//! ```
//!
//! The access token is never read from this file; set `DVS_TOKEN` instead.
//!
//! ## Submodules
//!
//! - [`file`]: Low-level configuration file I/O operations

mod file;

pub use file::*;

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::resources::PollPolicy;
use crate::state::{InitMode, StateConfig};

/// File name of the default state file inside the data directory.
pub const STATE_FILE_NAME: &str = "state.json";

/// Global configuration container.
///
/// All sections use `#[serde(default)]`, so a missing or partial file is
/// valid.
///
/// ```rust
/// use devops_state::config::Config;
///
/// let config = Config::default();
/// assert!(config.state.create_if_missing);
/// assert_eq!(config.polling.max_attempts, 60);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub remote: RemoteConfig,

    #[serde(default)]
    pub state: StateSettings,

    #[serde(default)]
    pub polling: PollingConfig,
}

/// Where the remote API lives and who talks to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct RemoteConfig {
    /// Organization URL, e.g. `https://dev.azure.com/contoso`
    #[serde(default)]
    pub organization_url: Option<String>,

    /// Project every request is scoped to
    #[serde(default)]
    pub project: Option<String>,

    /// Basic-auth username sent with the token. Empty when unset.
    #[serde(default)]
    pub username: Option<String>,

    /// Overrides the `api-version` query parameter
    #[serde(default)]
    pub api_version: Option<String>,
}

/// State file settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateSettings {
    /// State file path. Defaults to `state.json` in the data directory.
    #[serde(default)]
    pub path: Option<PathBuf>,

    /// Whether a missing state file may be created by the first write.
    ///
    /// When `false`, only `dvs state wipe` creates it.
    #[serde(default = "default_create_if_missing")]
    pub create_if_missing: bool,
}

fn default_create_if_missing() -> bool {
    true
}

impl Default for StateSettings {
    fn default() -> Self {
        Self {
            path: None,
            create_if_missing: default_create_if_missing(),
        }
    }
}

/// Polling loop settings for long-running remote operations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PollingConfig {
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,

    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
}

fn default_interval_secs() -> u64 {
    10
}

fn default_max_attempts() -> u32 {
    60
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            interval_secs: default_interval_secs(),
            max_attempts: default_max_attempts(),
        }
    }
}

impl Config {
    /// Loads the configuration from the default location, or defaults if
    /// there is no file.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// Loads the configuration from `path`, or defaults if there is no file.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !config_exists(path) {
            return Ok(Self::default());
        }
        let content = read_config_file(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        toml::from_str(&content)
            .with_context(|| format!("Invalid config file {}", path.display()))
    }

    /// Saves the configuration to `path`.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        write_config_file(path, &content)
    }

    pub fn config_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("", "", crate::APP_NAME)
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;
        Ok(dirs.config_dir().join("config.toml"))
    }

    pub fn data_dir() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("", "", crate::APP_NAME)
            .ok_or_else(|| anyhow::anyhow!("Could not determine data directory"))?;
        Ok(dirs.data_dir().to_path_buf())
    }

    /// State store configuration.
    ///
    /// The path is taken from `path_override`, then from the file, then from
    /// the data directory.
    pub fn state_config(&self, path_override: Option<&Path>) -> Result<StateConfig> {
        let path = match (path_override, &self.state.path) {
            (Some(path), _) => path.to_path_buf(),
            (None, Some(path)) => path.clone(),
            (None, None) => Self::data_dir()?.join(STATE_FILE_NAME),
        };
        let init = if self.state.create_if_missing {
            InitMode::CreateIfMissing
        } else {
            InitMode::FailIfMissing
        };
        Ok(StateConfig::at(path, init))
    }

    /// Polling used by `dvs build wait` unless overridden by flags.
    pub fn poll_policy(&self) -> PollPolicy {
        PollPolicy::new(
            Duration::from_secs(self.polling.interval_secs),
            self.polling.max_attempts,
        )
    }
}
