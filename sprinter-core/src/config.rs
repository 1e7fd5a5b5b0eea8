//! Configuration management for Sprinter
//!
//! Configuration is loaded with the following priority (highest to lowest):
//! 1. CLI flags
//! 2. Environment variables (SPRINTER_*)
//! 3. Config file (~/.config/sprinter/config.toml)
//! 4. Default values

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::repo::repo_list_from_arg;
use crate::{Error, Result};

/// Response cache configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct CacheConfig {
    /// How long read results are reused; zero disables the cache
    #[serde(with = "humantime_serde")]
    pub duration: Duration,
}

/// GitHub connection configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct GitHubConfig {
    /// API base URL, for GitHub Enterprise installs
    pub api_url: Option<String>,
}

/// Root configuration structure
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    /// Monitored repositories as `owner/name` slugs
    pub repos: Vec<String>,

    pub cache: CacheConfig,

    pub github: GitHubConfig,
}

impl Config {
    /// Load configuration from the default config file location
    ///
    /// Returns default config if file doesn't exist
    pub fn load() -> Result<Self> {
        let config_path = Self::default_config_path();

        if let Some(path) = config_path {
            if path.exists() {
                return Self::load_from_file(&path);
            }
        }

        Ok(Self::default())
    }

    /// Load configuration from a specific file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(Error::Io)?;
        toml::from_str(&contents)
            .map_err(|e| Error::Config(format!("Failed to parse config: {}", e)))
    }

    /// Get the default config file path
    ///
    /// Returns `~/.config/sprinter/config.toml` on Unix
    pub fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("sprinter").join("config.toml"))
    }

    /// Apply environment variable overrides
    ///
    /// Supported variables:
    /// - SPRINTER_REPOS: comma separated slugs, or a path to a repo file
    /// - SPRINTER_CACHE: cache duration such as `5m`
    pub fn with_env_overrides(self) -> Result<Self> {
        self.with_overrides_from(|key| std::env::var(key).ok())
    }

    fn with_overrides_from(mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        if let Some(repos) = lookup("SPRINTER_REPOS").filter(|v| !v.trim().is_empty()) {
            self.repos = repo_list_from_arg(&repos)?;
        }

        if let Some(cache) = lookup("SPRINTER_CACHE") {
            self.cache.duration = parse_duration(&cache)?;
        }

        Ok(self)
    }

    /// Apply CLI flag overrides
    pub fn with_cli_overrides(mut self, repos: Option<Vec<String>>, cache: Option<Duration>) -> Self {
        if let Some(repos) = repos {
            self.repos = repos;
        }

        if let Some(duration) = cache {
            self.cache.duration = duration;
        }

        self
    }

    /// Load configuration with all overrides applied
    ///
    /// Priority: CLI > env > config file > defaults
    pub fn load_with_overrides(
        repos: Option<Vec<String>>,
        cache: Option<Duration>,
    ) -> Result<Self> {
        Ok(Self::load()?
            .with_env_overrides()?
            .with_cli_overrides(repos, cache))
    }
}

/// Parse a human readable duration such as `90s` or `5m`
pub fn parse_duration(value: &str) -> Result<Duration> {
    humantime_serde::re::humantime::parse_duration(value.trim())
        .map_err(|e| Error::Config(format!("Invalid duration {:?}: {}", value, e)))
}
