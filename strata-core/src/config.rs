//! Configuration management for Strata
//!
//! Configuration is loaded with the following priority (highest to lowest):
//! 1. CLI flags
//! 2. Environment variables (STRATA_*)
//! 3. Config file (~/.config/strata/config.toml)
//! 4. Default values

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Worktree-related configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct WorktreeConfig {
    /// Root directory for per-run worktrees; a temp-dir location when unset
    pub root: Option<PathBuf>,
}

/// Mining-related configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct MiningConfig {
    /// Branch to walk instead of HEAD
    pub branch: Option<String>,
}

/// Root configuration structure
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    /// Worktree configuration
    pub worktree: WorktreeConfig,
    /// Mining configuration
    pub mining: MiningConfig,
}

impl Config {
    /// Load configuration from the default config file location
    ///
    /// Returns default config if file doesn't exist
    pub fn load() -> Result<Self> {
        if let Some(path) = Self::default_config_path() {
            if path.exists() {
                return Self::load_from_file(&path);
            }
        }

        Ok(Self::default())
    }

    /// Load configuration from a specific file
    pub fn load_from_file(path: &PathBuf) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| Error::config(format!("failed to read config: {}", e)))?;
        toml::from_str(&contents)
            .map_err(|e| Error::config(format!("failed to parse config: {}", e)))
    }

    /// Get the default config file path
    ///
    /// Returns `~/.config/strata/config.toml` on Unix
    pub fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("strata").join("config.toml"))
    }

    /// Apply environment variable overrides
    ///
    /// Supported variables:
    /// - STRATA_WORKTREE_ROOT: Root directory for worktrees
    /// - STRATA_BRANCH: Branch to walk
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(root) = std::env::var("STRATA_WORKTREE_ROOT") {
            self.worktree.root = Some(PathBuf::from(root));
        }

        if let Ok(branch) = std::env::var("STRATA_BRANCH") {
            self.mining.branch = Some(branch);
        }

        self
    }

    /// Apply CLI flag overrides
    pub fn with_cli_overrides(
        mut self,
        worktree_root: Option<PathBuf>,
        branch: Option<String>,
    ) -> Self {
        if let Some(root) = worktree_root {
            self.worktree.root = Some(root);
        }

        if let Some(branch) = branch {
            self.mining.branch = Some(branch);
        }

        self
    }

    /// Load configuration with all overrides applied
    ///
    /// Priority: CLI > env > config file > defaults
    pub fn load_with_overrides(
        worktree_root: Option<PathBuf>,
        branch: Option<String>,
    ) -> Result<Self> {
        Ok(Self::load()?
            .with_env_overrides()
            .with_cli_overrides(worktree_root, branch))
    }
}
