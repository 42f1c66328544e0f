//! Configuration file support for toolset.
//!
//! toolset supports two configuration file locations:
//! - Global: `~/.toolset/config.toml` - User-wide defaults
//! - Project: `.toolset/config.toml` - Project-specific overrides
//!
//! Project config takes precedence over global config.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::ops::{AnalysisOptions, ReconcileOptions};

/// toolset configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Reconciliation settings
    pub reconcile: ReconcileConfig,

    /// Analysis settings
    pub analysis: AnalysisConfig,

    /// Output settings
    pub output: OutputConfig,
}

/// Reconciliation-related configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ReconcileConfig {
    /// Seed new tools with the settings of the closest removed tool (default: true)
    pub best_match: Option<bool>,

    /// Pair removed and added tools through converters (default: true)
    pub converters: Option<bool>,
}

/// Analysis-related configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Analyse for the managed build (default: true)
    pub managed: Option<bool>,
}

/// Output format of the commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Output-related configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Default output format
    pub format: Option<OutputFormat>,

    /// Colored diagnostics (default: true)
    pub color: Option<bool>,
}

impl Config {
    /// Load configuration from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;

        toml::from_str(&contents)
            .with_context(|| format!("failed to parse config file: {}", path.display()))
    }

    /// Load configuration with fallback to defaults if file doesn't exist.
    pub fn load_or_default(path: &Path) -> Self {
        if path.exists() {
            Self::load(path).unwrap_or_else(|e| {
                tracing::warn!("Failed to load config from {}: {}", path.display(), e);
                Self::default()
            })
        } else {
            Self::default()
        }
    }

    /// Merge another config into this one (other takes precedence).
    pub fn merge(&mut self, other: Config) {
        if other.reconcile.best_match.is_some() {
            self.reconcile.best_match = other.reconcile.best_match;
        }
        if other.reconcile.converters.is_some() {
            self.reconcile.converters = other.reconcile.converters;
        }
        if other.analysis.managed.is_some() {
            self.analysis.managed = other.analysis.managed;
        }
        if other.output.format.is_some() {
            self.output.format = other.output.format;
        }
        if other.output.color.is_some() {
            self.output.color = other.output.color;
        }
    }

    /// Options for the reconciliation engine.
    pub fn reconcile_options(&self) -> ReconcileOptions {
        ReconcileOptions {
            converters: self.reconcile.converters.unwrap_or(true),
            best_match: self.reconcile.best_match.unwrap_or(true),
        }
    }

    /// Options for the analysis.
    pub fn analysis_options(&self) -> AnalysisOptions {
        AnalysisOptions {
            managed: self.analysis.managed.unwrap_or(true),
        }
    }

    /// Default output format.
    pub fn output_format(&self) -> OutputFormat {
        self.output.format.unwrap_or_default()
    }

    /// Whether diagnostics are colored.
    pub fn color(&self) -> bool {
        self.output.color.unwrap_or(true)
    }
}

/// Get the global toolset config directory (~/.toolset).
pub fn global_config_dir() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|b| b.home_dir().join(".toolset"))
}

/// Get the global config path (~/.toolset/config.toml).
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("config.toml"))
}

/// Get the project config path (.toolset/config.toml).
pub fn project_config_path(project_root: &Path) -> PathBuf {
    project_root.join(".toolset").join("config.toml")
}

/// Load merged configuration from global and project locations.
///
/// Order of precedence (highest to lowest):
/// 1. Project config (.toolset/config.toml)
/// 2. Global config (~/.toolset/config.toml)
/// 3. Defaults
pub fn load_config(global_path: &Path, project_path: &Path) -> Config {
    let mut config = Config::default();

    if global_path.exists() {
        let global = Config::load_or_default(global_path);
        config.merge(global);
    }

    if project_path.exists() {
        let project = Config::load_or_default(project_path);
        config.merge(project);
    }

    config
}
