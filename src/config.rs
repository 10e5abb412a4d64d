use std::path::{Path, PathBuf};

use feature_channels::ChannelMode;
use serde::Deserialize;

use crate::io::OutputFormat;

/// Environment variable naming the configuration file.
pub const CONFIG_ENV: &str = "CONFIG_FILE";

/// Which plane set to compute
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum PlaneSet {
    /// 15 planes
    #[default]
    Compact,
    /// 32 planes
    Full,
}

impl From<PlaneSet> for ChannelMode {
    fn from(set: PlaneSet) -> Self {
        match set {
            PlaneSet::Compact => ChannelMode::Compact,
            PlaneSet::Full => ChannelMode::Full,
        }
    }
}

/// Application configuration loaded from a YAML file
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Plane set used when neither `--mode` nor `--full` is given
    #[serde(default)]
    pub mode: PlaneSet,

    /// Output format used when `--format` is not given
    #[serde(default)]
    pub format: OutputFormat,

    /// Concurrent extraction jobs for `batch`
    #[serde(default = "default_workers")]
    pub workers: usize,
}

fn default_workers() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(4)
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            mode: PlaneSet::default(),
            format: OutputFormat::default(),
            workers: default_workers(),
        }
    }
}

impl AppConfig {
    /// The configuration file to use: `cli` if given, else `$CONFIG_FILE`.
    pub fn resolve_path(cli: Option<PathBuf>) -> Option<PathBuf> {
        cli.or_else(|| std::env::var_os(CONFIG_ENV).map(PathBuf::from))
    }

    pub fn from_yaml_str(content: &str) -> Result<Self, serde_yaml::Error> {
        // An empty document deserializes as unit, not as an empty map
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        let mut config: Self = serde_yaml::from_str(content)?;
        if config.workers == 0 {
            tracing::warn!("workers must be at least 1, using 1");
            config.workers = 1;
        }
        Ok(config)
    }

    /// Load configuration from `path`, or defaults when there is none.
    ///
    /// Read and parse failures are logged and fall back to defaults.
    pub fn load(path: Option<&Path>) -> Self {
        let Some(path) = path else {
            return Self::default();
        };
        match std::fs::read_to_string(path) {
            Ok(content) => match Self::from_yaml_str(&content) {
                Ok(config) => {
                    tracing::info!(
                        path = %path.display(),
                        mode = ?config.mode,
                        workers = config.workers,
                        "Loaded configuration"
                    );
                    config
                }
                Err(e) => {
                    tracing::warn!(
                        %e,
                        path = %path.display(),
                        "Failed to parse config, using defaults"
                    );
                    Self::default()
                }
            },
            Err(e) => {
                tracing::warn!(%e, path = %path.display(), "Failed to read config, using defaults");
                Self::default()
            }
        }
    }
}
