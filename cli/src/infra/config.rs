//! Loads `InstallerConfig` from a YAML file on disk.

use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::domain::InstallerConfig;

/// Location used when neither `--config` nor `SVCINSTALL_CONFIG` is given.
pub const DEFAULT_CONFIG_PATH: &str = "/etc/svcinstall/config.yaml";

/// YAML-backed configuration source.
pub struct YamlConfigStore {
    path: PathBuf,
}

impl YamlConfigStore {
    /// Use `path` if given, otherwise the system default location.
    #[must_use]
    pub fn new(path: Option<PathBuf>) -> Self {
        Self {
            path: path.unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH)),
        }
    }

    #[must_use]
    pub fn path(&self) -> &std::path::Path {
        &self.path
    }

    /// Load and validate the configuration. A missing file yields defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read, parsed, or
    /// fails validation.
    pub fn load(&self) -> Result<InstallerConfig> {
        let config = if self.path.exists() {
            let content = std::fs::read_to_string(&self.path)
                .with_context(|| format!("cannot read {}", self.path.display()))?;
            serde_yaml::from_str::<InstallerConfig>(&content)
                .with_context(|| format!("cannot parse {}", self.path.display()))?
        } else {
            tracing::debug!(path = %self.path.display(), "no config file, using defaults");
            InstallerConfig::default()
        };
        config
            .validate()
            .with_context(|| format!("invalid configuration in {}", self.path.display()))?;
        Ok(config)
    }
}
