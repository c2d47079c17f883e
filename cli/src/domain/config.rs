//! Domain types and validators for installer configuration.
//!
//! Pure functions only: no I/O, no async, no filesystem access.

use std::path::{Path, PathBuf};

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::domain::error::ConfigError;

// ── Constants ────────────────────────────────────────────────────────────────

/// Environment variable naming an explicit environment file for the service.
pub const ENV_FILE_OVERRIDE_VAR: &str = "SVCINSTALL_ENV_FILE";

/// Version-control marker accepted as an alternative to the entry file.
pub const VCS_MARKER: &str = ".git";

// ── Launch mode ──────────────────────────────────────────────────────────────

/// How the application is launched by the unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LaunchMode {
    /// Web UI only.
    #[default]
    Serve,
    /// Web UI plus the scheduled analysis task.
    ServeWithSchedule,
}

impl LaunchMode {
    /// Command-line arguments passed to the entry file.
    #[must_use]
    pub fn args(self) -> &'static [&'static str] {
        match self {
            Self::Serve => &["--webui-only"],
            Self::ServeWithSchedule => &["--webui", "--schedule"],
        }
    }
}

// ── Config schema ────────────────────────────────────────────────────────────

/// Top-level configuration stored in `/etc/svcinstall/config.yaml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InstallerConfig {
    /// Service identity and launch settings.
    pub service: ServiceConfig,
    /// Host paths consulted during detection and installation.
    pub paths: PathsConfig,
    /// Interpreter names tried in order through `PATH`.
    pub interpreters: Vec<String>,
    /// Seconds to wait after `systemctl start` before checking `is-active`.
    pub verify_delay_secs: u64,
}

impl Default for InstallerConfig {
    fn default() -> Self {
        Self {
            service: ServiceConfig::default(),
            paths: PathsConfig::default(),
            interpreters: vec!["python3".to_string(), "python".to_string()],
            verify_delay_secs: 2,
        }
    }
}

/// Service settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    pub name: String,
    pub description: String,
    /// Entry file relative to the project root; doubles as the entry marker.
    pub entry_file: String,
    pub launch_mode: LaunchMode,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            name: "stock-analysis".to_string(),
            description: "Stock analysis web service".to_string(),
            entry_file: "main.py".to_string(),
            launch_mode: LaunchMode::Serve,
        }
    }
}

/// Filesystem locations.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    /// Directory the supervisor reads unit files from.
    pub unit_dir: PathBuf,
    /// System-wide install location.
    pub system_install_dir: PathBuf,
    /// Per-user install location, relative to `$HOME`.
    pub user_install_dir: PathBuf,
    /// Environment file relative to the project root.
    pub project_env_file: PathBuf,
    /// Environment file relative to the service account's home.
    pub user_env_file: PathBuf,
    /// System-wide environment file.
    pub system_env_file: PathBuf,
    /// Log directory relative to the project root.
    pub log_dir: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            unit_dir: PathBuf::from("/etc/systemd/system"),
            system_install_dir: PathBuf::from("/opt/stock-analysis"),
            user_install_dir: PathBuf::from("stock-analysis"),
            project_env_file: PathBuf::from(".env"),
            user_env_file: PathBuf::from(".config/stock-analysis/.env"),
            system_env_file: PathBuf::from("/etc/stock-analysis/.env"),
            log_dir: PathBuf::from("logs"),
        }
    }
}

impl InstallerConfig {
    /// Unit file name, e.g. `stock-analysis.service`.
    #[must_use]
    pub fn unit_name(&self) -> String {
        format!("{}.service", self.service.name)
    }

    /// Files or directories whose presence marks a project root.
    #[must_use]
    pub fn markers(&self) -> [&str; 2] {
        [self.service.entry_file.as_str(), VCS_MARKER]
    }

    /// Validate the loaded configuration.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] for the first invalid value.
    pub fn validate(&self) -> Result<()> {
        validate_service_name(&self.service.name)?;
        if self.interpreters.iter().all(|i| i.trim().is_empty()) {
            return Err(ConfigError::NoInterpreters.into());
        }
        require_relative("service.entry_file", Path::new(&self.service.entry_file))?;
        require_relative("paths.user_install_dir", &self.paths.user_install_dir)?;
        require_relative("paths.project_env_file", &self.paths.project_env_file)?;
        require_relative("paths.user_env_file", &self.paths.user_env_file)?;
        require_relative("paths.log_dir", &self.paths.log_dir)?;
        require_absolute("paths.unit_dir", &self.paths.unit_dir)?;
        require_absolute("paths.system_install_dir", &self.paths.system_install_dir)?;
        require_absolute("paths.system_env_file", &self.paths.system_env_file)?;
        Ok(())
    }
}

// ── Validators ───────────────────────────────────────────────────────────────

/// Validates a systemd service name.
///
/// # Errors
///
/// Returns an error if the name is empty or contains characters systemd
/// does not accept in unit names.
pub fn validate_service_name(name: &str) -> Result<()> {
    let valid = !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '@' | '-'));
    if !valid {
        return Err(ConfigError::InvalidServiceName(name.to_string()).into());
    }
    Ok(())
}

fn require_relative(key: &str, path: &Path) -> Result<()> {
    if path.as_os_str().is_empty() || path.is_absolute() {
        return Err(ConfigError::InvalidValue {
            key: key.to_string(),
            value: path.display().to_string(),
            expected: "Expected a non-empty relative path.".to_string(),
        }
        .into());
    }
    Ok(())
}

fn require_absolute(key: &str, path: &Path) -> Result<()> {
    if !path.is_absolute() {
        return Err(ConfigError::InvalidValue {
            key: key.to_string(),
            value: path.display().to_string(),
            expected: "Expected an absolute path.".to_string(),
        }
        .into());
    }
    Ok(())
}

// ── Unit tests ───────────────────────────────────────────────────────────────
