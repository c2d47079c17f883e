//! Typed domain error enums.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`,
//! `crate::application`, `tokio`, `std::fs`, `std::process`, or `std::net`.
//! All error types implement `thiserror::Error` and convert to `anyhow::Error`
//! via the `?` operator.

use std::path::PathBuf;

use thiserror::Error;

// ── Install errors ────────────────────────────────────────────────────────────

/// Errors raised while detecting, preparing, or activating the service.
#[derive(Debug, Error)]
pub enum InstallError {
    #[error("This command must be run as root. Try: sudo svcinstall {command}")]
    NotElevated { command: String },

    #[error(
        "Project root not found. Checked (need {markers}):\n{}",
        format_candidates(.checked)
    )]
    ProjectRootNotFound {
        checked: Vec<PathBuf>,
        markers: String,
    },

    #[error("No Python interpreter found on PATH (looked for: {candidates}).")]
    InterpreterNotFound { candidates: String },

    #[error("Unknown user '{0}'. Create the account first or pass an existing username.")]
    UnknownUser(String),

    #[error("Cannot fix permissions on {}: {reason}", .path.display())]
    PermissionDenied { path: PathBuf, reason: String },

    #[error(
        "systemctl {action} {unit} failed: {detail}\n\nInspect the service logs: journalctl -u {unit} -n 50 --no-pager"
    )]
    Supervisor {
        action: String,
        unit: String,
        detail: String,
    },

    #[error(
        "{unit} is not active after start.\n\nInspect the service logs: journalctl -u {unit} -n 50 --no-pager\nRepair the installation: sudo svcinstall fix"
    )]
    NotActive { unit: String },
}

impl InstallError {
    /// Short, stable category name used in log events.
    #[must_use]
    pub fn category(&self) -> &'static str {
        match self {
            Self::NotElevated { .. } => "not-elevated",
            Self::ProjectRootNotFound { .. }
            | Self::InterpreterNotFound { .. }
            | Self::UnknownUser(_) => "prerequisite-missing",
            Self::PermissionDenied { .. } => "permission-error",
            Self::Supervisor { .. } | Self::NotActive { .. } => "supervisor-error",
        }
    }
}

fn format_candidates(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| format!("  • {}", p.display()))
        .collect::<Vec<_>>()
        .join("\n")
}

// ── Config errors ─────────────────────────────────────────────────────────────

/// Errors related to installer configuration values.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid service name '{0}': must match [A-Za-z0-9_.@-]+")]
    InvalidServiceName(String),

    #[error("Invalid value for {key}: {value}\n\n{expected}")]
    InvalidValue {
        key: String,
        value: String,
        expected: String,
    },

    #[error("interpreters must list at least one executable name")]
    NoInterpreters,
}
