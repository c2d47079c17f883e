//! Application service: unit activation and removal.
//!
//! Talks to the supervisor only through [`ServiceManager`] and [`UnitStore`].
//! Nothing here retries: after activation the supervisor's own restart
//! policy takes over, and a broken install is repaired with `svcinstall fix`.

use std::path::PathBuf;
use std::process::Output;

use anyhow::{Context, Result};

use crate::application::ports::{ProgressReporter, ServiceManager, UnitStore};
use crate::domain::{InstallError, ServiceDefinition};

/// Write the unit, reload the supervisor, enable and start the unit.
///
/// Returns the path the unit was written to.
///
/// # Errors
///
/// Returns an error if the unit file cannot be written, or
/// [`InstallError::Supervisor`] for the first failing `systemctl` verb.
pub async fn activate_unit(
    manager: &impl ServiceManager,
    store: &impl UnitStore,
    reporter: &impl ProgressReporter,
    definition: &ServiceDefinition,
) -> Result<PathBuf> {
    let unit = definition.unit_name();

    reporter.step(&format!("Writing {}...", store.unit_path(unit).display()));
    let path = store
        .write(definition)
        .with_context(|| format!("writing unit file for {unit}"))?;
    tracing::info!(unit, path = %path.display(), "unit file written");

    reporter.step("Reloading systemd...");
    check(manager.daemon_reload().await, "daemon-reload", unit)?;

    reporter.step(&format!("Enabling {unit}..."));
    check(manager.enable(unit).await, "enable", unit)?;

    reporter.step(&format!("Starting {unit}..."));
    check(manager.start(unit).await, "start", unit)?;

    reporter.success(&format!("{unit} started"));
    Ok(path)
}

/// Confirm the unit reached the `active` state.
///
/// # Errors
///
/// Returns [`InstallError::NotActive`] if the supervisor reports any other
/// state, or [`InstallError::Supervisor`] if it cannot be queried.
pub async fn verify_active(manager: &impl ServiceManager, unit: &str) -> Result<()> {
    let output = manager
        .is_active(unit)
        .await
        .map_err(|e| supervisor_error("is-active", unit, &format!("{e:#}")))?;
    let state = String::from_utf8_lossy(&output.stdout).trim().to_string();
    tracing::debug!(unit, state = %state, "is-active");
    if state == "active" {
        Ok(())
    } else {
        Err(InstallError::NotActive {
            unit: unit.to_string(),
        }
        .into())
    }
}

/// What `deactivate_unit` found and did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RemovalReport {
    pub was_running: bool,
    pub was_enabled: bool,
    pub file_removed: bool,
}

/// Stop, disable and delete a unit, then reload the supervisor.
///
/// "Not running" and "not enabled" outcomes are expected and ignored.
///
/// # Errors
///
/// Returns an error if the unit file cannot be removed or the reload fails.
pub async fn deactivate_unit(
    manager: &impl ServiceManager,
    store: &impl UnitStore,
    reporter: &impl ProgressReporter,
    unit: &str,
) -> Result<RemovalReport> {
    reporter.step(&format!("Stopping {unit}..."));
    let was_running = succeeded(manager.stop(unit).await, "stop", unit);
    if !was_running {
        reporter.step(&format!("{unit} was not running"));
    }

    reporter.step(&format!("Disabling {unit}..."));
    let was_enabled = succeeded(manager.disable(unit).await, "disable", unit);
    if !was_enabled {
        reporter.step(&format!("{unit} was not enabled"));
    }

    let file_removed = store
        .remove(unit)
        .with_context(|| format!("removing unit file {}", store.unit_path(unit).display()))?;
    if file_removed {
        reporter.step(&format!("Removed {}", store.unit_path(unit).display()));
    }

    reporter.step("Reloading systemd...");
    check(manager.daemon_reload().await, "daemon-reload", unit)?;

    reporter.success(&format!("{unit} removed"));
    Ok(RemovalReport {
        was_running,
        was_enabled,
        file_removed,
    })
}

// ── Helpers ───────────────────────────────────────────────────────────────────

fn check(result: Result<Output>, action: &str, unit: &str) -> Result<()> {
    let output = result.map_err(|e| supervisor_error(action, unit, &format!("{e:#}")))?;
    if output.status.success() {
        tracing::debug!(unit, action, "systemctl ok");
        return Ok(());
    }
    let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
    let detail = if stderr.is_empty() {
        output.status.to_string()
    } else {
        stderr
    };
    Err(supervisor_error(action, unit, &detail))
}

fn succeeded(result: Result<Output>, action: &str, unit: &str) -> bool {
    match result {
        Ok(output) if output.status.success() => true,
        Ok(output) => {
            tracing::debug!(unit, action, status = %output.status, "ignored systemctl failure");
            false
        }
        Err(e) => {
            tracing::warn!(unit, action, error = %e, "ignored systemctl failure");
            false
        }
    }
}

fn supervisor_error(action: &str, unit: &str, detail: &str) -> anyhow::Error {
    tracing::warn!(unit, action, detail, "systemctl failed");
    InstallError::Supervisor {
        action: action.to_string(),
        unit: unit.to_string(),
        detail: detail.to_string(),
    }
    .into()
}
