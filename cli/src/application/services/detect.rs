//! Application service: host detection use-case.
//!
//! Resolves the project root, interpreter, service account, and optional
//! environment file into an immutable [`InstallPlan`]. Every host query goes
//! through [`HostInspector`]; nothing here mutates the host.

use std::path::PathBuf;

use anyhow::Result;

use crate::application::ports::HostInspector;
use crate::domain::config::ENV_FILE_OVERRIDE_VAR;
use crate::domain::{InstallError, InstallPlan, InstallerConfig, UserIdentity};

/// Detect everything needed to render the unit.
///
/// Order: project root, interpreter, account, environment file. The first
/// failure aborts.
///
/// # Errors
///
/// Returns [`InstallError::ProjectRootNotFound`], [`InstallError::InterpreterNotFound`]
/// or [`InstallError::UnknownUser`] for a missing prerequisite.
pub fn build_plan(
    host: &impl HostInspector,
    config: &InstallerConfig,
    requested_user: Option<&str>,
) -> Result<InstallPlan> {
    let root = detect_project_root(host, config)?;
    let interpreter = detect_interpreter(host, config)?;
    let user = resolve_user(host, requested_user)?;
    let env_file = detect_env_file(host, config, &root, &user.home);
    InstallPlan::new(root, interpreter, env_file, user)
}

/// Find the application tree.
///
/// Candidates, in order: the parent of the installer's own directory, the
/// working directory, the system install dir, the per-user install dir.
/// A candidate qualifies when it contains the entry file or `.git`.
///
/// # Errors
///
/// Returns [`InstallError::ProjectRootNotFound`] listing every candidate.
pub fn detect_project_root(host: &impl HostInspector, config: &InstallerConfig) -> Result<PathBuf> {
    let candidates = root_candidates(host, config);
    for candidate in &candidates {
        if is_project_root(host, config, candidate) {
            tracing::debug!(path = %candidate.display(), "project root detected");
            return Ok(candidate.clone());
        }
        tracing::debug!(path = %candidate.display(), "no entry marker");
    }
    Err(InstallError::ProjectRootNotFound {
        checked: candidates,
        markers: config.markers().join(" or "),
    }
    .into())
}

fn root_candidates(host: &impl HostInspector, config: &InstallerConfig) -> Vec<PathBuf> {
    let mut candidates = Vec::with_capacity(4);
    if let Some(parent) = host
        .installer_dir()
        .and_then(|dir| dir.parent().map(PathBuf::from))
    {
        candidates.push(parent);
    }
    if let Some(cwd) = host.current_dir() {
        candidates.push(cwd);
    }
    candidates.push(config.paths.system_install_dir.clone());
    if let Some(home) = host.home_dir() {
        candidates.push(home.join(&config.paths.user_install_dir));
    }
    candidates.dedup();
    candidates
}

fn is_project_root(
    host: &impl HostInspector,
    config: &InstallerConfig,
    candidate: &std::path::Path,
) -> bool {
    candidate.is_absolute()
        && host.is_dir(candidate)
        && config
            .markers()
            .iter()
            .any(|marker| host.exists(&candidate.join(marker)))
}

/// Resolve the interpreter through `PATH`, preferring earlier names.
///
/// # Errors
///
/// Returns [`InstallError::InterpreterNotFound`] if no name resolves.
pub fn detect_interpreter(host: &impl HostInspector, config: &InstallerConfig) -> Result<PathBuf> {
    for name in config.interpreters.iter().filter(|n| !n.trim().is_empty()) {
        if let Some(path) = host.find_executable(name) {
            tracing::debug!(name = %name, path = %path.display(), "interpreter resolved");
            return Ok(path);
        }
    }
    Err(InstallError::InterpreterNotFound {
        candidates: config.interpreters.join(", "),
    }
    .into())
}

/// Find the environment file the service should load, if any.
///
/// Priority: project root, the account's home, the system config path, then
/// the file named by `SVCINSTALL_ENV_FILE`. Absence is not an error.
#[must_use]
pub fn detect_env_file(
    host: &impl HostInspector,
    config: &InstallerConfig,
    root: &std::path::Path,
    home: &std::path::Path,
) -> Option<PathBuf> {
    let mut candidates = vec![
        root.join(&config.paths.project_env_file),
        home.join(&config.paths.user_env_file),
        config.paths.system_env_file.clone(),
    ];
    if let Some(over) = host
        .env_var(ENV_FILE_OVERRIDE_VAR)
        .filter(|v| !v.trim().is_empty())
    {
        candidates.push(PathBuf::from(over.trim()));
    }
    let found = candidates
        .into_iter()
        .find(|p| p.is_absolute() && host.is_file(p));
    match &found {
        Some(path) => tracing::debug!(path = %path.display(), "environment file detected"),
        None => tracing::debug!("no environment file found"),
    }
    found
}

/// Resolve the account the service runs as.
///
/// Without an explicit name: `SUDO_USER` (ignored when empty or `root`),
/// then the effective user.
///
/// # Errors
///
/// Returns [`InstallError::UnknownUser`] if the name does not resolve to an
/// account, or an error if the account database cannot be queried.
pub fn resolve_user(host: &impl HostInspector, requested: Option<&str>) -> Result<UserIdentity> {
    if let Some(name) = requested.map(str::trim).filter(|n| !n.is_empty()) {
        return host
            .lookup_user(name)?
            .ok_or_else(|| InstallError::UnknownUser(name.to_string()).into());
    }

    if let Some(invoker) = host
        .env_var("SUDO_USER")
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty() && v != "root")
    {
        return host
            .lookup_user(&invoker)?
            .ok_or_else(|| InstallError::UnknownUser(invoker).into());
    }

    host.effective_user()?
        .ok_or_else(|| InstallError::UnknownUser("<effective user>".to_string()).into())
}
