//! Application service: project tree ownership and modes.
//!
//! Stops at the first failure. Changes already applied stay in place; the
//! operator re-runs `svcinstall fix` after correcting the cause.

use std::path::Path;

use anyhow::Result;

use crate::application::ports::{OwnershipFs, ProgressReporter};
use crate::domain::{InstallError, InstallPlan, InstallerConfig};

/// Bits added to the log directory.
pub const OWNER_RWX: u32 = 0o700;
/// Mode for a project-local environment file, which may hold secrets.
pub const ENV_FILE_MODE: u32 = 0o600;

/// Hand the project tree to the service account.
///
/// 1. chown the tree to `user:group`
/// 2. grant the owner read access throughout
/// 3. create the log directory, chown it, make it owner-writable
/// 4. restrict the project-local environment file to `0600`; a symlinked
///    one is skipped so nothing outside the tree changes
///
/// # Errors
///
/// Returns [`InstallError::PermissionDenied`] naming the path that failed.
pub fn apply_permissions(
    fs: &impl OwnershipFs,
    reporter: &impl ProgressReporter,
    plan: &InstallPlan,
    config: &InstallerConfig,
) -> Result<()> {
    let root = plan.project_root();
    let user = plan.user();

    reporter.step(&format!(
        "Setting owner of {} to {}:{}...",
        root.display(),
        user.name,
        user.group
    ));
    guard(root, fs.chown_tree(root, user))?;
    guard(root, fs.grant_owner_read_tree(root))?;

    let log_dir = plan.log_dir(&config.paths.log_dir);
    reporter.step(&format!("Preparing log directory {}...", log_dir.display()));
    guard(&log_dir, fs.create_dir_all(&log_dir))?;
    guard(&log_dir, fs.chown(&log_dir, user))?;
    guard(&log_dir, fs.add_mode(&log_dir, OWNER_RWX))?;

    let env_file = root.join(&config.paths.project_env_file);
    if fs.is_symlink(&env_file) {
        tracing::warn!(path = %env_file.display(), "environment file is a symlink, left untouched");
        reporter.warn(&format!(
            "{} is a symlink; its target keeps its current owner and mode",
            env_file.display()
        ));
    } else if fs.is_regular_file(&env_file) {
        reporter.step(&format!("Restricting {} to its owner...", env_file.display()));
        guard(&env_file, fs.set_mode(&env_file, ENV_FILE_MODE))?;
        guard(&env_file, fs.chown(&env_file, user))?;
    }

    reporter.success("Permissions updated");
    Ok(())
}

fn guard(path: &Path, result: Result<()>) -> Result<()> {
    result.map_err(|e| {
        tracing::warn!(path = %path.display(), error = %e, "permission change failed");
        InstallError::PermissionDenied {
            path: path.to_path_buf(),
            reason: format!("{e:#}"),
        }
        .into()
    })
}
