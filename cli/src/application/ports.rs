//! Port trait definitions for the Application layer.
//!
//! Ports are the interfaces (contracts) that infrastructure must fulfill.
//! This file imports only from `crate::domain`, never from `crate::infra`,
//! `crate::commands`, or `crate::output`.

use std::path::{Path, PathBuf};
use std::process::{ExitStatus, Output};

use anyhow::Result;

use crate::domain::{ServiceDefinition, UserIdentity};

// ── Host Inspection Port ──────────────────────────────────────────────────────

/// Every question detection asks the host: paths, `PATH` lookups,
/// environment variables, and the account database.
pub trait HostInspector {
    /// Directory containing the running installer executable.
    fn installer_dir(&self) -> Option<PathBuf>;
    /// Current working directory of the process.
    fn current_dir(&self) -> Option<PathBuf>;
    /// Home directory of the invoking process.
    fn home_dir(&self) -> Option<PathBuf>;
    /// `true` if `path` exists (file, directory, or anything else).
    fn exists(&self, path: &Path) -> bool;
    /// `true` if `path` is a directory.
    fn is_dir(&self, path: &Path) -> bool;
    /// `true` if `path` is a regular file.
    fn is_file(&self, path: &Path) -> bool;
    /// Resolve an executable name through `PATH`.
    fn find_executable(&self, name: &str) -> Option<PathBuf>;
    /// Read an environment variable; unset and non-UTF-8 values are `None`.
    fn env_var(&self, key: &str) -> Option<String>;
    /// Look up an account by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the account database cannot be queried.
    fn lookup_user(&self, name: &str) -> Result<Option<UserIdentity>>;
    /// The account of the effective user id.
    ///
    /// # Errors
    ///
    /// Returns an error if the account database cannot be queried.
    fn effective_user(&self) -> Result<Option<UserIdentity>>;
    /// `true` when running with root privileges.
    fn is_elevated(&self) -> bool;
}

// ── Command Runner Port ───────────────────────────────────────────────────────

/// Abstracts process execution so infrastructure can be swapped or mocked.
#[allow(async_fn_in_trait)]
pub trait CommandRunner {
    /// Run a program and capture its output.
    async fn run(&self, program: &str, args: &[&str]) -> Result<Output>;
    /// Run a program with inherited stdio and return only its exit status.
    async fn run_status(&self, program: &str, args: &[&str]) -> Result<ExitStatus>;
}

// ── Supervisor Ports ──────────────────────────────────────────────────────────

/// The process supervisor's control verbs. Implementations return the raw
/// process output; callers decide which failures matter.
#[allow(async_fn_in_trait)]
pub trait ServiceManager {
    /// Reload the supervisor's unit index.
    async fn daemon_reload(&self) -> Result<Output>;
    /// Enable a unit for automatic start.
    async fn enable(&self, unit: &str) -> Result<Output>;
    /// Disable automatic start of a unit.
    async fn disable(&self, unit: &str) -> Result<Output>;
    /// Start a unit.
    async fn start(&self, unit: &str) -> Result<Output>;
    /// Stop a unit.
    async fn stop(&self, unit: &str) -> Result<Output>;
    /// Query whether a unit is active.
    async fn is_active(&self, unit: &str) -> Result<Output>;
    /// Query whether a unit is enabled.
    async fn is_enabled(&self, unit: &str) -> Result<Output>;
    /// Print the supervisor's status view of a unit to the terminal.
    async fn show_status(&self, unit: &str) -> Result<ExitStatus>;
}

/// Unit files in the supervisor's unit directory.
pub trait UnitStore {
    /// Absolute path a unit file lives at.
    fn unit_path(&self, unit: &str) -> PathBuf;
    /// Read an installed unit, `None` if absent.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read.
    fn read(&self, unit: &str) -> Result<Option<String>>;
    /// Write a rendered definition and return its path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    fn write(&self, definition: &ServiceDefinition) -> Result<PathBuf>;
    /// Remove a unit file. Returns `false` if there was nothing to remove.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be removed.
    fn remove(&self, unit: &str) -> Result<bool>;
}

// ── Filesystem Ownership Port ─────────────────────────────────────────────────

/// Ownership and mode changes on the project tree.
pub trait OwnershipFs {
    /// `true` if `path` is a regular file. Symlinks are not followed.
    fn is_regular_file(&self, path: &Path) -> bool;
    /// `true` if `path` itself is a symbolic link.
    fn is_symlink(&self, path: &Path) -> bool;
    /// Recursively change owner and group, never following symlinks.
    ///
    /// # Errors
    ///
    /// Returns an error on the first entry that cannot be changed.
    fn chown_tree(&self, root: &Path, owner: &UserIdentity) -> Result<()>;
    /// Change owner and group of a single path.
    ///
    /// # Errors
    ///
    /// Returns an error if ownership cannot be changed.
    fn chown(&self, path: &Path, owner: &UserIdentity) -> Result<()>;
    /// Recursively grant the owner read access (and traverse on directories).
    ///
    /// # Errors
    ///
    /// Returns an error on the first entry whose mode cannot be changed.
    fn grant_owner_read_tree(&self, root: &Path) -> Result<()>;
    /// Create a directory and its parents.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created.
    fn create_dir_all(&self, path: &Path) -> Result<()>;
    /// Add permission bits to the existing mode.
    ///
    /// # Errors
    ///
    /// Returns an error if the mode cannot be read or changed.
    fn add_mode(&self, path: &Path, bits: u32) -> Result<()>;
    /// Replace the mode.
    ///
    /// # Errors
    ///
    /// Returns an error if the mode cannot be changed or `path` is a symlink.
    fn set_mode(&self, path: &Path, mode: u32) -> Result<()>;
}

// ── Progress Reporting Port ───────────────────────────────────────────────────

/// Abstracts progress reporting so services can emit events without
/// depending on the Presentation layer. Sync trait: no async needed.
pub trait ProgressReporter {
    /// Emit an in-progress step message.
    fn step(&self, message: &str);
    /// Emit a success message.
    fn success(&self, message: &str);
    /// Emit a warning message.
    fn warn(&self, message: &str);
}

// ── Confirmation Port ─────────────────────────────────────────────────────────

/// Interactive yes/no confirmation, kept out of the pipeline services.
pub trait Prompt {
    /// Ask the operator; `default` is used for an empty answer.
    ///
    /// # Errors
    ///
    /// Returns an error if the terminal cannot be read.
    fn confirm(&self, prompt: &str, default: bool) -> Result<bool>;
}
