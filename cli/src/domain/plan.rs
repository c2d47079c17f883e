//! Install plan: the resolved inputs for rendering a unit definition.

use std::fmt;
use std::path::{Path, PathBuf};

use anyhow::{Result, ensure};

/// OS account the service runs as.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserIdentity {
    pub name: String,
    pub home: PathBuf,
    pub group: String,
}

/// Resolved configuration needed to render a service definition.
///
/// Built once per run from host inspection and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallPlan {
    project_root: PathBuf,
    interpreter: PathBuf,
    env_file: Option<PathBuf>,
    user: UserIdentity,
}

impl InstallPlan {
    /// Assemble a plan from detected values.
    ///
    /// # Errors
    ///
    /// Returns an error if a path is empty or relative, or the account
    /// name or group is empty.
    pub fn new(
        project_root: PathBuf,
        interpreter: PathBuf,
        env_file: Option<PathBuf>,
        user: UserIdentity,
    ) -> Result<Self> {
        ensure!(
            project_root.is_absolute(),
            "project root must be an absolute path, got '{}'",
            project_root.display()
        );
        ensure!(
            interpreter.is_absolute(),
            "interpreter must be an absolute path, got '{}'",
            interpreter.display()
        );
        if let Some(env) = &env_file {
            ensure!(
                env.is_absolute(),
                "environment file must be an absolute path, got '{}'",
                env.display()
            );
        }
        ensure!(!user.name.is_empty(), "service account name is empty");
        ensure!(!user.group.is_empty(), "service account group is empty");
        Ok(Self {
            project_root,
            interpreter,
            env_file,
            user,
        })
    }

    #[must_use]
    pub fn project_root(&self) -> &Path {
        &self.project_root
    }

    #[must_use]
    pub fn interpreter(&self) -> &Path {
        &self.interpreter
    }

    #[must_use]
    pub fn env_file(&self) -> Option<&Path> {
        self.env_file.as_deref()
    }

    #[must_use]
    pub fn user(&self) -> &UserIdentity {
        &self.user
    }

    /// Absolute log directory for a log dir relative to the project root.
    #[must_use]
    pub fn log_dir(&self, relative: &Path) -> PathBuf {
        self.project_root.join(relative)
    }
}

// ── Install stages ───────────────────────────────────────────────────────────

/// Progress of a single install or repair run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallStage {
    Uninstalled,
    Detecting,
    Confirming,
    Rendering,
    PermissionFixup,
    Installing,
    Verifying,
    Installed,
    Uninstalling,
    Aborted,
}

impl fmt::Display for InstallStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Uninstalled => "uninstalled",
            Self::Detecting => "detecting",
            Self::Confirming => "confirming",
            Self::Rendering => "rendering",
            Self::PermissionFixup => "permission-fixup",
            Self::Installing => "installing",
            Self::Verifying => "verifying",
            Self::Installed => "installed",
            Self::Uninstalling => "uninstalling",
            Self::Aborted => "aborted",
        };
        f.write_str(name)
    }
}
