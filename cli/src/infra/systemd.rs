//! systemd implementations of the supervisor ports.
//!
//! `SystemdManager` drives `systemctl` through a `CommandRunner`; `UnitDir`
//! reads and writes unit files under the configured unit directory.

use std::path::{Path, PathBuf};
use std::process::{ExitStatus, Output};

use anyhow::{Context, Result};

use crate::application::ports::{CommandRunner, ServiceManager, UnitStore};
use crate::domain::ServiceDefinition;

const SYSTEMCTL: &str = "systemctl";

/// Mode of written unit files.
const UNIT_FILE_MODE: u32 = 0o644;

/// `ServiceManager` backed by `systemctl`.
pub struct SystemdManager<R: CommandRunner> {
    runner: R,
}

impl<R: CommandRunner> SystemdManager<R> {
    pub fn new(runner: R) -> Self {
        Self { runner }
    }
}

impl<R: CommandRunner> ServiceManager for SystemdManager<R> {
    async fn daemon_reload(&self) -> Result<Output> {
        self.runner.run(SYSTEMCTL, &["daemon-reload"]).await
    }

    async fn enable(&self, unit: &str) -> Result<Output> {
        self.runner.run(SYSTEMCTL, &["enable", unit]).await
    }

    async fn disable(&self, unit: &str) -> Result<Output> {
        self.runner.run(SYSTEMCTL, &["disable", unit]).await
    }

    async fn start(&self, unit: &str) -> Result<Output> {
        self.runner.run(SYSTEMCTL, &["start", unit]).await
    }

    async fn stop(&self, unit: &str) -> Result<Output> {
        self.runner.run(SYSTEMCTL, &["stop", unit]).await
    }

    async fn is_active(&self, unit: &str) -> Result<Output> {
        self.runner.run(SYSTEMCTL, &["is-active", unit]).await
    }

    async fn is_enabled(&self, unit: &str) -> Result<Output> {
        self.runner.run(SYSTEMCTL, &["is-enabled", unit]).await
    }

    async fn show_status(&self, unit: &str) -> Result<ExitStatus> {
        self.runner
            .run_status(SYSTEMCTL, &["status", "--no-pager", unit])
            .await
    }
}

/// `UnitStore` over a unit directory such as `/etc/systemd/system`.
pub struct UnitDir {
    dir: PathBuf,
}

impl UnitDir {
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl UnitStore for UnitDir {
    fn unit_path(&self, unit: &str) -> PathBuf {
        self.dir.join(unit)
    }

    fn read(&self, unit: &str) -> Result<Option<String>> {
        let path = self.unit_path(unit);
        match std::fs::read_to_string(&path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e).with_context(|| format!("cannot read {}", path.display())),
        }
    }

    fn write(&self, definition: &ServiceDefinition) -> Result<PathBuf> {
        let path = self.unit_path(definition.unit_name());
        std::fs::create_dir_all(&self.dir)
            .with_context(|| format!("cannot create {}", self.dir.display()))?;
        std::fs::write(&path, definition.content())
            .with_context(|| format!("cannot write {}", path.display()))?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(&path, std::fs::Permissions::from_mode(UNIT_FILE_MODE))
                .with_context(|| format!("cannot set permissions on {}", path.display()))?;
        }
        Ok(path)
    }

    fn remove(&self, unit: &str) -> Result<bool> {
        let path = self.unit_path(unit);
        match std::fs::remove_file(&path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e).with_context(|| format!("cannot remove {}", path.display())),
        }
    }
}
