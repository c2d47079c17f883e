//! Production `HostInspector`: the live filesystem, `PATH`, and the
//! account database.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use nix::unistd::{Gid, Group, Uid, User};

use crate::application::ports::HostInspector;
use crate::domain::UserIdentity;

/// Inspects the machine the installer runs on.
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalHost;

impl HostInspector for LocalHost {
    fn installer_dir(&self) -> Option<PathBuf> {
        std::env::current_exe()
            .ok()
            .and_then(|exe| exe.canonicalize().ok())
            .and_then(|exe| exe.parent().map(Path::to_path_buf))
    }

    fn current_dir(&self) -> Option<PathBuf> {
        std::env::current_dir().ok()
    }

    fn home_dir(&self) -> Option<PathBuf> {
        dirs::home_dir()
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn is_file(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn find_executable(&self, name: &str) -> Option<PathBuf> {
        which::which(name).ok()
    }

    fn env_var(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }

    fn lookup_user(&self, name: &str) -> Result<Option<UserIdentity>> {
        let user = User::from_name(name).with_context(|| format!("cannot look up user '{name}'"))?;
        user.map(identity).transpose()
    }

    fn effective_user(&self) -> Result<Option<UserIdentity>> {
        let uid = Uid::effective();
        let user = User::from_uid(uid).with_context(|| format!("cannot look up uid {uid}"))?;
        user.map(identity).transpose()
    }

    fn is_elevated(&self) -> bool {
        Uid::effective().is_root()
    }
}

fn identity(user: User) -> Result<UserIdentity> {
    let group = group_name(user.gid)?;
    Ok(UserIdentity {
        name: user.name,
        home: user.dir,
        group,
    })
}

/// Primary group name; falls back to the numeric gid when the group has no
/// entry, which `chown user:<gid>` and systemd's `Group=` both accept.
fn group_name(gid: Gid) -> Result<String> {
    let group = Group::from_gid(gid).with_context(|| format!("cannot look up gid {gid}"))?;
    Ok(group.map_or_else(|| gid.to_string(), |g| g.name))
}
