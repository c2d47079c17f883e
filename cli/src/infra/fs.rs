//! Filesystem infrastructure: implements `OwnershipFs`.

use std::os::unix::fs::PermissionsExt;
use std::path::Path;

use anyhow::{Context, Result, bail};
use nix::unistd::{Group, User};
use walkdir::WalkDir;

use crate::application::ports::OwnershipFs;
use crate::domain::UserIdentity;

/// Owner read on files.
const OWNER_READ: u32 = 0o400;
/// Owner read and traverse on directories.
const OWNER_READ_TRAVERSE: u32 = 0o500;

/// Production filesystem implementation of `OwnershipFs`.
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalFs;

impl OwnershipFs for LocalFs {
    fn is_regular_file(&self, path: &Path) -> bool {
        std::fs::symlink_metadata(path).is_ok_and(|m| m.file_type().is_file())
    }

    fn is_symlink(&self, path: &Path) -> bool {
        std::fs::symlink_metadata(path).is_ok_and(|m| m.file_type().is_symlink())
    }

    fn chown_tree(&self, root: &Path, owner: &UserIdentity) -> Result<()> {
        let (uid, gid) = resolve_ids(owner)?;
        let mut changed = 0usize;
        for entry in WalkDir::new(root).follow_links(false) {
            let entry = entry.with_context(|| format!("walking {}", root.display()))?;
            std::os::unix::fs::lchown(entry.path(), Some(uid), Some(gid))
                .with_context(|| format!("chown {}", entry.path().display()))?;
            changed += 1;
        }
        tracing::debug!(root = %root.display(), entries = changed, uid, gid, "ownership changed");
        Ok(())
    }

    fn chown(&self, path: &Path, owner: &UserIdentity) -> Result<()> {
        let (uid, gid) = resolve_ids(owner)?;
        std::os::unix::fs::lchown(path, Some(uid), Some(gid))
            .with_context(|| format!("chown {}", path.display()))
    }

    fn grant_owner_read_tree(&self, root: &Path) -> Result<()> {
        for entry in WalkDir::new(root).follow_links(false) {
            let entry = entry.with_context(|| format!("walking {}", root.display()))?;
            let file_type = entry.file_type();
            if file_type.is_symlink() {
                continue;
            }
            let bits = if file_type.is_dir() {
                OWNER_READ_TRAVERSE
            } else {
                OWNER_READ
            };
            self.add_mode(entry.path(), bits)?;
        }
        Ok(())
    }

    fn create_dir_all(&self, path: &Path) -> Result<()> {
        std::fs::create_dir_all(path)
            .with_context(|| format!("creating directory {}", path.display()))
    }

    fn add_mode(&self, path: &Path, bits: u32) -> Result<()> {
        let mode = std::fs::symlink_metadata(path)
            .with_context(|| format!("reading mode of {}", path.display()))?
            .permissions()
            .mode();
        if mode & bits == bits {
            return Ok(());
        }
        self.set_mode(path, (mode | bits) & 0o7777)
    }

    fn set_mode(&self, path: &Path, mode: u32) -> Result<()> {
        // chmod follows links, so a link would change a file outside the tree.
        if self.is_symlink(path) {
            bail!("refusing to change mode through symlink {}", path.display());
        }
        std::fs::set_permissions(path, std::fs::Permissions::from_mode(mode))
            .with_context(|| format!("setting mode {mode:04o} on {}", path.display()))
    }
}

/// Numeric uid/gid for an account. The group may be a name or a bare gid.
fn resolve_ids(owner: &UserIdentity) -> Result<(u32, u32)> {
    let Some(user) = User::from_name(&owner.name)
        .with_context(|| format!("cannot look up user '{}'", owner.name))?
    else {
        bail!("user '{}' no longer exists", owner.name);
    };
    let gid = match Group::from_name(&owner.group)
        .with_context(|| format!("cannot look up group '{}'", owner.group))?
    {
        Some(group) => group.gid.as_raw(),
        None => owner
            .group
            .parse::<u32>()
            .with_context(|| format!("group '{}' does not exist", owner.group))?,
    };
    Ok((user.uid.as_raw(), gid))
}
