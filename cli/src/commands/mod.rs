//! Command implementations

pub mod fix;
pub mod install;
pub mod render;
pub mod status;
pub mod uninstall;

use anyhow::Result;

use crate::application::ports::HostInspector;
use crate::domain::{InstallError, InstallStage};

/// How a mutating command ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The command ran to completion.
    Completed,
    /// The operator declined the confirmation prompt; nothing was changed.
    Cancelled,
}

/// Refuse to continue without root privileges.
///
/// # Errors
///
/// Returns [`InstallError::NotElevated`] when not running as root.
pub fn require_root(host: &impl HostInspector, command: &str) -> Result<()> {
    if host.is_elevated() {
        Ok(())
    } else {
        Err(InstallError::NotElevated {
            command: command.to_string(),
        }
        .into())
    }
}

/// Record a pipeline stage transition.
pub(crate) fn enter(stage: InstallStage) {
    tracing::info!(stage = %stage, "stage");
}
