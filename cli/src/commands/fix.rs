//! `svcinstall fix`: remove the installed unit and install it again.

use anyhow::Result;

use crate::app::{AppContext, Backends};
use crate::application::ports::{HostInspector, OwnershipFs, Prompt, ServiceManager, UnitStore};
use crate::application::services::lifecycle;
use crate::commands::install::{self, InstallArgs};
use crate::commands::{Outcome, enter, require_root};
use crate::domain::{InstallStage, parse_unit};
use crate::output::TerminalReporter;

/// Run `svcinstall fix`.
///
/// Tears the unit down without asking, then hands over to the install
/// pipeline, which still asks before changing anything. The account named
/// in the old unit is kept when it still exists.
///
/// # Errors
///
/// Returns an error if not running as root, the old unit cannot be removed,
/// or the reinstall fails.
pub async fn run<H, M, U, F>(
    app: &AppContext,
    prompt: &impl Prompt,
    backends: &Backends<H, M, U, F>,
) -> Result<Outcome>
where
    H: HostInspector,
    M: ServiceManager,
    U: UnitStore,
    F: OwnershipFs,
{
    require_root(&backends.host, "fix")?;
    let unit = app.unit_name();

    let username = previous_user(backends, &unit)?;

    if !app.output.quiet {
        app.output.header(&format!("Repairing {unit}"));
    }
    enter(InstallStage::Uninstalling);
    let reporter = TerminalReporter::new(&app.output);
    lifecycle::deactivate_unit(&backends.manager, &backends.units, &reporter, &unit).await?;
    enter(InstallStage::Uninstalled);

    install::run(app, prompt, backends, &InstallArgs { username }).await
}

/// `User=` of the installed unit, if it still names an existing account.
fn previous_user<H: HostInspector, M, U: UnitStore, F>(
    backends: &Backends<H, M, U, F>,
    unit: &str,
) -> Result<Option<String>> {
    let Some(content) = backends.units.read(unit)? else {
        return Ok(None);
    };
    let Some(name) = parse_unit(&content).user else {
        return Ok(None);
    };
    if backends.host.lookup_user(&name)?.is_some() {
        tracing::debug!(user = %name, "keeping account from installed unit");
        Ok(Some(name))
    } else {
        tracing::warn!(user = %name, "account from installed unit no longer exists");
        Ok(None)
    }
}
