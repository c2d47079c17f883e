//! `svcinstall uninstall`: stop, disable, and remove the unit.

use anyhow::Result;

use crate::app::{AppContext, Backends};
use crate::application::ports::{HostInspector, Prompt, ServiceManager, UnitStore};
use crate::application::services::lifecycle;
use crate::commands::{Outcome, enter, require_root};
use crate::domain::InstallStage;
use crate::output::TerminalReporter;

/// Printed when the operator declines the uninstall prompt.
pub const UNINSTALL_CANCELLED: &str = "Uninstall cancelled.";

/// Run `svcinstall uninstall`.
///
/// The project tree, its logs, and environment files are left in place.
///
/// # Errors
///
/// Returns an error if not running as root, the unit file cannot be
/// removed, or systemd cannot reload.
pub async fn run<H, M, U, F>(
    app: &AppContext,
    prompt: &impl Prompt,
    backends: &Backends<H, M, U, F>,
) -> Result<Outcome>
where
    H: HostInspector,
    M: ServiceManager,
    U: UnitStore,
{
    require_root(&backends.host, "uninstall")?;
    let unit = app.unit_name();

    if !app.output.quiet {
        println!();
        println!("This will stop and remove {unit}.");
        println!("The application directory, logs, and configuration are preserved.");
        println!();
    }
    if !prompt.confirm("Continue?", false)? {
        println!("{UNINSTALL_CANCELLED}");
        return Ok(Outcome::Cancelled);
    }

    enter(InstallStage::Uninstalling);
    let reporter = TerminalReporter::new(&app.output);
    let report =
        lifecycle::deactivate_unit(&backends.manager, &backends.units, &reporter, &unit).await?;
    enter(InstallStage::Uninstalled);

    if !report.file_removed {
        let path = backends.units.unit_path(&unit);
        app.output
            .info(&format!("No unit file was installed at {}", path.display()));
    }
    Ok(Outcome::Completed)
}
