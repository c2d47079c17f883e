//! `svcinstall install [USERNAME]`: detect, confirm, and install the service.

use std::time::Duration;

use anyhow::Result;
use clap::Args;

use crate::app::{AppContext, Backends};
use crate::application::ports::{HostInspector, OwnershipFs, Prompt, ServiceManager, UnitStore};
use crate::application::services::{detect, lifecycle, permissions};
use crate::commands::{Outcome, enter, require_root};
use crate::domain::{InstallError, InstallPlan, InstallStage, UnitTemplate, render};
use crate::output::{OutputContext, TerminalReporter, progress};

/// Printed when the operator declines the install prompt.
pub const INSTALL_CANCELLED: &str = "Installation cancelled.";

/// Arguments for the install command.
#[derive(Args, Default, Clone)]
pub struct InstallArgs {
    /// Account the service runs as (default: the invoking sudo user)
    pub username: Option<String>,
}

/// Run `svcinstall install`.
///
/// # Errors
///
/// Returns an error if not running as root, a prerequisite is missing,
/// permissions cannot be applied, or systemd fails to activate the unit.
pub async fn run<H, M, U, F>(
    app: &AppContext,
    prompt: &impl Prompt,
    backends: &Backends<H, M, U, F>,
    args: &InstallArgs,
) -> Result<Outcome>
where
    H: HostInspector,
    M: ServiceManager,
    U: UnitStore,
    F: OwnershipFs,
{
    require_root(&backends.host, "install")?;

    enter(InstallStage::Detecting);
    let plan = detect::build_plan(&backends.host, &app.config, args.username.as_deref())
        .inspect_err(abort)?;

    let template = UnitTemplate::from_config(&app.config);
    let unit = template.unit_name();
    print_plan(&app.output, &plan, &unit, backends);

    enter(InstallStage::Confirming);
    if !prompt.confirm(&format!("Install and start {unit}?"), false)? {
        println!("{INSTALL_CANCELLED}");
        tracing::info!(unit = %unit, "operator declined");
        return Ok(Outcome::Cancelled);
    }

    enter(InstallStage::Rendering);
    let definition = render(&plan, &template);

    let reporter = TerminalReporter::new(&app.output);
    enter(InstallStage::PermissionFixup);
    permissions::apply_permissions(&backends.fs, &reporter, &plan, &app.config)?;

    enter(InstallStage::Installing);
    lifecycle::activate_unit(&backends.manager, &backends.units, &reporter, &definition).await?;

    enter(InstallStage::Verifying);
    verify(
        &app.output,
        &backends.manager,
        &unit,
        Duration::from_secs(app.config.verify_delay_secs),
    )
    .await?;

    enter(InstallStage::Installed);
    print_success(&app.output, &unit);
    Ok(Outcome::Completed)
}

fn abort(err: &anyhow::Error) {
    enter(InstallStage::Aborted);
    if let Some(install) = err.downcast_ref::<InstallError>() {
        tracing::info!(category = install.category(), "detection failed");
    }
}

async fn verify(
    ctx: &OutputContext,
    manager: &impl ServiceManager,
    unit: &str,
    delay: Duration,
) -> Result<()> {
    let pb = ctx
        .show_progress()
        .then(|| progress::spinner(&format!("Waiting for {unit} to settle...")));
    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }
    let result = lifecycle::verify_active(manager, unit).await;
    if let Some(pb) = &pb {
        match &result {
            Ok(()) => progress::finish_ok(pb, &format!("{unit} is active")),
            Err(_) => progress::finish_error(pb, &format!("{unit} is not active")),
        }
    } else if result.is_ok() {
        ctx.success(&format!("{unit} is active"));
    }
    result
}

fn print_plan<H, M, U: UnitStore, F>(
    ctx: &OutputContext,
    plan: &InstallPlan,
    unit: &str,
    backends: &Backends<H, M, U, F>,
) {
    if ctx.quiet {
        return;
    }
    let user = plan.user();
    ctx.blank();
    ctx.header(&format!("Installing {unit}"));
    ctx.kv_path("Project root", plan.project_root());
    ctx.kv_path("Interpreter", plan.interpreter());
    match plan.env_file() {
        Some(env_file) => ctx.kv_path("Environment file", env_file),
        None => ctx.kv("Environment file", "(none)"),
    }
    ctx.kv("Run as", &format!("{}:{}", user.name, user.group));
    ctx.kv_path("Unit file", &backends.units.unit_path(unit));
    ctx.blank();
}

fn print_success(ctx: &OutputContext, unit: &str) {
    if ctx.quiet {
        return;
    }
    ctx.blank();
    ctx.success(&format!("{unit} installed and running."));
    ctx.kv("Status", &format!("systemctl status {unit}"));
    ctx.kv("Logs", &format!("journalctl -u {unit} -f"));
    ctx.kv("Restart", &format!("sudo systemctl restart {unit}"));
    ctx.kv("Repair", "sudo svcinstall fix");
}
