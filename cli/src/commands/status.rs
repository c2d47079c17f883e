//! `svcinstall status`: show what is installed and what systemd thinks of it.

use anyhow::Result;
use clap::Args;

use crate::app::{AppContext, Backends};
use crate::application::ports::{ServiceManager, UnitStore};
use crate::domain::parse_unit;

/// Arguments for the status command.
#[derive(Args, Default)]
pub struct StatusArgs {
    /// Also print `systemctl status` output
    #[arg(long)]
    pub full: bool,
}

/// Run `svcinstall status`.
///
/// # Errors
///
/// Returns an error if the installed unit file cannot be read.
pub async fn run<H, M, U, F>(
    app: &AppContext,
    backends: &Backends<H, M, U, F>,
    args: &StatusArgs,
) -> Result<()>
where
    M: ServiceManager,
    U: UnitStore,
{
    let ctx = &app.output;
    let unit = app.unit_name();
    let path = backends.units.unit_path(&unit);

    let Some(content) = backends.units.read(&unit)? else {
        ctx.info(&format!("{unit} is not installed ({} not found).", path.display()));
        ctx.kv("Install", "sudo svcinstall install");
        return Ok(());
    };

    let summary = parse_unit(&content);
    let or_unset = |v: Option<String>| v.unwrap_or_else(|| "(unset)".to_string());

    ctx.header(&unit);
    ctx.kv_path("Unit file", &path);
    ctx.kv(
        "Project root",
        &or_unset(summary.working_directory.as_ref().map(|p| p.display().to_string())),
    );
    ctx.kv(
        "Interpreter",
        &or_unset(summary.interpreter().map(|p| p.display().to_string())),
    );
    ctx.kv("Command", &summary.exec_start.join(" "));
    ctx.kv(
        "Run as",
        &format!(
            "{}:{}",
            or_unset(summary.user.clone()),
            or_unset(summary.group.clone())
        ),
    );
    ctx.kv(
        "Environment file",
        &summary
            .environment_file
            .as_ref()
            .map_or_else(|| "(none)".to_string(), |p| p.display().to_string()),
    );
    ctx.kv_state("Active", &query(backends.manager.is_active(&unit).await));
    ctx.kv_state("Enabled", &query(backends.manager.is_enabled(&unit).await));
    ctx.kv("Logs", &format!("journalctl -u {unit} -f"));

    if args.full {
        println!();
        backends.manager.show_status(&unit).await?;
    }
    Ok(())
}

/// First line of a `systemctl is-*` answer; these exit non-zero for
/// "inactive"/"disabled", so the text matters more than the status.
fn query(result: Result<std::process::Output>) -> String {
    match result {
        Ok(output) => {
            let text = String::from_utf8_lossy(&output.stdout);
            text.lines()
                .next()
                .map(str::trim)
                .filter(|l| !l.is_empty())
                .unwrap_or("unknown")
                .to_string()
        }
        Err(e) => {
            tracing::debug!(error = %e, "systemctl query failed");
            "unknown".to_string()
        }
    }
}
