//! `svcinstall render [USERNAME]`: print the unit that `install` would write.

use anyhow::Result;
use clap::Args;

use crate::app::AppContext;
use crate::application::ports::HostInspector;
use crate::application::services::detect;
use crate::domain::{UnitTemplate, render};

/// Arguments for the render command.
#[derive(Args, Default)]
pub struct RenderArgs {
    /// Account the service runs as (default: the invoking sudo user)
    pub username: Option<String>,
}

/// Run `svcinstall render`. Needs no privileges and writes nothing.
///
/// # Errors
///
/// Returns an error if a prerequisite (project root, interpreter, account)
/// cannot be detected.
pub fn run(app: &AppContext, host: &impl HostInspector, args: &RenderArgs) -> Result<()> {
    let plan = detect::build_plan(host, &app.config, args.username.as_deref())?;
    let definition = render(&plan, &UnitTemplate::from_config(&app.config));
    print!("{}", definition.content());
    Ok(())
}
