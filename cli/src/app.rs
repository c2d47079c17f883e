//! Application context: unified state passed to every command handler.
//!
//! `AppContext` carries presentation and configuration state; `Backends`
//! bundles the host-facing port implementations so command handlers can be
//! driven by fakes in tests.

use std::io::{BufRead, IsTerminal, Write};

use anyhow::Result;

use crate::application::ports::{HostInspector, OwnershipFs, Prompt, ServiceManager, UnitStore};
use crate::domain::InstallerConfig;
use crate::infra::command_runner::TokioCommandRunner;
use crate::infra::fs::LocalFs;
use crate::infra::host::LocalHost;
use crate::infra::systemd::{SystemdManager, UnitDir};
use crate::output::OutputContext;

/// Flags passed from the top-level CLI to `AppContext::new`.
pub struct AppFlags {
    /// Disable ANSI color output.
    pub no_color: bool,
    /// Suppress non-error output.
    pub quiet: bool,
    /// Answer yes to every confirmation prompt.
    pub yes: bool,
}

/// Unified application context passed to every command handler.
pub struct AppContext {
    /// Terminal output context (colors, quiet mode).
    pub output: OutputContext,
    /// Loaded installer configuration.
    pub config: InstallerConfig,
    /// When `true`, confirmation prompts are answered with yes.
    pub assume_yes: bool,
}

impl AppContext {
    /// Construct an `AppContext` from top-level CLI flags.
    #[must_use]
    pub fn new(flags: &AppFlags, config: InstallerConfig) -> Self {
        Self {
            output: OutputContext::new(flags.no_color, flags.quiet),
            config,
            assume_yes: flags.yes,
        }
    }

    /// Unit file name of the configured service.
    #[must_use]
    pub fn unit_name(&self) -> String {
        self.config.unit_name()
    }
}

impl Prompt for AppContext {
    /// Ask the user for confirmation.
    ///
    /// When `assume_yes` is set (`--yes` or `SVCINSTALL_YES`), returns `true`
    /// without prompting.
    fn confirm(&self, prompt: &str, default: bool) -> Result<bool> {
        if self.assume_yes {
            return Ok(true);
        }
        if !std::io::stdin().is_terminal() {
            return read_answer(prompt, default);
        }
        let confirmed = dialoguer::Confirm::new()
            .with_prompt(prompt)
            .default(default)
            .interact()?;
        Ok(confirmed)
    }
}

/// Line-based fallback for piped stdin. End of input takes the default.
fn read_answer(prompt: &str, default: bool) -> Result<bool> {
    let hint = if default { "[Y/n]" } else { "[y/N]" };
    eprint!("{prompt} {hint}: ");
    std::io::stderr().flush()?;
    parse_answer(&mut std::io::stdin().lock(), default)
}

/// Read one line from `input` and interpret it as a yes/no answer.
/// Empty input and end of input take `default`; anything other than
/// `y` or `yes` (any case) is a no.
fn parse_answer(input: &mut impl BufRead, default: bool) -> Result<bool> {
    let mut line = String::new();
    let n = input.read_line(&mut line)?;
    let answer = line.trim();
    if n == 0 || answer.is_empty() {
        return Ok(default);
    }
    Ok(answer.eq_ignore_ascii_case("y") || answer.eq_ignore_ascii_case("yes"))
}

/// Host-facing port implementations used by command handlers.
pub struct Backends<H, M, U, F> {
    pub host: H,
    pub manager: M,
    pub units: U,
    pub fs: F,
}

/// Production backends.
pub type LocalBackends = Backends<LocalHost, SystemdManager<TokioCommandRunner>, UnitDir, LocalFs>;

impl LocalBackends {
    /// Wire the production implementations for `config`.
    #[must_use]
    pub fn local(config: &InstallerConfig) -> Self {
        Self {
            host: LocalHost,
            manager: SystemdManager::new(TokioCommandRunner),
            units: UnitDir::new(config.paths.unit_dir.clone()),
            fs: LocalFs,
        }
    }
}

impl<H, M, U, F> Backends<H, M, U, F>
where
    H: HostInspector,
    M: ServiceManager,
    U: UnitStore,
    F: OwnershipFs,
{
    /// Bundle arbitrary port implementations.
    pub fn new(host: H, manager: M, units: U, fs: F) -> Self {
        Self {
            host,
            manager,
            units,
            fs,
        }
    }
}
