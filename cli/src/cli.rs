//! CLI argument parsing with clap derive

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::app::{AppContext, AppFlags, LocalBackends};
use crate::commands;
use crate::infra::config::YamlConfigStore;

/// Install the stock analysis web service as a systemd unit
#[derive(Parser)]
#[command(
    name = "svcinstall",
    version,
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Answer yes to confirmation prompts
    #[arg(short, long, global = true, env = "SVCINSTALL_YES")]
    pub yes: bool,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true, env = "NO_COLOR", value_parser = clap::builder::FalseyValueParser::new())]
    pub no_color: bool,

    /// Installer configuration file [default: /etc/svcinstall/config.yaml]
    #[arg(long, global = true, env = "SVCINSTALL_CONFIG", value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Detect the environment and install the systemd unit
    Install(commands::install::InstallArgs),

    /// Remove the unit and install it again from scratch
    Fix,

    /// Stop, disable, and remove the unit
    Uninstall,

    /// Print the unit that would be installed
    Render(commands::render::RenderArgs),

    /// Show the installed unit and its state
    Status(commands::status::StatusArgs),
}

impl Cli {
    /// Execute the CLI command.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or the command fails.
    pub async fn run(self) -> Result<()> {
        let Cli {
            yes,
            quiet,
            no_color,
            config,
            command,
        } = self;

        let config = YamlConfigStore::new(config).load()?;
        let backends = LocalBackends::local(&config);
        let app = AppContext::new(
            &AppFlags {
                no_color,
                quiet,
                yes,
            },
            config,
        );

        match command {
            Command::Install(args) => {
                commands::install::run(&app, &app, &backends, &args).await?;
            }
            Command::Fix => {
                commands::fix::run(&app, &app, &backends).await?;
            }
            Command::Uninstall => {
                commands::uninstall::run(&app, &app, &backends).await?;
            }
            Command::Render(args) => commands::render::run(&app, &backends.host, &args)?,
            Command::Status(args) => commands::status::run(&app, &backends, &args).await?,
        }
        Ok(())
    }
}
