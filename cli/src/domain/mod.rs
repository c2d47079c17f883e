//! Domain layer: pure business logic, types, and validation.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`,
//! `crate::application`, `tokio`, `std::fs`, `std::process`, or `std::net`.
//! All functions are synchronous and take data in, returning data out.

pub mod config;
pub mod error;
pub mod plan;
pub mod unit;

pub use config::{InstallerConfig, LaunchMode};
pub use error::{ConfigError, InstallError};
pub use plan::{InstallPlan, InstallStage, UserIdentity};
pub use unit::{ServiceDefinition, UnitSummary, UnitTemplate, parse_unit, render};
