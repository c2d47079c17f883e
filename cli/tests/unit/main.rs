//! Unit tests for the svcinstall CLI
//!
//! These tests use fake ports and run fast without touching the host.

mod architecture;
mod permissions_service;
mod status_command;
