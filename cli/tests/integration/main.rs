//! Integration tests for the svcinstall CLI
//!
//! These tests spawn the actual binary and test end-to-end behavior. None of
//! them needs root or a running systemd.

mod cli_tests;
mod render_command;
