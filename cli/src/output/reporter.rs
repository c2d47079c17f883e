//! [`ProgressReporter`] for the terminal.
//!
//! Steps are numbered in the order they are reported, so an operator can
//! tell how far a failed install got.

use std::cell::Cell;

use owo_colors::OwoColorize as _;

use crate::application::ports::ProgressReporter;
use crate::output::OutputContext;

pub struct TerminalReporter<'a> {
    ctx: &'a OutputContext,
    steps: Cell<u32>,
}

impl<'a> TerminalReporter<'a> {
    #[must_use]
    pub fn new(ctx: &'a OutputContext) -> Self {
        Self {
            ctx,
            steps: Cell::new(0),
        }
    }

    /// Number of steps reported so far.
    #[must_use]
    pub fn steps(&self) -> u32 {
        self.steps.get()
    }
}

impl ProgressReporter for TerminalReporter<'_> {
    fn step(&self, message: &str) {
        let n = self.steps.get() + 1;
        self.steps.set(n);
        tracing::debug!(step = n, "{message}");
        if !self.ctx.quiet {
            let label = format!("{n:>2}.");
            println!("  {} {message}", label.style(self.ctx.styles.muted));
        }
    }

    fn success(&self, message: &str) {
        if !self.ctx.quiet {
            println!("  {} {message}", "✓".style(self.ctx.styles.ok));
        }
    }

    fn warn(&self, message: &str) {
        tracing::warn!("{message}");
        if !self.ctx.quiet {
            eprintln!("  {} {message}", "!".style(self.ctx.styles.caution));
        }
    }
}
