//! Terminal presentation: styled lines, key/value rows, spinners.

pub mod progress;
pub mod reporter;
pub mod styles;

use std::path::Path;

use console::Term;
use owo_colors::OwoColorize as _;
pub use reporter::TerminalReporter;
pub use styles::Styles;

/// Width of the key column in [`OutputContext::kv`] rows.
const KEY_WIDTH: usize = 18;

/// Where and how to print.
pub struct OutputContext {
    pub styles: Styles,
    /// stdout is a terminal.
    pub is_tty: bool,
    /// Only errors are printed.
    pub quiet: bool,
}

impl OutputContext {
    /// Colours are used only on a terminal, and never with `--no-color` or
    /// `NO_COLOR`.
    #[must_use]
    pub fn new(no_color: bool, quiet: bool) -> Self {
        let is_tty = Term::stdout().is_term();
        let mut styles = Styles::default();
        if !no_color && is_tty && std::env::var_os("NO_COLOR").is_none() {
            styles.enable();
        }
        Self {
            styles,
            is_tty,
            quiet,
        }
    }

    /// Spinners need a terminal and would be noise in quiet mode.
    #[must_use]
    pub fn show_progress(&self) -> bool {
        self.is_tty && !self.quiet
    }

    pub fn success(&self, msg: &str) {
        if !self.quiet {
            println!("  {} {msg}", "✓".style(self.styles.ok));
        }
    }

    pub fn info(&self, msg: &str) {
        if !self.quiet {
            println!("  {} {msg}", "ℹ".style(self.styles.note));
        }
    }

    pub fn header(&self, msg: &str) {
        if !self.quiet {
            println!("  {}", msg.style(self.styles.title));
        }
    }

    /// `key  value` with the key padded and dimmed.
    pub fn kv(&self, key: &str, value: &str) {
        if !self.quiet {
            println!("  {}  {value}", pad(key).style(self.styles.muted));
        }
    }

    /// Like [`kv`](Self::kv) for a filesystem path.
    pub fn kv_path(&self, key: &str, path: &Path) {
        if !self.quiet {
            println!(
                "  {}  {}",
                pad(key).style(self.styles.muted),
                path.display().style(self.styles.path)
            );
        }
    }

    /// Like [`kv`](Self::kv) for a systemd state word, coloured by meaning.
    pub fn kv_state(&self, key: &str, state: &str) {
        if !self.quiet {
            println!(
                "  {}  {}",
                pad(key).style(self.styles.muted),
                state.style(self.styles.for_state(state))
            );
        }
    }

    pub fn blank(&self) {
        if !self.quiet {
            println!();
        }
    }
}

fn pad(key: &str) -> String {
    format!("{key:<KEY_WIDTH$}")
}
