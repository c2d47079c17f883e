//! Spinner shown while waiting on systemd.

#![allow(clippy::expect_used)] // templates below are constants

use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

const RUNNING: &str = "  {spinner:.cyan} {msg}";
const DONE: &str = "  {prefix} {msg}";
const FRAMES: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", " "];

#[must_use]
pub fn spinner(msg: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .tick_strings(FRAMES)
            .template(RUNNING)
            .expect("valid template"),
    );
    pb.set_message(msg.to_string());
    pb.enable_steady_tick(Duration::from_millis(80));
    pb
}

pub fn finish_ok(pb: &ProgressBar, msg: &str) {
    finish(pb, "✓", msg);
}

pub fn finish_error(pb: &ProgressBar, msg: &str) {
    finish(pb, "✗", msg);
}

fn finish(pb: &ProgressBar, mark: &'static str, msg: &str) {
    pb.set_style(
        ProgressStyle::default_spinner()
            .template(DONE)
            .expect("valid template"),
    );
    pb.set_prefix(mark);
    pb.finish_with_message(msg.to_string());
}
