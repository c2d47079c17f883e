//! Structural tests for architectural boundary enforcement.
//!
//! These tests scan source files to verify that the layer boundaries hold:
//! domain is pure, application talks to the host only through ports, and
//! infra never prints.

use std::path::{Path, PathBuf};

/// Collect all `.rs` files under a directory recursively.
fn collect_rs_files(dir: &Path) -> Vec<PathBuf> {
    let mut files = Vec::new();
    if let Ok(entries) = std::fs::read_dir(dir) {
        for entry in entries.flatten() {
            let path = entry.path();
            if path.is_dir() {
                files.extend(collect_rs_files(&path));
            } else if path.extension().and_then(|e| e.to_str()) == Some("rs") {
                files.push(path);
            }
        }
    }
    files
}

/// Track brace depth and return whether a line is inside a `#[cfg(test)]` block.
struct CfgTestTracker {
    in_test_block: bool,
    brace_depth: i32,
    test_block_start_depth: i32,
}

impl CfgTestTracker {
    fn new() -> Self {
        Self {
            in_test_block: false,
            brace_depth: 0,
            test_block_start_depth: 0,
        }
    }

    /// Process a line and return `true` if it's inside a `#[cfg(test)]` block.
    fn process_line(&mut self, line: &str) -> bool {
        if line.trim().contains("#[cfg(test)]") {
            self.in_test_block = true;
            self.test_block_start_depth = self.brace_depth;
        }
        for ch in line.chars() {
            match ch {
                '{' => self.brace_depth += 1,
                '}' => {
                    self.brace_depth -= 1;
                    if self.in_test_block && self.brace_depth <= self.test_block_start_depth {
                        self.in_test_block = false;
                    }
                }
                _ => {}
            }
        }
        self.in_test_block
    }
}

fn src_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("src")
}

/// Every production line in `dir` containing one of `forbidden`, as
/// `file:line: text` entries.
fn scan(dir: &Path, forbidden: &[&str]) -> Vec<String> {
    let mut violations = Vec::new();
    for file in collect_rs_files(dir) {
        let rel = file
            .strip_prefix(env!("CARGO_MANIFEST_DIR"))
            .unwrap_or(&file)
            .display()
            .to_string();
        let Ok(content) = std::fs::read_to_string(&file) else {
            continue;
        };
        let mut tracker = CfgTestTracker::new();
        for (i, line) in content.lines().enumerate() {
            let in_test = tracker.process_line(line);
            let trimmed = line.trim();
            if in_test || trimmed.starts_with("//") {
                continue;
            }
            for pattern in forbidden {
                if line.contains(pattern) {
                    violations.push(format!("{rel}:{}: `{pattern}`: {trimmed}", i + 1));
                }
            }
        }
    }
    violations
}

// ── Domain purity ─────────────────────────────────────────────────────────────

#[test]
fn domain_has_no_io_or_outer_layer_imports() {
    let violations = scan(
        &src_dir().join("domain"),
        &[
            "crate::infra",
            "crate::application",
            "crate::commands",
            "crate::output",
            "tokio",
            "std::fs",
            "std::process",
            "std::net",
        ],
    );
    assert!(
        violations.is_empty(),
        "domain/ must stay free of I/O and outer layers:\n{}",
        violations.join("\n")
    );
}

// ── Application talks to the host only through ports ──────────────────────────

#[test]
fn application_has_no_infra_or_presentation_imports() {
    let violations = scan(
        &src_dir().join("application"),
        &[
            "crate::infra",
            "crate::commands",
            "crate::output",
            "std::fs",
            "std::process::Command",
            "tokio::process",
        ],
    );
    assert!(
        violations.is_empty(),
        "application/ must reach the host through ports only:\n{}",
        violations.join("\n")
    );
}

#[test]
fn no_concrete_adapters_in_service_signatures() {
    let concrete = ["LocalHost", "LocalFs", "SystemdManager", "UnitDir", "TokioCommandRunner"];
    let violations: Vec<String> = scan(&src_dir().join("application"), &concrete);
    assert!(
        violations.is_empty(),
        "application/ must use trait bounds, not concrete adapters:\n{}",
        violations.join("\n")
    );
}

// ── Infra stays silent ────────────────────────────────────────────────────────

#[test]
fn infra_has_no_imports_from_commands_or_output() {
    let violations = scan(&src_dir().join("infra"), &["crate::commands", "crate::output"]);
    assert!(
        violations.is_empty(),
        "infra/ must not import from commands/ or output/:\n{}",
        violations.join("\n")
    );
}

#[test]
fn infra_has_no_print_macros_outside_tests() {
    let violations = scan(&src_dir().join("infra"), &["println!", "eprintln!", "print!"]);
    assert!(
        violations.is_empty(),
        "infra/ must not print outside #[cfg(test)]:\n{}",
        violations.join("\n")
    );
}

// ── Adapters are wired in one place ───────────────────────────────────────────

#[test]
fn systemctl_is_only_invoked_from_infra() {
    let mut violations = Vec::new();
    for dir in ["application", "commands", "domain", "output"] {
        violations.extend(scan(&src_dir().join(dir), &["\"systemctl\""]));
    }
    assert!(
        violations.is_empty(),
        "systemctl must only be spawned by infra/systemd.rs:\n{}",
        violations.join("\n")
    );
}
