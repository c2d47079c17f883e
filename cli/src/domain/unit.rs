//! Unit definition rendering and parsing.
//!
//! Pure functions only: the rendered text is written to disk by the
//! application layer through the `UnitStore` port.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use crate::domain::config::{InstallerConfig, LaunchMode};
use crate::domain::plan::InstallPlan;

/// Search path exported to the service process.
pub const SERVICE_PATH: &str = "/usr/local/bin:/usr/bin:/bin";

/// Seconds systemd waits after `SIGTERM` before killing the process.
pub const STOP_TIMEOUT_SECS: u32 = 30;
/// Delay before an automatic restart.
pub const RESTART_DELAY_SECS: u32 = 10;
/// Restart budget: at most `START_LIMIT_BURST` starts per interval.
pub const START_LIMIT_INTERVAL_SECS: u32 = 300;
pub const START_LIMIT_BURST: u32 = 5;

/// Fixed parts of the unit that do not come from host inspection.
#[derive(Debug, Clone)]
pub struct UnitTemplate {
    pub service_name: String,
    pub description: String,
    pub entry_file: String,
    pub launch_mode: LaunchMode,
    pub log_dir: PathBuf,
}

impl UnitTemplate {
    #[must_use]
    pub fn from_config(config: &InstallerConfig) -> Self {
        Self {
            service_name: config.service.name.clone(),
            description: config.service.description.clone(),
            entry_file: config.service.entry_file.clone(),
            launch_mode: config.service.launch_mode,
            log_dir: config.paths.log_dir.clone(),
        }
    }

    #[must_use]
    pub fn unit_name(&self) -> String {
        format!("{}.service", self.service_name)
    }
}

/// A rendered unit file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceDefinition {
    unit_name: String,
    content: String,
}

impl ServiceDefinition {
    #[must_use]
    pub fn unit_name(&self) -> &str {
        &self.unit_name
    }

    #[must_use]
    pub fn content(&self) -> &str {
        &self.content
    }
}

/// Render the unit definition for `plan`.
#[must_use]
pub fn render(plan: &InstallPlan, template: &UnitTemplate) -> ServiceDefinition {
    let root = plan.project_root();
    let user = plan.user();
    let entry = root.join(&template.entry_file);

    let mut exec = vec![path_str(plan.interpreter()), path_str(&entry)];
    exec.extend(template.launch_mode.args().iter().map(ToString::to_string));
    let exec_start = exec
        .iter()
        .map(|a| quote_arg(a))
        .collect::<Vec<_>>()
        .join(" ");

    let writable = [plan.log_dir(&template.log_dir), root.to_path_buf()]
        .iter()
        .map(|p| quote_word(&escape_specifiers(&path_str(p))))
        .collect::<Vec<_>>()
        .join(" ");

    let mut s = String::new();
    // Writing to a String cannot fail.
    let _ = writeln!(s, "[Unit]");
    let _ = writeln!(s, "Description={}", escape_specifiers(&template.description));
    let _ = writeln!(s, "After=network.target");
    let _ = writeln!(s, "StartLimitIntervalSec={START_LIMIT_INTERVAL_SECS}");
    let _ = writeln!(s, "StartLimitBurst={START_LIMIT_BURST}");
    let _ = writeln!(s);
    let _ = writeln!(s, "[Service]");
    let _ = writeln!(s, "Type=simple");
    let _ = writeln!(s, "User={}", user.name);
    let _ = writeln!(s, "Group={}", user.group);
    let _ = writeln!(s, "WorkingDirectory={}", escape_specifiers(&path_str(root)));
    let _ = writeln!(s, "Environment=\"PATH={SERVICE_PATH}\"");
    let _ = writeln!(s, "Environment=\"PYTHONUNBUFFERED=1\"");
    if let Some(env_file) = plan.env_file() {
        let _ = writeln!(s, "EnvironmentFile={}", escape_specifiers(&path_str(env_file)));
    }
    let _ = writeln!(s, "ExecStart={exec_start}");
    let _ = writeln!(s, "KillSignal=SIGTERM");
    let _ = writeln!(s, "TimeoutStopSec={STOP_TIMEOUT_SECS}");
    let _ = writeln!(s, "Restart=always");
    let _ = writeln!(s, "RestartSec={RESTART_DELAY_SECS}");
    let _ = writeln!(s, "StandardOutput=journal");
    let _ = writeln!(s, "StandardError=journal");
    let _ = writeln!(s, "SyslogIdentifier={}", template.service_name);
    let _ = writeln!(s, "PrivateTmp=true");
    let _ = writeln!(s, "ProtectSystem=strict");
    let _ = writeln!(s, "ProtectHome=read-only");
    let _ = writeln!(s, "ReadWritePaths={writable}");
    let _ = writeln!(s);
    let _ = writeln!(s, "[Install]");
    let _ = writeln!(s, "WantedBy=multi-user.target");

    ServiceDefinition {
        unit_name: template.unit_name(),
        content: s,
    }
}

// ── Parsing ──────────────────────────────────────────────────────────────────

/// Fields recovered from a rendered unit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UnitSummary {
    pub description: Option<String>,
    pub working_directory: Option<PathBuf>,
    pub exec_start: Vec<String>,
    pub user: Option<String>,
    pub group: Option<String>,
    pub environment_file: Option<PathBuf>,
}

impl UnitSummary {
    /// Interpreter path, the first word of `ExecStart`.
    #[must_use]
    pub fn interpreter(&self) -> Option<PathBuf> {
        self.exec_start.first().map(PathBuf::from)
    }
}

/// Parse the fields `render` writes back out of unit text.
///
/// Unknown keys and sections are ignored; the last occurrence of a key wins.
#[must_use]
pub fn parse_unit(content: &str) -> UnitSummary {
    let mut summary = UnitSummary::default();
    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') || line.starts_with(';') || line.starts_with('[')
        {
            continue;
        }
        let Some((key, value)) = line.split_once('=') else {
            continue;
        };
        let value = value.trim();
        match key.trim() {
            "Description" => summary.description = Some(unescape_specifiers(value)),
            "WorkingDirectory" => {
                summary.working_directory = Some(PathBuf::from(unescape_specifiers(value)));
            }
            "ExecStart" => summary.exec_start = split_args(value),
            "User" => summary.user = Some(value.to_string()),
            "Group" => summary.group = Some(value.to_string()),
            "EnvironmentFile" => {
                summary.environment_file = Some(PathBuf::from(unescape_specifiers(value)));
            }
            _ => {}
        }
    }
    summary
}

// ── Quoting helpers ──────────────────────────────────────────────────────────

fn path_str(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

/// `%` starts a systemd specifier; `%%` is a literal percent sign.
fn escape_specifiers(value: &str) -> String {
    value.replace('%', "%%")
}

fn unescape_specifiers(value: &str) -> String {
    value.replace("%%", "%")
}

/// Quote one `ExecStart` word. Only `Exec*` lines expand `$`, so only they
/// double it.
fn quote_arg(arg: &str) -> String {
    quote_word(&escape_specifiers(arg).replace('$', "$$"))
}

/// Double-quote a word when systemd would otherwise split it or treat a
/// character as quoting. `'` is literal inside double quotes.
fn quote_word(word: &str) -> String {
    let needs_quotes = word.is_empty()
        || word
            .chars()
            .any(|c| c.is_whitespace() || matches!(c, '"' | '\'' | '\\'));
    if needs_quotes {
        let inner = word.replace('\\', "\\\\").replace('"', "\\\"");
        format!("\"{inner}\"")
    } else {
        word.to_string()
    }
}

/// Split an `ExecStart` value into words, honouring double and single
/// quotes and backslash escapes.
fn split_args(value: &str) -> Vec<String> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut in_word = false;
    let mut quote: Option<char> = None;
    let mut chars = value.chars();
    while let Some(c) = chars.next() {
        match c {
            '\\' => {
                if let Some(next) = chars.next() {
                    current.push(next);
                }
                in_word = true;
            }
            '"' | '\'' if quote.is_none() => {
                quote = Some(c);
                in_word = true;
            }
            c if quote == Some(c) => quote = None,
            c if c.is_whitespace() && quote.is_none() => {
                if in_word {
                    words.push(std::mem::take(&mut current));
                    in_word = false;
                }
            }
            c => {
                current.push(c);
                in_word = true;
            }
        }
    }
    if in_word {
        words.push(current);
    }
    words
        .into_iter()
        .map(|w| unescape_specifiers(&w).replace("$$", "$"))
        .collect()
}

// ── Unit tests ───────────────────────────────────────────────────────────────
