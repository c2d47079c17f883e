//! Integration tests for `svcinstall render`, which detects the environment
//! and prints the unit without touching the host.

#![allow(clippy::expect_used)]

use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// Project directory containing the entry file, plus a config that resolves
/// the interpreter to `sh` so the test does not depend on Python.
struct Fixture {
    project: TempDir,
    config: PathBuf,
}

impl Fixture {
    fn new() -> Self {
        let project = tempfile::tempdir().expect("tempdir");
        std::fs::write(project.path().join("main.py"), "print('hi')\n").expect("write main.py");
        let config = project.path().join("svcinstall.yaml");
        std::fs::write(&config, "interpreters: [sh]\nverify_delay_secs: 0\n")
            .expect("write config");
        Self { project, config }
    }

    fn root(&self) -> PathBuf {
        self.project
            .path()
            .canonicalize()
            .expect("canonical tempdir")
    }

    fn render(&self) -> Command {
        let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("svcinstall"));
        cmd.env("NO_COLOR", "1")
            .env_remove("SVCINSTALL_ENV_FILE")
            .env_remove("SVCINSTALL_CONFIG")
            .env_remove("SUDO_USER")
            .current_dir(self.project.path())
            .arg("--config")
            .arg(&self.config)
            .arg("render");
        cmd
    }
}

fn line(key: &str, value: &Path) -> String {
    format!("{key}={}\n", value.display())
}

#[test]
fn test_render_prints_unit_for_detected_project() {
    let fx = Fixture::new();
    let root = fx.root();

    fx.render()
        .arg("root")
        .assert()
        .success()
        .stdout(predicate::str::contains("[Service]"))
        .stdout(predicate::str::contains("User=root\n"))
        .stdout(predicate::str::contains(line("WorkingDirectory", &root)))
        .stdout(predicate::str::contains(format!(
            "{} --webui-only\n",
            root.join("main.py").display()
        )))
        .stdout(predicate::str::contains("Restart=always"))
        .stdout(predicate::str::contains("WantedBy=multi-user.target"));
}

#[test]
fn test_render_without_env_file_omits_directive() {
    let fx = Fixture::new();

    fx.render()
        .arg("root")
        .assert()
        .success()
        .stdout(predicate::str::contains("EnvironmentFile=").not());
}

#[test]
fn test_render_includes_project_env_file() {
    let fx = Fixture::new();
    std::fs::write(fx.project.path().join(".env"), "API_KEY=x\n").expect("write .env");
    let env_file = fx.root().join(".env");

    fx.render()
        .arg("root")
        .assert()
        .success()
        .stdout(predicate::str::contains(line("EnvironmentFile", &env_file)));
}

#[test]
fn test_render_honours_env_file_override() {
    let fx = Fixture::new();
    let secrets = tempfile::tempdir().expect("tempdir");
    let override_file = secrets.path().join("app.env");
    std::fs::write(&override_file, "API_KEY=x\n").expect("write override");

    let mut cmd = fx.render();
    cmd.env("SVCINSTALL_ENV_FILE", &override_file);
    let output = cmd.arg("root").output().expect("run");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    // Env files already present on the test host take precedence over the override.
    let shadowed = ["/etc/stock-analysis/.env", "/root/.config/stock-analysis/.env"]
        .iter()
        .any(|p| Path::new(p).exists());
    if !shadowed {
        assert!(
            stdout.contains(&line("EnvironmentFile", &override_file)),
            "stdout: {stdout}"
        );
    }
}

#[test]
fn test_render_schedule_mode_from_config() {
    let fx = Fixture::new();
    std::fs::write(
        &fx.config,
        "service:\n  launch_mode: serve-with-schedule\ninterpreters: [sh]\n",
    )
    .expect("write config");

    fx.render()
        .arg("root")
        .assert()
        .success()
        .stdout(predicate::str::contains("main.py --webui --schedule\n"));
}

#[test]
fn test_render_unknown_user_exits_one() {
    let fx = Fixture::new();

    fx.render()
        .arg("svcinstall-no-such-user")
        .assert()
        .code(1)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("Unknown user 'svcinstall-no-such-user'"));
}

#[test]
fn test_render_missing_interpreter_exits_one() {
    let fx = Fixture::new();
    std::fs::write(&fx.config, "interpreters: [svcinstall-no-such-python]\n")
        .expect("write config");

    fx.render()
        .arg("root")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("svcinstall-no-such-python"));
}

#[test]
fn test_render_without_project_root_exits_one() {
    let fx = Fixture::new();
    std::fs::remove_file(fx.project.path().join("main.py")).expect("remove main.py");
    if Path::new("/opt/stock-analysis/main.py").exists() {
        return;
    }

    fx.render()
        .arg("root")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Project root not found"));
}
