//! Tests for the `permissions` application service.

#![allow(clippy::expect_used)]

use std::path::PathBuf;

use svcinstall_cli::application::ports::HostInspector;
use svcinstall_cli::application::services::permissions::apply_permissions;
use svcinstall_cli::domain::{InstallError, InstallPlan, InstallerConfig};
use svcinstall_cli::infra::fs::LocalFs;
use svcinstall_cli::infra::host::LocalHost;

use crate::helpers::{NoopReporter, RecordingFs, account};

fn plan() -> InstallPlan {
    InstallPlan::new(
        PathBuf::from("/srv/app"),
        PathBuf::from("/usr/bin/python3"),
        None,
        account("svc", "/home/svc", "svc"),
    )
    .expect("valid plan")
}

#[test]
fn test_applies_tree_and_log_dir_in_order() {
    let fs = RecordingFs::new();
    apply_permissions(&fs, &NoopReporter, &plan(), &InstallerConfig::default())
        .expect("permissions");
    assert_eq!(
        fs.ops(),
        vec![
            "chown-tree /srv/app svc:svc",
            "grant-read /srv/app",
            "mkdir /srv/app/logs",
            "chown /srv/app/logs svc:svc",
            "add-mode /srv/app/logs 700",
        ]
    );
}

#[test]
fn test_restricts_project_env_file() {
    let fs = RecordingFs::new().existing("/srv/app/.env");
    apply_permissions(&fs, &NoopReporter, &plan(), &InstallerConfig::default())
        .expect("permissions");
    let ops = fs.ops();
    assert_eq!(
        &ops[ops.len() - 2..],
        &["set-mode /srv/app/.env 600", "chown /srv/app/.env svc:svc"]
    );
}

#[test]
fn test_symlinked_env_file_is_skipped() {
    let fs = RecordingFs::new().symlink("/srv/app/.env");
    apply_permissions(&fs, &NoopReporter, &plan(), &InstallerConfig::default())
        .expect("permissions");
    assert!(
        fs.ops().iter().all(|op| !op.contains(".env")),
        "ops: {:?}",
        fs.ops()
    );
}

#[test]
fn test_symlinked_env_file_leaves_target_mode_alone() {
    use std::os::unix::fs::PermissionsExt;

    let project = tempfile::tempdir().expect("project");
    let elsewhere = tempfile::tempdir().expect("elsewhere");
    let target = elsewhere.path().join("shared.conf");
    std::fs::write(&target, "KEY=1\n").expect("write target");
    std::fs::set_permissions(&target, std::fs::Permissions::from_mode(0o644)).expect("chmod");
    std::os::unix::fs::symlink(&target, project.path().join(".env")).expect("symlink");

    let fs = LocalFs;
    let me = LocalHost
        .effective_user()
        .expect("account database")
        .expect("effective user");
    let plan = InstallPlan::new(
        project.path().to_path_buf(),
        PathBuf::from("/usr/bin/python3"),
        None,
        me,
    )
    .expect("valid plan");
    apply_permissions(&fs, &NoopReporter, &plan, &InstallerConfig::default())
        .expect("permissions");

    let mode = std::fs::metadata(&target).expect("meta").permissions().mode() & 0o7777;
    assert_eq!(mode, 0o644, "file outside the project tree changed mode");
}

#[test]
fn test_env_file_outside_root_is_untouched() {
    let plan = InstallPlan::new(
        PathBuf::from("/srv/app"),
        PathBuf::from("/usr/bin/python3"),
        Some(PathBuf::from("/etc/stock-analysis/.env")),
        account("svc", "/home/svc", "svc"),
    )
    .expect("valid plan");
    let fs = RecordingFs::new();
    apply_permissions(&fs, &NoopReporter, &plan, &InstallerConfig::default())
        .expect("permissions");
    assert!(
        fs.ops().iter().all(|op| !op.contains("/etc/stock-analysis")),
        "ops: {:?}",
        fs.ops()
    );
}

#[test]
fn test_custom_log_dir() {
    let mut config = InstallerConfig::default();
    config.paths.log_dir = PathBuf::from("var/log");
    let fs = RecordingFs::new();
    apply_permissions(&fs, &NoopReporter, &plan(), &config).expect("permissions");
    assert!(fs.ops().contains(&"mkdir /srv/app/var/log".to_string()));
}

#[test]
fn test_first_failure_aborts_with_path() {
    let fs = RecordingFs::new()
        .existing("/srv/app/.env")
        .fail_on("/srv/app/logs");
    let err = apply_permissions(&fs, &NoopReporter, &plan(), &InstallerConfig::default())
        .expect_err("mkdir fails");
    match err.downcast_ref::<InstallError>() {
        Some(InstallError::PermissionDenied { path, reason }) => {
            assert_eq!(path, &PathBuf::from("/srv/app/logs"));
            assert!(reason.contains("not permitted"), "reason: {reason}");
        }
        other => panic!("unexpected error: {other:?}"),
    }
    // Nothing after the failing step ran, and earlier changes were kept.
    assert_eq!(fs.ops(), vec!["chown-tree /srv/app svc:svc", "grant-read /srv/app"]);
}

#[test]
fn test_failure_on_root_is_reported_as_root() {
    let fs = RecordingFs::new().fail_on("/srv/app");
    let err = apply_permissions(&fs, &NoopReporter, &plan(), &InstallerConfig::default())
        .expect_err("chown fails");
    assert!(err.to_string().contains("/srv/app"), "got: {err}");
    assert!(fs.ops().is_empty());
}
