//! Tests for `svcinstall status`.

#![allow(clippy::expect_used)]

use svcinstall_cli::app::Backends;
use svcinstall_cli::commands::status::{self, StatusArgs};

use crate::helpers::{FakeHost, MemoryUnits, RecordingFs, RecordingManager, test_app};

const UNIT: &str = "stock-analysis.service";

#[tokio::test]
async fn test_status_without_unit_queries_nothing() {
    let b = Backends::new(
        FakeHost::new(),
        RecordingManager::new(),
        MemoryUnits::new(),
        RecordingFs::new(),
    );

    status::run(&test_app(), &b, &StatusArgs::default())
        .await
        .expect("status");

    assert!(b.manager.calls().is_empty());
}

#[tokio::test]
async fn test_status_queries_state_of_installed_unit() {
    let b = Backends::new(
        FakeHost::new(),
        RecordingManager::new(),
        MemoryUnits::new().with_unit(
            UNIT,
            "[Service]\nUser=svc\nExecStart=/usr/bin/python3 /srv/app/main.py\n",
        ),
        RecordingFs::new(),
    );

    status::run(&test_app(), &b, &StatusArgs { full: true })
        .await
        .expect("status");

    assert_eq!(
        b.manager.calls(),
        vec![
            format!("is-active {UNIT}"),
            format!("is-enabled {UNIT}"),
            format!("status {UNIT}"),
        ]
    );
}
