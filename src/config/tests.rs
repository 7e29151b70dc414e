use std::fs;
use std::time::Duration;

use tempfile::tempdir;

use super::{Settings, SettingsError, Timing};

#[test]
fn partial_yaml_keeps_defaults() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("settings.yaml");
    fs::write(
        &path,
        "launch:\n  package_root: /opt/ros/cartographer_example\ntiming:\n  poll_interval_ms: 50\n",
    )
    .expect("write settings");

    let settings = Settings::load(&path).expect("load settings");
    assert_eq!(settings.launch.package, "cartographer_example");
    assert_eq!(
        settings.launch.package_root.as_deref(),
        Some(std::path::Path::new("/opt/ros/cartographer_example"))
    );
    assert_eq!(settings.timing.poll_interval(), Duration::from_millis(50));
    assert_eq!(settings.timing.service_settle(), Duration::from_secs(3));
}

#[test]
fn json_settings_can_disable_completion_timeout() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("settings.json");
    fs::write(&path, r#"{"timing": {"completion_timeout_ms": null}}"#).expect("write settings");

    let settings = Settings::load(&path).expect("load settings");
    assert_eq!(settings.timing.completion_timeout(), None);
}

#[test]
fn relative_namespace_is_rejected() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("settings.yaml");
    fs::write(&path, "engine:\n  service_namespace: cartographer\n").expect("write settings");

    let error = Settings::load(&path).expect_err("relative namespace");
    assert!(matches!(error, SettingsError::Invalid(_)));
}

#[test]
fn service_names_join_namespace() {
    let settings = Settings::default();
    assert_eq!(
        settings.engine.service("write_state"),
        "/cartographer/write_state"
    );
    assert_eq!(
        settings.engine.topic("tracked_pose"),
        "/cartographer/tracked_pose"
    );
}

#[test]
fn immediate_timing_has_no_delays() {
    let timing = Timing::immediate();
    assert_eq!(timing.service_settle(), Duration::ZERO);
    assert_eq!(timing.step_settle(), Duration::ZERO);
    assert_eq!(timing.poll_interval(), Duration::ZERO);
    assert!(timing.completion_timeout().is_some());
}
