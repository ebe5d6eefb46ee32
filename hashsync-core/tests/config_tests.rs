//! Host config loading: file errors, parse errors with path, field parsing.

use std::fs;

use hashsync_core::{
    config::{self, DispatchMode, HostConfig},
    ConfigError, HashValue,
};
use rstest::rstest;
use tempfile::TempDir;

// ---------------------------------------------------------------------------
// 1. Load error messages
// ---------------------------------------------------------------------------

#[test]
fn load_missing_file_returns_io_error_with_path() {
    let dir = TempDir::new().expect("tempdir");
    let path = dir.path().join("host.yaml");

    let err = config::load_at(&path).unwrap_err();
    assert!(matches!(err, ConfigError::Io { .. }), "got: {err}");
    assert!(err.to_string().contains("host.yaml"));
}

#[test]
fn load_corrupt_yaml_returns_parse_error_with_path() {
    let dir = TempDir::new().expect("tempdir");
    let path = dir.path().join("host.yaml");
    fs::write(&path, b": : corrupt : yaml : !!!\n  - broken: [unclosed").expect("write");

    let err = config::load_at(&path).unwrap_err();
    assert!(matches!(err, ConfigError::Parse { .. }), "got: {err}");
    let msg = err.to_string();
    assert!(msg.contains("host.yaml"), "must contain file path, got: {msg}");
}

#[test]
fn load_wrong_dispatch_mode_returns_parse_error() {
    let dir = TempDir::new().expect("tempdir");
    let path = dir.path().join("host.yaml");
    fs::write(&path, "dispatch: eventually\n").expect("write");

    let err = config::load_at(&path).unwrap_err();
    assert!(matches!(err, ConfigError::Parse { .. }), "got: {err}");
}

// ---------------------------------------------------------------------------
// 2. Field parsing
// ---------------------------------------------------------------------------

#[test]
fn load_full_config() {
    let dir = TempDir::new().expect("tempdir");
    let path = dir.path().join("host.yaml");
    fs::write(
        &path,
        "initial_hash: \"#start\"\ndispatch: deferred\nnotify_on_unchanged: true\nbrowser_semantics: true\n",
    )
    .expect("write");

    let config = config::load_at(&path).expect("load");
    assert_eq!(
        config,
        HostConfig {
            initial_hash: HashValue::from("#start"),
            dispatch: DispatchMode::Deferred,
            notify_on_unchanged: true,
            browser_semantics: true,
        }
    );
}

#[rstest]
#[case::empty("initial_hash: \"\"\n", "")]
#[case::delimited("initial_hash: \"#initial\"\n", "#initial")]
#[case::bare("initial_hash: section\n", "section")]
#[case::unicode("initial_hash: \"#раздел-章\"\n", "#раздел-章")]
fn initial_hash_is_kept_verbatim(#[case] yaml: &str, #[case] expected: &str) {
    let config = config::from_yaml_str(yaml).expect("parse");
    assert_eq!(config.initial_hash, expected);
}

#[rstest]
#[case("immediate", DispatchMode::Immediate)]
#[case("deferred", DispatchMode::Deferred)]
fn dispatch_mode_values(#[case] raw: &str, #[case] expected: DispatchMode) {
    let config = config::from_yaml_str(&format!("dispatch: {raw}\n")).expect("parse");
    assert_eq!(config.dispatch, expected);
}
