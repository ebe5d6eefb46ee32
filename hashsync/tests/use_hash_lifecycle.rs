//! `use_hash` wired to a `Mount` host: subscribe on mount, unsubscribe on unmount.

use std::fs;
use std::rc::Rc;

use hashsync::{use_hash, LifecycleHost, MemoryLocation, Mount, MountState, Phase, SyncError};
use hashsync_core::HashValue;
use tempfile::TempDir;

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

#[test]
fn initializes_from_location_on_mount() {
    init_logging();
    let location = Rc::new(MemoryLocation::with_hash("#initial"));
    let mut mount = Mount::new();
    let sync = use_hash(&mut mount, location.clone()).expect("use_hash");
    assert_eq!(sync.phase(), Phase::Inactive);
    assert_eq!(location.listener_count(), 0);

    mount.mount().expect("mount");
    let (hash, _) = sync.pair().expect("pair");
    assert_eq!(hash, "#initial");
}

#[test]
fn registers_on_mount_and_unregisters_on_unmount() {
    init_logging();
    let location = Rc::new(MemoryLocation::new());
    let mut mount = Mount::new();
    let sync = use_hash(&mut mount, location.clone()).expect("use_hash");

    mount.mount().expect("mount");
    assert_eq!(location.listener_count(), 1);

    mount.unmount().expect("unmount");
    assert_eq!(location.listener_count(), 0);
    assert_eq!(sync.phase(), Phase::Deactivated);
    assert_eq!(mount.state(), MountState::Unmounted);
}

#[test]
fn set_hash_updates_value_and_location() {
    init_logging();
    let location = Rc::new(MemoryLocation::with_hash("#start"));
    let mut mount = Mount::new();
    let sync = use_hash(&mut mount, location.clone()).expect("use_hash");
    mount.mount().expect("mount");

    let (_, set_hash) = sync.pair().expect("pair");
    set_hash.set("#newValue").expect("set");

    let (hash, _) = sync.pair().expect("pair");
    assert_eq!(hash, "#newValue");
    assert_eq!(location.value(), "#newValue");
}

#[test]
fn setter_fails_after_unmount() {
    init_logging();
    let location = Rc::new(MemoryLocation::with_hash("#start"));
    let mut mount = Mount::new();
    let sync = use_hash(&mut mount, location.clone()).expect("use_hash");
    mount.mount().expect("mount");
    let (_, set_hash) = sync.pair().expect("pair");

    mount.unmount().expect("unmount");
    let err = set_hash.set("#late").unwrap_err();
    assert!(matches!(err, SyncError::Lifecycle { op: "write", .. }), "got: {err}");
    assert_eq!(location.value(), "#start");
}

#[test]
fn use_hash_after_unmount_is_rejected() {
    let mut mount = Mount::new();
    mount.mount().expect("mount");
    mount.unmount().expect("unmount");

    let err = use_hash(&mut mount, Rc::new(MemoryLocation::new())).unwrap_err();
    assert!(matches!(err, SyncError::HostState { .. }), "got: {err}");
    assert!(err.to_string().contains("unmounted"));
}

#[test]
fn failing_consumer_does_not_block_later_consumers() {
    init_logging();
    let location = Rc::new(MemoryLocation::with_hash("#x"));
    let mut mount = Mount::new();
    mount
        .register(
            Box::new(|| -> Result<(), SyncError> {
                Err(SyncError::HostState {
                    op: "activate",
                    state: MountState::Pending,
                })
            }),
            Box::new(|| -> Result<(), SyncError> { Ok(()) }),
        )
        .expect("register failing consumer");
    let sync = use_hash(&mut mount, location.clone()).expect("use_hash");

    let err = mount.mount().unwrap_err();
    assert!(matches!(err, SyncError::HostState { .. }), "got: {err}");
    assert_eq!(mount.state(), MountState::Mounted);
    assert_eq!(sync.phase(), Phase::Active);
    assert_eq!(location.listener_count(), 1);

    mount.unmount().expect("unmount");
    assert_eq!(sync.phase(), Phase::Deactivated);
    assert_eq!(location.listener_count(), 0);
}

#[test]
fn dropping_mount_releases_subscription() {
    init_logging();
    let location = Rc::new(MemoryLocation::with_hash("#x"));
    {
        let mut mount = Mount::new();
        let _sync = use_hash(&mut mount, location.clone()).expect("use_hash");
        mount.mount().expect("mount");
        assert_eq!(location.listener_count(), 1);
    }
    assert_eq!(location.listener_count(), 0);
}

#[test]
fn host_config_file_drives_resource() {
    init_logging();
    let dir = TempDir::new().expect("tempdir");
    let path = dir.path().join("host.yaml");
    fs::write(&path, "initial_hash: \"#fromFile\"\ndispatch: deferred\n").expect("write");

    let location = Rc::new(MemoryLocation::load_at(&path).expect("load"));
    let mut mount = Mount::new();
    let sync = use_hash(&mut mount, location.clone()).expect("use_hash");
    mount.mount().expect("mount");
    assert_eq!(sync.read().expect("read"), HashValue::from("#fromFile"));

    sync.write("#next").expect("write");
    assert_eq!(sync.read().expect("read"), "#fromFile");
    location.flush();
    assert_eq!(sync.read().expect("read"), "#next");
}

#[test]
fn missing_host_config_surfaces_config_error() {
    let dir = TempDir::new().expect("tempdir");
    let err = MemoryLocation::load_at(&dir.path().join("absent.yaml")).err();
    assert!(matches!(err, Some(SyncError::Config(_))), "got: {err:?}");
}
