// Copyright (c) Contributors to the venvx project.
// SPDX-License-Identifier: MIT

use rstest::rstest;
use tempfile::TempDir;

use super::*;

fn record_for(root: &CacheRoot, raw: &str) -> AppRecord {
    let spec = PackageSpec::parse(raw).expect("Should parse spec");
    root.record(&spec)
}

#[rstest]
fn test_record_layout_is_keyed_by_digest() {
    let tmp = TempDir::new().unwrap();
    let root = CacheRoot::new(tmp.path());
    let record = record_for(&root, "black==24.3.0");

    let spec = PackageSpec::parse("black==24.3.0").unwrap();
    assert_eq!(
        record.app_dir(),
        tmp.path().join(APPS_DIRNAME).join(spec.digest())
    );
    assert_eq!(record.spec_file(), record.app_dir().join(PACKAGE_SPEC_FILENAME));
    assert_eq!(record.venv_dir(), record.app_dir().join(VENV_DIRNAME));
    assert!(record.python().starts_with(record.bin_dir()));
    assert!(record.pip().starts_with(record.bin_dir()));
}

#[rstest]
fn test_distinct_specs_own_distinct_records() {
    let tmp = TempDir::new().unwrap();
    let root = CacheRoot::new(tmp.path());

    let a = record_for(&root, "black==24.3.0");
    let b = record_for(&root, "ruff==0.4.0");
    assert_ne!(a.app_dir(), b.app_dir());
}

#[rstest]
fn test_marker_round_trip() {
    let tmp = TempDir::new().unwrap();
    let root = CacheRoot::new(tmp.path());
    let record = record_for(&root, "black==24.3.0");

    std::fs::create_dir_all(record.app_dir()).unwrap();
    assert_eq!(record.read_marker().unwrap(), None);

    record.write_marker().unwrap();
    assert_eq!(
        record.read_marker().unwrap().as_deref(),
        Some("black==24.3.0")
    );
}

#[rstest]
fn test_is_complete_requires_marker_and_binaries() {
    let tmp = TempDir::new().unwrap();
    let root = CacheRoot::new(tmp.path());
    let record = record_for(&root, "black==24.3.0");

    assert!(!record.is_complete());

    std::fs::create_dir_all(record.bin_dir()).unwrap();
    record.write_marker().unwrap();
    assert!(!record.is_complete(), "binaries still missing");

    std::fs::write(record.python(), "").unwrap();
    std::fs::write(record.pip(), "").unwrap();
    assert!(record.is_complete());
}

#[rstest]
fn test_remove_deletes_everything() {
    let tmp = TempDir::new().unwrap();
    let root = CacheRoot::new(tmp.path());
    let record = record_for(&root, "black==24.3.0");

    std::fs::create_dir_all(record.bin_dir()).unwrap();
    record.write_marker().unwrap();

    record.remove().unwrap();
    assert!(!record.exists());

    // Removing an absent record is fine.
    record.remove().unwrap();
}

#[rstest]
fn test_installed_specs_sorted_and_skips_incomplete() {
    let tmp = TempDir::new().unwrap();
    let root = CacheRoot::new(tmp.path());

    for raw in ["b", "a", "c"] {
        let record = record_for(&root, raw);
        std::fs::create_dir_all(record.app_dir()).unwrap();
        record.write_marker().unwrap();
    }

    // A record without a marker is in-progress and must not be listed.
    let partial = record_for(&root, "partial");
    std::fs::create_dir_all(partial.app_dir()).unwrap();

    assert_eq!(root.installed_specs().unwrap(), vec!["a", "b", "c"]);
}

#[rstest]
fn test_installed_specs_empty_without_apps_dir() {
    let tmp = TempDir::new().unwrap();
    let root = CacheRoot::new(tmp.path());
    assert!(root.installed_specs().unwrap().is_empty());
}

#[rstest]
fn test_resolve_program_joins_bin_dir() {
    let tmp = TempDir::new().unwrap();
    let root = CacheRoot::new(tmp.path());
    let record = record_for(&root, "black==24.3.0");

    assert_eq!(record.resolve_program("black"), record.bin_dir().join("black"));

    // Absolute commands win the join.
    assert_eq!(
        record.resolve_program("/usr/bin/env"),
        PathBuf::from("/usr/bin/env")
    );
}
