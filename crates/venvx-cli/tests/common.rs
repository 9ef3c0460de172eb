// Copyright (c) Contributors to the venvx project.
// SPDX-License-Identifier: MIT

#![allow(dead_code)]

use std::path::Path;

use assert_cmd::Command;
use tempfile::TempDir;
use venvx::{AppRecord, CacheRoot, PackageSpec};

/// A venvx invocation pointed at an isolated cache root.
pub fn venvx_cmd(cache_dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("venvx").expect("venvx binary should build");
    cmd.env("VENVX_CACHE_DIR", cache_dir);
    cmd
}

/// Fresh cache root for one test.
pub fn cache_dir() -> TempDir {
    tempfile::Builder::new()
        .prefix("venvx-cli-test")
        .tempdir()
        .expect("tempdir")
}

/// Lay down a complete record on disk without running any installer.
pub fn fake_record(cache_dir: &Path, raw_spec: &str) -> AppRecord {
    let root = CacheRoot::new(cache_dir);
    let spec = PackageSpec::parse(raw_spec).expect("spec should parse");
    let record = root.record(&spec);

    std::fs::create_dir_all(record.bin_dir()).expect("create record dirs");
    std::fs::write(record.python(), "").expect("write python stub");
    std::fs::write(record.pip(), "").expect("write pip stub");
    record.write_marker().expect("write marker");
    record
}
