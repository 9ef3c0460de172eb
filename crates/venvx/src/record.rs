// Copyright (c) Contributors to the venvx project.
// SPDX-License-Identifier: MIT

//! On-disk record layout for provisioned environments.
//!
//! Each identity owns one directory under `<cache-root>/apps/<digest>/`
//! holding a marker file with the canonical spec and the virtualenv
//! subtree. The marker is written last during provisioning, so its
//! presence always means the record is complete; removal deletes the
//! marker first for the same reason.

use std::path::{Path, PathBuf};

use crate::searchpath;
use crate::spec::PackageSpec;
use crate::{APPS_DIRNAME, PACKAGE_SPEC_FILENAME, VENV_BIN_DIRNAME, VENV_DIRNAME};

#[cfg(test)]
#[path = "./record_test.rs"]
mod record_test;

#[cfg(windows)]
const PYTHON_EXE: &str = "python.exe";
#[cfg(not(windows))]
const PYTHON_EXE: &str = "python3";

#[cfg(windows)]
const PIP_EXE: &str = "pip3.exe";
#[cfg(not(windows))]
const PIP_EXE: &str = "pip3";

/// Root of the venvx cache on disk.
#[derive(Debug, Clone)]
pub struct CacheRoot {
    dir: PathBuf,
}

impl CacheRoot {
    /// Use an explicit directory as the cache root.
    pub fn new<P: Into<PathBuf>>(dir: P) -> Self {
        Self { dir: dir.into() }
    }

    /// Resolve the cache root from an optional override, falling back to
    /// the platform cache directory.
    pub fn resolve(override_dir: Option<PathBuf>) -> crate::Result<Self> {
        match override_dir {
            Some(dir) => Ok(Self::new(dir)),
            None => dirs::cache_dir()
                .map(|dir| Self::new(dir.join("venvx")))
                .ok_or(crate::Error::CacheRootUnavailable),
        }
    }

    /// The cache root directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Directory holding one record per installed identity.
    pub fn apps_dir(&self) -> PathBuf {
        self.dir.join(APPS_DIRNAME)
    }

    /// The record owned by `spec`'s identity.
    pub fn record(&self, spec: &PackageSpec) -> AppRecord {
        AppRecord {
            app_dir: self.apps_dir().join(spec.digest()),
            spec: spec.clone(),
        }
    }

    /// Canonical specs of every complete record, lexicographically sorted.
    ///
    /// Records without a marker file are still being provisioned (or were
    /// abandoned mid-removal) and are skipped.
    pub fn installed_specs(&self) -> crate::Result<Vec<String>> {
        let apps_dir = self.apps_dir();
        if !apps_dir.exists() {
            return Ok(Vec::new());
        }

        let mut specs = Vec::new();
        for entry in std::fs::read_dir(&apps_dir)? {
            let marker = entry?.path().join(PACKAGE_SPEC_FILENAME);
            if !marker.is_file() {
                continue;
            }
            let content =
                std::fs::read_to_string(&marker).map_err(|e| crate::Error::ReadFailed {
                    path: marker.clone(),
                    error: e,
                })?;
            specs.push(content.trim_end().to_string());
        }

        specs.sort();
        Ok(specs)
    }
}

/// One provisioned (or provisionable) environment on disk.
#[derive(Debug, Clone)]
pub struct AppRecord {
    app_dir: PathBuf,
    spec: PackageSpec,
}

impl AppRecord {
    /// The spec whose identity keys this record.
    pub fn spec(&self) -> &PackageSpec {
        &self.spec
    }

    /// The record directory.
    pub fn app_dir(&self) -> &Path {
        &self.app_dir
    }

    /// Marker file holding the canonical spec.
    pub fn spec_file(&self) -> PathBuf {
        self.app_dir.join(PACKAGE_SPEC_FILENAME)
    }

    /// The virtualenv subtree.
    pub fn venv_dir(&self) -> PathBuf {
        self.app_dir.join(VENV_DIRNAME)
    }

    /// Executable directory of the virtualenv.
    pub fn bin_dir(&self) -> PathBuf {
        self.venv_dir().join(VENV_BIN_DIRNAME)
    }

    /// The virtualenv's interpreter.
    pub fn python(&self) -> PathBuf {
        self.bin_dir().join(PYTHON_EXE)
    }

    /// The virtualenv's package installer.
    pub fn pip(&self) -> PathBuf {
        self.bin_dir().join(PIP_EXE)
    }

    /// True if the record directory exists at all.
    pub fn exists(&self) -> bool {
        self.app_dir.exists()
    }

    /// True if the marker and both runtime binaries are present.
    pub fn is_complete(&self) -> bool {
        self.spec_file().exists() && self.python().exists() && self.pip().exists()
    }

    /// Read the marker file, if present.
    pub fn read_marker(&self) -> crate::Result<Option<String>> {
        let marker = self.spec_file();
        if !marker.exists() {
            return Ok(None);
        }
        let content = std::fs::read_to_string(&marker).map_err(|e| crate::Error::ReadFailed {
            path: marker,
            error: e,
        })?;
        Ok(Some(content.trim_end().to_string()))
    }

    /// Write the canonical spec to the marker file.
    pub fn write_marker(&self) -> crate::Result<()> {
        let marker = self.spec_file();
        std::fs::write(&marker, self.spec.canonical()).map_err(|e| crate::Error::WriteFailed {
            path: marker,
            error: e,
        })
    }

    /// Delete this record entirely, marker first.
    pub fn remove(&self) -> crate::Result<()> {
        let marker = self.spec_file();
        if marker.exists() {
            std::fs::remove_file(&marker)?;
        }
        if self.app_dir.exists() {
            std::fs::remove_dir_all(&self.app_dir)?;
        }
        Ok(())
    }

    /// Resolve a command name against the record's bin directory.
    ///
    /// The name is tilde-expanded and joined onto the bin directory; an
    /// absolute name wins the join, matching shell expectations.
    pub fn resolve_program(&self, command: &str) -> PathBuf {
        let joined = self.bin_dir().join(searchpath::expand_user(command));
        PathBuf::from(searchpath::normalize_dir(&joined.to_string_lossy()))
    }
}
