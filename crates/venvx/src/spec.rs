// Copyright (c) Contributors to the venvx project.
// SPDX-License-Identifier: MIT

//! Package specification normalization and identity.
//!
//! A raw spec may be a pip requirement (`black==24.3.0`), a local source
//! tree (`./myapp`, `~/src/myapp#egg=myapp`), or an archive path. Path-like
//! inputs are canonicalized to a `file://` URI so the same tree always
//! yields the same identity no matter where the command was invoked from.
//! The identity is the SHA-256 of the canonical spec and keys the record
//! directory under the cache root.

use once_cell::sync::OnceCell;
use sha2::{Digest, Sha256};
use std::path::Path;
use url::Url;

use crate::searchpath::normalize_dir;

#[cfg(test)]
#[path = "./spec_test.rs"]
mod spec_test;

/// Archive suffixes that mark a schemeless spec as a filesystem path.
const ARCHIVE_SUFFIXES: &[&str] = &[".gz", ".tgz", ".zip", ".whl"];

/// A canonical package specification and its content identity.
///
/// Both fields are computed eagerly at construction and never change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageSpec {
    canonical: String,
    digest: String,
}

impl PackageSpec {
    /// Normalize a raw spec and derive its identity digest.
    pub fn parse(raw: &str) -> crate::Result<Self> {
        let canonical = normalize(raw)?;
        let digest = digest_of(&canonical);
        Ok(Self { canonical, digest })
    }

    /// The canonical specification string.
    pub fn canonical(&self) -> &str {
        &self.canonical
    }

    /// Lowercase-hex SHA-256 of the canonical specification.
    pub fn digest(&self) -> &str {
        &self.digest
    }
}

impl std::fmt::Display for PackageSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.canonical)
    }
}

/// Normalize a raw package specification into canonical form.
///
/// A spec without a scheme separator that looks like a filesystem path
/// (contains a path separator, a fragment marker, or ends with a known
/// archive suffix) is rewritten as the `file://` URI of its tilde-expanded,
/// absolutized, lexically normalized path. Anything else passes through
/// unchanged as a registry/remote reference. Normalizing an
/// already-canonical spec yields the same string.
///
/// A blank spec is a usage error: there is nothing to hash an identity
/// from.
pub fn normalize(raw: &str) -> crate::Result<String> {
    if raw.trim().is_empty() {
        return Err(crate::Error::Usage(
            "A non-empty package spec is required".to_string(),
        ));
    }

    if !looks_like_path(raw) {
        return Ok(raw.to_string());
    }

    let pathname = normalize_dir(raw);
    let uri = Url::from_file_path(Path::new(&pathname)).map_err(|()| {
        crate::Error::InvariantViolation(format!(
            "normalized path is not absolute: {pathname}"
        ))
    })?;
    Ok(uri.to_string())
}

fn looks_like_path(raw: &str) -> bool {
    if raw.contains(':') {
        return false;
    }
    raw.contains('/')
        || raw.contains('#')
        || ARCHIVE_SUFFIXES
            .iter()
            .any(|suffix| raw.ends_with(suffix))
}

fn digest_of(canonical: &str) -> String {
    let hash = Sha256::digest(canonical.as_bytes());
    format!("{hash:x}")
}

/// Set-once binding of a session to a single package identity.
///
/// One invocation operates on exactly one package. Binding again with an
/// equivalent spec returns the existing binding; binding a different spec
/// is a programming error.
#[derive(Debug, Default)]
pub struct Session {
    bound: OnceCell<PackageSpec>,
}

impl Session {
    /// Create an unbound session.
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind this session to `raw`, normalizing it first.
    pub fn bind(&self, raw: &str) -> crate::Result<&PackageSpec> {
        let spec = PackageSpec::parse(raw)?;
        let bound = self.bound.get_or_init(|| spec.clone());
        if bound.canonical() != spec.canonical() {
            return Err(crate::Error::InvariantViolation(format!(
                "session already bound to {}, cannot rebind to {}",
                bound.canonical(),
                spec.canonical()
            )));
        }
        Ok(bound)
    }

    /// The bound spec, if any.
    pub fn spec(&self) -> Option<&PackageSpec> {
        self.bound.get()
    }
}
