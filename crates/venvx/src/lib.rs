// Copyright (c) Contributors to the venvx project.
// SPDX-License-Identifier: MIT

//! venvx - Per-Package Virtualenv Manager
//!
//! This crate provides the core library for installing Python applications
//! into private virtualenvs under the user cache directory, keyed by the
//! content hash of the canonical package specification.
//!
//! # Overview
//!
//! A package specification (a pip requirement, a local source tree, or an
//! archive path) is normalized into a canonical string, hashed, and mapped
//! to a record directory holding one virtualenv plus a marker file with the
//! exact spec that produced it. Provisioning is resumable by identity: an
//! intact record is reused as-is, an `update` request upgrades it in place,
//! and a `clean` request (or a damaged record) rebuilds it from scratch.
//! Any provisioning failure removes the whole record so a later session
//! never observes a half-built environment.
//!
//! # Example
//!
//! ```no_run
//! use venvx::{CacheRoot, ProvisionOptions, Session};
//! use venvx::provision::provision;
//! use venvx::toolchain::{OutputTarget, SystemToolchain};
//!
//! # fn main() -> venvx::Result<()> {
//! let session = Session::new();
//! let spec = session.bind("black==24.3.0")?;
//! let record = CacheRoot::resolve(None)?.record(spec);
//!
//! let ambient = venvx::environment::snapshot();
//! let mut out = OutputTarget::Inherit;
//! provision(
//!     &record,
//!     &ProvisionOptions::default(),
//!     &SystemToolchain::default(),
//!     &ambient,
//!     &mut out,
//! )?;
//! println!("{}", record.app_dir().display());
//! # Ok(())
//! # }
//! ```

pub mod environment;
pub mod error;
pub mod provision;
pub mod record;
pub mod searchpath;
pub mod spec;
pub mod toolchain;

pub use environment::{EnvMap, activate, deactivate};
pub use error::{Error, Result};
pub use provision::{Action, ProvisionOptions, RecordState, provision};
pub use record::{AppRecord, CacheRoot};
pub use spec::{PackageSpec, Session};
pub use toolchain::{OutputTarget, SystemToolchain, Toolchain};

/// Well-known filename for the record marker holding the canonical spec.
pub const PACKAGE_SPEC_FILENAME: &str = "package-spec.txt";

/// Well-known directory name for the virtualenv inside a record.
pub const VENV_DIRNAME: &str = ".venv";

/// Well-known directory name for records under the cache root.
pub const APPS_DIRNAME: &str = "apps";

/// Variable marking the active virtualenv in a composed environment.
pub const VIRTUAL_ENV_VAR: &str = "VIRTUAL_ENV";

/// Platform directory for executables inside a virtualenv.
#[cfg(windows)]
pub const VENV_BIN_DIRNAME: &str = "Scripts";
/// Platform directory for executables inside a virtualenv.
#[cfg(not(windows))]
pub const VENV_BIN_DIRNAME: &str = "bin";
