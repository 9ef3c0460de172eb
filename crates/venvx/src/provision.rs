// Copyright (c) Contributors to the venvx project.
// SPDX-License-Identifier: MIT

//! Lifecycle engine for record provisioning.
//!
//! Each session observes the on-disk state of its record, plans one of
//! three transitions (reuse, upgrade, full rebuild), and executes it
//! through the [`Toolchain`] seam. The whole sequence is wrapped so that
//! any failure removes the record directory before the error propagates:
//! a later session always finds either a complete record or none at all.
//!
//! Provisioning assumes exclusive use of the record directory; two
//! concurrent sessions on the same identity are undefined behavior.

use crate::environment::{self, EnvMap};
use crate::record::AppRecord;
use crate::toolchain::{OutputTarget, Toolchain};

#[cfg(test)]
#[path = "./provision_test.rs"]
mod provision_test;

/// Caller intent for one provisioning pass.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProvisionOptions {
    /// Upgrade the package (and its requirements, eagerly) if installed.
    pub update: bool,
    /// Destroy and rebuild the record even if it is intact.
    pub clean: bool,
}

/// On-disk state of a record at the start of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordState {
    /// No directory, or no marker: nothing complete exists.
    Absent,
    /// Marker present, but the record cannot be handed back as-is: the
    /// caller asked for clean/update, or the runtime binaries are gone.
    Stale,
    /// Marker and runtime binaries present, no flags: usable directly.
    Ready,
}

/// The provisioning transition chosen for a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Reuse,
    Upgrade,
    FullRebuild,
}

/// Observe the record's state under the caller's flags.
pub fn observe(record: &AppRecord, options: &ProvisionOptions) -> RecordState {
    if !record.spec_file().exists() {
        return RecordState::Absent;
    }
    if options.clean || options.update || !record.is_complete() {
        return RecordState::Stale;
    }
    RecordState::Ready
}

/// Choose the transition for the observed state.
///
/// `clean` and missing binaries always force a rebuild; `update` on an
/// intact record upgrades it in place.
pub fn plan(record: &AppRecord, options: &ProvisionOptions) -> Action {
    match observe(record, options) {
        RecordState::Absent => Action::FullRebuild,
        RecordState::Stale if options.clean || !record.is_complete() => Action::FullRebuild,
        RecordState::Stale => Action::Upgrade,
        RecordState::Ready => Action::Reuse,
    }
}

/// Provision the record, returning the transition that ran.
///
/// `ambient` is a snapshot of the caller's environment; it is never
/// mutated. External steps run under a copy with the record's virtualenv
/// activated (or, for environment creation, with any prior activation
/// stripped).
pub fn provision<T: Toolchain>(
    record: &AppRecord,
    options: &ProvisionOptions,
    toolchain: &T,
    ambient: &EnvMap,
    out: &mut OutputTarget,
) -> crate::Result<Action> {
    let action = plan(record, options);
    tracing::debug!(
        spec = record.spec().canonical(),
        app_dir = %record.app_dir().display(),
        ?action,
        "planned provisioning transition"
    );

    if action == Action::Reuse {
        return Ok(action);
    }

    if let Err(error) = run_steps(record, options, action, toolchain, ambient, out) {
        // Never leave a partial record behind: the marker's presence must
        // always mean a complete provisioning.
        if let Err(cleanup) = record.remove() {
            tracing::warn!(
                app_dir = %record.app_dir().display(),
                %cleanup,
                "failed to remove record after provisioning error"
            );
        }
        return Err(crate::Error::Provisioning {
            spec: record.spec().canonical().to_string(),
            source: Box::new(error),
        });
    }

    Ok(action)
}

fn run_steps<T: Toolchain>(
    record: &AppRecord,
    options: &ProvisionOptions,
    action: Action,
    toolchain: &T,
    ambient: &EnvMap,
    out: &mut OutputTarget,
) -> crate::Result<()> {
    let mut base_env = ambient.clone();
    environment::deactivate(&mut base_env);

    // Runs on every non-reuse pass: upgrades can build wheels from
    // source just as fresh installs can.
    toolchain.ensure_host_prerequisites(out)?;

    if action == Action::FullRebuild {
        record.remove()?;
    }
    std::fs::create_dir_all(record.app_dir())?;

    let mut fresh_env = false;
    if !record.venv_dir().exists() {
        toolchain.create_env(record, options.clean, &base_env, out)?;
        fresh_env = true;
    }

    let mut venv_env = base_env.clone();
    environment::activate(&record.venv_dir(), &mut venv_env);

    if !record.pip().exists() {
        toolchain.bootstrap_installer(record, &venv_env, out)?;
    }

    if options.update {
        toolchain.upgrade_installer(record, &venv_env, out)?;
    }

    if options.update || fresh_env {
        toolchain.install_build_helpers(record, options.update, &venv_env, out)?;
        toolchain.install_package(record, options.update, &venv_env, out)?;
    }

    // Marker goes last: everything above must have succeeded.
    if record.read_marker()?.is_none() {
        record.write_marker()?;
    }

    Ok(())
}
