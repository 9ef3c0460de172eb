// Copyright (c) Contributors to the venvx project.
// SPDX-License-Identifier: MIT

//! Activation and deactivation of virtualenvs on environment snapshots.
//!
//! All operations work on a caller-owned [`EnvMap`] value, never on the
//! live process environment. The ambient environment is only read, via
//! [`snapshot`]; spawning a subprocess with a composed map is the caller's
//! job. This keeps activate/deactivate cycles reversible and testable.

use indexmap::IndexMap;
use std::path::Path;

use crate::searchpath;
use crate::{VENV_BIN_DIRNAME, VIRTUAL_ENV_VAR};

#[cfg(test)]
#[path = "./environment_test.rs"]
mod environment_test;

/// Ordered environment-variable mapping.
pub type EnvMap = IndexMap<String, String>;

/// Variable naming the search-path list.
pub const PATH_VAR: &str = "PATH";

/// Poetry marks its own activations with this flag; clear it too so a
/// subprocess never sees a half-deactivated poetry shell.
const POETRY_ACTIVE_VAR: &str = "POETRY_ACTIVE";

/// Snapshot the ambient process environment as a value.
pub fn snapshot() -> EnvMap {
    std::env::vars().collect()
}

/// Remove any active virtualenv from `env`.
///
/// Clears the activation marker and the active flag, and strips the
/// recorded venv's bin directory from the path variable. No-op when no
/// activation marker is present.
pub fn deactivate(env: &mut EnvMap) {
    let Some(venv_dir) = env.shift_remove(VIRTUAL_ENV_VAR) else {
        return;
    };
    env.shift_remove(POETRY_ACTIVE_VAR);

    if let Some(path_text) = env.get(PATH_VAR) {
        let venv_bin = Path::new(&venv_dir)
            .join(VENV_BIN_DIRNAME)
            .to_string_lossy()
            .into_owned();
        let parts = searchpath::split(path_text);
        let parts = searchpath::remove_dir(&parts, &venv_bin);
        env.insert(PATH_VAR.to_string(), searchpath::join(&parts));
    }
}

/// Activate the virtualenv at `venv_dir` in `env`.
///
/// Any previous activation is removed first, so activating B after A
/// leaves no trace of A, and activating the same venv twice never
/// duplicates its bin directory on the path.
pub fn activate(venv_dir: &Path, env: &mut EnvMap) {
    let venv_dir = searchpath::normalize_dir(&venv_dir.to_string_lossy());
    let venv_bin = Path::new(&venv_dir)
        .join(VENV_BIN_DIRNAME)
        .to_string_lossy()
        .into_owned();

    deactivate(env);
    env.insert(VIRTUAL_ENV_VAR.to_string(), venv_dir);

    let path_text = env.get(PATH_VAR).cloned().unwrap_or_default();
    let parts = searchpath::prepend_if_missing(&searchpath::split(&path_text), &venv_bin);
    env.insert(PATH_VAR.to_string(), searchpath::join(&parts));
}
