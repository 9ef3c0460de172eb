// Copyright (c) Contributors to the venvx project.
// SPDX-License-Identifier: MIT

use std::path::Path;

use rstest::rstest;

use super::*;

fn env_with_path(path: &str) -> EnvMap {
    let mut env = EnvMap::new();
    env.insert("HOME".to_string(), "/home/someone".to_string());
    env.insert(PATH_VAR.to_string(), path.to_string());
    env
}

fn path_parts(env: &EnvMap) -> Vec<String> {
    searchpath::split(env.get(PATH_VAR).expect("PATH should be present"))
}

#[rstest]
fn test_activate_prepends_bin_and_sets_marker() {
    let mut env = env_with_path("/usr/bin:/usr/local/bin");
    activate(Path::new("/srv/venvs/app/.venv"), &mut env);

    assert_eq!(
        env.get(VIRTUAL_ENV_VAR).map(String::as_str),
        Some("/srv/venvs/app/.venv")
    );
    assert_eq!(
        path_parts(&env),
        vec!["/srv/venvs/app/.venv/bin", "/usr/bin", "/usr/local/bin"]
    );
}

#[rstest]
fn test_activate_twice_is_idempotent() {
    let mut env = env_with_path("/usr/bin");
    activate(Path::new("/srv/venvs/app/.venv"), &mut env);
    let after_first = env.clone();

    activate(Path::new("/srv/venvs/app/.venv"), &mut env);
    assert_eq!(env.get(PATH_VAR), after_first.get(PATH_VAR));

    let bin_occurrences = path_parts(&env)
        .iter()
        .filter(|part| *part == "/srv/venvs/app/.venv/bin")
        .count();
    assert_eq!(bin_occurrences, 1);
}

#[rstest]
fn test_activate_b_after_a_leaves_no_trace_of_a() {
    let mut env = env_with_path("/usr/bin");
    activate(Path::new("/srv/venvs/a/.venv"), &mut env);
    activate(Path::new("/srv/venvs/b/.venv"), &mut env);

    assert_eq!(
        env.get(VIRTUAL_ENV_VAR).map(String::as_str),
        Some("/srv/venvs/b/.venv")
    );
    let parts = path_parts(&env);
    assert!(parts.contains(&"/srv/venvs/b/.venv/bin".to_string()));
    assert!(!parts.contains(&"/srv/venvs/a/.venv/bin".to_string()));
}

#[rstest]
fn test_deactivate_restores_path_and_removes_marker() {
    let mut env = env_with_path("/usr/bin:/usr/local/bin");
    let original_path = env.get(PATH_VAR).cloned();

    activate(Path::new("/srv/venvs/app/.venv"), &mut env);
    deactivate(&mut env);

    assert!(env.get(VIRTUAL_ENV_VAR).is_none());
    assert_eq!(env.get(PATH_VAR), original_path.as_ref());
}

#[rstest]
fn test_deactivate_clears_poetry_flag() {
    let mut env = env_with_path("/srv/venvs/app/.venv/bin:/usr/bin");
    env.insert(
        VIRTUAL_ENV_VAR.to_string(),
        "/srv/venvs/app/.venv".to_string(),
    );
    env.insert("POETRY_ACTIVE".to_string(), "1".to_string());

    deactivate(&mut env);

    assert!(env.get(VIRTUAL_ENV_VAR).is_none());
    assert!(env.get("POETRY_ACTIVE").is_none());
    assert_eq!(path_parts(&env), vec!["/usr/bin"]);
}

#[rstest]
fn test_deactivate_without_activation_is_noop() {
    let mut env = env_with_path("/usr/bin");
    let before = env.clone();

    deactivate(&mut env);
    assert_eq!(env, before);
}

#[rstest]
fn test_activate_on_empty_env_creates_path() {
    let mut env = EnvMap::new();
    activate(Path::new("/srv/venvs/app/.venv"), &mut env);

    assert_eq!(path_parts(&env), vec!["/srv/venvs/app/.venv/bin"]);
}

#[rstest]
fn test_snapshot_is_a_value_copy() {
    let mut env = snapshot();
    env.insert("VENVX_TEST_SNAPSHOT".to_string(), "1".to_string());

    // Mutating the snapshot never touches the ambient environment.
    assert!(std::env::var("VENVX_TEST_SNAPSHOT").is_err());
}
