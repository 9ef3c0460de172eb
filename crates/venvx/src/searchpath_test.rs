// Copyright (c) Contributors to the venvx project.
// SPDX-License-Identifier: MIT

use rstest::rstest;

use super::*;

fn parts(entries: &[&str]) -> Vec<String> {
    entries.iter().map(|entry| entry.to_string()).collect()
}

#[rstest]
fn test_split_drops_empty_segments() {
    let text = format!(
        "/usr/bin{sep}{sep}/usr/local/bin{sep}",
        sep = PATH_LIST_DELIMITER
    );
    assert_eq!(split(&text), parts(&["/usr/bin", "/usr/local/bin"]));
}

#[rstest]
fn test_join_is_inverse_of_split() {
    let entries = parts(&["/usr/bin", "/opt/tools/bin"]);
    assert_eq!(split(&join(&entries)), entries);
}

#[rstest]
fn test_split_empty_text() {
    assert!(split("").is_empty());
}

#[rstest]
fn test_contains_dir_normalizes_argument() {
    let entries = parts(&["/usr/bin", "/opt/tools/bin"]);
    assert!(contains_dir(&entries, "/usr/bin"));
    assert!(contains_dir(&entries, "/usr/bin/"));
    assert!(contains_dir(&entries, "/usr/./bin"));
    assert!(contains_dir(&entries, "/usr/share/../bin"));
    assert!(!contains_dir(&entries, "/usr/local/bin"));
}

#[rstest]
fn test_remove_dir_removes_all_occurrences() {
    let entries = parts(&["/a/bin", "/b/bin", "/a/bin", "/c/bin"]);
    let result = remove_dir(&entries, "/a/bin");
    assert_eq!(result, parts(&["/b/bin", "/c/bin"]));
    assert!(!contains_dir(&result, "/a/bin"));
}

#[rstest]
fn test_remove_dir_matches_tilde_form() {
    let home = dirs::home_dir().expect("home dir should resolve in tests");
    let home_bin = home.join("bin").to_string_lossy().into_owned();
    let entries = parts(&["/usr/bin", &home_bin]);

    let result = remove_dir(&entries, "~/bin");
    assert_eq!(result, parts(&["/usr/bin"]));
    assert!(!contains_dir(&result, "~/bin"));
}

#[rstest]
fn test_prepend_moves_existing_entry_to_front() {
    let entries = parts(&["/a/bin", "/b/bin"]);
    let result = prepend(&entries, "/b/bin");
    assert_eq!(result, parts(&["/b/bin", "/a/bin"]));
}

#[rstest]
fn test_prepend_if_missing_inserts_at_front() {
    let entries = parts(&["/a/bin"]);
    let result = prepend_if_missing(&entries, "/b/bin");
    assert_eq!(result, parts(&["/b/bin", "/a/bin"]));
}

#[rstest]
fn test_prepend_if_missing_is_idempotent() {
    let entries = parts(&["/a/bin"]);
    let once = prepend_if_missing(&entries, "/b/bin");
    let twice = prepend_if_missing(&once, "/b/bin");

    assert_eq!(once, twice);
    let occurrences = twice.iter().filter(|part| *part == "/b/bin").count();
    assert_eq!(occurrences, 1);
    assert_eq!(twice[0], "/b/bin");
}

#[rstest]
fn test_prepend_if_missing_preserves_existing_position() {
    let entries = parts(&["/a/bin", "/b/bin"]);
    let result = prepend_if_missing(&entries, "/b/bin");
    assert_eq!(result, entries);
}

#[rstest]
fn test_append_and_force_append() {
    let entries = parts(&["/a/bin", "/b/bin"]);

    // Plain append leaves an existing entry where it was.
    assert_eq!(append(&entries, "/a/bin"), entries);
    assert_eq!(
        append(&entries, "/c/bin"),
        parts(&["/a/bin", "/b/bin", "/c/bin"])
    );

    // Force append always ends up last.
    assert_eq!(
        force_append(&entries, "/a/bin"),
        parts(&["/b/bin", "/a/bin"])
    );
}

#[rstest]
fn test_normalize_dir_relative_forms() {
    let cwd = std::env::current_dir().expect("cwd should resolve in tests");
    let expected = cwd.join("sub").to_string_lossy().into_owned();
    assert_eq!(normalize_dir("sub"), expected);
    assert_eq!(normalize_dir("./sub"), expected);
    assert_eq!(normalize_dir("sub/nested/.."), expected);
}

#[rstest]
fn test_normalize_dir_parent_of_root() {
    assert_eq!(normalize_dir("/.."), normalize_dir("/"));
}
