// Copyright (c) Contributors to the venvx project.
// SPDX-License-Identifier: MIT

//! Pure ordered-list operations over `PATH`-style search paths.
//!
//! A search path is an ordered sequence of directory strings joined by the
//! OS path-list delimiter. All operations here are string/list transforms:
//! nothing touches the filesystem, and a directory does not need to exist
//! to be added, matched, or removed.

use std::path::{Component, Path, PathBuf};

#[cfg(test)]
#[path = "./searchpath_test.rs"]
mod searchpath_test;

/// Delimiter between entries of a search path.
#[cfg(windows)]
pub const PATH_LIST_DELIMITER: char = ';';
/// Delimiter between entries of a search path.
#[cfg(not(windows))]
pub const PATH_LIST_DELIMITER: char = ':';

/// Split search-path text into entries, dropping empty segments.
pub fn split(searchpath: &str) -> Vec<String> {
    searchpath
        .split(PATH_LIST_DELIMITER)
        .filter(|part| !part.is_empty())
        .map(String::from)
        .collect()
}

/// Join entries back into search-path text. Inverse of [`split`].
pub fn join(parts: &[String]) -> String {
    parts.join(&PATH_LIST_DELIMITER.to_string())
}

/// Normalize a directory string for search-path comparisons.
///
/// Expands a leading `~`, absolutizes against the current directory, and
/// normalizes `.`/`..` components lexically. Symlinks are deliberately not
/// resolved: entries on a search path are compared as the user spelled
/// them, not as the filesystem would resolve them.
pub fn normalize_dir(dirname: &str) -> String {
    let expanded = expand_user(dirname);
    let absolute = if expanded.is_absolute() {
        expanded
    } else {
        std::env::current_dir().unwrap_or_default().join(expanded)
    };
    normalize_lexically(&absolute)
        .to_string_lossy()
        .into_owned()
}

/// True if the normalized form of `dirname` is present in `parts`.
pub fn contains_dir(parts: &[String], dirname: &str) -> bool {
    let dirname = normalize_dir(dirname);
    parts.iter().any(|part| *part == dirname)
}

/// Remove all occurrences of `dirname`, preserving the order of the rest.
pub fn remove_dir(parts: &[String], dirname: &str) -> Vec<String> {
    let dirname = normalize_dir(dirname);
    parts
        .iter()
        .filter(|part| **part != dirname)
        .cloned()
        .collect()
}

/// Insert `dirname` at the front, removing any prior occurrence.
pub fn prepend(parts: &[String], dirname: &str) -> Vec<String> {
    let normalized = normalize_dir(dirname);
    let mut result = vec![normalized.clone()];
    result.extend(remove_dir(parts, &normalized));
    result
}

/// Insert `dirname` at the front only if absent; an existing occurrence
/// keeps its position.
pub fn prepend_if_missing(parts: &[String], dirname: &str) -> Vec<String> {
    let normalized = normalize_dir(dirname);
    if parts.iter().any(|part| *part == normalized) {
        parts.to_vec()
    } else {
        let mut result = vec![normalized];
        result.extend(parts.iter().cloned());
        result
    }
}

/// Append `dirname` at the end only if absent.
pub fn append(parts: &[String], dirname: &str) -> Vec<String> {
    let normalized = normalize_dir(dirname);
    if parts.iter().any(|part| *part == normalized) {
        parts.to_vec()
    } else {
        let mut result = parts.to_vec();
        result.push(normalized);
        result
    }
}

/// Append `dirname` at the end, removing prior occurrences so the
/// directory always ends up last.
pub fn force_append(parts: &[String], dirname: &str) -> Vec<String> {
    let normalized = normalize_dir(dirname);
    let mut result = remove_dir(parts, &normalized);
    result.push(normalized);
    result
}

/// Expand a leading `~` to the user's home directory.
pub(crate) fn expand_user(dirname: &str) -> PathBuf {
    if dirname == "~" {
        if let Some(home) = dirs::home_dir() {
            return home;
        }
    } else if let Some(rest) = dirname.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    PathBuf::from(dirname)
}

/// Collapse `.` and `..` components without consulting the filesystem.
fn normalize_lexically(path: &Path) -> PathBuf {
    let mut result = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                // At the root, `..` has nowhere to go and is dropped.
                if !matches!(
                    result.components().next_back(),
                    None | Some(Component::RootDir) | Some(Component::Prefix(_))
                ) {
                    result.pop();
                }
            }
            other => result.push(other.as_os_str()),
        }
    }
    result
}
