// Copyright (c) Contributors to the venvx project.
// SPDX-License-Identifier: MIT

//! Error types for venvx operations.

use miette::Diagnostic;
use std::path::PathBuf;
use thiserror::Error;

/// Convenience Result type with venvx Error.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur during venvx operations.
#[derive(Error, Diagnostic, Debug)]
pub enum Error {
    /// Bad or missing arguments
    #[error("{0}")]
    #[diagnostic(code(venvx::usage))]
    Usage(String),

    /// No record exists for the requested spec
    #[error("Package is not installed (must match exactly): {spec}")]
    #[diagnostic(
        code(venvx::not_installed),
        help("Run 'venvx ls' to see installed package specs")
    )]
    NotInstalled { spec: String },

    /// Provisioning failed; the record directory has been removed
    #[error("Failed to provision environment for {spec}")]
    #[diagnostic(code(venvx::provisioning_failed))]
    Provisioning {
        spec: String,
        #[source]
        source: Box<Error>,
    },

    /// External program could not be started
    #[error("Failed to launch {command}")]
    #[diagnostic(
        code(venvx::tool_launch),
        help("Check that the program is installed and on PATH")
    )]
    ToolLaunch {
        command: String,
        #[source]
        error: std::io::Error,
    },

    /// External program exited with a non-zero status
    #[error("Command {command} exited with {}", exit_description(*code))]
    #[diagnostic(code(venvx::external_tool))]
    ExternalTool { command: String, code: Option<i32> },

    /// Programming error: a session invariant was violated
    #[error("Invariant violation: {0}")]
    #[diagnostic(code(venvx::invariant_violation))]
    InvariantViolation(String),

    /// No usable cache directory on this platform
    #[error("Unable to determine a cache directory for this user")]
    #[diagnostic(
        code(venvx::cache_root_unavailable),
        help("Set VENVX_CACHE_DIR or pass --cache-dir explicitly")
    )]
    CacheRootUnavailable,

    /// Failed to read file
    #[error("Failed to read file: {path:?}")]
    #[diagnostic(code(venvx::read_failed))]
    ReadFailed {
        path: PathBuf,
        #[source]
        error: std::io::Error,
    },

    /// Failed to write file
    #[error("Failed to write file: {path:?}")]
    #[diagnostic(code(venvx::write_failed))]
    WriteFailed {
        path: PathBuf,
        #[source]
        error: std::io::Error,
    },

    /// Bootstrap download failed
    #[error("Failed to download {url}")]
    #[diagnostic(code(venvx::download_failed))]
    DownloadFailed {
        url: String,
        #[source]
        error: reqwest::Error,
    },

    /// IO error passthrough
    #[error(transparent)]
    #[diagnostic(code(venvx::io_error))]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Exit-code hint consumed at the CLI boundary.
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::Usage(_) => 2,
            _ => 1,
        }
    }
}

fn exit_description(code: Option<i32>) -> String {
    match code {
        Some(code) => format!("exit code {code}"),
        None => "a signal".to_string(),
    }
}
