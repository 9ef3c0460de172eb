// Copyright (c) Contributors to the venvx project.
// SPDX-License-Identifier: MIT

//! Implementation of the `venvx install` command.

use std::path::PathBuf;

use clap::Args;
use colored::Colorize;
use venvx::provision::provision;
use venvx::toolchain::{OutputTarget, SystemToolchain};
use venvx::{Action, CacheRoot, ProvisionOptions, Session};

/// Install a package into its own private virtualenv
#[derive(Debug, Args)]
pub struct CmdInstall {
    /// Update the package if it is already installed
    #[clap(short = 'u', long)]
    pub update: bool,

    /// Force a clean installation of the package
    #[clap(long)]
    pub clean: bool,

    /// Write the installed record's directory path to FILE
    #[clap(short = 'o', long = "app-path-file", value_name = "FILE")]
    pub app_path_file: Option<PathBuf>,

    /// The package to install, as provided to 'pip install'
    pub package_spec: String,
}

impl CmdInstall {
    pub fn run(&mut self, cache_root: &CacheRoot) -> venvx::Result<i32> {
        let session = Session::new();
        let spec = session.bind(&self.package_spec)?;
        let record = cache_root.record(spec);

        let options = ProvisionOptions {
            update: self.update,
            clean: self.clean,
        };
        let toolchain = SystemToolchain::new(cache_root.dir());
        let ambient = venvx::environment::snapshot();

        let action = provision(
            &record,
            &options,
            &toolchain,
            &ambient,
            &mut OutputTarget::Inherit,
        )?;

        let verb = match action {
            Action::Reuse => "Reused",
            Action::Upgrade => "Upgraded",
            Action::FullRebuild => "Installed",
        };
        println!("{} {}", verb.green().bold(), spec.canonical());

        if let Some(path_file) = &self.app_path_file {
            std::fs::write(path_file, record.app_dir().to_string_lossy().as_bytes()).map_err(
                |e| venvx::Error::WriteFailed {
                    path: path_file.clone(),
                    error: e,
                },
            )?;
        }

        Ok(0)
    }
}
