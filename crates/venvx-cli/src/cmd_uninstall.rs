// Copyright (c) Contributors to the venvx project.
// SPDX-License-Identifier: MIT

//! Implementation of the `venvx uninstall` command.

use clap::Args;
use colored::Colorize;
use venvx::{CacheRoot, Session};

/// Remove a previously installed package
#[derive(Debug, Args)]
pub struct CmdUninstall {
    /// The previously installed package, exactly as provided to 'install' or 'run'
    pub package_spec: String,
}

impl CmdUninstall {
    pub fn run(&mut self, cache_root: &CacheRoot) -> venvx::Result<i32> {
        let session = Session::new();
        let spec = session.bind(&self.package_spec)?;
        let record = cache_root.record(spec);

        if !record.exists() {
            return Err(venvx::Error::NotInstalled {
                spec: spec.canonical().to_string(),
            });
        }

        record.remove()?;
        println!("{} {}", "Removed".green().bold(), spec.canonical());

        Ok(0)
    }
}
