// Copyright (c) Contributors to the venvx project.
// SPDX-License-Identifier: MIT

//! Implementation of the `venvx locate` command.

use clap::Args;
use venvx::{CacheRoot, Session};

/// Print the record directory of an installed package
#[derive(Debug, Args)]
pub struct CmdLocate {
    /// The previously installed package, exactly as provided to 'install' or 'run'
    pub package_spec: String,
}

impl CmdLocate {
    pub fn run(&mut self, cache_root: &CacheRoot) -> venvx::Result<i32> {
        let session = Session::new();
        let spec = session.bind(&self.package_spec)?;
        let record = cache_root.record(spec);

        if !record.exists() {
            return Err(venvx::Error::NotInstalled {
                spec: spec.canonical().to_string(),
            });
        }

        println!("{}", record.app_dir().display());
        Ok(0)
    }
}
