// Copyright (c) Contributors to the venvx project.
// SPDX-License-Identifier: MIT

//! Implementation of the `venvx ls` command.

use clap::Args;
use venvx::CacheRoot;

/// List installed packages
#[derive(Debug, Args)]
pub struct CmdLs {}

impl CmdLs {
    pub fn run(&mut self, cache_root: &CacheRoot) -> venvx::Result<i32> {
        for spec in cache_root.installed_specs()? {
            println!("{spec}");
        }
        Ok(0)
    }
}
