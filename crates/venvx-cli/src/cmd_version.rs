// Copyright (c) Contributors to the venvx project.
// SPDX-License-Identifier: MIT

//! Implementation of the `venvx version` command.

use clap::Args;

/// Display the venvx version
#[derive(Debug, Args)]
pub struct CmdVersion {}

impl CmdVersion {
    pub fn run(&mut self) -> venvx::Result<i32> {
        println!("{}", env!("CARGO_PKG_VERSION"));
        Ok(0)
    }
}
