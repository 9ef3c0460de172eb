// Copyright (c) Contributors to the venvx project.
// SPDX-License-Identifier: MIT

//! Implementation of the `venvx run` command.

use clap::Args;
use venvx::provision::provision;
use venvx::toolchain::{OutputTarget, SystemToolchain, run_tool};
use venvx::{CacheRoot, ProvisionOptions, Session};

/// Install a package and run a command from its virtualenv
#[derive(Debug, Args)]
pub struct CmdRun {
    /// Update the package if it is already installed
    #[clap(short = 'u', long)]
    pub update: bool,

    /// Force a clean installation of the package
    #[clap(long)]
    pub clean: bool,

    /// The package to install, as provided to 'pip install'
    pub package_spec: String,

    /// Command and arguments as they would run inside the virtualenv
    #[clap(last = true)]
    pub command: Vec<String>,
}

impl CmdRun {
    pub fn run(&mut self, cache_root: &CacheRoot, verbose: bool) -> venvx::Result<i32> {
        let session = Session::new();
        let spec = session.bind(&self.package_spec)?;
        let record = cache_root.record(spec);

        let options = ProvisionOptions {
            update: self.update,
            clean: self.clean,
        };
        let toolchain = SystemToolchain::new(cache_root.dir());
        let ambient = venvx::environment::snapshot();

        if verbose {
            provision(
                &record,
                &options,
                &toolchain,
                &ambient,
                &mut OutputTarget::Inherit,
            )?;
        } else {
            // Capture install chatter and replay it only when provisioning
            // fails; a quiet run should not echo a successful install.
            let log = tempfile::NamedTempFile::new()?;
            let mut out = OutputTarget::Capture(log.as_file().try_clone()?);
            if let Err(error) = provision(&record, &options, &toolchain, &ambient, &mut out) {
                if let Ok(content) = std::fs::read_to_string(log.path()) {
                    eprint!("{content}");
                }
                return Err(error);
            }
        }

        if self.command.is_empty() {
            return Ok(0);
        }

        let program = record.resolve_program(&self.command[0]);
        let mut venv_env = ambient.clone();
        venvx::environment::activate(&record.venv_dir(), &mut venv_env);

        tracing::info!(program = %program.display(), "running command in virtualenv");

        // The environment is valid at this point: a failure here belongs to
        // the user's command and performs no rollback.
        let mut command = std::process::Command::new(&program);
        command
            .args(&self.command[1..])
            .env_clear()
            .envs(&venv_env);
        run_tool(&mut command, &mut OutputTarget::Inherit)?;

        Ok(0)
    }
}
