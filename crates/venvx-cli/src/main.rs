// Copyright (c) Contributors to the venvx project.
// SPDX-License-Identifier: MIT

//! venvx - Per-Package Virtualenv Manager CLI

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use venvx::CacheRoot;

mod cmd_install;
mod cmd_locate;
mod cmd_ls;
mod cmd_run;
mod cmd_uninstall;
mod cmd_version;

use cmd_install::CmdInstall;
use cmd_locate::CmdLocate;
use cmd_ls::CmdLs;
use cmd_run::CmdRun;
use cmd_uninstall::CmdUninstall;
use cmd_version::CmdVersion;

#[derive(Parser)]
#[clap(
    name = "venvx",
    about = "Per-package virtualenv installer and runner",
    version,
    long_about = "Install Python applications into private per-package virtualenvs, cached by the content hash of the package spec, and run commands from them"
)]
struct Opt {
    #[clap(flatten)]
    logging: Logging,

    /// Display detailed exception information
    #[clap(long, visible_alias = "tb")]
    traceback: bool,

    /// Override the cache root directory
    #[clap(long, env = "VENVX_CACHE_DIR", value_name = "DIR")]
    cache_dir: Option<PathBuf>,

    #[clap(subcommand)]
    cmd: Command,
}

#[derive(Parser)]
struct Logging {
    /// Increase verbosity (-v, -vv, -vvv)
    #[clap(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[clap(short, long)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Install a package into its own private virtualenv
    Install(CmdInstall),

    /// Install a package and run a command from its virtualenv
    Run(CmdRun),

    /// Remove a previously installed package
    Uninstall(CmdUninstall),

    /// Print the record directory of an installed package
    Locate(CmdLocate),

    /// List installed packages
    Ls(CmdLs),

    /// Display the venvx version
    Version(CmdVersion),
}

impl Opt {
    fn run(self) -> venvx::Result<i32> {
        // Setup logging
        let log_level = match (self.logging.quiet, self.logging.verbose) {
            (true, _) => tracing::Level::ERROR,
            (false, 0) => tracing::Level::WARN,
            (false, 1) => tracing::Level::INFO,
            (false, 2) => tracing::Level::DEBUG,
            (false, _) => tracing::Level::TRACE,
        };

        tracing_subscriber::fmt()
            .with_max_level(log_level)
            .with_writer(std::io::stderr)
            .init();

        let cache_root = CacheRoot::resolve(self.cache_dir)?;
        let verbose = self.logging.verbose > 0;

        // Dispatch to command
        match self.cmd {
            Command::Install(mut cmd) => cmd.run(&cache_root),
            Command::Run(mut cmd) => cmd.run(&cache_root, verbose),
            Command::Uninstall(mut cmd) => cmd.run(&cache_root),
            Command::Locate(mut cmd) => cmd.run(&cache_root),
            Command::Ls(mut cmd) => cmd.run(&cache_root),
            Command::Version(mut cmd) => cmd.run(),
        }
    }
}

fn main() {
    let opt = Opt::parse();
    let traceback = opt.traceback;

    let code = match opt.run() {
        Ok(code) => code,
        Err(error) => {
            let code = error.exit_code();
            if traceback {
                eprintln!("{:?}", miette::Report::new(error));
            } else {
                eprintln!("venvx: error: {error}");
            }
            code
        }
    };
    std::process::exit(code);
}
