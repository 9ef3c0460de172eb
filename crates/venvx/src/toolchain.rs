// Copyright (c) Contributors to the venvx project.
// SPDX-License-Identifier: MIT

//! External provisioning tools behind a trait seam.
//!
//! Everything venvx delegates to the outside world goes through
//! [`Toolchain`]: creating virtualenvs, bootstrapping pip, installing and
//! upgrading packages, and the best-effort host prerequisite checks. The
//! lifecycle engine only sees this trait, so tests can script each step to
//! succeed or fail without a real interpreter on the machine.

use std::path::PathBuf;
use std::process::{Command, Stdio};

use crate::environment::EnvMap;
use crate::record::AppRecord;

/// URL of the pip bootstrap script for hosts without a usable pip.
const GET_PIP_URL: &str = "https://bootstrap.pypa.io/get-pip.py";

/// Destination for output of an external tool.
///
/// `Inherit` streams to the caller's console; `Capture` redirects both
/// stdout and stderr into the supplied file so the caller can replay it
/// later (e.g. only when provisioning fails).
#[derive(Debug)]
pub enum OutputTarget {
    Inherit,
    Capture(std::fs::File),
}

impl OutputTarget {
    fn stream(&self) -> crate::Result<Stdio> {
        match self {
            OutputTarget::Inherit => Ok(Stdio::inherit()),
            OutputTarget::Capture(file) => Ok(Stdio::from(file.try_clone()?)),
        }
    }
}

/// Run an external command to completion, raising on non-zero exit.
pub fn run_tool(command: &mut Command, out: &mut OutputTarget) -> crate::Result<()> {
    let rendered = render_command(command);
    tracing::debug!(command = %rendered, "running external tool");

    command
        .stdin(Stdio::inherit())
        .stdout(out.stream()?)
        .stderr(out.stream()?);

    let status = command.status().map_err(|e| crate::Error::ToolLaunch {
        command: rendered.clone(),
        error: e,
    })?;

    if !status.success() {
        return Err(crate::Error::ExternalTool {
            command: rendered,
            code: status.code(),
        });
    }
    Ok(())
}

fn render_command(command: &Command) -> String {
    let mut rendered = command.get_program().to_string_lossy().into_owned();
    for arg in command.get_args() {
        rendered.push(' ');
        rendered.push_str(&arg.to_string_lossy());
    }
    rendered
}

/// The external collaborators used while provisioning one record.
pub trait Toolchain {
    /// Best-effort host prerequisites: OS build packages, a host pip, and
    /// the venv module. Detection tooling that cannot run is skipped.
    fn ensure_host_prerequisites(&self, out: &mut OutputTarget) -> crate::Result<()>;

    /// Create the record's virtualenv.
    fn create_env(
        &self,
        record: &AppRecord,
        clean: bool,
        env: &EnvMap,
        out: &mut OutputTarget,
    ) -> crate::Result<()>;

    /// Bootstrap pip inside an existing virtualenv that lacks it.
    fn bootstrap_installer(
        &self,
        record: &AppRecord,
        env: &EnvMap,
        out: &mut OutputTarget,
    ) -> crate::Result<()>;

    /// Upgrade the virtualenv's pip itself.
    fn upgrade_installer(
        &self,
        record: &AppRecord,
        env: &EnvMap,
        out: &mut OutputTarget,
    ) -> crate::Result<()>;

    /// Install (or upgrade) the wheel build helper.
    fn install_build_helpers(
        &self,
        record: &AppRecord,
        upgrade: bool,
        env: &EnvMap,
        out: &mut OutputTarget,
    ) -> crate::Result<()>;

    /// Install (or eagerly upgrade) the package named by the record's spec.
    fn install_package(
        &self,
        record: &AppRecord,
        upgrade: bool,
        env: &EnvMap,
        out: &mut OutputTarget,
    ) -> crate::Result<()>;
}

/// [`Toolchain`] implementation that drives the real host tools.
#[derive(Debug, Default)]
pub struct SystemToolchain {
    bootstrap_dir: Option<PathBuf>,
}

impl SystemToolchain {
    /// Place bootstrap downloads (get-pip.py) under `bootstrap_dir`.
    pub fn new<P: Into<PathBuf>>(bootstrap_dir: P) -> Self {
        Self {
            bootstrap_dir: Some(bootstrap_dir.into()),
        }
    }

    fn bootstrap_dir(&self) -> PathBuf {
        self.bootstrap_dir
            .clone()
            .unwrap_or_else(std::env::temp_dir)
    }

    fn host_python(&self) -> crate::Result<PathBuf> {
        which::which("python3").map_err(|e| crate::Error::ToolLaunch {
            command: "python3".to_string(),
            error: std::io::Error::new(std::io::ErrorKind::NotFound, e),
        })
    }

    /// True when the host python can import `module`.
    fn host_module_exists(&self, module: &str) -> crate::Result<bool> {
        let python = self.host_python()?;
        let status = Command::new(python)
            .arg("-c")
            .arg(format!("import {module}"))
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status();
        Ok(matches!(status, Ok(s) if s.success()))
    }

    fn os_package_installed(&self, package: &str) -> bool {
        let output = Command::new("dpkg-query")
            .args(["--showformat=${Version}", "--show", package])
            .output();
        matches!(output, Ok(o) if o.status.success() && !o.stdout.is_empty())
    }

    /// Install missing Debian build packages, prompting for sudo.
    ///
    /// A failed attempt is logged and skipped: if the package really was
    /// required, the pip build fails later and provisioning rolls back.
    fn ensure_os_packages(&self, out: &mut OutputTarget) -> crate::Result<()> {
        if which::which("dpkg-query").is_err() {
            tracing::debug!("no dpkg-query on this host, skipping OS package check");
            return Ok(());
        }

        let mut missing: Vec<&str> = Vec::new();
        if !self.host_module_exists("distutils.cmd")? {
            // Some distributions strip distutils out of the base python.
            missing.push("python3-distutils");
        }
        if !self.os_package_installed("python3-dev") {
            // Required to build many wheels from source.
            missing.push("python3-dev");
        }
        if missing.is_empty() {
            return Ok(());
        }

        tracing::warn!(
            packages = %missing.join(", "),
            "sudo is required to install OS packages; enter the sudo password or CTRL-C and install them manually"
        );
        let mut command = Command::new("sudo");
        command.args(["apt-get", "install", "-y"]).args(&missing);
        if let Err(error) = run_tool(&mut command, out) {
            tracing::warn!(%error, "OS package installation failed, continuing without it");
        }
        Ok(())
    }

    fn local_bin_pip(&self) -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(".local").join("bin").join("pip3"))
    }

    /// A pip usable outside any virtualenv, bootstrapping one if needed.
    fn ensure_host_pip(&self, out: &mut OutputTarget) -> crate::Result<PathBuf> {
        if let Ok(pip) = which::which("pip3") {
            return Ok(pip);
        }

        let local_pip = self.local_bin_pip().ok_or_else(|| {
            std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "unable to determine the user home directory",
            )
        })?;
        if local_pip.exists() {
            return Ok(local_pip);
        }

        let bootstrap_dir = self.bootstrap_dir();
        std::fs::create_dir_all(&bootstrap_dir)?;
        let script = bootstrap_dir.join("get-pip.py");

        tracing::info!(url = GET_PIP_URL, "downloading pip bootstrap script");
        let body = reqwest::blocking::get(GET_PIP_URL)
            .and_then(|response| response.error_for_status())
            .and_then(|response| response.bytes())
            .map_err(|e| crate::Error::DownloadFailed {
                url: GET_PIP_URL.to_string(),
                error: e,
            })?;
        std::fs::write(&script, &body).map_err(|e| crate::Error::WriteFailed {
            path: script.clone(),
            error: e,
        })?;

        let python = self.host_python()?;
        run_tool(Command::new(&python).arg(&script).arg("--user"), out)?;

        if !local_pip.exists() {
            return Err(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("{} still does not exist after get-pip", local_pip.display()),
            )
            .into());
        }
        run_tool(
            Command::new(&local_pip).args(["install", "--upgrade", "--user", "pip"]),
            out,
        )?;
        Ok(local_pip)
    }

    /// Make sure the host python can create virtualenvs at all.
    fn ensure_venv_module(&self, out: &mut OutputTarget) -> crate::Result<()> {
        if self.host_module_exists("venv")? {
            return Ok(());
        }

        let pip = self.ensure_host_pip(out)?;
        run_tool(
            Command::new(&pip).args(["install", "--upgrade", "--user", "venv"]),
            out,
        )?;

        if !self.host_module_exists("venv")? {
            return Err(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "venv module still does not exist after pip install",
            )
            .into());
        }
        Ok(())
    }
}

impl Toolchain for SystemToolchain {
    fn ensure_host_prerequisites(&self, out: &mut OutputTarget) -> crate::Result<()> {
        self.ensure_os_packages(out)?;
        self.ensure_venv_module(out)
    }

    fn create_env(
        &self,
        record: &AppRecord,
        clean: bool,
        env: &EnvMap,
        out: &mut OutputTarget,
    ) -> crate::Result<()> {
        let python = self.host_python()?;
        let mut command = Command::new(python);
        command.env_clear().envs(env).arg("-m").arg("venv");
        if clean {
            command.arg("--clear");
        }
        command.arg(record.venv_dir());
        run_tool(&mut command, out)
    }

    fn bootstrap_installer(
        &self,
        record: &AppRecord,
        env: &EnvMap,
        out: &mut OutputTarget,
    ) -> crate::Result<()> {
        let mut command = Command::new(record.python());
        command.env_clear().envs(env).args(["-m", "ensurepip"]);
        run_tool(&mut command, out)
    }

    fn upgrade_installer(
        &self,
        record: &AppRecord,
        env: &EnvMap,
        out: &mut OutputTarget,
    ) -> crate::Result<()> {
        let mut command = Command::new(record.pip());
        command
            .env_clear()
            .envs(env)
            .args(["install", "--upgrade", "pip"]);
        run_tool(&mut command, out)
    }

    fn install_build_helpers(
        &self,
        record: &AppRecord,
        upgrade: bool,
        env: &EnvMap,
        out: &mut OutputTarget,
    ) -> crate::Result<()> {
        let mut command = Command::new(record.pip());
        command.env_clear().envs(env).arg("install");
        if upgrade {
            command.arg("--upgrade");
        }
        command.arg("wheel");
        run_tool(&mut command, out)
    }

    fn install_package(
        &self,
        record: &AppRecord,
        upgrade: bool,
        env: &EnvMap,
        out: &mut OutputTarget,
    ) -> crate::Result<()> {
        let mut command = Command::new(record.pip());
        command.env_clear().envs(env).arg("install");
        if upgrade {
            command.args(["--upgrade", "--upgrade-strategy", "eager"]);
        }
        command.arg(record.spec().canonical());
        run_tool(&mut command, out)
    }
}
