//! External command execution.
//!
//! Every external capability (display, palette, reloads, transform,
//! notifications) is reached through [`CommandRunner`]. The engine only builds
//! [`Invocation`]s; the system runner executes them, and tests substitute a
//! recording runner.

use std::ffi::{OsStr, OsString};
use std::os::unix::process::CommandExt;
use std::process::{Command, Stdio};

use super::error::WallpaperError;
use crate::platform::command::resolve_binary;
use crate::platform::{process, thread};

/// A program and its arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    program: String,
    args: Vec<OsString>,
}

impl Invocation {
    /// Creates an invocation of `program` with no arguments.
    #[must_use]
    pub fn new(program: impl Into<String>) -> Self {
        Self { program: program.into(), args: Vec::new() }
    }

    /// Parses a whitespace-separated command line such as `makoctl reload`.
    ///
    /// Returns `None` for blank lines.
    #[must_use]
    pub fn parse(line: &str) -> Option<Self> {
        let mut parts = line.split_whitespace();
        let program = parts.next()?;
        Some(Self::new(program).args(parts))
    }

    /// Appends one argument.
    #[must_use]
    pub fn arg(mut self, arg: impl AsRef<OsStr>) -> Self {
        self.args.push(arg.as_ref().to_os_string());
        self
    }

    /// Appends several arguments.
    #[must_use]
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        self.args.extend(args.into_iter().map(|arg| arg.as_ref().to_os_string()));
        self
    }

    /// Returns the program name or path.
    #[must_use]
    pub fn program(&self) -> &str { &self.program }

    /// Returns the arguments.
    #[must_use]
    pub fn arguments(&self) -> &[OsString] { &self.args }

    /// Returns the program's file name, used to find running instances.
    #[must_use]
    pub fn process_name(&self) -> &str {
        std::path::Path::new(&self.program)
            .file_name()
            .and_then(OsStr::to_str)
            .unwrap_or(self.program.as_str())
    }
}

impl std::fmt::Display for Invocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.program)?;
        for arg in &self.args {
            write!(f, " {}", arg.to_string_lossy())?;
        }
        Ok(())
    }
}

/// Executes external commands.
pub trait CommandRunner: Send + Sync {
    /// Runs the command to completion.
    ///
    /// # Errors
    ///
    /// Returns [`WallpaperError::MissingCapability`] if the program is not
    /// installed and [`WallpaperError::ExternalFailure`] if it exits unsuccessfully.
    fn run(&self, invocation: &Invocation) -> Result<(), WallpaperError>;

    /// Starts the command in its own process group and returns without waiting.
    ///
    /// # Errors
    ///
    /// Returns [`WallpaperError::MissingCapability`] if the program cannot be started.
    fn launch(&self, invocation: &Invocation) -> Result<(), WallpaperError>;

    /// Requests termination of every running process named `process_name`.
    ///
    /// Returns the number of processes signalled.
    fn terminate_all(&self, process_name: &str) -> usize;
}

/// Runs commands as real child processes.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

impl SystemRunner {
    fn command(invocation: &Invocation) -> Result<Command, WallpaperError> {
        let binary = resolve_binary(invocation.program()).map_err(|reason| {
            tracing::debug!(program = invocation.program(), %reason, "binary not resolved");
            WallpaperError::MissingCapability(invocation.program().to_string())
        })?;
        let mut command = Command::new(binary);
        command.args(invocation.arguments()).stdin(Stdio::null());
        Ok(command)
    }
}

impl CommandRunner for SystemRunner {
    fn run(&self, invocation: &Invocation) -> Result<(), WallpaperError> {
        tracing::debug!(command = %invocation, "running");
        let output = Self::command(invocation)?.output().map_err(|err| {
            tracing::debug!(command = %invocation, error = %err, "failed to start");
            WallpaperError::MissingCapability(invocation.program().to_string())
        })?;

        if output.status.success() {
            return Ok(());
        }

        let stderr = String::from_utf8_lossy(&output.stderr);
        if !stderr.trim().is_empty() {
            tracing::debug!(command = %invocation, stderr = %stderr.trim(), "command stderr");
        }
        Err(WallpaperError::ExternalFailure {
            command: invocation.to_string(),
            status: output.status.to_string(),
        })
    }

    fn launch(&self, invocation: &Invocation) -> Result<(), WallpaperError> {
        tracing::debug!(command = %invocation, "launching");
        let mut child = Self::command(invocation)?
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .process_group(0)
            .spawn()
            .map_err(|err| {
                tracing::debug!(command = %invocation, error = %err, "failed to launch");
                WallpaperError::MissingCapability(invocation.program().to_string())
            })?;

        // Reap the child when it exits so long-running loops don't collect zombies
        thread::spawn_named_thread("reaper", move || {
            let _ = child.wait();
        });
        Ok(())
    }

    fn terminate_all(&self, process_name: &str) -> usize {
        let count = process::terminate_by_name(process_name);
        if count > 0 {
            tracing::info!(process = process_name, count, "terminated running instances");
        }
        count
    }
}
