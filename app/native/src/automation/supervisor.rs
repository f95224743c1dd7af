//! Lifecycle of the detached automation process.

use std::num::NonZeroU64;
use std::os::unix::process::CommandExt;
use std::path::PathBuf;
use std::process::{Command, Stdio};

use crate::constants::LOOP_COMMAND;
use crate::platform::{process, thread};
use crate::wallpaper::WallpaperError;

/// Spawns, inspects and stops background automation processes.
pub trait Supervisor: Send + Sync {
    /// Starts a detached loop and returns its process id.
    ///
    /// # Errors
    ///
    /// Returns an error if the process cannot be started.
    fn spawn_loop(&self, interval: NonZeroU64, category: Option<&str>)
    -> Result<u32, WallpaperError>;

    /// Returns `true` if `pid` names a running process.
    fn is_alive(&self, pid: u32) -> bool;

    /// Requests graceful termination of `pid`. Returns `true` if the request was delivered.
    fn terminate(&self, pid: u32) -> bool;
}

/// Runs the loop as a re-invocation of the current executable.
#[derive(Debug, Clone)]
pub struct ProcessSupervisor {
    executable: PathBuf,
    config_path: Option<PathBuf>,
}

impl ProcessSupervisor {
    /// Creates a supervisor that launches `executable`.
    ///
    /// `config_path` is forwarded as `--config` so the loop sees the same settings.
    #[must_use]
    pub const fn new(executable: PathBuf, config_path: Option<PathBuf>) -> Self {
        Self { executable, config_path }
    }

    /// Creates a supervisor for the running executable.
    ///
    /// # Errors
    ///
    /// Returns an error if the executable path cannot be determined.
    pub fn current(config_path: Option<PathBuf>) -> Result<Self, WallpaperError> {
        let executable =
            std::env::current_exe().map_err(|err| WallpaperError::io("current executable", err))?;
        Ok(Self::new(executable, config_path))
    }

    /// Builds the loop command line.
    #[must_use]
    pub fn command(&self, interval: NonZeroU64, category: Option<&str>) -> Command {
        let mut command = Command::new(&self.executable);
        if let Some(config) = &self.config_path {
            command.arg("--config").arg(config);
        }
        command.arg(LOOP_COMMAND).arg(interval.to_string());
        if let Some(category) = category {
            command.arg(category);
        }
        command
    }
}

impl Supervisor for ProcessSupervisor {
    fn spawn_loop(
        &self,
        interval: NonZeroU64,
        category: Option<&str>,
    ) -> Result<u32, WallpaperError> {
        let mut child = self
            .command(interval, category)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .process_group(0)
            .spawn()
            .map_err(|err| WallpaperError::io(&self.executable, err))?;
        let pid = child.id();
        tracing::debug!(pid, interval = interval.get(), category, "automation process spawned");

        thread::spawn_named_thread("loop-reaper", move || {
            let _ = child.wait();
        });
        Ok(pid)
    }

    fn is_alive(&self, pid: u32) -> bool { process::is_alive(pid) }

    fn terminate(&self, pid: u32) -> bool { process::terminate(pid) }
}
