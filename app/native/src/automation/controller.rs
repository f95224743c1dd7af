//! Single-instance control of the automation loop.
//!
//! The running loop is identified by the pid record in the state store. A
//! record naming a dead process is stale: it is cleared silently and the
//! controller reports idle.

use std::num::NonZeroU64;
use std::sync::Arc;

use super::supervisor::Supervisor;
use crate::wallpaper::{StateStore, WallpaperError};

/// Whether an automation loop is running.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AutomationStatus {
    /// No loop is running.
    Idle,
    /// A loop is running under this pid.
    Running(u32),
}

/// Result of starting a loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Started {
    /// Pid of the new loop.
    pub pid: u32,
    /// Pid of the loop it replaced, if one was running.
    pub replaced: Option<u32>,
}

/// Starts, stops and inspects the automation loop.
pub struct AutomationController {
    supervisor: Arc<dyn Supervisor>,
    state: Arc<dyn StateStore>,
}

impl AutomationController {
    /// Creates a controller.
    #[must_use]
    pub fn new(supervisor: Arc<dyn Supervisor>, state: Arc<dyn StateStore>) -> Self {
        Self { supervisor, state }
    }

    /// Returns the current status, clearing a stale record if one is found.
    ///
    /// # Errors
    ///
    /// Returns an error if the pid record cannot be read or cleared.
    pub fn status(&self) -> Result<AutomationStatus, WallpaperError> {
        let Some(pid) = self.state.automation_pid()? else {
            // Unparsable records read as absent; make sure they don't linger
            self.state.clear_automation_pid()?;
            return Ok(AutomationStatus::Idle);
        };

        if self.supervisor.is_alive(pid) {
            return Ok(AutomationStatus::Running(pid));
        }

        tracing::debug!(pid, "clearing stale automation record");
        self.state.clear_automation_pid()?;
        Ok(AutomationStatus::Idle)
    }

    /// Stops the running loop, if any, and clears its record.
    ///
    /// Returns the pid that was asked to stop.
    ///
    /// # Errors
    ///
    /// Returns an error if the pid record cannot be read or cleared.
    pub fn stop(&self) -> Result<Option<u32>, WallpaperError> {
        match self.status()? {
            AutomationStatus::Idle => Ok(None),
            AutomationStatus::Running(pid) => {
                if self.supervisor.terminate(pid) {
                    tracing::info!(pid, "automation stopped");
                } else {
                    tracing::debug!(pid, "automation process exited before termination");
                }
                self.state.clear_automation_pid()?;
                Ok(Some(pid))
            }
        }
    }

    /// Starts a loop that sets a new wallpaper every `interval` seconds.
    ///
    /// A loop that is already running is stopped first.
    ///
    /// # Errors
    ///
    /// Returns an error if the new process cannot be spawned or its record
    /// cannot be written.
    pub fn start(
        &self,
        interval: NonZeroU64,
        category: Option<&str>,
    ) -> Result<Started, WallpaperError> {
        let replaced = self.stop()?;
        let pid = self.supervisor.spawn_loop(interval, category)?;

        if let Err(err) = self.state.set_automation_pid(pid) {
            // An unrecorded loop could never be stopped
            self.supervisor.terminate(pid);
            return Err(err);
        }

        tracing::info!(pid, interval = interval.get(), category, "automation started");
        Ok(Started { pid, replaced })
    }

    /// Clears the record if it still names `pid`.
    ///
    /// Used by the loop itself on exit so that it never removes the record of
    /// a loop that superseded it.
    ///
    /// # Errors
    ///
    /// Returns an error if the pid record cannot be read or cleared.
    pub fn release(&self, pid: u32) -> Result<bool, WallpaperError> {
        if self.state.automation_pid()? == Some(pid) {
            self.state.clear_automation_pid()?;
            return Ok(true);
        }
        Ok(false)
    }
}

impl std::fmt::Debug for AutomationController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AutomationController").finish_non_exhaustive()
    }
}
