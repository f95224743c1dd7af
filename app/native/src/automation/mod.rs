//! Background wallpaper automation.
//!
//! `backdrop auto <interval>` records a detached `backdrop _loop` process that
//! shuffles the wallpaper on a timer. Only one loop runs at a time: starting a
//! new one stops the previous one first.

mod controller;
mod supervisor;

use std::convert::Infallible;
use std::num::NonZeroU64;
use std::time::Duration;

pub use controller::{AutomationController, AutomationStatus, Started};
pub use supervisor::{ProcessSupervisor, Supervisor};

use crate::wallpaper::{WallpaperEngine, WallpaperError};

/// Outcome of [`schedule`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Schedule {
    /// A loop was started.
    Started(Started),
    /// Automation was turned off. Holds the pid that was stopped, if any.
    Stopped(Option<u32>),
}

/// Starts automation every `interval` seconds, or stops it when `interval` is zero.
///
/// The user is notified either way.
///
/// # Errors
///
/// Returns an error if the loop cannot be started or its record cannot be updated.
pub fn schedule(
    controller: &AutomationController,
    engine: &WallpaperEngine,
    interval: u64,
    category: Option<&str>,
) -> Result<Schedule, WallpaperError> {
    let Some(interval) = NonZeroU64::new(interval) else {
        let stopped = controller.stop()?;
        engine.notify("Wallpaper automation stopped", None);
        return Ok(Schedule::Stopped(stopped));
    };

    let started = controller.start(interval, category)?;
    engine.notify(&format!("Wallpaper will change every {interval} seconds"), None);
    Ok(Schedule::Started(started))
}

/// The body of the detached automation process.
#[derive(Debug, Clone)]
pub struct AutomationLoop {
    interval: Duration,
    category: Option<String>,
    pid: u32,
}

impl AutomationLoop {
    /// Creates a loop for the current process.
    #[must_use]
    pub fn new(interval: NonZeroU64, category: Option<String>) -> Self {
        Self::with_pid(interval, category, std::process::id())
    }

    /// Creates a loop that owns the record for `pid`.
    #[must_use]
    pub fn with_pid(interval: NonZeroU64, category: Option<String>, pid: u32) -> Self {
        Self { interval: Duration::from_secs(interval.get()), category, pid }
    }

    /// Shuffles the wallpaper, then sleeps, forever.
    ///
    /// # Errors
    ///
    /// Returns the first shuffle error. The pid record is released and the user
    /// notified before returning.
    pub fn run(
        &self,
        engine: &WallpaperEngine,
        controller: &AutomationController,
    ) -> Result<Infallible, WallpaperError> {
        self.run_with(engine, controller, std::thread::sleep)
    }

    /// Like [`run`](Self::run), with a custom sleep.
    ///
    /// # Errors
    ///
    /// See [`run`](Self::run).
    pub fn run_with<S>(
        &self,
        engine: &WallpaperEngine,
        controller: &AutomationController,
        mut sleep: S,
    ) -> Result<Infallible, WallpaperError>
    where
        S: FnMut(Duration),
    {
        tracing::info!(
            pid = self.pid,
            interval = self.interval.as_secs(),
            category = self.category.as_deref(),
            "automation loop running"
        );

        loop {
            if let Err(err) = engine.shuffle(self.category.as_deref()) {
                tracing::error!(error = %err, "automation stopped");
                if let Err(release_err) = controller.release(self.pid) {
                    tracing::warn!(error = %release_err, "failed to clear automation record");
                }
                engine.notify("Automation stopped.", Some("Error setting wallpaper"));
                return Err(err);
            }
            sleep(self.interval);
        }
    }
}
