//! Automation CLI commands.

use std::num::NonZeroU64;

use crate::automation::{self, AutomationController, AutomationLoop, AutomationStatus, Schedule};
use crate::error::BackdropError;
use crate::wallpaper::WallpaperEngine;

/// Starts, replaces or stops the automation loop.
///
/// # Errors
///
/// Returns an error if the loop cannot be started or its record updated.
pub fn execute_auto(
    engine: &WallpaperEngine,
    controller: &AutomationController,
    interval: u64,
    category: Option<&str>,
) -> Result<(), BackdropError> {
    match automation::schedule(controller, engine, interval, category)? {
        Schedule::Started(started) => {
            if let Some(previous) = started.replaced {
                println!("Stopped previous automation (pid {previous})");
            }
            println!("Wallpaper will change every {interval} seconds (pid {})", started.pid);
        }
        Schedule::Stopped(Some(pid)) => println!("Automation stopped (pid {pid})"),
        Schedule::Stopped(None) => println!("Automation is not running"),
    }
    Ok(())
}

/// Prints whether the automation loop is running.
///
/// # Errors
///
/// Returns an error if the pid record cannot be read.
pub fn execute_status(controller: &AutomationController) -> Result<(), BackdropError> {
    match controller.status()? {
        AutomationStatus::Running(pid) => println!("Automation running (pid {pid})"),
        AutomationStatus::Idle => println!("Automation is not running"),
    }
    Ok(())
}

/// Runs the automation loop in this process until a shuffle fails.
///
/// # Errors
///
/// Returns the shuffle error that stopped the loop.
pub fn execute_loop(
    engine: &WallpaperEngine,
    controller: &AutomationController,
    interval: NonZeroU64,
    category: Option<String>,
) -> Result<(), BackdropError> {
    match AutomationLoop::new(interval, category).run(engine, controller) {
        Ok(never) => match never {},
        Err(err) => Err(err.into()),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use tempfile::TempDir;

    use super::*;
    use crate::testing::{FakeSupervisor, RecordingRunner};
    use crate::wallpaper::{EngineSettings, MemoryStateStore, StateStore};

    struct Fixture {
        _temp_dir: TempDir,
        supervisor: Arc<FakeSupervisor>,
        state: Arc<MemoryStateStore>,
        engine: WallpaperEngine,
        controller: AutomationController,
    }

    fn fixture() -> Fixture {
        let temp_dir = TempDir::new().unwrap();
        let settings =
            EngineSettings::with_dirs(temp_dir.path().join("walls"), temp_dir.path().join("cache"));
        let runner = Arc::new(RecordingRunner::new().producing("magick"));
        let state = Arc::new(MemoryStateStore::new());
        let supervisor = Arc::new(FakeSupervisor::new());
        let engine = WallpaperEngine::new(settings, runner, state.clone());
        let controller = AutomationController::new(supervisor.clone(), state.clone());
        Fixture { _temp_dir: temp_dir, supervisor, state, engine, controller }
    }

    #[test]
    fn test_auto_replaces_running_loop() {
        let fx = fixture();

        execute_auto(&fx.engine, &fx.controller, 5, None).unwrap();
        execute_auto(&fx.engine, &fx.controller, 10, None).unwrap();

        let alive = fx.supervisor.alive();
        assert_eq!(alive.len(), 1);
        assert_eq!(fx.state.automation_pid().unwrap(), Some(alive[0]));
        assert_eq!(fx.supervisor.spawned().last().unwrap().interval, 10);
    }

    #[test]
    fn test_auto_zero_stops_loop() {
        let fx = fixture();
        execute_auto(&fx.engine, &fx.controller, 5, None).unwrap();

        execute_auto(&fx.engine, &fx.controller, 0, None).unwrap();

        assert!(fx.supervisor.alive().is_empty());
        assert_eq!(fx.state.automation_pid().unwrap(), None);
    }

    #[test]
    fn test_status_clears_stale_record() {
        let fx = fixture();
        fx.state.set_automation_pid(4242).unwrap();

        execute_status(&fx.controller).unwrap();

        assert_eq!(fx.state.automation_pid().unwrap(), None);
    }

    #[test]
    fn test_loop_returns_selection_error() {
        let fx = fixture();

        let err = execute_loop(&fx.engine, &fx.controller, NonZeroU64::MIN, None).unwrap_err();

        assert!(err.is_invalid_input());
    }
}
