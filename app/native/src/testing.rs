//! In-memory fakes for the engine's external seams.
//!
//! [`RecordingRunner`] stands in for the external tools and
//! [`FakeSupervisor`] for the detached automation process. Both record what
//! they were asked to do so callers can assert on it.

use std::collections::{BTreeSet, HashSet};
use std::num::NonZeroU64;

use parking_lot::Mutex;

use crate::automation::Supervisor;
use crate::wallpaper::{CommandRunner, Invocation, WallpaperError};

/// Whether an invocation was run to completion or launched detached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallKind {
    /// Run and waited for.
    Run,
    /// Launched without waiting.
    Launch,
}

/// Command runner that records invocations instead of executing them.
///
/// Every program succeeds unless marked with [`failing`](Self::failing) or
/// [`missing`](Self::missing). Attempts are recorded even when they fail.
/// Programs marked with [`producing`](Self::producing) write placeholder
/// bytes to their last argument on success, like a transform writing its
/// output file.
#[derive(Debug, Default)]
pub struct RecordingRunner {
    calls: Mutex<Vec<(CallKind, Invocation)>>,
    terminated: Mutex<Vec<String>>,
    failing: HashSet<String>,
    missing: HashSet<String>,
    producing: HashSet<String>,
}

impl RecordingRunner {
    /// Creates a runner where every program succeeds.
    #[must_use]
    pub fn new() -> Self { Self::default() }

    /// Makes `program` exit unsuccessfully.
    #[must_use]
    pub fn failing(mut self, program: &str) -> Self {
        self.failing.insert(program.to_string());
        self
    }

    /// Makes `program` behave as if it were not installed.
    #[must_use]
    pub fn missing(mut self, program: &str) -> Self {
        self.missing.insert(program.to_string());
        self
    }

    /// Makes `program` write to its last argument when it succeeds.
    #[must_use]
    pub fn producing(mut self, program: &str) -> Self {
        self.producing.insert(program.to_string());
        self
    }

    fn outcome(&self, invocation: &Invocation) -> Result<(), WallpaperError> {
        let program = invocation.program();
        if self.missing.contains(program) {
            return Err(WallpaperError::MissingCapability(program.to_string()));
        }
        if self.failing.contains(program) {
            return Err(WallpaperError::ExternalFailure {
                command: invocation.to_string(),
                status: "exit status: 1".to_string(),
            });
        }
        match invocation.arguments().last() {
            Some(output) if self.producing.contains(program) => {
                std::fs::write(output, b"artifact").map_err(|err| WallpaperError::io(output, err))
            }
            _ => Ok(()),
        }
    }

    /// Returns every recorded invocation in call order.
    #[must_use]
    pub fn invocations(&self) -> Vec<Invocation> {
        self.calls.lock().iter().map(|(_, invocation)| invocation.clone()).collect()
    }

    /// Returns the detached launches in call order.
    #[must_use]
    pub fn launches(&self) -> Vec<Invocation> {
        self.calls
            .lock()
            .iter()
            .filter(|(kind, _)| *kind == CallKind::Launch)
            .map(|(_, invocation)| invocation.clone())
            .collect()
    }

    /// Returns the program names of every recorded invocation in call order.
    #[must_use]
    pub fn programs(&self) -> Vec<String> {
        self.calls.lock().iter().map(|(_, invocation)| invocation.program().to_string()).collect()
    }

    /// Counts invocations of `program`.
    #[must_use]
    pub fn count_program(&self, program: &str) -> usize {
        self.calls.lock().iter().filter(|(_, invocation)| invocation.program() == program).count()
    }

    /// Returns the process names passed to [`CommandRunner::terminate_all`].
    #[must_use]
    pub fn terminated(&self) -> Vec<String> { self.terminated.lock().clone() }
}

impl CommandRunner for RecordingRunner {
    fn run(&self, invocation: &Invocation) -> Result<(), WallpaperError> {
        self.calls.lock().push((CallKind::Run, invocation.clone()));
        self.outcome(invocation)
    }

    fn launch(&self, invocation: &Invocation) -> Result<(), WallpaperError> {
        self.calls.lock().push((CallKind::Launch, invocation.clone()));
        self.outcome(invocation)
    }

    fn terminate_all(&self, process_name: &str) -> usize {
        self.terminated.lock().push(process_name.to_string());
        0
    }
}

/// A loop started through [`FakeSupervisor`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpawnedLoop {
    /// Assigned process id.
    pub pid: u32,
    /// Seconds between wallpapers.
    pub interval: u64,
    /// Category the loop picks from.
    pub category: Option<String>,
}

#[derive(Debug, Default)]
struct SupervisorState {
    next_pid: u32,
    alive: BTreeSet<u32>,
    spawned: Vec<SpawnedLoop>,
    terminated: Vec<u32>,
}

/// Supervisor that tracks fake processes in memory.
#[derive(Debug)]
pub struct FakeSupervisor {
    state: Mutex<SupervisorState>,
    fail_spawn: bool,
}

impl Default for FakeSupervisor {
    fn default() -> Self {
        Self {
            state: Mutex::new(SupervisorState { next_pid: 1000, ..SupervisorState::default() }),
            fail_spawn: false,
        }
    }
}

impl FakeSupervisor {
    /// Creates a supervisor with no processes.
    #[must_use]
    pub fn new() -> Self { Self::default() }

    /// Makes every spawn fail.
    #[must_use]
    pub const fn failing_spawn(mut self) -> Self {
        self.fail_spawn = true;
        self
    }

    /// Registers a live process that was not spawned through this supervisor.
    pub fn add_live(&self, pid: u32) { self.state.lock().alive.insert(pid); }

    /// Simulates `pid` exiting on its own.
    pub fn kill(&self, pid: u32) { self.state.lock().alive.remove(&pid); }

    /// Returns the live process ids.
    #[must_use]
    pub fn alive(&self) -> Vec<u32> { self.state.lock().alive.iter().copied().collect() }

    /// Returns every loop spawned so far.
    #[must_use]
    pub fn spawned(&self) -> Vec<SpawnedLoop> { self.state.lock().spawned.clone() }

    /// Returns the process ids that received a termination request.
    #[must_use]
    pub fn terminated(&self) -> Vec<u32> { self.state.lock().terminated.clone() }
}

impl Supervisor for FakeSupervisor {
    fn spawn_loop(
        &self,
        interval: NonZeroU64,
        category: Option<&str>,
    ) -> Result<u32, WallpaperError> {
        if self.fail_spawn {
            return Err(WallpaperError::MissingCapability("backdrop".to_string()));
        }
        let mut state = self.state.lock();
        state.next_pid += 1;
        let pid = state.next_pid;
        state.alive.insert(pid);
        state.spawned.push(SpawnedLoop {
            pid,
            interval: interval.get(),
            category: category.map(str::to_string),
        });
        Ok(pid)
    }

    fn is_alive(&self, pid: u32) -> bool { self.state.lock().alive.contains(&pid) }

    fn terminate(&self, pid: u32) -> bool {
        let mut state = self.state.lock();
        state.terminated.push(pid);
        state.alive.remove(&pid)
    }
}
