//! Process inspection and signalling.
//!
//! Liveness checks and termination requests go through `sysinfo` so that the
//! automation controller never needs to shell out to `kill` or `pkill`.

use std::ffi::OsStr;

use sysinfo::{Pid, Process, ProcessStatus, ProcessesToUpdate, Signal, System};

/// Returns `true` if the process has exited but still occupies a table slot.
fn is_defunct(process: &Process) -> bool {
    matches!(process.status(), ProcessStatus::Zombie | ProcessStatus::Dead)
}

/// Loads a process table restricted to `pid`.
fn system_for(pid: Pid) -> System {
    let mut system = System::new();
    system.refresh_processes(ProcessesToUpdate::Some(&[pid]), true);
    system
}

/// Returns `true` if a running (non-zombie) process with this id exists.
#[must_use]
pub fn is_alive(pid: u32) -> bool {
    let pid = Pid::from_u32(pid);
    system_for(pid).process(pid).is_some_and(|process| !is_defunct(process))
}

/// Requests graceful termination (`SIGTERM`) of a process.
///
/// Returns `true` if the signal was delivered.
#[must_use]
pub fn terminate(pid: u32) -> bool {
    let pid = Pid::from_u32(pid);
    let system = system_for(pid);
    let Some(process) = system.process(pid) else {
        return false;
    };
    if is_defunct(process) {
        return false;
    }
    process.kill_with(Signal::Term).unwrap_or(false)
}

/// Sends `SIGTERM` to every live process whose name is exactly `name`.
///
/// Returns the number of processes signalled.
#[must_use]
pub fn terminate_by_name(name: &str) -> usize {
    let mut system = System::new();
    system.refresh_processes(ProcessesToUpdate::All, true);

    let own_pid = std::process::id();
    system
        .processes_by_exact_name(OsStr::new(name))
        .filter(|process| process.pid().as_u32() != own_pid && !is_defunct(process))
        .filter(|process| process.kill_with(Signal::Term).unwrap_or(false))
        .count()
}
