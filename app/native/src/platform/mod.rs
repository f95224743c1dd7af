//! Platform helpers for Backdrop.
//!
//! - [`command`] - Locating external executables
//! - [`fs`] - Atomic file replacement
//! - [`path`] - Shell-like path expansion
//! - [`process`] - Process liveness and signalling
//! - [`thread`] - Named background threads

pub mod command;
pub mod fs;
pub mod path;
pub mod process;
pub mod thread;
