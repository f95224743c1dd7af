//! Backdrop - wallpaper state and automation engine for Wayland sessions.
//!
//! This library provides the engine behind the `backdrop` command: setting a
//! wallpaper, deriving cached effect images, regenerating the color palette
//! and reloading themed components, random selection from a collection, and
//! a background loop that shuffles the wallpaper on a fixed interval.

pub mod automation;
pub mod cache;
pub mod cli;
pub mod config;
pub mod constants;
pub mod error;
pub mod platform;
pub mod schema;
#[cfg(any(test, feature = "test-support"))]
pub mod testing;
pub mod wallpaper;
