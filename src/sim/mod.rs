//! An in-memory desktop.
//!
//! This module provides a concrete [`Host`](crate::traits::Host) that keeps
//! screens, windows, focus and the modal in memory.  The daemon runs on it
//! when no native backend is available, and the dispatcher tests use it as
//! their desktop.
//!
//! Nothing outside this module should depend on the simulation's internals.

pub mod desktop;

pub use desktop::{Action, DesktopLayout, SimDesktop, SimError, SimScreen, SimWindow};
