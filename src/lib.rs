//! **winshift**: keyboard-driven window tiling, shifting and incremental
//! window search.
//!
//! A window can be snapped to a screen half, maximized and restored, nudged
//! toward an edge in two stops, centered, or carried to the next screen
//! with its proportions intact.  An incremental search narrows the visible
//! windows by application name or title and focuses matches as you type.
//!
//! # Architecture
//!
//! The crate is organised around two core traits:
//!
//! * [`traits::Host`]: abstracts the window server (screens, windows,
//!   focus, the modal overlay and key registration) so the engines are not
//!   coupled to any specific platform.
//! * [`traits::CommandSource`]: abstracts the transport that delivers
//!   user intent (a Unix socket, a hotkey daemon, …) so the main loop is
//!   not coupled to any specific IPC mechanism.
//!
//! The engines ([`tiling`], [`shift`], [`search`]) are pure or depend only
//! on [`traits::Host`]; [`dispatcher`] wires them together.  Concrete
//! implementations live in [`sim`] (an in-memory desktop) and [`ipc`]
//! (Unix-socket command listener).

pub mod command;
pub mod config;
pub mod debounce;
pub mod dispatcher;
pub mod geometry;
pub mod ipc;
pub mod keymap;
pub mod search;
pub mod shift;
pub mod sim;
pub mod tiling;
pub mod traits;
