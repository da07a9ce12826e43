//! IPC listener that accepts commands over a Unix socket.
//!
//! A hotkey daemon, a search-field helper or a plain script connects to the
//! socket and sends newline-delimited JSON commands.

pub mod listener;
