//! Commands and types used throughout winshift.
//!
//! This module defines the vocabulary that all components share:
//! [`Command`] describes every action the dispatcher can perform, and
//! [`Direction`] / [`Rotation`] / [`WindowInfo`] provide the supporting
//! data types.
//!
//! Direction strings on the wire are parsed leniently ("left", "Left",
//! " DOWN ").

use crate::keymap::Chord;
use serde::de::Error as DeError;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Direction for tiling and shifting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Direction {
    Left,
    Right,
    Up,
    Down,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Left => write!(f, "left"),
            Direction::Right => write!(f, "right"),
            Direction::Up => write!(f, "up"),
            Direction::Down => write!(f, "down"),
        }
    }
}

/// Parse a direction string (case-insensitive, surrounding whitespace ignored).
pub fn parse_direction(s: &str) -> Option<Direction> {
    match s.trim().to_lowercase().as_str() {
        "left" => Some(Direction::Left),
        "right" => Some(Direction::Right),
        "up" => Some(Direction::Up),
        "down" => Some(Direction::Down),
        _ => None,
    }
}

impl<'de> Deserialize<'de> for Direction {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        parse_direction(&s).ok_or_else(|| DeError::custom(format!("invalid direction: {:?}", s)))
    }
}

/// Direction in which an open search session cycles through its matches.
///
/// `Forward` takes the front match and requeues it at the back (Shift-Tab);
/// `Backward` takes the back match and requeues it at the front (Tab).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Rotation {
    Forward,
    Backward,
}

impl fmt::Display for Rotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rotation::Forward => write!(f, "forward"),
            Rotation::Backward => write!(f, "backward"),
        }
    }
}

/// Opaque identifier of an OS window, assigned by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WindowId(pub u64);

impl fmt::Display for WindowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "window#{}", self.0)
    }
}

/// Opaque identifier of a physical display, assigned by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ScreenId(pub u32);

impl fmt::Display for ScreenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "screen#{}", self.0)
    }
}

/// Every action the dispatcher can perform.
///
/// Commands are produced by [`CommandSource`](crate::traits::CommandSource)
/// implementations and consumed by the
/// [`Dispatcher`](crate::dispatcher::Dispatcher).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Command {
    /// A raw key chord; resolved through the [`Keymap`](crate::keymap::Keymap).
    Chord(Chord),

    /// Resize the focused window to the half of its screen in the given
    /// direction.
    Tile(Direction),

    /// Fill the usable screen, or restore the frame saved by the previous
    /// toggle.
    ToggleMaximize,

    /// Move the focused window toward a screen edge without resizing it.
    Shift(Direction),

    /// Center the focused window on its screen without resizing it.
    Center,

    /// Move the focused window to the next screen, keeping its proportions.
    MoveToNextScreen,

    /// Show application, title, frame and process details of the focused
    /// window in a modal.
    ShowWindowInfo,

    /// Minimize the focused window.
    Minimize,

    /// Log the screen under the mouse pointer.
    LocatePointer,

    /// Open an incremental window search.
    OpenSearch,

    /// The search filter text changed.
    SearchInput(String),

    /// Cycle through the current search matches.
    SearchRotate(Rotation),

    /// Accept the current search state (Enter).
    SearchSubmit,

    /// Abandon the search and restore the original focus (Escape).
    SearchCancel,

    /// The host's set of screens changed.
    ScreensChanged,
}

/// The application that owns a window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppInfo {
    /// Display name, e.g. `"Safari"`.
    pub name: String,
    /// Bundle identifier, e.g. `"com.apple.Safari"`.
    pub bundle_id: String,
    /// Process id.
    pub pid: u32,
    /// Icon handle the modal sink knows how to draw, if any.
    #[serde(default)]
    pub icon: Option<String>,
}

/// Descriptive information about a window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowInfo {
    pub id: WindowId,
    /// Human-readable title.
    pub title: String,
    pub app: AppInfo,
}
