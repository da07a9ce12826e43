//! Core traits that decouple winshift from any specific operating system or
//! transport mechanism.
//!
//! Every concrete backend (a native window server binding, the
//! [`SimDesktop`](crate::sim::SimDesktop), a test harness, …) implements
//! [`Host`].  The [`Dispatcher`](crate::dispatcher::Dispatcher) and the
//! [`SearchSession`](crate::search::SearchSession) only depend on these
//! abstractions.

use crate::command::{Command, ScreenId, WindowId, WindowInfo};
use crate::geometry::{Point, Rect};
use std::sync::mpsc;
use std::time::Duration;

/// What a modal overlay should display.
#[derive(Debug, Clone, PartialEq)]
pub struct ModalContent {
    pub text: String,
    /// Icon handle taken from [`AppInfo::icon`](crate::command::AppInfo::icon).
    pub icon: Option<String>,
    /// Auto-close after this long; `None` keeps the modal up until it is
    /// closed or replaced.
    pub duration: Option<Duration>,
    /// Font weight hint.
    pub weight: Option<f64>,
}

impl ModalContent {
    /// A persistent modal showing `text` only.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            icon: None,
            duration: None,
            weight: None,
        }
    }
}

/// Capabilities the host environment supplies to the core.
///
/// An implementation might talk to the platform's accessibility API, or it
/// might be an in-memory model used in tests.  All methods take `&self`;
/// implementations that record state use interior mutability.
///
/// Screen frames are always the *usable* area (menu bar and dock
/// excluded) in flipped coordinates.
pub trait Host {
    /// The error type produced by this host.
    type Error: std::error::Error + Send + 'static;

    //  Screens

    /// The screen that currently holds keyboard focus.
    fn main_screen(&self) -> Result<ScreenId, Self::Error>;

    /// The screen after `screen` in the host's cyclic ordering.  With a
    /// single screen this returns `screen` itself.
    fn next_screen(&self, screen: ScreenId) -> Result<ScreenId, Self::Error>;

    /// Usable frame of `screen`.
    fn screen_frame(&self, screen: ScreenId) -> Result<Rect, Self::Error>;

    /// The screen containing `point`, if any.
    fn screen_at(&self, point: Point) -> Result<Option<ScreenId>, Self::Error>;

    /// Current mouse pointer location.
    fn pointer_location(&self) -> Result<Point, Self::Error>;

    //  Windows

    /// The focused window, or `None` when nothing has focus.
    fn focused_window(&self) -> Result<Option<WindowId>, Self::Error>;

    /// All visible windows, front to back.
    fn visible_windows(&self) -> Result<Vec<WindowId>, Self::Error>;

    /// Title and owning application of `window`.
    fn window_info(&self, window: WindowId) -> Result<WindowInfo, Self::Error>;

    fn window_frame(&self, window: WindowId) -> Result<Rect, Self::Error>;

    fn set_window_frame(&self, window: WindowId, frame: Rect) -> Result<(), Self::Error>;

    /// The screen `window` is on.
    fn window_screen(&self, window: WindowId) -> Result<ScreenId, Self::Error>;

    /// The frame saved when `window` was maximized, or `None` if it is not
    /// maximized.
    fn restore_frame(&self, window: WindowId) -> Result<Option<Rect>, Self::Error>;

    /// Mark `window` maximized (`Some(frame to restore)`) or clear the flag
    /// (`None`).  Clearing an unmaximized window is a no-op.
    fn set_restore_frame(&self, window: WindowId, frame: Option<Rect>) -> Result<(), Self::Error>;

    fn focus_window(&self, window: WindowId) -> Result<(), Self::Error>;

    fn minimize_window(&self, window: WindowId) -> Result<(), Self::Error>;

    //  Modal

    /// Show (or replace) the modal, centered on `screen`.
    fn show_modal(&self, screen: ScreenId, content: &ModalContent) -> Result<(), Self::Error>;

    /// Close the modal if one is open.
    fn close_modal(&self) -> Result<(), Self::Error>;

    /// Surface a one-off message to the user.
    fn notify(&self, message: &str) -> Result<(), Self::Error>;

    //  Key chords

    /// Start delivering plain Tab / Shift-Tab to the open search session.
    fn enable_search_keys(&self) -> Result<(), Self::Error>;

    /// Stop delivering Tab / Shift-Tab.
    fn disable_search_keys(&self) -> Result<(), Self::Error>;
}

//  Command Source

/// A source of [`Command`]s.
///
/// Implementations listen on some transport (a Unix socket, a hotkey
/// daemon, an in-memory channel, …) and forward parsed commands into the
/// provided [`mpsc::Sender`].
///
/// # Contract
///
/// * [`run`](CommandSource::run) **blocks** until the source is exhausted or
///   an unrecoverable error occurs.
/// * Each received command must be sent through `sink` exactly once.
/// * Implementations must be [`Send`] so they can run on a dedicated thread.
pub trait CommandSource: Send {
    /// The error type produced by this source.
    type Error: std::error::Error + Send + 'static;

    /// Start listening and forward every incoming [`Command`] into `sink`.
    fn run(&mut self, sink: mpsc::Sender<Command>) -> Result<(), Self::Error>;
}
