//! [`Host`] implementation backed by an in-memory model.
//!
//! A desktop is described by a [`DesktopLayout`], which can be loaded from
//! JSON:
//!
//! ```json
//! {
//!   "screens": [
//!     {"id": 1, "frame": {"x": 0, "y": 25, "width": 1440, "height": 875}}
//!   ],
//!   "windows": [
//!     {"id": 1, "title": "zsh",
//!      "app": {"name": "Terminal", "bundle_id": "com.apple.Terminal", "pid": 501},
//!      "frame": {"x": 100, "y": 100, "width": 800, "height": 500}}
//!   ],
//!   "focused": 1
//! }
//! ```
//!
//! Every mutation is logged and appended to a journal of [`Action`]s; the
//! journal keeps the most recent [`JOURNAL_LIMIT`] entries.

use crate::command::{AppInfo, ScreenId, WindowId, WindowInfo};
use crate::geometry::{Point, Rect};
use crate::traits::{Host, ModalContent};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};
use std::path::Path;

/// How many [`Action`]s the journal retains.
pub const JOURNAL_LIMIT: usize = 256;

/// A display and its usable frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimScreen {
    pub id: ScreenId,
    pub frame: Rect,
}

/// A window on the simulated desktop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimWindow {
    pub id: WindowId,
    pub title: String,
    pub app: AppInfo,
    pub frame: Rect,
    #[serde(default)]
    pub minimized: bool,
}

/// Initial state of a [`SimDesktop`].
///
/// `screens` are in cycling order; `windows` are front to back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DesktopLayout {
    pub screens: Vec<SimScreen>,
    #[serde(default)]
    pub windows: Vec<SimWindow>,
    #[serde(default)]
    pub focused: Option<WindowId>,
    #[serde(default)]
    pub pointer: Point,
}

impl DesktopLayout {
    /// Two screens, four windows, the terminal focused.
    pub fn demo() -> Self {
        let window = |id: u64, app: &str, bundle_id: &str, title: &str, frame: Rect| SimWindow {
            id: WindowId(id),
            title: title.into(),
            app: AppInfo {
                name: app.into(),
                bundle_id: bundle_id.into(),
                pid: 500 + id as u32,
                icon: None,
            },
            frame,
            minimized: false,
        };
        Self {
            screens: vec![
                SimScreen {
                    id: ScreenId(1),
                    frame: Rect::new(0.0, 25.0, 1440.0, 875.0),
                },
                SimScreen {
                    id: ScreenId(2),
                    frame: Rect::new(1440.0, 0.0, 1920.0, 1080.0),
                },
            ],
            windows: vec![
                window(1, "Terminal", "com.apple.Terminal", "zsh", Rect::new(100.0, 100.0, 800.0, 500.0)),
                window(2, "Safari", "com.apple.Safari", "Rust docs", Rect::new(300.0, 150.0, 1000.0, 700.0)),
                window(3, "Mail", "com.apple.mail", "Inbox", Rect::new(1600.0, 100.0, 1200.0, 800.0)),
                window(4, "Notes", "com.apple.Notes", "Groceries", Rect::new(2600.0, 300.0, 500.0, 600.0)),
            ],
            focused: Some(WindowId(1)),
            pointer: Point { x: 720.0, y: 450.0 },
        }
    }
}

/// Something the desktop was asked to do.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Focus(WindowId),
    Close(WindowId),
    SetFrame(WindowId, Rect),
    Minimize(WindowId),
    ShowModal(ScreenId, String),
    CloseModal,
    Notify(String),
    GrabSearchKeys,
    ReleaseSearchKeys,
}

/// Errors that can occur on the simulated desktop.
#[derive(Debug, thiserror::Error)]
pub enum SimError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("layout parse error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("layout has no screens")]
    NoScreens,
    #[error("unknown {0}")]
    UnknownWindow(WindowId),
    #[error("unknown {0}")]
    UnknownScreen(ScreenId),
    #[error("key {0:?} is held by another application")]
    KeyUnavailable(String),
}

#[derive(Debug)]
struct State {
    screens: Vec<SimScreen>,
    windows: Vec<SimWindow>,
    focused: Option<WindowId>,
    pointer: Point,
    restore: HashMap<WindowId, Rect>,
    modal: Option<(ScreenId, ModalContent)>,
    search_keys: bool,
    tab_available: bool,
    notifications: Vec<String>,
    journal: VecDeque<Action>,
}

impl State {
    fn window(&self, id: WindowId) -> Result<&SimWindow, SimError> {
        self.windows
            .iter()
            .find(|w| w.id == id)
            .ok_or(SimError::UnknownWindow(id))
    }

    fn window_mut(&mut self, id: WindowId) -> Result<&mut SimWindow, SimError> {
        self.windows
            .iter_mut()
            .find(|w| w.id == id)
            .ok_or(SimError::UnknownWindow(id))
    }

    fn screen(&self, id: ScreenId) -> Result<&SimScreen, SimError> {
        self.screens
            .iter()
            .find(|s| s.id == id)
            .ok_or(SimError::UnknownScreen(id))
    }

    fn screen_at(&self, point: Point) -> Option<ScreenId> {
        self.screens
            .iter()
            .find(|s| s.frame.contains(point))
            .map(|s| s.id)
    }

    /// The screen containing the window's center, or the first screen for
    /// a window that is entirely off-screen.
    fn screen_of(&self, id: WindowId) -> Result<ScreenId, SimError> {
        let center = self.window(id)?.frame.center();
        self.screen_at(center)
            .or_else(|| self.screens.first().map(|s| s.id))
            .ok_or(SimError::NoScreens)
    }
}

/// In-memory desktop.
///
/// All methods take `&self`; the state sits behind a [`RefCell`].
#[derive(Debug)]
pub struct SimDesktop {
    state: RefCell<State>,
}

impl SimDesktop {
    pub fn new(layout: DesktopLayout) -> Self {
        Self {
            state: RefCell::new(State {
                screens: layout.screens,
                windows: layout.windows,
                focused: layout.focused,
                pointer: layout.pointer,
                restore: HashMap::new(),
                modal: None,
                search_keys: false,
                tab_available: true,
                notifications: Vec::new(),
                journal: VecDeque::new(),
            }),
        }
    }

    /// Load a layout from a JSON file.
    pub fn load(path: &Path) -> Result<Self, SimError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    /// Parse and validate a JSON layout.
    pub fn from_json(text: &str) -> Result<Self, SimError> {
        let layout: DesktopLayout = serde_json::from_str(text)?;
        if layout.screens.is_empty() {
            return Err(SimError::NoScreens);
        }
        if let Some(focused) = layout.focused {
            if !layout.windows.iter().any(|w| w.id == focused) {
                return Err(SimError::UnknownWindow(focused));
            }
        }
        Ok(Self::new(layout))
    }

    //  Inspection

    /// A copy of the window's current state.
    pub fn window(&self, id: WindowId) -> Option<SimWindow> {
        self.state.borrow().window(id).ok().cloned()
    }

    /// The modal currently shown, if any.
    pub fn modal(&self) -> Option<(ScreenId, ModalContent)> {
        self.state.borrow().modal.clone()
    }

    pub fn search_keys_enabled(&self) -> bool {
        self.state.borrow().search_keys
    }

    pub fn notifications(&self) -> Vec<String> {
        self.state.borrow().notifications.clone()
    }

    /// The most recent things the desktop was asked to do, oldest first.
    pub fn journal(&self) -> Vec<Action> {
        self.state.borrow().journal.iter().cloned().collect()
    }

    /// Simulate another application holding (or releasing) the Tab key.
    pub fn set_tab_available(&self, available: bool) {
        self.state.borrow_mut().tab_available = available;
    }

    /// Move the mouse pointer.
    pub fn move_pointer(&self, to: Point) {
        self.state.borrow_mut().pointer = to;
    }

    /// Simulate a window being closed by its application.
    pub fn close_window(&self, id: WindowId) -> Result<(), SimError> {
        {
            let mut state = self.state.borrow_mut();
            let pos = state
                .windows
                .iter()
                .position(|w| w.id == id)
                .ok_or(SimError::UnknownWindow(id))?;
            state.windows.remove(pos);
            state.restore.remove(&id);
            if state.focused == Some(id) {
                let next = state.windows.iter().find(|w| !w.minimized).map(|w| w.id);
                state.focused = next;
            }
        }
        info!("sim: closed {}", id);
        self.record(Action::Close(id));
        Ok(())
    }

    fn record(&self, action: Action) {
        debug!("sim: {:?}", action);
        let mut state = self.state.borrow_mut();
        if state.journal.len() == JOURNAL_LIMIT {
            state.journal.pop_front();
        }
        state.journal.push_back(action);
    }
}

//  Host implementation

impl Host for SimDesktop {
    type Error = SimError;

    fn main_screen(&self) -> Result<ScreenId, SimError> {
        let state = self.state.borrow();
        match state.focused {
            Some(window) => state.screen_of(window),
            None => state.screens.first().map(|s| s.id).ok_or(SimError::NoScreens),
        }
    }

    fn next_screen(&self, screen: ScreenId) -> Result<ScreenId, SimError> {
        let state = self.state.borrow();
        let idx = state
            .screens
            .iter()
            .position(|s| s.id == screen)
            .ok_or(SimError::UnknownScreen(screen))?;
        Ok(state.screens[(idx + 1) % state.screens.len()].id)
    }

    fn screen_frame(&self, screen: ScreenId) -> Result<Rect, SimError> {
        Ok(self.state.borrow().screen(screen)?.frame)
    }

    fn screen_at(&self, point: Point) -> Result<Option<ScreenId>, SimError> {
        Ok(self.state.borrow().screen_at(point))
    }

    fn pointer_location(&self) -> Result<Point, SimError> {
        Ok(self.state.borrow().pointer)
    }

    fn focused_window(&self) -> Result<Option<WindowId>, SimError> {
        Ok(self.state.borrow().focused)
    }

    fn visible_windows(&self) -> Result<Vec<WindowId>, SimError> {
        Ok(self
            .state
            .borrow()
            .windows
            .iter()
            .filter(|w| !w.minimized)
            .map(|w| w.id)
            .collect())
    }

    fn window_info(&self, window: WindowId) -> Result<WindowInfo, SimError> {
        let state = self.state.borrow();
        let w = state.window(window)?;
        Ok(WindowInfo {
            id: w.id,
            title: w.title.clone(),
            app: w.app.clone(),
        })
    }

    fn window_frame(&self, window: WindowId) -> Result<Rect, SimError> {
        Ok(self.state.borrow().window(window)?.frame)
    }

    fn set_window_frame(&self, window: WindowId, frame: Rect) -> Result<(), SimError> {
        self.state.borrow_mut().window_mut(window)?.frame = frame;
        self.record(Action::SetFrame(window, frame));
        Ok(())
    }

    fn window_screen(&self, window: WindowId) -> Result<ScreenId, SimError> {
        self.state.borrow().screen_of(window)
    }

    fn restore_frame(&self, window: WindowId) -> Result<Option<Rect>, SimError> {
        let state = self.state.borrow();
        state.window(window)?;
        Ok(state.restore.get(&window).copied())
    }

    fn set_restore_frame(&self, window: WindowId, frame: Option<Rect>) -> Result<(), SimError> {
        let mut state = self.state.borrow_mut();
        state.window(window)?;
        match frame {
            Some(frame) => state.restore.insert(window, frame),
            None => state.restore.remove(&window),
        };
        Ok(())
    }

    fn focus_window(&self, window: WindowId) -> Result<(), SimError> {
        {
            let mut state = self.state.borrow_mut();
            let pos = state
                .windows
                .iter()
                .position(|w| w.id == window)
                .ok_or(SimError::UnknownWindow(window))?;
            let mut w = state.windows.remove(pos);
            w.minimized = false;
            state.windows.insert(0, w);
            state.focused = Some(window);
        }
        info!("sim: focused {}", window);
        self.record(Action::Focus(window));
        Ok(())
    }

    fn minimize_window(&self, window: WindowId) -> Result<(), SimError> {
        {
            let mut state = self.state.borrow_mut();
            state.window_mut(window)?.minimized = true;
            if state.focused == Some(window) {
                let next = state.windows.iter().find(|w| !w.minimized).map(|w| w.id);
                state.focused = next;
            }
        }
        info!("sim: minimized {}", window);
        self.record(Action::Minimize(window));
        Ok(())
    }

    fn show_modal(&self, screen: ScreenId, content: &ModalContent) -> Result<(), SimError> {
        self.state.borrow().screen(screen)?;
        info!("sim: modal on {}: {:?}", screen, content.text);
        self.state.borrow_mut().modal = Some((screen, content.clone()));
        self.record(Action::ShowModal(screen, content.text.clone()));
        Ok(())
    }

    fn close_modal(&self) -> Result<(), SimError> {
        if self.state.borrow_mut().modal.take().is_some() {
            self.record(Action::CloseModal);
        }
        Ok(())
    }

    fn notify(&self, message: &str) -> Result<(), SimError> {
        info!("sim: notification: {}", message);
        self.state.borrow_mut().notifications.push(message.to_string());
        self.record(Action::Notify(message.to_string()));
        Ok(())
    }

    fn enable_search_keys(&self) -> Result<(), SimError> {
        {
            let mut state = self.state.borrow_mut();
            if !state.tab_available {
                return Err(SimError::KeyUnavailable("tab".into()));
            }
            state.search_keys = true;
        }
        self.record(Action::GrabSearchKeys);
        Ok(())
    }

    fn disable_search_keys(&self) -> Result<(), SimError> {
        let was_enabled = std::mem::replace(&mut self.state.borrow_mut().search_keys, false);
        if was_enabled {
            self.record(Action::ReleaseSearchKeys);
        }
        Ok(())
    }
}

//  Tests
