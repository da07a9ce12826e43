//! The orchestrator that ties the engines, the search session and the host
//! together.
//!
//! [`Dispatcher`] reacts to [`Command`]s by asking the host for the focused
//! window and its screen, running the tiling or shift engine, and handing
//! the resulting [`Placement`] back to the host.  It also owns the (at most
//! one) open [`SearchSession`] and the timers that go with it: the filter
//! debounce and the delayed refocus after a search is abandoned.

use crate::command::{Command, WindowId};
use crate::config::Config;
use crate::debounce::Debouncer;
use crate::geometry::{FrameRatio, Rect};
use crate::keymap::Keymap;
use crate::search::{CloseReason, SearchSession, SessionError};
use crate::tiling::{self, MaximizedFlag, Placement};
use crate::traits::{Host, ModalContent};
use crate::shift;
use log::{debug, error, info};
use std::time::{Duration, Instant};

/// Possible errors from the dispatcher.
#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    /// The host returned an error.
    #[error("host error: {0}")]
    Host(String),
    /// A search session could not be opened or driven.
    #[error(transparent)]
    Session(#[from] SessionError),
}

fn host_err<E: std::error::Error>(e: E) -> DispatchError {
    DispatchError::Host(e.to_string())
}

/// A second focus attempt scheduled after a search closed.
#[derive(Debug, Clone, Copy)]
struct DeferredFocus {
    at: Instant,
    window: WindowId,
}

/// Routes commands to the tiling engine, the shift engine or the open
/// search session.
///
/// The dispatcher is generic over any [`Host`] implementation.
///
/// # Typical usage
///
/// ```ignore
/// let mut dispatcher = Dispatcher::new(host, Config::default());
/// dispatcher.handle(Command::Tile(Direction::Left))?;
/// // Timers: call `poll` no later than `next_deadline`.
/// dispatcher.poll(Instant::now())?;
/// ```
pub struct Dispatcher<H: Host> {
    host: H,
    config: Config,
    keymap: Keymap,
    search: Option<SearchSession>,
    filter: Debouncer<String>,
    deferred: Vec<DeferredFocus>,
}

impl<H: Host> Dispatcher<H> {
    pub fn new(host: H, config: Config) -> Self {
        Self {
            keymap: Keymap::new(&config.keys),
            filter: Debouncer::new(config.search.filter_debounce()),
            host,
            config,
            search: None,
            deferred: Vec::new(),
        }
    }

    /// Return a shared reference to the underlying host.
    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The open search session, if any.
    pub fn search(&self) -> Option<&SearchSession> {
        self.search.as_ref()
    }

    pub fn is_searching(&self) -> bool {
        self.search.is_some()
    }

    /// Process a single [`Command`] now.
    pub fn handle(&mut self, cmd: Command) -> Result<(), DispatchError> {
        self.handle_at(cmd, Instant::now())
    }

    /// Process a single [`Command`] as if it arrived at `now`.
    ///
    /// Having no focused window is not an error: window commands simply do
    /// nothing.
    pub fn handle_at(&mut self, cmd: Command, now: Instant) -> Result<(), DispatchError> {
        match cmd {
            Command::Chord(chord) => match self.keymap.resolve(&chord) {
                Some(resolved) => {
                    debug!("chord {:?} -> {:?}", chord, resolved);
                    return self.handle_at(resolved, now);
                }
                None => debug!("unbound chord {:?}", chord),
            },

            Command::Tile(dir) => {
                info!("tile {}", dir);
                self.place(|_, frame, screen| Ok(tiling::tile(dir, frame, screen)))?;
            }

            Command::ToggleMaximize => {
                info!("toggle maximize");
                self.place(|window, frame, screen| {
                    let restore = self.host.restore_frame(window).map_err(host_err)?;
                    Ok(tiling::toggle_maximize(frame, screen, restore))
                })?;
            }

            Command::Shift(dir) => {
                info!("shift {}", dir);
                self.place(|_, frame, screen| Ok(shift::shift(dir, frame, screen)))?;
            }

            Command::Center => {
                info!("center");
                self.place(|_, frame, screen| Ok(shift::center(frame, screen)))?;
            }

            Command::MoveToNextScreen => {
                info!("move to next screen");
                self.move_to_next_screen()?;
            }

            Command::ShowWindowInfo => {
                debug!("show window info");
                self.show_window_info()?;
            }

            Command::Minimize => {
                if let Some(window) = self.focused()? {
                    info!("minimize {}", window);
                    self.host.minimize_window(window).map_err(host_err)?;
                }
            }

            Command::LocatePointer => self.locate_pointer()?,

            Command::OpenSearch => self.open_search()?,

            Command::SearchInput(text) => {
                if self.search.is_none() {
                    debug!("search input {:?} without a session, ignored", text);
                    return Ok(());
                }
                self.filter.push(text, now);
                self.apply_settled_filter(now)?;
            }

            Command::SearchRotate(rotation) => {
                self.apply_pending_filter()?;
                match self.search.as_mut() {
                    Some(session) => {
                        session.rotate(&self.host, rotation)?;
                    }
                    None => debug!("rotate {} without a session, ignored", rotation),
                }
            }

            Command::SearchSubmit => {
                self.apply_pending_filter()?;
                self.close_search(CloseReason::Submit, now);
            }

            Command::SearchCancel => {
                self.filter.clear();
                self.close_search(CloseReason::Cancel, now);
            }

            Command::ScreensChanged => info!("screens changed"),
        }
        Ok(())
    }

    //  Timers

    /// Run whatever has come due by `now`: a settled filter update and any
    /// delayed refocus.
    ///
    /// A refocus that fails is logged and dropped; the others still run.
    pub fn poll(&mut self, now: Instant) -> Result<(), DispatchError> {
        self.apply_settled_filter(now)?;

        let (due, later): (Vec<DeferredFocus>, Vec<DeferredFocus>) =
            std::mem::take(&mut self.deferred)
                .into_iter()
                .partition(|d| d.at <= now);
        self.deferred = later;
        for d in due {
            debug!("refocusing {} again", d.window);
            if let Err(e) = self.host.focus_window(d.window) {
                error!("refocus of {} failed: {}", d.window, e);
            }
        }
        Ok(())
    }

    /// The earliest instant at which [`poll`](Self::poll) has work to do.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.deferred
            .iter()
            .map(|d| d.at)
            .chain(self.filter.deadline())
            .min()
    }

    //  Placement

    fn focused(&self) -> Result<Option<WindowId>, DispatchError> {
        let window = self.host.focused_window().map_err(host_err)?;
        if window.is_none() {
            debug!("no focused window, nothing to do");
        }
        Ok(window)
    }

    /// Compute a placement for the focused window from its frame and its
    /// screen's usable frame, then apply it.
    fn place<F>(&self, compute: F) -> Result<(), DispatchError>
    where
        F: FnOnce(WindowId, Rect, Rect) -> Result<Placement, DispatchError>,
    {
        let Some(window) = self.focused()? else {
            return Ok(());
        };
        let frame = self.host.window_frame(window).map_err(host_err)?;
        let screen = self.host.window_screen(window).map_err(host_err)?;
        let screen_frame = self.host.screen_frame(screen).map_err(host_err)?;
        let placement = compute(window, frame, screen_frame)?;
        self.apply(window, placement)
    }

    fn apply(&self, window: WindowId, placement: Placement) -> Result<(), DispatchError> {
        debug!("  {} -> {:?}", window, placement.frame);
        match placement.maximized {
            MaximizedFlag::Keep => {}
            MaximizedFlag::Clear => {
                self.host.set_restore_frame(window, None).map_err(host_err)?;
            }
            MaximizedFlag::Set { restore } => {
                self.host
                    .set_restore_frame(window, Some(restore))
                    .map_err(host_err)?;
            }
        }
        self.host
            .set_window_frame(window, placement.frame)
            .map_err(host_err)
    }

    fn move_to_next_screen(&self) -> Result<(), DispatchError> {
        let Some(window) = self.focused()? else {
            return Ok(());
        };
        let from = self.host.window_screen(window).map_err(host_err)?;
        let to = self.host.next_screen(from).map_err(host_err)?;
        if from == to {
            debug!("only one screen, nothing to move to");
            return Ok(());
        }

        let frame = self.host.window_frame(window).map_err(host_err)?;
        let ratio = FrameRatio::new(
            self.host.screen_frame(from).map_err(host_err)?,
            self.host.screen_frame(to).map_err(host_err)?,
        );
        // A maximized window restores onto the screen it now lives on.
        let maximized = match self.host.restore_frame(window).map_err(host_err)? {
            Some(restore) => MaximizedFlag::Set {
                restore: ratio.apply(restore),
            },
            None => MaximizedFlag::Keep,
        };
        info!("  {} -> {}", from, to);
        self.apply(
            window,
            Placement {
                frame: ratio.apply(frame),
                maximized,
            },
        )
    }

    fn locate_pointer(&self) -> Result<(), DispatchError> {
        let pointer = self.host.pointer_location().map_err(host_err)?;
        match self.host.screen_at(pointer).map_err(host_err)? {
            Some(screen) => info!("pointer at ({}, {}) on {}", pointer.x, pointer.y, screen),
            None => debug!("pointer at ({}, {}) is off-screen", pointer.x, pointer.y),
        }
        Ok(())
    }

    fn show_window_info(&self) -> Result<(), DispatchError> {
        let Some(window) = self.focused()? else {
            return Ok(());
        };
        let info = self.host.window_info(window).map_err(host_err)?;
        let frame = self.host.window_frame(window).map_err(host_err)?;
        let msg = [
            format!("Application: {}", info.app.name),
            format!("Title: {}", info.title),
            format!("Frame: X={}, Y={}", frame.x, frame.y),
            format!("Size: H={}, W={}", frame.height, frame.width),
            format!("Bundle ID: {}", info.app.bundle_id),
            format!("PID: {}", info.app.pid),
        ]
        .join("\n");
        info!("window information:\n{}", msg);

        let screen = self.host.main_screen().map_err(host_err)?;
        let content = ModalContent {
            text: msg,
            icon: info.app.icon,
            duration: Some(Duration::from_secs(self.config.info.duration_secs)),
            weight: Some(self.config.info.weight),
        };
        self.host.show_modal(screen, &content).map_err(host_err)
    }

    //  Search

    fn open_search(&mut self) -> Result<(), DispatchError> {
        if self.search.is_some() {
            debug!("search already open");
            return Ok(());
        }
        match SearchSession::open(&self.host, &self.config.search.prompt) {
            Ok(session) => {
                self.filter.clear();
                self.search = Some(session);
                Ok(())
            }
            Err(e @ SessionError::KeyRegistration(_)) => {
                error!("{}", e);
                if let Err(notify_err) = self.host.notify("search: could not enable tab") {
                    error!("notify failed: {}", notify_err);
                }
                Err(e.into())
            }
            Err(e) => Err(e.into()),
        }
    }

    fn apply_settled_filter(&mut self, now: Instant) -> Result<(), DispatchError> {
        if let Some(filter) = self.filter.take_settled(now) {
            self.update_filter(&filter)?;
        }
        Ok(())
    }

    fn apply_pending_filter(&mut self) -> Result<(), DispatchError> {
        if let Some(filter) = self.filter.flush() {
            self.update_filter(&filter)?;
        }
        Ok(())
    }

    fn update_filter(&mut self, filter: &str) -> Result<(), DispatchError> {
        if let Some(session) = self.search.as_mut() {
            session.update_filter(&self.host, filter)?;
        }
        Ok(())
    }

    fn close_search(&mut self, reason: CloseReason, now: Instant) {
        let Some(session) = self.search.take() else {
            debug!("no search to close");
            return;
        };
        let outcome = session.close(&self.host, reason);
        if let Some(window) = outcome.retry_focus {
            self.deferred.push(DeferredFocus {
                at: now + self.config.search.refocus_retry(),
                window,
            });
        }
    }
}

//  Tests

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::{AppInfo, Direction, Rotation, ScreenId};
    use crate::geometry::Point;
    use crate::keymap::Chord;
    use crate::sim::{Action, DesktopLayout, SimDesktop, SimScreen, SimWindow};

    fn window(id: u64, app: &str, title: &str, frame: Rect) -> SimWindow {
        SimWindow {
            id: WindowId(id),
            title: title.into(),
            app: AppInfo {
                name: app.into(),
                bundle_id: format!("com.example.{}", app.to_lowercase()),
                pid: 4000 + id as u32,
                icon: Some(format!("{}.icns", app.to_lowercase())),
            },
            frame,
            minimized: false,
        }
    }

    /// Two screens side by side; the right one has twice the resolution.
    fn layout() -> DesktopLayout {
        DesktopLayout {
            screens: vec![
                SimScreen {
                    id: ScreenId(1),
                    frame: Rect::new(0.0, 25.0, 1280.0, 800.0),
                },
                SimScreen {
                    id: ScreenId(2),
                    frame: Rect::new(1280.0, 0.0, 2560.0, 1600.0),
                },
            ],
            windows: vec![
                window(1, "Terminal", "zsh", Rect::new(100.0, 125.0, 640.0, 400.0)),
                window(2, "Safari", "Rust docs", Rect::new(300.0, 200.0, 800.0, 500.0)),
                window(3, "Mail", "Inbox", Rect::new(2000.0, 200.0, 800.0, 600.0)),
            ],
            focused: Some(WindowId(1)),
            pointer: Point { x: 640.0, y: 400.0 },
        }
    }

    fn make_dispatcher() -> Dispatcher<SimDesktop> {
        Dispatcher::new(SimDesktop::new(layout()), Config::default())
    }

    fn frame_of(d: &Dispatcher<SimDesktop>, id: u64) -> Rect {
        d.host().window(WindowId(id)).unwrap().frame
    }

    fn focus_count(d: &Dispatcher<SimDesktop>, id: u64) -> usize {
        d.host()
            .journal()
            .iter()
            .filter(|a| **a == Action::Focus(WindowId(id)))
            .count()
    }

    //  Tiling

    #[test]
    fn tile_left_takes_left_half() {
        let mut d = make_dispatcher();
        d.handle(Command::Tile(Direction::Left)).unwrap();
        assert_eq!(frame_of(&d, 1), Rect::new(0.0, 25.0, 640.0, 800.0));
    }

    #[test]
    fn tile_down_keeps_horizontal_geometry() {
        let mut d = make_dispatcher();
        d.handle(Command::Tile(Direction::Down)).unwrap();
        assert_eq!(frame_of(&d, 1), Rect::new(100.0, 425.0, 640.0, 400.0));
    }

    #[test]
    fn tiling_clears_maximized_flag() {
        let mut d = make_dispatcher();
        d.handle(Command::ToggleMaximize).unwrap();
        assert!(d.host().restore_frame(WindowId(1)).unwrap().is_some());
        d.handle(Command::Tile(Direction::Right)).unwrap();
        assert_eq!(d.host().restore_frame(WindowId(1)).unwrap(), None);
        assert_eq!(frame_of(&d, 1), Rect::new(640.0, 25.0, 640.0, 800.0));

        // Not maximized any more, so the next toggle maximizes again.
        d.handle(Command::ToggleMaximize).unwrap();
        assert_eq!(frame_of(&d, 1), Rect::new(0.0, 25.0, 1280.0, 800.0));
    }

    #[test]
    fn maximize_toggle_twice_restores_frame() {
        let mut d = make_dispatcher();
        let original = frame_of(&d, 1);
        d.handle(Command::ToggleMaximize).unwrap();
        assert_eq!(frame_of(&d, 1), Rect::new(0.0, 25.0, 1280.0, 800.0));
        d.handle(Command::ToggleMaximize).unwrap();
        assert_eq!(frame_of(&d, 1), original);
        d.handle(Command::ToggleMaximize).unwrap();
        d.handle(Command::ToggleMaximize).unwrap();
        assert_eq!(frame_of(&d, 1), original);
    }

    //  Shift

    #[test]
    fn shift_right_then_left_toggles_between_two_stops() {
        let mut d = make_dispatcher();
        d.handle(Command::Shift(Direction::Right)).unwrap();
        assert_eq!(frame_of(&d, 1).x, 320.0);
        d.handle(Command::Shift(Direction::Right)).unwrap();
        assert_eq!(frame_of(&d, 1).x, 640.0);
        d.handle(Command::Shift(Direction::Left)).unwrap();
        assert_eq!(frame_of(&d, 1).x, 320.0);
        d.handle(Command::Shift(Direction::Left)).unwrap();
        assert_eq!(frame_of(&d, 1).x, 320.0);
    }

    #[test]
    fn center_keeps_size() {
        let mut d = make_dispatcher();
        d.handle(Command::Center).unwrap();
        assert_eq!(frame_of(&d, 1), Rect::new(320.0, 225.0, 640.0, 400.0));
    }

    //  Screens

    #[test]
    fn move_to_next_screen_keeps_proportions() {
        let mut d = make_dispatcher();
        d.handle(Command::MoveToNextScreen).unwrap();
        assert_eq!(frame_of(&d, 1), Rect::new(1480.0, 200.0, 1280.0, 800.0));
        assert_eq!(d.host().window_screen(WindowId(1)).unwrap(), ScreenId(2));
        assert_eq!(d.host().restore_frame(WindowId(1)).unwrap(), None);
    }

    #[test]
    fn maximized_window_unmaximizes_on_its_new_screen() {
        let mut d = make_dispatcher();
        d.handle(Command::ToggleMaximize).unwrap();
        d.handle(Command::MoveToNextScreen).unwrap();
        assert_eq!(frame_of(&d, 1), Rect::new(1280.0, 0.0, 2560.0, 1600.0));
        assert_eq!(
            d.host().restore_frame(WindowId(1)).unwrap(),
            Some(Rect::new(1480.0, 200.0, 1280.0, 800.0))
        );

        d.handle(Command::ToggleMaximize).unwrap();
        assert_eq!(frame_of(&d, 1), Rect::new(1480.0, 200.0, 1280.0, 800.0));
        assert_eq!(d.host().window_screen(WindowId(1)).unwrap(), ScreenId(2));
        assert_eq!(d.host().restore_frame(WindowId(1)).unwrap(), None);
    }

    #[test]
    fn move_to_next_screen_with_one_screen_is_noop() {
        let mut l = layout();
        l.screens.truncate(1);
        l.windows.truncate(2);
        let mut d = Dispatcher::new(SimDesktop::new(l), Config::default());
        let before = frame_of(&d, 1);
        d.handle(Command::MoveToNextScreen).unwrap();
        assert_eq!(frame_of(&d, 1), before);
    }

    //  No focus

    #[test]
    fn window_commands_without_focus_are_noops() {
        let mut l = layout();
        l.focused = None;
        let mut d = Dispatcher::new(SimDesktop::new(l), Config::default());
        for cmd in [
            Command::Tile(Direction::Left),
            Command::Tile(Direction::Up),
            Command::ToggleMaximize,
            Command::Shift(Direction::Right),
            Command::Center,
            Command::MoveToNextScreen,
            Command::ShowWindowInfo,
            Command::Minimize,
        ] {
            d.handle(cmd).unwrap();
        }
        assert!(d.host().journal().is_empty(), "got {:?}", d.host().journal());
    }

    //  Chords and misc

    #[test]
    fn hyper_chord_dispatches_tile() {
        let mut d = make_dispatcher();
        let chord = Chord::new("j", d.config().keys.hyper.clone());
        d.handle(Command::Chord(chord)).unwrap();
        assert_eq!(frame_of(&d, 1), Rect::new(0.0, 25.0, 640.0, 800.0));
    }

    #[test]
    fn hyper_shift_return_centers() {
        let mut d = make_dispatcher();
        let chord = Chord::new("return", d.config().keys.hyper_shift.clone());
        d.handle(Command::Chord(chord)).unwrap();
        assert_eq!(frame_of(&d, 1), Rect::new(320.0, 225.0, 640.0, 400.0));
    }

    #[test]
    fn unbound_chord_is_ignored() {
        let mut d = make_dispatcher();
        d.handle(Command::Chord(Chord::new("x", ["ctrl"]))).unwrap();
        assert!(d.host().journal().is_empty());
    }

    #[test]
    fn locate_pointer_only_logs() {
        let mut d = make_dispatcher();
        d.handle(Command::LocatePointer).unwrap();
        d.host().move_pointer(Point { x: -50.0, y: -50.0 });
        let chord = Chord::new("m", d.config().keys.hyper.clone());
        d.handle(Command::Chord(chord)).unwrap();
        assert!(d.host().journal().is_empty());
    }

    #[test]
    fn window_info_shows_details() {
        let mut d = make_dispatcher();
        d.handle(Command::ShowWindowInfo).unwrap();
        let (screen, modal) = d.host().modal().expect("info modal");
        assert_eq!(screen, ScreenId(1));
        assert_eq!(
            modal.text,
            "Application: Terminal\nTitle: zsh\nFrame: X=100, Y=125\nSize: H=400, W=640\n\
             Bundle ID: com.example.terminal\nPID: 4001"
        );
        assert_eq!(modal.icon.as_deref(), Some("terminal.icns"));
        assert_eq!(modal.duration, Some(Duration::from_secs(10)));
    }

    #[test]
    fn minimize_hides_window() {
        let mut d = make_dispatcher();
        d.handle(Command::Minimize).unwrap();
        assert!(d.host().window(WindowId(1)).unwrap().minimized);
        assert!(!d.host().visible_windows().unwrap().contains(&WindowId(1)));
    }

    //  Search

    #[test]
    fn search_commits_to_match() {
        let mut d = make_dispatcher();
        d.handle(Command::OpenSearch).unwrap();
        assert!(d.is_searching());
        assert!(d.host().search_keys_enabled());

        d.handle(Command::SearchInput("mail".into())).unwrap();
        assert_eq!(d.host().focused_window().unwrap(), Some(WindowId(3)));
        let (screen, modal) = d.host().modal().expect("search modal");
        assert_eq!(screen, ScreenId(1));
        assert_eq!(modal.text, "Search: mail\n1 results");

        d.handle(Command::SearchSubmit).unwrap();
        assert!(!d.is_searching());
        assert!(d.host().modal().is_none());
        assert!(!d.host().search_keys_enabled());
        assert_eq!(d.host().focused_window().unwrap(), Some(WindowId(3)));
        assert_eq!(d.next_deadline(), None);
    }

    #[test]
    fn cancel_with_empty_filter_focuses_original_twice() {
        let mut d = make_dispatcher();
        let t0 = Instant::now();
        d.handle_at(Command::OpenSearch, t0).unwrap();
        d.handle_at(Command::SearchCancel, t0).unwrap();
        assert_eq!(focus_count(&d, 1), 1);

        d.poll(t0 + Duration::from_millis(199)).unwrap();
        assert_eq!(focus_count(&d, 1), 1);
        assert_eq!(d.next_deadline(), Some(t0 + Duration::from_millis(200)));

        d.poll(t0 + Duration::from_millis(200)).unwrap();
        assert_eq!(focus_count(&d, 1), 2);
        d.poll(t0 + Duration::from_secs(5)).unwrap();
        assert_eq!(focus_count(&d, 1), 2);
    }

    #[test]
    fn failed_refocus_does_not_drop_the_others() {
        let mut d = make_dispatcher();
        let t0 = Instant::now();
        d.handle_at(Command::OpenSearch, t0).unwrap();
        d.handle_at(Command::SearchCancel, t0).unwrap();

        d.host().focus_window(WindowId(2)).unwrap();
        let t1 = t0 + Duration::from_millis(10);
        d.handle_at(Command::OpenSearch, t1).unwrap();
        d.handle_at(Command::SearchCancel, t1).unwrap();
        assert_eq!(focus_count(&d, 2), 2);

        // Window 1 goes away before its retry runs.
        d.host().close_window(WindowId(1)).unwrap();
        d.poll(t0 + Duration::from_secs(1)).unwrap();
        assert_eq!(focus_count(&d, 2), 3);
        assert_eq!(d.host().focused_window().unwrap(), Some(WindowId(2)));
        assert_eq!(d.next_deadline(), None);
    }

    #[test]
    fn rotate_cycles_through_matches() {
        let mut d = make_dispatcher();
        d.handle(Command::OpenSearch).unwrap();
        // "zsh" and "Safari"
        d.handle(Command::SearchInput("s".into())).unwrap();
        let matches = d.search().unwrap().matches();
        assert_eq!(matches, vec![WindowId(1), WindowId(2)]);
        assert_eq!(d.host().focused_window().unwrap(), Some(WindowId(1)));
        d.handle(Command::SearchRotate(Rotation::Forward)).unwrap();
        assert_eq!(d.host().focused_window().unwrap(), Some(WindowId(2)));
        d.handle(Command::SearchRotate(Rotation::Backward)).unwrap();
        assert_eq!(d.host().focused_window().unwrap(), Some(WindowId(1)));
    }

    #[test]
    fn filter_updates_are_debounced() {
        let mut config = Config::default();
        config.search.filter_debounce_ms = 50;
        let mut d = Dispatcher::new(SimDesktop::new(layout()), config);
        let t0 = Instant::now();
        d.handle_at(Command::OpenSearch, t0).unwrap();
        d.handle_at(Command::SearchInput("m".into()), t0).unwrap();
        d.handle_at(Command::SearchInput("ma".into()), t0 + Duration::from_millis(10))
            .unwrap();
        assert_eq!(d.search().unwrap().filter(), "");
        assert_eq!(d.next_deadline(), Some(t0 + Duration::from_millis(60)));

        d.poll(t0 + Duration::from_millis(59)).unwrap();
        assert_eq!(d.search().unwrap().filter(), "");

        d.poll(t0 + Duration::from_millis(60)).unwrap();
        assert_eq!(d.search().unwrap().filter(), "ma");
        assert_eq!(d.host().focused_window().unwrap(), Some(WindowId(3)));
        assert_eq!(focus_count(&d, 3), 1);
    }

    #[test]
    fn submit_applies_pending_filter_first() {
        let mut config = Config::default();
        config.search.filter_debounce_ms = 50;
        let mut d = Dispatcher::new(SimDesktop::new(layout()), config);
        let t0 = Instant::now();
        d.handle_at(Command::OpenSearch, t0).unwrap();
        d.handle_at(Command::SearchInput("safari".into()), t0).unwrap();
        d.handle_at(Command::SearchSubmit, t0).unwrap();
        assert_eq!(d.host().focused_window().unwrap(), Some(WindowId(2)));
        assert_eq!(d.next_deadline(), None);
    }

    #[test]
    fn search_events_without_session_are_ignored() {
        let mut d = make_dispatcher();
        d.handle(Command::SearchInput("mail".into())).unwrap();
        d.handle(Command::SearchRotate(Rotation::Backward)).unwrap();
        d.handle(Command::SearchSubmit).unwrap();
        d.handle(Command::SearchCancel).unwrap();
        assert!(d.host().journal().is_empty());
        assert_eq!(d.next_deadline(), None);
    }

    #[test]
    fn plain_tab_chord_rotates_open_search() {
        let mut d = make_dispatcher();
        d.handle(Command::OpenSearch).unwrap();
        d.handle(Command::SearchInput("s".into())).unwrap();
        d.handle(Command::Chord(Chord::new("tab", ["shift"]))).unwrap();
        assert_eq!(d.host().focused_window().unwrap(), Some(WindowId(2)));
    }

    #[test]
    fn search_open_fails_cleanly_without_tab() {
        let mut d = make_dispatcher();
        d.host().set_tab_available(false);
        let err = d.handle(Command::OpenSearch).unwrap_err();
        assert!(matches!(
            err,
            DispatchError::Session(SessionError::KeyRegistration(_))
        ));
        assert!(!d.is_searching());
        assert!(d.host().modal().is_none());
        assert_eq!(d.host().notifications(), vec!["search: could not enable tab".to_string()]);
    }

    #[test]
    fn opening_twice_keeps_first_session() {
        let mut d = make_dispatcher();
        d.handle(Command::OpenSearch).unwrap();
        d.handle(Command::SearchInput("mail".into())).unwrap();
        d.handle(Command::OpenSearch).unwrap();
        assert_eq!(d.search().unwrap().filter(), "mail");
    }
}
