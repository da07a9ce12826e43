//! Incremental window search.
//!
//! A [`SearchSession`] is opened with a snapshot of every visible window.
//! Each filter change recomputes the matching subset of that snapshot and
//! focuses the first match; Tab and Shift-Tab cycle through the matches.
//! Closing the session consumes it, so a closed session cannot receive
//! further input.
//!
//! ```text
//!   open ──▶ Filtering ──(filter / tab)──▶ Filtering
//!                 │
//!                 ├──(submit)──▶ Committed
//!                 └──(cancel)──▶ Cancelled (original window refocused)
//! ```

use crate::command::{Rotation, ScreenId, WindowId, WindowInfo};
use crate::traits::{Host, ModalContent};
use log::{debug, error, info};
use std::collections::VecDeque;

/// Errors that can occur while a session is opened or driven.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// The host could not hand Tab / Shift-Tab to the session.
    #[error("search: could not enable tab: {0}")]
    KeyRegistration(String),
    /// Any other host failure.
    #[error("host error: {0}")]
    Host(String),
}

fn host_err<E: std::error::Error>(e: E) -> SessionError {
    SessionError::Host(e.to_string())
}

/// A window as it looked when the session opened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub id: WindowId,
    pub app: String,
    pub title: String,
    pub icon: Option<String>,
}

impl Candidate {
    /// `needle` must already be lowercase.
    fn matches(&self, needle: &str) -> bool {
        self.app.to_lowercase().contains(needle) || self.title.to_lowercase().contains(needle)
    }
}

impl From<WindowInfo> for Candidate {
    fn from(info: WindowInfo) -> Self {
        Self {
            id: info.id,
            app: info.app.name,
            title: info.title,
            icon: info.app.icon,
        }
    }
}

/// How a session ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseReason {
    /// Enter: keep whatever the session focused.
    Submit,
    /// Escape: give focus back to the window that had it before.
    Cancel,
}

/// What closing a session left behind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SessionOutcome {
    /// The window the session committed to, if any.
    pub selected: Option<WindowId>,
    /// The original window was refocused and should be focused once more
    /// after a short delay.  Focus delivery across monitors is unreliable
    /// enough that the first attempt does not always stick.
    pub retry_focus: Option<WindowId>,
}

/// An open incremental search.
#[derive(Debug)]
pub struct SearchSession {
    prompt: String,
    /// The modal stays on this screen for the whole session.
    screen: ScreenId,
    original: Option<WindowId>,
    snapshot: Vec<Candidate>,
    /// Indices into `snapshot`.
    matches: VecDeque<usize>,
    rotation: Rotation,
    filter: String,
    selected: Option<WindowId>,
    icon: Option<String>,
}

impl SearchSession {
    /// Snapshot the visible windows, claim Tab / Shift-Tab and show the
    /// empty prompt on the main screen.
    ///
    /// If the host cannot enable the tab keys the session is not created
    /// and no modal is shown.
    pub fn open<H: Host>(host: &H, prompt: &str) -> Result<Self, SessionError> {
        let original = host.focused_window().map_err(host_err)?;
        let screen = host.main_screen().map_err(host_err)?;
        let snapshot: Vec<Candidate> = host
            .visible_windows()
            .map_err(host_err)?
            .into_iter()
            .filter_map(|id| match host.window_info(id) {
                Ok(info) => Some(Candidate::from(info)),
                Err(e) => {
                    // Closed between the listing and the lookup.
                    debug!("skipping {}: {}", id, e);
                    None
                }
            })
            .collect();

        host.enable_search_keys()
            .map_err(|e| SessionError::KeyRegistration(e.to_string()))?;

        let session = Self {
            prompt: prompt.to_string(),
            screen,
            original,
            matches: (0..snapshot.len()).collect(),
            snapshot,
            // The first match is focused as soon as the user types, so Tab
            // starts out walking backward.
            rotation: Rotation::Backward,
            filter: String::new(),
            selected: None,
            icon: None,
        };

        if let Err(e) = host.show_modal(screen, &session.modal()) {
            let _ = host.disable_search_keys();
            return Err(host_err(e));
        }

        info!(
            "search opened on {} with {} candidate(s)",
            screen,
            session.snapshot.len()
        );
        Ok(session)
    }

    //  Accessors

    pub fn filter(&self) -> &str {
        &self.filter
    }

    pub fn screen(&self) -> ScreenId {
        self.screen
    }

    pub fn original(&self) -> Option<WindowId> {
        self.original
    }

    pub fn rotation(&self) -> Rotation {
        self.rotation
    }

    /// The window the session has focused most recently, if any.
    pub fn selected(&self) -> Option<WindowId> {
        self.selected
    }

    /// The windows captured when the session opened.
    pub fn candidates(&self) -> &[Candidate] {
        &self.snapshot
    }

    /// Current matches in rotation order.
    pub fn matches(&self) -> Vec<WindowId> {
        self.matches.iter().map(|&i| self.snapshot[i].id).collect()
    }

    /// What the modal currently shows.
    pub fn modal(&self) -> ModalContent {
        let mut text = format!("{}{}", self.prompt, self.filter);
        if !self.filter.is_empty() {
            text.push_str(&format!("\n{} results", self.matches.len()));
        }
        ModalContent {
            text,
            icon: self.icon.clone(),
            duration: None,
            weight: None,
        }
    }

    //  Events

    /// Apply a new filter string.
    ///
    /// Matches are recomputed from the snapshot every time: app name or
    /// title containing `filter`, ignoring case, in snapshot order.  A
    /// non-empty filter with at least one match focuses the first match;
    /// otherwise the original window gets focus back.
    pub fn update_filter<H: Host>(&mut self, host: &H, filter: &str) -> Result<(), SessionError> {
        self.filter = filter.to_string();
        self.rotation = Rotation::Backward;

        let needle = filter.to_lowercase();
        self.matches = self
            .snapshot
            .iter()
            .enumerate()
            .filter(|(_, c)| c.matches(&needle))
            .map(|(i, _)| i)
            .collect();
        debug!("filter {:?}: {} match(es)", filter, self.matches.len());

        let first = self.matches.front().copied().filter(|_| !filter.is_empty());
        match first {
            Some(idx) => {
                let candidate = &self.snapshot[idx];
                host.focus_window(candidate.id).map_err(host_err)?;
                self.selected = Some(candidate.id);
                self.icon = candidate.icon.clone();
            }
            None => {
                if let Some(original) = self.original {
                    host.focus_window(original).map_err(host_err)?;
                }
                self.selected = None;
                self.icon = None;
            }
        }

        host.show_modal(self.screen, &self.modal()).map_err(host_err)
    }

    /// Focus the next match in `rotation` order and return it.
    ///
    /// Changing direction first takes one extra step in the new direction,
    /// which puts back the match currently shown; without it, switching
    /// between Tab and Shift-Tab would show the same window twice.
    pub fn rotate<H: Host>(
        &mut self,
        host: &H,
        rotation: Rotation,
    ) -> Result<Option<WindowId>, SessionError> {
        if self.matches.is_empty() {
            return Ok(None);
        }

        if rotation != self.rotation {
            self.rotation = rotation;
            self.step(rotation);
        }
        let Some(idx) = self.step(rotation) else {
            return Ok(None);
        };

        let candidate = &self.snapshot[idx];
        debug!("rotate {} -> {}", rotation, candidate.id);
        host.focus_window(candidate.id).map_err(host_err)?;
        self.selected = Some(candidate.id);
        self.icon = candidate.icon.clone();
        host.show_modal(self.screen, &self.modal()).map_err(host_err)?;
        Ok(Some(candidate.id))
    }

    /// End the session.
    ///
    /// Tab keys are released and the modal closed; a failure in either is
    /// logged and does not stop the rest of the teardown.  With an empty
    /// filter, or on [`CloseReason::Cancel`], the original window is
    /// refocused immediately and returned in
    /// [`SessionOutcome::retry_focus`] for a delayed second attempt.
    pub fn close<H: Host>(self, host: &H, reason: CloseReason) -> SessionOutcome {
        if let Err(e) = host.disable_search_keys() {
            error!("search: could not release tab: {}", e);
        }
        if let Err(e) = host.close_modal() {
            error!("search: could not close modal: {}", e);
        }

        if reason == CloseReason::Cancel || self.filter.is_empty() {
            info!("search closed, restoring original focus");
            let Some(original) = self.original else {
                return SessionOutcome::default();
            };
            // The delayed retry still gets a chance if this attempt fails.
            if let Err(e) = host.focus_window(original) {
                error!("search: could not refocus {}: {}", original, e);
            }
            return SessionOutcome {
                selected: None,
                retry_focus: Some(original),
            };
        }

        info!("search committed to {:?}", self.selected);
        SessionOutcome {
            selected: self.selected,
            retry_focus: None,
        }
    }

    fn step(&mut self, rotation: Rotation) -> Option<usize> {
        match rotation {
            Rotation::Forward => {
                let idx = self.matches.pop_front()?;
                self.matches.push_back(idx);
                Some(idx)
            }
            Rotation::Backward => {
                let idx = self.matches.pop_back()?;
                self.matches.push_front(idx);
                Some(idx)
            }
        }
    }
}

//  Tests
