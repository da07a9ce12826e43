//! Half-screen tiling and the maximize toggle.
//!
//! Every operation here is a pure function from the window's current frame
//! and its screen's usable frame to a [`Placement`].  The dispatcher is
//! responsible for handing the placement to the host.

use crate::command::Direction;
use crate::geometry::{half_split, Half, Rect};

/// What an operation does to the window's maximized flag.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MaximizedFlag {
    /// Leave the flag as it is.
    Keep,
    /// The window is no longer maximized.
    Clear,
    /// The window is now maximized; `restore` is the frame a second toggle
    /// returns to.
    Set { restore: Rect },
}

/// The result of a tiling, shifting or centering computation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub frame: Rect,
    pub maximized: MaximizedFlag,
}

impl Placement {
    /// A placement that leaves the maximized flag untouched.
    pub fn keep(frame: Rect) -> Self {
        Self {
            frame,
            maximized: MaximizedFlag::Keep,
        }
    }
}

/// Tile a window into one half of `screen`.
///
/// Left/Right take the full screen height and a horizontal half.  Up/Down
/// take a vertical half but keep the window's current `x` and `width`.
/// The left and top halves round up; the right and bottom halves get the
/// remainder, so the two halves never overlap or leave a gap.
///
/// Tiling always clears the maximized flag, even if the resulting frame
/// happens to cover the whole screen.
pub fn tile(direction: Direction, window: Rect, screen: Rect) -> Placement {
    let frame = match direction {
        Direction::Left | Direction::Right => {
            let half = if direction == Direction::Left {
                Half::Leading
            } else {
                Half::Trailing
            };
            let (x, width) = half_split(screen.x, screen.width, half);
            Rect {
                x,
                y: screen.y,
                width,
                height: screen.height,
            }
        }
        Direction::Up | Direction::Down => {
            let half = if direction == Direction::Up {
                Half::Leading
            } else {
                Half::Trailing
            };
            let (y, height) = half_split(screen.y, screen.height, half);
            Rect {
                x: window.x,
                y,
                width: window.width,
                height,
            }
        }
    };
    Placement {
        frame,
        maximized: MaximizedFlag::Clear,
    }
}

/// Toggle between the full usable screen and the frame the window had
/// before it was maximized.
///
/// `restore` is the frame saved by the previous toggle, or `None` if the
/// window is not currently maximized.
pub fn toggle_maximize(window: Rect, screen: Rect, restore: Option<Rect>) -> Placement {
    match restore {
        Some(previous) => Placement {
            frame: previous,
            maximized: MaximizedFlag::Clear,
        },
        None => Placement {
            frame: screen,
            maximized: MaximizedFlag::Set { restore: window },
        },
    }
}
