//! Moving a window toward a screen edge without resizing it.
//!
//! A shift snaps in two stops.  Shifting toward the trailing edge (right or
//! down) first centers the window on the screen's half-point; once it is at
//! or past that point it goes flush against the edge.  Shifting toward the
//! leading edge (left or up) pulls a window that sits past the half-point
//! back to it and otherwise leaves it alone.
//!
//! The two directions round the screen half and the window half in
//! opposite ways.  That asymmetry is what makes a left/right (or up/down)
//! alternation settle on exactly two positions instead of drifting by a
//! pixel on odd extents.

use crate::command::Direction;
use crate::geometry::{centered_rect, Rect};
use crate::tiling::Placement;

/// Which way along an axis a shift moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Toward {
    /// Left or up.
    Leading,
    /// Right or down.
    Trailing,
}

/// One axis of the snap rule: returns the new window offset.
fn snap(toward: Toward, offset: f64, extent: f64, screen_offset: f64, screen_extent: f64) -> f64 {
    match toward {
        Toward::Leading => {
            let center = screen_offset + (screen_extent / 2.0).ceil();
            let half = (extent / 2.0).floor();
            if offset + half > center {
                center - half
            } else {
                offset
            }
        }
        Toward::Trailing => {
            let center = screen_offset + (screen_extent / 2.0).floor();
            let half = (extent / 2.0).ceil();
            if offset + half < center {
                center - half
            } else {
                screen_offset + screen_extent - extent
            }
        }
    }
}

/// Shift `window` one stop in `direction` within `screen`.
pub fn shift(direction: Direction, window: Rect, screen: Rect) -> Placement {
    let mut frame = window;
    match direction {
        Direction::Left | Direction::Right => {
            let toward = if direction == Direction::Left {
                Toward::Leading
            } else {
                Toward::Trailing
            };
            frame.x = snap(toward, window.x, window.width, screen.x, screen.width);
        }
        Direction::Up | Direction::Down => {
            let toward = if direction == Direction::Up {
                Toward::Leading
            } else {
                Toward::Trailing
            };
            frame.y = snap(toward, window.y, window.height, screen.y, screen.height);
        }
    }
    Placement::keep(frame)
}

/// Center `window` on `screen` on both axes, keeping its size.
pub fn center(window: Rect, screen: Rect) -> Placement {
    Placement::keep(centered_rect(screen, window.size()))
}
