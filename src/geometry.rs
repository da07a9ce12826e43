//! Rectangle math shared by the tiling and shift engines.
//!
//! All coordinates live in a screen's *flipped* space: the origin is the
//! top-left corner and Y grows downward.  Every function here is pure and
//! returns a new [`Rect`]; nothing is mutated in place.

use serde::{Deserialize, Serialize};

/// An axis-aligned rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Width and height of the rectangle.
    pub fn size(&self) -> Size {
        Size {
            width: self.width,
            height: self.height,
        }
    }

    /// Geometric center.
    pub fn center(&self) -> Point {
        Point {
            x: self.x + self.width / 2.0,
            y: self.y + self.height / 2.0,
        }
    }

    /// Whether `p` lies inside the rectangle (right and bottom edges
    /// excluded, so adjacent screens never both claim a point).
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.x && p.x < self.x + self.width && p.y >= self.y && p.y < self.y + self.height
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

//  Cross-screen transform

/// Maps a window frame from one screen to another while keeping its
/// position and size *proportional* to the screen it sits on.
///
/// Build it once from the two usable screen frames, then [`apply`] it to
/// the window's current frame:
///
/// ```
/// use winshift::geometry::{FrameRatio, Rect};
///
/// let laptop = Rect::new(0.0, 0.0, 1000.0, 500.0);
/// let monitor = Rect::new(1000.0, 0.0, 2000.0, 1000.0);
/// let moved = FrameRatio::new(laptop, monitor).apply(Rect::new(500.0, 0.0, 500.0, 250.0));
/// assert_eq!(moved, Rect::new(2000.0, 0.0, 1000.0, 500.0));
/// ```
///
/// [`apply`]: FrameRatio::apply
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameRatio {
    from: Rect,
    to: Rect,
}

impl FrameRatio {
    /// Both screens must have positive extents.
    pub fn new(from: Rect, to: Rect) -> Self {
        debug_assert!(
            from.width > 0.0 && from.height > 0.0,
            "source screen has a zero extent: {:?}",
            from
        );
        Self { from, to }
    }

    /// Transform `frame` from the source screen to the target screen.
    pub fn apply(&self, frame: Rect) -> Rect {
        let sx = self.to.width / self.from.width;
        let sy = self.to.height / self.from.height;
        Rect {
            x: self.to.x + (frame.x - self.from.x) * sx,
            y: self.to.y + (frame.y - self.from.y) * sy,
            width: frame.width * sx,
            height: frame.height * sy,
        }
    }
}

/// Place a rectangle of `size` so its center coincides with the center of
/// `container`.  No rounding is applied.
pub fn centered_rect(container: Rect, size: Size) -> Rect {
    Rect {
        x: container.x + container.width / 2.0 - size.width / 2.0,
        y: container.y + container.height / 2.0 - size.height / 2.0,
        width: size.width,
        height: size.height,
    }
}

//  Half split

/// Which half of an extent to take.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Half {
    /// The left or top half.  Its size is rounded *up*.
    Leading,
    /// The right or bottom half: whatever the leading half left over.
    Trailing,
}

/// Split the span `[offset, offset + extent)` in two and return the
/// `(offset, size)` of the requested half.
///
/// The trailing half is the exact remainder of the leading one, so the two
/// halves always tile the span: for `1441` the halves are `721` and `720`.
pub fn half_split(offset: f64, extent: f64, half: Half) -> (f64, f64) {
    let leading = (extent / 2.0).ceil();
    match half {
        Half::Leading => (offset, leading),
        Half::Trailing => (offset + leading, extent - leading),
    }
}

//  Tests
