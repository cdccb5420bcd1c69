//! Integer screen geometry shared by layout and hit testing.

use std::fmt;

/// A point in screen coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Axis-aligned rectangle given by its origin and extent.
///
/// Edges are computed in `i64` so that `x + width` never overflows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

/// Direction along which a rectangle is cut into strips.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SplitAxis {
    /// Vertical strips laid out left to right.
    X,
    /// Horizontal strips laid out top to bottom.
    Y,
}

impl Rect {
    pub const fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn left(&self) -> i64 {
        i64::from(self.x)
    }

    pub fn top(&self) -> i64 {
        i64::from(self.y)
    }

    pub fn right(&self) -> i64 {
        self.left() + i64::from(self.width)
    }

    pub fn bottom(&self) -> i64 {
        self.top() + i64::from(self.height)
    }

    pub fn area(&self) -> u64 {
        u64::from(self.width) * u64::from(self.height)
    }

    /// Wider rectangles split along x, everything else (squares included) along y.
    pub fn split_axis(&self) -> SplitAxis {
        if self.width > self.height {
            SplitAxis::X
        } else {
            SplitAxis::Y
        }
    }

    /// Extent along `axis`.
    pub fn extent(&self, axis: SplitAxis) -> u32 {
        match axis {
            SplitAxis::X => self.width,
            SplitAxis::Y => self.height,
        }
    }

    /// Inclusive on all four edges: a point on a shared border belongs to both
    /// neighbours, and callers resolve the tie by visiting order.
    pub fn contains(&self, point: Point) -> bool {
        let (px, py) = (i64::from(point.x), i64::from(point.y));
        self.left() <= px && px <= self.right() && self.top() <= py && py <= self.bottom()
    }

    /// Area shared with `other`; zero when they only touch.
    pub fn overlap_area(&self, other: &Rect) -> u64 {
        let w = self.right().min(other.right()) - self.left().max(other.left());
        let h = self.bottom().min(other.bottom()) - self.top().max(other.top());
        if w <= 0 || h <= 0 {
            0
        } else {
            (w as u64) * (h as u64)
        }
    }

    /// Sub-rectangle covering `[offset, offset + size)` along `axis`, where
    /// `offset` is absolute.
    pub(crate) fn strip(&self, axis: SplitAxis, offset: i64, size: u32) -> Rect {
        match axis {
            SplitAxis::X => Rect::new(offset as i32, self.y, size, self.height),
            SplitAxis::Y => Rect::new(self.x, offset as i32, self.width, size),
        }
    }
}

impl fmt::Display for Rect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({}, {}, {}, {})",
            self.x, self.y, self.width, self.height
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_wide_rect_when_choosing_axis_then_splits_along_x() {
        assert_eq!(Rect::new(0, 0, 100, 10).split_axis(), SplitAxis::X);
        assert_eq!(Rect::new(0, 0, 10, 100).split_axis(), SplitAxis::Y);
        assert_eq!(Rect::new(0, 0, 10, 10).split_axis(), SplitAxis::Y);
    }

    #[test]
    fn given_point_on_edge_when_testing_containment_then_included() {
        let rect = Rect::new(10, 20, 30, 40);
        assert!(rect.contains(Point::new(10, 20)));
        assert!(rect.contains(Point::new(40, 60)));
        assert!(!rect.contains(Point::new(41, 60)));
        assert!(!rect.contains(Point::new(9, 20)));
    }

    #[test]
    fn given_touching_rects_when_measuring_overlap_then_zero() {
        let a = Rect::new(0, 0, 30, 10);
        let b = Rect::new(30, 0, 70, 10);
        assert_eq!(a.overlap_area(&b), 0);
        assert_eq!(a.overlap_area(&Rect::new(20, 5, 20, 20)), 50);
    }
}
