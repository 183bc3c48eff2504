#![forbid(unsafe_code)]

//! Geometric primitives.
//!
//! Host toolkits report positions in signed pixels relative to the parent
//! widget, so everything here is `i32` and saturating.

/// A position relative to some origin (parent widget or screen).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    /// Create a new point.
    #[inline]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Offset by another point.
    #[inline]
    #[must_use]
    pub const fn translate(self, by: Point) -> Self {
        Self::new(self.x.saturating_add(by.x), self.y.saturating_add(by.y))
    }

    /// Offset by the negation of another point.
    #[inline]
    #[must_use]
    pub const fn relative_to(self, origin: Point) -> Self {
        Self::new(
            self.x.saturating_sub(origin.x),
            self.y.saturating_sub(origin.y),
        )
    }
}

/// A width/height pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Size {
    pub width: i32,
    pub height: i32,
}

impl Size {
    /// Create a new size.
    #[inline]
    pub const fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }

    /// Check if either dimension is zero or negative.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }
}

/// A rectangle used for hit testing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rect {
    /// Left edge (inclusive).
    pub x: i32,
    /// Top edge (inclusive).
    pub y: i32,
    /// Width in pixels.
    pub width: i32,
    /// Height in pixels.
    pub height: i32,
}

impl Rect {
    /// Create a new rectangle.
    #[inline]
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Create a rectangle from an origin and a size.
    #[inline]
    pub const fn from_parts(origin: Point, size: Size) -> Self {
        Self::new(origin.x, origin.y, size.width, size.height)
    }

    /// Top-left corner.
    #[inline]
    pub const fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// Right edge (exclusive).
    #[inline]
    pub const fn right(&self) -> i32 {
        self.x.saturating_add(self.width)
    }

    /// Bottom edge (exclusive).
    #[inline]
    pub const fn bottom(&self) -> i32 {
        self.y.saturating_add(self.height)
    }

    /// Check if the rectangle has zero area.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }

    /// Check if a point is inside the rectangle.
    #[inline]
    pub const fn contains(&self, p: Point) -> bool {
        p.x >= self.x && p.x < self.right() && p.y >= self.y && p.y < self.bottom()
    }

    /// Shrink by the given insets.
    pub fn inner(&self, insets: Insets) -> Rect {
        Rect {
            x: self.x.saturating_add(insets.left),
            y: self.y.saturating_add(insets.top),
            width: self
                .width
                .saturating_sub(insets.left)
                .saturating_sub(insets.right)
                .max(0),
            height: self
                .height
                .saturating_sub(insets.top)
                .saturating_sub(insets.bottom)
                .max(0),
        }
    }
}

/// Space reserved around a container's content.
///
/// Field order follows the toolkit convention `[top, left, bottom, right]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Insets {
    pub top: i32,
    pub left: i32,
    pub bottom: i32,
    pub right: i32,
}

impl Insets {
    /// Create new insets.
    #[inline]
    pub const fn new(top: i32, left: i32, bottom: i32, right: i32) -> Self {
        Self {
            top,
            left,
            bottom,
            right,
        }
    }

    /// Same inset on every side.
    #[inline]
    pub const fn all(v: i32) -> Self {
        Self::new(v, v, v, v)
    }

    /// Component-wise sum, as produced by nesting two borders.
    #[inline]
    #[must_use]
    pub const fn add(self, other: Insets) -> Self {
        Self::new(
            self.top.saturating_add(other.top),
            self.left.saturating_add(other.left),
            self.bottom.saturating_add(other.bottom),
            self.right.saturating_add(other.right),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rect_contains_is_half_open() {
        let r = Rect::new(10, 10, 5, 5);
        assert!(r.contains(Point::new(10, 10)));
        assert!(r.contains(Point::new(14, 14)));
        assert!(!r.contains(Point::new(15, 10)));
        assert!(!r.contains(Point::new(10, 15)));
        assert!(!r.contains(Point::new(9, 12)));
    }

    #[test]
    fn empty_rect_contains_nothing() {
        let r = Rect::new(0, 0, 0, 10);
        assert!(r.is_empty());
        assert!(!r.contains(Point::new(0, 0)));
    }

    #[test]
    fn negative_origin_is_allowed() {
        let r = Rect::new(-5, -5, 10, 10);
        assert!(r.contains(Point::new(-5, 0)));
        assert!(!r.contains(Point::new(5, 0)));
    }

    #[test]
    fn inner_never_goes_negative() {
        let r = Rect::new(0, 0, 4, 4);
        let inner = r.inner(Insets::all(3));
        assert_eq!(inner, Rect::new(3, 3, 0, 0));
    }

    #[test]
    fn point_translation_round_trips() {
        let p = Point::new(3, -7);
        let origin = Point::new(100, 200);
        assert_eq!(p.translate(origin).relative_to(origin), p);
    }

    #[test]
    fn insets_add() {
        let a = Insets::new(1, 2, 3, 4);
        assert_eq!(a.add(Insets::all(1)), Insets::new(2, 3, 4, 5));
    }
}
