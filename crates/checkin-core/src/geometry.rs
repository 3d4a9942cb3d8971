use std::fmt;

/// A screen-pixel coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Axis-aligned text box in screen pixels.
///
/// Always satisfies `left <= right` and `top <= bottom`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundingBox {
    left: i32,
    right: i32,
    top: i32,
    bottom: i32,
}

impl BoundingBox {
    /// Build a box from its four edges. Returns `None` for inverted edges.
    pub fn new(left: i32, right: i32, top: i32, bottom: i32) -> Option<Self> {
        if left > right || top > bottom {
            return None;
        }
        Some(Self {
            left,
            right,
            top,
            bottom,
        })
    }

    pub fn left(&self) -> i32 {
        self.left
    }

    pub fn right(&self) -> i32 {
        self.right
    }

    pub fn top(&self) -> i32 {
        self.top
    }

    pub fn bottom(&self) -> i32 {
        self.bottom
    }

    /// Integer midpoint of both axes (floor division).
    pub fn center(&self) -> Point {
        Point {
            x: midpoint(self.left, self.right),
            y: midpoint(self.top, self.bottom),
        }
    }
}

/// `floor((a + b) / 2)` without overflowing `i32`.
fn midpoint(a: i32, b: i32) -> i32 {
    // The result lies between a and b, so it always fits.
    (i64::from(a) + i64::from(b)).div_euclid(2) as i32
}

impl fmt::Display for BoundingBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "BoundingBox(l:{}, r:{}, t:{}, b:{})",
            self.left, self.right, self.top, self.bottom
        )
    }
}
