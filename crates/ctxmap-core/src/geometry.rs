//! Geometric primitives for context map layout.
//!
//! # Overview
//!
//! - [`Point`] - A 2D coordinate in canvas space
//! - [`Size`] - Width and height dimensions
//!
//! # Coordinate System
//!
//! Layout happens on a canvas whose origin sits at the canvas center. Axes
//! follow SVG orientation:
//!
//! ```text
//!          -Y
//!           ▲
//!           │
//!   -X ◄────┼────► +X
//!           │
//!           ▼
//!          +Y
//! ```
//!
//! A canvas of `width × height` therefore spans `[-width/2, width/2]`
//! horizontally and `[-height/2, height/2]` vertically.

/// A 2D point in canvas coordinate space.
///
/// # Examples
///
/// ```
/// # use ctxmap_core::geometry::Point;
/// let a = Point::new(-100.0, 0.0);
/// let b = Point::new(100.0, 0.0);
///
/// let mid = a.midpoint(b);
/// assert_eq!(mid, Point::new(0.0, 0.0));
/// assert_eq!(b.sub_point(a).hypot(), 200.0);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Point {
    x: f32,
    y: f32,
}

impl Point {
    /// Creates a new point with the specified coordinates
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Returns the x-coordinate of the point
    pub fn x(self) -> f32 {
        self.x
    }

    /// Returns the y-coordinate of the point
    pub fn y(self) -> f32 {
        self.y
    }

    /// Adds another point to this point, returning a new point.
    pub fn add_point(self, other: Point) -> Self {
        Self {
            x: self.x + other.x,
            y: self.y + other.y,
        }
    }

    /// Subtracts another point from this point, returning a new point.
    pub fn sub_point(self, other: Point) -> Self {
        Self {
            x: self.x - other.x,
            y: self.y - other.y,
        }
    }

    /// Returns the point halfway between `self` and `other`.
    pub fn midpoint(self, other: Point) -> Self {
        Self {
            x: (self.x + other.x) / 2.0,
            y: (self.y + other.y) / 2.0,
        }
    }

    /// Euclidean length of the vector from the origin to this point.
    pub fn hypot(self) -> f32 {
        self.x.hypot(self.y)
    }

    /// Multiplies both coordinates by `factor`.
    pub fn scale(self, factor: f32) -> Self {
        Self {
            x: self.x * factor,
            y: self.y * factor,
        }
    }

    /// Distance between two points.
    pub fn distance(self, other: Point) -> f32 {
        other.sub_point(self).hypot()
    }

    /// Returns `true` when both points sit on the same vertical or horizontal line.
    pub fn is_axis_aligned_with(self, other: Point) -> bool {
        self.x == other.x || self.y == other.y
    }
}

/// Width and height of an element.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Size {
    width: f32,
    height: f32,
}

impl Size {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn width(self) -> f32 {
        self.width
    }

    pub fn height(self) -> f32 {
        self.height
    }

    /// Grows the size by `horizontal` on the left and right and by
    /// `vertical` on the top and bottom.
    pub fn grow(self, horizontal: f32, vertical: f32) -> Self {
        Self {
            width: self.width + 2.0 * horizontal,
            height: self.height + 2.0 * vertical,
        }
    }

    /// Half of each dimension. For an ellipse sized by its diameters this
    /// yields its radii.
    pub fn half(self) -> Self {
        Self {
            width: self.width / 2.0,
            height: self.height / 2.0,
        }
    }

    /// Returns `true` when both dimensions are finite and non-negative.
    pub fn is_valid(self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width >= 0.0 && self.height >= 0.0
    }
}
