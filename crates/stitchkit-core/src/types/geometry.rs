//! World-space geometry value types.
//!
//! All coordinates are in world units (tenths of a millimetre, 254 per inch),
//! with +Y pointing up. These types are plain values: cheap to copy, compared
//! structurally, and serializable so they can appear in configuration files.

use nalgebra::{Matrix3, Point2};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Tolerance used by the approximate comparisons in this module.
pub const GEOMETRY_EPSILON: f64 = 1e-9;

/// A point in world space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    /// Creates a new point.
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// The world origin.
    pub const fn origin() -> Self {
        Self { x: 0.0, y: 0.0 }
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.2}, {:.2})", self.x, self.y)
    }
}

/// Axis-aligned rectangle given by its lower-left and upper-right corners.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub llx: f64,
    pub lly: f64,
    pub urx: f64,
    pub ury: f64,
}

impl Rect {
    /// Creates a rectangle from its corner coordinates.
    pub const fn new(llx: f64, lly: f64, urx: f64, ury: f64) -> Self {
        Self { llx, lly, urx, ury }
    }

    /// Creates a rectangle of the given size centered on `center`.
    pub fn centered(center: Point, width: f64, height: f64) -> Self {
        Self {
            llx: center.x - width / 2.0,
            lly: center.y - height / 2.0,
            urx: center.x + width / 2.0,
            ury: center.y + height / 2.0,
        }
    }

    /// The all-zero rectangle, used as "no viewport yet".
    pub const fn empty() -> Self {
        Self::new(0.0, 0.0, 0.0, 0.0)
    }

    /// Returns true when the rectangle has no positive area.
    pub fn is_empty(&self) -> bool {
        self.width() <= 0.0 || self.height() <= 0.0
    }

    pub fn width(&self) -> f64 {
        self.urx - self.llx
    }

    pub fn height(&self) -> f64 {
        self.ury - self.lly
    }

    pub fn center(&self) -> Point {
        Point::new(0.5 * (self.llx + self.urx), 0.5 * (self.lly + self.ury))
    }

    /// Width divided by height. Undefined (infinite or NaN) for empty rectangles.
    pub fn aspect_ratio(&self) -> f64 {
        self.width() / self.height()
    }

    /// Grows the rectangle by `margin` on every side.
    pub fn expanded(&self, margin: f64) -> Self {
        Self {
            llx: self.llx - margin,
            lly: self.lly - margin,
            urx: self.urx + margin,
            ury: self.ury + margin,
        }
    }

    /// Returns true if `other` lies entirely inside this rectangle, allowing
    /// for floating point slack.
    pub fn contains_rect(&self, other: &Rect) -> bool {
        other.llx >= self.llx - GEOMETRY_EPSILON
            && other.lly >= self.lly - GEOMETRY_EPSILON
            && other.urx <= self.urx + GEOMETRY_EPSILON
            && other.ury <= self.ury + GEOMETRY_EPSILON
    }

    pub fn contains_point(&self, point: &Point) -> bool {
        point.x >= self.llx && point.x <= self.urx && point.y >= self.lly && point.y <= self.ury
    }

    /// Smallest rectangle covering every point in `points`.
    pub fn bounding(points: impl IntoIterator<Item = Point>) -> Option<Self> {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        let mut rect = Self::new(first.x, first.y, first.x, first.y);
        for p in iter {
            rect.llx = rect.llx.min(p.x);
            rect.lly = rect.lly.min(p.y);
            rect.urx = rect.urx.max(p.x);
            rect.ury = rect.ury.max(p.y);
        }
        Some(rect)
    }

    /// The four corners, counter-clockwise from lower-left.
    pub fn corners(&self) -> [Point; 4] {
        [
            Point::new(self.llx, self.lly),
            Point::new(self.urx, self.lly),
            Point::new(self.urx, self.ury),
            Point::new(self.llx, self.ury),
        ]
    }

    /// Component-wise comparison within `tolerance`.
    pub fn approx_eq(&self, other: &Rect, tolerance: f64) -> bool {
        (self.llx - other.llx).abs() <= tolerance
            && (self.lly - other.lly).abs() <= tolerance
            && (self.urx - other.urx).abs() <= tolerance
            && (self.ury - other.ury).abs() <= tolerance
    }
}

impl fmt::Display for Rect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{:.2}, {:.2} .. {:.2}, {:.2}]",
            self.llx, self.lly, self.urx, self.ury
        )
    }
}

/// 2D affine transform stored as a homogeneous 3x3 matrix.
///
/// Points are column vectors, so `a.multiply(&b)` yields the transform that
/// applies `b` first and `a` second.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Matrix(Matrix3<f64>);

impl Matrix {
    pub fn identity() -> Self {
        Self(Matrix3::identity())
    }

    /// Builds a transform from the affine coefficients
    /// `x' = a*x + c*y + tx`, `y' = b*x + d*y + ty`.
    pub fn from_coefficients(a: f64, b: f64, c: f64, d: f64, tx: f64, ty: f64) -> Self {
        Self(Matrix3::new(a, c, tx, b, d, ty, 0.0, 0.0, 1.0))
    }

    pub fn translation(dx: f64, dy: f64) -> Self {
        Self::from_coefficients(1.0, 0.0, 0.0, 1.0, dx, dy)
    }

    pub fn scaling(sx: f64, sy: f64) -> Self {
        Self::from_coefficients(sx, 0.0, 0.0, sy, 0.0, 0.0)
    }

    /// Counter-clockwise rotation by `radians` about the origin.
    pub fn rotation(radians: f64) -> Self {
        let (sin, cos) = radians.sin_cos();
        Self::from_coefficients(cos, sin, -sin, cos, 0.0, 0.0)
    }

    /// Rotation by `radians` about an arbitrary pivot.
    pub fn rotation_about(radians: f64, pivot: Point) -> Self {
        Self::translation(pivot.x, pivot.y)
            .multiply(&Self::rotation(radians))
            .multiply(&Self::translation(-pivot.x, -pivot.y))
    }

    /// Composition `self ∘ rhs`: the result applies `rhs` first, then `self`.
    pub fn multiply(&self, rhs: &Matrix) -> Matrix {
        Matrix(self.0 * rhs.0)
    }

    pub fn transform_point(&self, point: Point) -> Point {
        let p = self.0.transform_point(&Point2::new(point.x, point.y));
        Point::new(p.x, p.y)
    }

    /// Axis-aligned bounds of `rect` after transformation.
    pub fn transform_rect(&self, rect: &Rect) -> Rect {
        let corners = rect.corners().map(|c| self.transform_point(c));
        Rect::bounding(corners).unwrap_or(*rect)
    }

    /// The affine coefficients `(a, b, c, d, tx, ty)`.
    pub fn coefficients(&self) -> (f64, f64, f64, f64, f64, f64) {
        let m = &self.0;
        (m[(0, 0)], m[(1, 0)], m[(0, 1)], m[(1, 1)], m[(0, 2)], m[(1, 2)])
    }

    pub fn is_identity(&self) -> bool {
        self.approx_eq(&Self::identity(), GEOMETRY_EPSILON)
    }

    pub fn approx_eq(&self, other: &Matrix, tolerance: f64) -> bool {
        self.0
            .iter()
            .zip(other.0.iter())
            .all(|(a, b)| (a - b).abs() <= tolerance)
    }
}

impl Default for Matrix {
    fn default() -> Self {
        Self::identity()
    }
}

/// RGBA colour used for the canvas background.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
    pub alpha: u8,
}

impl Color {
    pub const fn rgba(red: u8, green: u8, blue: u8, alpha: u8) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::rgba(200, 200, 200, 255)
    }
}

/// Opaque RGB colour of an embroidery thread.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ThreadColor {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
}

impl ThreadColor {
    pub const fn rgb(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }
}
