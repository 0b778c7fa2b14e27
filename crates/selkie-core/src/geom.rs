#![forbid(unsafe_code)]

pub type Unit = euclid::UnknownUnit;

/// Pointer position in canvas DOM coordinates.
pub type Point = euclid::Point2D<f64, Unit>;

pub fn point(x: f64, y: f64) -> Point {
    euclid::point2(x, y)
}
