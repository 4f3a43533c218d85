pub mod bisector;
pub mod intersect_2d;
pub mod polygon_2d;

/// 2D point type.
pub type Point2 = nalgebra::Point2<f64>;

/// 2D vector type.
pub type Vector2 = nalgebra::Vector2<f64>;

/// Global geometric tolerance for degeneracy tests (parallel lines, zero-length
/// vectors).
pub const TOLERANCE: f64 = 1e-10;

/// 2D cross product (`a.x * b.y - a.y * b.x`).
#[must_use]
pub fn perp(a: &Vector2, b: &Vector2) -> f64 {
    a.x * b.y - a.y * b.x
}

/// Returns `true` when every coordinate of the point is finite.
#[must_use]
pub fn is_finite_point(p: &Point2) -> bool {
    p.x.is_finite() && p.y.is_finite()
}
