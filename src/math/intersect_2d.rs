use super::{is_finite_point, perp, Point2, Vector2, TOLERANCE};
use crate::error::GeometryError;

/// How two rays `origin_a + t_a * dir_a` and `origin_b + t_b * dir_b`
/// (`t_a, t_b >= 0`) relate to each other.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RayIntersection {
    /// The rays cross at a single point, `t_a` and `t_b` along each ray.
    Point { t_a: f64, t_b: f64 },
    /// The rays lie on one line and face each other across a `gap`.
    Overlap { gap: f64 },
    /// The rays never meet.
    Disjoint,
}

/// Parametric 2D line-line intersection.
///
/// Given lines `p1 + t * d1` and `p2 + u * d2`, returns `(t, u)` if not parallel.
#[must_use]
pub fn line_line_intersect_2d(
    p1: &Point2,
    d1: &Vector2,
    p2: &Point2,
    d2: &Vector2,
) -> Option<(f64, f64)> {
    let cross = perp(d1, d2);
    if cross.abs() < TOLERANCE {
        return None;
    }
    let w = p2 - p1;
    let t = perp(&w, d2) / cross;
    let u = perp(&w, d1) / cross;
    Some((t, u))
}

/// Classifies two rays with unit directions as crossing, overlapping or
/// disjoint.
///
/// # Errors
///
/// Returns `GeometryError::AmbiguousIntersection` if any input is non-finite
/// or a direction has (near) zero length, since such rays are neither a point
/// nor a segment.
pub fn ray_ray_intersect_2d(
    origin_a: &Point2,
    dir_a: &Vector2,
    origin_b: &Point2,
    dir_b: &Vector2,
) -> Result<RayIntersection, GeometryError> {
    let well_posed = is_finite_point(origin_a)
        && is_finite_point(origin_b)
        && dir_a.norm() > TOLERANCE
        && dir_b.norm() > TOLERANCE;
    if !well_posed {
        return Err(GeometryError::AmbiguousIntersection {
            origin_a: *origin_a,
            dir_a: *dir_a,
            origin_b: *origin_b,
            dir_b: *dir_b,
        });
    }

    if let Some((t_a, t_b)) = line_line_intersect_2d(origin_a, dir_a, origin_b, dir_b) {
        if t_a < -TOLERANCE || t_b < -TOLERANCE {
            return Ok(RayIntersection::Disjoint);
        }
        return Ok(RayIntersection::Point {
            t_a: t_a.max(0.0),
            t_b: t_b.max(0.0),
        });
    }

    // Parallel: only a shared supporting line with opposing rays can meet.
    let w = origin_b - origin_a;
    if perp(dir_a, &w).abs() > TOLERANCE {
        return Ok(RayIntersection::Disjoint);
    }
    let gap = w.dot(dir_a);
    if gap > 0.0 && dir_b.dot(dir_a) < 0.0 {
        Ok(RayIntersection::Overlap { gap })
    } else {
        Ok(RayIntersection::Disjoint)
    }
}

/// Returns `true` if segments `a0-a1` and `b0-b1` cross at a point interior to
/// both. Touching at an endpoint and collinear overlap do not count.
#[must_use]
pub fn segments_cross_2d(a0: &Point2, a1: &Point2, b0: &Point2, b1: &Point2) -> bool {
    let da = a1 - a0;
    let db = b1 - b0;
    let Some((t, u)) = line_line_intersect_2d(a0, &da, b0, &db) else {
        return false;
    };
    let eps = TOLERANCE;
    t > eps && t < 1.0 - eps && u > eps && u < 1.0 - eps
}

/// Returns `true` if `p` lies on segment `a-b` within `tolerance`, away from
/// both endpoints.
#[must_use]
pub fn point_inside_segment_2d(p: &Point2, a: &Point2, b: &Point2, tolerance: f64) -> bool {
    let ab = b - a;
    let len_sq = ab.norm_squared();
    if len_sq <= (2.0 * tolerance) * (2.0 * tolerance) {
        return false;
    }
    if (p - a).norm() <= tolerance || (p - b).norm() <= tolerance {
        return false;
    }
    let t = (p - a).dot(&ab) / len_sq;
    if t <= 0.0 || t >= 1.0 {
        return false;
    }
    let closest = a + ab * t;
    (p - closest).norm() <= tolerance
}
