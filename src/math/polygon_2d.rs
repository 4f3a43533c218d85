use super::{Point2, Vector2, TOLERANCE};
use crate::error::{OperationError, Result};

/// Orientation of a closed polygon in a Y-up frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Winding {
    CounterClockwise,
    Clockwise,
}

impl Winding {
    /// Classifies a polygon by its signed area. Returns `None` for (near) zero
    /// area.
    #[must_use]
    pub fn of(points: &[Point2]) -> Option<Self> {
        let area = signed_area_2d(points);
        if area > TOLERANCE {
            Some(Self::CounterClockwise)
        } else if area < -TOLERANCE {
            Some(Self::Clockwise)
        } else {
            None
        }
    }

    /// `+1.0` for counter-clockwise, `-1.0` for clockwise.
    #[must_use]
    pub fn sign(self) -> f64 {
        match self {
            Self::CounterClockwise => 1.0,
            Self::Clockwise => -1.0,
        }
    }

    /// Unit normal of an edge with direction `dir`, pointing into the polygon.
    #[must_use]
    pub fn inward_normal(self, dir: &Vector2) -> Vector2 {
        left_normal(dir) * self.sign()
    }
}

/// Computes the signed area of a polygon (shoelace formula).
///
/// Positive for counter-clockwise, negative for clockwise.
#[must_use]
pub fn signed_area_2d(points: &[Point2]) -> f64 {
    let n = points.len();
    if n < 3 {
        return 0.0;
    }
    let mut sum = 0.0;
    for i in 0..n {
        let j = (i + 1) % n;
        sum += points[i].x * points[j].y - points[j].x * points[i].y;
    }
    sum * 0.5
}

/// Computes the normalized direction from point `a` to point `b`.
///
/// # Errors
///
/// Returns `OperationError::InvalidInput` if the segment has zero length.
pub fn segment_direction(a: &Point2, b: &Point2) -> Result<Vector2> {
    let d = b - a;
    let len = d.norm();
    if len < TOLERANCE {
        return Err(OperationError::InvalidInput(format!(
            "zero-length segment between ({}, {}) and ({}, {})",
            a.x, a.y, b.x, b.y
        ))
        .into());
    }
    Ok(d / len)
}

/// Returns the left-pointing normal of a direction vector.
#[must_use]
pub fn left_normal(dir: &Vector2) -> Vector2 {
    Vector2::new(-dir.y, dir.x)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn square(clockwise: bool) -> Vec<Point2> {
        let mut pts = vec![
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 0.0),
            Point2::new(1.0, 1.0),
            Point2::new(0.0, 1.0),
        ];
        if clockwise {
            pts.reverse();
        }
        pts
    }

    #[test]
    fn signed_area_ccw_square() {
        let area = signed_area_2d(&square(false));
        assert!((area - 1.0).abs() < TOLERANCE);
    }

    #[test]
    fn signed_area_cw_square() {
        let area = signed_area_2d(&square(true));
        assert!((area + 1.0).abs() < TOLERANCE);
    }

    #[test]
    fn signed_area_degenerate() {
        assert!((signed_area_2d(&[Point2::new(0.0, 0.0)])).abs() < TOLERANCE);
        assert!((signed_area_2d(&[])).abs() < TOLERANCE);
    }

    #[test]
    fn winding_classification() {
        assert_eq!(Winding::of(&square(false)), Some(Winding::CounterClockwise));
        assert_eq!(Winding::of(&square(true)), Some(Winding::Clockwise));
        let collinear = [
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 0.0),
            Point2::new(2.0, 0.0),
        ];
        assert_eq!(Winding::of(&collinear), None);
    }

    #[test]
    fn inward_normal_points_inside() {
        // Bottom edge of a CCW square runs +x; the interior is above it.
        let n = Winding::CounterClockwise.inward_normal(&Vector2::new(1.0, 0.0));
        assert!((n.y - 1.0).abs() < TOLERANCE);
        // Same edge walked clockwise runs -x; the interior is still above it.
        let n = Winding::Clockwise.inward_normal(&Vector2::new(-1.0, 0.0));
        assert!((n.y - 1.0).abs() < TOLERANCE);
    }

    #[test]
    fn segment_direction_basic() {
        let a = Point2::new(0.0, 0.0);
        let b = Point2::new(3.0, 4.0);
        let dir = segment_direction(&a, &b).unwrap();
        assert!((dir.x - 0.6).abs() < TOLERANCE);
        assert!((dir.y - 0.8).abs() < TOLERANCE);
    }

    #[test]
    fn segment_direction_zero_length() {
        let a = Point2::new(1.0, 1.0);
        assert!(segment_direction(&a, &a).is_err());
    }

    #[test]
    fn left_normal_basic() {
        let n = left_normal(&Vector2::new(1.0, 0.0));
        assert!((n.x).abs() < TOLERANCE);
        assert!((n.y - 1.0).abs() < TOLERANCE);
    }
}
