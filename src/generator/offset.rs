//! Smallest offset distance the wavefront can advance before its topology
//! changes.

use super::edges::EdgeGuide;
use crate::error::{OperationError, Result};
use crate::math::bisector::half_angle_sine;
use crate::math::intersect_2d::{ray_ray_intersect_2d, RayIntersection};
use crate::math::TOLERANCE;
use crate::wavefront::{VertexId, VertexStore, Wavefront, WavefrontVertex};

/// Returns the smallest positive offset at which two adjacent vertices meet
/// or a reflex vertex reaches a non-incident edge.
///
/// # Errors
///
/// - `OperationError::NoSafeOffset` if no finite positive candidate exists
/// - `GeometryError::AmbiguousIntersection` if a bisector ray is degenerate
/// - `TopologyError` if the wavefront cycle is broken
pub(crate) fn smallest_safe_offset(
    store: &VertexStore,
    wavefront: &Wavefront,
    guide: &EdgeGuide,
    tolerance: f64,
) -> Result<f64> {
    let order = wavefront.vertex_ids(store)?;
    let mut best = f64::INFINITY;

    for &id in &order {
        let vertex = store.vertex(id)?;
        let next = store.vertex(vertex.next)?;
        if let Some(candidate) = bisector_pair_offset(vertex, next)? {
            best = best.min(candidate);
        }
    }

    for &id in &order {
        let vertex = store.vertex(id)?;
        if !vertex.is_reflex() {
            continue;
        }
        for &start in &order {
            if let Some(candidate) = reflex_edge_offset(store, id, start, guide, tolerance)? {
                tracing::trace!(
                    offset = candidate,
                    position = ?vertex.position,
                    "reflex vertex reaches edge"
                );
                best = best.min(candidate);
            }
        }
    }

    if best.is_finite() {
        Ok(best)
    } else {
        let position = match order.first() {
            Some(&id) => store.vertex(id)?.position,
            None => crate::math::Point2::origin(),
        };
        Err(OperationError::NoSafeOffset {
            vertices: order.len(),
            position,
        }
        .into())
    }
}

/// Offset at which the bisector rays of two adjacent vertices meet.
fn bisector_pair_offset(a: &WavefrontVertex, b: &WavefrontVertex) -> Result<Option<f64>> {
    let offset = match ray_ray_intersect_2d(&a.position, &a.bisector, &b.position, &b.bisector)? {
        RayIntersection::Point { t_a, t_b } => (t_a * half_angle_sine(a.interior_angle))
            .min(t_b * half_angle_sine(b.interior_angle)),
        RayIntersection::Overlap { gap } => gap / (a.speed() + b.speed()),
        RayIntersection::Disjoint => return Ok(None),
    };
    Ok(accept(offset))
}

/// Offset at which the edge starting at `start` sweeps over the reflex
/// vertex `reflex`, provided the hit lies within the moved edge.
fn reflex_edge_offset(
    store: &VertexStore,
    reflex: VertexId,
    start: VertexId,
    guide: &EdgeGuide,
    tolerance: f64,
) -> Result<Option<f64>> {
    let a = store.vertex(start)?;
    if start == reflex || a.next == reflex {
        return Ok(None);
    }
    let b = store.vertex(a.next)?;
    let r = store.vertex(reflex)?;

    let normal = guide.inward_normal(a.exit_edge)?;
    let direction = guide.direction(a.exit_edge)?;

    let height = (r.position - a.position).dot(&normal);
    if height < -tolerance {
        return Ok(None);
    }
    let closing = 1.0 - r.velocity().dot(&normal);
    if closing <= TOLERANCE {
        return Ok(None);
    }
    let Some(offset) = accept(height / closing) else {
        return Ok(None);
    };

    let from = a.position_at(offset);
    let along = (r.position_at(offset) - from).dot(&direction);
    let length = (b.position_at(offset) - from).dot(&direction);
    if !along.is_finite() || !length.is_finite() {
        return Ok(None);
    }
    if along < -tolerance || along > length + tolerance {
        return Ok(None);
    }
    Ok(Some(offset))
}

fn accept(offset: f64) -> Option<f64> {
    (offset.is_finite() && offset > TOLERANCE).then_some(offset)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::super::{seed_wavefront, validate_polygon, GeneratorOptions};
    use super::*;
    use crate::error::SkeletonError;
    use crate::math::Point2;
    use approx::assert_abs_diff_eq;

    fn offset_of(points: &[Point2]) -> f64 {
        let options = GeneratorOptions::default();
        let guide = validate_polygon(points, &options).unwrap();
        let (store, wavefront) = seed_wavefront(points, &guide).unwrap();
        smallest_safe_offset(&store, &wavefront, &guide, options.tolerance).unwrap()
    }

    #[test]
    fn square_collapses_at_half_width() {
        let square = [
            Point2::new(-1.0, -1.0),
            Point2::new(-1.0, 1.0),
            Point2::new(1.0, 1.0),
            Point2::new(1.0, -1.0),
        ];
        assert_abs_diff_eq!(offset_of(&square), 1.0, epsilon = 1e-9);
    }

    #[test]
    fn rectangle_limited_by_short_side() {
        let rectangle = [
            Point2::new(-2.0, 1.0),
            Point2::new(2.0, 1.0),
            Point2::new(2.0, -1.0),
            Point2::new(-2.0, -1.0),
        ];
        assert_abs_diff_eq!(offset_of(&rectangle), 1.0, epsilon = 1e-9);
    }

    #[test]
    fn notch_vertex_hits_opposite_edge_first() {
        let notched = [
            Point2::new(0.0, 0.0),
            Point2::new(4.0, 0.0),
            Point2::new(4.0, 4.0),
            Point2::new(2.0, 1.0),
            Point2::new(0.0, 4.0),
        ];
        // The notch apex travels sqrt(13)/2 per unit offset towards the
        // bottom edge, which itself rises by one.
        let expected = 1.0 / (1.0 + 13.0_f64.sqrt() / 2.0);
        assert_abs_diff_eq!(offset_of(&notched), expected, epsilon = 1e-9);
    }

    #[test]
    fn diverging_bisectors_have_no_safe_offset() {
        let triangle = [
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 0.0),
            Point2::new(0.0, 1.0),
        ];
        let options = GeneratorOptions::default();
        let guide = validate_polygon(&triangle, &options).unwrap();
        let (mut store, wavefront) = seed_wavefront(&triangle, &guide).unwrap();
        for id in wavefront.vertex_ids(&store).unwrap() {
            let vertex = store.vertex_mut(id).unwrap();
            vertex.bisector = -vertex.bisector;
        }
        let result = smallest_safe_offset(&store, &wavefront, &guide, options.tolerance);
        assert!(matches!(
            result,
            Err(SkeletonError::Operation(OperationError::NoSafeOffset { vertices: 3, .. }))
        ));
    }
}
