//! Output of the generator: one face polygon per source edge.

use crate::error::{OperationError, TopologyError};
use crate::math::intersect_2d::segments_cross_2d;
use crate::math::{Point2, TOLERANCE};
use crate::wavefront::WavefrontVertex;

/// Faces of a straight skeleton, indexed by source edge.
///
/// Slot `i` starts with the two endpoints of edge `i` and accumulates the
/// positions retired from the wavefront while they bordered that edge.
#[derive(Debug, Clone, PartialEq)]
pub struct StraightSkeleton {
    polygons: Vec<Vec<Point2>>,
    tolerance: f64,
}

impl StraightSkeleton {
    /// Seeds one slot per edge of the closed polygon `points`.
    #[must_use]
    pub fn from_polygon(points: &[Point2], tolerance: f64) -> Self {
        let n = points.len();
        let polygons = (0..n).map(|i| vec![points[i], points[(i + 1) % n]]).collect();
        Self {
            polygons,
            tolerance,
        }
    }

    /// Records a retired wavefront vertex in the slots of the edges it borders.
    ///
    /// A vertex between two edges lands in both slots. A slot whose latest
    /// retired entry already sits at the position is left unchanged.
    ///
    /// # Errors
    ///
    /// Returns an error if an edge index has no slot.
    pub fn add_vertex(&mut self, vertex: &WavefrontVertex) -> Result<(), TopologyError> {
        self.push_unique(vertex.origin_edge, vertex.position)?;
        if vertex.exit_edge != vertex.origin_edge {
            self.push_unique(vertex.exit_edge, vertex.position)?;
        }
        Ok(())
    }

    fn push_unique(&mut self, slot: usize, position: Point2) -> Result<(), TopologyError> {
        let tolerance = self.tolerance;
        let polygon = self
            .polygons
            .get_mut(slot)
            .ok_or_else(|| TopologyError::EntityNotFound(format!("skeleton slot {slot}")))?;
        let duplicate = polygon.len() > 2
            && polygon
                .last()
                .is_some_and(|last| (last - position).norm() <= tolerance);
        if !duplicate {
            polygon.push(position);
        }
        Ok(())
    }

    /// Re-orders and de-duplicates the retired entries of every slot so each
    /// face is a simple ring.
    ///
    /// A face traces its source edge `A -> B` and then walks back towards `A`,
    /// so every step after `B` must not advance along `B - A`. Contra-directed
    /// neighbours are swapped, coincident ones merged. Neighbours level along
    /// the edge direction are swapped only if that removes a crossing with
    /// the surrounding edges.
    ///
    /// # Errors
    ///
    /// Returns `OperationError::IterationLimitExceeded` if a slot is still
    /// changing after as many passes as it has entries.
    pub fn validate_polygons(&mut self) -> Result<(), OperationError> {
        let tolerance = self.tolerance;
        for polygon in &mut self.polygons {
            repair_ring(polygon, tolerance)?;
        }
        Ok(())
    }

    #[must_use]
    pub fn polygons(&self) -> &[Vec<Point2>] {
        &self.polygons
    }

    /// The face of source edge `index`, if any.
    #[must_use]
    pub fn polygon(&self, index: usize) -> Option<&[Point2]> {
        self.polygons.get(index).map(Vec::as_slice)
    }

    /// Number of slots.
    #[must_use]
    pub fn len(&self) -> usize {
        self.polygons.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.polygons.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Vec<Point2>> {
        self.polygons.iter()
    }

    #[must_use]
    pub fn into_polygons(self) -> Vec<Vec<Point2>> {
        self.polygons
    }
}

impl<'a> IntoIterator for &'a StraightSkeleton {
    type Item = &'a Vec<Point2>;
    type IntoIter = std::slice::Iter<'a, Vec<Point2>>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

fn repair_ring(ring: &mut Vec<Point2>, tolerance: f64) -> Result<(), OperationError> {
    if ring.len() < 4 {
        return Ok(());
    }
    let edge = ring[1] - ring[0];
    if edge.norm() < TOLERANCE {
        return Ok(());
    }
    let direction = edge.normalize();
    let limit = ring.len();

    let mut passes = 0;
    loop {
        let mut changed = false;
        let mut i = 2;
        while i + 1 < ring.len() {
            let (a, b) = (ring[i], ring[i + 1]);
            let step = a - b;
            if step.norm() <= tolerance {
                ring.remove(i + 1);
                changed = true;
                continue;
            }
            let along = step.dot(&direction);
            if along < -tolerance {
                ring.swap(i, i + 1);
                changed = true;
            } else if along.abs() <= tolerance {
                let before = ring[i - 1];
                let after = ring.get(i + 2).copied().unwrap_or(ring[0]);
                if segments_cross_2d(&before, &a, &b, &after)
                    && !segments_cross_2d(&before, &b, &a, &after)
                {
                    ring.swap(i, i + 1);
                    changed = true;
                }
            }
            i += 1;
        }
        if !changed {
            return Ok(());
        }
        passes += 1;
        if passes > limit {
            return Err(OperationError::IterationLimitExceeded {
                stage: "skeleton face repair",
                limit,
            });
        }
    }
}
