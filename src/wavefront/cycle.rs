use std::collections::BTreeSet;

use super::{VertexId, VertexStore};
use crate::error::TopologyError;
use crate::math::bisector::angle_offset;
use crate::math::Point2;

/// One connected loop of the eroding boundary.
///
/// The loop itself is threaded through the `previous`/`next` links of the
/// vertices in a [`VertexStore`]; the wavefront only tracks which vertices
/// are currently members.
#[derive(Debug, Clone, Default)]
pub struct Wavefront {
    members: BTreeSet<VertexId>,
}

impl Wavefront {
    /// Creates an empty wavefront.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a closed wavefront by linking `ids` cyclically in order.
    ///
    /// # Errors
    ///
    /// Returns an error if any ID is not in the store.
    pub fn from_cycle(store: &mut VertexStore, ids: &[VertexId]) -> Result<Self, TopologyError> {
        let n = ids.len();
        for i in 0..n {
            store.link(ids[i], ids[(i + 1) % n])?;
        }
        Ok(Self {
            members: ids.iter().copied().collect(),
        })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    #[must_use]
    pub fn contains(&self, id: VertexId) -> bool {
        self.members.contains(&id)
    }

    /// An arbitrary (but deterministic) member.
    #[must_use]
    pub fn first(&self) -> Option<VertexId> {
        self.members.first().copied()
    }

    /// Splices `vertex` between `previous` and `next`, linking both directions.
    ///
    /// # Errors
    ///
    /// Returns an error if any of the three vertices is not in the store.
    pub fn insert(
        &mut self,
        store: &mut VertexStore,
        vertex: VertexId,
        previous: VertexId,
        next: VertexId,
    ) -> Result<(), TopologyError> {
        store.link(previous, vertex)?;
        store.link(vertex, next)?;
        self.members.insert(vertex);
        Ok(())
    }

    /// Detaches `vertex` from this wavefront. Neighbour links are left for the
    /// caller to repair.
    pub fn remove(&mut self, vertex: VertexId) -> bool {
        self.members.remove(&vertex)
    }

    /// Moves every vertex inward along its bisector by the perpendicular
    /// offset `distance`.
    ///
    /// # Errors
    ///
    /// Returns an error if a member is missing from the store.
    pub fn offset(&self, store: &mut VertexStore, distance: f64) -> Result<(), TopologyError> {
        for &id in &self.members {
            let vertex = store.vertex_mut(id)?;
            let travel = angle_offset(distance, vertex.interior_angle);
            vertex.position += vertex.bisector * travel;
        }
        Ok(())
    }

    /// Clears the per-iteration `consumed` flag on every member.
    ///
    /// # Errors
    ///
    /// Returns an error if a member is missing from the store.
    pub fn reset_consumed(&self, store: &mut VertexStore) -> Result<(), TopologyError> {
        for &id in &self.members {
            store.vertex_mut(id)?.consumed = false;
        }
        Ok(())
    }

    /// Breaks this wavefront into one child per connected cycle.
    ///
    /// # Errors
    ///
    /// Returns `TopologyError::Connectivity` if a walk along `next` links
    /// leaves the wavefront or fails to return to its start within the
    /// vertex-count bound.
    pub fn split(mut self, store: &VertexStore) -> Result<Vec<Self>, TopologyError> {
        let bound = self.members.len();
        let mut children = Vec::new();

        while let Some(start) = self.first() {
            let mut child = Self::new();
            let mut current = start;
            loop {
                if !self.members.remove(&current) {
                    return Err(connectivity_error(store, &child, start, bound));
                }
                child.members.insert(current);
                current = store.vertex(current)?.next;
                if current == start {
                    break;
                }
                if child.len() >= bound {
                    return Err(connectivity_error(store, &child, start, bound));
                }
            }
            children.push(child);
        }

        Ok(children)
    }

    /// Iterates member IDs in `next` order, starting from [`first`](Self::first).
    ///
    /// The walk yields a `Connectivity` error (and stops) if it does not return
    /// to its start within `len()` steps.
    #[must_use]
    pub fn iter<'a>(&'a self, store: &'a VertexStore) -> Iter<'a> {
        Iter {
            wavefront: self,
            store,
            start: self.first(),
            current: self.first(),
            steps: 0,
        }
    }

    /// Collects the member IDs in `next` order.
    ///
    /// # Errors
    ///
    /// Returns `TopologyError::Connectivity` on a broken cycle.
    pub fn vertex_ids(&self, store: &VertexStore) -> Result<Vec<VertexId>, TopologyError> {
        self.iter(store).collect()
    }

    /// Collects the current vertex positions in `next` order.
    ///
    /// # Errors
    ///
    /// Returns `TopologyError::Connectivity` on a broken cycle.
    pub fn positions(&self, store: &VertexStore) -> Result<Vec<Point2>, TopologyError> {
        self.iter(store)
            .map(|id| Ok(store.vertex(id?)?.position))
            .collect()
    }
}

/// Lazy traversal of a wavefront in `next` order.
#[derive(Debug)]
pub struct Iter<'a> {
    wavefront: &'a Wavefront,
    store: &'a VertexStore,
    start: Option<VertexId>,
    current: Option<VertexId>,
    steps: usize,
}

impl Iterator for Iter<'_> {
    type Item = Result<VertexId, TopologyError>;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.current?;
        let start = self.start?;
        if self.steps >= self.wavefront.len() || !self.wavefront.contains(current) {
            self.current = None;
            let bound = self.wavefront.len();
            let start_position = self
                .store
                .vertex(start)
                .map_or(Point2::origin(), |v| v.position);
            tracing::error!(
                steps = self.steps,
                bound,
                "wavefront enumeration did not close"
            );
            return Some(Err(TopologyError::Connectivity {
                start: start_position,
                bound,
            }));
        }
        self.steps += 1;
        match self.store.vertex(current) {
            Ok(vertex) => {
                self.current = (vertex.next != start).then_some(vertex.next);
                Some(Ok(current))
            }
            Err(err) => {
                self.current = None;
                Some(Err(err))
            }
        }
    }
}

fn connectivity_error(
    store: &VertexStore,
    visited: &Wavefront,
    start: VertexId,
    bound: usize,
) -> TopologyError {
    let chain: Vec<Point2> = visited
        .members
        .iter()
        .filter_map(|&id| store.vertex(id).ok().map(|v| v.position))
        .collect();
    let start = store.vertex(start).map_or(Point2::origin(), |v| v.position);
    tracing::error!(?start, bound, ?chain, "wavefront cycle is broken");
    TopologyError::Connectivity { start, bound }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::math::bisector::Bisector;
    use crate::math::polygon_2d::Winding;
    use crate::math::Vector2;
    use crate::wavefront::WavefrontVertex;
    use approx::assert_abs_diff_eq;

    fn ring(store: &mut VertexStore, points: &[(f64, f64)]) -> (Wavefront, Vec<VertexId>) {
        let n = points.len();
        let ids: Vec<VertexId> = points
            .iter()
            .enumerate()
            .map(|(i, &(x, y))| {
                store.add_vertex(WavefrontVertex::new(Point2::new(x, y), (i + n - 1) % n, i))
            })
            .collect();
        let wavefront = Wavefront::from_cycle(store, &ids).unwrap();
        (wavefront, ids)
    }

    #[test]
    fn iter_follows_next_links() {
        let mut store = VertexStore::new();
        let (wf, ids) = ring(&mut store, &[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0)]);
        assert_eq!(wf.vertex_ids(&store).unwrap(), ids);
        // Restartable: a second walk yields the same sequence.
        assert_eq!(wf.iter(&store).count(), 3);
    }

    #[test]
    fn insert_splices_between_neighbours() {
        let mut store = VertexStore::new();
        let (mut wf, ids) = ring(&mut store, &[(0.0, 0.0), (2.0, 0.0), (1.0, 1.0)]);
        let mid = store.add_vertex(WavefrontVertex::new(Point2::new(1.0, 0.0), 0, 0));
        wf.insert(&mut store, mid, ids[0], ids[1]).unwrap();
        assert_eq!(wf.len(), 4);
        assert_eq!(store.vertex(ids[0]).unwrap().next, mid);
        assert_eq!(store.vertex(ids[1]).unwrap().previous, mid);
        assert_eq!(wf.vertex_ids(&store).unwrap(), vec![ids[0], mid, ids[1], ids[2]]);
    }

    #[test]
    fn remove_reports_membership() {
        let mut store = VertexStore::new();
        let (mut wf, ids) = ring(&mut store, &[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0)]);
        assert!(wf.remove(ids[1]));
        assert!(!wf.remove(ids[1]));
        assert!(!wf.contains(ids[1]));
        // The tombstone stays addressable.
        assert!(store.vertex(ids[1]).is_ok());
    }

    #[test]
    fn enumeration_detects_broken_links() {
        let mut store = VertexStore::new();
        let (mut wf, ids) = ring(&mut store, &[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)]);
        // Drop a member without re-linking its neighbours.
        wf.remove(ids[2]);
        let result = wf.vertex_ids(&store);
        assert!(matches!(result, Err(TopologyError::Connectivity { .. })));
    }

    #[test]
    fn enumeration_detects_runaway_cycle() {
        let mut store = VertexStore::new();
        let (wf, ids) = ring(&mut store, &[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)]);
        // 0 -> 1 -> 2 -> 1 -> ... never returns to 0.
        store.vertex_mut(ids[2]).unwrap().next = ids[1];
        let result = wf.vertex_ids(&store);
        assert!(matches!(result, Err(TopologyError::Connectivity { bound: 4, .. })));
    }

    #[test]
    fn split_separates_disjoint_cycles() {
        let mut store = VertexStore::new();
        let (wf, ids) = ring(
            &mut store,
            &[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (3.0, 0.0), (4.0, 0.0), (4.0, 1.0)],
        );
        store.link(ids[2], ids[0]).unwrap();
        store.link(ids[5], ids[3]).unwrap();
        let children = wf.split(&store).unwrap();
        assert_eq!(children.len(), 2);
        assert!(children.iter().all(|c| c.len() == 3));
        assert!(children[0].contains(ids[0]) != children[1].contains(ids[0]));
    }

    #[test]
    fn split_of_connected_wavefront_is_identity() {
        let mut store = VertexStore::new();
        let (wf, _) = ring(&mut store, &[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0)]);
        let children = wf.split(&store).unwrap();
        assert_eq!(children.len(), 1);
        assert_eq!(children[0].len(), 3);
    }

    #[test]
    fn split_rejects_links_leaving_the_wavefront() {
        let mut store = VertexStore::new();
        let (mut wf, ids) = ring(&mut store, &[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)]);
        wf.remove(ids[3]);
        assert!(matches!(
            wf.split(&store),
            Err(TopologyError::Connectivity { .. })
        ));
    }

    #[test]
    fn offset_moves_along_bisectors() {
        let mut store = VertexStore::new();
        let (wf, ids) = ring(&mut store, &[(0.0, 0.0), (2.0, 0.0), (2.0, 2.0), (0.0, 2.0)]);
        let dirs = [
            Vector2::new(1.0, 0.0),
            Vector2::new(0.0, 1.0),
            Vector2::new(-1.0, 0.0),
            Vector2::new(0.0, -1.0),
        ];
        for (i, &id) in ids.iter().enumerate() {
            let b = Bisector::between(&dirs[(i + 3) % 4], &dirs[i], Winding::CounterClockwise);
            store.vertex_mut(id).unwrap().set_bisector(b);
        }
        wf.offset(&mut store, 0.5).unwrap();
        let positions = wf.positions(&store).unwrap();
        assert_abs_diff_eq!(positions[0].x, 0.5, epsilon = 1e-12);
        assert_abs_diff_eq!(positions[0].y, 0.5, epsilon = 1e-12);
        assert_abs_diff_eq!(positions[2].x, 1.5, epsilon = 1e-12);
        assert_abs_diff_eq!(positions[2].y, 1.5, epsilon = 1e-12);
    }
}
