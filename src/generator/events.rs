//! Topology events found after an offset step, and their resolution.
//!
//! After every vertex has moved, vertices that landed on the same spot are
//! grouped into an [`Intersection`]. Each maximal run of adjacent coincident
//! vertices (a chain) is retired into the skeleton and replaced by a single
//! vertex. If more than one run meets at the spot, the wavefront is pinched
//! there and forks into one loop per stretch between the runs.

use super::edges::EdgeGuide;
use crate::error::Result;
use crate::math::intersect_2d::point_inside_segment_2d;
use crate::math::Point2;
use crate::skeleton::StraightSkeleton;
use crate::wavefront::{VertexId, VertexStore, Wavefront, WavefrontVertex};

/// Vertices that coincide at one position after an offset step.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Intersection {
    pub position: Point2,
    /// Runs of adjacent vertices, in wavefront order.
    pub chains: Vec<Vec<VertexId>>,
}

/// Outcome of resolving one intersection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Event {
    /// The coincident vertices merged into at most one vertex.
    Collapse(Option<VertexId>),
    /// The wavefront was pinched at the listed vertices and forked.
    Split(Vec<VertexId>),
}

/// Inserts a vertex wherever an existing vertex lies strictly inside a
/// non-incident edge, so the contact shows up as a coincidence.
///
/// Returns the number of vertices inserted.
pub(crate) fn insert_split_vertices(
    store: &mut VertexStore,
    wavefront: &mut Wavefront,
    guide: &EdgeGuide,
    tolerance: f64,
) -> Result<usize> {
    let snapshot = wavefront.vertex_ids(store)?;
    let mut inserted = 0;

    for &id in &snapshot {
        let position = store.vertex(id)?.position;
        for start in wavefront.vertex_ids(store)? {
            let (from, end, edge) = {
                let a = store.vertex(start)?;
                (a.position, a.next, a.exit_edge)
            };
            if start == id || end == id {
                continue;
            }
            let to = store.vertex(end)?.position;
            if !point_inside_segment_2d(&position, &from, &to, tolerance) {
                continue;
            }

            let split = store.add_vertex(WavefrontVertex::new(position, edge, edge));
            wavefront.insert(store, split, start, end)?;
            guide.refresh(store, split)?;
            tracing::debug!(?position, edge, "vertex reached a wavefront edge");
            inserted += 1;
            break;
        }
    }

    Ok(inserted)
}

/// Finds the first unclaimed vertex of `cycle` that coincides with another
/// unclaimed vertex, and claims every vertex at that spot.
pub(crate) fn find_intersection(
    store: &mut VertexStore,
    cycle: &[VertexId],
    tolerance: f64,
) -> Result<Option<Intersection>> {
    for &seed in cycle {
        let seed_vertex = store.vertex(seed)?;
        if seed_vertex.consumed {
            continue;
        }
        let anchor = seed_vertex.position;

        let mut members = Vec::with_capacity(cycle.len());
        for &id in cycle {
            let vertex = store.vertex(id)?;
            members.push(!vertex.consumed && (vertex.position - anchor).norm() <= tolerance);
        }
        let count = members.iter().filter(|&&m| m).count();
        if count < 2 {
            continue;
        }

        let mut sum = Point2::origin().coords;
        for (&id, _) in cycle.iter().zip(&members).filter(|&(_, &m)| m) {
            let vertex = store.vertex_mut(id)?;
            vertex.consumed = true;
            sum += vertex.position.coords;
        }
        #[allow(clippy::cast_precision_loss)]
        let position = Point2::from(sum / count as f64);

        return Ok(Some(Intersection {
            position,
            chains: chains_of(cycle, &members),
        }));
    }
    Ok(None)
}

/// Splits the flagged entries of a cyclic sequence into maximal runs. A run
/// that wraps past the end of `cycle` is reported once.
fn chains_of(cycle: &[VertexId], members: &[bool]) -> Vec<Vec<VertexId>> {
    let Some(gap) = members.iter().position(|&m| !m) else {
        return vec![cycle.to_vec()];
    };
    let n = cycle.len();
    let mut chains = Vec::new();
    let mut run = Vec::new();
    for step in 1..=n {
        let j = (gap + step) % n;
        if members[j] {
            run.push(cycle[j]);
        } else if !run.is_empty() {
            chains.push(std::mem::take(&mut run));
        }
    }
    chains
}

/// Applies intersections to a wavefront, recording retired vertices.
pub(crate) struct Resolver<'a> {
    pub store: &'a mut VertexStore,
    pub skeleton: &'a mut StraightSkeleton,
    pub guide: &'a EdgeGuide,
    pub tolerance: f64,
}

impl Resolver<'_> {
    /// Detects and resolves intersections until none are left.
    pub(crate) fn resolve_all(&mut self, wavefront: &mut Wavefront) -> Result<Vec<Event>> {
        let mut events = Vec::new();
        while let Some(intersection) = self.next_intersection(wavefront)? {
            let event = self.resolve(wavefront, &intersection)?;
            tracing::debug!(
                position = ?intersection.position,
                chains = intersection.chains.len(),
                ?event,
                "resolved wavefront event"
            );
            events.push(event);
        }
        Ok(events)
    }

    fn next_intersection(&mut self, wavefront: &Wavefront) -> Result<Option<Intersection>> {
        // Earlier forks may already have broken the wavefront into loops.
        for cycle in wavefront.clone().split(self.store)? {
            let order = cycle.vertex_ids(self.store)?;
            if let Some(found) = find_intersection(self.store, &order, self.tolerance)? {
                return Ok(Some(found));
            }
        }
        Ok(None)
    }

    pub(crate) fn resolve(
        &mut self,
        wavefront: &mut Wavefront,
        intersection: &Intersection,
    ) -> Result<Event> {
        let position = intersection.position;
        let mut survivors = Vec::new();
        for chain in &intersection.chains {
            if let Some(survivor) = self.simplify_chain(wavefront, chain, position)? {
                survivors.push(survivor);
            }
        }

        if survivors.len() <= 1 {
            return Ok(Event::Collapse(survivors.pop()));
        }
        self.fork(wavefront, &survivors, position)?;
        Ok(Event::Split(survivors))
    }

    /// Replaces a run of coincident vertices by one vertex bordering the
    /// run's outer edges. Returns `None` if the run was the whole loop.
    fn simplify_chain(
        &mut self,
        wavefront: &mut Wavefront,
        chain: &[VertexId],
        position: Point2,
    ) -> Result<Option<VertexId>> {
        let (Some(&first), Some(&last)) = (chain.first(), chain.last()) else {
            return Ok(None);
        };
        if chain.len() == 1 {
            return Ok(Some(first));
        }

        let (previous, origin_edge) = {
            let v = self.store.vertex(first)?;
            (v.previous, v.origin_edge)
        };
        let (next, exit_edge) = {
            let v = self.store.vertex(last)?;
            (v.next, v.exit_edge)
        };
        for &id in chain {
            self.retire(wavefront, id, position)?;
        }
        if !wavefront.contains(previous) || !wavefront.contains(next) {
            return Ok(None);
        }

        Ok(Some(self.spawn(wavefront, position, origin_edge, exit_edge, previous, next)?))
    }

    /// Retires the survivors of a multi-run intersection and closes each
    /// stretch between consecutive survivors into its own loop.
    fn fork(
        &mut self,
        wavefront: &mut Wavefront,
        survivors: &[VertexId],
        position: Point2,
    ) -> Result<()> {
        let mut ends = Vec::with_capacity(survivors.len());
        for &id in survivors {
            let v = self.store.vertex(id)?;
            ends.push((v.previous, v.next, v.origin_edge, v.exit_edge));
        }
        for &id in survivors {
            self.retire(wavefront, id, position)?;
        }

        let k = ends.len();
        for i in 0..k {
            let (previous, _, origin_edge, _) = ends[(i + 1) % k];
            let (_, next, _, exit_edge) = ends[i];
            self.spawn(wavefront, position, origin_edge, exit_edge, previous, next)?;
        }
        Ok(())
    }

    fn retire(&mut self, wavefront: &mut Wavefront, id: VertexId, position: Point2) -> Result<()> {
        let vertex = self.store.vertex_mut(id)?;
        vertex.position = position;
        self.skeleton.add_vertex(vertex)?;
        wavefront.remove(id);
        Ok(())
    }

    fn spawn(
        &mut self,
        wavefront: &mut Wavefront,
        position: Point2,
        origin_edge: usize,
        exit_edge: usize,
        previous: VertexId,
        next: VertexId,
    ) -> Result<VertexId> {
        let mut vertex = WavefrontVertex::new(position, origin_edge, exit_edge);
        vertex.consumed = true;
        let id = self.store.add_vertex(vertex);
        wavefront.insert(self.store, id, previous, next)?;
        self.guide.refresh(self.store, id)?;
        Ok(id)
    }
}
