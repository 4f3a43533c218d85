use crate::error::TopologyError;
use crate::math::bisector::Bisector;
use crate::math::polygon_2d::Winding;
use crate::math::Vector2;
use crate::wavefront::{VertexId, VertexStore, WavefrontVertex};

/// Unit directions of the source edges together with the polygon winding.
///
/// Offset edges stay parallel to their source edge, so every wavefront edge
/// is described by the direction of the slot it feeds.
#[derive(Debug, Clone)]
pub(crate) struct EdgeGuide {
    directions: Vec<Vector2>,
    winding: Winding,
}

impl EdgeGuide {
    pub(crate) fn new(directions: Vec<Vector2>, winding: Winding) -> Self {
        Self {
            directions,
            winding,
        }
    }

    pub(crate) fn direction(&self, edge: usize) -> Result<Vector2, TopologyError> {
        self.directions
            .get(edge)
            .copied()
            .ok_or_else(|| TopologyError::EntityNotFound(format!("source edge {edge}")))
    }

    pub(crate) fn inward_normal(&self, edge: usize) -> Result<Vector2, TopologyError> {
        Ok(self.winding.inward_normal(&self.direction(edge)?))
    }

    pub(crate) fn bisector(&self, vertex: &WavefrontVertex) -> Result<Bisector, TopologyError> {
        let incoming = self.direction(vertex.origin_edge)?;
        let outgoing = self.direction(vertex.exit_edge)?;
        Ok(Bisector::between(&incoming, &outgoing, self.winding))
    }

    /// Recomputes the interior angle and bisector of `id` from its edges.
    pub(crate) fn refresh(&self, store: &mut VertexStore, id: VertexId) -> Result<(), TopologyError> {
        let bisector = self.bisector(store.vertex(id)?)?;
        store.vertex_mut(id)?.set_bisector(bisector);
        Ok(())
    }
}
