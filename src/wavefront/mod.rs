//! The eroding boundary: an arena of wavefront vertices and the cyclic
//! wavefronts threaded through it.

mod cycle;
mod vertex;

pub use cycle::{Iter, Wavefront};
pub use vertex::{VertexId, WavefrontVertex};

use crate::error::TopologyError;
use slotmap::SlotMap;

/// Central arena that owns every wavefront vertex.
///
/// Vertices reference each other via typed IDs (generational indices), so a
/// vertex retired from its wavefront stays addressable as a tombstone and
/// stale links are caught instead of dangling.
#[derive(Debug, Default)]
pub struct VertexStore {
    vertices: SlotMap<VertexId, WavefrontVertex>,
}

impl VertexStore {
    /// Creates a new, empty vertex store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a vertex and returns its ID.
    pub fn add_vertex(&mut self, data: WavefrontVertex) -> VertexId {
        self.vertices.insert(data)
    }

    /// Returns a reference to the vertex, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the vertex is not in the store.
    pub fn vertex(&self, id: VertexId) -> Result<&WavefrontVertex, TopologyError> {
        self.vertices
            .get(id)
            .ok_or_else(|| TopologyError::EntityNotFound("wavefront vertex".into()))
    }

    /// Returns a mutable reference to the vertex, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the vertex is not in the store.
    pub fn vertex_mut(&mut self, id: VertexId) -> Result<&mut WavefrontVertex, TopologyError> {
        self.vertices
            .get_mut(id)
            .ok_or_else(|| TopologyError::EntityNotFound("wavefront vertex".into()))
    }

    /// Links `from.next` to `to` and `to.previous` to `from`.
    ///
    /// # Errors
    ///
    /// Returns an error if either vertex is not in the store.
    pub fn link(&mut self, from: VertexId, to: VertexId) -> Result<(), TopologyError> {
        self.vertex(to)?;
        self.vertex_mut(from)?.next = to;
        self.vertex_mut(to)?.previous = from;
        Ok(())
    }

    /// Number of vertices ever allocated, retired ones included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }
}
