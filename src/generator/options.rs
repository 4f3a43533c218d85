/// Parameters controlling skeleton generation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeneratorOptions {
    /// Distance below which two wavefront vertices are considered coincident,
    /// and a vertex is considered to lie on an edge.
    pub tolerance: f64,
    /// Upper bound on main-loop iterations. `None` uses the input vertex count.
    pub max_iterations: Option<usize>,
}

impl Default for GeneratorOptions {
    fn default() -> Self {
        Self {
            tolerance: 1e-9,
            max_iterations: None,
        }
    }
}

impl GeneratorOptions {
    /// Iteration bound for a polygon with `vertex_count` vertices.
    #[must_use]
    pub fn iteration_limit(&self, vertex_count: usize) -> usize {
        self.max_iterations.unwrap_or(vertex_count)
    }
}
