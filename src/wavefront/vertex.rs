use crate::math::bisector::{self, Bisector};
use crate::math::{Point2, Vector2};

slotmap::new_key_type! {
    /// Unique identifier for a wavefront vertex in the vertex store.
    pub struct VertexId;
}

/// One node of a wavefront.
///
/// `previous` and `next` are keys into the owning [`VertexStore`](super::VertexStore).
/// `origin_edge` and `exit_edge` are skeleton slot indices of the incoming
/// (`previous -> self`) and outgoing (`self -> next`) wavefront edges.
#[derive(Debug, Clone)]
pub struct WavefrontVertex {
    /// Current location, moved by every offset step.
    pub position: Point2,
    /// Interior angle in degrees, in `(0, 360)`.
    pub interior_angle: f64,
    /// Inward unit bisector.
    pub bisector: Vector2,
    pub previous: VertexId,
    pub next: VertexId,
    /// Claimed by an event in the current iteration.
    pub consumed: bool,
    pub origin_edge: usize,
    pub exit_edge: usize,
}

impl WavefrontVertex {
    /// Creates an unlinked vertex. The bisector is unset until
    /// [`set_bisector`](Self::set_bisector) is called.
    #[must_use]
    pub fn new(position: Point2, origin_edge: usize, exit_edge: usize) -> Self {
        Self {
            position,
            interior_angle: 180.0,
            bisector: Vector2::zeros(),
            previous: VertexId::default(),
            next: VertexId::default(),
            consumed: false,
            origin_edge,
            exit_edge,
        }
    }

    pub fn set_bisector(&mut self, bisector: Bisector) {
        self.interior_angle = bisector.interior_angle;
        self.bisector = bisector.direction;
    }

    #[must_use]
    pub fn is_reflex(&self) -> bool {
        self.interior_angle >= 180.0
    }

    /// Distance travelled along the bisector per unit of perpendicular offset.
    #[must_use]
    pub fn speed(&self) -> f64 {
        1.0 / bisector::half_angle_sine(self.interior_angle)
    }

    /// Velocity per unit of perpendicular offset.
    #[must_use]
    pub fn velocity(&self) -> Vector2 {
        self.bisector * self.speed()
    }

    /// Position after a further perpendicular offset of `distance`.
    #[must_use]
    pub fn position_at(&self, distance: f64) -> Point2 {
        self.position + self.velocity() * distance
    }
}
