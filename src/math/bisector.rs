//! Angle bisector math shared by wavefront vertices.
//!
//! A wavefront vertex sits between an incoming and an outgoing edge. When
//! every edge moves inward by `d`, the vertex slides along the bisector of its
//! interior angle `a` by `d / sin(a / 2)`.

use super::polygon_2d::Winding;
use super::{perp, Vector2, TOLERANCE};

/// Interior angle (degrees) and inward unit bisector at a wavefront vertex.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bisector {
    pub interior_angle: f64,
    pub direction: Vector2,
}

impl Bisector {
    /// Computes the bisector between an incoming and an outgoing edge, both
    /// given as unit directions along the wavefront traversal.
    ///
    /// For antiparallel edges (a zero-width spike) the sum of the inward
    /// normals vanishes; the vertex then retreats along the spike.
    #[must_use]
    pub fn between(incoming: &Vector2, outgoing: &Vector2, winding: Winding) -> Self {
        let turn = perp(incoming, outgoing)
            .atan2(incoming.dot(outgoing))
            .to_degrees();
        let interior_angle = 180.0 - winding.sign() * turn;

        let normal_sum = winding.inward_normal(incoming) + winding.inward_normal(outgoing);
        let direction = if normal_sum.norm() > TOLERANCE {
            normal_sum.normalize()
        } else if interior_angle < 180.0 {
            -incoming
        } else {
            *incoming
        };

        Self {
            interior_angle,
            direction,
        }
    }

    /// Returns `true` for interior angles of 180 degrees or more.
    #[must_use]
    pub fn is_reflex(&self) -> bool {
        self.interior_angle >= 180.0
    }
}

/// `sin(interior_angle / 2)`: the perpendicular offset gained per unit of
/// travel along the bisector.
#[must_use]
pub fn half_angle_sine(interior_angle: f64) -> f64 {
    (interior_angle.to_radians() * 0.5).sin()
}

/// Converts a perpendicular offset distance into the distance a vertex with
/// the given interior angle travels along its bisector.
#[must_use]
pub fn angle_offset(distance: f64, interior_angle: f64) -> f64 {
    distance / half_angle_sine(interior_angle)
}
