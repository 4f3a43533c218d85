use thiserror::Error;

use crate::math::{Point2, Vector2};

/// Top-level error type for straight-skeleton generation.
#[derive(Debug, Error)]
pub enum SkeletonError {
    #[error(transparent)]
    Geometry(#[from] GeometryError),

    #[error(transparent)]
    Topology(#[from] TopologyError),

    #[error(transparent)]
    Operation(#[from] OperationError),
}

/// Errors related to geometric computations.
#[derive(Debug, Error)]
pub enum GeometryError {
    #[error(
        "ambiguous intersection between ray {origin_a:?} + t * {dir_a:?} \
         and ray {origin_b:?} + t * {dir_b:?}"
    )]
    AmbiguousIntersection {
        origin_a: Point2,
        dir_a: Vector2,
        origin_b: Point2,
        dir_b: Vector2,
    },
}

/// Errors related to the wavefront's linked structure.
#[derive(Debug, Error)]
pub enum TopologyError {
    #[error("entity not found: {0}")]
    EntityNotFound(String),

    #[error(
        "wavefront traversal starting at {start:?} did not return to its start \
         within {bound} steps"
    )]
    Connectivity { start: Point2, bound: usize },
}

/// Errors related to running the generator.
#[derive(Debug, Error)]
pub enum OperationError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("no positive offset can advance the wavefront of {vertices} vertices near {position:?}")]
    NoSafeOffset { vertices: usize, position: Point2 },

    #[error("{stage} exceeded its limit of {limit} iterations")]
    IterationLimitExceeded { stage: &'static str, limit: usize },
}

/// Non-fatal conditions surfaced alongside the generated skeleton.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SkeletonWarning {
    #[error("wavefront reduced to a single stranded vertex at {position:?}")]
    StrandedVertex { position: Point2 },
}

/// Convenience type alias for results using [`SkeletonError`].
pub type Result<T> = std::result::Result<T, SkeletonError>;
