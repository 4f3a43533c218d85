pub mod error;
pub mod generator;
pub mod math;
pub mod skeleton;
pub mod wavefront;

pub use error::{Result, SkeletonError, SkeletonWarning};
pub use generator::{
    generate, generate_with_options, GeneratorOptions, GeneratorOutput, Progress,
    StraightSkeletonGenerator,
};
pub use math::Point2;
pub use skeleton::StraightSkeleton;
