//! Straight-skeleton generation by wavefront propagation.
//!
//! The polygon boundary is shrunk in discrete steps. Each step advances every
//! wavefront by the largest offset that cannot skip a topology change, then
//! merges coincident vertices, forks pinched wavefronts and records every
//! retired vertex in the face of the edges it bordered.

mod edges;
mod events;
mod offset;
mod options;

pub use options::GeneratorOptions;

use edges::EdgeGuide;
use events::{insert_split_vertices, Resolver};

use crate::error::{OperationError, Result, SkeletonError, SkeletonWarning, TopologyError};
use crate::math::polygon_2d::{segment_direction, Winding};
use crate::math::{is_finite_point, Point2};
use crate::skeleton::StraightSkeleton;
use crate::wavefront::{VertexStore, Wavefront, WavefrontVertex};

/// Whether a generator has wavefronts left to process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Progress {
    Pending,
    Complete,
}

/// Everything a finished run produced.
#[derive(Debug)]
pub struct GeneratorOutput {
    pub skeleton: StraightSkeleton,
    /// Non-fatal conditions met along the way.
    pub warnings: Vec<SkeletonWarning>,
    /// Errors that stopped individual wavefronts. Faces those wavefronts
    /// would have completed are left partial.
    pub failures: Vec<SkeletonError>,
}

/// Computes the straight skeleton of a simple polygon.
///
/// # Errors
///
/// Returns the input validation error, the first error that stopped a
/// wavefront, or `OperationError::IterationLimitExceeded`.
///
/// # Example
///
/// ```
/// use roofline::{generate, Point2};
///
/// let square = [
///     Point2::new(-1.0, -1.0),
///     Point2::new(-1.0, 1.0),
///     Point2::new(1.0, 1.0),
///     Point2::new(1.0, -1.0),
/// ];
/// let skeleton = generate(&square).unwrap();
/// assert_eq!(skeleton.len(), 4);
/// assert!(skeleton.iter().all(|face| face.len() == 3));
/// ```
pub fn generate(polygon: &[Point2]) -> Result<StraightSkeleton> {
    generate_with_options(polygon, GeneratorOptions::default())
}

/// [`generate`] with explicit options.
///
/// # Errors
///
/// See [`generate`].
pub fn generate_with_options(
    polygon: &[Point2],
    options: GeneratorOptions,
) -> Result<StraightSkeleton> {
    let output = StraightSkeletonGenerator::with_options(polygon, options)?.finish()?;
    match output.failures.into_iter().next() {
        Some(failure) => Err(failure),
        None => Ok(output.skeleton),
    }
}

/// Incremental straight-skeleton generator.
///
/// Call [`step`](Self::step) to run a bounded number of iterations and
/// inspect the partial result in between, or [`finish`](Self::finish) to run
/// to completion.
#[derive(Debug)]
pub struct StraightSkeletonGenerator {
    store: VertexStore,
    active: Vec<Wavefront>,
    skeleton: StraightSkeleton,
    guide: EdgeGuide,
    options: GeneratorOptions,
    iteration: usize,
    iteration_limit: usize,
    warnings: Vec<SkeletonWarning>,
    failures: Vec<SkeletonError>,
}

impl StraightSkeletonGenerator {
    /// Creates a generator with default options.
    ///
    /// # Errors
    ///
    /// Returns `OperationError::InvalidInput` for fewer than 3 points,
    /// non-finite coordinates, zero-length edges or zero area.
    pub fn new(polygon: &[Point2]) -> Result<Self> {
        Self::with_options(polygon, GeneratorOptions::default())
    }

    /// Creates a generator with the given options.
    ///
    /// # Errors
    ///
    /// See [`new`](Self::new). A negative or non-finite tolerance is also
    /// rejected.
    pub fn with_options(polygon: &[Point2], options: GeneratorOptions) -> Result<Self> {
        let guide = validate_polygon(polygon, &options)?;
        let (store, wavefront) = seed_wavefront(polygon, &guide)?;
        let iteration_limit = options.iteration_limit(polygon.len());
        tracing::debug!(
            vertices = polygon.len(),
            iteration_limit,
            "initialised straight skeleton"
        );
        Ok(Self {
            store,
            active: vec![wavefront],
            skeleton: StraightSkeleton::from_polygon(polygon, options.tolerance),
            guide,
            options,
            iteration: 0,
            iteration_limit,
            warnings: Vec::new(),
            failures: Vec::new(),
        })
    }

    /// Runs at most `budget` iterations.
    ///
    /// # Errors
    ///
    /// Returns `OperationError::IterationLimitExceeded` once the iteration
    /// bound is exhausted, or an error from the per-iteration face repair.
    /// Errors confined to one wavefront are collected in
    /// [`failures`](Self::failures) instead.
    pub fn step(&mut self, budget: usize) -> Result<Progress> {
        for _ in 0..budget {
            if self.active.is_empty() {
                break;
            }
            self.iterate()?;
        }
        Ok(self.progress())
    }

    /// Runs to completion.
    ///
    /// # Errors
    ///
    /// See [`step`](Self::step).
    pub fn finish(mut self) -> Result<GeneratorOutput> {
        while !self.active.is_empty() {
            self.iterate()?;
        }
        Ok(GeneratorOutput {
            skeleton: self.skeleton,
            warnings: self.warnings,
            failures: self.failures,
        })
    }

    #[must_use]
    pub fn progress(&self) -> Progress {
        if self.active.is_empty() {
            Progress::Complete
        } else {
            Progress::Pending
        }
    }

    /// The faces recorded so far.
    #[must_use]
    pub fn skeleton(&self) -> &StraightSkeleton {
        &self.skeleton
    }

    /// Current positions of every active wavefront, each in traversal order.
    ///
    /// # Errors
    ///
    /// Returns `TopologyError::Connectivity` if a wavefront is broken.
    pub fn wavefront_loops(&self) -> Result<Vec<Vec<Point2>>> {
        self.active
            .iter()
            .map(|wavefront| wavefront.positions(&self.store).map_err(SkeletonError::from))
            .collect()
    }

    #[must_use]
    pub fn warnings(&self) -> &[SkeletonWarning] {
        &self.warnings
    }

    #[must_use]
    pub fn failures(&self) -> &[SkeletonError] {
        &self.failures
    }

    /// Number of iterations run so far.
    #[must_use]
    pub fn iteration(&self) -> usize {
        self.iteration
    }

    fn iterate(&mut self) -> Result<()> {
        if self.iteration >= self.iteration_limit {
            return Err(OperationError::IterationLimitExceeded {
                stage: "wavefront propagation",
                limit: self.iteration_limit,
            }
            .into());
        }
        self.iteration += 1;

        let wavefronts = std::mem::take(&mut self.active);
        for wavefront in &wavefronts {
            wavefront.reset_consumed(&mut self.store)?;
        }

        let mut children = Vec::new();
        for wavefront in wavefronts {
            match self.advance(wavefront) {
                Ok(split) => children.extend(split),
                Err(err) => {
                    tracing::error!(
                        iteration = self.iteration,
                        error = %err,
                        "dropping wavefront"
                    );
                    self.failures.push(err);
                }
            }
        }

        self.skeleton.validate_polygons()?;
        for child in children {
            self.settle(child)?;
        }

        tracing::debug!(
            iteration = self.iteration,
            active = self.active.len(),
            "wavefront iteration complete"
        );
        Ok(())
    }

    /// Moves one wavefront to its next event and returns its connected
    /// pieces.
    fn advance(&mut self, mut wavefront: Wavefront) -> Result<Vec<Wavefront>> {
        let tolerance = self.options.tolerance;
        let distance =
            offset::smallest_safe_offset(&self.store, &wavefront, &self.guide, tolerance)?;
        wavefront.offset(&mut self.store, distance)?;

        let inserted =
            insert_split_vertices(&mut self.store, &mut wavefront, &self.guide, tolerance)?;
        let resolved = Resolver {
            store: &mut self.store,
            skeleton: &mut self.skeleton,
            guide: &self.guide,
            tolerance,
        }
        .resolve_all(&mut wavefront)?;

        tracing::debug!(
            distance,
            vertices = wavefront.len(),
            inserted,
            events = resolved.len(),
            "advanced wavefront"
        );
        Ok(wavefront.split(&self.store)?)
    }

    /// Keeps a wavefront piece active, or retires it if it is degenerate.
    fn settle(&mut self, wavefront: Wavefront) -> Result<()> {
        match wavefront.len() {
            0 => {}
            1 => {
                if let Some(id) = wavefront.first() {
                    let position = self.store.vertex(id)?.position;
                    tracing::warn!(?position, "wavefront reduced to a single vertex");
                    self.warnings
                        .push(SkeletonWarning::StrandedVertex { position });
                }
            }
            2 => {
                tracing::debug!("pruned two-vertex sliver");
            }
            _ => self.active.push(wavefront),
        }
        Ok(())
    }
}

/// Checks that `polygon` can be eroded and derives its edge directions and
/// winding.
fn validate_polygon(polygon: &[Point2], options: &GeneratorOptions) -> Result<EdgeGuide> {
    if !(options.tolerance.is_finite() && options.tolerance >= 0.0) {
        return Err(OperationError::InvalidInput(format!(
            "tolerance must be finite and non-negative, got {}",
            options.tolerance
        ))
        .into());
    }
    let n = polygon.len();
    if n < 3 {
        return Err(OperationError::InvalidInput(format!(
            "at least 3 points are required, got {n}"
        ))
        .into());
    }
    if let Some(p) = polygon.iter().find(|p| !is_finite_point(p)) {
        return Err(
            OperationError::InvalidInput(format!("non-finite point ({}, {})", p.x, p.y)).into(),
        );
    }

    let directions = (0..n)
        .map(|i| segment_direction(&polygon[i], &polygon[(i + 1) % n]))
        .collect::<Result<Vec<_>>>()?;
    let winding = Winding::of(polygon)
        .ok_or_else(|| OperationError::InvalidInput("polygon has zero area".to_owned()))?;

    Ok(EdgeGuide::new(directions, winding))
}

/// Builds the initial wavefront: vertex `i` sits between edges `i - 1` and
/// `i`.
fn seed_wavefront(
    polygon: &[Point2],
    guide: &EdgeGuide,
) -> std::result::Result<(VertexStore, Wavefront), TopologyError> {
    let n = polygon.len();
    let mut store = VertexStore::new();
    let ids: Vec<_> = polygon
        .iter()
        .enumerate()
        .map(|(i, &p)| store.add_vertex(WavefrontVertex::new(p, (i + n - 1) % n, i)))
        .collect();
    let wavefront = Wavefront::from_cycle(&mut store, &ids)?;
    for &id in &ids {
        guide.refresh(&mut store, id)?;
    }
    Ok((store, wavefront))
}
