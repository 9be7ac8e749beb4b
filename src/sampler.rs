//! Placement strategies: where a particle spawns relative to the mask.
//!
//! DESIGN
//! ======
//! A [`Sampler`] borrows one loaded mask snapshot (outline, measured
//! document, effective scale and offset) and answers placement queries
//! without mutating anything. Vertex strategies read the outline directly,
//! which is already in canvas space. Arc-length strategies resolve a point in
//! source coordinates and then apply `scale` and `offset`.
//!
//! Rejection sampling for free placement is bounded: after
//! `max_attempts` failed draws it surfaces [`MaskError::PlacementExhausted`]
//! instead of spinning on a zero-area or canvas-covering outline.

#[cfg(test)]
#[path = "sampler_test.rs"]
mod sampler_test;

use rand::Rng;
use rand::seq::IndexedRandom;
use tracing::warn;

use crate::config::{InlineArrangement, MaskType};
use crate::error::MaskError;
use crate::geometry::{Dimension, Point, Polygon};
use crate::loader::PathDocument;

/// Whether `point` satisfies the containment rule of `mask_type`.
///
/// `inside` requires the point in the outline, `outside` requires it out;
/// `none` and `inline` accept everything.
#[must_use]
pub fn satisfies(polygon: &Polygon, mask_type: MaskType, point: Point) -> bool {
    match mask_type {
        MaskType::Inside => polygon.contains(point),
        MaskType::Outside => !polygon.contains(point),
        MaskType::None | MaskType::Inline => true,
    }
}

/// Arc-length offset of equidistant sample `index` among `target` samples.
///
/// The index wraps modulo the target, and a target of zero counts as one, so
/// offsets always fall in `[0, total_length)` for a positive length.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn equidistant_offset(total_length: f64, index: usize, target: usize) -> f64 {
    let target = target.max(1);
    let stride = total_length / target as f64;
    stride * (index % target) as f64
}

/// Read-only view over one loaded mask for placement queries.
#[derive(Debug, Clone, Copy)]
pub struct Sampler<'a> {
    polygon: &'a Polygon,
    document: &'a PathDocument,
    scale: f64,
    offset: Point,
}

impl<'a> Sampler<'a> {
    #[must_use]
    pub fn new(polygon: &'a Polygon, document: &'a PathDocument, scale: f64, offset: Point) -> Self {
        Self { polygon, document, scale, offset }
    }

    /// Outline vertex at `index` modulo the vertex count.
    ///
    /// # Errors
    ///
    /// Returns [`MaskError::DataNotLoaded`] if the outline is empty.
    pub fn vertex(&self, index: usize) -> Result<Point, MaskError> {
        self.polygon.vertex(index).ok_or(MaskError::DataNotLoaded)
    }

    /// A uniformly chosen outline vertex.
    ///
    /// # Errors
    ///
    /// Returns [`MaskError::DataNotLoaded`] if the outline is empty.
    pub fn random_vertex<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<Point, MaskError> {
        self.polygon.points().choose(rng).copied().ok_or(MaskError::DataNotLoaded)
    }

    /// A point at a uniform arc length along a uniformly chosen segment.
    ///
    /// # Errors
    ///
    /// Returns [`MaskError::DataNotLoaded`] if the document has no geometry.
    pub fn random_length<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<Point, MaskError> {
        let segment = self.document.segments().choose(rng).ok_or(MaskError::DataNotLoaded)?;
        let distance = rng.random::<f64>() * segment.length();
        let point = segment.point_at_length(distance).ok_or(MaskError::DataNotLoaded)?;
        Ok(self.place(point))
    }

    /// Sample `index` of `target` evenly spaced along the concatenated paths.
    ///
    /// # Errors
    ///
    /// Returns [`MaskError::DataNotLoaded`] if the document has no geometry.
    pub fn equidistant(&self, index: usize, target: usize) -> Result<Point, MaskError> {
        let segments = self.document.segments();
        let mut remaining = equidistant_offset(self.document.total_length(), index, target);
        for (i, segment) in segments.iter().enumerate() {
            let is_last = i + 1 == segments.len();
            if remaining < segment.length() || is_last {
                let point = segment.point_at_length(remaining).ok_or(MaskError::DataNotLoaded)?;
                return Ok(self.place(point));
            }
            remaining -= segment.length();
        }
        Err(MaskError::DataNotLoaded)
    }

    /// A uniform point in `bounds` that satisfies `mask_type`'s containment.
    ///
    /// # Errors
    ///
    /// Returns [`MaskError::PlacementExhausted`] after `max_attempts` rejected
    /// draws.
    pub fn free_point<R: Rng + ?Sized>(
        &self,
        bounds: Dimension,
        mask_type: MaskType,
        max_attempts: usize,
        rng: &mut R,
    ) -> Result<Point, MaskError> {
        let attempts = max_attempts.max(1);
        for _ in 0..attempts {
            let candidate = Point::new(rng.random::<f64>() * bounds.width, rng.random::<f64>() * bounds.height);
            if satisfies(self.polygon, mask_type, candidate) {
                return Ok(candidate);
            }
        }
        warn!(attempts, ?mask_type, "free placement exhausted without a valid point");
        Err(MaskError::PlacementExhausted { attempts })
    }

    /// Position for particle `index` under `arrangement`.
    ///
    /// # Errors
    ///
    /// Propagates the chosen strategy's error.
    pub fn arranged<R: Rng + ?Sized>(
        &self,
        arrangement: InlineArrangement,
        index: usize,
        target: usize,
        rng: &mut R,
    ) -> Result<Point, MaskError> {
        match arrangement {
            InlineArrangement::OnePerPoint | InlineArrangement::PerPoint => self.vertex(index),
            InlineArrangement::RandomPoint => self.random_vertex(rng),
            InlineArrangement::RandomLength => self.random_length(rng),
            InlineArrangement::Equidistant => self.equidistant(index, target),
        }
    }

    fn place(&self, point: Point) -> Point {
        point.scale_translate(self.scale, self.offset)
    }
}
