//! Host capabilities: the narrow interface between the mask and its engine.
//!
//! DESIGN
//! ======
//! The mask never owns the particle system. It reads canvas size, pixel
//! ratio and particle counts through [`MaskHost`], asks the host to spawn
//! particles or redraw, and announces completed loads. Per-frame queries
//! work on a borrowed [`Particle`] view instead of the host's own type.
//!
//! Drawing goes through [`MaskCanvas`], a stroke-only subset of a 2D
//! context. [`MaskCanvas::trace_path`] replays a `kurbo` path onto it.

use kurbo::{BezPath, PathEl};

use crate::draw::Rgb;
use crate::geometry::{Dimension, Point};

// =============================================================================
// HOST
// =============================================================================

/// Capabilities the owning particle engine provides.
pub trait MaskHost: Send + Sync {
    /// Canvas size in device pixels.
    fn canvas_size(&self) -> Dimension;

    /// Device pixel ratio. Values `<= 0` are treated as 1.
    fn pixel_ratio(&self) -> f64;

    /// Number of live particles.
    fn particle_count(&self) -> usize;

    /// Configured particle population.
    fn target_particle_count(&self) -> usize;

    /// Create a particle at `position` (canvas space).
    fn spawn_particle(&self, position: Point);

    /// Re-place and redraw every particle after the mask moved.
    fn redraw_all(&self);

    /// The mask finished a (re)load.
    fn mask_loaded(&self);
}

// =============================================================================
// PARTICLE
// =============================================================================

/// Mutable per-frame view of one particle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    pub position: Point,
    pub velocity: Point,
    pub radius: f64,
    /// Spawn point, used by the inline leash.
    pub initial_position: Option<Point>,
}

impl Particle {
    #[must_use]
    pub fn new(position: Point, velocity: Point, radius: f64) -> Self {
        Self { position, velocity, radius, initial_position: Some(position) }
    }
}

/// Which canvas edge a collision pass is checking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Top,
    Bottom,
    Left,
    Right,
}

// =============================================================================
// CANVAS
// =============================================================================

/// Stroke-only 2D drawing surface.
pub trait MaskCanvas {
    fn save(&mut self);
    fn restore(&mut self);
    fn translate(&mut self, x: f64, y: f64);
    fn set_stroke_style(&mut self, color: Rgb);
    fn set_line_width(&mut self, width: f64);
    fn begin_path(&mut self);
    fn move_to(&mut self, x: f64, y: f64);
    fn line_to(&mut self, x: f64, y: f64);
    fn quadratic_curve_to(&mut self, cx: f64, cy: f64, x: f64, y: f64);
    fn bezier_curve_to(&mut self, c1x: f64, c1y: f64, c2x: f64, c2y: f64, x: f64, y: f64);
    fn close_path(&mut self);
    fn stroke(&mut self);

    /// Append every element of `path` to the current path.
    fn trace_path(&mut self, path: &BezPath) {
        for el in path.elements() {
            match *el {
                PathEl::MoveTo(p) => self.move_to(p.x, p.y),
                PathEl::LineTo(p) => self.line_to(p.x, p.y),
                PathEl::QuadTo(c, p) => self.quadratic_curve_to(c.x, c.y, p.x, p.y),
                PathEl::CurveTo(c1, c2, p) => self.bezier_curve_to(c1.x, c1.y, c2.x, c2.y, p.x, p.y),
                PathEl::ClosePath => self.close_path(),
            }
        }
    }
}
