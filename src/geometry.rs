//! Pure 2D geometry: points, polygons, containment, projection, reflection.
//!
//! DESIGN
//! ======
//! Every function here is stateless and infallible. Ill-defined inputs
//! (NaN coordinates, zero-length edges, self-intersecting outlines) produce
//! unspecified but non-panicking results; validation is the loader's job.

#[cfg(test)]
#[path = "geometry_test.rs"]
mod geometry_test;

use serde::{Deserialize, Serialize};

// =============================================================================
// POINT / DIMENSION
// =============================================================================

/// A point (or a 2D vector, for velocities) in canvas space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to `other`.
    #[must_use]
    pub fn distance_to(self, other: Point) -> f64 {
        distances(self, other).distance
    }

    /// Component-wise scale then translate: `self * scale + offset`.
    #[must_use]
    pub fn scale_translate(self, scale: f64, offset: Point) -> Point {
        Point { x: self.x * scale + offset.x, y: self.y * scale + offset.y }
    }
}

impl From<kurbo::Point> for Point {
    fn from(p: kurbo::Point) -> Self {
        Self { x: p.x, y: p.y }
    }
}

impl From<Point> for kurbo::Point {
    fn from(p: Point) -> Self {
        kurbo::Point::new(p.x, p.y)
    }
}

/// Width and height of a box.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Dimension {
    pub width: f64,
    pub height: f64,
}

impl Dimension {
    #[must_use]
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    #[must_use]
    pub fn scaled(self, factor: f64) -> Self {
        Self { width: self.width * factor, height: self.height * factor }
    }

    /// True when both sides are finite and strictly positive.
    #[must_use]
    pub fn is_positive(self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }
}

/// Signed components and length of `a - b`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Distances {
    pub dx: f64,
    pub dy: f64,
    pub distance: f64,
}

/// Decompose the vector from `b` to `a`.
#[must_use]
pub fn distances(a: Point, b: Point) -> Distances {
    let dx = a.x - b.x;
    let dy = a.y - b.y;
    Distances { dx, dy, distance: dx.hypot(dy) }
}

// =============================================================================
// CORE ROUTINES
// =============================================================================

/// Even-odd ray casting over the closed outline `polygon`.
///
/// An edge toggles the result when one endpoint lies strictly above `point.y`
/// and the other at or below it, and the crossing lies to the right of
/// `point.x`. Points exactly on an edge are unspecified.
#[must_use]
pub fn point_in_polygon(polygon: &[Point], point: Point) -> bool {
    let mut inside = false;
    let Some(mut pj) = polygon.last().copied() else {
        return false;
    };
    for &pi in polygon {
        if (pi.y > point.y) != (pj.y > point.y) {
            let crossing_x = (pj.x - pi.x) * (point.y - pi.y) / (pj.y - pi.y) + pi.x;
            if point.x < crossing_x {
                inside = !inside;
            }
        }
        pj = pi;
    }
    inside
}

/// Orthogonal projection of `point` onto segment `a`-`b`, clamped to the ends.
#[must_use]
pub fn closest_point_on_segment(a: Point, b: Point, point: Point) -> Point {
    let to_point = distances(point, a);
    let along = distances(b, a);
    let len_sq = along.dx * along.dx + along.dy * along.dy;
    if len_sq == 0.0 {
        return a;
    }
    let t = (to_point.dx * along.dx + to_point.dy * along.dy) / len_sq;
    if t < 0.0 {
        a
    } else if t > 1.0 {
        b
    } else {
        Point { x: a.x + along.dx * t, y: a.y + along.dy * t }
    }
}

/// Reflect `velocity` across the normal of segment `a`-`b` (elastic bounce).
#[must_use]
pub fn reflect_velocity(a: Point, b: Point, velocity: Point) -> Point {
    let wall = distances(a, b);
    let wall_angle = wall.dy.atan2(wall.dx);
    let normal = Point { x: wall_angle.sin(), y: -wall_angle.cos() };
    let d = 2.0 * (velocity.x * normal.x + velocity.y * normal.y);
    Point { x: velocity.x - normal.x * d, y: velocity.y - normal.y * d }
}

// =============================================================================
// POLYGON
// =============================================================================

/// Closest boundary hit for a query point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EdgeHit {
    pub start: Point,
    pub end: Point,
    pub closest: Point,
    pub distance: f64,
}

/// An implicitly closed outline: the last vertex connects back to the first.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Polygon {
    points: Vec<Point>,
}

impl Polygon {
    #[must_use]
    pub fn new(points: Vec<Point>) -> Self {
        Self { points }
    }

    #[must_use]
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Vertex at `index` wrapped around the outline length.
    #[must_use]
    pub fn vertex(&self, index: usize) -> Option<Point> {
        if self.points.is_empty() {
            return None;
        }
        self.points.get(index % self.points.len()).copied()
    }

    #[must_use]
    pub fn contains(&self, point: Point) -> bool {
        point_in_polygon(&self.points, point)
    }

    /// Edges as `(current, previous)` pairs, starting with `(p0, p_last)`.
    pub fn edges(&self) -> impl Iterator<Item = (Point, Point)> + '_ {
        let prev = self.points.iter().cycle().skip(self.points.len().saturating_sub(1));
        self.points.iter().copied().zip(prev.copied())
    }

    /// First edge (in `edges()` order) whose closest point lies within `radius`.
    #[must_use]
    pub fn edge_within(&self, point: Point, radius: f64) -> Option<EdgeHit> {
        self.edges().find_map(|(start, end)| {
            let closest = closest_point_on_segment(start, end, point);
            let distance = point.distance_to(closest);
            (distance < radius).then_some(EdgeHit { start, end, closest, distance })
        })
    }

    /// Edge with the smallest distance to `point`.
    #[must_use]
    pub fn nearest_edge(&self, point: Point) -> Option<EdgeHit> {
        self.edges()
            .map(|(start, end)| {
                let closest = closest_point_on_segment(start, end, point);
                EdgeHit { start, end, closest, distance: point.distance_to(closest) }
            })
            .min_by(|a, b| a.distance.total_cmp(&b.distance))
    }

    /// Axis-aligned extent of the outline as `(min, max)`.
    #[must_use]
    pub fn bounds(&self) -> Option<(Point, Point)> {
        let first = *self.points.first()?;
        Some(self.points.iter().fold((first, first), |(lo, hi), p| {
            (Point::new(lo.x.min(p.x), lo.y.min(p.y)), Point::new(hi.x.max(p.x), hi.y.max(p.y)))
        }))
    }
}
