//! Rasterization: flatten measured paths into the canvas-space outline.
//!
//! DESIGN
//! ======
//! The outline samples each path at its native command endpoints (one point
//! per move/line/curve/arc command), scaled and then translated by an offset
//! that centers the scaled document at the configured relative position.
//! The offset is recomputed on every run from the current canvas size, which
//! is what lets the mask follow window resizes.
//!
//! Containment and bounce only ever see the outline points. The scaled
//! `outlines` are kept for drawing, where curve precision matters.

#[cfg(test)]
#[path = "raster_test.rs"]
mod raster_test;

use kurbo::{Affine, BezPath};
use svgtypes::PathSegment as Command;

use crate::consts::MIN_POLYGON_POINTS;
use crate::error::MaskError;
use crate::geometry::{Dimension, Point, Polygon};
use crate::loader::PathDocument;

/// Inputs that place a document on the canvas.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RasterParams {
    /// Configured scale (before pixel-ratio correction).
    pub scale: f64,
    pub pixel_ratio: f64,
    /// Canvas size in device pixels.
    pub canvas: Dimension,
    /// Mask center in percent of the canvas.
    pub position: Point,
}

/// Canvas-space result of one rasterization run.
#[derive(Debug, Clone, PartialEq)]
pub struct RasterizedMask {
    pub polygon: Polygon,
    /// Document size after scaling.
    pub dimension: Dimension,
    /// Translation from scaled document space to canvas space.
    pub offset: Point,
    /// Effective scale applied to source coordinates.
    pub scale: f64,
    /// Per-segment path geometry scaled (not translated) for drawing. Empty
    /// for raw point sources, which are drawn from `polygon`.
    pub outlines: Vec<BezPath>,
}

/// `scale / pixel_ratio`, treating a non-positive ratio as 1.
#[must_use]
pub fn effective_scale(scale: f64, pixel_ratio: f64) -> f64 {
    scale / sane_ratio(pixel_ratio)
}

/// Offset that centers `dimension` at `position` percent of the canvas.
#[must_use]
pub fn compute_offset(canvas: Dimension, pixel_ratio: f64, position: Point, dimension: Dimension) -> Point {
    let ratio = sane_ratio(pixel_ratio);
    Point {
        x: canvas.width * position.x / (100.0 * ratio) - dimension.width / 2.0,
        y: canvas.height * position.y / (100.0 * ratio) - dimension.height / 2.0,
    }
}

/// `pixel_ratio`, or 1 when it is not a positive finite number.
pub(crate) fn sane_ratio(pixel_ratio: f64) -> f64 {
    if pixel_ratio.is_finite() && pixel_ratio > 0.0 { pixel_ratio } else { 1.0 }
}

/// Endpoints of every command in `data`, in source coordinates.
///
/// Close commands emit nothing and move the current point back to the
/// subpath start.
///
/// # Errors
///
/// Returns [`MaskError::PathData`] if `data` is not valid path data.
pub fn path_anchors(data: &str) -> Result<Vec<Point>, MaskError> {
    let mut anchors = Vec::new();
    let mut current = Point::default();
    let mut subpath_start = Point::default();

    for command in svgtypes::PathParser::from(data) {
        let command = command.map_err(|e| MaskError::PathData(format!("{e}: {data}")))?;
        match command {
            Command::MoveTo { abs, x, y } => {
                current = resolve(abs, current, x, y);
                subpath_start = current;
            }
            Command::LineTo { abs, x, y }
            | Command::CurveTo { abs, x, y, .. }
            | Command::SmoothCurveTo { abs, x, y, .. }
            | Command::Quadratic { abs, x, y, .. }
            | Command::SmoothQuadratic { abs, x, y }
            | Command::EllipticalArc { abs, x, y, .. } => {
                current = resolve(abs, current, x, y);
            }
            Command::HorizontalLineTo { abs, x } => {
                current.x = if abs { x } else { current.x + x };
            }
            Command::VerticalLineTo { abs, y } => {
                current.y = if abs { y } else { current.y + y };
            }
            Command::ClosePath { .. } => {
                current = subpath_start;
                continue;
            }
        }
        anchors.push(current);
    }

    Ok(anchors)
}

fn resolve(abs: bool, current: Point, x: f64, y: f64) -> Point {
    if abs { Point::new(x, y) } else { Point::new(current.x + x, current.y + y) }
}

/// Flatten `doc` into a canvas-space outline.
///
/// # Errors
///
/// Returns [`MaskError::PathData`] if path data is invalid or the outline has
/// fewer than three points.
pub fn rasterize(doc: &PathDocument, params: &RasterParams) -> Result<RasterizedMask, MaskError> {
    let scale = effective_scale(params.scale, params.pixel_ratio);
    let dimension = doc.extent().scaled(scale);
    // Geometry that does not start at the origin is shifted so its extent is centered.
    let origin = doc.origin();
    let centered = compute_offset(params.canvas, params.pixel_ratio, params.position, dimension);
    let offset = Point::new(centered.x - origin.x * scale, centered.y - origin.y * scale);

    let mut points = Vec::new();
    for segment in doc.segments() {
        let anchors = match (segment.points(), segment.data()) {
            (Some(raw), _) => raw.to_vec(),
            (None, Some(data)) => path_anchors(data)?,
            (None, None) => Vec::new(),
        };
        points.extend(anchors.into_iter().map(|p| p.scale_translate(scale, offset)));
    }
    if points.len() > 1 && points.first() == points.last() {
        points.pop();
    }
    if points.len() < MIN_POLYGON_POINTS {
        return Err(MaskError::PathData(format!(
            "mask outline needs at least {MIN_POLYGON_POINTS} points, found {}",
            points.len()
        )));
    }

    let outlines = doc
        .segments()
        .iter()
        .filter(|segment| segment.points().is_none())
        .map(|segment| {
            let mut outline = segment.path().clone();
            outline.apply_affine(Affine::scale(scale));
            outline
        })
        .collect();

    Ok(RasterizedMask { polygon: Polygon::new(points), dimension, offset, scale, outlines })
}
