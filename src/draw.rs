//! Outline rendering: stroke the loaded mask onto a [`MaskCanvas`].
//!
//! Drawing prefers the scaled path geometry (exact curves) translated by the
//! mask offset. Without path geometry the raw outline is stroked as a closed
//! polyline. Nothing is ever filled.

#[cfg(test)]
#[path = "draw_test.rs"]
mod draw_test;

use std::fmt;

use kurbo::BezPath;
use tracing::warn;

use crate::config::StrokeConfig;
use crate::geometry::{Point, Polygon};
use crate::host::MaskCanvas;

// =============================================================================
// COLOR
// =============================================================================

/// An opaque stroke color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    #[must_use]
    pub fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `#rgb`, `#rrggbb` or `rgb(r, g, b)`.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        if let Some(hex) = raw.strip_prefix('#') {
            return parse_hex(hex);
        }
        let inner = raw.strip_prefix("rgb(")?.strip_suffix(')')?;
        let mut parts = inner.split(',').map(str::trim);
        let r = parse_channel(parts.next()?)?;
        let g = parse_channel(parts.next()?)?;
        let b = parse_channel(parts.next()?)?;
        if parts.next().is_some() {
            return None;
        }
        Some(Self { r, g, b })
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

fn parse_hex(hex: &str) -> Option<Rgb> {
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    match hex.len() {
        3 => {
            let digit = |i: usize| hex_byte(&hex[i..=i]).map(|d| d * 17);
            Some(Rgb { r: digit(0)?, g: digit(1)?, b: digit(2)? })
        }
        6 => Some(Rgb { r: hex_byte(&hex[0..2])?, g: hex_byte(&hex[2..4])?, b: hex_byte(&hex[4..6])? }),
        _ => None,
    }
}

fn hex_byte(s: &str) -> Option<u8> {
    match u8::from_str_radix(s, 16) {
        Ok(v) => Some(v),
        Err(_) => None,
    }
}

fn parse_channel(s: &str) -> Option<u8> {
    match s.parse::<u8>() {
        Ok(v) => Some(v),
        Err(_) => None,
    }
}

// =============================================================================
// DRAWING
// =============================================================================

/// Stroke the mask outline. Returns `false` when nothing was drawn.
///
/// `outlines` are scaled but untranslated path geometry; `offset` moves them
/// into canvas space. An empty `outlines` slice falls back to `polygon`.
pub fn draw_outline(
    canvas: &mut dyn MaskCanvas,
    polygon: &Polygon,
    outlines: &[BezPath],
    offset: Point,
    stroke: &StrokeConfig,
) -> bool {
    let Some(color) = Rgb::parse(&stroke.color) else {
        warn!(color = %stroke.color, "unparseable mask stroke color; skipping draw");
        return false;
    };
    if outlines.is_empty() && polygon.is_empty() {
        return false;
    }

    canvas.save();
    canvas.set_stroke_style(color);
    canvas.set_line_width(stroke.width);

    if outlines.is_empty() {
        canvas.begin_path();
        let mut points = polygon.points().iter();
        if let Some(first) = points.next() {
            canvas.move_to(first.x, first.y);
        }
        for p in points {
            canvas.line_to(p.x, p.y);
        }
        canvas.close_path();
        canvas.stroke();
    } else {
        canvas.translate(offset.x, offset.y);
        for outline in outlines {
            canvas.begin_path();
            canvas.trace_path(outline);
            canvas.stroke();
        }
    }

    canvas.restore();
    true
}
