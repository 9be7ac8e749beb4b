//! Path loading: turn a mask source into a document of measured paths.
//!
//! DESIGN
//! ======
//! A source is a URL (fetched through [`fetch::SvgFetch`]), a verbatim SVG
//! document, one or more path `d` strings (wrapped in a synthesized
//! document), or raw outline points (no parsing at all). Every resulting
//! [`PathSegment`] carries its arc length up front so samplers never walk
//! geometry they do not need.
//!
//! Caching belongs to the caller: [`PathLoader::load`] receives the previous
//! document and hands it straight back unless `force` is set.

pub mod fetch;
pub mod svg;


use std::sync::Arc;

use kurbo::{BezPath, ParamCurve, ParamCurveArclen, PathSeg, Rect, Shape};
use tracing::{debug, info};

use crate::consts::ARCLEN_ACCURACY;
use crate::error::MaskError;
use crate::geometry::{Dimension, Point};
use fetch::SvgFetch;

// =============================================================================
// SOURCE
// =============================================================================

/// Where mask geometry comes from.
#[derive(Debug, Clone, PartialEq)]
pub enum MaskSource {
    /// Absolute URL of an SVG document.
    Url(String),
    /// A complete SVG document.
    Document(String),
    /// Path `d` strings, wrapped into a synthesized document.
    Paths { paths: Vec<String>, size: Option<Dimension> },
    /// Pre-computed outline points, used as-is.
    Points { points: Vec<Point>, size: Option<Dimension> },
}

// =============================================================================
// PATH SEGMENT
// =============================================================================

#[derive(Debug, Clone, PartialEq)]
enum SegmentSource {
    Data(String),
    Points(Vec<Point>),
}

/// One drawable path plus its precomputed arc length.
#[derive(Debug, Clone, PartialEq)]
pub struct PathSegment {
    source: SegmentSource,
    path: BezPath,
    piece_lengths: Vec<f64>,
    length: f64,
}

impl PathSegment {
    /// Parse a path `d` string and measure it.
    ///
    /// # Errors
    ///
    /// Returns [`MaskError::PathData`] if the string is not valid path data.
    pub fn from_data(data: &str) -> Result<Self, MaskError> {
        let path = BezPath::from_svg(data).map_err(|e| MaskError::PathData(format!("{e}: {data}")))?;
        Ok(Self::measure(SegmentSource::Data(data.to_string()), path))
    }

    /// Closed polyline through `points`.
    #[must_use]
    pub fn from_points(points: Vec<Point>) -> Self {
        let mut path = BezPath::new();
        let mut iter = points.iter();
        if let Some(first) = iter.next() {
            path.move_to(*first);
            for p in iter {
                path.line_to(*p);
            }
            path.close_path();
        }
        Self::measure(SegmentSource::Points(points), path)
    }

    fn measure(source: SegmentSource, path: BezPath) -> Self {
        let piece_lengths: Vec<f64> = path.segments().map(|seg| seg.arclen(ARCLEN_ACCURACY)).collect();
        let length = piece_lengths.iter().sum();
        Self { source, path, piece_lengths, length }
    }

    /// The original `d` string, when this segment came from path data.
    #[must_use]
    pub fn data(&self) -> Option<&str> {
        match &self.source {
            SegmentSource::Data(d) => Some(d),
            SegmentSource::Points(_) => None,
        }
    }

    /// The raw outline points, when this segment came from a point list.
    #[must_use]
    pub fn points(&self) -> Option<&[Point]> {
        match &self.source {
            SegmentSource::Points(p) => Some(p),
            SegmentSource::Data(_) => None,
        }
    }

    /// Geometry in source coordinates (unscaled, no offset).
    #[must_use]
    pub fn path(&self) -> &BezPath {
        &self.path
    }

    /// Total arc length in source units, including any closing segment.
    #[must_use]
    pub fn length(&self) -> f64 {
        self.length
    }

    /// Point at arc length `distance` from the start, in source coordinates.
    ///
    /// `distance` is clamped to `[0, length]`. Returns `None` for an empty path.
    #[must_use]
    pub fn point_at_length(&self, distance: f64) -> Option<Point> {
        let mut remaining = distance.clamp(0.0, self.length);
        let mut last: Option<PathSeg> = None;
        for (seg, &piece) in self.path.segments().zip(&self.piece_lengths) {
            if remaining <= piece {
                let t = seg.inv_arclen(remaining, ARCLEN_ACCURACY);
                return Some(seg.eval(t).into());
            }
            remaining -= piece;
            last = Some(seg);
        }
        match last {
            Some(seg) => Some(seg.end().into()),
            None => self.path.elements().first().and_then(|el| el.end_point()).map(Point::from),
        }
    }
}

// =============================================================================
// PATH DOCUMENT
// =============================================================================

/// Parsed mask geometry: zero or more measured paths in document order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PathDocument {
    segments: Vec<PathSegment>,
    declared_size: Option<Dimension>,
}

impl PathDocument {
    #[must_use]
    pub fn new(segments: Vec<PathSegment>, declared_size: Option<Dimension>) -> Self {
        Self { segments, declared_size: declared_size.filter(|d| d.is_positive()) }
    }

    /// Wrap raw outline points without parsing.
    #[must_use]
    pub fn from_points(points: Vec<Point>, size: Option<Dimension>) -> Self {
        Self::new(vec![PathSegment::from_points(points)], size)
    }

    #[must_use]
    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    /// Document size from the `<svg>` element or inline data, when positive.
    #[must_use]
    pub fn declared_size(&self) -> Option<Dimension> {
        self.declared_size
    }

    /// Sum of every segment's arc length.
    #[must_use]
    pub fn total_length(&self) -> f64 {
        self.segments.iter().map(PathSegment::length).sum()
    }

    /// Declared size if present, else the extent of the union of path bounds.
    #[must_use]
    pub fn extent(&self) -> Dimension {
        if let Some(size) = self.declared_size {
            return size;
        }
        self.bounds().map_or_else(Dimension::default, |r| Dimension::new(r.width(), r.height()))
    }

    /// Top-left corner of [`extent`](Self::extent) in document space.
    ///
    /// A declared size is a viewport anchored at the origin; otherwise the
    /// extent starts where the geometry does.
    #[must_use]
    pub fn origin(&self) -> Point {
        if self.declared_size.is_some() {
            return Point::default();
        }
        self.bounds().map_or_else(Point::default, |r| Point::new(r.x0, r.y0))
    }

    fn bounds(&self) -> Option<Rect> {
        self.segments
            .iter()
            .filter(|s| !s.path().elements().is_empty())
            .map(|s| s.path().bounding_box())
            .reduce(|a, b| a.union(b))
    }
}

// =============================================================================
// LOADER
// =============================================================================

/// Resolves a [`MaskSource`] into a [`PathDocument`].
#[derive(Clone)]
pub struct PathLoader {
    fetcher: Arc<dyn SvgFetch>,
}

impl PathLoader {
    #[must_use]
    pub fn new(fetcher: Arc<dyn SvgFetch>) -> Self {
        Self { fetcher }
    }

    /// Load `source`, reusing `cached` unless `force` is set.
    ///
    /// # Errors
    ///
    /// Returns a fetch error for URL sources that fail to download, or a
    /// parse error if the document or path data is malformed.
    pub async fn load(
        &self,
        source: &MaskSource,
        cached: Option<Arc<PathDocument>>,
        force: bool,
    ) -> Result<Arc<PathDocument>, MaskError> {
        if let Some(doc) = cached.filter(|_| !force) {
            debug!(segments = doc.segments().len(), "mask source cached; skipping load");
            return Ok(doc);
        }

        let doc = match source {
            MaskSource::Url(url) => {
                info!(%url, "downloading mask svg");
                let text = self.fetcher.fetch_text(url).await?;
                svg::parse_document(&text)?
            }
            MaskSource::Document(xml) => svg::parse_document(xml)?,
            MaskSource::Paths { paths, size } => svg::parse_document(&svg::synthesize_document(paths, *size))?,
            MaskSource::Points { points, size } => PathDocument::from_points(points.clone(), *size),
        };

        debug!(segments = doc.segments().len(), total_length = doc.total_length(), "mask source loaded");
        Ok(Arc::new(doc))
    }
}
