//! SVG document synthesis and path extraction.

#[cfg(test)]
#[path = "svg_test.rs"]
mod svg_test;

use crate::error::MaskError;
use crate::geometry::Dimension;

use super::{PathDocument, PathSegment};

const SVG_NAMESPACES: &str = r#"xmlns="http://www.w3.org/2000/svg" xmlns:xlink="http://www.w3.org/1999/xlink""#;

/// Build a minimal SVG document holding one `<path>` per entry of `paths`.
#[must_use]
pub fn synthesize_document(paths: &[String], size: Option<Dimension>) -> String {
    let mut svg = format!("<svg {SVG_NAMESPACES}");
    if let Some(size) = size {
        svg.push_str(&format!(r#" width="{}" height="{}""#, size.width, size.height));
    }
    svg.push('>');
    for d in paths {
        svg.push_str(&format!(r#"<path d="{}" />"#, escape_attr(d)));
    }
    svg.push_str("</svg>");
    svg
}

/// Parse an SVG document into measured path segments, in document order.
///
/// Paths are taken from the first `<svg>` element; if it has none, from
/// anywhere in the document. `<path>` elements without a `d` attribute are
/// skipped.
///
/// # Errors
///
/// Returns [`MaskError::SvgParse`] if the XML is malformed, or
/// [`MaskError::PathData`] if a `d` attribute is invalid.
pub fn parse_document(xml: &str) -> Result<PathDocument, MaskError> {
    let doc = roxmltree::Document::parse(xml).map_err(|e| MaskError::SvgParse(e.to_string()))?;
    let svg = doc.descendants().find(|n| n.is_element() && n.tag_name().name() == "svg");

    let is_path = |n: &roxmltree::Node<'_, '_>| n.is_element() && n.tag_name().name() == "path";
    let mut path_nodes: Vec<roxmltree::Node<'_, '_>> =
        svg.map(|s| s.descendants().filter(is_path).collect()).unwrap_or_default();
    if path_nodes.is_empty() {
        path_nodes = doc.descendants().filter(is_path).collect();
    }

    let segments = path_nodes
        .iter()
        .filter_map(|node| node.attribute("d"))
        .filter(|d| !d.trim().is_empty())
        .map(PathSegment::from_data)
        .collect::<Result<Vec<_>, _>>()?;

    let declared_size = svg.and_then(|s| {
        let width = parse_length(s.attribute("width")?)?;
        let height = parse_length(s.attribute("height")?)?;
        Some(Dimension::new(width, height))
    });

    Ok(PathDocument::new(segments, declared_size))
}

/// Numeric prefix of an SVG length attribute (`"300"`, `"300px"`, `"12.5pt"`).
fn parse_length(raw: &str) -> Option<f64> {
    let raw = raw.trim();
    let end = raw
        .char_indices()
        .find(|&(i, c)| !(c.is_ascii_digit() || c == '.' || ((c == '-' || c == '+') && i == 0)))
        .map_or(raw.len(), |(i, _)| i);
    match raw[..end].parse::<f64>() {
        Ok(v) if v.is_finite() => Some(v),
        _ => None,
    }
}

fn escape_attr(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}
