#![allow(clippy::float_cmp)]

use super::*;
use crate::loader::PathSegment;

#[derive(Debug, Clone, PartialEq)]
enum Op {
    Save,
    Restore,
    Translate(f64, f64),
    Stroke(Rgb),
    Width(f64),
    Begin,
    Move(f64, f64),
    Line(f64, f64),
    Quad,
    Cubic,
    Close,
    StrokePath,
}

#[derive(Default)]
struct Recorder {
    ops: Vec<Op>,
}

impl MaskCanvas for Recorder {
    fn save(&mut self) {
        self.ops.push(Op::Save);
    }
    fn restore(&mut self) {
        self.ops.push(Op::Restore);
    }
    fn translate(&mut self, x: f64, y: f64) {
        self.ops.push(Op::Translate(x, y));
    }
    fn set_stroke_style(&mut self, color: Rgb) {
        self.ops.push(Op::Stroke(color));
    }
    fn set_line_width(&mut self, width: f64) {
        self.ops.push(Op::Width(width));
    }
    fn begin_path(&mut self) {
        self.ops.push(Op::Begin);
    }
    fn move_to(&mut self, x: f64, y: f64) {
        self.ops.push(Op::Move(x, y));
    }
    fn line_to(&mut self, x: f64, y: f64) {
        self.ops.push(Op::Line(x, y));
    }
    fn quadratic_curve_to(&mut self, _cx: f64, _cy: f64, _x: f64, _y: f64) {
        self.ops.push(Op::Quad);
    }
    fn bezier_curve_to(&mut self, _c1x: f64, _c1y: f64, _c2x: f64, _c2y: f64, _x: f64, _y: f64) {
        self.ops.push(Op::Cubic);
    }
    fn close_path(&mut self) {
        self.ops.push(Op::Close);
    }
    fn stroke(&mut self) {
        self.ops.push(Op::StrokePath);
    }
}

fn triangle() -> Polygon {
    Polygon::new(vec![Point::new(0.0, 0.0), Point::new(4.0, 0.0), Point::new(0.0, 3.0)])
}

// =========================================================================
// Rgb
// =========================================================================

#[test]
fn parses_long_hex() {
    assert_eq!(Rgb::parse("#ff8000"), Some(Rgb::new(255, 128, 0)));
    assert_eq!(Rgb::parse("  #FFFFFF "), Some(Rgb::new(255, 255, 255)));
}

#[test]
fn parses_short_hex() {
    assert_eq!(Rgb::parse("#f80"), Some(Rgb::new(255, 136, 0)));
}

#[test]
fn parses_rgb_function() {
    assert_eq!(Rgb::parse("rgb(10, 20,30)"), Some(Rgb::new(10, 20, 30)));
}

#[test]
fn rejects_malformed_colors() {
    for raw in ["", "#ff", "#ggg", "#+ff", "rgb(1,2)", "rgb(1,2,3,4)", "rgb(256,0,0)", "red"] {
        assert_eq!(Rgb::parse(raw), None, "{raw:?} should not parse");
    }
}

#[test]
fn displays_as_long_hex() {
    assert_eq!(Rgb::new(1, 171, 255).to_string(), "#01abff");
}

// =========================================================================
// draw_outline
// =========================================================================

#[test]
fn polygon_fallback_strokes_closed_outline() {
    let mut canvas = Recorder::default();
    let drawn = draw_outline(&mut canvas, &triangle(), &[], Point::new(9.0, 9.0), &StrokeConfig::default());
    assert!(drawn);
    assert_eq!(
        canvas.ops,
        vec![
            Op::Save,
            Op::Stroke(Rgb::new(255, 255, 255)),
            Op::Width(0.5),
            Op::Begin,
            Op::Move(0.0, 0.0),
            Op::Line(4.0, 0.0),
            Op::Line(0.0, 3.0),
            Op::Close,
            Op::StrokePath,
            Op::Restore,
        ]
    );
}

#[test]
fn path_geometry_is_preferred_and_translated() {
    let seg = PathSegment::from_data("M0 0 Q5 5 10 0 C12 2 14 2 16 0 Z").unwrap();
    let mut canvas = Recorder::default();
    let stroke = StrokeConfig { color: "#000".into(), width: 2.0 };
    let drawn = draw_outline(&mut canvas, &triangle(), &[seg.path().clone()], Point::new(7.0, 8.0), &stroke);
    assert!(drawn);
    assert_eq!(
        canvas.ops,
        vec![
            Op::Save,
            Op::Stroke(Rgb::new(0, 0, 0)),
            Op::Width(2.0),
            Op::Translate(7.0, 8.0),
            Op::Begin,
            Op::Move(0.0, 0.0),
            Op::Quad,
            Op::Cubic,
            Op::Close,
            Op::StrokePath,
            Op::Restore,
        ]
    );
}

#[test]
fn bad_color_skips_drawing() {
    let mut canvas = Recorder::default();
    let stroke = StrokeConfig { color: "chartreuse".into(), width: 1.0 };
    assert!(!draw_outline(&mut canvas, &triangle(), &[], Point::default(), &stroke));
    assert!(canvas.ops.is_empty());
}

#[test]
fn nothing_to_draw_is_a_no_op() {
    let mut canvas = Recorder::default();
    assert!(!draw_outline(&mut canvas, &Polygon::default(), &[], Point::default(), &StrokeConfig::default()));
    assert!(canvas.ops.is_empty());
}
