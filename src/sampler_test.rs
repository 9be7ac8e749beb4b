#![allow(clippy::float_cmp)]

use rand::SeedableRng;
use rand::rngs::StdRng;

use super::*;
use crate::loader::PathSegment;

const SCALE: f64 = 2.0;
const OFFSET: Point = Point { x: 100.0, y: 100.0 };

fn square_doc() -> PathDocument {
    PathDocument::new(vec![PathSegment::from_data("M0 0 L10 0 L10 10 L0 10 Z").unwrap()], None)
}

/// The square outline after scale 2 and offset (100, 100).
fn square_polygon() -> Polygon {
    Polygon::new(vec![
        Point::new(100.0, 100.0),
        Point::new(120.0, 100.0),
        Point::new(120.0, 120.0),
        Point::new(100.0, 120.0),
    ])
}

fn big_square() -> Polygon {
    Polygon::new(vec![
        Point::new(50.0, 50.0),
        Point::new(150.0, 50.0),
        Point::new(150.0, 150.0),
        Point::new(50.0, 150.0),
    ])
}

fn rng() -> StdRng {
    StdRng::seed_from_u64(7)
}

fn assert_near(actual: Point, expected: Point) {
    assert!(
        (actual.x - expected.x).abs() < 1e-6 && (actual.y - expected.y).abs() < 1e-6,
        "expected {expected:?}, got {actual:?}"
    );
}

// =========================================================================
// satisfies
// =========================================================================

#[test]
fn inside_and_outside_are_complements() {
    let polygon = square_polygon();
    for x in (90..=130).step_by(3) {
        for y in (90..=130).step_by(3) {
            let p = Point::new(f64::from(x) + 0.5, f64::from(y) + 0.5);
            assert_ne!(satisfies(&polygon, MaskType::Inside, p), satisfies(&polygon, MaskType::Outside, p));
        }
    }
}

#[test]
fn none_and_inline_accept_everything() {
    let polygon = square_polygon();
    let far = Point::new(-500.0, 900.0);
    assert!(satisfies(&polygon, MaskType::None, far));
    assert!(satisfies(&polygon, MaskType::Inline, far));
}

// =========================================================================
// Vertex strategies
// =========================================================================

#[test]
fn vertex_wraps_index() {
    let (polygon, doc) = (square_polygon(), square_doc());
    let sampler = Sampler::new(&polygon, &doc, SCALE, OFFSET);
    assert_eq!(sampler.vertex(1).unwrap(), Point::new(120.0, 100.0));
    assert_eq!(sampler.vertex(5).unwrap(), Point::new(120.0, 100.0));
}

#[test]
fn vertex_on_empty_outline_is_not_loaded() {
    let (polygon, doc) = (Polygon::default(), square_doc());
    let sampler = Sampler::new(&polygon, &doc, SCALE, OFFSET);
    assert!(matches!(sampler.vertex(0), Err(MaskError::DataNotLoaded)));
    assert!(matches!(sampler.random_vertex(&mut rng()), Err(MaskError::DataNotLoaded)));
}

#[test]
fn random_vertex_is_an_outline_vertex() {
    let (polygon, doc) = (square_polygon(), square_doc());
    let sampler = Sampler::new(&polygon, &doc, SCALE, OFFSET);
    let mut rng = rng();
    for _ in 0..20 {
        let p = sampler.random_vertex(&mut rng).unwrap();
        assert!(polygon.points().contains(&p));
    }
}

// =========================================================================
// Arc-length strategies
// =========================================================================

#[test]
fn random_length_lands_on_the_scaled_outline() {
    let (polygon, doc) = (square_polygon(), square_doc());
    let sampler = Sampler::new(&polygon, &doc, SCALE, OFFSET);
    let mut rng = rng();
    for _ in 0..50 {
        let p = sampler.random_length(&mut rng).unwrap();
        let on_vertical = (p.x - 100.0).abs() < 1e-6 || (p.x - 120.0).abs() < 1e-6;
        let on_horizontal = (p.y - 100.0).abs() < 1e-6 || (p.y - 120.0).abs() < 1e-6;
        assert!(on_vertical || on_horizontal, "{p:?} is off the outline");
        assert!((100.0 - 1e-6..=120.0 + 1e-6).contains(&p.x));
        assert!((100.0 - 1e-6..=120.0 + 1e-6).contains(&p.y));
    }
}

#[test]
fn random_length_without_segments_is_not_loaded() {
    let (polygon, doc) = (square_polygon(), PathDocument::default());
    let sampler = Sampler::new(&polygon, &doc, SCALE, OFFSET);
    assert!(matches!(sampler.random_length(&mut rng()), Err(MaskError::DataNotLoaded)));
}

#[test]
fn equidistant_spaces_samples_evenly() {
    let (polygon, doc) = (square_polygon(), square_doc());
    let sampler = Sampler::new(&polygon, &doc, SCALE, OFFSET);
    assert_near(sampler.equidistant(0, 4).unwrap(), Point::new(100.0, 100.0));
    assert_near(sampler.equidistant(1, 4).unwrap(), Point::new(120.0, 100.0));
    assert_near(sampler.equidistant(2, 4).unwrap(), Point::new(120.0, 120.0));
    assert_near(sampler.equidistant(3, 4).unwrap(), Point::new(100.0, 120.0));
}

#[test]
fn equidistant_index_wraps_and_zero_target_is_one() {
    let (polygon, doc) = (square_polygon(), square_doc());
    let sampler = Sampler::new(&polygon, &doc, SCALE, OFFSET);
    assert_near(sampler.equidistant(5, 4).unwrap(), Point::new(120.0, 100.0));
    assert_near(sampler.equidistant(3, 0).unwrap(), Point::new(100.0, 100.0));
}

#[test]
fn equidistant_walks_across_segments() {
    let doc = PathDocument::new(
        vec![PathSegment::from_data("M0 0 L10 0").unwrap(), PathSegment::from_data("M0 5 L10 5").unwrap()],
        None,
    );
    let polygon = square_polygon();
    let sampler = Sampler::new(&polygon, &doc, 1.0, Point::default());
    assert_near(sampler.equidistant(1, 4).unwrap(), Point::new(5.0, 0.0));
    assert_near(sampler.equidistant(2, 4).unwrap(), Point::new(0.0, 5.0));
    assert_near(sampler.equidistant(3, 4).unwrap(), Point::new(5.0, 5.0));
}

#[test]
fn equidistant_offsets_are_monotonic_and_span_the_length() {
    let total = 40.0;
    let n = 7;
    let offsets: Vec<f64> = (0..n).map(|i| equidistant_offset(total, i, n)).collect();
    assert_eq!(offsets[0], 0.0);
    assert!(offsets.windows(2).all(|w| w[0] <= w[1]));
    assert!(offsets.iter().all(|&o| (0.0..total).contains(&o)));
}

#[test]
fn equidistant_without_segments_is_not_loaded() {
    let (polygon, doc) = (square_polygon(), PathDocument::default());
    let sampler = Sampler::new(&polygon, &doc, SCALE, OFFSET);
    assert!(matches!(sampler.equidistant(0, 3), Err(MaskError::DataNotLoaded)));
}

// =========================================================================
// free_point
// =========================================================================

#[test]
fn free_point_inside_is_contained() {
    let (polygon, doc) = (big_square(), square_doc());
    let sampler = Sampler::new(&polygon, &doc, SCALE, OFFSET);
    let mut rng = rng();
    for _ in 0..20 {
        let p = sampler.free_point(Dimension::new(200.0, 200.0), MaskType::Inside, 1000, &mut rng).unwrap();
        assert!(polygon.contains(p));
    }
}

#[test]
fn free_point_outside_is_not_contained() {
    let (polygon, doc) = (big_square(), square_doc());
    let sampler = Sampler::new(&polygon, &doc, SCALE, OFFSET);
    let mut rng = rng();
    for _ in 0..20 {
        let p = sampler.free_point(Dimension::new(200.0, 200.0), MaskType::Outside, 1000, &mut rng).unwrap();
        assert!(!polygon.contains(p));
        assert!((0.0..200.0).contains(&p.x) && (0.0..200.0).contains(&p.y));
    }
}

#[test]
fn free_point_gives_up_on_zero_area_outline() {
    let polygon = Polygon::new(vec![Point::new(10.0, 10.0); 3]);
    let doc = square_doc();
    let sampler = Sampler::new(&polygon, &doc, SCALE, OFFSET);
    let err = sampler.free_point(Dimension::new(50.0, 50.0), MaskType::Inside, 5, &mut rng()).unwrap_err();
    assert!(matches!(err, MaskError::PlacementExhausted { attempts: 5 }));
}

#[test]
fn free_point_with_zero_attempts_still_tries_once() {
    let (polygon, doc) = (big_square(), square_doc());
    let sampler = Sampler::new(&polygon, &doc, SCALE, OFFSET);
    let p = sampler.free_point(Dimension::new(200.0, 200.0), MaskType::None, 0, &mut rng()).unwrap();
    assert!((0.0..200.0).contains(&p.x));
}

// =========================================================================
// arranged
// =========================================================================

#[test]
fn arranged_dispatches_by_arrangement() {
    let (polygon, doc) = (square_polygon(), square_doc());
    let sampler = Sampler::new(&polygon, &doc, SCALE, OFFSET);
    let mut rng = rng();
    assert_eq!(
        sampler.arranged(InlineArrangement::OnePerPoint, 2, 10, &mut rng).unwrap(),
        Point::new(120.0, 120.0)
    );
    assert_eq!(sampler.arranged(InlineArrangement::PerPoint, 6, 10, &mut rng).unwrap(), Point::new(120.0, 120.0));
    assert_near(
        sampler.arranged(InlineArrangement::Equidistant, 2, 4, &mut rng).unwrap(),
        Point::new(120.0, 120.0),
    );
    let p = sampler.arranged(InlineArrangement::RandomPoint, 0, 0, &mut rng).unwrap();
    assert!(polygon.points().contains(&p));
}
