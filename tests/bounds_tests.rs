use uitree_inspect::geometry::bounds::{self, Bounds};

mod common;
use common::rect;

// ============================================================================
// Parsing
// ============================================================================

#[test]
fn parse_bracket_notation() {
    let b = Bounds::parse("[0,63][1080,1920]").unwrap();
    assert_eq!(b, rect(0, 63, 1080, 1920));
    assert_eq!(b.to_string(), "[0,63][1080,1920]");
}

#[test]
fn parse_tolerates_inner_whitespace() {
    let b = Bounds::parse(" [10, 20] [30, 40] ").unwrap();
    assert_eq!(b, rect(10, 20, 30, 40));
}

#[test]
fn from_str_uses_bracket_notation() {
    let b: Bounds = "[1,2][3,4]".parse().unwrap();
    assert_eq!(b, rect(1, 2, 3, 4));
}

#[test]
fn parse_lenient_accepts_space_separated_form() {
    assert_eq!(Bounds::parse_lenient("0 0 100 50").unwrap(), rect(0, 0, 100, 50));
    assert_eq!(Bounds::parse_lenient("\"[5,5][6,6]\"").unwrap(), rect(5, 5, 6, 6));
}

#[test]
fn parse_rejects_malformed_input() {
    for raw in ["", "garbage", "[0,0]", "[0,0][10]", "[a,0][1,1]", "[0,0][1,1", "0 0 10"] {
        let err = Bounds::parse_lenient(raw);
        assert!(err.is_err(), "'{}' should not parse", raw);
    }
}

#[test]
fn parse_rejects_inverted_edges() {
    let err = Bounds::parse("[100,0][50,10]").unwrap_err();
    assert_eq!(err.raw, "[100,0][50,10]");
    assert!(err.reason.contains("left"), "reason was: {}", err.reason);

    assert!(Bounds::parse("[0,100][10,50]").is_err());
    assert!(Bounds::new(0, 0, -1, 0).is_err());
}

#[test]
fn zero_area_bounds_are_legal() {
    let b = Bounds::parse("[10,10][10,50]").unwrap();
    assert_eq!(b.area(), 0);
    assert!(b.is_degenerate());
}

// ============================================================================
// Measurements
// ============================================================================

#[test]
fn area_does_not_overflow_on_large_rectangles() {
    let b = rect(i32::MIN, i32::MIN, i32::MAX, i32::MAX);
    let side = i64::from(i32::MAX) - i64::from(i32::MIN);
    assert_eq!(b.width(), side);
    assert_eq!(b.area(), side * side);
}

#[test]
fn center_and_center_distance() {
    let a = rect(0, 0, 100, 100);
    let b = rect(30, 40, 130, 140);
    assert_eq!(a.center(), (50.0, 50.0));
    assert!((a.center_distance(&b) - 50.0).abs() < 1e-9);
    assert!((bounds::center_distance(&b, &a) - 50.0).abs() < 1e-9);
}

#[test]
fn from_size_clamps_negative_sizes() {
    assert_eq!(Bounds::from_size(1080, 1920), rect(0, 0, 1080, 1920));
    assert_eq!(Bounds::from_size(-5, 10), rect(0, 0, 0, 10));
}

// ============================================================================
// Intersection and overlap
// ============================================================================

#[test]
fn intersect_with_self_is_identity() {
    for b in [rect(0, 0, 10, 10), rect(-50, 20, 30, 40), rect(5, 5, 5, 9)] {
        assert_eq!(b.intersect(&b), Some(b));
    }
}

#[test]
fn intersect_is_commutative() {
    let samples = [
        rect(0, 0, 100, 100),
        rect(50, 50, 150, 150),
        rect(100, 0, 200, 100),
        rect(300, 300, 400, 400),
        rect(20, 20, 30, 30),
    ];
    for a in &samples {
        for b in &samples {
            assert_eq!(bounds::intersect(a, b), bounds::intersect(b, a), "{} vs {}", a, b);
        }
    }
}

#[test]
fn disjoint_rectangles_do_not_intersect() {
    assert_eq!(rect(0, 0, 10, 10).intersect(&rect(20, 20, 30, 30)), None);
}

#[test]
fn touching_rectangles_meet_with_zero_area() {
    let shared = rect(0, 0, 10, 10).intersect(&rect(10, 0, 20, 10)).unwrap();
    assert_eq!(shared, rect(10, 0, 10, 10));
    assert_eq!(shared.area(), 0);
    assert_eq!(rect(0, 0, 10, 10).overlap_ratio(&rect(10, 0, 20, 10)), 0.0);
}

#[test]
fn overlap_ratio_is_intersection_over_self() {
    let block = rect(10, 10, 90, 30);
    let element = rect(0, 0, 100, 50);
    assert_eq!(block.overlap_ratio(&element), 1.0);
    assert!((element.overlap_ratio(&block) - 1600.0 / 5000.0).abs() < 1e-9);
}

#[test]
fn overlap_ratio_with_self_is_one() {
    let b = rect(3, 4, 50, 60);
    assert_eq!(bounds::overlap_ratio(&b, &b), 1.0);
}

#[test]
fn overlap_ratio_of_degenerate_self_is_zero() {
    let line = rect(0, 0, 0, 100);
    assert_eq!(line.overlap_ratio(&rect(-10, -10, 10, 110)), 0.0);
}

#[test]
fn iou_stays_in_unit_interval() {
    let samples = [
        rect(0, 0, 100, 100),
        rect(50, 50, 150, 150),
        rect(0, 0, 0, 0),
        rect(10, 10, 20, 20),
        rect(-100, -100, 500, 500),
    ];
    for a in &samples {
        for b in &samples {
            let v = bounds::iou(a, b);
            assert!((0.0..=1.0).contains(&v), "iou({}, {}) = {}", a, b, v);
        }
    }
    assert!((rect(0, 0, 100, 100).iou(&rect(50, 0, 150, 100)) - 1.0 / 3.0).abs() < 1e-9);
}

#[test]
fn union_contains_and_translate() {
    let a = rect(0, 0, 10, 10);
    let b = rect(20, 5, 30, 40);
    let u = a.union(&b);
    assert_eq!(u, rect(0, 0, 30, 40));
    assert!(u.contains(&a) && u.contains(&b));
    assert!(!a.contains(&b));

    assert_eq!(a.translate(0, 63), rect(0, 63, 10, 73));
    assert_eq!(rect(0, i32::MAX - 1, 1, i32::MAX).translate(0, 10).bottom, i32::MAX);
}

#[test]
fn bounds_serialize_as_plain_fields() {
    let json = serde_json::to_value(rect(1, 2, 3, 4)).unwrap();
    assert_eq!(json, serde_json::json!({"left": 1, "top": 2, "right": 3, "bottom": 4}));
}
