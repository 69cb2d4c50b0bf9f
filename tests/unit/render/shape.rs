use kurbo::Shape;

use super::*;

#[test]
fn selector_mapping_roundtrips_and_defaults_to_none() {
    for shape in [MaskShape::None, MaskShape::Circle, MaskShape::Heart] {
        assert_eq!(MaskShape::from_selector(shape.selector()), shape);
    }
    assert_eq!(MaskShape::from_selector(7), MaskShape::None);
    assert_eq!(MaskShape::from_selector(-1), MaskShape::None);
}

#[test]
fn none_has_no_path() {
    assert!(MaskShape::None.path(Point::new(5.0, 5.0), 5.0).is_none());
}

#[test]
fn circle_bounds_match_canvas() {
    let path = MaskShape::Circle
        .path(Point::new(64.0, 64.0), 64.0)
        .unwrap();
    let bb = path.bounding_box();
    assert!((bb.x0 - 0.0).abs() < 1e-6);
    assert!((bb.y0 - 0.0).abs() < 1e-6);
    assert!((bb.x1 - 128.0).abs() < 1e-6);
    assert!((bb.y1 - 128.0).abs() < 1e-6);
}

#[test]
fn heart_is_symmetric_and_inside_bounding_circle() {
    let c = Point::new(100.0, 100.0);
    let r = 100.0;
    let path = heart_path(c, r);
    let bb = path.bounding_box();

    assert!(((c.x - bb.x0) - (bb.x1 - c.x)).abs() < 1e-6);
    assert!(bb.x0 >= 0.0 && bb.x1 <= 200.0);
    assert!(bb.y0 >= 0.0);
    assert!((bb.y1 - 200.0).abs() < 1e-6);

    for el in path.elements() {
        if let Some(p) = el.end_point() {
            assert!(p.distance(c) <= r + 1e-6, "{p:?} outside bounding circle");
        }
    }
}

#[test]
fn heart_covers_center_but_not_the_notch() {
    let c = Point::new(64.0, 64.0);
    let path = heart_path(c, 64.0);
    assert!(path.contains(c));
    assert!(path.contains(Point::new(64.0, 110.0)));
    assert!(!path.contains(Point::new(64.0, 12.0)));
    assert!(!path.contains(Point::new(2.0, 2.0)));
    assert!(!path.contains(Point::new(126.0, 126.0)));
}
