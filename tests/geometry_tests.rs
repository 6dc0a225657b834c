use red_pather::geometry::rect::{Rect, Size};
use red_pather::geometry::scale::{to_device, to_viewport, ScaleTransform};

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

fn rect_approx(a: &Rect, b: &Rect) -> bool {
    approx(a.x, b.x) && approx(a.y, b.y) && approx(a.w, b.w) && approx(a.h, b.h)
}

// ============================================================================
// Scale transform
// ============================================================================

#[test]
fn half_size_viewport_halves_every_component() {
    let device = Size::new(1080.0, 1920.0);
    let viewport = Size::new(540.0, 960.0);

    let mapped = to_viewport(&Rect::new(100.0, 200.0, 880.0, 100.0), device, viewport);
    assert_eq!(mapped, Rect::new(50.0, 100.0, 440.0, 50.0));
}

#[test]
fn axes_scale_independently() {
    let device = Size::new(1000.0, 2000.0);
    let viewport = Size::new(500.0, 1500.0);

    let mapped = to_viewport(&Rect::new(100.0, 100.0, 10.0, 10.0), device, viewport);
    assert!(approx(mapped.x, 50.0), "x uses width ratio, got {}", mapped.x);
    assert!(approx(mapped.y, 75.0), "y uses height ratio, got {}", mapped.y);
}

#[test]
fn to_device_inverts_to_viewport() {
    let device = Size::new(1170.0, 2532.0);
    let viewport = Size::new(390.0, 844.0);
    let original = Rect::new(33.0, 417.0, 120.0, 48.0);

    let back = to_device(&to_viewport(&original, device, viewport), device, viewport);
    assert!(rect_approx(&back, &original), "expected {:?}, got {:?}", original, back);
}

#[test]
fn zero_device_size_is_identity() {
    let rect = Rect::new(10.0, 20.0, 30.0, 40.0);
    assert_eq!(to_viewport(&rect, Size::new(0.0, 1920.0), Size::new(540.0, 960.0)), rect);
    assert_eq!(to_device(&rect, Size::new(1080.0, 0.0), Size::new(540.0, 960.0)), rect);

    let transform = ScaleTransform::default();
    assert!(transform.is_identity());
    assert_eq!(transform.scale(), (1.0, 1.0));
}

#[test]
fn resize_changes_scale_immediately() {
    let mut transform = ScaleTransform::new(Size::new(1000.0, 1000.0), Size::new(500.0, 500.0));
    assert_eq!(transform.scale(), (0.5, 0.5));

    transform.resize_viewport(Size::new(250.0, 750.0));
    assert_eq!(transform.scale(), (0.25, 0.75));

    let (x, y) = transform.point_to_device(50.0, 75.0);
    assert!(approx(x, 200.0) && approx(y, 100.0), "got ({}, {})", x, y);
}

// ============================================================================
// Rect helpers
// ============================================================================

#[test]
fn rect_from_corners_and_center() {
    let r = Rect::from_corners(100.0, 400.0, 980.0, 500.0);
    assert_eq!(r, Rect::new(100.0, 400.0, 880.0, 100.0));
    assert_eq!(r.center(), (540.0, 450.0));
    assert!(r.contains(100.0, 400.0), "edges are inclusive");
    assert!(!r.contains(99.0, 450.0));
}
