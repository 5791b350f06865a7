use super::*;
use crate::foundation::core::Point;

const HD: Canvas = Canvas {
    width: 1280,
    height: 720,
};

fn close(a: Point, b: Point) -> bool {
    (a.x - b.x).abs() < 1e-9 && (a.y - b.y).abs() < 1e-9
}

#[test]
fn motion_factor_peaks_at_quarter() {
    assert!(motion_factor(0.0).abs() < 1e-12);
    assert!((motion_factor(0.25) - 0.12).abs() < 1e-12);
    assert!((motion_factor(0.75) + 0.12).abs() < 1e-12);
}

#[test]
fn every_motion_is_identity_at_scene_start() {
    for motion in Motion::CYCLE {
        let a = camera_transform(motion, 0.0, HD);
        let p = Point::new(100.0, 650.0);
        assert!(close(a * p, p), "{motion:?}");
    }
}

#[test]
fn pan_translates_proportionally() {
    let a = camera_transform(Motion::Pan, 0.25, HD);
    let moved = a * Point::new(0.0, 0.0);
    assert!(close(moved, Point::new(1280.0 * 0.12, 720.0 * 0.06)));
}

#[test]
fn scaling_motions_keep_the_center_fixed() {
    let center = Point::new(640.0, 360.0);
    for motion in [Motion::Zoom, Motion::Orbit, Motion::Pulse] {
        let a = camera_transform(motion, 0.25, HD);
        assert!(close(a * center, center), "{motion:?}");
    }
}

#[test]
fn zoom_and_pulse_scale_uniformly_about_center() {
    let corner = Point::new(0.0, 0.0);
    let zoomed = camera_transform(Motion::Zoom, 0.25, HD) * corner;
    let pulsed = camera_transform(Motion::Pulse, 0.25, HD) * corner;
    // zoom scale = 1.06, pulse scale = 1.042
    assert!(close(zoomed, Point::new(640.0 - 640.0 * 1.06, 360.0 - 360.0 * 1.06)));
    assert!(close(pulsed, Point::new(640.0 - 640.0 * 1.042, 360.0 - 360.0 * 1.042)));
}

#[test]
fn band_covers_bottom_thirty_five_percent() {
    let r = band_rect(HD);
    assert_eq!(r.x0, 0.0);
    assert_eq!(r.x1, 1280.0);
    assert!((r.y0 - 468.0).abs() < 1e-9);
    assert_eq!(r.y1, 720.0);
}
