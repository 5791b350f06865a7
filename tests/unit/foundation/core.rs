use super::*;

#[test]
fn fps_frames_secs_roundtrip_floor() {
    let fps = Fps::new(30000, 1001).unwrap();
    let secs = fps.frames_to_secs(123);
    assert_eq!(fps.secs_to_frames_floor(secs), 123);
}

#[test]
fn fps_rejects_zero_parts() {
    assert!(Fps::new(0, 1).is_err());
    assert!(Fps::new(30, 0).is_err());
}

#[test]
fn twelve_seconds_at_thirty_fps_is_360_frames() {
    let fps = Fps::new(30, 1).unwrap();
    assert_eq!(fps.secs_to_frames_ceil(12.0), 360);
    assert_eq!(fps.secs_to_frames_floor(0.999 / 30.0), 0);
}

#[test]
fn css_alpha_fraction_rounds_to_byte() {
    let c = Rgba8::rgb(15, 23, 42).with_alpha_f(0.28);
    assert_eq!(c.a, 71);
    assert_eq!(Rgba8::rgb(1, 2, 3).with_alpha_f(2.0).a, 255);
}

#[test]
fn premultiply_scales_channels() {
    let p = Rgba8::rgb(255, 128, 0).with_alpha(0x22).premultiply();
    assert_eq!(p.a, 0x22);
    assert_eq!(p.r, 0x22);
    assert_eq!(p.b, 0);
}
