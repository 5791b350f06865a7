use super::*;

const HD: Canvas = Canvas {
    width: 1280,
    height: 720,
};

#[test]
fn seeded_random_is_pure_and_in_unit_interval() {
    for seed in [1u64, 2, 3, 17, 9999] {
        for idx in 0..64 {
            let a = seeded_random(seed, idx);
            assert_eq!(a, seeded_random(seed, idx));
            assert!((0.0..1.0).contains(&a));
        }
    }
    assert_ne!(seeded_random(1, 0), seeded_random(1, 1));
}

#[test]
fn scene_seed_reads_digits() {
    assert_eq!(scene_seed("scene-3"), 3);
    assert_eq!(scene_seed("s1-b2"), 12);
    assert_eq!(scene_seed("intro"), 1);
    assert_eq!(scene_seed("scene-0"), 1);
    assert_eq!(scene_seed("99999999999999999999999"), 1);
}

#[test]
fn particle_field_is_deterministic() {
    for t in [0.0, 0.25, 0.5, 1.0] {
        assert_eq!(particle_field(2, t, HD), particle_field(2, t, HD));
    }
    assert_ne!(particle_field(2, 0.0, HD), particle_field(3, 0.0, HD));
    assert_ne!(particle_field(2, 0.0, HD), particle_field(2, 0.3, HD));
}

#[test]
fn particles_stay_near_the_canvas() {
    for p in particle_field(5, 0.7, HD) {
        assert!(p.radius > 0.0);
        assert!(p.radius <= 0.1 * 1280.0);
        assert!(p.ring_radius <= p.radius);
        assert!((0.12..0.27).contains(&p.ring_alpha));
        assert!(p.center.x >= -0.08 * 1280.0 && p.center.x <= 1.08 * 1280.0);
        assert!(p.center.y >= 0.1 * 720.0 && p.center.y <= 0.9 * 720.0);
    }
}

#[test]
fn diagonal_gradient_spans_corner_to_corner() {
    assert_eq!(diagonal_gradient_pos(0.0, 0.0, HD), 0.0);
    assert!((diagonal_gradient_pos(1280.0, 720.0, HD) - 1.0).abs() < 1e-12);
    assert!((diagonal_gradient_pos(640.0, 360.0, HD) - 0.5).abs() < 1e-12);
}

#[test]
fn gradient_stops_are_evenly_spaced() {
    let stops = [
        Rgba8::rgb(0, 0, 0),
        Rgba8::rgb(100, 0, 0),
        Rgba8::rgb(100, 200, 0),
    ];
    assert_eq!(gradient_color(&stops, 0.0), stops[0]);
    assert_eq!(gradient_color(&stops, 0.5), stops[1]);
    assert_eq!(gradient_color(&stops, 1.0), stops[2]);
    assert_eq!(gradient_color(&stops, 0.25), Rgba8::rgb(50, 0, 0));
    assert_eq!(gradient_color(&stops, 0.75), Rgba8::rgb(100, 100, 0));
}

#[test]
fn single_stop_gradient_is_solid() {
    let only = Rgba8::rgb(1, 2, 3);
    assert_eq!(gradient_color(&[only], 0.9), only);
}
