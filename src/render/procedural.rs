//! Pure, seed-driven generators for the per-scene backdrop.

use crate::foundation::color::lerp;
use crate::foundation::core::{Canvas, Point, Rgba8};
use crate::foundation::math::fract_floor;
use std::f64::consts::PI;

/// Particles drawn per frame.
pub const PARTICLE_COUNT: usize = 18;

/// Hashed-sine generator in `[0, 1)`; a pure function of `(seed, index)`.
pub fn seeded_random(seed: u64, index: u64) -> f64 {
    let x = ((seed as f64) * 9999.0 + (index as f64) * 2222.0).sin() * 10000.0;
    fract_floor(x)
}

/// Digits of the scene id read as an integer; `1` when there are none.
pub fn scene_seed(id: &str) -> u64 {
    let digits: String = id.chars().filter(char::is_ascii_digit).collect();
    match digits.parse::<u64>() {
        Ok(0) | Err(_) => 1,
        Ok(n) => n,
    }
}

/// One soft particle of the backdrop.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Particle {
    /// Center in canvas pixels.
    pub center: Point,
    /// Radius of the filled disc.
    pub radius: f64,
    /// Radius of the outline ring.
    pub ring_radius: f64,
    /// Alpha of the outline ring, in `[0.12, 0.27)`.
    pub ring_alpha: f64,
    /// Palette slot used for the disc fill.
    pub palette_slot: usize,
}

/// Backdrop particles for a seed at normalized scene time `t`.
pub fn particle_field(seed: u64, t: f64, canvas: Canvas) -> [Particle; PARTICLE_COUNT] {
    let (w, h) = (canvas.w(), canvas.h());
    std::array::from_fn(|i| {
        let idx = i as u64;
        let variance = seeded_random(seed, idx);
        let radius =
            (w * 0.06 + variance * w * 0.04) * (0.6 + 0.4 * (t * PI + variance * 6.0).sin());
        let x = w * (0.1 + seeded_random(seed.wrapping_mul(2), idx) * 0.8)
            + (t * 2.0 * PI + variance * 12.0).sin() * w * 0.08;
        let y = h * (0.2 + seeded_random(seed.wrapping_mul(3), idx) * 0.6)
            + (t * 2.0 * PI + variance * 8.0).cos() * h * 0.08;
        Particle {
            center: Point::new(x, y),
            radius,
            ring_radius: radius * (0.4 + variance * 0.6),
            ring_alpha: 0.12 + variance * 0.15,
            palette_slot: i + 1,
        }
    })
}

/// Position along the `(0,0) → (w,h)` diagonal for pixel `(x, y)`, clamped to `[0, 1]`.
pub fn diagonal_gradient_pos(x: f64, y: f64, canvas: Canvas) -> f64 {
    let (w, h) = (canvas.w(), canvas.h());
    let len2 = w * w + h * h;
    if len2 <= 0.0 {
        return 0.0;
    }
    ((x * w + y * h) / len2).clamp(0.0, 1.0)
}

/// Color at `pos` in `[0, 1]` for evenly spaced `stops`.
///
/// A single stop is a solid fill; no stops is transparent.
pub fn gradient_color(stops: &[Rgba8], pos: f64) -> Rgba8 {
    match stops {
        [] => Rgba8::rgb(0, 0, 0).with_alpha(0),
        [only] => *only,
        _ => {
            let last = stops.len() - 1;
            let seg = pos.clamp(0.0, 1.0) * last as f64;
            let i = (seg.floor() as usize).min(last - 1);
            lerp(stops[i], stops[i + 1], seg - i as f64)
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/procedural.rs"]
mod tests;
