//! Camera motion transforms for the overlay band.

use crate::foundation::core::{Affine, Canvas, Rect, Vec2};
use crate::storyboard::model::Motion;
use std::f64::consts::PI;

/// Fraction of the frame height covered by the bottom band.
pub const BAND_HEIGHT_FRAC: f64 = 0.35;

type MotionFn = fn(f64, Canvas) -> Affine;

// Indexed by `motion_slot`.
const MOTION_TABLE: [MotionFn; 4] = [pan, zoom, orbit, pulse];

fn motion_slot(motion: Motion) -> usize {
    match motion {
        Motion::Pan => 0,
        Motion::Zoom => 1,
        Motion::Orbit => 2,
        Motion::Pulse => 3,
    }
}

fn pan(m: f64, canvas: Canvas) -> Affine {
    Affine::translate(Vec2::new(canvas.w() * m, canvas.h() * m * 0.5))
}

fn zoom(m: f64, _canvas: Canvas) -> Affine {
    Affine::scale(1.0 + m * 0.5)
}

fn orbit(m: f64, _canvas: Canvas) -> Affine {
    Affine::rotate(m * 0.7)
}

fn pulse(m: f64, _canvas: Canvas) -> Affine {
    Affine::scale(1.0 + m * 0.35)
}

/// Sinusoidal motion amount for normalized scene time `t`, in `[-0.12, 0.12]`.
pub fn motion_factor(t: f64) -> f64 {
    (t * PI * 2.0).sin() * 0.12
}

/// Full transform applied while drawing the band.
///
/// Order: translate to center, apply the motion, translate back.
pub fn camera_transform(motion: Motion, t: f64, canvas: Canvas) -> Affine {
    let center = Vec2::new(canvas.w() / 2.0, canvas.h() / 2.0);
    let motion_fn = MOTION_TABLE[motion_slot(motion)];
    Affine::translate(center) * motion_fn(motion_factor(t), canvas) * Affine::translate(-center)
}

/// Untransformed bottom band rectangle.
pub fn band_rect(canvas: Canvas) -> Rect {
    let band = canvas.h() * BAND_HEIGHT_FRAC;
    Rect::new(0.0, canvas.h() - band, canvas.w(), canvas.h())
}

#[cfg(test)]
#[path = "../../tests/unit/render/motion.rs"]
mod tests;
