use crate::foundation::error::{NovaError, NovaResult};

pub(crate) fn mul_div255_u16(x: u16, y: u16) -> u16 {
    (((u32::from(x) * u32::from(y)) + 127) / 255) as u16
}

/// Fractional part with the sign convention `x - floor(x)`, always in `[0, 1)`.
pub(crate) fn fract_floor(x: f64) -> f64 {
    let f = x - x.floor();
    // `x - floor(x)` can round up to exactly 1.0 for tiny negative inputs.
    if f >= 1.0 { 0.0 } else { f }
}

/// Composite premultiplied RGBA8 over an opaque `bg_rgb` in place. Every alpha ends up 255.
pub(crate) fn flatten_premul_rgba8_in_place(buf: &mut [u8], bg_rgb: [u8; 3]) {
    for px in buf.chunks_exact_mut(4) {
        let a = u16::from(px[3]);
        if a == 255 {
            continue;
        }
        let inv = 255 - a;
        for (c, bg) in px[..3].iter_mut().zip(bg_rgb) {
            *c = (u16::from(*c) + mul_div255_u16(u16::from(bg), inv)).min(255) as u8;
        }
        px[3] = 255;
    }
}

/// Copy premultiplied `src_premul` into `dst`, flattened over `bg_rgba`.
pub(crate) fn flatten_premul_over_bg_to_opaque_rgba8(
    dst: &mut [u8],
    src_premul: &[u8],
    bg_rgba: [u8; 4],
) -> NovaResult<()> {
    if dst.len() != src_premul.len() || !dst.len().is_multiple_of(4) {
        return Err(NovaError::validation(
            "flatten expects equal-length rgba8 buffers",
        ));
    }
    dst.copy_from_slice(src_premul);
    let [r, g, b, _] = bg_rgba;
    flatten_premul_rgba8_in_place(dst, [r, g, b]);
    Ok(())
}

/// Undo premultiplication, rounding to nearest. Fully transparent pixels become zero.
pub(crate) fn unpremultiply_rgba8_in_place(buf: &mut [u8]) {
    for px in buf.chunks_exact_mut(4) {
        let a = u32::from(px[3]);
        match a {
            255 => {}
            0 => px[..3].fill(0),
            _ => {
                for c in &mut px[..3] {
                    *c = ((u32::from(*c) * 255 + a / 2) / a).min(255) as u8;
                }
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/math.rs"]
mod tests;
