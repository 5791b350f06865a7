use crate::foundation::core::Canvas;
use crate::foundation::error::{NovaError, NovaResult};
use crate::foundation::math::{flatten_premul_rgba8_in_place, unpremultiply_rgba8_in_place};
use crate::storyboard::input::AspectRatio;

/// Long edge for non-square outputs.
pub const LONG_EDGE_PX: u32 = 1280;
/// Edge length for square outputs.
pub const SQUARE_EDGE_PX: u32 = 1024;

/// A rendered frame as RGBA8 pixels.
///
/// Frames coming out of [`Surface`] are premultiplied; the flag keeps that explicit at sink
/// boundaries.
#[derive(Clone, Debug)]
pub struct FrameRGBA {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// RGBA8 bytes, tightly packed, row-major.
    pub data: Vec<u8>,
    /// Whether the `data` is premultiplied alpha.
    pub premultiplied: bool,
}

impl FrameRGBA {
    /// Straight (non-premultiplied) RGBA8 bytes, as image files expect.
    pub fn to_straight_rgba8(&self) -> Vec<u8> {
        let mut out = self.data.clone();
        if self.premultiplied {
            unpremultiply_rgba8_in_place(&mut out);
        }
        out
    }
}

/// Color painted frames are flattened over.
pub const SURFACE_BACKDROP_RGB: [u8; 3] = [0, 0, 0];

/// Fixed output dimensions for an aspect ratio.
pub fn canvas_for(aspect: AspectRatio) -> Canvas {
    canvas_for_ratio(aspect.ratio())
}

/// Fixed output dimensions for a width/height ratio.
///
/// Square → 1024×1024; wide → width 1280; tall → height 1280.
pub fn canvas_for_ratio(ratio: f64) -> Canvas {
    if ratio == 1.0 {
        return Canvas {
            width: SQUARE_EDGE_PX,
            height: SQUARE_EDGE_PX,
        };
    }
    let long = f64::from(LONG_EDGE_PX);
    if ratio > 1.0 {
        Canvas {
            width: LONG_EDGE_PX,
            height: (long / ratio).round() as u32,
        }
    } else {
        Canvas {
            width: (long * ratio).round() as u32,
            height: LONG_EDGE_PX,
        }
    }
}

/// CPU drawing surface: a `vello_cpu` render context plus its target pixmap.
pub struct Surface {
    canvas: Canvas,
    ctx: vello_cpu::RenderContext,
    pixmap: vello_cpu::Pixmap,
}

impl std::fmt::Debug for Surface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Surface")
            .field("canvas", &self.canvas)
            .finish_non_exhaustive()
    }
}

impl Surface {
    /// Create a surface for `canvas`.
    ///
    /// Fails with [`NovaError::SurfaceUnavailable`] when a dimension is zero or exceeds the
    /// rasterizer's 16-bit limit.
    pub fn acquire(canvas: Canvas) -> NovaResult<Self> {
        if canvas.width == 0 || canvas.height == 0 {
            return Err(NovaError::surface(format!(
                "cannot create a {}x{} surface",
                canvas.width, canvas.height
            )));
        }
        let w: u16 = canvas.width.try_into().map_err(|_| {
            NovaError::surface(format!("surface width {} exceeds u16", canvas.width))
        })?;
        let h: u16 = canvas.height.try_into().map_err(|_| {
            NovaError::surface(format!("surface height {} exceeds u16", canvas.height))
        })?;
        Ok(Self {
            canvas,
            ctx: vello_cpu::RenderContext::new(w, h),
            pixmap: vello_cpu::Pixmap::new(w, h),
        })
    }

    /// Surface dimensions.
    pub fn canvas(&self) -> Canvas {
        self.canvas
    }

    /// Reset the context, hand it to `draw`, then rasterize into the pixmap.
    ///
    /// The result is flattened over [`SURFACE_BACKDROP_RGB`], so painted frames are opaque.
    pub(crate) fn paint(
        &mut self,
        draw: impl FnOnce(&mut vello_cpu::RenderContext) -> NovaResult<()>,
    ) -> NovaResult<()> {
        self.ctx.reset();
        draw(&mut self.ctx)?;
        self.ctx.flush();
        self.ctx.render_to_pixmap(&mut self.pixmap);
        // The u8 pipeline can leave alpha a few steps short of 255 after compositing.
        flatten_premul_rgba8_in_place(self.pixmap.data_as_u8_slice_mut(), SURFACE_BACKDROP_RGB);
        Ok(())
    }

    /// Premultiplied RGBA8 bytes of the last painted frame.
    pub fn pixels(&self) -> &[u8] {
        self.pixmap.data_as_u8_slice()
    }

    /// Copy the current contents out as a frame.
    pub fn snapshot(&self) -> FrameRGBA {
        FrameRGBA {
            width: self.canvas.width,
            height: self.canvas.height,
            data: self.pixels().to_vec(),
            premultiplied: true,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/surface.rs"]
mod tests;
