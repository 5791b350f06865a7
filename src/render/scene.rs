use crate::foundation::color::parse_hex;
use crate::foundation::core::{Affine, Canvas, Rgba8};
use crate::foundation::error::{NovaError, NovaResult};
use crate::render::motion::{band_rect, camera_transform};
use crate::render::procedural::{
    diagonal_gradient_pos, gradient_color, particle_field, scene_seed,
};
use crate::render::surface::{FrameRGBA, Surface};
use crate::render::text::{TextBrushRgba8, TextLayoutEngine, resolve_font_path, wrap_words};
use crate::storyboard::model::SceneDescriptor;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use vello_cpu::kurbo::Shape as _;

const PARTICLE_FILL_ALPHA: u8 = 0x22;
const RING_RGB: Rgba8 = Rgba8::rgb(241, 245, 249);
const RING_WIDTH_PX: f64 = 2.0;
const BAND_COLOR: Rgba8 = Rgba8::rgb(15, 23, 42);
const BAND_ALPHA: f64 = 0.28;

// Backdrops kept before the cache starts over.
const GRADIENT_CACHE_CAPACITY: usize = 8;

const TEXT_LEFT_FRAC: f64 = 0.08;
const SUMMARY_WIDTH_FRAC: f64 = 0.7;
const SUMMARY_MAX_LINES: usize = 4;

struct TextStyle {
    size_frac: f64,
    weight: f32,
    color: Rgba8,
    alpha: f64,
}

const LABEL_STYLE: TextStyle = TextStyle {
    size_frac: 0.056,
    weight: 600.0,
    color: Rgba8::rgb(241, 245, 249),
    alpha: 0.92,
};
const SUMMARY_STYLE: TextStyle = TextStyle {
    size_frac: 0.028,
    weight: 400.0,
    color: Rgba8::rgb(226, 232, 240),
    alpha: 0.84,
};
const CAPTION_STYLE: TextStyle = TextStyle {
    size_frac: 0.022,
    weight: 500.0,
    color: Rgba8::rgb(148, 163, 184),
    alpha: 0.86,
};

impl TextStyle {
    fn size_px(&self, canvas: Canvas) -> f32 {
        (canvas.h() * self.size_frac).round().max(1.0) as f32
    }

    fn brush(&self) -> TextBrushRgba8 {
        self.color.with_alpha_f(self.alpha).into()
    }
}

/// Options for [`SceneRasterizer`].
#[derive(Clone, Debug)]
pub struct SceneRasterizerOpts {
    /// Overlay font file. `None` falls back to `NOVAFORGE_FONT`, then common system fonts.
    pub font_path: Option<PathBuf>,
    /// Draw the label, summary and caption overlay.
    pub draw_text: bool,
}

impl Default for SceneRasterizerOpts {
    fn default() -> Self {
        Self {
            font_path: None,
            draw_text: true,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
struct GradientKey {
    palette: Vec<String>,
    w: u32,
    h: u32,
}

/// Draws one scene at a normalized time onto a [`Surface`].
///
/// Output depends only on the scene, `t` and the canvas size; the gradient backdrop is cached
/// per palette and size, for a bounded number of entries.
pub struct SceneRasterizer {
    text: Option<TextLayoutEngine>,
    gradient_cache: HashMap<GradientKey, vello_cpu::Image>,
}

impl SceneRasterizer {
    /// Build a rasterizer, loading the overlay font when text is enabled.
    ///
    /// A missing font is not an error: the overlay is skipped and a warning is logged.
    pub fn new(opts: &SceneRasterizerOpts) -> NovaResult<Self> {
        if !opts.draw_text {
            return Ok(Self::without_text());
        }
        let text = match resolve_font_path(opts.font_path.as_deref()) {
            Some(path) => {
                tracing::debug!(font = %path.display(), "loading overlay font");
                Some(TextLayoutEngine::from_path(&path)?)
            }
            None => {
                tracing::warn!("no overlay font found; scenes render without text");
                None
            }
        };
        Ok(Self {
            text,
            gradient_cache: HashMap::new(),
        })
    }

    /// A rasterizer that only draws the backdrop, particles and band.
    pub fn without_text() -> Self {
        Self {
            text: None,
            gradient_cache: HashMap::new(),
        }
    }

    /// Whether the text overlay will be drawn.
    pub fn has_text(&self) -> bool {
        self.text.is_some()
    }

    /// Drop every cached backdrop.
    pub fn clear_cache(&mut self) {
        self.gradient_cache.clear();
    }

    pub(crate) fn cached_gradients(&self) -> usize {
        self.gradient_cache.len()
    }

    /// Paint `scene` at normalized time `t` (clamped to `[0, 1]`).
    pub fn draw_scene(
        &mut self,
        surface: &mut Surface,
        scene: &SceneDescriptor,
        t: f64,
    ) -> NovaResult<()> {
        let canvas = surface.canvas();
        let t = if t.is_finite() { t.clamp(0.0, 1.0) } else { 0.0 };
        let palette = scene
            .palette
            .iter()
            .map(|c| {
                parse_hex(c).map_err(|e| {
                    NovaError::validation(format!(
                        "scene \"{}\" palette color \"{c}\": {e}",
                        scene.id
                    ))
                })
            })
            .collect::<NovaResult<Vec<_>>>()?;
        if palette.is_empty() {
            return Err(NovaError::validation(format!(
                "scene \"{}\" has an empty palette",
                scene.id
            )));
        }
        let backdrop = self.gradient_paint(&scene.palette, &palette, canvas)?;

        surface.paint(|ctx| {
            ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
            ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
            ctx.set_paint(backdrop);
            ctx.fill_rect(&vello_cpu::kurbo::Rect::new(0.0, 0.0, canvas.w(), canvas.h()));

            draw_particles(ctx, scene, &palette, t, canvas);

            ctx.set_transform(affine_to_cpu(camera_transform(scene.motion, t, canvas)));
            ctx.set_paint(color_to_cpu(BAND_COLOR.with_alpha_f(BAND_ALPHA)));
            let band = band_rect(canvas);
            ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
                band.x0, band.y0, band.x1, band.y1,
            ));
            ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);

            if let Some(text) = self.text.as_mut() {
                draw_overlay(ctx, text, scene, canvas)?;
            }
            Ok(())
        })
    }

    /// Render a standalone frame, acquiring a surface for `canvas`.
    pub fn render_frame(
        &mut self,
        scene: &SceneDescriptor,
        t: f64,
        canvas: Canvas,
    ) -> NovaResult<FrameRGBA> {
        let mut surface = Surface::acquire(canvas)?;
        self.draw_scene(&mut surface, scene, t)?;
        Ok(surface.snapshot())
    }

    fn gradient_paint(
        &mut self,
        palette_hex: &[String],
        stops: &[Rgba8],
        canvas: Canvas,
    ) -> NovaResult<vello_cpu::Image> {
        let key = GradientKey {
            palette: palette_hex.to_vec(),
            w: canvas.width,
            h: canvas.height,
        };
        if let Some(img) = self.gradient_cache.get(&key).cloned() {
            return Ok(img);
        }
        let mut bytes = vec![0u8; canvas.rgba8_len()];
        for y in 0..canvas.height {
            for x in 0..canvas.width {
                let pos = diagonal_gradient_pos(f64::from(x) + 0.5, f64::from(y) + 0.5, canvas);
                let c = gradient_color(stops, pos).premultiply();
                let idx = ((y as usize) * (canvas.width as usize) + (x as usize)) * 4;
                bytes[idx..idx + 4].copy_from_slice(&[c.r, c.g, c.b, c.a]);
            }
        }
        let img = rgba_premul_to_image(&bytes, canvas.width, canvas.height)?;
        if self.gradient_cache.len() >= GRADIENT_CACHE_CAPACITY {
            tracing::debug!(entries = self.gradient_cache.len(), "gradient cache full; clearing");
            self.gradient_cache.clear();
        }
        self.gradient_cache.insert(key, img.clone());
        Ok(img)
    }
}

fn draw_particles(
    ctx: &mut vello_cpu::RenderContext,
    scene: &SceneDescriptor,
    palette: &[Rgba8],
    t: f64,
    canvas: Canvas,
) {
    let seed = scene_seed(&scene.id);
    ctx.set_stroke(vello_cpu::kurbo::Stroke::new(RING_WIDTH_PX));
    for p in particle_field(seed, t, canvas) {
        let center = (p.center.x, p.center.y);

        let fill = palette[p.palette_slot % palette.len()].with_alpha(PARTICLE_FILL_ALPHA);
        ctx.set_paint(color_to_cpu(fill));
        ctx.fill_path(&vello_cpu::kurbo::Circle::new(center, p.radius).to_path(0.1));

        ctx.set_paint(color_to_cpu(RING_RGB.with_alpha_f(p.ring_alpha)));
        ctx.stroke_path(&vello_cpu::kurbo::Circle::new(center, p.ring_radius).to_path(0.1));
    }
}

fn draw_overlay(
    ctx: &mut vello_cpu::RenderContext,
    text: &mut TextLayoutEngine,
    scene: &SceneDescriptor,
    canvas: Canvas,
) -> NovaResult<()> {
    let (w, h) = (canvas.w(), canvas.h());
    let left = w * TEXT_LEFT_FRAC;

    draw_line(ctx, text, &scene.label, left, h * 0.12, &LABEL_STYLE, canvas)?;

    let summary_size = SUMMARY_STYLE.size_px(canvas);
    let lines = wrap_words(&scene.summary, (w * SUMMARY_WIDTH_FRAC) as f32, |s| {
        text.measure(s, summary_size, SUMMARY_STYLE.weight)
    })?;
    for (i, line) in lines.iter().take(SUMMARY_MAX_LINES).enumerate() {
        let y = h * 0.2 + (i as f64) * h * 0.045;
        draw_line(ctx, text, line, left, y, &SUMMARY_STYLE, canvas)?;
    }

    let keywords = scene
        .keywords
        .iter()
        .take(4)
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(", ");
    let captions = [
        (format!("Camera: {}", scene.camera), 0.7),
        (format!("Mood: {}", scene.mood), 0.76),
        (format!("Keywords: {keywords}"), 0.82),
    ];
    for (caption, y_frac) in captions {
        draw_line(ctx, text, &caption, left, h * y_frac, &CAPTION_STYLE, canvas)?;
    }
    Ok(())
}

// Lines are anchored at their top edge.
fn draw_line(
    ctx: &mut vello_cpu::RenderContext,
    text: &mut TextLayoutEngine,
    line: &str,
    x: f64,
    y: f64,
    style: &TextStyle,
    canvas: Canvas,
) -> NovaResult<()> {
    if line.is_empty() {
        return Ok(());
    }
    let layout = text.layout_line(line, style.size_px(canvas), style.weight, style.brush())?;
    ctx.set_transform(vello_cpu::kurbo::Affine::translate((x, y)));
    for layout_line in layout.lines() {
        for item in layout_line.items() {
            let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                continue;
            };
            let brush = run.style().brush;
            ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
                brush.r, brush.g, brush.b, brush.a,
            ));
            let glyphs = run.positioned_glyphs().map(|g| vello_cpu::Glyph {
                id: g.id,
                x: g.x,
                y: g.y,
            });
            ctx.glyph_run(text.font())
                .font_size(run.run().font_size())
                .fill_glyphs(glyphs);
        }
    }
    ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
    Ok(())
}

fn color_to_cpu(c: Rgba8) -> vello_cpu::peniko::Color {
    vello_cpu::peniko::Color::from_rgba8(c.r, c.g, c.b, c.a)
}

fn affine_to_cpu(a: Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

fn pixmap_from_premul_bytes(
    bytes: &[u8],
    width: u32,
    height: u32,
) -> NovaResult<vello_cpu::Pixmap> {
    let w: u16 = width
        .try_into()
        .map_err(|_| NovaError::surface("pixmap width exceeds u16"))?;
    let h: u16 = height
        .try_into()
        .map_err(|_| NovaError::surface("pixmap height exceeds u16"))?;
    if bytes.len()
        != (width as usize)
            .saturating_mul(height as usize)
            .saturating_mul(4)
    {
        return Err(NovaError::evaluation("pixmap byte len mismatch"));
    }
    let pixels = bytes
        .chunks_exact(4)
        .map(|px| vello_cpu::peniko::color::PremulRgba8::from_u8_array([px[0], px[1], px[2], px[3]]))
        .collect::<Vec<_>>();
    Ok(vello_cpu::Pixmap::from_parts_with_opacity(
        pixels, w, h, true,
    ))
}

fn rgba_premul_to_image(
    bytes_premul: &[u8],
    width: u32,
    height: u32,
) -> NovaResult<vello_cpu::Image> {
    let pixmap = pixmap_from_premul_bytes(bytes_premul, width, height)?;
    Ok(vello_cpu::Image {
        image: vello_cpu::ImageSource::Pixmap(Arc::new(pixmap)),
        sampler: vello_cpu::peniko::ImageSampler::default(),
    })
}

#[cfg(test)]
#[path = "../../tests/unit/render/scene.rs"]
mod tests;
