//! CPU scene rasterization.
//!
//! A frame is a diagonal palette gradient, a seeded particle field, a camera-moved band and a
//! text overlay, drawn with `vello_cpu` onto a [`surface::Surface`].

/// Camera motion transforms.
pub mod motion;
/// Seeded particle field and gradient math.
pub mod procedural;
/// Scene rasterizer.
pub mod scene;
/// Surface sizing and the drawing surface.
pub mod surface;
/// Overlay font resolution, shaping and word wrap.
pub mod text;
