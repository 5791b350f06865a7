//! Shared value types, colors and the crate error.

/// Hex color parsing and interpolation.
pub mod color;
/// Frame, fps, canvas and pixel value types.
pub mod core;
/// Crate error enum and result alias.
pub mod error;
pub(crate) mod math;
