//! NovaForge turns a short prompt into a storyboard of timed scenes and renders it as a
//! procedurally animated webm clip.
//!
//! - Synthesize a [`Storyboard`] from a [`GeneratorInput`] with [`build_storyboard`]
//! - Hand it to a [`Composer`] and tick it (or [`Composer::run_to_completion`]) against a
//!   [`FrameClock`]
//! - Collect the finished clip from the [`ArtifactStore`]
#![forbid(unsafe_code)]
#![deny(missing_docs)]

/// Value types, colors and the crate error.
pub mod foundation;

/// Encoding sinks.
pub mod encode;
/// Scene rasterization.
pub mod render;
/// Render sessions and the studio flow.
pub mod session;
/// Storyboard synthesis.
pub mod storyboard;

pub use crate::foundation::core::{Affine, Canvas, Fps, FrameIndex, Point, Rect, Rgba8, Vec2};
pub use crate::foundation::error::{NovaError, NovaResult};

pub use crate::encode::ffmpeg::{FfmpegEncoderOpts, FfmpegWebmEncoder};
pub use crate::encode::sink::{
    ChunkAccumulator, EncodedChunk, EncoderBackend, EncoderConfig, EncodingSink, MemoryEncoder,
};
pub use crate::render::scene::{SceneRasterizer, SceneRasterizerOpts};
pub use crate::render::surface::{FrameRGBA, Surface, canvas_for};
pub use crate::session::artifact::{
    ArtifactHandle, ArtifactStore, SUGGESTED_FILENAME, VideoArtifact,
};
pub use crate::session::clock::{FrameClock, ManualClock, RefreshClock};
pub use crate::session::composer::{Composer, ComposerOpts, ComposerState, TickOutcome};
pub use crate::session::studio::Studio;
pub use crate::session::timeline::{Timeline, TimelinePosition};
pub use crate::storyboard::input::{
    AspectRatio, DurationPolicy, EXAMPLE_PROMPTS, GeneratorInput, SoundtrackMood, VisualStyle,
};
pub use crate::storyboard::model::{Motion, SceneDescriptor, Storyboard};
pub use crate::storyboard::synth::{SynthOpts, build_storyboard, build_storyboard_with};
