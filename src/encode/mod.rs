//! Encoding sinks.
//!
//! A sink takes captured frames in index order and delivers encoded chunks over a channel.

/// `ffmpeg`-based webm encoder.
pub mod ffmpeg;
/// Encoder traits, chunk accumulation and the in-memory encoder.
pub mod sink;
