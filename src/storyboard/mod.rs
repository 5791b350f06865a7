//! Prompt-to-storyboard synthesis.
//!
//! Everything here is pure: no I/O, no clock, no ambient randomness. The only source of
//! variation is the request itself.

/// Generation request and its selectors.
pub mod input;
pub(crate) mod lexicon;
/// Storyboard and scene descriptor types.
pub mod model;
/// The synthesis heuristic.
pub mod synth;
