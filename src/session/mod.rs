//! Real-time render sessions.
//!
//! The [`composer::Composer`] walks a clock against the storyboard timeline, rasterizes one frame
//! per tick and captures due frames into an encoding sink.

/// Finished clips and their handles.
pub mod artifact;
/// Frame pacing.
pub mod clock;
/// Render loop driver and observable state.
pub mod composer;
/// Generate/select/render flow.
pub mod studio;
/// Scene lookup by elapsed time.
pub mod timeline;
