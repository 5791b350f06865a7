use crate::foundation::color::is_hex_color;
use crate::foundation::error::{NovaError, NovaResult};
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;

/// Camera motion applied to a scene's overlay band.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Motion {
    /// Sideways drift.
    Pan,
    /// Uniform push in/out.
    Zoom,
    /// Rotation about the frame center.
    Orbit,
    /// Stronger uniform breathing.
    Pulse,
}

impl Motion {
    /// Cycle order used when assigning motions to consecutive scenes.
    pub const CYCLE: [Motion; 4] = [Motion::Pan, Motion::Zoom, Motion::Orbit, Motion::Pulse];

    /// Lowercase wire name.
    pub fn as_str(self) -> &'static str {
        match self {
            Motion::Pan => "pan",
            Motion::Zoom => "zoom",
            Motion::Orbit => "orbit",
            Motion::Pulse => "pulse",
        }
    }
}

impl std::fmt::Display for Motion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One timed segment of the storyboard.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SceneDescriptor {
    /// Stable, unique id (`scene-N`). Its digits seed the particle field.
    pub id: String,
    /// Short title.
    pub label: String,
    /// One or two sentences describing the beat.
    pub summary: String,
    /// Emotional register.
    pub mood: String,
    /// Length in whole seconds, always > 0.
    pub duration: u32,
    /// 3 to 5 `#rrggbb` colors, used as gradient stops in order.
    pub palette: Vec<String>,
    /// Camera motion.
    pub motion: Motion,
    /// Camera direction phrase.
    pub camera: String,
    /// Prompt-derived tags.
    pub keywords: Vec<String>,
}

/// Ordered scenes plus narrative metadata.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Storyboard {
    /// One-paragraph overview.
    pub synopsis: String,
    /// Tonal direction.
    pub tone: String,
    /// Descriptive soundtrack direction.
    pub soundtrack_notes: String,
    /// Non-empty, in playback order.
    pub scenes: Vec<SceneDescriptor>,
}

impl Storyboard {
    /// Sum of scene durations in seconds.
    pub fn total_duration(&self) -> u32 {
        self.scenes.iter().map(|s| s.duration).sum()
    }

    /// Look a scene up by id.
    pub fn scene(&self, id: &str) -> Option<&SceneDescriptor> {
        self.scenes.iter().find(|s| s.id == id)
    }

    /// Check the structural invariants the renderer relies on.
    pub fn validate(&self) -> NovaResult<()> {
        if self.scenes.is_empty() {
            return Err(NovaError::validation("storyboard must contain at least one scene"));
        }
        let mut seen = std::collections::HashSet::new();
        for scene in &self.scenes {
            if !seen.insert(scene.id.as_str()) {
                return Err(NovaError::validation(format!(
                    "duplicate scene id \"{}\"",
                    scene.id
                )));
            }
            if scene.duration == 0 {
                return Err(NovaError::validation(format!(
                    "scene \"{}\" must have a positive duration",
                    scene.id
                )));
            }
            if !(3..=5).contains(&scene.palette.len()) {
                return Err(NovaError::validation(format!(
                    "scene \"{}\" palette must hold 3 to 5 colors (got {})",
                    scene.id,
                    scene.palette.len()
                )));
            }
            if let Some(bad) = scene.palette.iter().find(|c| !is_hex_color(c)) {
                return Err(NovaError::validation(format!(
                    "scene \"{}\" has invalid palette color \"{bad}\"",
                    scene.id
                )));
            }
        }
        Ok(())
    }

    /// Human-readable timeline listing.
    pub fn blueprint(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "{}", self.synopsis);
        let _ = writeln!(out, "Tone: {}", self.tone.trim());
        let _ = writeln!(out, "Soundscape: {}", self.soundtrack_notes);
        for (i, scene) in self.scenes.iter().enumerate() {
            let _ = writeln!(out);
            let _ = writeln!(
                out,
                "Scene {} · {}s · {}",
                i + 1,
                scene.duration,
                scene.motion
            );
            let _ = writeln!(out, "  {}", scene.label);
            let _ = writeln!(out, "  {}", scene.summary);
            let _ = writeln!(out, "  Camera: {}", scene.camera);
            let _ = writeln!(out, "  Palette: {}", scene.palette.join(" "));
        }
        out
    }
}

#[cfg(test)]
#[path = "../../tests/unit/storyboard/model.rs"]
mod tests;
