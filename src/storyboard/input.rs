use crate::foundation::error::{NovaError, NovaResult};
use serde::{Deserialize, Serialize};

/// Shortest accepted clip, in seconds.
pub const MIN_DURATION_SECS: u32 = 6;
/// Longest accepted clip, in seconds.
pub const MAX_DURATION_SECS: u32 = 30;

/// Visual language selector.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum VisualStyle {
    /// Deep contrast, anamorphic glow.
    Cinematic,
    /// Natural texture, grounded palette.
    Documentary,
    /// Ethereal hues, slow motion.
    Dreamscape,
    /// Electric colours, kinetic energy.
    Neonwave,
    /// Retro VHS fuzz, chromatic flares.
    Analog,
}

impl VisualStyle {
    /// Every style, in display order.
    pub const ALL: [VisualStyle; 5] = [
        VisualStyle::Cinematic,
        VisualStyle::Dreamscape,
        VisualStyle::Neonwave,
        VisualStyle::Documentary,
        VisualStyle::Analog,
    ];

    /// Human-facing name.
    pub fn label(self) -> &'static str {
        match self {
            VisualStyle::Cinematic => "Cinematic Noir",
            VisualStyle::Documentary => "Documentary",
            VisualStyle::Dreamscape => "Dreamscape",
            VisualStyle::Neonwave => "Neonwave",
            VisualStyle::Analog => "Analog Future",
        }
    }

    /// One-line description of the look.
    pub fn hint(self) -> &'static str {
        match self {
            VisualStyle::Cinematic => "Deep contrast, anamorphic glow",
            VisualStyle::Documentary => "Natural texture, grounded palette",
            VisualStyle::Dreamscape => "Ethereal hues, slow motion",
            VisualStyle::Neonwave => "Electric colours, kinetic energy",
            VisualStyle::Analog => "Retro VHS fuzz, chromatic flares",
        }
    }
}

/// Soundtrack selector. Only ever rendered as descriptive text.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SoundtrackMood {
    /// Ambient atmospherics.
    Ambient,
    /// Pulse engine.
    Pulse,
    /// Orchestral swell.
    Orchestral,
    /// Lo-fi dreamwave.
    Lofi,
}

impl SoundtrackMood {
    /// Human-facing name.
    pub fn label(self) -> &'static str {
        match self {
            SoundtrackMood::Ambient => "Ambient Atmospherics",
            SoundtrackMood::Pulse => "Pulse Engine",
            SoundtrackMood::Orchestral => "Orchestral Swell",
            SoundtrackMood::Lofi => "Lo-fi Dreamwave",
        }
    }
}

/// Output frame shape.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum AspectRatio {
    /// Landscape.
    #[default]
    #[serde(rename = "16:9")]
    Landscape,
    /// Vertical.
    #[serde(rename = "9:16")]
    Portrait,
    /// Square.
    #[serde(rename = "1:1")]
    Square,
}

impl AspectRatio {
    /// Width divided by height.
    pub fn ratio(self) -> f64 {
        match self {
            AspectRatio::Landscape => 16.0 / 9.0,
            AspectRatio::Portrait => 9.0 / 16.0,
            AspectRatio::Square => 1.0,
        }
    }

    /// The `W:H` notation.
    pub fn as_str(self) -> &'static str {
        match self {
            AspectRatio::Landscape => "16:9",
            AspectRatio::Portrait => "9:16",
            AspectRatio::Square => "1:1",
        }
    }
}

impl std::fmt::Display for AspectRatio {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for AspectRatio {
    type Err = NovaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "16:9" => Ok(AspectRatio::Landscape),
            "9:16" => Ok(AspectRatio::Portrait),
            "1:1" => Ok(AspectRatio::Square),
            other => Err(NovaError::invalid_input(format!(
                "aspect ratio must be one of 16:9, 9:16, 1:1 (got \"{other}\")"
            ))),
        }
    }
}

/// What to do with a requested duration outside `[6, 30]` seconds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum DurationPolicy {
    /// Pull the value into range.
    #[default]
    Clamp,
    /// Refuse the request with [`NovaError::InvalidInput`].
    Reject,
}

/// One generation request.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratorInput {
    /// Natural-language concept.
    pub prompt: String,
    /// Requested clip length in whole seconds.
    pub duration: u32,
    /// Visual language.
    pub style: VisualStyle,
    /// Soundtrack descriptor.
    pub soundtrack: SoundtrackMood,
    /// Output frame shape.
    pub aspect_ratio: AspectRatio,
}

impl GeneratorInput {
    /// Check the input contract and return a copy with the duration normalized.
    ///
    /// Empty or whitespace-only prompts are always rejected.
    pub fn validated(&self, policy: DurationPolicy) -> NovaResult<GeneratorInput> {
        if self.prompt.trim().is_empty() {
            return Err(NovaError::invalid_input("prompt must not be empty"));
        }

        let in_range = (MIN_DURATION_SECS..=MAX_DURATION_SECS).contains(&self.duration);
        let duration = match (in_range, policy) {
            (true, _) => self.duration,
            (false, DurationPolicy::Clamp) => {
                let clamped = self.duration.clamp(MIN_DURATION_SECS, MAX_DURATION_SECS);
                tracing::warn!(
                    requested = self.duration,
                    clamped,
                    "duration outside supported range; clamping"
                );
                clamped
            }
            (false, DurationPolicy::Reject) => {
                return Err(NovaError::invalid_input(format!(
                    "duration must be within {MIN_DURATION_SECS}..={MAX_DURATION_SECS} seconds (got {})",
                    self.duration
                )));
            }
        };

        Ok(GeneratorInput {
            duration,
            ..self.clone()
        })
    }

    /// Parse a request from JSON.
    pub fn from_json_str(s: &str) -> NovaResult<Self> {
        serde_json::from_str(s)
            .map_err(|e| NovaError::invalid_input(format!("invalid request JSON: {e}")))
    }
}

/// Prompts offered when the user has nothing in mind yet.
pub const EXAMPLE_PROMPTS: [&str; 3] = [
    "A neon-drenched cyberpunk alley where rain refracts into holographic shards.",
    "A tranquil forest lake at dawn with mist swirling above the water line.",
    "Macro shots of circuitry blooming into crystalline landscapes.",
];

#[cfg(test)]
#[path = "../../tests/unit/storyboard/input.rs"]
mod tests;
