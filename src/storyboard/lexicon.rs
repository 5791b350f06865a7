//! Fixed descriptive tables the synthesizer draws from.

use crate::storyboard::input::{SoundtrackMood, VisualStyle};
use crate::storyboard::model::Motion;

/// Per-style vocabulary.
pub(crate) struct StyleLexicon {
    /// Gradient swatches; every entry holds 3 to 5 `#rrggbb` colors.
    pub(crate) swatches: &'static [&'static [&'static str]],
    pub(crate) adjectives: &'static [&'static str],
    pub(crate) textures: &'static [&'static str],
    pub(crate) moods: &'static [&'static str],
    pub(crate) lens: &'static str,
    pub(crate) fallback_keywords: &'static [&'static str],
}

const CINEMATIC: StyleLexicon = StyleLexicon {
    swatches: &[
        &["#0b0f19", "#1f2937", "#b45309", "#f59e0b", "#fde68a"],
        &["#111827", "#374151", "#7f1d1d", "#dc2626"],
        &["#0f172a", "#1e3a8a", "#94a3b8", "#e2e8f0"],
    ],
    adjectives: &["chiaroscuro", "anamorphic", "brooding", "silhouetted"],
    textures: &["film grain", "lens bloom", "deep shadow pools"],
    moods: &["tense", "noir-laden", "resolute", "melancholic"],
    lens: "40mm anamorphic",
    fallback_keywords: &["shadow", "glow", "silhouette", "contrast"],
};

const DOCUMENTARY: StyleLexicon = StyleLexicon {
    swatches: &[
        &["#1c1917", "#57534e", "#a8a29e", "#d6d3d1"],
        &["#14532d", "#3f6212", "#a3e635", "#ecfccb"],
        &["#0c4a6e", "#0369a1", "#7dd3fc", "#f0f9ff", "#fef3c7"],
    ],
    adjectives: &["observational", "unvarnished", "grounded", "patient"],
    textures: &["natural light", "handheld texture", "earthy grain"],
    moods: &["curious", "grounded", "contemplative", "hopeful"],
    lens: "35mm handheld",
    fallback_keywords: &["earth", "detail", "texture", "daylight"],
};

const DREAMSCAPE: StyleLexicon = StyleLexicon {
    swatches: &[
        &["#312e81", "#6d28d9", "#c084fc", "#f5d0fe", "#fdf4ff"],
        &["#1e1b4b", "#4338ca", "#a5b4fc", "#e0e7ff"],
        &["#831843", "#db2777", "#f9a8d4", "#fce7f3"],
    ],
    adjectives: &["ethereal", "weightless", "iridescent", "drifting"],
    textures: &["soft haze", "prismatic bloom", "slow-motion vapor"],
    moods: &["wistful", "serene", "otherworldly", "tender"],
    lens: "soft-focus 85mm",
    fallback_keywords: &["mist", "glow", "drift", "aurora"],
};

const NEONWAVE: StyleLexicon = StyleLexicon {
    swatches: &[
        &["#0f172a", "#7c3aed", "#ec4899", "#22d3ee", "#f0abfc"],
        &["#020617", "#1d4ed8", "#38bdf8", "#a855f7"],
        &["#1e1b4b", "#db2777", "#f472b6", "#facc15", "#22d3ee"],
    ],
    adjectives: &["electric", "kinetic", "holographic", "synth-lit"],
    textures: &["chromatic streaks", "neon reflections", "scanline shimmer"],
    moods: &["charged", "euphoric", "restless", "hypnotic"],
    lens: "wide 24mm with halation",
    fallback_keywords: &["neon", "pulse", "grid", "hologram"],
};

const ANALOG: StyleLexicon = StyleLexicon {
    swatches: &[
        &["#422006", "#b45309", "#f97316", "#fde047"],
        &["#164e63", "#0e7490", "#f43f5e", "#fda4af", "#fef9c3"],
        &["#3f3f46", "#a1a1aa", "#f59e0b", "#fef08a"],
    ],
    adjectives: &["retro-futurist", "tape-worn", "sun-faded", "flickering"],
    textures: &["VHS fuzz", "chromatic flares", "tracking noise"],
    moods: &["nostalgic", "playful", "bittersweet", "dreamy"],
    lens: "vintage zoom with chromatic fringing",
    fallback_keywords: &["tape", "flare", "static", "sunset"],
};

pub(crate) fn style_lexicon(style: VisualStyle) -> &'static StyleLexicon {
    match style {
        VisualStyle::Cinematic => &CINEMATIC,
        VisualStyle::Documentary => &DOCUMENTARY,
        VisualStyle::Dreamscape => &DREAMSCAPE,
        VisualStyle::Neonwave => &NEONWAVE,
        VisualStyle::Analog => &ANALOG,
    }
}

/// `(tone, soundtrack notes)` for a soundtrack selector.
pub(crate) fn soundtrack_text(mood: SoundtrackMood) -> (&'static str, &'static str) {
    match mood {
        SoundtrackMood::Ambient => (
            "Spacious and slow-breathing",
            "Layered pads and field textures swell beneath the visuals, leaving room for silence between beats.",
        ),
        SoundtrackMood::Pulse => (
            "Driving and propulsive",
            "A sidechained synth bass locks to a 120 BPM pulse, with arpeggios rising into each scene change.",
        ),
        SoundtrackMood::Orchestral => (
            "Sweeping and cinematic",
            "Strings build from a low ostinato to a full swell, brass accents marking every reveal.",
        ),
        SoundtrackMood::Lofi => (
            "Warm and unhurried",
            "Dusty drum loops and detuned keys sit under a vinyl crackle, keeping the energy relaxed.",
        ),
    }
}

pub(crate) fn camera_phrase(motion: Motion) -> &'static str {
    match motion {
        Motion::Pan => "slow lateral tracking pan",
        Motion::Zoom => "measured push-in",
        Motion::Orbit => "circling orbit around the subject",
        Motion::Pulse => "breathing pulse zoom on the beat",
    }
}

/// Narrative roles, chosen to fit the scene count.
pub(crate) fn beat_roles(count: usize) -> &'static [&'static str] {
    match count {
        0..=2 => &["Opening", "Finale"],
        3 => &["Opening", "Reveal", "Finale"],
        4 => &["Opening", "Rising", "Reveal", "Finale"],
        5 => &["Opening", "Rising", "Reveal", "Crescendo", "Afterglow"],
        _ => &[
            "Opening",
            "Rising",
            "Reveal",
            "Crescendo",
            "Afterglow",
            "Coda",
        ],
    }
}

pub(crate) fn role_sentence(role: &str) -> &'static str {
    match role {
        "Opening" => "establishes",
        "Rising" => "builds momentum through",
        "Reveal" => "unveils",
        "Crescendo" => "peaks inside",
        "Afterglow" => "lingers over",
        "Coda" => "quietly closes on",
        _ => "resolves into",
    }
}

pub(crate) const STOP_WORDS: &[&str] = &[
    "the", "and", "with", "into", "onto", "from", "where", "when", "that", "this", "there",
    "their", "over", "under", "above", "below", "through", "for", "are", "was", "were", "its",
    "his", "her", "our", "your", "who", "what", "which", "while", "then", "than", "has", "have",
    "had", "but", "not", "all", "any", "each", "very", "just", "like", "some", "shots", "scene",
];

#[cfg(test)]
#[path = "../../tests/unit/storyboard/lexicon.rs"]
mod tests;
