use crate::foundation::error::NovaResult;
use crate::storyboard::input::{DurationPolicy, GeneratorInput};
use crate::storyboard::lexicon::{
    STOP_WORDS, StyleLexicon, beat_roles, camera_phrase, role_sentence, soundtrack_text,
    style_lexicon,
};
use crate::storyboard::model::{Motion, SceneDescriptor, Storyboard};

/// Fewest scenes a storyboard is split into.
pub const MIN_SCENES: usize = 2;
/// Most scenes a storyboard is split into.
pub const MAX_SCENES: usize = 6;

const SECONDS_PER_BEAT: f64 = 5.0;
const KEYWORDS_PER_SCENE: usize = 4;
const MAX_FRAGMENT_WORDS: usize = 14;

/// Options for [`build_storyboard_with`].
#[derive(Clone, Copy, Debug, Default)]
pub struct SynthOpts {
    /// Handling of durations outside `[6, 30]` seconds.
    pub duration_policy: DurationPolicy,
}

/// Build a storyboard with default options (durations are clamped).
pub fn build_storyboard(input: &GeneratorInput) -> NovaResult<Storyboard> {
    build_storyboard_with(input, SynthOpts::default())
}

/// Build a storyboard from a generation request.
///
/// The result depends only on `input`: identical requests give identical storyboards.
#[tracing::instrument(skip(input), fields(style = ?input.style, duration = input.duration))]
pub fn build_storyboard_with(input: &GeneratorInput, opts: SynthOpts) -> NovaResult<Storyboard> {
    let input = input.validated(opts.duration_policy)?;
    let lex = style_lexicon(input.style);
    let hash = prompt_hash(&input.prompt);
    let tokens = tokenize(&input.prompt);
    let pool = keyword_pool(&tokens, lex);
    let fragment = prompt_fragment(&input.prompt);

    let count = scene_count(input.duration);
    let durations = allocate_durations(input.duration, count);
    let roles = beat_roles(count);
    let motion_offset = (hash % Motion::CYCLE.len() as u64) as usize;
    let swatch_offset = ((hash >> 8) % lex.swatches.len() as u64) as usize;
    let mood_offset = ((hash >> 16) % lex.moods.len() as u64) as usize;
    let adjective_offset = ((hash >> 24) % lex.adjectives.len() as u64) as usize;

    let scenes = durations
        .iter()
        .enumerate()
        .map(|(i, &duration)| {
            let role = roles[i % roles.len()];
            let motion = Motion::CYCLE[(motion_offset + i) % Motion::CYCLE.len()];
            let keywords = keyword_window(&pool, i);
            let adjective = lex.adjectives[(adjective_offset + i) % lex.adjectives.len()];
            let texture = lex.textures[i % lex.textures.len()];

            let focus = if i == 0 {
                fragment.clone()
            } else {
                format!("{} and {}", keywords[0], keywords[1])
            };

            SceneDescriptor {
                id: format!("scene-{}", i + 1),
                label: format!(
                    "{role}: {} {}",
                    title_case(&keywords[0]),
                    title_case(&keywords[1])
                ),
                summary: format!(
                    "The {} {} {focus}, rendered with {adjective} {texture}.",
                    role.to_lowercase(),
                    role_sentence(role),
                ),
                mood: lex.moods[(mood_offset + i) % lex.moods.len()].to_owned(),
                duration,
                palette: lex.swatches[(swatch_offset + i) % lex.swatches.len()]
                    .iter()
                    .map(|c| (*c).to_owned())
                    .collect(),
                motion,
                camera: format!("{}, {}", camera_phrase(motion), lex.lens),
                keywords,
            }
        })
        .collect::<Vec<_>>();

    let (tone_base, notes) = soundtrack_text(input.soundtrack);
    let lead_adjective = lex.adjectives[adjective_offset];
    let storyboard = Storyboard {
        synopsis: format!(
            "A {count}-beat {} sequence imagining {fragment}, unfolding over {} seconds of {} and {}.",
            input.style.label(),
            input.duration,
            lex.textures[0],
            lex.textures[lex.textures.len() - 1],
        ),
        tone: format!(
            "{tone_base}, framed by {lead_adjective} {} visuals",
            input.style.label().to_lowercase()
        ),
        soundtrack_notes: format!("{}: {notes}", input.soundtrack.label()),
        scenes,
    };

    tracing::debug!(
        scenes = storyboard.scenes.len(),
        tokens = tokens.len(),
        "storyboard synthesized"
    );
    Ok(storyboard)
}

/// Number of beats for a clip length: about one per five seconds, within `[2, 6]`.
pub fn scene_count(duration_secs: u32) -> usize {
    let beats = (f64::from(duration_secs) / SECONDS_PER_BEAT).round() as usize;
    beats.clamp(MIN_SCENES, MAX_SCENES)
}

/// Split `total` seconds across `count` scenes; leftover seconds go to the earliest scenes.
pub fn allocate_durations(total: u32, count: usize) -> Vec<u32> {
    let count = count.max(1);
    let n = count as u32;
    let base = total / n;
    let remainder = (total % n) as usize;
    (0..count)
        .map(|i| base + u32::from(i < remainder))
        .collect()
}

/// Lowercase content words of the prompt, first occurrence order, stop words removed.
pub fn tokenize(prompt: &str) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for raw in prompt.split(|c: char| !c.is_alphanumeric()) {
        let word = raw.to_lowercase();
        if word.chars().count() < 3 || STOP_WORDS.contains(&word.as_str()) {
            continue;
        }
        if !out.contains(&word) {
            out.push(word);
        }
    }
    out
}

fn prompt_hash(prompt: &str) -> u64 {
    xxhash_rust::xxh3::xxh3_64(prompt.trim().to_lowercase().as_bytes())
}

fn keyword_pool(tokens: &[String], lex: &StyleLexicon) -> Vec<String> {
    let mut pool = tokens.to_vec();
    for kw in lex.fallback_keywords {
        if pool.len() >= KEYWORDS_PER_SCENE {
            break;
        }
        if !pool.iter().any(|t| t == kw) {
            pool.push((*kw).to_owned());
        }
    }
    pool
}

// Pools always hold at least four distinct words, so a window of four never repeats.
fn keyword_window(pool: &[String], scene_index: usize) -> Vec<String> {
    let start = (scene_index * 2) % pool.len();
    (0..KEYWORDS_PER_SCENE)
        .map(|k| pool[(start + k) % pool.len()].clone())
        .collect()
}

fn prompt_fragment(prompt: &str) -> String {
    let words: Vec<&str> = prompt.split_whitespace().take(MAX_FRAGMENT_WORDS).collect();
    let joined = words.join(" ");
    let trimmed = joined.trim_end_matches(|c: char| c.is_ascii_punctuation());
    let mut chars = trimmed.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn title_case(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/storyboard/synth.rs"]
mod tests;
