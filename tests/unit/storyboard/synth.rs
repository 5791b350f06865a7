use super::*;
use crate::foundation::color::is_hex_color;
use crate::foundation::error::NovaError;
use crate::storyboard::input::{AspectRatio, SoundtrackMood, VisualStyle};

fn request(prompt: &str, duration: u32, style: VisualStyle) -> GeneratorInput {
    GeneratorInput {
        prompt: prompt.to_owned(),
        duration,
        style,
        soundtrack: SoundtrackMood::Pulse,
        aspect_ratio: AspectRatio::Landscape,
    }
}

#[test]
fn durations_sum_exactly_for_every_valid_length() {
    for style in VisualStyle::ALL {
        for duration in 6..=30 {
            let board =
                build_storyboard(&request("Macro shots of circuitry", duration, style)).unwrap();
            assert!(!board.scenes.is_empty());
            assert_eq!(board.total_duration(), duration);
            assert!(board.scenes.iter().all(|s| s.duration > 0));
            board.validate().unwrap();
        }
    }
}

#[test]
fn palettes_are_valid_hex_with_at_least_three_stops() {
    for style in VisualStyle::ALL {
        let board = build_storyboard(&request("Forest lake at dawn", 24, style)).unwrap();
        for scene in &board.scenes {
            assert!(scene.palette.len() >= 3);
            assert!(scene.palette.iter().all(|c| is_hex_color(c)));
        }
    }
}

#[test]
fn identical_input_gives_identical_structure() {
    let input = request("A tranquil forest lake at dawn", 19, VisualStyle::Dreamscape);
    let a = build_storyboard(&input).unwrap();
    let b = build_storyboard(&input).unwrap();
    assert_eq!(a, b);
}

#[test]
fn consecutive_scenes_never_share_motion() {
    for prompt in ["a", "rain", "Neon alley", "Circuitry blooming into crystal"] {
        let board = build_storyboard(&request(prompt, 30, VisualStyle::Analog)).unwrap();
        for pair in board.scenes.windows(2) {
            assert_ne!(pair[0].motion, pair[1].motion);
        }
    }
}

#[test]
fn neon_alley_scenario_has_two_or_three_neonwave_scenes() {
    let board =
        build_storyboard(&request("A neon alley in the rain", 12, VisualStyle::Neonwave)).unwrap();
    assert!((2..=3).contains(&board.scenes.len()));
    assert_eq!(board.total_duration(), 12);

    let neon = crate::storyboard::lexicon::style_lexicon(VisualStyle::Neonwave);
    for scene in &board.scenes {
        assert!(
            neon.swatches
                .iter()
                .any(|sw| sw.iter().copied().eq(scene.palette.iter().map(String::as_str)))
        );
    }
    assert!(board.scenes[0].keywords.contains(&"neon".to_owned()));
    assert!(board.scenes[0].summary.contains("a neon alley in the rain"));
    assert!(board.soundtrack_notes.starts_with("Pulse Engine:"));
}

#[test]
fn scene_ids_are_unique_and_ordered() {
    let board = build_storyboard(&request("x y z words", 30, VisualStyle::Cinematic)).unwrap();
    let ids: Vec<_> = board.scenes.iter().map(|s| s.id.as_str()).collect();
    assert_eq!(
        ids,
        ["scene-1", "scene-2", "scene-3", "scene-4", "scene-5", "scene-6"]
    );
}

#[test]
fn scene_count_is_about_one_per_five_seconds() {
    assert_eq!(scene_count(6), 2);
    assert_eq!(scene_count(12), 2);
    assert_eq!(scene_count(13), 3);
    assert_eq!(scene_count(20), 4);
    assert_eq!(scene_count(30), 6);
    assert_eq!(scene_count(1000), 6);
}

#[test]
fn remainder_seconds_go_to_leading_scenes() {
    assert_eq!(allocate_durations(12, 2), vec![6, 6]);
    assert_eq!(allocate_durations(13, 3), vec![5, 4, 4]);
    assert_eq!(allocate_durations(29, 6), vec![5, 5, 5, 5, 5, 4]);
}

#[test]
fn tokenize_drops_stop_words_and_duplicates() {
    assert_eq!(
        tokenize("A neon alley, in the RAIN; neon again!"),
        vec!["neon", "alley", "rain", "again"]
    );
    assert!(tokenize("a an of to").is_empty());
}

#[test]
fn short_prompts_fall_back_to_style_keywords() {
    let board = build_storyboard(&request("x", 12, VisualStyle::Documentary)).unwrap();
    for scene in &board.scenes {
        assert_eq!(scene.keywords.len(), 4);
        let mut unique = scene.keywords.clone();
        unique.dedup();
        assert_eq!(unique.len(), 4);
    }
}

#[test]
fn out_of_range_duration_is_clamped_by_default_and_rejected_on_request() {
    let board = build_storyboard(&request("rain", 45, VisualStyle::Neonwave)).unwrap();
    assert_eq!(board.total_duration(), 30);

    let err = build_storyboard_with(
        &request("rain", 45, VisualStyle::Neonwave),
        SynthOpts {
            duration_policy: DurationPolicy::Reject,
        },
    )
    .unwrap_err();
    assert!(matches!(err, NovaError::InvalidInput(_)));
}
