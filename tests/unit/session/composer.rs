use super::*;
use crate::encode::sink::{MemoryEncoder, VP9_MIME, WEBM_MIME};
use crate::session::clock::ManualClock;
use crate::storyboard::input::{GeneratorInput, SoundtrackMood, VisualStyle};
use crate::storyboard::synth::build_storyboard;

fn small_opts() -> ComposerOpts {
    ComposerOpts {
        canvas: Some(Canvas {
            width: 32,
            height: 18,
        }),
        rasterizer: SceneRasterizerOpts {
            font_path: None,
            draw_text: false,
        },
        ..ComposerOpts::default()
    }
}

fn board(duration: u32) -> Storyboard {
    build_storyboard(&GeneratorInput {
        prompt: "A neon-drenched cyberpunk alley".to_owned(),
        duration,
        style: VisualStyle::Neonwave,
        soundtrack: SoundtrackMood::Pulse,
        aspect_ratio: AspectRatio::Landscape,
    })
    .unwrap()
}

fn composer(enc: &MemoryEncoder, clock: &ManualClock) -> Composer {
    let mut c = Composer::new(
        Box::new(enc.clone()),
        Box::new(clock.clone()),
        small_opts(),
    )
    .unwrap();
    c.set_storyboard(board(12), AspectRatio::Landscape).unwrap();
    c
}

#[test]
fn full_render_reaches_the_end_and_registers_one_artifact() {
    let enc = MemoryEncoder::new();
    let clock = ManualClock::per_frame(30);
    let mut c = composer(&enc, &clock);

    c.start_rendering().unwrap();
    assert!(c.state().is_rendering);

    let mut last_progress = 0.0;
    let mut seen_scenes = Vec::new();
    loop {
        let outcome = c.tick().unwrap();
        let state = c.state();
        assert!(state.progress >= last_progress);
        last_progress = state.progress;
        if let Some(scene) = &state.active_scene
            && seen_scenes.last() != Some(&scene.id)
        {
            seen_scenes.push(scene.id.clone());
        }
        if outcome == TickOutcome::Finished {
            break;
        }
        clock.advance(Duration::from_secs(1) / 30);
    }

    let state = c.state();
    assert_eq!(state.progress, 1.0);
    assert!(state.active_scene.is_none());
    assert!(!state.is_rendering);
    assert!(state.error.is_none());
    let handle = state.artifact.clone().unwrap();
    assert_eq!(handle.mime, VP9_MIME);

    let expected: Vec<String> = c
        .storyboard()
        .unwrap()
        .scenes
        .iter()
        .map(|s| s.id.clone())
        .collect();
    assert_eq!(seen_scenes, expected);

    let artifact = c.artifacts().get(&handle).unwrap();
    assert_eq!(artifact.frames, 360);
    assert_eq!(artifact.duration_secs, 12.0);
    assert_eq!(artifact.bytes.len(), 360 * 16);
    assert_eq!(c.artifacts().live_count(), 1);

    let stats = enc.stats();
    assert_eq!((stats.opened, stats.stopped, stats.aborted), (1, 1, 0));
    assert_eq!(c.tick().unwrap(), TickOutcome::Idle);
}

#[test]
fn slow_ticks_still_capture_every_frame_index() {
    let enc = MemoryEncoder::new();
    let clock = ManualClock::new(Duration::from_millis(700));
    let mut c = composer(&enc, &clock);
    c.start_rendering().unwrap();
    let handle = c.run_to_completion().unwrap().unwrap();
    assert_eq!(c.artifacts().get(&handle).unwrap().frames, 360);
    assert_eq!(enc.stats().frames, 360);
}

#[test]
fn missing_encoder_capability_reports_and_never_starts() {
    let enc = MemoryEncoder::new().unavailable();
    let clock = ManualClock::per_frame(30);
    let mut c = composer(&enc, &clock);

    let err = c.start_rendering().unwrap_err();
    assert!(matches!(err, NovaError::UnsupportedEnvironment(_)));
    assert!(!c.state().is_rendering);
    assert!(c.state().error.as_deref().unwrap().contains("unsupported environment"));
    assert_eq!(c.tick().unwrap(), TickOutcome::Idle);
    assert_eq!(enc.stats().opened, 0);
}

#[test]
fn encoder_setup_failure_message_is_kept_verbatim() {
    let enc = MemoryEncoder::new().failing_open("libvpx refused the stream");
    let clock = ManualClock::per_frame(30);
    let mut c = composer(&enc, &clock);

    let err = c.start_rendering().unwrap_err();
    assert!(matches!(&err, NovaError::EncoderInit(m) if m == "libvpx refused the stream"));
    assert!(
        c.state()
            .error
            .as_deref()
            .unwrap()
            .contains("libvpx refused the stream")
    );
    assert!(!c.state().is_rendering);
}

#[test]
fn unusable_canvas_reports_surface_unavailable() {
    let enc = MemoryEncoder::new();
    let clock = ManualClock::per_frame(30);
    let mut c = Composer::new(
        Box::new(enc.clone()),
        Box::new(clock),
        ComposerOpts {
            canvas: Some(Canvas {
                width: 0,
                height: 18,
            }),
            ..small_opts()
        },
    )
    .unwrap();
    c.set_storyboard(board(12), AspectRatio::Landscape).unwrap();

    assert!(matches!(
        c.start_rendering(),
        Err(NovaError::SurfaceUnavailable(_))
    ));
    assert_eq!(enc.stats().opened, 0);
}

#[test]
fn starting_without_a_storyboard_is_invalid_input() {
    let mut c = Composer::new(
        Box::new(MemoryEncoder::new()),
        Box::new(ManualClock::per_frame(30)),
        small_opts(),
    )
    .unwrap();
    assert!(matches!(
        c.start_rendering(),
        Err(NovaError::InvalidInput(_))
    ));
}

#[test]
fn webm_fallback_when_vp9_is_unsupported() {
    let enc = MemoryEncoder::new().without_vp9();
    let clock = ManualClock::per_frame(30);
    let mut c = composer(&enc, &clock);
    c.start_rendering().unwrap();
    let handle = c.run_to_completion().unwrap().unwrap();
    assert_eq!(handle.mime, WEBM_MIME);
    assert_eq!(enc.stats().last_mime.as_deref(), Some(WEBM_MIME));
}

#[test]
fn restart_cancels_in_flight_session_and_revokes_previous_artifact() {
    let enc = MemoryEncoder::new();
    let clock = ManualClock::per_frame(30);
    let mut c = composer(&enc, &clock);

    c.start_rendering().unwrap();
    let first = c.run_to_completion().unwrap().unwrap();

    c.start_rendering().unwrap();
    assert!(c.state().artifact.is_none());
    assert!(c.artifacts().get(&first).is_none());
    for _ in 0..10 {
        c.tick().unwrap();
        clock.advance(Duration::from_secs(1) / 30);
    }
    assert!(c.state().progress > 0.0);

    c.start_rendering().unwrap();
    assert_eq!(c.state().progress, 0.0);
    let last = c.run_to_completion().unwrap().unwrap();

    assert_ne!(first, last);
    assert_eq!(c.artifacts().live_count(), 1);
    let stats = enc.stats();
    assert_eq!(stats.opened, 3);
    assert_eq!(stats.stopped, 2);
    assert_eq!(stats.aborted, 1);
}

#[test]
fn new_storyboard_resets_state() {
    let enc = MemoryEncoder::new();
    let clock = ManualClock::per_frame(30);
    let mut c = composer(&enc, &clock);
    c.start_rendering().unwrap();
    c.run_to_completion().unwrap();

    c.set_storyboard(board(8), AspectRatio::Square).unwrap();
    assert_eq!(c.state(), &ComposerState::default());
    assert_eq!(c.artifacts().live_count(), 0);
    assert_eq!(c.aspect_ratio(), AspectRatio::Square);
}

#[test]
fn new_storyboard_drops_cached_backdrops() {
    let enc = MemoryEncoder::new();
    let clock = ManualClock::per_frame(30);
    let mut c = composer(&enc, &clock);
    c.start_rendering().unwrap();
    c.run_to_completion().unwrap();
    assert!(c.rasterizer.cached_gradients() > 0);

    c.set_storyboard(board(8), AspectRatio::Landscape).unwrap();
    assert_eq!(c.rasterizer.cached_gradients(), 0);
}

#[test]
fn zero_fps_is_rejected_up_front() {
    for fps in [Fps { num: 0, den: 1 }, Fps { num: 30, den: 0 }] {
        let err = Composer::new(
            Box::new(MemoryEncoder::new()),
            Box::new(ManualClock::per_frame(30)),
            ComposerOpts {
                fps,
                ..small_opts()
            },
        )
        .err()
        .unwrap();
        assert!(matches!(err, NovaError::Validation(_)));
    }
}

#[test]
fn teardown_is_idempotent_and_drop_releases_everything() {
    let enc = MemoryEncoder::new();
    let clock = ManualClock::per_frame(30);
    let store = ArtifactStore::new();
    {
        let mut c = composer(&enc, &clock).with_artifact_store(store.clone());
        c.start_rendering().unwrap();
        c.run_to_completion().unwrap();
        assert_eq!(store.live_count(), 1);

        c.start_rendering().unwrap();
        c.tick().unwrap();
        c.teardown();
        c.teardown();
        assert!(!c.state().is_rendering);
        assert_eq!(enc.stats().aborted, 1);

        c.start_rendering().unwrap();
        c.run_to_completion().unwrap();
        assert_eq!(store.live_count(), 1);
    }
    assert_eq!(store.live_count(), 0);
}

#[test]
fn canvas_follows_aspect_ratio_without_override() {
    let mut c = Composer::new(
        Box::new(MemoryEncoder::new()),
        Box::new(ManualClock::per_frame(30)),
        ComposerOpts {
            rasterizer: SceneRasterizerOpts {
                font_path: None,
                draw_text: false,
            },
            ..ComposerOpts::default()
        },
    )
    .unwrap();
    c.set_storyboard(board(12), AspectRatio::Portrait).unwrap();
    assert_eq!(
        c.canvas(),
        Canvas {
            width: 720,
            height: 1280
        }
    );
}
