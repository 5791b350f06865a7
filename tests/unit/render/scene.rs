use super::*;
use crate::storyboard::model::Motion;

const SMALL: Canvas = Canvas {
    width: 96,
    height: 54,
};

fn scene(id: &str, motion: Motion) -> SceneDescriptor {
    SceneDescriptor {
        id: id.to_owned(),
        label: "Opening: Neon Alley".to_owned(),
        summary: "The opening establishes a neon alley in the rain.".to_owned(),
        mood: "charged".to_owned(),
        duration: 6,
        palette: vec![
            "#0f172a".into(),
            "#7c3aed".into(),
            "#ec4899".into(),
            "#22d3ee".into(),
        ],
        motion,
        camera: "slow lateral tracking pan".to_owned(),
        keywords: vec!["neon".into(), "alley".into(), "rain".into()],
    }
}

#[test]
fn same_inputs_give_identical_pixels() {
    let s = scene("scene-1", Motion::Orbit);
    let a = SceneRasterizer::without_text()
        .render_frame(&s, 0.4, SMALL)
        .unwrap();
    let b = SceneRasterizer::without_text()
        .render_frame(&s, 0.4, SMALL)
        .unwrap();
    assert_eq!(a.data, b.data);
    assert_eq!(a.data.len(), SMALL.rgba8_len());
}

#[test]
fn time_and_seed_change_the_frame() {
    let mut r = SceneRasterizer::without_text();
    let a = r.render_frame(&scene("scene-1", Motion::Pan), 0.1, SMALL).unwrap();
    let b = r.render_frame(&scene("scene-1", Motion::Pan), 0.6, SMALL).unwrap();
    let c = r.render_frame(&scene("scene-2", Motion::Pan), 0.1, SMALL).unwrap();
    assert_ne!(a.data, b.data);
    assert_ne!(a.data, c.data);
}

#[test]
fn backdrop_is_opaque_everywhere() {
    let frame = SceneRasterizer::without_text()
        .render_frame(&scene("scene-3", Motion::Zoom), 0.5, SMALL)
        .unwrap();
    assert!(frame.data.chunks_exact(4).all(|px| px[3] == 255));
}

#[test]
fn invalid_palette_color_is_reported() {
    let mut s = scene("scene-1", Motion::Pulse);
    s.palette[2] = "magenta".into();
    let err = SceneRasterizer::without_text()
        .render_frame(&s, 0.0, SMALL)
        .unwrap_err();
    assert!(err.to_string().contains("magenta"));
}

#[test]
fn text_can_be_disabled_by_options() {
    let r = SceneRasterizer::new(&SceneRasterizerOpts {
        font_path: None,
        draw_text: false,
    })
    .unwrap();
    assert!(!r.has_text());
}

#[test]
fn gradient_cache_stays_bounded_across_many_sizes() {
    let mut r = SceneRasterizer::without_text();
    let s = scene("scene-1", Motion::Pulse);
    let first = r.render_frame(&s, 0.3, SMALL).unwrap();
    r.render_frame(&s, 0.7, SMALL).unwrap();
    assert_eq!(r.cached_gradients(), 1);

    for i in 0..3 * GRADIENT_CACHE_CAPACITY as u32 {
        let canvas = Canvas {
            width: 8 + i,
            height: 6,
        };
        r.render_frame(&s, 0.3, canvas).unwrap();
        assert!(r.cached_gradients() <= GRADIENT_CACHE_CAPACITY);
    }

    // An evicted backdrop is rebuilt identically.
    assert_eq!(r.render_frame(&s, 0.3, SMALL).unwrap().data, first.data);

    r.clear_cache();
    assert_eq!(r.cached_gradients(), 0);
}
