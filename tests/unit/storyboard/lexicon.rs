use super::*;
use crate::foundation::color::is_hex_color;

#[test]
fn every_swatch_is_three_to_five_hex_colors() {
    for style in VisualStyle::ALL {
        let lex = style_lexicon(style);
        assert!(!lex.swatches.is_empty());
        for swatch in lex.swatches {
            assert!((3..=5).contains(&swatch.len()), "{style:?}");
            assert!(swatch.iter().all(|c| is_hex_color(c)), "{style:?}");
        }
        assert!(!lex.moods.is_empty());
        assert!(lex.fallback_keywords.len() >= 4);
    }
}

#[test]
fn beat_roles_cover_every_count() {
    for n in 2..=6 {
        assert_eq!(beat_roles(n).len(), n);
    }
}
