use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        NovaError::invalid_input("x")
            .to_string()
            .contains("invalid input:")
    );
    assert!(
        NovaError::unsupported("x")
            .to_string()
            .contains("unsupported environment:")
    );
    assert!(
        NovaError::surface("x")
            .to_string()
            .contains("surface unavailable:")
    );
    assert!(
        NovaError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(
        NovaError::evaluation("x")
            .to_string()
            .contains("evaluation error:")
    );
}

#[test]
fn encoder_init_keeps_message_verbatim() {
    let err = NovaError::encoder_init("codec exploded: libvpx missing");
    assert_eq!(
        err.to_string(),
        "unable to initialise encoder: codec exploded: libvpx missing"
    );
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = NovaError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}
