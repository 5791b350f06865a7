use super::*;

#[test]
fn mime_types_map_to_vpx_codecs() {
    assert_eq!(codec_for_mime(VP9_MIME), Some("libvpx-vp9"));
    assert_eq!(codec_for_mime(WEBM_MIME), Some("libvpx"));
    assert_eq!(codec_for_mime("video/mp4"), None);
}

#[test]
fn missing_program_is_unavailable_and_fails_to_open() {
    let enc = FfmpegWebmEncoder::new(FfmpegEncoderOpts {
        program: PathBuf::from("/nonexistent/novaforge-ffmpeg"),
        bg_rgba: [0, 0, 0, 255],
    });
    assert!(!enc.is_available());
    assert!(!enc.is_type_supported(VP9_MIME));

    let (tx, _rx) = std::sync::mpsc::channel();
    let err = enc
        .open(
            EncoderConfig {
                width: 16,
                height: 16,
                fps: Fps::new(30, 1).unwrap(),
                mime: VP9_MIME.to_owned(),
                bits_per_second: 6_000_000,
            },
            tx,
        )
        .err()
        .unwrap();
    assert!(matches!(err, NovaError::EncoderInit(_)));
}

#[test]
fn ensure_parent_dir_accepts_bare_file_names() {
    ensure_parent_dir(Path::new("out.webm")).unwrap();
}
