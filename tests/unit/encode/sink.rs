use super::*;

fn cfg(mime: &str) -> EncoderConfig {
    EncoderConfig {
        width: 4,
        height: 2,
        fps: Fps::new(30, 1).unwrap(),
        mime: mime.to_owned(),
        bits_per_second: DEFAULT_BITS_PER_SECOND,
    }
}

fn frame(fill: u8) -> FrameRGBA {
    FrameRGBA {
        width: 4,
        height: 2,
        data: vec![fill; 4 * 2 * 4],
        premultiplied: true,
    }
}

#[test]
fn preferred_mime_falls_back_to_plain_webm() {
    assert_eq!(preferred_mime(&MemoryEncoder::new()), VP9_MIME);
    assert_eq!(preferred_mime(&MemoryEncoder::new().without_vp9()), WEBM_MIME);
}

#[test]
fn memory_sink_emits_chunks_in_order_and_flushes_on_stop() {
    let enc = MemoryEncoder::new().with_frames_per_chunk(2);
    let (tx, mut acc) = ChunkAccumulator::channel();
    let mut sink = enc.open(cfg(VP9_MIME), tx).unwrap();

    for i in 0..5 {
        sink.push_frame(FrameIndex(i), &frame(i as u8)).unwrap();
    }
    assert_eq!(acc.drain_ready().unwrap(), 2);

    sink.stop().unwrap();
    sink.stop().unwrap();
    let bytes = acc.finish().unwrap();
    // 5 frames x (index + checksum).
    assert_eq!(bytes.len(), 5 * 16);
    assert_eq!(&bytes[..8], &0u64.to_le_bytes());

    let stats = enc.stats();
    assert_eq!(stats.opened, 1);
    assert_eq!(stats.stopped, 1);
    assert_eq!(stats.frames, 5);
    assert_eq!(stats.last_mime.as_deref(), Some(VP9_MIME));
}

#[test]
fn memory_sink_rejects_out_of_order_and_mismatched_frames() {
    let enc = MemoryEncoder::new();
    let (tx, _acc) = ChunkAccumulator::channel();
    let mut sink = enc.open(cfg(WEBM_MIME), tx).unwrap();

    sink.push_frame(FrameIndex(3), &frame(0)).unwrap();
    assert!(sink.push_frame(FrameIndex(3), &frame(0)).is_err());

    let wrong = FrameRGBA {
        width: 2,
        height: 2,
        data: vec![0; 16],
        premultiplied: true,
    };
    assert!(sink.push_frame(FrameIndex(4), &wrong).is_err());
}

#[test]
fn abort_discards_pending_output_and_is_idempotent() {
    let enc = MemoryEncoder::new();
    let (tx, acc) = ChunkAccumulator::channel();
    let mut sink = enc.open(cfg(VP9_MIME), tx).unwrap();
    sink.push_frame(FrameIndex(0), &frame(1)).unwrap();

    sink.abort().unwrap();
    sink.abort().unwrap();
    sink.stop().unwrap();
    assert!(acc.finish().unwrap().is_empty());

    let stats = enc.stats();
    assert_eq!(stats.aborted, 1);
    assert_eq!(stats.stopped, 0);
    assert!(sink.push_frame(FrameIndex(1), &frame(1)).is_err());
}

#[test]
fn failing_open_reports_message_verbatim() {
    let enc = MemoryEncoder::new().failing_open("codec busy");
    let (tx, _acc) = ChunkAccumulator::channel();
    let err = enc.open(cfg(VP9_MIME), tx).err().unwrap();
    assert!(matches!(&err, NovaError::EncoderInit(m) if m == "codec busy"));
}

#[test]
fn accumulator_rejects_gaps_in_sequence() {
    let (tx, mut acc) = ChunkAccumulator::channel();
    tx.send(EncodedChunk {
        seq: 0,
        data: vec![1],
    })
    .unwrap();
    tx.send(EncodedChunk {
        seq: 2,
        data: vec![2],
    })
    .unwrap();
    assert!(acc.drain_ready().is_err());
    assert_eq!(acc.chunks().len(), 1);
}
