use crate::foundation::core::{Fps, FrameIndex};
use crate::foundation::error::{NovaError, NovaResult};
use crate::render::surface::FrameRGBA;
use std::sync::mpsc::{Receiver, Sender, TryRecvError};
use std::sync::{Arc, Mutex};

/// Preferred output type: webm with VP9.
pub const VP9_MIME: &str = "video/webm;codecs=vp9";
/// Fallback output type: webm with whatever codec the encoder picks.
pub const WEBM_MIME: &str = "video/webm";
/// Target video bitrate.
pub const DEFAULT_BITS_PER_SECOND: u32 = 6_000_000;

/// Configuration handed to [`EncoderBackend::open`].
#[derive(Debug, Clone, PartialEq)]
pub struct EncoderConfig {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// Capture rate.
    pub fps: Fps,
    /// Container/codec type, [`VP9_MIME`] or [`WEBM_MIME`].
    pub mime: String,
    /// Target bitrate.
    pub bits_per_second: u32,
}

/// One piece of encoded output, in delivery order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedChunk {
    /// 0-based delivery sequence number assigned by the sink.
    pub seq: u64,
    /// Encoded bytes.
    pub data: Vec<u8>,
}

/// Channel end a sink delivers chunks on.
pub type ChunkSender = Sender<EncodedChunk>;

/// The capture/encoding capability of the runtime.
pub trait EncoderBackend: Send {
    /// `false` when this runtime cannot encode at all.
    fn is_available(&self) -> bool;

    /// Whether `mime` (e.g. [`VP9_MIME`]) can be produced.
    fn is_type_supported(&self, mime: &str) -> bool;

    /// Start a sink. Chunks are delivered on `chunks`, possibly from another thread; the sink
    /// drops every clone of the sender once it has delivered its last chunk.
    fn open(&self, cfg: EncoderConfig, chunks: ChunkSender) -> NovaResult<Box<dyn EncodingSink>>;
}

/// A running encoder accepting frames in capture order.
pub trait EncodingSink: Send {
    /// Push one frame. Indices are strictly increasing.
    fn push_frame(&mut self, idx: FrameIndex, frame: &FrameRGBA) -> NovaResult<()>;

    /// Flush and finish. Calling it again is a no-op.
    fn stop(&mut self) -> NovaResult<()>;

    /// Tear down without flushing. Calling it again, or after `stop`, is a no-op.
    fn abort(&mut self) -> NovaResult<()> {
        self.stop()
    }
}

/// Pick [`VP9_MIME`] when supported, otherwise [`WEBM_MIME`].
pub fn preferred_mime(backend: &dyn EncoderBackend) -> &'static str {
    if backend.is_type_supported(VP9_MIME) {
        VP9_MIME
    } else {
        WEBM_MIME
    }
}

/// Ordered, append-only collection of chunks coming off a sink's channel.
#[derive(Debug)]
pub struct ChunkAccumulator {
    rx: Receiver<EncodedChunk>,
    chunks: Vec<EncodedChunk>,
}

impl ChunkAccumulator {
    /// Create a channel pair: the sender goes to the sink, the accumulator stays with the driver.
    pub fn channel() -> (ChunkSender, Self) {
        let (tx, rx) = std::sync::mpsc::channel();
        (
            tx,
            Self {
                rx,
                chunks: Vec::new(),
            },
        )
    }

    /// Append every chunk that is already waiting. Returns how many were taken.
    pub fn drain_ready(&mut self) -> NovaResult<usize> {
        let mut n = 0;
        loop {
            match self.rx.try_recv() {
                Ok(chunk) => {
                    self.append(chunk)?;
                    n += 1;
                }
                Err(TryRecvError::Empty | TryRecvError::Disconnected) => return Ok(n),
            }
        }
    }

    /// Block until the sink has dropped its sender, then concatenate everything.
    pub fn finish(mut self) -> NovaResult<Vec<u8>> {
        while let Ok(chunk) = self.rx.recv() {
            self.append(chunk)?;
        }
        let len = self.chunks.iter().map(|c| c.data.len()).sum();
        let mut out = Vec::with_capacity(len);
        for chunk in &self.chunks {
            out.extend_from_slice(&chunk.data);
        }
        Ok(out)
    }

    /// Chunks received so far.
    pub fn chunks(&self) -> &[EncodedChunk] {
        &self.chunks
    }

    fn append(&mut self, chunk: EncodedChunk) -> NovaResult<()> {
        let expected = self.chunks.len() as u64;
        if chunk.seq != expected {
            return Err(NovaError::evaluation(format!(
                "encoded chunk out of order: got #{}, expected #{expected}",
                chunk.seq
            )));
        }
        self.chunks.push(chunk);
        Ok(())
    }
}

/// Counters shared between a [`MemoryEncoder`] and the sinks it opened.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct MemoryEncoderStats {
    /// Sinks opened.
    pub opened: u64,
    /// Sinks finished through `stop`.
    pub stopped: u64,
    /// Sinks torn down through `abort`.
    pub aborted: u64,
    /// Frames pushed across all sinks.
    pub frames: u64,
    /// Mime type of the last opened sink.
    pub last_mime: Option<String>,
}

/// In-process encoder for tests and dry runs.
///
/// Each chunk packs the frame indices it covers and a checksum of each frame; it is not a real
/// video stream.
#[derive(Debug, Clone)]
pub struct MemoryEncoder {
    available: bool,
    vp9: bool,
    fail_open: Option<String>,
    frames_per_chunk: u64,
    stats: Arc<Mutex<MemoryEncoderStats>>,
}

impl Default for MemoryEncoder {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryEncoder {
    /// Available, VP9-capable encoder emitting a chunk every 30 frames.
    pub fn new() -> Self {
        Self {
            available: true,
            vp9: true,
            fail_open: None,
            frames_per_chunk: 30,
            stats: Arc::new(Mutex::new(MemoryEncoderStats::default())),
        }
    }

    /// Report the capability as missing.
    pub fn unavailable(mut self) -> Self {
        self.available = false;
        self
    }

    /// Report VP9 as unsupported.
    pub fn without_vp9(mut self) -> Self {
        self.vp9 = false;
        self
    }

    /// Make `open` fail with `msg`.
    pub fn failing_open(mut self, msg: impl Into<String>) -> Self {
        self.fail_open = Some(msg.into());
        self
    }

    /// Emit a chunk every `n` frames (minimum 1).
    pub fn with_frames_per_chunk(mut self, n: u64) -> Self {
        self.frames_per_chunk = n.max(1);
        self
    }

    /// Snapshot of the shared counters.
    pub fn stats(&self) -> MemoryEncoderStats {
        lock(&self.stats).clone()
    }
}

impl EncoderBackend for MemoryEncoder {
    fn is_available(&self) -> bool {
        self.available
    }

    fn is_type_supported(&self, mime: &str) -> bool {
        match mime {
            VP9_MIME => self.vp9,
            WEBM_MIME => true,
            _ => false,
        }
    }

    fn open(&self, cfg: EncoderConfig, chunks: ChunkSender) -> NovaResult<Box<dyn EncodingSink>> {
        if let Some(msg) = &self.fail_open {
            return Err(NovaError::encoder_init(msg.clone()));
        }
        {
            let mut stats = lock(&self.stats);
            stats.opened += 1;
            stats.last_mime = Some(cfg.mime.clone());
        }
        Ok(Box::new(MemorySink {
            cfg,
            tx: Some(chunks),
            pending: Vec::new(),
            pending_frames: 0,
            frames_per_chunk: self.frames_per_chunk,
            next_seq: 0,
            last_idx: None,
            stats: Arc::clone(&self.stats),
        }))
    }
}

struct MemorySink {
    cfg: EncoderConfig,
    tx: Option<ChunkSender>,
    pending: Vec<u8>,
    pending_frames: u64,
    frames_per_chunk: u64,
    next_seq: u64,
    last_idx: Option<FrameIndex>,
    stats: Arc<Mutex<MemoryEncoderStats>>,
}

impl MemorySink {
    fn emit(&mut self) {
        if self.pending.is_empty() {
            return;
        }
        let data = std::mem::take(&mut self.pending);
        self.pending_frames = 0;
        if let Some(tx) = &self.tx {
            // The receiver may already be gone after a cancelled session.
            let _ = tx.send(EncodedChunk {
                seq: self.next_seq,
                data,
            });
            self.next_seq += 1;
        }
    }
}

impl EncodingSink for MemorySink {
    fn push_frame(&mut self, idx: FrameIndex, frame: &FrameRGBA) -> NovaResult<()> {
        if self.tx.is_none() {
            return Err(NovaError::evaluation("memory sink is already stopped"));
        }
        if let Some(last) = self.last_idx
            && idx.0 <= last.0
        {
            return Err(NovaError::evaluation(
                "memory sink received out-of-order frame index",
            ));
        }
        if frame.width != self.cfg.width || frame.height != self.cfg.height {
            return Err(NovaError::validation(format!(
                "frame size mismatch: got {}x{}, expected {}x{}",
                frame.width, frame.height, self.cfg.width, self.cfg.height
            )));
        }
        self.last_idx = Some(idx);

        self.pending.extend_from_slice(&idx.0.to_le_bytes());
        self.pending
            .extend_from_slice(&xxhash_rust::xxh3::xxh3_64(&frame.data).to_le_bytes());
        self.pending_frames += 1;
        lock(&self.stats).frames += 1;

        if self.pending_frames >= self.frames_per_chunk {
            self.emit();
        }
        Ok(())
    }

    fn stop(&mut self) -> NovaResult<()> {
        if self.tx.is_none() {
            return Ok(());
        }
        self.emit();
        self.tx = None;
        lock(&self.stats).stopped += 1;
        Ok(())
    }

    fn abort(&mut self) -> NovaResult<()> {
        if self.tx.take().is_some() {
            self.pending.clear();
            lock(&self.stats).aborted += 1;
        }
        Ok(())
    }
}

fn lock<T>(m: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    m.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[cfg(test)]
#[path = "../../tests/unit/encode/sink.rs"]
mod tests;
