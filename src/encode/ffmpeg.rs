use crate::encode::sink::{
    ChunkSender, EncodedChunk, EncoderBackend, EncoderConfig, EncodingSink, VP9_MIME, WEBM_MIME,
};
use crate::foundation::core::{Fps, FrameIndex};
use crate::foundation::error::{NovaError, NovaResult};
use crate::foundation::math::flatten_premul_over_bg_to_opaque_rgba8;
use crate::render::surface::FrameRGBA;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Child, ChildStdin, Command, Stdio};
use std::sync::OnceLock;
use std::thread::JoinHandle;

/// Environment variable overriding the `ffmpeg` executable.
pub const FFMPEG_ENV: &str = "NOVAFORGE_FFMPEG";

const READ_CHUNK_BYTES: usize = 64 * 1024;

/// Options for [`FfmpegWebmEncoder`].
#[derive(Clone, Debug)]
pub struct FfmpegEncoderOpts {
    /// Executable to spawn.
    pub program: PathBuf,
    /// Background color used to flatten alpha (RGBA8, straight alpha).
    pub bg_rgba: [u8; 4],
}

impl Default for FfmpegEncoderOpts {
    fn default() -> Self {
        let program = std::env::var_os(FFMPEG_ENV)
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("ffmpeg"));
        Self {
            program,
            bg_rgba: [0, 0, 0, 255],
        }
    }
}

/// Webm encoder backed by the system `ffmpeg`.
///
/// Raw frames go to stdin; the webm stream is read back from stdout and delivered as chunks.
#[derive(Debug)]
pub struct FfmpegWebmEncoder {
    opts: FfmpegEncoderOpts,
    encoders: OnceLock<Option<String>>,
}

impl Default for FfmpegWebmEncoder {
    fn default() -> Self {
        Self::new(FfmpegEncoderOpts::default())
    }
}

impl FfmpegWebmEncoder {
    /// Create an encoder with explicit options.
    pub fn new(opts: FfmpegEncoderOpts) -> Self {
        Self {
            opts,
            encoders: OnceLock::new(),
        }
    }

    /// Executable this encoder spawns.
    pub fn program(&self) -> &Path {
        &self.opts.program
    }

    // Output of `ffmpeg -encoders`, probed once. `None` when ffmpeg cannot run.
    fn encoder_list(&self) -> Option<&str> {
        self.encoders
            .get_or_init(|| {
                let out = Command::new(&self.opts.program)
                    .args(["-hide_banner", "-encoders"])
                    .stdin(Stdio::null())
                    .stderr(Stdio::null())
                    .output()
                    .ok()?;
                out.status
                    .success()
                    .then(|| String::from_utf8_lossy(&out.stdout).into_owned())
            })
            .as_deref()
    }

    fn has_encoder(&self, name: &str) -> bool {
        self.encoder_list()
            .is_some_and(|list| list.split_whitespace().any(|tok| tok == name))
    }
}

/// ffmpeg codec name for a supported mime type.
pub fn codec_for_mime(mime: &str) -> Option<&'static str> {
    match mime {
        VP9_MIME => Some("libvpx-vp9"),
        WEBM_MIME => Some("libvpx"),
        _ => None,
    }
}

impl EncoderBackend for FfmpegWebmEncoder {
    fn is_available(&self) -> bool {
        is_program_runnable(&self.opts.program)
    }

    fn is_type_supported(&self, mime: &str) -> bool {
        codec_for_mime(mime).is_some_and(|codec| self.has_encoder(codec))
    }

    #[tracing::instrument(skip(self, chunks), fields(program = %self.opts.program.display()))]
    fn open(&self, cfg: EncoderConfig, chunks: ChunkSender) -> NovaResult<Box<dyn EncodingSink>> {
        if cfg.fps.num == 0 || cfg.fps.den == 0 {
            return Err(NovaError::validation("fps must be non-zero"));
        }
        if cfg.width == 0 || cfg.height == 0 {
            return Err(NovaError::validation(
                "encoder width/height must be non-zero",
            ));
        }
        let codec = codec_for_mime(&cfg.mime).ok_or_else(|| {
            NovaError::encoder_init(format!("unsupported output type '{}'", cfg.mime))
        })?;

        let mut cmd = Command::new(&self.opts.program);
        cmd.stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        // Input is flattened straight RGBA8; see `push_frame`.
        cmd.args([
            "-hide_banner",
            "-loglevel",
            "error",
            "-f",
            "rawvideo",
            "-pix_fmt",
            "rgba",
            "-s",
            &format!("{}x{}", cfg.width, cfg.height),
        ]);
        push_input_fps(&mut cmd, cfg.fps);
        cmd.args(["-i", "pipe:0", "-an", "-c:v", codec])
            .args(["-b:v", &cfg.bits_per_second.to_string()])
            .args(["-pix_fmt", "yuv420p", "-deadline", "realtime"])
            .args(["-f", "webm", "pipe:1"]);

        let mut child = cmd.spawn().map_err(|e| {
            NovaError::encoder_init(format!(
                "failed to spawn '{}': {e}",
                self.opts.program.display()
            ))
        })?;

        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| NovaError::encoder_init("failed to open ffmpeg stdin"))?;
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| NovaError::encoder_init("failed to open ffmpeg stdout"))?;
        let mut stderr = child
            .stderr
            .take()
            .ok_or_else(|| NovaError::encoder_init("failed to open ffmpeg stderr"))?;

        let stderr_drain = std::thread::spawn(move || {
            let mut stderr_bytes = Vec::new();
            stderr.read_to_end(&mut stderr_bytes)?;
            Ok(stderr_bytes)
        });
        let stdout_reader = std::thread::spawn(move || forward_chunks(stdout, chunks));

        tracing::debug!(codec, width = cfg.width, height = cfg.height, "ffmpeg encoder started");
        Ok(Box::new(FfmpegWebmSink {
            scratch: vec![0u8; (cfg.width as usize) * (cfg.height as usize) * 4],
            cfg,
            bg_rgba: self.opts.bg_rgba,
            child: Some(child),
            stdin: Some(stdin),
            stdout_reader: Some(stdout_reader),
            stderr_drain: Some(stderr_drain),
            last_idx: None,
        }))
    }
}

fn forward_chunks(mut stdout: impl Read, chunks: ChunkSender) -> std::io::Result<u64> {
    let mut seq = 0u64;
    let mut buf = vec![0u8; READ_CHUNK_BYTES];
    loop {
        let n = stdout.read(&mut buf)?;
        if n == 0 {
            return Ok(seq);
        }
        let chunk = EncodedChunk {
            seq,
            data: buf[..n].to_vec(),
        };
        if chunks.send(chunk).is_err() {
            // Receiver dropped: the session was cancelled. Keep draining so ffmpeg can exit.
            std::io::copy(&mut stdout, &mut std::io::sink())?;
            return Ok(seq);
        }
        seq += 1;
    }
}

struct FfmpegWebmSink {
    cfg: EncoderConfig,
    bg_rgba: [u8; 4],
    child: Option<Child>,
    stdin: Option<ChildStdin>,
    stdout_reader: Option<JoinHandle<std::io::Result<u64>>>,
    stderr_drain: Option<JoinHandle<std::io::Result<Vec<u8>>>>,
    scratch: Vec<u8>,
    last_idx: Option<FrameIndex>,
}

impl FfmpegWebmSink {
    fn join_threads(&mut self) -> NovaResult<Vec<u8>> {
        if let Some(handle) = self.stdout_reader.take() {
            handle
                .join()
                .map_err(|_| NovaError::evaluation("ffmpeg stdout reader thread panicked"))?
                .map_err(|e| NovaError::evaluation(format!("ffmpeg stdout read failed: {e}")))?;
        }
        match self.stderr_drain.take() {
            Some(handle) => Ok(handle
                .join()
                .map_err(|_| NovaError::evaluation("ffmpeg stderr drain thread panicked"))?
                .map_err(|e| NovaError::evaluation(format!("ffmpeg stderr read failed: {e}")))?),
            None => Ok(Vec::new()),
        }
    }
}

impl EncodingSink for FfmpegWebmSink {
    fn push_frame(&mut self, idx: FrameIndex, frame: &FrameRGBA) -> NovaResult<()> {
        if let Some(last) = self.last_idx
            && idx.0 <= last.0
        {
            return Err(NovaError::evaluation(
                "ffmpeg encoder received out-of-order frame index",
            ));
        }
        self.last_idx = Some(idx);

        if frame.width != self.cfg.width || frame.height != self.cfg.height {
            return Err(NovaError::validation(format!(
                "frame size mismatch: got {}x{}, expected {}x{}",
                frame.width, frame.height, self.cfg.width, self.cfg.height
            )));
        }
        if frame.data.len() != self.scratch.len() {
            return Err(NovaError::validation(
                "frame.data size mismatch with width*height*4",
            ));
        }

        if frame.premultiplied {
            flatten_premul_over_bg_to_opaque_rgba8(&mut self.scratch, &frame.data, self.bg_rgba)?;
        } else {
            self.scratch.copy_from_slice(&frame.data);
        }

        let Some(stdin) = self.stdin.as_mut() else {
            return Err(NovaError::evaluation("ffmpeg encoder is already stopped"));
        };

        use std::io::Write as _;
        stdin.write_all(&self.scratch).map_err(|e| {
            NovaError::evaluation(format!("failed to write frame to ffmpeg stdin: {e}"))
        })?;
        Ok(())
    }

    fn stop(&mut self) -> NovaResult<()> {
        drop(self.stdin.take());
        let Some(mut child) = self.child.take() else {
            return Ok(());
        };

        let status = child.wait().map_err(|e| {
            NovaError::evaluation(format!("failed to wait for ffmpeg to finish: {e}"))
        })?;
        let stderr_bytes = self.join_threads()?;

        if !status.success() {
            let stderr = String::from_utf8_lossy(&stderr_bytes);
            return Err(NovaError::evaluation(format!(
                "ffmpeg exited with status {}: {}",
                status,
                stderr.trim()
            )));
        }
        Ok(())
    }

    fn abort(&mut self) -> NovaResult<()> {
        drop(self.stdin.take());
        let Some(mut child) = self.child.take() else {
            return Ok(());
        };
        // Already exited is fine.
        let _ = child.kill();
        let _ = child.wait();
        self.join_threads()?;
        Ok(())
    }
}

impl Drop for FfmpegWebmSink {
    fn drop(&mut self) {
        if self.child.is_some()
            && let Err(e) = self.abort()
        {
            tracing::warn!(error = %e, "failed to tear down ffmpeg encoder");
        }
    }
}

fn push_input_fps(cmd: &mut Command, fps: Fps) {
    // For rawvideo input, `-r` goes before `-i`.
    cmd.args(["-r", &format!("{}/{}", fps.num, fps.den)]);
}

/// Ensure the parent directory of `path` exists.
pub fn ensure_parent_dir(path: &Path) -> NovaResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        use anyhow::Context as _;
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create output directory '{}'", parent.display()))?;
    }
    Ok(())
}

/// Return `true` when `program -version` runs successfully.
pub fn is_program_runnable(program: &Path) -> bool {
    Command::new(program)
        .arg("-version")
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

#[cfg(test)]
#[path = "../../tests/unit/encode/ffmpeg.rs"]
mod tests;
