use crate::encode::sink::{
    ChunkAccumulator, DEFAULT_BITS_PER_SECOND, EncoderBackend, EncoderConfig, EncodingSink,
    preferred_mime,
};
use crate::foundation::core::{Canvas, Fps, FrameIndex};
use crate::foundation::error::{NovaError, NovaResult};
use crate::render::scene::{SceneRasterizer, SceneRasterizerOpts};
use crate::render::surface::{Surface, canvas_for};
use crate::session::artifact::{ArtifactHandle, ArtifactStore, VideoArtifact};
use crate::session::clock::FrameClock;
use crate::session::timeline::{Timeline, TimelinePosition};
use crate::storyboard::input::AspectRatio;
use crate::storyboard::model::{SceneDescriptor, Storyboard};
use std::time::Duration;

/// Capture rate of the composer.
pub const CAPTURE_FPS: u32 = 30;

/// Options controlling [`Composer`] capture.
#[derive(Clone, Debug)]
pub struct ComposerOpts {
    /// Frames captured per second of timeline.
    pub fps: Fps,
    /// Target encoder bitrate.
    pub bits_per_second: u32,
    /// Fixed canvas instead of the aspect-ratio sizing.
    pub canvas: Option<Canvas>,
    /// Scene drawing options.
    pub rasterizer: SceneRasterizerOpts,
}

impl Default for ComposerOpts {
    fn default() -> Self {
        Self {
            fps: Fps {
                num: CAPTURE_FPS,
                den: 1,
            },
            bits_per_second: DEFAULT_BITS_PER_SECOND,
            canvas: None,
            rasterizer: SceneRasterizerOpts::default(),
        }
    }
}

/// Observable composer state.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ComposerState {
    /// Overall progress in `[0, 1]`, non-decreasing within a session.
    pub progress: f64,
    /// Scene currently on screen; `None` when idle or finished.
    pub active_scene: Option<SceneDescriptor>,
    /// Last failure, as shown to the user.
    pub error: Option<String>,
    /// A render session is in flight.
    pub is_rendering: bool,
    /// Finished clip of the last completed session.
    pub artifact: Option<ArtifactHandle>,
}

/// Result of one [`Composer::tick`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TickOutcome {
    /// No session in flight.
    Idle,
    /// A frame was drawn; more to come.
    Rendering,
    /// The session completed and its artifact is registered.
    Finished,
}

// One in-flight render. Owns everything that must be released on cancel.
struct RenderSession {
    board: Storyboard,
    canvas: Canvas,
    timeline: Timeline,
    surface: Surface,
    sink: Box<dyn EncodingSink>,
    chunks: ChunkAccumulator,
    mime: String,
    fps: Fps,
    started_at: Duration,
    current_scene_index: Option<usize>,
    elapsed: f64,
    next_frame: u64,
    total_frames: u64,
}

impl RenderSession {
    fn advance(
        &mut self,
        rasterizer: &mut SceneRasterizer,
        now: Duration,
    ) -> NovaResult<TimelinePosition> {
        self.elapsed = now.saturating_sub(self.started_at).as_secs_f64();
        let clamped = self.elapsed.min(self.timeline.total_secs());
        let pos = self.timeline.locate(clamped);
        let scene = &self.board.scenes[pos.scene_index];
        rasterizer.draw_scene(&mut self.surface, scene, pos.t)?;
        self.capture_due(clamped)?;
        self.chunks.drain_ready()?;
        Ok(pos)
    }

    // Push every frame index that became due, repeating the current raster for skipped ones.
    fn capture_due(&mut self, clamped: f64) -> NovaResult<()> {
        let due = self
            .fps
            .secs_to_frames_floor(clamped)
            .saturating_add(1)
            .min(self.total_frames);
        if self.next_frame >= due {
            return Ok(());
        }
        let frame = self.surface.snapshot();
        while self.next_frame < due {
            self.sink.push_frame(FrameIndex(self.next_frame), &frame)?;
            self.next_frame += 1;
        }
        Ok(())
    }

    fn is_complete(&self) -> bool {
        self.elapsed >= self.timeline.total_secs()
    }

    fn finish(mut self) -> NovaResult<VideoArtifact> {
        self.sink.stop()?;
        let bytes = self.chunks.finish()?;
        Ok(VideoArtifact {
            mime: self.mime,
            bytes,
            frames: self.next_frame,
            duration_secs: self.fps.frames_to_secs(self.next_frame),
        })
    }

    fn cancel(mut self) {
        if let Err(e) = self.sink.abort() {
            tracing::warn!(error = %e, "encoder teardown failed");
        }
    }
}

/// Drives a storyboard through rasterization and capture into a finished clip.
///
/// Single-threaded and cooperative: the caller (or [`Composer::run_to_completion`]) calls
/// [`Composer::tick`] once per display refresh.
pub struct Composer {
    opts: ComposerOpts,
    encoder: Box<dyn EncoderBackend>,
    clock: Box<dyn FrameClock>,
    artifacts: ArtifactStore,
    rasterizer: SceneRasterizer,
    storyboard: Option<Storyboard>,
    aspect_ratio: AspectRatio,
    session: Option<RenderSession>,
    state: ComposerState,
}

impl Composer {
    /// Create a composer.
    ///
    /// Fails when `opts.fps` has a zero term or a configured overlay font cannot be loaded.
    pub fn new(
        encoder: Box<dyn EncoderBackend>,
        clock: Box<dyn FrameClock>,
        opts: ComposerOpts,
    ) -> NovaResult<Self> {
        Fps::new(opts.fps.num, opts.fps.den)?;
        let rasterizer = SceneRasterizer::new(&opts.rasterizer)?;
        Ok(Self {
            opts,
            encoder,
            clock,
            artifacts: ArtifactStore::new(),
            rasterizer,
            storyboard: None,
            aspect_ratio: AspectRatio::default(),
            session: None,
            state: ComposerState::default(),
        })
    }

    /// Register finished clips in `store` instead of a private one.
    pub fn with_artifact_store(mut self, store: ArtifactStore) -> Self {
        self.artifacts = store;
        self
    }

    /// Registry holding finished clips.
    pub fn artifacts(&self) -> &ArtifactStore {
        &self.artifacts
    }

    /// Current observable state.
    pub fn state(&self) -> &ComposerState {
        &self.state
    }

    /// Storyboard the next render will use.
    pub fn storyboard(&self) -> Option<&Storyboard> {
        self.storyboard.as_ref()
    }

    /// Aspect ratio the next render will use.
    pub fn aspect_ratio(&self) -> AspectRatio {
        self.aspect_ratio
    }

    /// Output size for the current settings.
    pub fn canvas(&self) -> Canvas {
        self.opts
            .canvas
            .unwrap_or_else(|| canvas_for(self.aspect_ratio))
    }

    /// Replace the storyboard, releasing any session and artifact and resetting state.
    ///
    /// Cached backdrops of the previous storyboard are dropped too.
    pub fn set_storyboard(&mut self, board: Storyboard, aspect_ratio: AspectRatio) -> NovaResult<()> {
        self.teardown();
        self.rasterizer.clear_cache();
        self.state = ComposerState::default();
        self.aspect_ratio = aspect_ratio;
        if let Err(e) = board.validate() {
            self.storyboard = None;
            self.state.error = Some(e.to_string());
            return Err(e);
        }
        self.storyboard = Some(board);
        Ok(())
    }

    /// Begin a render of the current storyboard, cancelling any session in flight first.
    #[tracing::instrument(skip(self))]
    pub fn start_rendering(&mut self) -> NovaResult<()> {
        self.teardown();
        self.state = ComposerState::default();
        match self.open_session() {
            Ok(session) => {
                tracing::info!(
                    width = session.canvas.width,
                    height = session.canvas.height,
                    mime = %session.mime,
                    scenes = session.board.scenes.len(),
                    total_secs = session.timeline.total_secs(),
                    "render started"
                );
                self.session = Some(session);
                self.state.is_rendering = true;
                Ok(())
            }
            Err(e) => Err(self.fail(e)),
        }
    }

    fn open_session(&mut self) -> NovaResult<RenderSession> {
        let board = self
            .storyboard
            .clone()
            .ok_or_else(|| NovaError::invalid_input("no storyboard to render"))?;
        if !self.encoder.is_available() {
            return Err(NovaError::unsupported(
                "video capture is not available in this environment",
            ));
        }
        let canvas = self.canvas();
        let surface = Surface::acquire(canvas)?;
        let timeline = Timeline::new(&board)?;

        let mime = preferred_mime(self.encoder.as_ref()).to_owned();
        let (tx, chunks) = ChunkAccumulator::channel();
        let sink = self
            .encoder
            .open(
                EncoderConfig {
                    width: canvas.width,
                    height: canvas.height,
                    fps: self.opts.fps,
                    mime: mime.clone(),
                    bits_per_second: self.opts.bits_per_second,
                },
                tx,
            )
            .map_err(|e| match e {
                NovaError::EncoderInit(_) => e,
                other => NovaError::encoder_init(other.to_string()),
            })?;

        Ok(RenderSession {
            total_frames: self.opts.fps.secs_to_frames_ceil(timeline.total_secs()),
            board,
            canvas,
            timeline,
            surface,
            sink,
            chunks,
            mime,
            fps: self.opts.fps,
            started_at: self.clock.now(),
            current_scene_index: None,
            elapsed: 0.0,
            next_frame: 0,
        })
    }

    /// One display-refresh step: draw the current scene, capture due frames, finish at the end.
    pub fn tick(&mut self) -> NovaResult<TickOutcome> {
        let now = self.clock.now();
        let Some(session) = self.session.as_mut() else {
            return Ok(TickOutcome::Idle);
        };

        let pos = match session.advance(&mut self.rasterizer, now) {
            Ok(pos) => pos,
            Err(e) => return Err(self.fail(e)),
        };

        if session.current_scene_index != Some(pos.scene_index) {
            session.current_scene_index = Some(pos.scene_index);
            let scene = &session.board.scenes[pos.scene_index];
            tracing::debug!(scene = %scene.id, index = pos.scene_index, "scene started");
            self.state.active_scene = Some(scene.clone());
        }
        self.state.progress = self.state.progress.max(pos.progress);

        if !session.is_complete() {
            return Ok(TickOutcome::Rendering);
        }

        let Some(session) = self.session.take() else {
            return Ok(TickOutcome::Idle);
        };
        match session.finish() {
            Ok(artifact) => {
                tracing::info!(
                    frames = artifact.frames,
                    bytes = artifact.bytes.len(),
                    mime = %artifact.mime,
                    "render finished"
                );
                let handle = self.artifacts.create(artifact);
                self.state.progress = 1.0;
                self.state.active_scene = None;
                self.state.is_rendering = false;
                self.state.artifact = Some(handle);
                Ok(TickOutcome::Finished)
            }
            Err(e) => Err(self.fail(e)),
        }
    }

    /// Tick until the session finishes, waiting on the clock between ticks.
    ///
    /// Returns the finished clip's handle, or `None` when nothing was rendering.
    pub fn run_to_completion(&mut self) -> NovaResult<Option<ArtifactHandle>> {
        loop {
            match self.tick()? {
                TickOutcome::Idle => return Ok(None),
                TickOutcome::Finished => return Ok(self.state.artifact.clone()),
                TickOutcome::Rendering => self.clock.wait_for_next_frame(),
            }
        }
    }

    /// Stop the session in flight, if any, discarding its output.
    pub fn cancel(&mut self) {
        if let Some(session) = self.session.take() {
            tracing::debug!("cancelling render session");
            session.cancel();
        }
        self.state.is_rendering = false;
        self.state.active_scene = None;
    }

    /// Cancel any session and revoke the current artifact. Safe to call repeatedly.
    pub fn teardown(&mut self) {
        self.cancel();
        if let Some(handle) = self.state.artifact.take() {
            self.artifacts.revoke(&handle);
        }
    }

    fn fail(&mut self, err: NovaError) -> NovaError {
        tracing::warn!(error = %err, "render failed");
        self.cancel();
        self.state.error = Some(err.to_string());
        err
    }
}

impl Drop for Composer {
    fn drop(&mut self) {
        self.teardown();
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/composer.rs"]
mod tests;
