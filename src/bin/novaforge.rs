use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use novaforge::{
    AspectRatio, Composer, ComposerOpts, DurationPolicy, EXAMPLE_PROMPTS, EncoderBackend,
    FfmpegWebmEncoder, FrameClock, GeneratorInput, ManualClock, RefreshClock, SceneRasterizer,
    SceneRasterizerOpts, SoundtrackMood, Storyboard, SynthOpts, Timeline, VisualStyle,
    build_storyboard_with, canvas_for,
};

#[derive(Parser, Debug)]
#[command(name = "novaforge", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the storyboard for a prompt.
    Storyboard(StoryboardArgs),
    /// Render a single frame as a PNG.
    Frame(FrameArgs),
    /// Render the clip to webm (requires `ffmpeg` with libvpx).
    Render(RenderArgs),
}

#[derive(Args, Debug)]
struct RequestArgs {
    /// Request JSON (`prompt`, `duration`, `style`, `soundtrack`, `aspectRatio`). Overrides the
    /// flags below.
    #[arg(long = "in")]
    in_path: Option<PathBuf>,

    /// Concept prompt. Defaults to the first example prompt.
    #[arg(long)]
    prompt: Option<String>,

    /// Clip length in seconds (6 to 30).
    #[arg(long, default_value_t = 12)]
    duration: u32,

    /// Visual style.
    #[arg(long, value_enum, default_value_t = VisualStyle::Cinematic)]
    style: VisualStyle,

    /// Soundtrack mood.
    #[arg(long, value_enum, default_value_t = SoundtrackMood::Ambient)]
    soundtrack: SoundtrackMood,

    /// Aspect ratio: 16:9, 9:16 or 1:1.
    #[arg(long, default_value_t = AspectRatio::Landscape)]
    aspect: AspectRatio,

    /// Reject out-of-range durations instead of clamping them.
    #[arg(long)]
    strict: bool,
}

#[derive(Args, Debug)]
struct StoryboardArgs {
    #[command(flatten)]
    request: RequestArgs,

    /// Print JSON instead of the blueprint listing.
    #[arg(long)]
    json: bool,
}

#[derive(Args, Debug)]
struct OverlayArgs {
    /// Overlay font file (falls back to `NOVAFORGE_FONT`, then system fonts).
    #[arg(long)]
    font: Option<PathBuf>,

    /// Skip the text overlay.
    #[arg(long)]
    no_text: bool,
}

impl OverlayArgs {
    fn rasterizer_opts(&self) -> SceneRasterizerOpts {
        SceneRasterizerOpts {
            font_path: self.font.clone(),
            draw_text: !self.no_text,
        }
    }
}

#[derive(Args, Debug)]
struct FrameArgs {
    #[command(flatten)]
    request: RequestArgs,

    #[command(flatten)]
    overlay: OverlayArgs,

    /// Timeline position in seconds.
    #[arg(long, default_value_t = 0.0)]
    at: f64,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Args, Debug)]
struct RenderArgs {
    #[command(flatten)]
    request: RequestArgs,

    #[command(flatten)]
    overlay: OverlayArgs,

    /// Directory the clip is saved to.
    #[arg(long, default_value = ".")]
    out_dir: PathBuf,

    /// Step the clock one frame per tick instead of pacing in real time.
    #[arg(long)]
    fast: bool,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Storyboard(args) => cmd_storyboard(args),
        Command::Frame(args) => cmd_frame(args),
        Command::Render(args) => cmd_render(args),
    }
}

fn read_request(args: &RequestArgs) -> anyhow::Result<GeneratorInput> {
    if let Some(path) = &args.in_path {
        return read_request_json(path);
    }
    Ok(GeneratorInput {
        prompt: args
            .prompt
            .clone()
            .unwrap_or_else(|| EXAMPLE_PROMPTS[0].to_owned()),
        duration: args.duration,
        style: args.style,
        soundtrack: args.soundtrack,
        aspect_ratio: args.aspect,
    })
}

fn read_request_json(path: &Path) -> anyhow::Result<GeneratorInput> {
    let s = std::fs::read_to_string(path)
        .with_context(|| format!("open request '{}'", path.display()))?;
    Ok(GeneratorInput::from_json_str(&s)?)
}

fn synthesize(args: &RequestArgs) -> anyhow::Result<(GeneratorInput, Storyboard)> {
    let input = read_request(args)?;
    let opts = SynthOpts {
        duration_policy: if args.strict {
            DurationPolicy::Reject
        } else {
            DurationPolicy::Clamp
        },
    };
    let board = build_storyboard_with(&input, opts)?;
    Ok((input, board))
}

fn cmd_storyboard(args: StoryboardArgs) -> anyhow::Result<()> {
    let (_, board) = synthesize(&args.request)?;
    if args.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&board).context("serialize storyboard")?
        );
    } else {
        print!("{}", board.blueprint());
    }
    Ok(())
}

fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    let (input, board) = synthesize(&args.request)?;
    let timeline = Timeline::new(&board)?;
    let pos = timeline.locate(args.at);
    let scene = &board.scenes[pos.scene_index];

    let mut rasterizer = SceneRasterizer::new(&args.overlay.rasterizer_opts())?;
    let frame = rasterizer.render_frame(scene, pos.t, canvas_for(input.aspect_ratio))?;

    if let Some(parent) = args.out.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    image::save_buffer_with_format(
        &args.out,
        &frame.to_straight_rgba8(),
        frame.width,
        frame.height,
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("write png '{}'", args.out.display()))?;

    eprintln!(
        "wrote {} ({} at t={:.2})",
        args.out.display(),
        scene.id,
        pos.t
    );
    Ok(())
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let (input, board) = synthesize(&args.request)?;

    let encoder = FfmpegWebmEncoder::default();
    if !encoder.is_available() {
        anyhow::bail!(
            "'{}' is required for webm encoding but could not be run (set NOVAFORGE_FFMPEG to override)",
            encoder.program().display()
        );
    }

    let opts = ComposerOpts {
        rasterizer: args.overlay.rasterizer_opts(),
        ..ComposerOpts::default()
    };
    let clock: Box<dyn FrameClock> = if args.fast {
        Box::new(ManualClock::new(
            Duration::from_secs(1) / opts.fps.num.max(1) * opts.fps.den,
        ))
    } else {
        Box::new(RefreshClock::default())
    };

    let mut composer = Composer::new(Box::new(encoder), clock, opts)?;
    composer.set_storyboard(board, input.aspect_ratio)?;
    composer.start_rendering()?;
    let handle = composer
        .run_to_completion()?
        .context("render ended without producing a clip")?;

    let path = composer.artifacts().save_to_dir(&handle, &args.out_dir)?;
    eprintln!("wrote {}", path.display());
    Ok(())
}
