#![forbid(unsafe_code)]

use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use drumvae::{
    AudioPlayback as _, DrumVaeError, FrameRGBA, HeadlessSession, RenderSettings, SessionScript,
    TimeMs,
};

#[derive(Parser, Debug)]
#[command(name = "drumvae", version)]
struct Cli {
    /// Log filter level (error, warn, info, debug, trace).
    #[arg(long, global = true, default_value = "warn")]
    log: tracing::Level,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a single frame of a session script as a PNG.
    Frame(FrameArgs),
    /// Render every frame of a session script as numbered PNGs.
    Frames(FramesArgs),
    /// Replay a session script and print the final scene state as JSON.
    Inspect(InspectArgs),
}

#[derive(Parser, Debug)]
struct FrameArgs {
    /// Input session script JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Session time of the frame, in milliseconds.
    #[arg(long)]
    at_ms: f64,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    /// TTF/OTF font used for labels; text is skipped without one.
    #[arg(long)]
    font: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct FramesArgs {
    /// Input session script JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output directory for `frame_00000.png`, `frame_00001.png`, ...
    #[arg(long)]
    out_dir: PathBuf,

    /// Keep every Nth frame.
    #[arg(long, default_value_t = 1)]
    every: u64,

    /// TTF/OTF font used for labels; text is skipped without one.
    #[arg(long)]
    font: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct InspectArgs {
    /// Input session script JSON.
    #[arg(long = "in")]
    in_path: PathBuf,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(cli.log)
        .init();

    match cli.cmd {
        Command::Frame(args) => cmd_frame(args),
        Command::Frames(args) => cmd_frames(args),
        Command::Inspect(args) => cmd_inspect(args),
    }
}

fn load_script(path: &Path) -> anyhow::Result<SessionScript> {
    let script = SessionScript::from_path(path)?;
    script
        .validate()
        .with_context(|| format!("validate session script '{}'", path.display()))?;
    Ok(script)
}

fn render_settings(font: Option<&Path>) -> anyhow::Result<RenderSettings> {
    let font_bytes = match font {
        Some(p) => Some(Arc::new(
            std::fs::read(p).with_context(|| format!("read font '{}'", p.display()))?,
        )),
        None => None,
    };
    Ok(RenderSettings { font_bytes })
}

fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    let script = load_script(&args.in_path)?;
    anyhow::ensure!(
        args.at_ms.is_finite() && args.at_ms >= 0.0,
        "--at-ms must be finite and >= 0"
    );
    let interval = script.frame_interval_ms();
    let settings = render_settings(args.font.as_deref())?;
    let mut sess = HeadlessSession::new(script, &settings)?;

    // graph smoothing advances once per frame
    let mut t = 0.0;
    while t + interval <= args.at_ms {
        sess.plan_at(TimeMs(t))?;
        t += interval;
    }
    let frame = sess.render_frame_at(TimeMs(args.at_ms))?;
    write_png(&args.out, &frame)?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_frames(args: FramesArgs) -> anyhow::Result<()> {
    anyhow::ensure!(args.every > 0, "--every must be > 0");
    let script = load_script(&args.in_path)?;
    let settings = render_settings(args.font.as_deref())?;
    let mut sess = HeadlessSession::new(script, &settings)?;

    std::fs::create_dir_all(&args.out_dir)
        .with_context(|| format!("create output dir '{}'", args.out_dir.display()))?;

    let mut written = 0u64;
    sess.render_frames_with(|i, frame| {
        if i % args.every != 0 {
            return Ok(());
        }
        let path = args.out_dir.join(format!("frame_{i:05}.png"));
        write_png(&path, &frame).map_err(DrumVaeError::from)?;
        written += 1;
        Ok(())
    })?;

    eprintln!("wrote {written} frames to {}", args.out_dir.display());
    Ok(())
}

fn cmd_inspect(args: InspectArgs) -> anyhow::Result<()> {
    let script = load_script(&args.in_path)?;
    let end = TimeMs(script.duration_ms);
    let mut sess = HeadlessSession::new(script, &RenderSettings::default())?;
    sess.plan_at(end)?;

    let c = sess.composer();
    let state = c.state();
    let summary = serde_json::json!({
        "time_ms": end.0,
        "mode": format!("{:?}", c.mode()),
        "fetch_status": format!("{:?}", c.fetch_status()),
        "playing": c.is_playing(),
        "beat": sess.sequencer().current_beat_index(),
        "cells_on": state.pattern.count_on(),
        "selected": state.selected,
        "latent": state.latent.values().to_vec(),
        "instruction_stage": c.instruction_stage(),
        "requests": sess.server().submitted(),
    });
    println!(
        "{}",
        serde_json::to_string_pretty(&summary).context("serialize summary")?
    );
    Ok(())
}

fn write_png(path: &Path, frame: &FrameRGBA) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    let data = if frame.premultiplied {
        unpremultiply(&frame.data)
    } else {
        frame.data.clone()
    };
    image::save_buffer_with_format(
        path,
        &data,
        frame.width,
        frame.height,
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("write png '{}'", path.display()))
}

fn unpremultiply(data: &[u8]) -> Vec<u8> {
    let mut out = data.to_vec();
    for px in out.chunks_exact_mut(4) {
        let a = px[3] as u32;
        if a != 0 && a != 255 {
            for c in &mut px[..3] {
                *c = ((*c as u32 * 255 + a / 2) / a).min(255) as u8;
            }
        }
    }
    out
}
