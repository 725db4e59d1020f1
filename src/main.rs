use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Parser;
use tracepad::script::{load_script, run_script};
use tracepad::{init_logging, session_options, Config, RenderLoop, Session};
use tracepad_core::thread_safe;

/// Replay a drawing script against a tracing canvas and export the result.
#[derive(Debug, Parser)]
#[command(name = "tracepad", version, about)]
struct Args {
    /// JSON script of drawing steps
    #[arg(long)]
    script: PathBuf,

    /// Where to write the composited canvas as PNG
    #[arg(long)]
    out: PathBuf,

    /// Also write the strokes layer alone as PNG
    #[arg(long)]
    strokes_out: Option<PathBuf>,

    /// Config file (.toml or .json); defaults to the platform config location
    #[arg(long)]
    config: Option<PathBuf>,

    /// Emit logs as JSON lines
    #[arg(long)]
    json_logs: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logging(args.json_logs)?;
    tracing::info!(
        version = tracepad::VERSION,
        built = tracepad::BUILD_DATE,
        "Starting tracepad"
    );

    let config = match &args.config {
        Some(path) => Config::load_from_file(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => Config::load_or_default(),
    };

    let steps = load_script(&args.script)?;
    let base_dir = args.script.parent().unwrap_or(Path::new("."));

    let session = thread_safe(Session::new(session_options(&config))?);
    let render = RenderLoop::spawn(session.clone(), config.render.frame_rate)?;

    let report = run_script(&session, Some(&render), &steps, base_dir).await?;
    render.wait_for_frames(1).await;

    std::fs::write(&args.out, render.latest_frame_png()?)
        .with_context(|| format!("Failed to write {}", args.out.display()))?;
    if let Some(path) = &args.strokes_out {
        let png = session.lock().export_strokes()?;
        std::fs::write(path, png).with_context(|| format!("Failed to write {}", path.display()))?;
    }
    render.stop();

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
