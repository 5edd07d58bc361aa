use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

use edgeview::platform::memory::MemoryDocument;
use edgeview::{bootstrap_viewer, ViewerConfig};

/// Run the frame viewer against an in-memory document and report its stats.
#[derive(Parser, Debug)]
#[command(name = "edgeview", version, about)]
struct Args {
    /// JSON viewer configuration (missing fields use defaults)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Number of ticker periods to run after the initial frame
    #[arg(long, default_value_t = 3)]
    ticks: u32,

    /// Override the tick interval in milliseconds
    #[arg(long)]
    interval_ms: Option<u64>,

    /// Seed for reproducible frames
    #[arg(long)]
    seed: Option<u64>,

    /// Write the final surface contents to this PNG file
    #[arg(long)]
    output: Option<PathBuf>,
}

fn load_config(args: &Args) -> anyhow::Result<ViewerConfig> {
    let mut config = match &args.config {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("reading config {}", path.display()))?;
            ViewerConfig::from_json_str(&json)?
        }
        None => ViewerConfig::default(),
    };
    if let Some(ms) = args.interval_ms {
        config.tick_interval_ms = ms;
    }
    if args.seed.is_some() {
        config.seed = args.seed;
    }
    config.validate()?;
    Ok(config)
}

/// How long to run so that `ticks` periods elapse, landing just past the last tick
fn run_duration(period: Duration, ticks: u32) -> anyhow::Result<Duration> {
    let slack = period.min(Duration::from_millis(50));
    period
        .checked_mul(ticks)
        .and_then(|d| d.checked_add(slack))
        .with_context(|| format!("{} ticks of {:?} overflows the run time", ticks, period))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let config = load_config(&args)?;
    let period = config.tick_interval();
    let surface_id = config.surface_id.clone();

    let document = MemoryDocument::with_viewer_elements(&surface_id);
    let mut viewer = bootstrap_viewer(&document, config)
        .await
        .context("document closed before loading finished")?;

    tokio::time::sleep(run_duration(period, args.ticks)?).await;
    viewer.wait_for_renders().await;

    let stats = viewer.stats();
    viewer.stop().await;
    println!("{}", serde_json::to_string_pretty(&stats)?);

    if let Some(path) = &args.output {
        let canvas = document
            .memory_canvas(&surface_id)
            .context("surface missing from document")?;
        canvas
            .snapshot()
            .save(path)
            .with_context(|| format!("writing {}", path.display()))?;
        log::info!("Wrote surface to {}", path.display());
    }

    Ok(())
}
