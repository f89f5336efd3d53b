//! adframe: lays out categorized creative assets on a background canvas
//! and optionally renders the composed frames.

use std::path::PathBuf;

use adframe_core::config::AppConfig;
use adframe_core::{FrequencyScope, Size};
use adframe_layout::{Frame, ImageCompositor, LayoutEngine, PolicyTable};
use anyhow::Context;
use clap::Parser;
use tracing::{error, info, warn};

#[derive(Parser, Debug)]
#[command(name = "adframe")]
#[command(about = "Grid layout and compositing for advertisement frames")]
#[command(version)]
struct Cli {
    /// JSON file holding an array of frames; each frame is an array of
    /// `{"category", "remote_ref", "local_ref"}` items
    frames: PathBuf,

    /// Config file (TOML or JSON)
    #[arg(long, env = "ADFRAME_CONFIG")]
    config: Option<String>,

    /// Canvas width in pixels (overrides config)
    #[arg(long, env = "ADFRAME__LAYOUT__CANVAS_WIDTH")]
    width: Option<f64>,

    /// Canvas height in pixels (overrides config)
    #[arg(long, env = "ADFRAME__LAYOUT__CANVAS_HEIGHT")]
    height: Option<f64>,

    /// Cell padding in pixels (overrides config)
    #[arg(long)]
    padding: Option<f64>,

    /// Seed for the tie-break random source (overrides config)
    #[arg(long)]
    seed: Option<u64>,

    /// Frequency counter scope: `frame` or `batch` (overrides config)
    #[arg(long)]
    frequency_scope: Option<FrequencyScope>,

    /// JSON policy table replacing the built-in one
    #[arg(long)]
    policy: Option<String>,

    /// Render composed frames as PNG files
    #[arg(long)]
    render: bool,

    /// Directory for rendered frames (overrides config)
    #[arg(long, env = "ADFRAME__COMPOSITOR__OUTPUT_DIR")]
    output_dir: Option<String>,

    /// Resolve relative asset references against this directory
    #[arg(long)]
    asset_root: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "adframe=info,adframe_layout=info".into()),
        )
        .json()
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut config = load_config(cli.config.as_deref())?;

    // Apply CLI overrides
    if let Some(width) = cli.width {
        config.layout.canvas_width = width;
    }
    if let Some(height) = cli.height {
        config.layout.canvas_height = height;
    }
    if let Some(padding) = cli.padding {
        config.layout.padding = padding;
    }
    if let Some(seed) = cli.seed {
        config.layout.seed = Some(seed);
    }
    if let Some(scope) = cli.frequency_scope {
        config.layout.frequency_scope = scope;
    }
    if let Some(policy) = cli.policy {
        config.layout.policy_path = Some(policy);
    }
    if let Some(dir) = cli.output_dir {
        config.compositor.output_dir = dir;
    }

    info!(
        width = config.layout.canvas_width,
        height = config.layout.canvas_height,
        padding = config.layout.padding,
        frequency_scope = ?config.layout.frequency_scope,
        "Configuration loaded"
    );

    let policy = match &config.layout.policy_path {
        Some(path) => PolicyTable::from_json_file(path)
            .with_context(|| format!("failed to load policy table {path}"))?,
        None => PolicyTable::builtin(),
    };
    let engine = LayoutEngine::new(policy, &config.layout)?;

    let raw = std::fs::read_to_string(&cli.frames)
        .with_context(|| format!("failed to read {}", cli.frames.display()))?;
    let frames: Vec<Frame> =
        serde_json::from_str(&raw).context("frames file is not valid JSON")?;

    let canvas = Size {
        width: config.layout.canvas_width,
        height: config.layout.canvas_height,
    };
    let batch = engine.layout_batch(canvas, &frames);

    println!("{}", serde_json::to_string_pretty(&batch.reports())?);

    if cli.render {
        let output_dir = PathBuf::from(&config.compositor.output_dir);
        std::fs::create_dir_all(&output_dir)
            .with_context(|| format!("failed to create {}", output_dir.display()))?;

        let compositor = match cli.asset_root {
            Some(root) => ImageCompositor::with_asset_root(root),
            None => ImageCompositor::new(),
        };

        for (index, layout) in batch.layouts() {
            let path = output_dir.join(format!(
                "{}_{index:03}.png",
                config.compositor.file_prefix
            ));
            if let Err(e) = compositor.render_to_file(layout, &path) {
                error!(index, error = %e, "Failed to render frame");
            }
        }
    }

    info!(
        succeeded = batch.succeeded(),
        failed = batch.failed(),
        "adframe finished"
    );

    if batch.failed() > 0 {
        anyhow::bail!("{} of {} frames failed layout", batch.failed(), frames.len());
    }
    Ok(())
}

/// A config file named on the command line must load. Without one, a bad
/// environment falls back to defaults.
fn load_config(path: Option<&str>) -> anyhow::Result<AppConfig> {
    match path {
        Some(path) => {
            AppConfig::load(Some(path)).with_context(|| format!("failed to load config {path}"))
        }
        None => Ok(AppConfig::load(None).unwrap_or_else(|e| {
            warn!(error = %e, "Failed to load config, using defaults");
            AppConfig::default()
        })),
    }
}
