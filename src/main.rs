use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "fsviz",
    version,
    about = "Scan a directory tree, write its metadata and render it as a size-colored graph"
)]
struct Cli {
    /// Path to scan (default: current directory)
    #[arg(default_value = ".")]
    path: PathBuf,

    /// Directory that receives the PNG, CSV and JSON outputs
    #[arg(short = 'o', long, default_value = "fs_visualization")]
    output_dir: PathBuf,

    /// Directory name to skip at any depth (repeatable; replaces the defaults)
    #[arg(short = 'e', long = "exclude")]
    exclude: Vec<String>,

    /// Count files before scanning to report progress as a percentage
    #[arg(long)]
    count_first: bool,

    /// Image width in pixels
    #[arg(long)]
    width: Option<u32>,

    /// Image height in pixels
    #[arg(long)]
    height: Option<u32>,

    /// Spring layout iterations
    #[arg(long)]
    iterations: Option<usize>,

    /// Radius of each node dot in pixels
    #[arg(long)]
    node_radius: Option<u32>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing (logs to stderr)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    // Parse CLI arguments
    let cli = Cli::parse();

    // Resolve path; a missing path is reported by the scanner
    let start_path = std::fs::canonicalize(&cli.path).unwrap_or(cli.path);

    // Build settings
    let mut settings = fsviz::config::settings::Settings {
        start_path,
        output_dir: cli.output_dir,
        count_first: cli.count_first,
        ..Default::default()
    };
    if !cli.exclude.is_empty() {
        settings.exclude_dirs = cli.exclude;
    }
    if let Some(width) = cli.width {
        settings.render.width = width;
    }
    if let Some(height) = cli.height {
        settings.render.height = height;
    }
    if let Some(iterations) = cli.iterations {
        settings.render.layout_iterations = iterations;
    }
    if let Some(radius) = cli.node_radius {
        settings.render.node_radius = radius;
    }

    let platform = fsviz::config::platform::PlatformInfo::detect();
    tracing::debug!(?platform, "detected platform");

    let app = fsviz::app::App::new(settings, platform);
    app.run().await?;
    Ok(())
}
