use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use feature_channels::ChannelMode;
use hough_features::batch::{self, BatchOptions};
use hough_features::config::{AppConfig, PlaneSet, CONFIG_ENV};
use hough_features::io::OutputFormat;
use hough_features::BufferAdapter;

#[derive(Parser)]
#[command(name = "hough-features")]
#[command(about = "Hough-forest feature channels for RGB images")]
struct Cli {
    /// Configuration file (falls back to $CONFIG_FILE)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract the feature planes of one PNG image
    Extract {
        /// Input PNG file
        input: PathBuf,

        /// Output directory
        #[arg(short, long)]
        output: PathBuf,

        /// Plane set (default from config, else compact)
        #[arg(long, value_enum)]
        mode: Option<PlaneSet>,

        /// Shorthand for --mode full
        #[arg(long, conflicts_with = "mode")]
        full: bool,

        /// Output format (default from config, else png)
        #[arg(long, value_enum)]
        format: Option<OutputFormat>,
    },
    /// Extract many images concurrently, one sub-directory per input
    Batch {
        /// Input PNG files
        #[arg(required = true)]
        inputs: Vec<PathBuf>,

        /// Output root directory
        #[arg(short, long)]
        output: PathBuf,

        /// Plane set (default from config, else compact)
        #[arg(long, value_enum)]
        mode: Option<PlaneSet>,

        /// Shorthand for --mode full
        #[arg(long, conflicts_with = "mode")]
        full: bool,

        /// Concurrent jobs (default from config, else CPU count)
        #[arg(short, long)]
        workers: Option<usize>,

        /// Output format (default from config, else png)
        #[arg(long, value_enum)]
        format: Option<OutputFormat>,
    },
    /// Print the plane order
    Layout {
        /// Show the 32-plane layout
        #[arg(long)]
        full: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config_path = AppConfig::resolve_path(cli.config);

    match cli.command {
        Some(Commands::Extract {
            input,
            output,
            mode,
            full,
            format,
        }) => {
            init_tracing("hough_features=warn,feature_channels=warn");
            let config = AppConfig::load(config_path.as_deref());
            let mode = resolve_mode(&config, mode, full);
            run_extract_command(&config, &input, &output, mode, format)
        }
        Some(Commands::Batch {
            inputs,
            output,
            mode,
            full,
            workers,
            format,
        }) => {
            init_tracing("hough_features=info,feature_channels=warn");
            let config = AppConfig::load(config_path.as_deref());
            let mode = resolve_mode(&config, mode, full);
            run_batch_command(&config, inputs, &output, mode, workers, format).await
        }
        Some(Commands::Layout { full }) => {
            run_layout_command(ChannelMode::from_full(full));
            Ok(())
        }
        None => {
            run_status_command(config_path.as_deref());
            Ok(())
        }
    }
}

fn init_tracing(default_filter: &str) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().without_time())
        .init();
}

/// Command-line choice first, then the configured plane set
fn resolve_mode(config: &AppConfig, mode: Option<PlaneSet>, full: bool) -> ChannelMode {
    if full {
        return ChannelMode::Full;
    }
    mode.unwrap_or(config.mode).into()
}

/// Extract one image and write its planes
fn run_extract_command(
    config: &AppConfig,
    input: &Path,
    output: &Path,
    mode: ChannelMode,
    format: Option<OutputFormat>,
) -> anyhow::Result<()> {
    let format = format.unwrap_or(config.format);

    let summary = batch::extract_to_dir(&BufferAdapter::default(), input, output, mode, format)
        .map_err(|e| anyhow::anyhow!("{}: {e}", input.display()))?;

    println!(
        "Extracted {} planes of {}x{} from {} into {} ({} files)",
        summary.planes,
        summary.height,
        summary.width,
        input.display(),
        output.display(),
        summary.files.len()
    );
    Ok(())
}

/// Extract many images on the blocking pool
async fn run_batch_command(
    config: &AppConfig,
    inputs: Vec<PathBuf>,
    output: &Path,
    mode: ChannelMode,
    workers: Option<usize>,
    format: Option<OutputFormat>,
) -> anyhow::Result<()> {
    let options = BatchOptions {
        mode,
        format: format.unwrap_or(config.format),
        workers: workers.unwrap_or(config.workers).max(1),
    };
    tracing::info!(
        images = inputs.len(),
        workers = options.workers,
        mode = %options.mode,
        "Starting batch"
    );

    let jobs = batch::plan_jobs(&inputs, output);
    let outcomes = batch::run_batch(jobs, options, BufferAdapter::default()).await;

    let mut failed = 0;
    for outcome in &outcomes {
        match &outcome.result {
            Ok(summary) => println!(
                "  ok    {} -> {} ({} planes)",
                outcome.job.input.display(),
                outcome.job.output_dir.display(),
                summary.planes
            ),
            Err(e) => {
                failed += 1;
                println!("  error {}: {e}", outcome.job.input.display());
            }
        }
    }
    println!(
        "\n{} of {} images extracted",
        outcomes.len() - failed,
        outcomes.len()
    );

    if failed > 0 {
        anyhow::bail!("{failed} image(s) failed");
    }
    Ok(())
}

/// Print the plane-order contract
fn run_layout_command(mode: ChannelMode) {
    println!("{mode} layout ({} planes):", mode.plane_count());
    for (index, id) in mode.layout().iter().enumerate() {
        println!("  {index:2}  {id}");
    }
}

/// Show version, configuration and available commands
fn run_status_command(config_path: Option<&Path>) {
    const VERSION: &str = env!("CARGO_PKG_VERSION");

    println!("hough-features v{VERSION}");
    println!("Hough-forest feature channels for RGB images\n");

    println!("Environment Variables:");
    println!(
        "  {CONFIG_ENV} = {}",
        std::env::var(CONFIG_ENV).unwrap_or_else(|_| "(not set)".to_string())
    );

    let config_source = match config_path {
        Some(path) if path.exists() => path.display().to_string(),
        Some(path) => format!("defaults ({} not found)", path.display()),
        None => "defaults".to_string(),
    };
    let config = AppConfig::load(config_path);
    println!("\nConfiguration:");
    println!("  Source:  {config_source}");
    println!("  Mode:    {}", ChannelMode::from(config.mode));
    println!("  Format:  {:?}", config.format);
    println!("  Workers: {}", config.workers);

    println!("\nCommands:");
    println!("  hough-features extract   Extract the planes of one PNG image");
    println!("  hough-features batch     Extract many images concurrently");
    println!("  hough-features layout    Print the plane order");
    println!("\nRun 'hough-features --help' for more details.");
}
