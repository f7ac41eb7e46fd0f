//! Cursor Flow CLI: inspect projects, preview camera motion, export.
//!
//! Usage:
//!   cursorflow info <PROJECT>            Show project information
//!   cursorflow simulate <PROJECT>        Sample camera transforms over the timeline
//!   cursorflow export <VIDEO>            Send a recording to the processing service
//!   cursorflow check                     Check configuration and service health

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use cursorflow_common::AppConfig;

mod commands;

#[derive(Parser)]
#[command(
    name = "cursorflow",
    about = "Screen-recording editor with spring-driven zoom and cursor replacement",
    version,
    author
)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Config file (defaults to the standard location)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show project information
    Info {
        /// Path to the project JSON file
        path: PathBuf,
    },

    /// Sample camera transforms over the whole timeline
    Simulate {
        /// Path to the project JSON file
        path: PathBuf,

        /// Sampling rate in frames per second
        #[arg(long, default_value = "30")]
        fps: f64,

        /// Write frames as JSON to this file instead of printing CSS
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Pointer samples JSON to overlay as a smoothed cursor path
        #[arg(long)]
        cursor: Option<PathBuf>,
    },

    /// Export a recording through the processing service
    Export {
        /// Recorded video file
        video: PathBuf,

        /// Pointer samples JSON (`[{x, y, time}]`). Without it the service
        /// detects the cursor in the video.
        #[arg(long)]
        cursor: Option<PathBuf>,

        /// Output file path
        #[arg(short, long, default_value = "output.mp4")]
        output: PathBuf,

        /// Cursor style: fancy|macos|circle|dot|ring|crosshair
        #[arg(long, default_value = "fancy")]
        style: String,

        /// Cursor size in pixels
        #[arg(long, default_value = "48")]
        size: u32,

        /// Cursor color: white|red|green|blue|yellow|cyan|magenta|orange
        #[arg(long, default_value = "white")]
        color: String,

        /// Disable pointer path smoothing
        #[arg(long)]
        no_smooth: bool,

        /// Quality: fast|balanced|high
        #[arg(long, default_value = "high")]
        quality: String,

        /// Processing service URL (overrides config)
        #[arg(long)]
        url: Option<String>,
    },

    /// Check configuration and service health
    Check,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => AppConfig::load_from(path),
        None => AppConfig::load(),
    };
    if cli.verbose {
        config.logging.level = "debug".to_string();
    }
    cursorflow_common::logging::init_logging(&config.logging);

    match cli.command {
        Commands::Info { path } => commands::info::run(path, &config),
        Commands::Simulate {
            path,
            fps,
            output,
            cursor,
        } => commands::simulate::run(path, fps, output, cursor, &config),
        Commands::Export {
            video,
            cursor,
            output,
            style,
            size,
            color,
            no_smooth,
            quality,
            url,
        } => {
            let options = commands::export::parse_options(&style, size, &color, !no_smooth, &quality)?;
            if let Some(url) = url {
                config.service.base_url = url;
            }
            commands::export::run(video, cursor, output, options, &config).await
        }
        Commands::Check => commands::check::run(&config).await,
    }
}
