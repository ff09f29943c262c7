//! CareLab CLI: browse the offer catalog and export it.
//!
//! Usage:
//!   carelab export <pdf|video|images|all>   Export the offers
//!   carelab carousel [--start N]            Step through the slides
//!   carelab info                            Show the catalog
//!   carelab validate <FILE>                 Validate a catalog file
//!   carelab check                           Check system capabilities

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use carelab_common::config::AppConfig;

mod commands;

#[derive(Parser)]
#[command(
    name = "carelab",
    about = "Seasonal offers for CareLab: carousel, catalog, and exports",
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
    /// Export the offers as a PDF, a video, an image bundle, or all three
    Export {
        /// What to export: pdf, video, images, or all
        kind: String,

        /// Output directory
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Catalog JSON replacing the built-in offers
        #[arg(long)]
        catalog: Option<PathBuf>,

        /// Font used for slide text
        #[arg(long)]
        font: Option<PathBuf>,
    },

    /// Step through the offer slides interactively
    Carousel {
        /// One-based slide to start on
        #[arg(long, default_value = "1")]
        start: usize,

        /// Catalog JSON replacing the built-in offers
        #[arg(long)]
        catalog: Option<PathBuf>,
    },

    /// Show the catalog and the artifacts it exports to
    Info {
        /// Catalog JSON replacing the built-in offers
        #[arg(long)]
        catalog: Option<PathBuf>,
    },

    /// Validate a catalog file
    Validate {
        /// Path to the catalog JSON
        path: PathBuf,
    },

    /// Check system capabilities
    Check,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => AppConfig::load_from(path)
            .map_err(|e| anyhow::anyhow!("Failed to load config {}: {e}", path.display()))?,
        None => AppConfig::load(),
    };
    carelab_common::logging::init_logging(&config.logging, cli.verbose);

    match cli.command {
        Commands::Export {
            kind,
            output,
            catalog,
            font,
        } => commands::export::run(config, kind, output, catalog, font).await,
        Commands::Carousel { start, catalog } => commands::carousel::run(&config, start, catalog),
        Commands::Info { catalog } => commands::info::run(&config, catalog),
        Commands::Validate { path } => commands::validate::run(path),
        Commands::Check => commands::check::run(&config, cli.config.as_deref()),
    }
}
