//! Harvest: sitemap-driven site crawler and record-set toolkit

use anyhow::Result;
use clap::{Parser, Subcommand};
use harvest::config::Config;
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

mod commands;

#[derive(Parser)]
#[command(name = "harvest")]
#[command(about = "Sitemap-driven site crawler emitting labeled text fragments")]
#[command(version)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "harvest.toml")]
    config: PathBuf,

    /// Verbosity level
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run one full crawl and write the record set
    Crawl {
        /// Override the configured site root
        #[arg(short, long)]
        base_url: Option<String>,

        /// Override the configured output path
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Lift each page record's first prop onto the top level
    Flatten {
        /// Record file to read
        input: PathBuf,
        /// Where to write the transformed records
        output: PathBuf,
    },

    /// Keep only the longest prop of each record
    LongestProp {
        input: PathBuf,
        output: PathBuf,
    },

    /// Keep only records of class "Document"
    SelectDocuments {
        input: PathBuf,
        output: PathBuf,
    },

    /// Drop Document records whose referenced file no longer exists
    PruneMissing {
        input: PathBuf,
        output: PathBuf,
    },

    /// Write a default configuration file
    Init {
        /// Output directory
        #[arg(default_value = ".")]
        path: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load or create config
    let config = if cli.config.exists() {
        Config::load(&cli.config)?
    } else {
        Config::default()
    };

    // Setup logging; -v flags override the configured level
    let log_level = match cli.verbose {
        0 => config.logging.level.to_tracing(),
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    match cli.command {
        Commands::Crawl { base_url, output } => {
            commands::run_crawl(config, base_url, output).await
        }
        Commands::Flatten { input, output } => commands::flatten(&input, &output),
        Commands::LongestProp { input, output } => commands::longest_prop(&input, &output),
        Commands::SelectDocuments { input, output } => commands::select_documents(&input, &output),
        Commands::PruneMissing { input, output } => commands::prune_missing(&input, &output),
        Commands::Init { path } => commands::init_config(&path),
    }
}
