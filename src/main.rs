//! substack-dl main entry point
//!
//! This is the command-line interface for the newsletter archive downloader.

use anyhow::Context;
use clap::Parser;
use std::path::{Path, PathBuf};
use substack_dl::config::{load_config_with_hash, Config, ConfigOverrides, DEFAULT_CONFIG_FILE};
use substack_dl::crawler::{download, source_output_dirs};
use substack_dl::output::print_run_summary;
use tracing_subscriber::EnvFilter;

/// substack-dl: download a newsletter archive for offline reading
///
/// Walks the archive of each configured newsletter, fetches every post and
/// writes it as markdown, html, json, pdf or epub, optionally with its
/// images stored locally.
#[derive(Parser, Debug)]
#[command(name = "substack-dl")]
#[command(version)]
#[command(about = "Download a newsletter archive for offline reading", long_about = None)]
struct Cli {
    /// Newsletter root URL; replaces the sources listed in the config file
    #[arg(short, long)]
    url: Option<String>,

    /// Path to TOML configuration file (defaults to ./config.toml when present)
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Output formats, comma separated (md, html, json, pdf, epub)
    #[arg(short, long, value_delimiter = ',')]
    formats: Option<Vec<String>>,

    /// Directory where posts are written
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Download images and rewrite references to local paths
    #[arg(short = 'i', long, overrides_with = "no_download_images")]
    download_images: bool,

    /// Keep image references pointing at their remote URLs
    #[arg(long, overrides_with = "download_images")]
    no_download_images: bool,

    /// Skip posts already recorded in each source's download log
    #[arg(long, overrides_with = "no_incremental")]
    incremental: bool,

    /// Process every discovered post, ignoring the download log
    #[arg(long, overrides_with = "incremental")]
    no_incremental: bool,

    /// Delay between requests, in seconds
    #[arg(short, long)]
    delay: Option<f64>,

    /// Name of the asset directory inside each output directory
    #[arg(long)]
    assets_dir_name: Option<String>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show what would be downloaded without any network access
    #[arg(long)]
    dry_run: bool,
}

impl Cli {
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            url: self.url.clone(),
            formats: self.formats.clone(),
            output_dir: self.output_dir.clone(),
            download_images: flag_pair(self.download_images, self.no_download_images),
            incremental: flag_pair(self.incremental, self.no_incremental),
            delay: self.delay,
            assets_dir_name: self.assets_dir_name.clone(),
        }
    }

    /// Explicit `--config`, else `config.toml` in the working directory if present
    fn config_path(&self) -> anyhow::Result<Option<PathBuf>> {
        match &self.config {
            Some(path) => {
                if !path.exists() {
                    anyhow::bail!("Config file not found: {}", path.display());
                }
                Ok(Some(path.clone()))
            }
            None => {
                let default = Path::new(DEFAULT_CONFIG_FILE);
                Ok(default.exists().then(|| default.to_path_buf()))
            }
        }
    }
}

fn flag_pair(on: bool, off: bool) -> Option<bool> {
    match (on, off) {
        (true, _) => Some(true),
        (_, true) => Some(false),
        _ => None,
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let config_path = cli.config_path()?;
    match &config_path {
        Some(path) => tracing::info!("Loading configuration from: {}", path.display()),
        None => tracing::info!("No configuration file found, using defaults"),
    }

    let (config, config_hash) = load_config_with_hash(config_path.as_deref(), &cli.overrides())
        .context("Failed to load configuration")?;
    if let Some(hash) = config_hash {
        tracing::info!("Configuration loaded successfully (hash: {})", hash);
    }

    if cli.dry_run {
        handle_dry_run(&config);
        return Ok(());
    }

    handle_download(config).await
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("substack_dl=info,warn"),
            1 => EnvFilter::new("substack_dl=debug,info"),
            2 => EnvFilter::new("substack_dl=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles the --dry-run mode: shows the resolved configuration and targets
fn handle_dry_run(config: &Config) {
    println!("=== substack-dl Dry Run ===\n");

    println!("Settings:");
    println!("  Formats: {}", config.normalized_formats().join(", "));
    println!("  Output directory: {}", config.output_dir.display());
    println!("  Download images: {}", config.download_images);
    println!("  Incremental: {}", config.incremental);
    println!("  Delay: {}s", config.delay);
    println!("  Assets directory name: {}", config.assets_dir_name);
    println!("  User agent: {}", config.user_agent);

    let targets = source_output_dirs(config);
    println!("\nSources ({}):", targets.len());
    for (source, dir) in &targets {
        println!("  - {} -> {}", source, dir.display());
    }

    println!("\n✓ Configuration is valid");
}

/// Handles the main download operation
async fn handle_download(config: Config) -> anyhow::Result<()> {
    tracing::info!(
        "Sources: {}, formats: {}",
        config.substack_urls.len(),
        config.normalized_formats().join(", ")
    );

    let summaries = download(config)
        .await
        .context("Failed to initialize HTTP client")?;

    print_run_summary(&summaries);
    tracing::info!("Run complete");
    Ok(())
}
