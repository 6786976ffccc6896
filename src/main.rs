//! Sitewalk main entry point
//!
//! This is the command-line interface for the Sitewalk site crawler.

use anyhow::{bail, Context};
use clap::Parser;
use sitewalk::config::{load_config_with_hash, validate, Config};
use sitewalk::crawler::crawl_site;
use sitewalk::output::print_statistics;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Sitewalk: a worker-pool site crawler
///
/// Sitewalk fetches every page reachable from a seed URL through links that
/// stay on the same domain and under the seed's path.
#[derive(Parser, Debug)]
#[command(name = "sitewalk")]
#[command(version)]
#[command(about = "A worker-pool site crawler", long_about = None)]
struct Cli {
    /// Seed URL, e.g. https://gcc.gnu.org/install/
    #[arg(value_name = "URL")]
    url: String,

    /// Path to TOML configuration file
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Number of worker threads (overrides the config file)
    #[arg(short, long)]
    workers: Option<usize>,

    /// Deepest page whose links are followed (overrides the config file)
    #[arg(short = 'd', long)]
    max_depth: Option<u32>,

    /// Write a markdown summary to this path (overrides the config file)
    #[arg(short, long, value_name = "SUMMARY")]
    summary: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let config = load_effective_config(&cli)?;

    tracing::info!(
        "Crawling {} with {} workers{}",
        cli.url,
        config.crawler.workers,
        config
            .crawler
            .max_depth
            .map(|depth| format!(", max depth {}", depth))
            .unwrap_or_default()
    );

    let stats = match crawl_site(&config, &cli.url) {
        Ok(stats) => stats,
        Err(e) => {
            tracing::error!("Crawl failed: {}", e);
            bail!(e);
        }
    };

    if !cli.quiet {
        print_statistics(&stats);
    }
    if let Some(path) = &config.output.summary_path {
        if !cli.quiet {
            println!("\n✓ Summary written to: {}", path);
        }
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("sitewalk=info,warn"),
            1 => EnvFilter::new("sitewalk=debug,info"),
            2 => EnvFilter::new("sitewalk=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_names(true)
        .with_file(false)
        .init();
}

/// Loads the config file (if any) and applies command-line overrides
fn load_effective_config(cli: &Cli) -> anyhow::Result<Config> {
    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("failed to load {}", path.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            config
        }
        None => Config::default(),
    };

    if let Some(workers) = cli.workers {
        config.crawler.workers = workers;
    }
    if let Some(max_depth) = cli.max_depth {
        config.crawler.max_depth = Some(max_depth);
    }
    if let Some(summary) = &cli.summary {
        config.output.summary_path = Some(summary.display().to_string());
    }

    validate(&config).context("invalid settings")?;
    Ok(config)
}
