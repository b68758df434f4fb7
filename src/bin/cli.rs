//! mogi-crawler CLI
//!
//! Local execution entry point for catalog crawls.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use mogi_crawler::{
    error::Result,
    models::Config,
    pipeline,
    services::FetchEngine,
    storage::LocalStorage,
};

/// mogi-crawler - Real-estate catalog crawler
#[derive(Parser, Debug)]
#[command(
    name = "mogi-crawler",
    version,
    about = "Crawls mogi.vn real-estate catalogs into deduplicated CSV record sets"
)]
struct Cli {
    /// Path to the configuration file
    #[arg(short, long, default_value = "data/config.toml")]
    config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Crawl all configured categories and write the final CSV
    Crawl {
        /// Override pages walked per category
        #[arg(long)]
        max_pages: Option<u32>,

        /// Override detail visits per page
        #[arg(long)]
        max_items: Option<usize>,

        /// Override the output directory
        #[arg(short, long)]
        output: Option<String>,

        /// Disable per-page checkpoint artifacts
        #[arg(long)]
        no_checkpoint: bool,
    },

    /// Validate the configuration file
    Validate,

    /// List output artifacts from previous runs
    Info,
}

/// Initialize logging based on verbosity flag.
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

/// Main entry point for the CLI application.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    log::info!("mogi-crawler starting...");

    let mut config = Config::load_or_default(&cli.config);

    match cli.command {
        Command::Crawl {
            max_pages,
            max_items,
            output,
            no_checkpoint,
        } => {
            if let Some(pages) = max_pages {
                config.limits.max_pages_per_category = pages;
            }
            if let Some(items) = max_items {
                config.limits.max_items_per_page = items;
            }
            if let Some(dir) = output {
                config.output.dir = dir;
            }
            if no_checkpoint {
                config.output.checkpoint = false;
            }

            log::info!(
                "crawling {} categories, up to {} pages x {} items each",
                config.site.categories.len(),
                config.limits.max_pages_per_category,
                config.limits.max_items_per_page
            );

            let storage = LocalStorage::new(&config.output.dir, &config.output.file_prefix);
            let summary =
                pipeline::run_crawl(&config, &storage, || FetchEngine::new(&config.crawler))
                    .await?;

            let elapsed = summary.finished_at - summary.started_at;
            log::info!(
                "crawl complete: {} records ({} unique URLs seen) in {}s",
                summary.total_records,
                summary.unique_urls,
                elapsed.num_seconds()
            );
            if summary.category_failures > 0 {
                log::warn!(
                    "{} of {} categories were abandoned",
                    summary.category_failures,
                    config.site.categories.len()
                );
            }
            match summary.output_path {
                Some(path) => log::info!("output file: {}", path.display()),
                None => log::warn!("no output file written"),
            }
        }

        Command::Validate => {
            log::info!("Validating configuration...");

            if let Err(e) = config.validate() {
                log::error!("Config validation failed: {}", e);
                return Err(e);
            }
            log::info!(
                "✓ Config OK ({} categories, {} price matchers)",
                config.site.categories.len(),
                config.extraction.price.len()
            );
        }

        Command::Info => {
            let dir = PathBuf::from(&config.output.dir);
            log::info!("Output directory: {}", dir.display());

            match std::fs::read_dir(&dir) {
                Ok(entries) => {
                    let mut artifacts: Vec<_> = entries
                        .filter_map(|e| e.ok())
                        .map(|e| e.path())
                        .filter(|p| p.extension().is_some_and(|ext| ext == "csv"))
                        .collect();
                    artifacts.sort();

                    if artifacts.is_empty() {
                        log::info!("No output artifacts yet.");
                    }
                    for path in artifacts {
                        let kind = if path
                            .file_stem()
                            .and_then(|s| s.to_str())
                            .is_some_and(|s| s.ends_with("_partial"))
                        {
                            "checkpoint"
                        } else {
                            "final"
                        };
                        log::info!("  [{kind}] {}", path.display());
                    }
                }
                Err(_) => log::info!("No output directory yet."),
            }
        }
    }

    log::info!("Done!");

    Ok(())
}
