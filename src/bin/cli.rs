//! placecard CLI
//!
//! Local execution entry point for listing extraction.

use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand};
use log::LevelFilter;
use placecard::{
    error::{AppError, Result},
    models::Config,
    pipeline,
    services::ListingExtractor,
    storage::{ListingStore, LocalStorage},
    utils::find_listing_url,
};

/// placecard - Map Listing Extractor
#[derive(Parser, Debug)]
#[command(
    name = "placecard",
    version,
    about = "Extracts business facts from map-service listing pages"
)]
struct Cli {
    /// Path to the configuration file
    #[arg(short, long, default_value = "storage/config.toml")]
    config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Extract one listing from a URL or a text containing one
    Extract {
        /// Listing URL, or free text with a listing URL inside
        input: String,

        /// Print the record without storing it
        #[arg(long)]
        no_save: bool,

        /// Print the record as JSON
        #[arg(long)]
        json: bool,
    },

    /// Extract every listing URL found in a file, one per line
    Batch {
        /// Text file with listing URLs
        file: PathBuf,

        /// Override the configured cool-down between listings
        #[arg(long)]
        cooldown_ms: Option<u64>,
    },

    /// Show a stored listing, or list all stored URLs
    Show {
        /// Listing URL to show
        url: Option<String>,
    },

    /// Validate configuration
    Validate,
}

/// Initialize logging based on verbosity flag.
///
/// The env filter admits debug output; the effective level is the global max
/// level, which `apply_config_level` may change once the config is loaded.
fn init_logging(verbose: bool) {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug"))
        .format_timestamp_secs()
        .init();
    log::set_max_level(if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    });
}

/// Apply `logging.level` from the config unless `--verbose` was given.
fn apply_config_level(verbose: bool, level: &str) {
    if verbose {
        return;
    }
    match level.parse::<LevelFilter>() {
        Ok(filter) => log::set_max_level(filter.min(LevelFilter::Debug)),
        Err(_) => log::warn!("Unknown logging.level '{level}', keeping info"),
    }
}

/// Main entry point for the CLI application.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = Config::load_or_default(&cli.config);
    apply_config_level(cli.verbose, &config.logging.level);
    log::debug!("Loaded configuration from {}", cli.config.display());

    let storage = LocalStorage::new(&config.storage.dir);

    match cli.command {
        Command::Extract {
            input,
            no_save,
            json,
        } => {
            let url = find_listing_url(&input)
                .ok_or_else(|| AppError::validation("no listing URL found in input"))?;

            let extractor = ListingExtractor::from_config(&config)?;
            let store: Option<&dyn ListingStore> = if no_save { None } else { Some(&storage) };
            let outcome = pipeline::run_extract(&extractor, store, &url).await?;

            if json {
                println!("{}", serde_json::to_string_pretty(&outcome.record)?);
            } else {
                print!("{}", pipeline::render_listing(&outcome.record, &config.locale));
            }

            if let Some(upsert) = outcome.upsert {
                if upsert.success {
                    log::info!("{}", upsert.message);
                } else {
                    log::error!("{}", upsert.message);
                }
            }
        }

        Command::Batch { file, cooldown_ms } => {
            let text = std::fs::read_to_string(&file)?;
            let urls = pipeline::collect_urls(&text);
            if urls.is_empty() {
                log::warn!("No listing URLs found in {}", file.display());
                return Ok(());
            }

            let cooldown = Duration::from_millis(cooldown_ms.unwrap_or(config.batch.cooldown_ms));
            let extractor = ListingExtractor::from_config(&config)?;
            let outcome = pipeline::run_batch(&extractor, Some(&storage), &urls, cooldown).await;

            for (url, error) in &outcome.failed {
                log::warn!("Failed: {url} ({error})");
            }
        }

        Command::Show { url: Some(url) } => match storage.get(&url).await? {
            Some(stored) => {
                print!("{}", pipeline::render_listing(&stored.record, &config.locale));
                log::info!(
                    "First seen {}, updated {}",
                    stored.first_seen,
                    stored.updated_at
                );
            }
            None => log::warn!("No stored listing for {url}"),
        },

        Command::Show { url: None } => {
            let listings = storage.load_all().await?;
            for stored in &listings {
                let title = stored
                    .record
                    .title
                    .as_deref()
                    .unwrap_or(&config.locale.placeholders.title);
                println!("{}  {}", stored.url, title);
            }
            log::info!("{} listings stored", listings.len());
        }

        Command::Validate => pipeline::run_validate(&config)?,
    }

    Ok(())
}
