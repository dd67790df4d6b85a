mod loader;
mod search;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use vetfind_core::{AppConfig, ConfigError, Environment};
use vetfind_engine::SortCriterion;

#[derive(Debug, Parser)]
#[command(name = "vetfind-cli")]
#[command(about = "Search, filter and rank veterinary clinics")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Filter and rank clinics from a record export
    Search {
        /// Record export to read (defaults to `VETFIND_RECORDS_PATH`)
        #[arg(long)]
        records: Option<PathBuf>,
        /// Free-text query matched against names and service tags
        #[arg(long)]
        query: Option<String>,
        /// Only clinics offering exactly this service tag
        #[arg(long, conflicts_with = "hospital")]
        service: Option<String>,
        /// Only clinics offering the configured hospital service
        #[arg(long)]
        hospital: bool,
        /// Only clinics open at this local time (HH:MM)
        #[arg(long, value_parser = search::parse_time)]
        open_at: Option<chrono::NaiveTime>,
        /// Ordering applied after filtering (rating or distance)
        #[arg(long)]
        sort: Option<SortCriterion>,
        /// Latitude of the reference location
        #[arg(long, requires = "lng", allow_negative_numbers = true)]
        lat: Option<f64>,
        /// Longitude of the reference location
        #[arg(long, requires = "lat", allow_negative_numbers = true)]
        lng: Option<f64>,
        /// Maximum number of rows to print (defaults to `VETFIND_MAX_RESULTS`)
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Load a record export and report what was kept and dropped
    Inspect {
        /// Record export to read (defaults to `VETFIND_RECORDS_PATH`)
        #[arg(long)]
        records: Option<PathBuf>,
    },
}

/// Filter used when neither `RUST_LOG` nor a valid config supplies one.
const FALLBACK_LOG_LEVEL: &str = "info";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = vetfind_core::load_app_config();

    let log_level = config
        .as_ref()
        .map_or(FALLBACK_LOG_LEVEL, |c| c.log_level.as_str());
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(log_level))?;
    let subscriber = tracing_subscriber::fmt().with_env_filter(env_filter);
    if plain_logs(config.as_ref().ok().map(|c| &c.env)) {
        subscriber.with_ansi(false).compact().init();
    } else {
        subscriber.init();
    }

    match cli.command {
        Some(Commands::Search {
            records,
            query,
            service,
            hospital,
            open_at,
            sort,
            lat,
            lng,
            limit,
        }) => {
            let config = config?;
            let path = records.unwrap_or_else(|| config.records_path.clone());
            let service = if hospital {
                Some(config.hospital_tag.clone())
            } else {
                service
            };
            let args = search::SearchArgs {
                query,
                service,
                open_at,
                sort,
                origin: search::resolve_origin(lat, lng, config.origin)?,
                limit: limit.unwrap_or(config.max_results),
            };
            let store = loader::load_store(&path).await?;
            search::run_search(store, &args)?;
        }
        Some(Commands::Inspect { records }) => {
            let path = records_path(records, config.as_ref())?;
            loader::run_inspect(&path).await?;
        }
        None => println!("vetfind-cli ready; try `vetfind-cli search --help`"),
    }

    Ok(())
}

/// Development keeps the colored default format; test and production runs
/// log compact lines without ANSI escapes.
fn plain_logs(env: Option<&Environment>) -> bool {
    matches!(env, Some(Environment::Test | Environment::Production))
}

/// An explicit `--records` path needs no configuration; otherwise the
/// configured path is used, which requires the configuration to be valid.
fn records_path(
    explicit: Option<PathBuf>,
    config: Result<&AppConfig, &ConfigError>,
) -> anyhow::Result<PathBuf> {
    if let Some(path) = explicit {
        return Ok(path);
    }
    match config {
        Ok(config) => Ok(config.records_path.clone()),
        Err(e) => anyhow::bail!("no --records given and configuration is invalid: {e}"),
    }
}
