mod lookup;
mod saved;

use anyhow::Context;
use clap::{Parser, Subcommand};
use parcelmap_core::{load_sources, AppConfig, LatLng, SavedStore};
use parcelmap_resolver::ParcelResolver;
use tracing_subscriber::EnvFilter;

use crate::saved::SavedCommands;

#[derive(Debug, Parser)]
#[command(name = "parcelmap-cli")]
#[command(about = "Parcel lookup, address search and saved-property reports")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Resolve a coordinate to a parcel record
    Identify {
        /// Latitude in decimal degrees (WGS84)
        #[arg(long, allow_negative_numbers = true)]
        lat: f64,
        /// Longitude in decimal degrees (WGS84)
        #[arg(long, allow_negative_numbers = true)]
        lng: f64,
        /// Add the result to the saved list
        #[arg(long)]
        save: bool,
    },
    /// Search for an address
    Search {
        /// Free-text address or place
        query: String,
    },
    /// Manage the saved-property list
    Saved {
        #[command(subcommand)]
        command: SavedCommands,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let config = parcelmap_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Identify { lat, lng, save } => {
            let point = LatLng::new(lat, lng);
            if !point.is_valid() {
                anyhow::bail!("coordinates out of range: lat must be within [-90, 90] and lng within [-180, 180]");
            }
            let resolver = build_resolver(&config)?;
            let mut store = if save {
                Some(SavedStore::open(&config.saved_path)?)
            } else {
                None
            };
            lookup::run_identify(&resolver, store.as_mut(), point).await?;
        }
        Commands::Search { query } => {
            let resolver = build_resolver(&config)?;
            lookup::run_search(&resolver, &query).await?;
        }
        Commands::Saved { command } => {
            let mut store = SavedStore::open(&config.saved_path)?;
            saved::run_saved(&mut store, command)?;
        }
    }

    Ok(())
}

fn build_resolver(config: &AppConfig) -> anyhow::Result<ParcelResolver> {
    let sources = load_sources(&config.sources_path).with_context(|| {
        format!(
            "failed to load sources from {}",
            config.sources_path.display()
        )
    })?;
    Ok(ParcelResolver::from_config(config, sources)?)
}
