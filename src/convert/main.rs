//! Solar installation export.
//!
//! Fetches solar features from Overpass, joins them with BAG building
//! footprints and writes the enriched records to CSV.

mod config;

use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use solar_bag::bag::{load_buildings, reproject_buildings, WGS84};
use solar_bag::join::{spatial_join, BuildingIndex};
use solar_bag::output::{write_csv, OutputRow};
use solar_bag::overpass::OverpassFetcher;
use solar_bag::{Bounds, SolarFeature};

use crate::config::Config;

#[derive(Parser, Debug)]
#[command(name = "solar-bag")]
#[command(about = "Fetch solar panel locations and join with BAG data")]
struct Args {
    /// Path to the BAG dataset (e.g. bag.gpkg)
    #[arg(long = "bag_path")]
    bag_path: PathBuf,

    /// Output CSV path
    #[arg(long, default_value = "output.csv")]
    output: PathBuf,

    /// Layer to read from the BAG dataset (first layer by default)
    #[arg(long)]
    layer: Option<String>,

    /// Optional TOML config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Overpass interpreter URL, overrides the config
    #[arg(long)]
    endpoint: Option<String>,
}

fn main() -> Result<()> {
    // Initialize logging; stdout is reserved for the summary line
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => Config::load_from_file(path)?,
        None => Config::default(),
    };
    if let Some(endpoint) = args.endpoint {
        config.overpass.endpoint = endpoint;
    }

    info!("Solar BAG export");
    info!("BAG dataset: {}", args.bag_path.display());

    let fetcher = OverpassFetcher::new(&config.overpass.endpoint, &config.overpass.user_agent)?;
    let features = fetcher.fetch_solar_features()?;

    let saved = export(
        &features,
        &args.bag_path,
        args.layer.as_deref(),
        &args.output,
        &config.export.country,
    )?;

    println!("{}", summary_line(saved, &args.output));
    Ok(())
}

/// Join fetched features with the BAG subset around them and write the CSV.
///
/// The BAG dataset is only opened when there is at least one feature.
/// Returns the number of rows written.
fn export(
    features: &[SolarFeature],
    bag_path: &Path,
    layer: Option<&str>,
    output: &Path,
    country: &str,
) -> Result<usize> {
    let buildings = match Bounds::from_features(features) {
        Some(bounds) => {
            info!("Solar feature bounds: {}", bounds);
            let subset = load_buildings(bag_path, layer, &bounds)?;
            reproject_buildings(subset, WGS84)?
        }
        None => {
            warn!("Overpass returned no solar features, skipping BAG load");
            Vec::new()
        }
    };

    let index = BuildingIndex::build(buildings);
    let joined = spatial_join(features, &index);

    let rows: Vec<OutputRow> = joined
        .iter()
        .map(|j| OutputRow::from_joined(j, country))
        .collect();
    write_csv(output, &rows)?;

    Ok(rows.len())
}

fn summary_line(saved: usize, output: &Path) -> String {
    format!("Saved {} records to {}", saved, output.display())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_cli_defaults() {
        let args = Args::try_parse_from(["solar-bag", "--bag_path", "bag.gpkg"]).unwrap();
        assert_eq!(args.bag_path, PathBuf::from("bag.gpkg"));
        assert_eq!(args.output, PathBuf::from("output.csv"));
        assert!(args.layer.is_none());
        assert!(args.endpoint.is_none());
    }

    #[test]
    fn test_export_without_features_skips_bag() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("output.csv");
        let missing_bag = dir.path().join("missing.gpkg");

        let saved = export(&[], &missing_bag, None, &output, "Netherlands").unwrap();
        assert_eq!(saved, 0);
        assert!(!missing_bag.exists());

        let content = std::fs::read_to_string(&output).unwrap();
        assert_eq!(
            content,
            "Objectnummer,Street,Housenumber,Postal code,City,Country,Gebruiksdoel,Functie,Company name,Google Maps URL,lon,lat\n"
        );
        assert_eq!(
            summary_line(saved, &output),
            format!("Saved 0 records to {}", output.display())
        );
    }

    #[test]
    fn test_export_with_features_needs_bag() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("output.csv");
        let missing_bag = dir.path().join("missing.gpkg");
        let features = vec![SolarFeature::new(Some(1), None, 4.9, 52.3)];

        assert!(export(&features, &missing_bag, None, &output, "Netherlands").is_err());
        assert!(!output.exists());
    }

    #[test]
    fn test_summary_line() {
        assert_eq!(
            summary_line(12, Path::new("output.csv")),
            "Saved 12 records to output.csv"
        );
    }

    #[test]
    fn test_cli_requires_bag_path() {
        assert!(Args::try_parse_from(["solar-bag", "--output", "x.csv"]).is_err());
    }
}
