//! CSV export of joined records.

use std::path::Path;

use anyhow::{Context, Result};
use csv::WriterBuilder;
use serde::Serialize;
use tracing::info;

use crate::join::JoinedRecord;

/// Default value of the `Country` column
pub const DEFAULT_COUNTRY: &str = "Netherlands";

/// Output header, in column order
pub const HEADERS: [&str; 12] = [
    "Objectnummer",
    "Street",
    "Housenumber",
    "Postal code",
    "City",
    "Country",
    "Gebruiksdoel",
    "Functie",
    "Company name",
    "Google Maps URL",
    "lon",
    "lat",
];

/// One CSV row. Field order is the column order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutputRow {
    #[serde(rename = "Objectnummer")]
    pub objectnummer: String,
    #[serde(rename = "Street")]
    pub street: String,
    #[serde(rename = "Housenumber")]
    pub housenumber: String,
    #[serde(rename = "Postal code")]
    pub postal_code: String,
    #[serde(rename = "City")]
    pub city: String,
    #[serde(rename = "Country")]
    pub country: String,
    #[serde(rename = "Gebruiksdoel")]
    pub gebruiksdoel: String,
    #[serde(rename = "Functie")]
    pub functie: String,
    #[serde(rename = "Company name")]
    pub company_name: String,
    #[serde(rename = "Google Maps URL")]
    pub google_maps_url: String,
    pub lon: f64,
    pub lat: f64,
}

impl OutputRow {
    pub fn from_joined(joined: &JoinedRecord, country: &str) -> Self {
        let attrs = &joined.building.attributes;
        let text = |v: &Option<String>| v.clone().unwrap_or_default();
        let lon = joined.feature.lon();
        let lat = joined.feature.lat();

        Self {
            objectnummer: text(&attrs.objectnummer),
            street: text(&attrs.straatnaam),
            housenumber: text(&attrs.huisnummer),
            postal_code: text(&attrs.postcode),
            city: text(&attrs.woonplaats),
            country: country.to_string(),
            gebruiksdoel: text(&attrs.gebruiksdoel),
            functie: text(&attrs.functie),
            company_name: String::new(),
            google_maps_url: google_maps_url(lat, lon),
            lon,
            lat,
        }
    }
}

/// Debug formatting keeps the decimal point of whole coordinates (`5.0`, not `5`),
/// matching the `lon`/`lat` columns.
pub fn google_maps_url(lat: f64, lon: f64) -> String {
    format!("https://maps.google.com/?q={:?},{:?}", lat, lon)
}

/// Write rows to `path`. The header is written even when there are no rows.
pub fn write_csv(path: &Path, rows: &[OutputRow]) -> Result<()> {
    let mut writer = WriterBuilder::new()
        .has_headers(false)
        .from_path(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;

    writer
        .write_record(HEADERS)
        .context("Failed to write CSV header")?;
    for row in rows {
        writer.serialize(row).context("Failed to write CSV row")?;
    }
    writer
        .flush()
        .with_context(|| format!("Failed to flush {}", path.display()))?;

    info!("Wrote {} rows to {}", rows.len(), path.display());
    Ok(())
}
