//! Solar feature fetcher using a single Overpass query.

use anyhow::{bail, Context, Result};
use reqwest::blocking::Client;
use reqwest::header::CONTENT_TYPE;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, info};

use crate::models::{OsmType, SolarFeature};

pub const DEFAULT_OVERPASS_ENDPOINT: &str = "https://overpass-api.de/api/interpreter";

/// Solar generators inside the Noord-Holland province, with centers for ways and relations.
pub const OVERPASS_QUERY: &str = r#"
[out:json][timeout:180];
area["name"="Noord-Holland"]["admin_level"="4"]->.searchArea;
(
  node["generator:source"="solar"](area.searchArea);
  way["generator:source"="solar"](area.searchArea);
  relation["generator:source"="solar"](area.searchArea);
);
out center;
"#;

#[derive(Debug, Deserialize)]
struct OverpassResponse {
    #[serde(default)]
    elements: Vec<RawElement>,
}

#[derive(Debug, Deserialize)]
struct RawElement {
    #[serde(rename = "type")]
    kind: Option<String>,
    id: Option<i64>,
    lon: Option<f64>,
    lat: Option<f64>,
    center: Option<RawCenter>,
}

#[derive(Debug, Deserialize)]
struct RawCenter {
    lon: f64,
    lat: f64,
}

impl RawElement {
    /// Direct coordinates win over the center; elements with neither are dropped
    fn into_feature(self) -> Option<SolarFeature> {
        let (lon, lat) = match (self.lon, self.lat, self.center) {
            (Some(lon), Some(lat), _) => (lon, lat),
            (_, _, Some(center)) => (center.lon, center.lat),
            _ => {
                debug!("Skipping element {:?} without coordinates", self.id);
                return None;
            }
        };

        let osm_type = self.kind.as_deref().and_then(OsmType::from_overpass);
        Some(SolarFeature::new(self.id, osm_type, lon, lat))
    }
}

/// Parse an Overpass JSON body into solar features
pub fn parse_response(body: &str) -> Result<Vec<SolarFeature>> {
    let response: OverpassResponse =
        serde_json::from_str(body).context("Failed to parse Overpass response")?;

    let total = response.elements.len();
    let features: Vec<SolarFeature> = response
        .elements
        .into_iter()
        .filter_map(RawElement::into_feature)
        .collect();

    if features.len() < total {
        debug!(
            "Dropped {} of {} elements without coordinates",
            total - features.len(),
            total
        );
    }

    Ok(features)
}

/// Fetches solar features from an Overpass interpreter
pub struct OverpassFetcher {
    client: Client,
    endpoint: String,
}

impl OverpassFetcher {
    pub fn new(endpoint: impl Into<String>, user_agent: &str) -> Result<Self> {
        // The blocking client defaults to a 30s timeout; the query carries its own limit.
        let client = Client::builder()
            .user_agent(user_agent)
            .timeout(None::<Duration>)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Run the solar query and parse every element that carries a location
    pub fn fetch_solar_features(&self) -> Result<Vec<SolarFeature>> {
        let body = url::form_urlencoded::Serializer::new(String::new())
            .append_pair("data", OVERPASS_QUERY)
            .finish();

        info!("Querying Overpass at {}...", self.endpoint);

        let response = self
            .client
            .post(&self.endpoint)
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(body)
            .send()
            .with_context(|| format!("Overpass request to {} failed", self.endpoint))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().unwrap_or_default();
            bail!(
                "Overpass query to {} failed with status {}: {}",
                self.endpoint,
                status,
                text.trim()
            );
        }

        let body = response
            .text()
            .context("Failed to read Overpass response body")?;
        let features = parse_response(&body)?;

        info!("Fetched {} solar features", features.len());
        Ok(features)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direct_coordinates() {
        let body = r#"{"elements": [{"type": "node", "id": 42, "lon": 4.9, "lat": 52.3}]}"#;
        let features = parse_response(body).unwrap();
        assert_eq!(features.len(), 1);
        assert_eq!(features[0].osm_id, Some(42));
        assert_eq!(features[0].osm_type, Some(OsmType::Node));
        assert_eq!(features[0].lon(), 4.9);
        assert_eq!(features[0].lat(), 52.3);
    }

    #[test]
    fn test_center_fallback() {
        let body = r#"{"elements": [
            {"type": "way", "id": 7, "center": {"lon": 5.0, "lat": 52.1}, "tags": {"generator:source": "solar"}}
        ]}"#;
        let features = parse_response(body).unwrap();
        assert_eq!(features.len(), 1);
        assert_eq!(features[0].osm_type, Some(OsmType::Way));
        assert_eq!(features[0].lon(), 5.0);
        assert_eq!(features[0].lat(), 52.1);
    }

    #[test]
    fn test_direct_coordinates_win_over_center() {
        let body = r#"{"elements": [
            {"id": 1, "lon": 4.9, "lat": 52.3, "center": {"lon": 5.0, "lat": 52.1}}
        ]}"#;
        let features = parse_response(body).unwrap();
        assert_eq!(features[0].lon(), 4.9);
        assert_eq!(features[0].lat(), 52.3);
    }

    #[test]
    fn test_elements_without_location_are_skipped() {
        let body = r#"{"elements": [
            {"type": "node", "id": 1, "lon": 4.9, "lat": 52.3},
            {"type": "relation", "id": 2},
            {"type": "way", "id": 3, "center": {"lon": 5.0, "lat": 52.1}},
            {"type": "node", "id": 4, "lon": 4.8},
            {"type": "way", "id": 5, "tags": {}}
        ]}"#;
        let features = parse_response(body).unwrap();
        let ids: Vec<Option<i64>> = features.iter().map(|f| f.osm_id).collect();
        assert_eq!(ids, vec![Some(1), Some(3)]);
    }

    #[test]
    fn test_missing_id_and_unknown_type() {
        let body = r#"{"elements": [{"type": "area", "lon": 4.9, "lat": 52.3}]}"#;
        let features = parse_response(body).unwrap();
        assert_eq!(features.len(), 1);
        assert!(features[0].osm_id.is_none());
        assert!(features[0].osm_type.is_none());
    }

    #[test]
    fn test_empty_and_missing_elements() {
        assert!(parse_response(r#"{"elements": []}"#).unwrap().is_empty());
        assert!(parse_response(r#"{"version": 0.6}"#).unwrap().is_empty());
    }

    #[test]
    fn test_malformed_json_is_an_error() {
        assert!(parse_response("<html>rate limited</html>").is_err());
        assert!(parse_response(r#"{"elements": [{"center": {"lon": 5.0}}]}"#).is_err());
    }

    #[test]
    fn test_query_text() {
        assert!(OVERPASS_QUERY.contains("[out:json][timeout:180]"));
        assert!(OVERPASS_QUERY.contains(r#"area["name"="Noord-Holland"]["admin_level"="4"]"#));
        assert!(OVERPASS_QUERY.trim_end().ends_with("out center;"));
    }
}
