//! Overpass API client for solar installations.

mod fetcher;

pub use fetcher::{parse_response, OverpassFetcher, DEFAULT_OVERPASS_ENDPOINT, OVERPASS_QUERY};
