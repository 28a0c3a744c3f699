//! solar-bag - Export OpenStreetMap solar installations enriched with BAG addresses
//!
//! This library provides the pipeline stages used by the `solar-bag` binary:
//! Overpass fetching, BAG loading, spatial join and CSV export.

pub mod bag;
pub mod join;
pub mod models;
pub mod output;
pub mod overpass;

pub use models::{Bounds, BuildingRecord, SolarFeature};
