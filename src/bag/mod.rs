//! BAG dataset access.
//!
//! Reads building footprints from a local vector dataset, limited to the
//! area covered by the fetched solar features, and reprojects them to WGS84.

mod loader;
mod reproject;

pub use loader::{load_buildings, BagSubset};
pub use reproject::{reproject_buildings, Reprojector, WGS84};
