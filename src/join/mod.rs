//! Spatial join of solar features against building footprints.
//!
//! Buildings are indexed in an R-tree by envelope; each feature point is
//! matched against the candidates with an exact point-in-polygon test.

mod index;
mod within;

pub use index::BuildingIndex;
pub use within::{spatial_join, JoinedRecord};
