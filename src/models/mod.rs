//! Core data models for the solar export pipeline.

pub mod building;
pub mod solar;

pub use building::{BuildingAttributes, BuildingRecord};
pub use solar::{Bounds, OsmType, SolarFeature};
