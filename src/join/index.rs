//! Spatial index for fast building lookups.

use geo::{Contains, Point};
use rstar::{RTree, RTreeObject, AABB};
use std::sync::Arc;
use tracing::info;

use crate::models::BuildingRecord;

/// Wrapper for R-tree indexing of buildings
#[derive(Clone)]
pub struct IndexedBuilding {
    pub building: Arc<BuildingRecord>,
    /// Position in load order
    position: usize,
    envelope: AABB<[f64; 2]>,
}

impl RTreeObject for IndexedBuilding {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        self.envelope
    }
}

impl IndexedBuilding {
    pub fn new(position: usize, building: BuildingRecord) -> Option<Self> {
        let (min_x, min_y, max_x, max_y) = building.bbox()?;
        Some(Self {
            building: Arc::new(building),
            position,
            envelope: AABB::from_corners([min_x, min_y], [max_x, max_y]),
        })
    }
}

/// Spatial index for building footprints using R-tree
pub struct BuildingIndex {
    tree: RTree<IndexedBuilding>,
}

impl BuildingIndex {
    /// Build spatial index from buildings
    pub fn build(buildings: Vec<BuildingRecord>) -> Self {
        info!("Building spatial index for {} buildings...", buildings.len());

        let indexed: Vec<IndexedBuilding> = buildings
            .into_iter()
            .enumerate()
            .filter_map(|(position, building)| IndexedBuilding::new(position, building))
            .collect();

        let tree = RTree::bulk_load(indexed);

        info!("Spatial index built with {} entries", tree.size());

        Self { tree }
    }

    /// Find all buildings whose footprint contains the point, in load order.
    ///
    /// Containment is strict: a point on a footprint's boundary does not match.
    pub fn lookup(&self, lon: f64, lat: f64) -> Vec<Arc<BuildingRecord>> {
        let point = Point::new(lon, lat);
        let query_envelope = AABB::from_point([lon, lat]);

        // Use R-tree to get candidates via envelope intersection, then filter with exact containment
        let mut matches: Vec<&IndexedBuilding> = self
            .tree
            .locate_in_envelope_intersecting(&query_envelope)
            .filter(|ib| ib.building.geometry.contains(&point))
            .collect();
        matches.sort_by_key(|ib| ib.position);

        matches
            .into_iter()
            .map(|ib| Arc::clone(&ib.building))
            .collect()
    }

    /// Get total number of indexed buildings
    pub fn len(&self) -> usize {
        self.tree.size()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.size() == 0
    }
}
