//! Inner "within" join of solar features against the building index.

use std::sync::Arc;

use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info};

use super::BuildingIndex;
use crate::models::{BuildingRecord, SolarFeature};

/// A solar feature paired with one building that contains it
#[derive(Debug, Clone)]
pub struct JoinedRecord {
    pub feature: SolarFeature,
    pub building: Arc<BuildingRecord>,
}

/// Join every feature with each building containing its point.
///
/// Features inside no building produce no rows; features inside several
/// overlapping buildings produce one row per building. Rows follow feature
/// order, then building load order.
pub fn spatial_join(features: &[SolarFeature], index: &BuildingIndex) -> Vec<JoinedRecord> {
    info!(
        "Joining {} solar features against {} buildings...",
        features.len(),
        index.len()
    );

    let pb = ProgressBar::new(features.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-"),
    );

    let mut joined = Vec::new();
    let mut unmatched = 0usize;

    for feature in features {
        let buildings = index.lookup(feature.lon(), feature.lat());
        if buildings.is_empty() {
            debug!(
                "No building contains feature {:?} at ({}, {})",
                feature.osm_id,
                feature.lon(),
                feature.lat()
            );
            unmatched += 1;
        }

        joined.extend(buildings.into_iter().map(|building| JoinedRecord {
            feature: feature.clone(),
            building,
        }));
        pb.inc(1);
    }

    pb.finish_and_clear();

    info!(
        "Joined {} rows ({} features outside every building)",
        joined.len(),
        unmatched
    );

    joined
}
