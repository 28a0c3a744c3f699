//! Reprojection between the dataset CRS and WGS84 using PROJ.

use anyhow::{Context, Result};
use geo::{Coord, MapCoords, MultiPolygon};
use proj::Proj;
use tracing::info;

use super::BagSubset;
use crate::models::{Bounds, BuildingRecord};

/// Geographic CRS of the Overpass features
pub const WGS84: &str = "EPSG:4326";

/// Coordinate transformation between two CRS definitions.
///
/// `Proj::new_known_crs` normalizes axis order, so geographic coordinates
/// are always (lon, lat).
pub struct Reprojector {
    proj: Option<Proj>,
    source: String,
    target: String,
}

impl Reprojector {
    pub fn new(source: &str, target: &str) -> Result<Self> {
        let proj = if source.eq_ignore_ascii_case(target) {
            None
        } else {
            Some(Proj::new_known_crs(source, target, None).with_context(|| {
                format!("Failed to create projection from {} to {}", source, target)
            })?)
        };

        Ok(Self {
            proj,
            source: source.to_string(),
            target: target.to_string(),
        })
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn is_identity(&self) -> bool {
        self.proj.is_none()
    }

    pub fn transform_coord(&self, coord: Coord<f64>) -> Result<Coord<f64>> {
        match &self.proj {
            None => Ok(coord),
            Some(proj) => {
                let (x, y) = proj
                    .convert((coord.x, coord.y))
                    .context("Coordinate transformation failed")?;
                Ok(Coord { x, y })
            }
        }
    }

    pub fn transform_multi_polygon(&self, geom: &MultiPolygon<f64>) -> Result<MultiPolygon<f64>> {
        if self.is_identity() {
            return Ok(geom.clone());
        }
        geom.try_map_coords(|c| self.transform_coord(c))
    }

    /// Envelope of the transformed bounds corners, as (min_x, min_y, max_x, max_y)
    pub fn transform_bounds(&self, bounds: &Bounds) -> Result<(f64, f64, f64, f64)> {
        let mut min_x = f64::INFINITY;
        let mut min_y = f64::INFINITY;
        let mut max_x = f64::NEG_INFINITY;
        let mut max_y = f64::NEG_INFINITY;

        for (lon, lat) in bounds.corners() {
            let c = self.transform_coord(Coord { x: lon, y: lat })?;
            min_x = min_x.min(c.x);
            min_y = min_y.min(c.y);
            max_x = max_x.max(c.x);
            max_y = max_y.max(c.y);
        }

        Ok((min_x, min_y, max_x, max_y))
    }
}

/// Reproject every building of the subset to `target`
pub fn reproject_buildings(subset: BagSubset, target: &str) -> Result<Vec<BuildingRecord>> {
    let reprojector = Reprojector::new(&subset.crs, target)?;
    if reprojector.is_identity() {
        return Ok(subset.buildings);
    }

    info!(
        "Reprojecting {} buildings from {} to {}",
        subset.buildings.len(),
        reprojector.source(),
        reprojector.target()
    );

    subset
        .buildings
        .into_iter()
        .map(|building| {
            let geometry = reprojector.transform_multi_polygon(&building.geometry)?;
            Ok(BuildingRecord::new(geometry, building.attributes))
        })
        .collect()
}
