//! Bounding-box filtered reading of BAG features through GDAL.

use std::path::Path;

use anyhow::{Context, Result};
use gdal::spatial_ref::SpatialRef;
use gdal::vector::{FieldValue, LayerAccess};
use gdal::Dataset;
use geo::{Geometry, MultiPolygon, Polygon};
use tracing::{debug, info};

use super::{Reprojector, WGS84};
use crate::models::{Bounds, BuildingAttributes, BuildingRecord};

/// Buildings read from the dataset, still in its native CRS
#[derive(Debug)]
pub struct BagSubset {
    /// CRS of the geometries, as `AUTHORITY:CODE` or WKT
    pub crs: String,
    pub buildings: Vec<BuildingRecord>,
}

/// Load the buildings of `path` that intersect the WGS84 `bounds`.
///
/// Reads `layer_name` when given, the first layer otherwise. Only the
/// export attributes are kept; features without an areal geometry are
/// skipped.
pub fn load_buildings(path: &Path, layer_name: Option<&str>, bounds: &Bounds) -> Result<BagSubset> {
    info!("Loading BAG subset from {}", path.display());

    let dataset = Dataset::open(path)
        .with_context(|| format!("Failed to open dataset {}", path.display()))?;

    let mut layer = match layer_name {
        Some(name) => dataset
            .layer_by_name(name)
            .with_context(|| format!("Layer '{}' not found in {}", name, path.display()))?,
        None => dataset
            .layer(0)
            .with_context(|| format!("Failed to get first layer of {}", path.display()))?,
    };

    let crs = match layer.spatial_ref() {
        Some(srs) => crs_identifier(&srs)?,
        None => WGS84.to_string(),
    };
    info!("Layer '{}' uses CRS {}", layer.name(), crs);

    let to_native = Reprojector::new(WGS84, &crs)?;
    let (min_x, min_y, max_x, max_y) = to_native.transform_bounds(bounds)?;
    debug!(
        "Spatial filter in native CRS: [{}, {}, {}, {}]",
        min_x, min_y, max_x, max_y
    );
    layer.set_spatial_filter_rect(min_x, min_y, max_x, max_y);

    let mut buildings = Vec::new();
    let mut skipped = 0usize;

    for feature in layer.features() {
        let geometry = match feature.geometry().map(|g| g.to_geo()) {
            Some(Ok(geometry)) => geometry,
            Some(Err(e)) => {
                debug!("Skipping feature {:?}: {}", feature.fid(), e);
                skipped += 1;
                continue;
            }
            None => {
                skipped += 1;
                continue;
            }
        };

        let Some(geometry) = into_multi_polygon(geometry) else {
            debug!("Skipping non-areal feature {:?}", feature.fid());
            skipped += 1;
            continue;
        };

        let mut attributes = BuildingAttributes::default();
        for (name, value) in feature.fields() {
            if BuildingAttributes::FIELDS.contains(&name.as_str()) {
                attributes.set(&name, value.and_then(render_field));
            }
        }

        buildings.push(BuildingRecord::new(geometry, attributes));
    }

    info!(
        "Loaded {} buildings ({} skipped without areal geometry)",
        buildings.len(),
        skipped
    );

    Ok(BagSubset { crs, buildings })
}

/// Identify a spatial reference for PROJ, preferring its authority code
fn crs_identifier(srs: &SpatialRef) -> Result<String> {
    if let (Some(name), Ok(code)) = (srs.auth_name(), srs.auth_code()) {
        return Ok(format!("{}:{}", name, code));
    }
    srs.to_wkt().context("Failed to export layer CRS as WKT")
}

/// Keep the polygonal parts of a geometry
fn into_multi_polygon(geometry: Geometry<f64>) -> Option<MultiPolygon<f64>> {
    let mut polygons: Vec<Polygon<f64>> = Vec::new();
    collect_polygons(geometry, &mut polygons);

    if polygons.is_empty() {
        None
    } else {
        Some(MultiPolygon::new(polygons))
    }
}

fn collect_polygons(geometry: Geometry<f64>, out: &mut Vec<Polygon<f64>>) {
    match geometry {
        Geometry::Polygon(p) => out.push(p),
        Geometry::MultiPolygon(mp) => out.extend(mp.0),
        Geometry::Rect(r) => out.push(r.to_polygon()),
        Geometry::Triangle(t) => out.push(t.to_polygon()),
        Geometry::GeometryCollection(gc) => {
            for g in gc.0 {
                collect_polygons(g, out);
            }
        }
        _ => {}
    }
}

/// Render an attribute value as CSV text; integers carry no decimal part
fn render_field(value: FieldValue) -> Option<String> {
    match value {
        FieldValue::StringValue(s) => Some(s),
        FieldValue::IntegerValue(i) => Some(i.to_string()),
        FieldValue::Integer64Value(i) => Some(i.to_string()),
        FieldValue::RealValue(r) => Some(r.to_string()),
        other => other.into_string(),
    }
}
