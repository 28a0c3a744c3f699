//! Solar installation features as returned by Overpass.

use geo::{BoundingRect, MultiPoint, Point};
use serde::{Deserialize, Serialize};

/// Type of OSM object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OsmType {
    Node,
    Way,
    Relation,
}

impl OsmType {
    /// Parse the `type` field of an Overpass element
    pub fn from_overpass(kind: &str) -> Option<Self> {
        match kind {
            "node" => Some(OsmType::Node),
            "way" => Some(OsmType::Way),
            "relation" => Some(OsmType::Relation),
            _ => None,
        }
    }
}

impl std::fmt::Display for OsmType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OsmType::Node => write!(f, "node"),
            OsmType::Way => write!(f, "way"),
            OsmType::Relation => write!(f, "relation"),
        }
    }
}

/// A solar installation located by its own coordinates or its center.
///
/// The point is always WGS84 with x = longitude, y = latitude.
#[derive(Debug, Clone, PartialEq)]
pub struct SolarFeature {
    pub osm_id: Option<i64>,
    pub osm_type: Option<OsmType>,
    pub point: Point<f64>,
}

impl SolarFeature {
    pub fn new(osm_id: Option<i64>, osm_type: Option<OsmType>, lon: f64, lat: f64) -> Self {
        Self {
            osm_id,
            osm_type,
            point: Point::new(lon, lat),
        }
    }

    pub fn lon(&self) -> f64 {
        self.point.x()
    }

    pub fn lat(&self) -> f64 {
        self.point.y()
    }
}

/// WGS84 bounding box of a set of features
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min_lon: f64,
    pub min_lat: f64,
    pub max_lon: f64,
    pub max_lat: f64,
}

impl Bounds {
    /// Total bounds of the features, `None` when there are none
    pub fn from_features(features: &[SolarFeature]) -> Option<Self> {
        let points: MultiPoint<f64> = features.iter().map(|f| f.point).collect();
        points.bounding_rect().map(|rect| Self {
            min_lon: rect.min().x,
            min_lat: rect.min().y,
            max_lon: rect.max().x,
            max_lat: rect.max().y,
        })
    }

    /// Corners as (lon, lat), counter-clockwise from the south-west
    pub fn corners(&self) -> [(f64, f64); 4] {
        [
            (self.min_lon, self.min_lat),
            (self.max_lon, self.min_lat),
            (self.max_lon, self.max_lat),
            (self.min_lon, self.max_lat),
        ]
    }
}

impl std::fmt::Display for Bounds {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[{}, {}, {}, {}]",
            self.min_lon, self.min_lat, self.max_lon, self.max_lat
        )
    }
}
