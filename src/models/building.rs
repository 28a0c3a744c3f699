//! BAG building records.

use geo::{BoundingRect, MultiPolygon};

/// Address attributes carried by a BAG feature.
///
/// Values are kept as text; a missing or null field stays `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildingAttributes {
    pub objectnummer: Option<String>,
    pub straatnaam: Option<String>,
    pub huisnummer: Option<String>,
    pub postcode: Option<String>,
    pub woonplaats: Option<String>,
    pub gebruiksdoel: Option<String>,
    pub functie: Option<String>,
}

impl BuildingAttributes {
    /// Source field names read from the dataset (case-sensitive)
    pub const FIELDS: [&'static str; 7] = [
        "objectnummer",
        "straatnaam",
        "huisnummer",
        "postcode",
        "woonplaats",
        "gebruiksdoel",
        "functie",
    ];

    /// Set an attribute by its source field name.
    ///
    /// Returns `false` for fields that are not part of the export.
    pub fn set(&mut self, field: &str, value: Option<String>) -> bool {
        let slot = match field {
            "objectnummer" => &mut self.objectnummer,
            "straatnaam" => &mut self.straatnaam,
            "huisnummer" => &mut self.huisnummer,
            "postcode" => &mut self.postcode,
            "woonplaats" => &mut self.woonplaats,
            "gebruiksdoel" => &mut self.gebruiksdoel,
            "functie" => &mut self.functie,
            _ => return false,
        };
        *slot = value;
        true
    }
}

/// A building footprint with its address attributes
#[derive(Debug, Clone)]
pub struct BuildingRecord {
    pub geometry: MultiPolygon<f64>,
    pub attributes: BuildingAttributes,
}

impl BuildingRecord {
    pub fn new(geometry: MultiPolygon<f64>, attributes: BuildingAttributes) -> Self {
        Self {
            geometry,
            attributes,
        }
    }

    /// Get the bounding box of this footprint
    pub fn bbox(&self) -> Option<(f64, f64, f64, f64)> {
        self.geometry
            .bounding_rect()
            .map(|rect| (rect.min().x, rect.min().y, rect.max().x, rect.max().y))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::{polygon, MultiPolygon};

    #[test]
    fn test_set_known_fields() {
        let mut attrs = BuildingAttributes::default();
        for field in BuildingAttributes::FIELDS {
            assert!(attrs.set(field, Some(field.to_uppercase())));
        }
        assert_eq!(attrs.straatnaam.as_deref(), Some("STRAATNAAM"));
        assert_eq!(attrs.functie.as_deref(), Some("FUNCTIE"));
    }

    #[test]
    fn test_set_ignores_other_fields() {
        let mut attrs = BuildingAttributes::default();
        assert!(!attrs.set("bouwjaar", Some("1930".to_string())));
        assert!(!attrs.set("Postcode", Some("1011AB".to_string())));
        assert_eq!(attrs, BuildingAttributes::default());
    }

    #[test]
    fn test_bbox() {
        let poly = polygon![
            (x: 4.0, y: 52.0),
            (x: 5.0, y: 52.0),
            (x: 5.0, y: 53.0),
            (x: 4.0, y: 53.0),
        ];
        let record = BuildingRecord::new(
            MultiPolygon::new(vec![poly]),
            BuildingAttributes::default(),
        );
        assert_eq!(record.bbox(), Some((4.0, 52.0, 5.0, 53.0)));

        let empty = BuildingRecord::new(MultiPolygon::new(vec![]), BuildingAttributes::default());
        assert!(empty.bbox().is_none());
    }
}
