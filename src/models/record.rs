//! Catalog record: one region ring plus display metadata.

use serde::{Deserialize, Serialize};

use crate::pip::{ExternalId, Region};

/// A single catalog entry.
///
/// Regions made of several rings (islands, exclaves) are stored as several
/// records sharing one `id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogRecord {
    /// External id, e.g. a county FIPS/GEOID code
    pub id: ExternalId,

    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,

    /// Grouping label such as a state or country code
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,

    /// `[min_x, min_y, max_x, max_y]`, derived from `ring`. Indexing always
    /// recomputes it; a stored value that disagrees is reported as stale.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bbox: Option<[f64; 4]>,

    /// Ring as `[x, y]` (`[lon, lat]`) pairs
    #[serde(default)]
    pub ring: Vec<[f64; 2]>,
}

impl CatalogRecord {
    pub fn new(id: ExternalId, name: impl Into<String>, ring: Vec<[f64; 2]>) -> Self {
        let mut record = Self {
            id,
            name: name.into(),
            full_name: None,
            group: None,
            bbox: None,
            ring,
        };
        record.bbox = record.compute_bbox();
        record
    }

    /// Bounding box of `ring`, or `None` when the ring is empty.
    pub fn compute_bbox(&self) -> Option<[f64; 4]> {
        let rect = self.region().bbox()?;
        Some([rect.min().x, rect.min().y, rect.max().x, rect.max().y])
    }

    pub fn region(&self) -> Region {
        Region::from_pairs(&self.ring)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_fills_bbox() {
        let record = CatalogRecord::new(
            6001,
            "Alameda",
            vec![[-122.3, 37.5], [-121.5, 37.5], [-121.5, 37.9], [-122.3, 37.9]],
        );
        assert_eq!(record.bbox, Some([-122.3, 37.5, -121.5, 37.9]));
        assert_eq!(record.region().len(), 4);
    }

    #[test]
    fn test_empty_ring_has_no_bbox() {
        let record = CatalogRecord::new(1, "nowhere", vec![]);
        assert!(record.bbox.is_none());
    }

    #[test]
    fn test_optional_fields_default() {
        let record: CatalogRecord =
            serde_json::from_str(r#"{"id": 7, "name": "x", "ring": [[0, 0], [1, 0], [1, 1]]}"#)
                .unwrap();
        assert_eq!(record.id, 7);
        assert!(record.full_name.is_none());
        assert!(record.bbox.is_none());
        assert_eq!(record.ring.len(), 3);

        let json = serde_json::to_string(&record).unwrap();
        assert!(!json.contains("full_name"));
    }
}
