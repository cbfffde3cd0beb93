//! Built-in preschool and municipality data
//!
//! The records are compiled into the binary from `data/*.json` and validated
//! once when the dataset is loaded. Nothing mutates them afterwards.

use std::collections::HashSet;

use tracing::{debug, info};

use crate::models::{FilterOptions, Municipality, Preschool};
use crate::{DirectoryError, Result};

const PRESCHOOLS_JSON: &str = include_str!("../data/preschools.json");
const MUNICIPALITIES_JSON: &str = include_str!("../data/municipalities.json");

/// Highest rating a record may carry
const MAX_RATING: f64 = 5.0;

/// Immutable reference data: preschools and municipalities
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    preschools: Vec<Preschool>,
    municipalities: Vec<Municipality>,
}

impl Dataset {
    /// Load the dataset compiled into the binary
    pub fn builtin() -> Result<Self> {
        let dataset = Self::from_json(PRESCHOOLS_JSON, MUNICIPALITIES_JSON)?;
        info!(
            "Loaded {} preschools across {} municipalities",
            dataset.preschools.len(),
            dataset.municipalities.len()
        );
        Ok(dataset)
    }

    /// Parse preschool and municipality JSON arrays into a checked dataset
    pub fn from_json(preschools: &str, municipalities: &str) -> Result<Self> {
        let preschools: Vec<Preschool> = serde_json::from_str(preschools)
            .map_err(|e| DirectoryError::dataset(format!("Failed to parse preschools: {e}")))?;
        let municipalities: Vec<Municipality> = serde_json::from_str(municipalities)
            .map_err(|e| {
                DirectoryError::dataset(format!("Failed to parse municipalities: {e}"))
            })?;
        Self::new(preschools, municipalities)
    }

    /// Build a dataset from records, checking id uniqueness, coordinates and ratings
    pub fn new(preschools: Vec<Preschool>, municipalities: Vec<Municipality>) -> Result<Self> {
        let mut ids = HashSet::new();
        for preschool in &preschools {
            if !ids.insert(preschool.id.as_str()) {
                return Err(DirectoryError::dataset(format!(
                    "Duplicate preschool id '{}'",
                    preschool.id
                )));
            }
            if !preschool.coordinates.is_valid() {
                return Err(DirectoryError::dataset(format!(
                    "Preschool '{}' has invalid coordinates ({})",
                    preschool.id,
                    preschool.coordinates.format_coordinates()
                )));
            }
            if !(0.0..=MAX_RATING).contains(&preschool.rating) {
                return Err(DirectoryError::dataset(format!(
                    "Preschool '{}' has rating {} outside 0-{MAX_RATING}",
                    preschool.id, preschool.rating
                )));
            }
        }

        let mut municipality_ids = HashSet::new();
        for municipality in &municipalities {
            if !municipality_ids.insert(municipality.id.as_str()) {
                return Err(DirectoryError::dataset(format!(
                    "Duplicate municipality id '{}'",
                    municipality.id
                )));
            }
        }

        debug!(
            "Validated {} preschools and {} municipalities",
            preschools.len(),
            municipalities.len()
        );
        Ok(Self {
            preschools,
            municipalities,
        })
    }

    /// All preschools in source order
    #[must_use]
    pub fn preschools(&self) -> &[Preschool] {
        &self.preschools
    }

    #[must_use]
    pub fn municipalities(&self) -> &[Municipality] {
        &self.municipalities
    }

    /// Look up a preschool by id
    #[must_use]
    pub fn preschool(&self, id: &str) -> Option<&Preschool> {
        self.preschools.iter().find(|p| p.id == id)
    }

    /// Look up a preschool by id, failing with `NotFound`
    pub fn require_preschool(&self, id: &str) -> Result<&Preschool> {
        self.preschool(id)
            .ok_or_else(|| DirectoryError::not_found(format!("No preschool with id '{id}'")))
    }

    /// Options for the filter selectors
    #[must_use]
    pub fn filter_options(&self) -> FilterOptions {
        FilterOptions::new(self.municipalities.iter().map(|m| m.name.clone()).collect())
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::models::Coordinates;

    /// Minimal record used across the crate's unit tests
    pub(crate) fn preschool(id: &str, municipality: &str, rating: f64, lat: f64, lng: f64) -> Preschool {
        Preschool {
            id: id.to_string(),
            name: format!("Förskola {id}"),
            address: format!("Gatan {id}, {municipality}"),
            municipality: municipality.to_string(),
            coordinates: Coordinates::new(lat, lng),
            phone: None,
            email: None,
            website: None,
            description: "En förskola".to_string(),
            age_range: "1-5 år".to_string(),
            capacity: 30,
            opening_hours: "07:00-17:00".to_string(),
            languages: vec!["Svenska".to_string()],
            specialties: vec![],
            rating,
            image_url: None,
        }
    }

    #[test]
    fn test_builtin_dataset_loads() {
        let dataset = Dataset::builtin().unwrap();
        assert_eq!(dataset.preschools().len(), 10);
        assert_eq!(dataset.municipalities().len(), 8);
        assert_eq!(dataset.preschools()[0].id, "1");
    }

    #[test]
    fn test_parse_failure_keeps_serde_detail() {
        let err = Dataset::from_json("[{\"id\": 1}]", "[]").unwrap_err();
        assert!(matches!(err, DirectoryError::Dataset { .. }));
        assert!(err.to_string().contains("Failed to parse preschools: invalid type"));

        let wrapped = anyhow::Error::from(err).context("Failed to load the preschool dataset");
        let chain: Vec<String> = wrapped.chain().map(ToString::to_string).collect();
        assert_eq!(chain[0], "Failed to load the preschool dataset");
        assert!(chain[1].contains("invalid type"));
    }

    #[test]
    fn test_builtin_municipalities_cover_preschools() {
        let dataset = Dataset::builtin().unwrap();
        let names = dataset.filter_options().municipalities;
        for preschool in dataset.preschools() {
            assert!(
                names.contains(&preschool.municipality),
                "{} missing from municipality options",
                preschool.municipality
            );
        }
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let records = vec![
            preschool("a", "Lund", 4.0, 55.7, 13.2),
            preschool("a", "Lund", 4.1, 55.7, 13.2),
        ];
        let err = Dataset::new(records, vec![]).unwrap_err();
        assert!(err.to_string().contains("Duplicate preschool id"));
    }

    #[test]
    fn test_invalid_coordinates_rejected() {
        let records = vec![preschool("a", "Lund", 4.0, 95.0, 13.2)];
        assert!(matches!(
            Dataset::new(records, vec![]),
            Err(DirectoryError::Dataset { .. })
        ));
    }

    #[test]
    fn test_rating_out_of_range_rejected() {
        let records = vec![preschool("a", "Lund", 5.5, 55.7, 13.2)];
        assert!(Dataset::new(records, vec![]).is_err());
    }

    #[test]
    fn test_lookup() {
        let dataset = Dataset::new(vec![preschool("x", "Lund", 4.0, 55.7, 13.2)], vec![]).unwrap();
        assert!(dataset.preschool("x").is_some());
        let err = dataset.require_preschool("y").unwrap_err();
        assert!(matches!(err, DirectoryError::NotFound { .. }));
    }
}
