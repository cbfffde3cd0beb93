//! Structured filter criteria and the option vocabularies behind the filter controls

use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::str::FromStr;

use crate::{DirectoryError, Result};

/// Specialties offered in the specialty selector
pub const SPECIALTIES: [&str; 9] = [
    "Naturpedagogik",
    "Reggio Emilia",
    "Montessori",
    "Waldorf",
    "Utomhuspedagogik",
    "Mångkultur",
    "Teknik",
    "Musik",
    "Språkutveckling",
];

/// Languages offered in the language selector
pub const LANGUAGES: [&str; 6] = ["Svenska", "Engelska", "Spanska", "Arabiska", "Danska", "Franska"];

/// Minimum-rating thresholds offered in the rating selector
pub const RATING_THRESHOLDS: [f64; 3] = [4.5, 4.0, 3.5];

const MAX_RATING: f64 = 5.0;

/// Structured (non free-text) filter state. `None` means no constraint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchFilters {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub municipality: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub specialty: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_rating: Option<f64>,
}

/// Addresses a single criterion of [`SearchFilters`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterKey {
    Municipality,
    Specialty,
    Language,
    MinRating,
}

impl FilterKey {
    pub const ALL: [FilterKey; 4] = [
        FilterKey::Municipality,
        FilterKey::Specialty,
        FilterKey::Language,
        FilterKey::MinRating,
    ];

    /// Label of the selector controlling this criterion
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            FilterKey::Municipality => "Kommun",
            FilterKey::Specialty => "Specialitet",
            FilterKey::Language => "Språk",
            FilterKey::MinRating => "Minsta betyg",
        }
    }
}

impl Display for FilterKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            FilterKey::Municipality => "municipality",
            FilterKey::Specialty => "specialty",
            FilterKey::Language => "language",
            FilterKey::MinRating => "min_rating",
        };
        f.write_str(name)
    }
}

impl FromStr for FilterKey {
    type Err = DirectoryError;

    fn from_str(s: &str) -> Result<Self> {
        FilterKey::ALL
            .into_iter()
            .find(|key| key.to_string() == s)
            .ok_or_else(|| DirectoryError::validation(format!("Unknown filter '{s}'")))
    }
}

impl SearchFilters {
    /// Build criteria from raw control values; empty strings mean "all"
    pub fn from_params(
        municipality: Option<&str>,
        specialty: Option<&str>,
        language: Option<&str>,
        min_rating: Option<&str>,
    ) -> Result<Self> {
        Ok(Self {
            municipality: non_empty(municipality),
            specialty: non_empty(specialty),
            language: non_empty(language),
            min_rating: min_rating.map(parse_min_rating).transpose()?.flatten(),
        })
    }

    /// Set one criterion from a control value; an empty value unsets it
    pub fn set(&mut self, key: FilterKey, value: &str) -> Result<()> {
        match key {
            FilterKey::Municipality => self.municipality = non_empty(Some(value)),
            FilterKey::Specialty => self.specialty = non_empty(Some(value)),
            FilterKey::Language => self.language = non_empty(Some(value)),
            FilterKey::MinRating => self.min_rating = parse_min_rating(value)?,
        }
        Ok(())
    }

    /// Unset one criterion
    pub fn remove(&mut self, key: FilterKey) {
        match key {
            FilterKey::Municipality => self.municipality = None,
            FilterKey::Specialty => self.specialty = None,
            FilterKey::Language => self.language = None,
            FilterKey::MinRating => self.min_rating = None,
        }
    }

    /// Unset every criterion
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Set criteria with their displayed values, in selector order
    #[must_use]
    pub fn active(&self) -> Vec<(FilterKey, String)> {
        let mut active = Vec::new();
        if let Some(municipality) = &self.municipality {
            active.push((FilterKey::Municipality, municipality.clone()));
        }
        if let Some(specialty) = &self.specialty {
            active.push((FilterKey::Specialty, specialty.clone()));
        }
        if let Some(language) = &self.language {
            active.push((FilterKey::Language, language.clone()));
        }
        if let Some(min_rating) = self.min_rating {
            active.push((FilterKey::MinRating, format!("{min_rating}")));
        }
        active
    }

    #[must_use]
    pub fn active_count(&self) -> usize {
        self.active().len()
    }

    #[must_use]
    pub fn has_active(&self) -> bool {
        self.active_count() > 0
    }
}

/// Parse a minimum-rating control value. Empty and zero mean unset.
pub fn parse_min_rating(value: &str) -> Result<Option<f64>> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(None);
    }
    let rating: f64 = value
        .parse()
        .map_err(|_| DirectoryError::validation(format!("min_rating '{value}' is not a number")))?;
    if !(0.0..=MAX_RATING).contains(&rating) {
        return Err(DirectoryError::validation(format!(
            "min_rating must be between 0 and {MAX_RATING}, got {rating}"
        )));
    }
    // every rating is at least zero, so a zero threshold filters nothing
    Ok((rating > 0.0).then_some(rating))
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// One entry of the rating selector
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RatingOption {
    pub value: f64,
    pub label: String,
}

/// Everything the filter controls offer for selection
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FilterOptions {
    pub municipalities: Vec<String>,
    pub specialties: Vec<String>,
    pub languages: Vec<String>,
    pub ratings: Vec<RatingOption>,
}

impl FilterOptions {
    /// Options for the given municipality names plus the fixed vocabularies
    #[must_use]
    pub fn new(municipalities: Vec<String>) -> Self {
        Self {
            municipalities,
            specialties: SPECIALTIES.iter().map(|s| (*s).to_string()).collect(),
            languages: LANGUAGES.iter().map(|s| (*s).to_string()).collect(),
            ratings: RATING_THRESHOLDS
                .iter()
                .map(|&value| RatingOption {
                    value,
                    label: format!("{value:.1}+ stjärnor"),
                })
                .collect(),
        }
    }
}
