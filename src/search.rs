//! Free-text and criteria filtering over the preschool list
//!
//! A record matches when every constraint holds: the free-text query is a
//! case-insensitive substring of its name, address, municipality or
//! description, and each set criterion agrees with the record. Results keep
//! source order.

use crate::models::{Preschool, SearchFilters};

/// A free-text query, lowercased once per scan
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchQuery {
    needle: Option<String>,
}

impl SearchQuery {
    #[must_use]
    pub fn new(query: &str) -> Self {
        let needle = (!query.is_empty()).then(|| query.to_lowercase());
        Self { needle }
    }

    /// Whether the query occurs in any searchable text field of the record
    #[must_use]
    pub fn matches(&self, preschool: &Preschool) -> bool {
        let Some(needle) = &self.needle else {
            return true;
        };
        [
            &preschool.name,
            &preschool.address,
            &preschool.municipality,
            &preschool.description,
        ]
        .into_iter()
        .any(|field| field.to_lowercase().contains(needle.as_str()))
    }
}

/// Whether a record satisfies every set criterion
#[must_use]
pub fn matches_filters(preschool: &Preschool, filters: &SearchFilters) -> bool {
    let municipality = filters
        .municipality
        .as_ref()
        .is_none_or(|m| preschool.municipality == *m);
    let specialty = filters
        .specialty
        .as_ref()
        .is_none_or(|s| preschool.specialties.contains(s));
    let language = filters
        .language
        .as_ref()
        .is_none_or(|l| preschool.languages.contains(l));
    let rating = filters.min_rating.is_none_or(|min| preschool.rating >= min);

    municipality && specialty && language && rating
}

/// The full predicate: free text AND criteria
#[must_use]
pub fn matches(preschool: &Preschool, query: &SearchQuery, filters: &SearchFilters) -> bool {
    query.matches(preschool) && matches_filters(preschool, filters)
}

/// Ordered subsequence of `preschools` matching the query and criteria
#[must_use]
pub fn filter_preschools<'a>(
    preschools: &'a [Preschool],
    query: &str,
    filters: &SearchFilters,
) -> Vec<&'a Preschool> {
    let query = SearchQuery::new(query);
    preschools
        .iter()
        .filter(|preschool| matches(preschool, &query, filters))
        .collect()
}

/// Positions in `preschools` of the records [`filter_preschools`] would return
#[must_use]
pub fn matching_indices(preschools: &[Preschool], query: &str, filters: &SearchFilters) -> Vec<usize> {
    let query = SearchQuery::new(query);
    preschools
        .iter()
        .enumerate()
        .filter(|(_, preschool)| matches(preschool, &query, filters))
        .map(|(index, _)| index)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::tests::preschool;
    use rstest::rstest;

    fn ids(results: &[&Preschool]) -> Vec<String> {
        results.iter().map(|p| p.id.clone()).collect()
    }

    fn sample() -> Vec<Preschool> {
        let mut a = preschool("a", "Stockholm", 4.8, 59.33, 18.07);
        a.languages = vec!["Svenska".to_string(), "Engelska".to_string()];
        a.specialties = vec!["Naturpedagogik".to_string()];

        let mut b = preschool("b", "Göteborg", 4.2, 57.70, 11.97);
        b.description = "Vi arbetar enligt Montessori".to_string();
        b.specialties = vec!["Montessori".to_string()];

        let mut c = preschool("c", "Stockholm", 4.6, 59.31, 18.06);
        c.languages = vec!["Svenska".to_string(), "Spanska".to_string()];
        c.specialties = vec!["Musik".to_string(), "Naturpedagogik".to_string()];

        vec![a, b, c]
    }

    #[test]
    fn test_no_constraints_returns_everything_in_order() {
        let records = sample();
        let results = filter_preschools(&records, "", &SearchFilters::default());
        assert_eq!(ids(&results), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_query_in_description_only() {
        let records = sample();
        let results = filter_preschools(&records, "Montessori", &SearchFilters::default());
        assert_eq!(ids(&results), vec!["b"]);
    }

    #[rstest]
    #[case("STOCKHOLM", vec!["a", "c"])]
    #[case("förskola a", vec!["a"])]
    #[case("gatan b", vec!["b"])]
    #[case("göteborg", vec!["b"])]
    #[case("finns inte", vec![])]
    fn test_query_is_case_insensitive(#[case] query: &str, #[case] expected: Vec<&str>) {
        let records = sample();
        let results = filter_preschools(&records, query, &SearchFilters::default());
        assert_eq!(ids(&results), expected);
    }

    #[test]
    fn test_query_does_not_search_specialties() {
        let records = sample();
        let results = filter_preschools(&records, "Musik", &SearchFilters::default());
        assert!(results.is_empty());
    }

    #[test]
    fn test_min_rating_keeps_relative_order() {
        let records = sample();
        let filters = SearchFilters {
            min_rating: Some(4.5),
            ..Default::default()
        };
        let results = filter_preschools(&records, "", &filters);
        assert_eq!(ids(&results), vec!["a", "c"]);
    }

    #[test]
    fn test_min_rating_is_inclusive() {
        let records = sample();
        let filters = SearchFilters {
            min_rating: Some(4.6),
            ..Default::default()
        };
        assert_eq!(ids(&filter_preschools(&records, "", &filters)), vec!["a", "c"]);
    }

    #[rstest]
    #[case(SearchFilters { municipality: Some("Stockholm".into()), ..Default::default() }, vec!["a", "c"])]
    #[case(SearchFilters { municipality: Some("stockholm".into()), ..Default::default() }, vec![])]
    #[case(SearchFilters { specialty: Some("Naturpedagogik".into()), ..Default::default() }, vec!["a", "c"])]
    #[case(SearchFilters { specialty: Some("Natur".into()), ..Default::default() }, vec![])]
    #[case(SearchFilters { language: Some("Spanska".into()), ..Default::default() }, vec!["c"])]
    #[case(
        SearchFilters {
            municipality: Some("Stockholm".into()),
            language: Some("Engelska".into()),
            min_rating: Some(4.0),
            ..Default::default()
        },
        vec!["a"]
    )]
    fn test_criteria_are_exact_and_combined(
        #[case] filters: SearchFilters,
        #[case] expected: Vec<&str>,
    ) {
        let records = sample();
        assert_eq!(ids(&filter_preschools(&records, "", &filters)), expected);
    }

    #[test]
    fn test_query_and_criteria_are_anded() {
        let records = sample();
        let filters = SearchFilters {
            min_rating: Some(4.7),
            ..Default::default()
        };
        let results = filter_preschools(&records, "stockholm", &filters);
        assert_eq!(ids(&results), vec!["a"]);
    }

    #[test]
    fn test_municipality_filter_contains_every_record_of_that_municipality() {
        let records = sample();
        for record in &records {
            let filters = SearchFilters {
                municipality: Some(record.municipality.clone()),
                ..Default::default()
            };
            let results = filter_preschools(&records, "", &filters);
            assert!(results.iter().all(|p| p.municipality == record.municipality));
            assert!(results.iter().any(|p| p.id == record.id));
        }
    }

    #[test]
    fn test_min_rating_has_no_false_negatives() {
        let records = sample();
        for threshold in [0.0, 3.5, 4.2, 4.5, 4.8, 5.0] {
            let filters = SearchFilters {
                min_rating: Some(threshold),
                ..Default::default()
            };
            let results = filter_preschools(&records, "", &filters);
            assert!(results.iter().all(|p| p.rating >= threshold));
            let expected = records.iter().filter(|p| p.rating >= threshold).count();
            assert_eq!(results.len(), expected);
        }
    }

    #[test]
    fn test_filtering_is_idempotent() {
        let records = sample();
        let filters = SearchFilters {
            specialty: Some("Naturpedagogik".into()),
            ..Default::default()
        };
        let first = filter_preschools(&records, "för", &filters);
        let again: Vec<Preschool> = first.iter().map(|p| (*p).clone()).collect();
        let second = filter_preschools(&again, "för", &filters);
        assert_eq!(ids(&first), ids(&second));
    }

    #[test]
    fn test_matching_indices_agree_with_filter() {
        let records = sample();
        let filters = SearchFilters {
            language: Some("Svenska".into()),
            min_rating: Some(4.5),
            ..Default::default()
        };
        assert_eq!(matching_indices(&records, "", &filters), vec![0, 2]);
        assert!(matching_indices(&records, "zzz", &filters).is_empty());
    }

    #[test]
    fn test_empty_query_matches() {
        assert_eq!(SearchQuery::new(""), SearchQuery::default());
        assert!(SearchQuery::new("").matches(&preschool("x", "Lund", 1.0, 0.0, 0.0)));
    }
}
