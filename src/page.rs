//! State of the directory page
//!
//! [`DirectoryPage`] owns every input of the page (free-text query, filter
//! criteria, view mode, selection) and the state derived from them (filtered
//! subset, map viewport). Each input change runs [`DirectoryPage::recompute`],
//! which refilters the dataset and syncs the map view.

use std::fmt::Display;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::config::MapConfig;
use crate::dataset::Dataset;
use crate::map::{self, MapView, Marker, Viewport, ViewportChange};
use crate::models::{FilterKey, Preschool, PreschoolCard, PreschoolDetail, SearchFilters};
use crate::search;
use crate::{DirectoryError, Result};

/// Shown in place of the list when nothing matches
pub const NO_RESULTS_MESSAGE: &str = "Inga förskolor hittades med dina sökkriterier.";

/// Which panel fills the main area
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    #[default]
    Map,
    List,
}

impl Display for ViewMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ViewMode::Map => f.write_str("map"),
            ViewMode::List => f.write_str("list"),
        }
    }
}

impl FromStr for ViewMode {
    type Err = DirectoryError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "" | "map" => Ok(ViewMode::Map),
            "list" => Ok(ViewMode::List),
            other => Err(DirectoryError::validation(format!(
                "Unknown view mode '{other}', expected 'map' or 'list'"
            ))),
        }
    }
}

/// Page-level state: inputs plus the subset and viewport derived from them
#[derive(Debug, Clone)]
pub struct DirectoryPage {
    dataset: Arc<Dataset>,
    query: String,
    filters: SearchFilters,
    view_mode: ViewMode,
    selected: Option<String>,
    map: MapView,
    /// Positions of the filtered records in the dataset
    results: Vec<usize>,
    last_change: ViewportChange,
}

impl DirectoryPage {
    /// Page showing the whole dataset with the map fitted to it
    #[must_use]
    pub fn new(dataset: Arc<Dataset>, map_config: &MapConfig) -> Self {
        Self::with_inputs(dataset, map_config, String::new(), SearchFilters::default())
    }

    /// Page for the given query and criteria, filtered and fitted once
    #[must_use]
    pub fn with_inputs(
        dataset: Arc<Dataset>,
        map_config: &MapConfig,
        query: String,
        filters: SearchFilters,
    ) -> Self {
        Self::build(dataset, MapView::new(map_config), query, filters)
    }

    /// Like [`DirectoryPage::with_inputs`] for a client whose map already
    /// shows the subset `synced_ids`; the viewport only moves if it differs.
    #[must_use]
    pub fn resume(
        dataset: Arc<Dataset>,
        map_config: &MapConfig,
        query: String,
        filters: SearchFilters,
        synced_ids: Vec<String>,
    ) -> Self {
        let map = MapView::resume(map_config, synced_ids);
        Self::build(dataset, map, query, filters)
    }

    fn build(dataset: Arc<Dataset>, map: MapView, query: String, filters: SearchFilters) -> Self {
        let mut page = Self {
            dataset,
            query,
            filters,
            view_mode: ViewMode::default(),
            selected: None,
            map,
            results: Vec::new(),
            last_change: ViewportChange::Unchanged,
        };
        page.recompute();
        page
    }

    /// Replace the free-text query
    pub fn set_search_query(&mut self, query: impl Into<String>) -> ViewportChange {
        let query = query.into();
        if query == self.query {
            return ViewportChange::Unchanged;
        }
        self.query = query;
        self.recompute()
    }

    /// Replace all filter criteria
    pub fn set_filters(&mut self, filters: SearchFilters) -> ViewportChange {
        if filters == self.filters {
            return ViewportChange::Unchanged;
        }
        self.filters = filters;
        self.recompute()
    }

    /// Set one criterion from a control value; an empty value unsets it
    pub fn update_filter(&mut self, key: FilterKey, value: &str) -> Result<ViewportChange> {
        let mut filters = self.filters.clone();
        filters.set(key, value)?;
        Ok(self.set_filters(filters))
    }

    /// Unset one criterion
    pub fn remove_filter(&mut self, key: FilterKey) -> ViewportChange {
        let mut filters = self.filters.clone();
        filters.remove(key);
        self.set_filters(filters)
    }

    /// Unset every criterion
    pub fn clear_filters(&mut self) -> ViewportChange {
        self.set_filters(SearchFilters::default())
    }

    pub fn set_view_mode(&mut self, mode: ViewMode) {
        self.view_mode = mode;
    }

    /// Select a preschool by id, replacing any previous selection
    pub fn select(&mut self, id: &str) -> Result<&Preschool> {
        let preschool = self.dataset.require_preschool(id)?;
        debug!(id, "Preschool selected");
        self.selected = Some(preschool.id.clone());
        Ok(preschool)
    }

    /// Dismiss the detail view
    pub fn close_details(&mut self) {
        self.selected = None;
    }

    /// Refilter the dataset and sync the map to the new subset
    #[instrument(skip(self), fields(query = %self.query))]
    pub fn recompute(&mut self) -> ViewportChange {
        self.results = search::matching_indices(self.dataset.preschools(), &self.query, &self.filters);
        let dataset = Arc::clone(&self.dataset);
        let subset: Vec<&Preschool> = self
            .results
            .iter()
            .map(|&index| &dataset.preschools()[index])
            .collect();
        self.last_change = self.map.sync(&subset);
        debug!(
            results = self.results.len(),
            active_filters = self.filters.active_count(),
            "Recomputed filtered preschools"
        );
        self.last_change
    }

    #[must_use]
    pub fn query(&self) -> &str {
        &self.query
    }

    #[must_use]
    pub fn filters(&self) -> &SearchFilters {
        &self.filters
    }

    #[must_use]
    pub fn view_mode(&self) -> ViewMode {
        self.view_mode
    }

    #[must_use]
    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    /// The filtered subset in source order
    #[must_use]
    pub fn filtered(&self) -> Vec<&Preschool> {
        self.results
            .iter()
            .map(|&index| &self.dataset.preschools()[index])
            .collect()
    }

    #[must_use]
    pub fn results_count(&self) -> usize {
        self.results.len()
    }

    /// Message replacing the list when the subset is empty
    #[must_use]
    pub fn empty_message(&self) -> Option<&'static str> {
        self.results.is_empty().then_some(NO_RESULTS_MESSAGE)
    }

    #[must_use]
    pub fn selected(&self) -> Option<&Preschool> {
        self.selected
            .as_deref()
            .and_then(|id| self.dataset.preschool(id))
    }

    #[must_use]
    pub fn is_selected(&self, id: &str) -> bool {
        self.selected.as_deref() == Some(id)
    }

    #[must_use]
    pub fn selected_detail(&self) -> Option<PreschoolDetail> {
        self.selected().map(PreschoolDetail::from)
    }

    /// Cards for the filtered subset, the selected one flagged
    #[must_use]
    pub fn cards(&self) -> Vec<PreschoolCard> {
        self.filtered()
            .into_iter()
            .map(|p| PreschoolCard::new(p, self.is_selected(&p.id)))
            .collect()
    }

    #[must_use]
    pub fn markers(&self) -> Vec<Marker> {
        map::markers(&self.filtered())
    }

    #[must_use]
    pub fn viewport(&self) -> Viewport {
        self.map.viewport()
    }

    /// Ids the map is fitted to, i.e. the current subset in source order
    #[must_use]
    pub fn synced_ids(&self) -> &[String] {
        self.map.synced_ids().unwrap_or_default()
    }

    /// Viewport instruction produced by the latest recomputation
    #[must_use]
    pub fn last_change(&self) -> ViewportChange {
        self.last_change
    }
}
