use std::sync::Arc;

use axum::{
    Router,
    extract::{Path, Query, State},
    response::{IntoResponse, Json, Response},
    routing::get,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{info, instrument, warn};

use crate::{
    DirectoryError, Result, VERSION,
    config::MapConfig,
    dataset::Dataset,
    map::{Marker, TileLayer, ViewportChange},
    models::{FilterKey, FilterOptions, Municipality, PreschoolCard, PreschoolDetail, SearchFilters},
    page::{DirectoryPage, ViewMode},
};

/// Shared, read-only state of the HTTP handlers
#[derive(Clone)]
pub struct AppState {
    pub dataset: Arc<Dataset>,
    pub map: Arc<MapConfig>,
}

impl AppState {
    #[must_use]
    pub fn new(dataset: Dataset, map: MapConfig) -> Self {
        Self {
            dataset: Arc::new(dataset),
            map: Arc::new(map),
        }
    }
}

/// Page inputs as sent by the browser. Empty values mean "all".
#[derive(Debug, Default, Deserialize)]
pub struct ViewQuery {
    pub q: Option<String>,
    pub municipality: Option<String>,
    pub specialty: Option<String>,
    pub language: Option<String>,
    pub min_rating: Option<String>,
    pub selected: Option<String>,
    pub mode: Option<String>,
    /// Comma-separated ids of the subset the client's map is fitted to.
    /// Absent until the client has rendered a view.
    pub synced: Option<String>,
}

impl ViewQuery {
    fn filters(&self) -> Result<SearchFilters> {
        SearchFilters::from_params(
            self.municipality.as_deref(),
            self.specialty.as_deref(),
            self.language.as_deref(),
            self.min_rating.as_deref(),
        )
    }

    /// Rebuild the page these inputs describe
    pub fn into_page(self, state: &AppState) -> Result<DirectoryPage> {
        let filters = self.filters()?;
        let dataset = Arc::clone(&state.dataset);
        let query = self.q.unwrap_or_default();
        let mut page = match self.synced.as_deref() {
            Some(synced) => {
                let ids = synced
                    .split(',')
                    .filter(|id| !id.is_empty())
                    .map(str::to_string)
                    .collect();
                DirectoryPage::resume(dataset, &state.map, query, filters, ids)
            }
            None => DirectoryPage::with_inputs(dataset, &state.map, query, filters),
        };
        page.set_view_mode(self.mode.as_deref().unwrap_or_default().parse()?);
        if let Some(id) = self.selected.as_deref().filter(|id| !id.is_empty()) {
            page.select(id)?;
        }
        Ok(page)
    }
}

/// A set criterion as shown in the active-filter badges
#[derive(Debug, Serialize, Deserialize)]
pub struct ActiveFilter {
    pub key: FilterKey,
    pub label: String,
    pub value: String,
}

/// Everything the browser needs to render the page
#[derive(Debug, Serialize, Deserialize)]
pub struct ViewResponse {
    pub query: String,
    pub filters: SearchFilters,
    pub active_filters: Vec<ActiveFilter>,
    pub active_filter_count: usize,
    pub results_count: usize,
    pub empty_message: Option<String>,
    pub view_mode: ViewMode,
    pub cards: Vec<PreschoolCard>,
    pub markers: Vec<Marker>,
    pub viewport: ViewportChange,
    /// Value for the client to send back as `synced`
    pub synced: String,
    pub selected: Option<PreschoolDetail>,
    pub tile_layer: TileLayer,
}

impl ViewResponse {
    fn new(page: &DirectoryPage, map: &MapConfig) -> Self {
        let active_filters: Vec<ActiveFilter> = page
            .filters()
            .active()
            .into_iter()
            .map(|(key, value)| ActiveFilter {
                key,
                label: key.label().to_string(),
                value,
            })
            .collect();
        Self {
            query: page.query().to_string(),
            filters: page.filters().clone(),
            active_filter_count: active_filters.len(),
            active_filters,
            results_count: page.results_count(),
            empty_message: page.empty_message().map(str::to_string),
            view_mode: page.view_mode(),
            cards: page.cards(),
            markers: page.markers(),
            viewport: page.last_change(),
            synced: page.synced_ids().join(","),
            selected: page.selected_detail(),
            tile_layer: TileLayer::from(map),
        }
    }
}

impl IntoResponse for DirectoryError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            warn!("Request failed: {self}");
        }
        (status, Json(json!({ "error": self.user_message() }))).into_response()
    }
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/view", get(get_view))
        .route("/preschools", get(get_preschools))
        .route("/preschools/{id}", get(get_preschool))
        .route("/municipalities", get(get_municipalities))
        .route("/filters", get(get_filters))
}

async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok", "version": VERSION }))
}

#[instrument(skip(state))]
async fn get_view(
    State(state): State<AppState>,
    Query(params): Query<ViewQuery>,
) -> Result<Json<ViewResponse>> {
    let page = params.into_page(&state)?;
    info!(
        results = page.results_count(),
        active_filters = page.filters().active_count(),
        "Rendered directory view"
    );
    Ok(Json(ViewResponse::new(&page, &state.map)))
}

#[instrument(skip(state))]
async fn get_preschools(
    State(state): State<AppState>,
    Query(params): Query<ViewQuery>,
) -> Result<Json<Vec<PreschoolCard>>> {
    let page = params.into_page(&state)?;
    Ok(Json(page.cards()))
}

#[instrument(skip(state))]
async fn get_preschool(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<PreschoolDetail>> {
    let preschool = state.dataset.require_preschool(&id)?;
    Ok(Json(PreschoolDetail::from(preschool)))
}

async fn get_municipalities(State(state): State<AppState>) -> Json<Vec<Municipality>> {
    Json(state.dataset.municipalities().to_vec())
}

async fn get_filters(State(state): State<AppState>) -> Json<FilterOptions> {
    Json(state.dataset.filter_options())
}
