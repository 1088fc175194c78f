//! HTTP API over the loaded dataset.
//!
//! Every handler reads from the shared, immutable `Pokedex`; nothing here
//! holds a lock or mutates state.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::pokedex::Pokedex;
use crate::query::Page;
use schema::{FacetSelection, Facets, PokemonSummary};

// ============================================================================
// Application State
// ============================================================================

#[derive(Clone)]
pub struct AppState {
    pub pokedex: Arc<Pokedex>,
    pub default_limit: usize,
}

impl AppState {
    pub fn new(pokedex: Arc<Pokedex>, default_limit: usize) -> Self {
        Self {
            pokedex,
            default_limit,
        }
    }
}

// ============================================================================
// Router
// ============================================================================

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/api/pokemon", get(list_pokemon))
        .route("/api/pokemon/{id}", get(get_pokemon))
        .route("/api/filters", get(get_filters))
        .route("/api/search", get(search_pokemon))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

// ============================================================================
// Errors
// ============================================================================

#[derive(Debug)]
pub enum ApiError {
    NotFound(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::NotFound(message) => {
                (StatusCode::NOT_FOUND, Json(json!({ "error": message }))).into_response()
            }
        }
    }
}

// ============================================================================
// Handlers
// ============================================================================

async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "pokemon": state.pokedex.len(),
    }))
}

#[derive(Debug, Deserialize)]
pub struct ListParams {
    pub skip: Option<i64>,
    pub limit: Option<i64>,
}

async fn list_pokemon(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Json<Vec<PokemonSummary>> {
    let page = Page::from_signed(params.skip, params.limit, state.default_limit);
    let summaries = state
        .pokedex
        .pokemon_many(page)
        .into_iter()
        .map(PokemonSummary::from)
        .collect();
    Json(summaries)
}

async fn get_pokemon(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    match state.pokedex.pokemon_one(&id) {
        Some(record) => Ok(Json(state.pokedex.detail(record)).into_response()),
        None => {
            tracing::debug!("No Pokemon with id {}", id);
            Err(ApiError::NotFound(format!("Pokemon '{}' not found", id)))
        }
    }
}

async fn get_filters(State(state): State<AppState>) -> Json<Facets> {
    Json(state.pokedex.populate_filters().clone())
}

#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    pub q: Option<String>,
    /// Comma-separated type names
    pub types: Option<String>,
    /// Comma-separated weakness names
    pub weaknesses: Option<String>,
}

impl SearchParams {
    pub fn selection(&self) -> FacetSelection {
        FacetSelection::new(
            split_list(self.types.as_deref()),
            split_list(self.weaknesses.as_deref()),
        )
    }
}

fn split_list(raw: Option<&str>) -> Vec<String> {
    raw.unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
        .collect()
}

async fn search_pokemon(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Json<Vec<PokemonSummary>> {
    let selection = params.selection();
    let query = params.q.as_deref().unwrap_or_default();
    let results: Vec<PokemonSummary> = state
        .pokedex
        .search(query, &selection)
        .into_iter()
        .map(PokemonSummary::from)
        .collect();
    tracing::debug!("Search {:?} with {:?} matched {}", query, selection, results.len());
    Json(results)
}
