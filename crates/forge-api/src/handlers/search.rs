//! Unified search handlers

use axum::{
    extract::{Query, State},
    response::IntoResponse,
    Json,
};
use forge_search::{SearchFilters, SearchType};
use serde::Deserialize;
use serde_json::json;

use super::require_staff;
use crate::error::{ApiError, ApiResult};
use crate::extractors::AuthenticatedUser;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub q: Option<String>,
    pub search_type: Option<String>,
    pub limit: Option<i64>,
    pub brand: Option<String>,
    pub group_code: Option<String>,
    pub source_code: Option<String>,
    pub has_stock: Option<bool>,
    pub oem_code: Option<String>,
    pub item_type: Option<String>,
    pub equivalence_type: Option<String>,
    pub min_confidence: Option<i32>,
    pub year: Option<i16>,
    pub status: Option<String>,
}

/// GET /api/v1/search/
pub async fn search(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
    Query(query): Query<SearchQuery>,
) -> ApiResult<impl IntoResponse> {
    let term = query
        .q
        .as_deref()
        .map(str::trim)
        .filter(|q| !q.is_empty())
        .ok_or_else(|| ApiError::bad_request("Query parameter 'q' is required"))?;

    let search_type = match query.search_type.as_deref() {
        Some(raw) => SearchType::parse(raw)?,
        None => SearchType::All,
    };

    let filters = SearchFilters {
        brand: query.brand,
        group_code: query.group_code,
        source_code: query.source_code,
        has_stock: query.has_stock,
        oem_code: query.oem_code,
        item_type: query.item_type,
        equivalence_type: query.equivalence_type,
        min_confidence: query.min_confidence,
        year: query.year,
        status: query.status,
    };

    let response = state
        .search
        .search(term, search_type, &filters, query.limit)
        .await?;

    Ok(Json(response))
}

#[derive(Debug, Deserialize)]
pub struct SuggestionQuery {
    pub q: Option<String>,
    pub limit: Option<i64>,
}

/// GET /api/v1/search/suggestions/
pub async fn suggestions(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
    Query(query): Query<SuggestionQuery>,
) -> ApiResult<impl IntoResponse> {
    let term = query.q.as_deref().map(str::trim).unwrap_or_default();

    let response = state.search.suggestions(term, query.limit).await?;
    Ok(Json(response))
}

/// GET /api/v1/search/statistics/
pub async fn statistics(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
) -> ApiResult<impl IntoResponse> {
    let stats = state.search.statistics().await?;
    Ok(Json(stats))
}

/// POST /api/v1/search/clear-cache/
pub async fn clear_cache(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> ApiResult<impl IntoResponse> {
    require_staff(&user)?;

    state.search.clear_cache();
    Ok(Json(json!({ "message": "Search cache cleared" })))
}
