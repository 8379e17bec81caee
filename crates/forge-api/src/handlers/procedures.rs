//! Endpoints that delegate to database-side procedures. Request bodies are
//! validated here, business verdicts come back as JSON from PL/pgSQL and are
//! relayed without reshaping.

use axum::{
    extract::{Query, State},
    response::IntoResponse,
    Json,
};
use chrono::NaiveDate;
use forge_core::types::Id;
use forge_db::{ProcedureRunner, Repository, WorkOrderRepository};
use serde::Deserialize;

use super::{require_inventory, require_reports};
use crate::error::{ApiError, ApiResult};
use crate::extractors::AuthenticatedUser;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ReserveStockRequest {
    pub wo_id: Option<Id>,
    pub internal_sku: Option<String>,
    pub quantity: Option<i32>,
    pub warehouse_code: Option<String>,
}

/// POST /api/v1/inventory/reserve-stock/
pub async fn reserve_stock(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Json(body): Json<ReserveStockRequest>,
) -> ApiResult<impl IntoResponse> {
    require_inventory(&user)?;

    let wo_id = body
        .wo_id
        .ok_or_else(|| ApiError::bad_request("wo_id is required"))?;
    let sku = body
        .internal_sku
        .as_deref()
        .filter(|s| !s.trim().is_empty())
        .ok_or_else(|| ApiError::bad_request("internal_sku is required"))?;
    let quantity = body
        .quantity
        .filter(|q| *q > 0)
        .ok_or_else(|| ApiError::bad_request("quantity must be a positive integer"))?;
    let warehouse = body
        .warehouse_code
        .as_deref()
        .filter(|s| !s.trim().is_empty())
        .ok_or_else(|| ApiError::bad_request("warehouse_code is required"))?;

    let orders = WorkOrderRepository::new(state.pool.clone());
    if !orders.exists(wo_id).await? {
        return Err(ApiError::not_found("Work order", wo_id));
    }

    let result = ProcedureRunner::new(state.pool.clone())
        .reserve_stock_for_wo(wo_id, sku, quantity, warehouse)
        .await?;

    Ok(Json(result))
}

#[derive(Debug, Deserialize)]
pub struct ReleaseStockRequest {
    pub wo_id: Option<Id>,
    pub internal_sku: Option<String>,
    pub warehouse_code: Option<String>,
}

/// POST /api/v1/inventory/release-stock/
pub async fn release_stock(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Json(body): Json<ReleaseStockRequest>,
) -> ApiResult<impl IntoResponse> {
    require_inventory(&user)?;

    let wo_id = body
        .wo_id
        .ok_or_else(|| ApiError::bad_request("wo_id is required"))?;
    let sku = body
        .internal_sku
        .as_deref()
        .filter(|s| !s.trim().is_empty())
        .ok_or_else(|| ApiError::bad_request("internal_sku is required"))?;
    let warehouse = body
        .warehouse_code
        .as_deref()
        .filter(|s| !s.trim().is_empty())
        .ok_or_else(|| ApiError::bad_request("warehouse_code is required"))?;

    let result = ProcedureRunner::new(state.pool.clone())
        .release_reserved_stock(wo_id, sku, warehouse)
        .await?;

    Ok(Json(result))
}

/// GET /api/v1/analytics/abc-analysis/
pub async fn abc_analysis(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> ApiResult<impl IntoResponse> {
    require_reports(&user)?;

    let result = ProcedureRunner::new(state.pool.clone())
        .abc_inventory_analysis()
        .await?;

    Ok(Json(result))
}

#[derive(Debug, Deserialize)]
pub struct ProductivityQuery {
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
}

/// GET /api/v1/analytics/technician-productivity/
///
/// Defaults to the trailing 30 days when no range is given.
pub async fn technician_productivity(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Query(query): Query<ProductivityQuery>,
) -> ApiResult<impl IntoResponse> {
    require_reports(&user)?;

    let date_to = query.date_to.unwrap_or_else(|| chrono::Utc::now().date_naive());
    let date_from = query
        .date_from
        .unwrap_or_else(|| date_to - chrono::Duration::days(30));

    if date_from > date_to {
        return Err(ApiError::bad_request("date_from must not be after date_to"));
    }

    let result = ProcedureRunner::new(state.pool.clone())
        .technician_productivity_report(date_from, date_to)
        .await?;

    Ok(Json(result))
}
