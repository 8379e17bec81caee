//! Work order lifecycle handlers

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use forge_core::error::ValidationErrors;
use forge_core::pagination::Paginated;
use forge_core::types::Id;
use forge_db::work_orders::{CreateWorkOrderDto, UpdateWorkOrderDto, WorkOrderFilter};
use forge_db::{
    ClientRepository, EquipmentRepository, ProcedureRunner, Repository, WorkOrderRepository,
};
use serde::Deserialize;
use serde_json::json;

use crate::error::{ApiError, ApiResult};
use crate::extractors::{AuthenticatedUser, PageQuery};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct WorkOrderListQuery {
    pub status: Option<String>,
    pub client_id: Option<Id>,
    pub equipment_id: Option<Id>,
    pub technician_id: Option<Id>,
    pub priority: Option<String>,
    pub search: Option<String>,
    pub ordering: Option<String>,
}

/// GET /api/v1/workorders/
pub async fn list(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
    Query(query): Query<WorkOrderListQuery>,
    PageQuery(params): PageQuery,
) -> ApiResult<impl IntoResponse> {
    let filter = WorkOrderFilter {
        status: query.status,
        client_id: query.client_id,
        equipment_id: query.equipment_id,
        technician_id: query.technician_id,
        priority: query.priority,
        search: query.search,
        ordering: query.ordering,
    };

    let page = WorkOrderRepository::new(state.pool.clone())
        .list(&filter, (&params).into())
        .await?;

    Ok(Json(Paginated::new(
        page.items,
        page.total,
        &params,
        "/api/v1/workorders/",
    )))
}

/// GET /api/v1/workorders/summary/
pub async fn summary(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
) -> ApiResult<impl IntoResponse> {
    let counts = WorkOrderRepository::new(state.pool.clone())
        .count_by_status()
        .await?;

    let mut by_status = serde_json::Map::new();
    let mut total = 0i64;
    for (status, count) in counts {
        total += count;
        by_status.insert(status, json!(count));
    }

    Ok(Json(json!({ "total": total, "by_status": by_status })))
}

/// GET /api/v1/workorders/:id/
pub async fn retrieve(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
    Path(id): Path<Id>,
) -> ApiResult<impl IntoResponse> {
    let order = WorkOrderRepository::new(state.pool.clone())
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Work order", id))?;

    Ok(Json(order))
}

/// GET /api/v1/workorders/:id/items/
pub async fn items(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
    Path(id): Path<Id>,
) -> ApiResult<impl IntoResponse> {
    let repo = WorkOrderRepository::new(state.pool.clone());
    if !repo.exists(id).await? {
        return Err(ApiError::not_found("Work order", id));
    }

    let lines = repo.list_items(id).await?;
    Ok(Json(lines))
}

/// POST /api/v1/workorders/
pub async fn create(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Json(mut dto): Json<CreateWorkOrderDto>,
) -> ApiResult<impl IntoResponse> {
    let mut errors = ValidationErrors::new();
    if dto.service_type.trim().is_empty() {
        errors.add("service_type", "This field may not be blank");
    }
    if !errors.is_empty() {
        return Err(errors.into());
    }

    let clients = ClientRepository::new(state.pool.clone());
    if !clients.exists(dto.client_id).await? {
        return Err(ApiError::bad_request(format!(
            "Client {} does not exist",
            dto.client_id
        )));
    }
    let equipment = EquipmentRepository::new(state.pool.clone());
    if !equipment.exists(dto.equipment_id).await? {
        return Err(ApiError::bad_request(format!(
            "Equipment {} does not exist",
            dto.equipment_id
        )));
    }

    if dto.created_by.is_none() {
        dto.created_by = Some(user.user_id);
    }

    let order = WorkOrderRepository::new(state.pool.clone()).create(dto).await?;
    Ok((StatusCode::CREATED, Json(order)))
}

/// PUT /api/v1/workorders/:id/
pub async fn update(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
    Path(id): Path<Id>,
    Json(dto): Json<UpdateWorkOrderDto>,
) -> ApiResult<impl IntoResponse> {
    let order = WorkOrderRepository::new(state.pool.clone())
        .update(id, dto)
        .await?;

    Ok(Json(order))
}

/// DELETE /api/v1/workorders/:id/
///
/// Only draft orders can be removed; anything further along the lifecycle is
/// rejected by the repository.
pub async fn destroy(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<Id>,
) -> ApiResult<impl IntoResponse> {
    super::require_staff(&user)?;

    WorkOrderRepository::new(state.pool.clone()).delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Debug, Deserialize)]
pub struct AdvanceStatusRequest {
    pub new_status: String,
}

/// POST /api/v1/workorders/:id/advance-status/
///
/// Transition validation happens inside `svc.advance_wo_status`; the
/// procedure's JSON verdict is relayed as-is.
pub async fn advance_status(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<Id>,
    Json(body): Json<AdvanceStatusRequest>,
) -> ApiResult<impl IntoResponse> {
    if body.new_status.trim().is_empty() {
        return Err(ApiError::bad_request("new_status is required"));
    }

    let repo = WorkOrderRepository::new(state.pool.clone());
    if !repo.exists(id).await? {
        return Err(ApiError::not_found("Work order", id));
    }

    let result = ProcedureRunner::new(state.pool.clone())
        .advance_wo_status(id, &body.new_status, Some(user.user_id))
        .await?;

    Ok(Json(result))
}
