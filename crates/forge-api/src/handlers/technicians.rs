//! Technician catalog handlers

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use forge_core::error::ValidationErrors;
use forge_core::pagination::Paginated;
use forge_core::types::Id;
use forge_db::technicians::{CreateTechnicianDto, TechnicianFilter, UpdateTechnicianDto};
use forge_db::{Repository, TechnicianRepository};
use serde::Deserialize;

use super::require_staff;
use crate::error::{ApiError, ApiResult};
use crate::extractors::{AuthenticatedUser, PageQuery};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct TechnicianListQuery {
    pub status: Option<String>,
    pub search: Option<String>,
    pub ordering: Option<String>,
}

/// GET /api/v1/technicians/
pub async fn list(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
    Query(query): Query<TechnicianListQuery>,
    PageQuery(params): PageQuery,
) -> ApiResult<impl IntoResponse> {
    let filter = TechnicianFilter {
        status: query.status,
        search: query.search,
        ordering: query.ordering,
    };

    let page = TechnicianRepository::new(state.pool.clone())
        .list(&filter, (&params).into())
        .await?;

    Ok(Json(Paginated::new(
        page.items,
        page.total,
        &params,
        "/api/v1/technicians/",
    )))
}

/// GET /api/v1/technicians/:id/
pub async fn retrieve(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
    Path(id): Path<Id>,
) -> ApiResult<impl IntoResponse> {
    let technician = TechnicianRepository::new(state.pool.clone())
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Technician", id))?;

    Ok(Json(technician))
}

/// POST /api/v1/technicians/
pub async fn create(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Json(dto): Json<CreateTechnicianDto>,
) -> ApiResult<impl IntoResponse> {
    require_staff(&user)?;

    let mut errors = ValidationErrors::new();
    if dto.employee_code.trim().is_empty() {
        errors.add("employee_code", "This field may not be blank");
    }
    if dto.first_name.trim().is_empty() {
        errors.add("first_name", "This field may not be blank");
    }
    if !errors.is_empty() {
        return Err(errors.into());
    }

    let repo = TechnicianRepository::new(state.pool.clone());
    if !repo.is_employee_code_unique(&dto.employee_code, None).await? {
        return Err(ApiError::Conflict(format!(
            "Employee code {} is already in use",
            dto.employee_code
        )));
    }

    let technician = repo.create(dto).await?;
    Ok((StatusCode::CREATED, Json(technician)))
}

/// PUT /api/v1/technicians/:id/
pub async fn update(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<Id>,
    Json(dto): Json<UpdateTechnicianDto>,
) -> ApiResult<impl IntoResponse> {
    require_staff(&user)?;

    let technician = TechnicianRepository::new(state.pool.clone())
        .update(id, dto)
        .await?;

    Ok(Json(technician))
}

/// DELETE /api/v1/technicians/:id/
pub async fn destroy(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<Id>,
) -> ApiResult<impl IntoResponse> {
    require_staff(&user)?;

    TechnicianRepository::new(state.pool.clone()).delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
