//! Equipment registry handlers

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use forge_core::error::ValidationErrors;
use forge_core::pagination::Paginated;
use forge_core::types::Id;
use forge_db::equipment::{CreateEquipmentDto, EquipmentFilter, UpdateEquipmentDto};
use forge_db::{ClientRepository, EquipmentRepository, Repository};
use serde::Deserialize;

use super::require_clients;
use crate::error::{ApiError, ApiResult};
use crate::extractors::{AuthenticatedUser, PageQuery};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct EquipmentListQuery {
    pub client_id: Option<Id>,
    pub status: Option<String>,
    pub brand: Option<String>,
    pub search: Option<String>,
    pub ordering: Option<String>,
}

/// GET /api/v1/equipment/
pub async fn list(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
    Query(query): Query<EquipmentListQuery>,
    PageQuery(params): PageQuery,
) -> ApiResult<impl IntoResponse> {
    let filter = EquipmentFilter {
        client_id: query.client_id,
        status: query.status,
        brand: query.brand,
        search: query.search,
        ordering: query.ordering,
    };

    let page = EquipmentRepository::new(state.pool.clone())
        .list(&filter, (&params).into())
        .await?;

    Ok(Json(Paginated::new(
        page.items,
        page.total,
        &params,
        "/api/v1/equipment/",
    )))
}

/// GET /api/v1/equipment/:id/
pub async fn retrieve(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
    Path(id): Path<Id>,
) -> ApiResult<impl IntoResponse> {
    let unit = EquipmentRepository::new(state.pool.clone())
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Equipment", id))?;

    Ok(Json(unit))
}

/// POST /api/v1/equipment/
pub async fn create(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Json(dto): Json<CreateEquipmentDto>,
) -> ApiResult<impl IntoResponse> {
    require_clients(&user)?;

    let mut errors = ValidationErrors::new();
    if dto.equipment_code.trim().is_empty() {
        errors.add("equipment_code", "This field may not be blank");
    }
    if dto.brand.trim().is_empty() {
        errors.add("brand", "This field may not be blank");
    }
    if dto.model.trim().is_empty() {
        errors.add("model", "This field may not be blank");
    }
    if let Some(ref vin) = dto.vin {
        if vin.chars().count() != 17 {
            errors.add("vin", "VIN must be exactly 17 characters");
        }
    }
    if !errors.is_empty() {
        return Err(errors.into());
    }

    if let Some(client_id) = dto.client_id {
        let clients = ClientRepository::new(state.pool.clone());
        if !clients.exists(client_id).await? {
            return Err(ApiError::bad_request(format!(
                "Client {} does not exist",
                client_id
            )));
        }
    }

    let unit = EquipmentRepository::new(state.pool.clone()).create(dto).await?;
    Ok((StatusCode::CREATED, Json(unit)))
}

/// PUT /api/v1/equipment/:id/
pub async fn update(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<Id>,
    Json(dto): Json<UpdateEquipmentDto>,
) -> ApiResult<impl IntoResponse> {
    require_clients(&user)?;

    if let Some(ref vin) = dto.vin {
        if vin.chars().count() != 17 {
            let mut errors = ValidationErrors::new();
            errors.add("vin", "VIN must be exactly 17 characters");
            return Err(errors.into());
        }
    }

    let unit = EquipmentRepository::new(state.pool.clone())
        .update(id, dto)
        .await?;

    Ok(Json(unit))
}

/// DELETE /api/v1/equipment/:id/
pub async fn destroy(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<Id>,
) -> ApiResult<impl IntoResponse> {
    require_clients(&user)?;

    EquipmentRepository::new(state.pool.clone()).delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
