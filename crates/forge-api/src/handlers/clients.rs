//! Client directory handlers

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use forge_core::error::ValidationErrors;
use forge_core::pagination::Paginated;
use forge_core::types::Id;
use forge_db::clients::{ClientFilter, CreateClientDto, UpdateClientDto};
use forge_db::{ClientRepository, EquipmentRepository, Repository};
use serde::Deserialize;
use serde_json::json;

use super::require_clients;
use crate::error::{ApiError, ApiResult};
use crate::extractors::{AuthenticatedUser, PageQuery};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ClientListQuery {
    pub status: Option<String>,
    #[serde(rename = "type")]
    pub client_type: Option<String>,
    pub city: Option<String>,
    pub search: Option<String>,
    pub ordering: Option<String>,
}

/// GET /api/v1/clients/
pub async fn list(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
    Query(query): Query<ClientListQuery>,
    PageQuery(params): PageQuery,
) -> ApiResult<impl IntoResponse> {
    let filter = ClientFilter {
        status: query.status,
        client_type: query.client_type,
        city: query.city,
        search: query.search,
        ordering: query.ordering,
    };

    let page = ClientRepository::new(state.pool.clone())
        .list(&filter, (&params).into())
        .await?;

    Ok(Json(Paginated::new(
        page.items,
        page.total,
        &params,
        "/api/v1/clients/",
    )))
}

/// GET /api/v1/clients/:id/
pub async fn retrieve(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
    Path(id): Path<Id>,
) -> ApiResult<impl IntoResponse> {
    let client = ClientRepository::new(state.pool.clone())
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Client", id))?;

    Ok(Json(client))
}

/// GET /api/v1/clients/:id/credit/
pub async fn credit(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
    Path(id): Path<Id>,
) -> ApiResult<impl IntoResponse> {
    let client = ClientRepository::new(state.pool.clone())
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Client", id))?;

    Ok(Json(json!({
        "client_id": client.client_id,
        "client_code": client.client_code,
        "credit_limit": client.credit_limit,
        "credit_used": client.credit_used,
        "available_credit": client.available_credit(),
        "payment_days": client.payment_days,
        "is_blocked": client.is_blocked(),
    })))
}

/// GET /api/v1/clients/:id/equipment/
pub async fn equipment(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
    Path(id): Path<Id>,
) -> ApiResult<impl IntoResponse> {
    let clients = ClientRepository::new(state.pool.clone());
    if !clients.exists(id).await? {
        return Err(ApiError::not_found("Client", id));
    }

    let units = EquipmentRepository::new(state.pool.clone())
        .list_for_client(id)
        .await?;

    Ok(Json(units))
}

/// POST /api/v1/clients/
pub async fn create(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Json(dto): Json<CreateClientDto>,
) -> ApiResult<impl IntoResponse> {
    require_clients(&user)?;

    let mut errors = ValidationErrors::new();
    if dto.client_code.trim().is_empty() {
        errors.add("client_code", "This field may not be blank");
    }
    if dto.name.trim().is_empty() {
        errors.add("name", "This field may not be blank");
    }
    if !errors.is_empty() {
        return Err(errors.into());
    }

    let repo = ClientRepository::new(state.pool.clone());
    if !repo.is_code_unique(&dto.client_code, None).await? {
        return Err(ApiError::Conflict(format!(
            "Client code {} is already in use",
            dto.client_code
        )));
    }

    let client = repo.create(dto).await?;
    Ok((StatusCode::CREATED, Json(client)))
}

/// PUT /api/v1/clients/:id/
pub async fn update(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<Id>,
    Json(dto): Json<UpdateClientDto>,
) -> ApiResult<impl IntoResponse> {
    require_clients(&user)?;

    let client = ClientRepository::new(state.pool.clone())
        .update(id, dto)
        .await?;

    Ok(Json(client))
}

/// DELETE /api/v1/clients/:id/
///
/// Clients are referenced by equipment and work order history, so deletion
/// only flips the status to INACTIVE.
pub async fn destroy(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<Id>,
) -> ApiResult<impl IntoResponse> {
    require_clients(&user)?;

    let dto = UpdateClientDto {
        status: Some(forge_models::client::status::INACTIVE.to_string()),
        ..UpdateClientDto::default()
    };
    ClientRepository::new(state.pool.clone()).update(id, dto).await?;
    Ok(StatusCode::NO_CONTENT)
}
