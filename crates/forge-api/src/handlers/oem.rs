//! OEM catalog handlers: brands, catalog items, cross-references

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use forge_core::error::ValidationErrors;
use forge_core::pagination::Paginated;
use forge_core::types::Id;
use forge_db::oem::{
    CatalogFilter, CreateBrandDto, CreateCatalogItemDto, CreateEquivalenceDto, EquivalenceFilter,
    UpdateBrandDto,
};
use forge_db::{
    OemBrandRepository, OemCatalogRepository, OemEquivalenceRepository, ProductRepository,
    Repository,
};
use serde::Deserialize;

use super::require_inventory;
use crate::error::{ApiError, ApiResult};
use crate::extractors::{AuthenticatedUser, PageQuery};
use crate::state::AppState;

/// GET /api/v1/oem/brands/
pub async fn list_brands(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
    PageQuery(params): PageQuery,
) -> ApiResult<impl IntoResponse> {
    let page = OemBrandRepository::new(state.pool.clone())
        .list((&params).into())
        .await?;

    Ok(Json(Paginated::new(
        page.items,
        page.total,
        &params,
        "/api/v1/oem/brands/",
    )))
}

/// GET /api/v1/oem/brands/:id/
pub async fn retrieve_brand(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
    Path(id): Path<Id>,
) -> ApiResult<impl IntoResponse> {
    let brand = OemBrandRepository::new(state.pool.clone())
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Brand", id))?;

    Ok(Json(brand))
}

/// POST /api/v1/oem/brands/
pub async fn create_brand(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Json(dto): Json<CreateBrandDto>,
) -> ApiResult<impl IntoResponse> {
    require_inventory(&user)?;

    let mut errors = ValidationErrors::new();
    if dto.oem_code.trim().is_empty() {
        errors.add("oem_code", "This field may not be blank");
    }
    if dto.name.trim().is_empty() {
        errors.add("name", "This field may not be blank");
    }
    if !errors.is_empty() {
        return Err(errors.into());
    }

    let repo = OemBrandRepository::new(state.pool.clone());
    if repo.find_by_code(&dto.oem_code).await?.is_some() {
        return Err(ApiError::Conflict(format!(
            "Brand code {} is already in use",
            dto.oem_code
        )));
    }

    let brand = repo.create(dto).await?;
    Ok((StatusCode::CREATED, Json(brand)))
}

/// PUT /api/v1/oem/brands/:id/
pub async fn update_brand(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<Id>,
    Json(dto): Json<UpdateBrandDto>,
) -> ApiResult<impl IntoResponse> {
    require_inventory(&user)?;

    let brand = OemBrandRepository::new(state.pool.clone())
        .update(id, dto)
        .await?;

    Ok(Json(brand))
}

#[derive(Debug, Deserialize)]
pub struct CatalogListQuery {
    pub oem_code: Option<String>,
    pub item_type: Option<String>,
    pub search: Option<String>,
}

/// GET /api/v1/oem/catalog/
pub async fn list_catalog(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
    Query(query): Query<CatalogListQuery>,
    PageQuery(params): PageQuery,
) -> ApiResult<impl IntoResponse> {
    let filter = CatalogFilter {
        oem_code: query.oem_code,
        item_type: query.item_type,
        search: query.search,
    };

    let page = OemCatalogRepository::new(state.pool.clone())
        .list(&filter, (&params).into())
        .await?;

    Ok(Json(Paginated::new(
        page.items,
        page.total,
        &params,
        "/api/v1/oem/catalog/",
    )))
}

/// GET /api/v1/oem/catalog/:id/
pub async fn retrieve_catalog_item(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
    Path(id): Path<Id>,
) -> ApiResult<impl IntoResponse> {
    let item = OemCatalogRepository::new(state.pool.clone())
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Catalog item", id))?;

    Ok(Json(item))
}

/// GET /api/v1/oem/catalog/:id/equivalences/
pub async fn catalog_item_equivalences(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
    Path(id): Path<Id>,
) -> ApiResult<impl IntoResponse> {
    let item = OemCatalogRepository::new(state.pool.clone())
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Catalog item", id))?;

    let matches = OemEquivalenceRepository::new(state.pool.clone())
        .find_for_part(&item.oem_code, &item.part_number)
        .await?;

    Ok(Json(matches))
}

/// POST /api/v1/oem/catalog/
pub async fn create_catalog_item(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Json(dto): Json<CreateCatalogItemDto>,
) -> ApiResult<impl IntoResponse> {
    require_inventory(&user)?;

    let mut errors = ValidationErrors::new();
    if dto.part_number.trim().is_empty() {
        errors.add("part_number", "This field may not be blank");
    }
    if !errors.is_empty() {
        return Err(errors.into());
    }

    let brands = OemBrandRepository::new(state.pool.clone());
    if brands.find_by_code(&dto.oem_code).await?.is_none() {
        return Err(ApiError::bad_request(format!(
            "Brand {} does not exist",
            dto.oem_code
        )));
    }

    let item = OemCatalogRepository::new(state.pool.clone()).create(dto).await?;
    Ok((StatusCode::CREATED, Json(item)))
}

/// DELETE /api/v1/oem/catalog/:id/
pub async fn destroy_catalog_item(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<Id>,
) -> ApiResult<impl IntoResponse> {
    require_inventory(&user)?;

    OemCatalogRepository::new(state.pool.clone()).delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Debug, Deserialize)]
pub struct EquivalenceListQuery {
    pub oem_code: Option<String>,
    pub aftermarket_sku: Option<String>,
    #[serde(default)]
    pub verified_only: bool,
    pub search: Option<String>,
}

/// GET /api/v1/oem/equivalences/
pub async fn list_equivalences(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
    Query(query): Query<EquivalenceListQuery>,
    PageQuery(params): PageQuery,
) -> ApiResult<impl IntoResponse> {
    let filter = EquivalenceFilter {
        oem_code: query.oem_code,
        aftermarket_sku: query.aftermarket_sku,
        verified_only: query.verified_only,
        search: query.search,
    };

    let page = OemEquivalenceRepository::new(state.pool.clone())
        .list(&filter, (&params).into())
        .await?;

    Ok(Json(Paginated::new(
        page.items,
        page.total,
        &params,
        "/api/v1/oem/equivalences/",
    )))
}

/// POST /api/v1/oem/equivalences/
pub async fn create_equivalence(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Json(dto): Json<CreateEquivalenceDto>,
) -> ApiResult<impl IntoResponse> {
    require_inventory(&user)?;

    let mut errors = ValidationErrors::new();
    if dto.oem_part_number.trim().is_empty() {
        errors.add("oem_part_number", "This field may not be blank");
    }
    if !errors.is_empty() {
        return Err(errors.into());
    }

    let brands = OemBrandRepository::new(state.pool.clone());
    if brands.find_by_code(&dto.oem_code).await?.is_none() {
        return Err(ApiError::bad_request(format!(
            "Brand {} does not exist",
            dto.oem_code
        )));
    }
    if let Some(ref sku) = dto.aftermarket_sku {
        let products = ProductRepository::new(state.pool.clone());
        if !products.exists(sku).await? {
            return Err(ApiError::bad_request(format!(
                "Product {} does not exist",
                sku
            )));
        }
    }

    let equivalence = OemEquivalenceRepository::new(state.pool.clone())
        .create(dto)
        .await?;

    Ok((StatusCode::CREATED, Json(equivalence)))
}

/// POST /api/v1/oem/equivalences/:id/verify/
pub async fn verify_equivalence(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<Id>,
) -> ApiResult<impl IntoResponse> {
    require_inventory(&user)?;

    let equivalence = OemEquivalenceRepository::new(state.pool.clone())
        .verify(id, user.user_id)
        .await?;

    Ok(Json(equivalence))
}

/// DELETE /api/v1/oem/equivalences/:id/
pub async fn destroy_equivalence(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<Id>,
) -> ApiResult<impl IntoResponse> {
    require_inventory(&user)?;

    OemEquivalenceRepository::new(state.pool.clone()).delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
