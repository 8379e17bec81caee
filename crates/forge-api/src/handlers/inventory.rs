//! Inventory handlers: product master, stock levels, movements, warehouses

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use forge_core::error::ValidationErrors;
use forge_core::pagination::Paginated;
use forge_db::products::{CreateProductDto, ProductFilter, UpdateProductDto};
use forge_db::stock::{CreateTransactionDto, StockFilter, TransactionFilter};
use forge_db::{ProductRepository, StockRepository, TransactionRepository, WarehouseRepository};
use serde::Deserialize;

use super::require_inventory;
use crate::error::{ApiError, ApiResult};
use crate::extractors::{AuthenticatedUser, PageQuery};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ProductListQuery {
    pub group_code: Option<String>,
    pub brand: Option<String>,
    pub is_active: Option<bool>,
    pub search: Option<String>,
    pub ordering: Option<String>,
}

/// GET /api/v1/inventory/products/
pub async fn list_products(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
    Query(query): Query<ProductListQuery>,
    PageQuery(params): PageQuery,
) -> ApiResult<impl IntoResponse> {
    let filter = ProductFilter {
        group_code: query.group_code,
        brand: query.brand,
        is_active: query.is_active,
        search: query.search,
        ordering: query.ordering,
    };

    let page = ProductRepository::new(state.pool.clone())
        .list(&filter, (&params).into())
        .await?;

    Ok(Json(Paginated::new(
        page.items,
        page.total,
        &params,
        "/api/v1/inventory/products/",
    )))
}

/// GET /api/v1/inventory/products/:sku/
pub async fn retrieve_product(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
    Path(sku): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let product = ProductRepository::new(state.pool.clone())
        .find_by_sku(&sku)
        .await?
        .ok_or_else(|| ApiError::not_found("Product", &sku))?;

    Ok(Json(product))
}

/// GET /api/v1/inventory/products/:sku/stock/
pub async fn product_stock(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
    Path(sku): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let products = ProductRepository::new(state.pool.clone());
    if !products.exists(&sku).await? {
        return Err(ApiError::not_found("Product", &sku));
    }

    let rows = StockRepository::new(state.pool.clone())
        .list_for_product(&sku)
        .await?;

    Ok(Json(rows))
}

/// POST /api/v1/inventory/products/
pub async fn create_product(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Json(dto): Json<CreateProductDto>,
) -> ApiResult<impl IntoResponse> {
    require_inventory(&user)?;

    let mut errors = ValidationErrors::new();
    if dto.internal_sku.trim().is_empty() {
        errors.add("internal_sku", "This field may not be blank");
    }
    if dto.name.trim().is_empty() {
        errors.add("name", "This field may not be blank");
    }
    if !errors.is_empty() {
        return Err(errors.into());
    }

    let product = ProductRepository::new(state.pool.clone()).create(dto).await?;
    Ok((StatusCode::CREATED, Json(product)))
}

/// PUT /api/v1/inventory/products/:sku/
pub async fn update_product(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(sku): Path<String>,
    Json(dto): Json<UpdateProductDto>,
) -> ApiResult<impl IntoResponse> {
    require_inventory(&user)?;

    let product = ProductRepository::new(state.pool.clone())
        .update(&sku, dto)
        .await?;

    Ok(Json(product))
}

/// DELETE /api/v1/inventory/products/:sku/
///
/// Products referenced by stock and movement history are deactivated, not
/// removed.
pub async fn deactivate_product(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(sku): Path<String>,
) -> ApiResult<impl IntoResponse> {
    require_inventory(&user)?;

    ProductRepository::new(state.pool.clone()).deactivate(&sku).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Debug, Deserialize)]
pub struct StockListQuery {
    pub warehouse_code: Option<String>,
    pub internal_sku: Option<String>,
    #[serde(default)]
    pub low_stock_only: bool,
}

/// GET /api/v1/inventory/stock/
pub async fn list_stock(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
    Query(query): Query<StockListQuery>,
    PageQuery(params): PageQuery,
) -> ApiResult<impl IntoResponse> {
    let filter = StockFilter {
        warehouse_code: query.warehouse_code,
        internal_sku: query.internal_sku,
        low_stock_only: query.low_stock_only,
    };

    let page = StockRepository::new(state.pool.clone())
        .list(&filter, (&params).into())
        .await?;

    Ok(Json(Paginated::new(
        page.items,
        page.total,
        &params,
        "/api/v1/inventory/stock/",
    )))
}

/// GET /api/v1/inventory/stock/alerts/
pub async fn stock_alerts(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
) -> ApiResult<impl IntoResponse> {
    let alerts = StockRepository::new(state.pool.clone())
        .low_stock_alerts()
        .await?;

    Ok(Json(alerts))
}

/// GET /api/v1/inventory/warehouses/
pub async fn list_warehouses(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
) -> ApiResult<impl IntoResponse> {
    let warehouses = WarehouseRepository::new(state.pool.clone())
        .list_active()
        .await?;

    Ok(Json(warehouses))
}

#[derive(Debug, Deserialize)]
pub struct TransactionListQuery {
    pub warehouse_code: Option<String>,
    pub internal_sku: Option<String>,
    pub transaction_type: Option<String>,
}

/// GET /api/v1/inventory/transactions/
pub async fn list_transactions(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
    Query(query): Query<TransactionListQuery>,
    PageQuery(params): PageQuery,
) -> ApiResult<impl IntoResponse> {
    let filter = TransactionFilter {
        warehouse_code: query.warehouse_code,
        internal_sku: query.internal_sku,
        transaction_type: query.transaction_type,
    };

    let page = TransactionRepository::new(state.pool.clone())
        .list(&filter, (&params).into())
        .await?;

    Ok(Json(Paginated::new(
        page.items,
        page.total,
        &params,
        "/api/v1/inventory/transactions/",
    )))
}

/// POST /api/v1/inventory/transactions/
///
/// Records a manual inventory movement. The ledger is append-only; there is
/// no update or delete counterpart.
pub async fn create_transaction(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Json(mut dto): Json<CreateTransactionDto>,
) -> ApiResult<impl IntoResponse> {
    require_inventory(&user)?;

    let mut errors = ValidationErrors::new();
    if dto.transaction_type.trim().is_empty() {
        errors.add("transaction_type", "This field may not be blank");
    }
    if dto.internal_sku.trim().is_empty() {
        errors.add("internal_sku", "This field may not be blank");
    }
    if dto.quantity == 0 {
        errors.add("quantity", "Quantity must be non-zero");
    }
    if !errors.is_empty() {
        return Err(errors.into());
    }

    let warehouses = WarehouseRepository::new(state.pool.clone());
    warehouses.require_active(&dto.warehouse_code).await?;

    let products = ProductRepository::new(state.pool.clone());
    if !products.exists(&dto.internal_sku).await? {
        return Err(ApiError::not_found("Product", &dto.internal_sku));
    }

    if dto.created_by.is_none() {
        dto.created_by = Some(user.user_id);
    }

    let movement = TransactionRepository::new(state.pool.clone())
        .create(dto)
        .await?;

    Ok((StatusCode::CREATED, Json(movement)))
}
