//! API routes
//!
//! All resources hang off `/api/v1`, DRF-style with trailing slashes.

use axum::{
    routing::{delete, get, post, put},
    Router,
};
use serde::Serialize;

use crate::handlers::{
    auth, clients, equipment, inventory, oem, procedures, search, technicians, work_orders,
};
use crate::state::AppState;

/// Create the complete API router
pub fn router() -> Router<AppState> {
    Router::new().nest("/api/v1", api_v1_router())
}

fn api_v1_router() -> Router<AppState> {
    Router::new()
        .route("/", get(api_root))
        .nest("/auth", auth_router())
        .nest("/technicians", technicians_router())
        .nest("/clients", clients_router())
        .nest("/equipment", equipment_router())
        .nest("/inventory", inventory_router())
        .nest("/workorders", work_orders_router())
        .nest("/oem", oem_router())
        .nest("/search", search_router())
        .nest("/analytics", analytics_router())
}

fn auth_router() -> Router<AppState> {
    Router::new()
        .route("/login/", post(auth::login))
        .route("/refresh/", post(auth::refresh))
        .route("/logout/", post(auth::logout))
        .route("/profile/", get(auth::profile))
        .route("/profile/", put(auth::update_profile))
        .route("/change-password/", post(auth::change_password))
        .route("/permissions/", get(auth::permissions))
}

fn technicians_router() -> Router<AppState> {
    Router::new()
        .route("/", get(technicians::list))
        .route("/", post(technicians::create))
        .route("/:id/", get(technicians::retrieve))
        .route("/:id/", put(technicians::update))
        .route("/:id/", delete(technicians::destroy))
}

fn clients_router() -> Router<AppState> {
    Router::new()
        .route("/", get(clients::list))
        .route("/", post(clients::create))
        .route("/:id/", get(clients::retrieve))
        .route("/:id/", put(clients::update))
        .route("/:id/", delete(clients::destroy))
        .route("/:id/credit/", get(clients::credit))
        .route("/:id/equipment/", get(clients::equipment))
}

fn equipment_router() -> Router<AppState> {
    Router::new()
        .route("/", get(equipment::list))
        .route("/", post(equipment::create))
        .route("/:id/", get(equipment::retrieve))
        .route("/:id/", put(equipment::update))
        .route("/:id/", delete(equipment::destroy))
}

fn inventory_router() -> Router<AppState> {
    Router::new()
        .route("/products/", get(inventory::list_products))
        .route("/products/", post(inventory::create_product))
        .route("/products/:sku/", get(inventory::retrieve_product))
        .route("/products/:sku/", put(inventory::update_product))
        .route("/products/:sku/", delete(inventory::deactivate_product))
        .route("/products/:sku/stock/", get(inventory::product_stock))
        .route("/stock/", get(inventory::list_stock))
        .route("/stock/alerts/", get(inventory::stock_alerts))
        .route("/warehouses/", get(inventory::list_warehouses))
        .route("/transactions/", get(inventory::list_transactions))
        .route("/transactions/", post(inventory::create_transaction))
        .route("/reserve-stock/", post(procedures::reserve_stock))
        .route("/release-stock/", post(procedures::release_stock))
}

fn work_orders_router() -> Router<AppState> {
    Router::new()
        .route("/", get(work_orders::list))
        .route("/", post(work_orders::create))
        .route("/summary/", get(work_orders::summary))
        .route("/:id/", get(work_orders::retrieve))
        .route("/:id/", put(work_orders::update))
        .route("/:id/", delete(work_orders::destroy))
        .route("/:id/items/", get(work_orders::items))
        .route("/:id/advance-status/", post(work_orders::advance_status))
}

fn oem_router() -> Router<AppState> {
    Router::new()
        .route("/brands/", get(oem::list_brands))
        .route("/brands/", post(oem::create_brand))
        .route("/brands/:id/", get(oem::retrieve_brand))
        .route("/brands/:id/", put(oem::update_brand))
        .route("/catalog/", get(oem::list_catalog))
        .route("/catalog/", post(oem::create_catalog_item))
        .route("/catalog/:id/", get(oem::retrieve_catalog_item))
        .route("/catalog/:id/", delete(oem::destroy_catalog_item))
        .route("/catalog/:id/equivalences/", get(oem::catalog_item_equivalences))
        .route("/equivalences/", get(oem::list_equivalences))
        .route("/equivalences/", post(oem::create_equivalence))
        .route("/equivalences/:id/", delete(oem::destroy_equivalence))
        .route("/equivalences/:id/verify/", post(oem::verify_equivalence))
}

fn search_router() -> Router<AppState> {
    Router::new()
        .route("/", get(search::search))
        .route("/suggestions/", get(search::suggestions))
        .route("/statistics/", get(search::statistics))
        .route("/clear-cache/", post(search::clear_cache))
}

fn analytics_router() -> Router<AppState> {
    Router::new()
        .route("/abc-analysis/", get(procedures::abc_analysis))
        .route(
            "/technician-productivity/",
            get(procedures::technician_productivity),
        )
}

async fn api_root() -> axum::Json<ApiRoot> {
    axum::Json(ApiRoot {
        name: "ForgeDB API".into(),
        version: "v1".into(),
    })
}

#[derive(Serialize)]
struct ApiRoot {
    name: String,
    version: String,
}
