//! API handlers grouped by resource

pub mod auth;
pub mod clients;
pub mod equipment;
pub mod inventory;
pub mod oem;
pub mod procedures;
pub mod search;
pub mod technicians;
pub mod work_orders;

use forge_auth::permissions::CurrentUser;

use crate::error::ApiError;

/// Writes to catalog resources require a staff or admin account
pub(crate) fn require_staff(user: &CurrentUser) -> Result<(), ApiError> {
    if user.is_staff || user.is_superuser {
        Ok(())
    } else {
        Err(ApiError::forbidden("Staff privileges required"))
    }
}

/// Inventory writes are gated on the inventory permission
pub(crate) fn require_inventory(user: &CurrentUser) -> Result<(), ApiError> {
    if user.can_manage_inventory() {
        Ok(())
    } else {
        Err(ApiError::forbidden("Inventory management permission required"))
    }
}

/// Client writes are gated on the client permission
pub(crate) fn require_clients(user: &CurrentUser) -> Result<(), ApiError> {
    if user.can_manage_clients() {
        Ok(())
    } else {
        Err(ApiError::forbidden("Client management permission required"))
    }
}

/// Reports are visible to staff and technicians
pub(crate) fn require_reports(user: &CurrentUser) -> Result<(), ApiError> {
    if user.can_view_reports() {
        Ok(())
    } else {
        Err(ApiError::forbidden("Report access permission required"))
    }
}
