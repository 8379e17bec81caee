//! # forge-api
//!
//! REST API v1 handlers for ForgeDB RS.
//!
//! This crate implements the JSON API over the workshop, inventory, OEM and
//! search domains, with JWT bearer authentication and DRF-compatible
//! pagination envelopes.

pub mod error;
pub mod extractors;
pub mod handlers;
pub mod routes;
pub mod state;

pub use error::{ApiError, ApiResult};
pub use routes::router;
pub use state::AppState;
