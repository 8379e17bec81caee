//! # forge-core
//!
//! Core types and utilities shared across the ForgeDB RS workspace:
//! - Field-level validation errors (`ValidationErrors`)
//! - Pagination types for the REST envelope
//! - Application configuration

pub mod config;
pub mod error;
pub mod pagination;
pub mod types;

pub use config::*;
pub use error::*;
pub use pagination::*;
pub use types::*;
