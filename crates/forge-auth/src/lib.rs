//! # forge-auth
//!
//! Authentication and authorization for ForgeDB RS.
//!
//! ## Features
//!
//! - JWT access/refresh pairs with refresh rotation
//! - Technician-backed login with account auto-provisioning
//! - Argon2 password hashing
//! - Role-derived permission flags

pub mod backend;
pub mod blacklist;
pub mod jwt;
pub mod password;
pub mod permissions;

pub use backend::{AuthError, AuthenticatedAccount, TechnicianAuthBackend};
pub use blacklist::TokenBlacklist;
pub use jwt::{token_type, Claims, JwtError, JwtService, TokenPair};
pub use password::{default_password, hash_password, validate_password, verify_password};
pub use permissions::{CurrentUser, Permissions};
