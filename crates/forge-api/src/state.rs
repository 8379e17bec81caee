//! Shared application state

use std::sync::Arc;
use std::time::Duration;

use forge_auth::{JwtService, TechnicianAuthBackend, TokenBlacklist};
use forge_core::config::AppConfig;
use forge_db::{TechnicianRepository, UserAccountRepository};
use forge_search::UnifiedSearchService;
use sqlx::PgPool;

/// State handed to every handler. Repositories are built on demand from the
/// pool; the long-lived services live behind `Arc`s.
#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: Arc<AppConfig>,
    pub jwt: Arc<JwtService>,
    pub blacklist: Arc<TokenBlacklist>,
    pub auth_backend: Arc<TechnicianAuthBackend>,
    pub search: Arc<UnifiedSearchService>,
}

impl AppState {
    pub fn new(pool: PgPool, config: AppConfig) -> Self {
        let jwt = Arc::new(JwtService::new(
            config.auth.jwt_secret.as_bytes(),
            config.auth.access_ttl_seconds,
            config.auth.refresh_ttl_seconds,
        ));
        let auth_backend = Arc::new(TechnicianAuthBackend::new(
            TechnicianRepository::new(pool.clone()),
            UserAccountRepository::new(pool.clone()),
        ));
        let search = Arc::new(UnifiedSearchService::new(
            pool.clone(),
            Duration::from_secs(config.search.cache_ttl_seconds),
            config.search.default_limit,
        ));

        Self {
            pool,
            config: Arc::new(config),
            jwt,
            blacklist: Arc::new(TokenBlacklist::new()),
            auth_backend,
            search,
        }
    }
}
