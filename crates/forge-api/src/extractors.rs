//! Axum extractors for API handlers

use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts, Query},
    http::request::Parts,
};
use forge_auth::permissions::CurrentUser;
use forge_core::pagination::PageParams;
use forge_db::UserAccountRepository;

use crate::error::ApiError;
use crate::state::AppState;

/// Authenticated caller, resolved from a `Bearer` access token. The account
/// row is re-read on every request so deactivation takes effect immediately.
pub struct AuthenticatedUser(pub CurrentUser);

#[async_trait]
impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let state = AppState::from_ref(state);

        let token = parts
            .headers
            .get("authorization")
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .ok_or_else(|| ApiError::unauthorized("Authentication required"))?;

        let claims = state
            .jwt
            .validate_access(token)
            .map_err(|_| ApiError::unauthorized("Invalid or expired token"))?;

        let account_id = claims
            .account_id()
            .map_err(|_| ApiError::unauthorized("Invalid or expired token"))?;

        let account = UserAccountRepository::new(state.pool.clone())
            .find_by_id(account_id)
            .await?
            .filter(|account| account.is_active)
            .ok_or_else(|| ApiError::unauthorized("Account is disabled or missing"))?;

        Ok(AuthenticatedUser(CurrentUser::from_account(&account)))
    }
}

impl std::ops::Deref for AuthenticatedUser {
    type Target = CurrentUser;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// Page-number pagination from the query string
pub struct PageQuery(pub PageParams);

#[async_trait]
impl<S> FromRequestParts<S> for PageQuery
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(params) = Query::<PageParams>::from_request_parts(parts, state)
            .await
            .map_err(|e| ApiError::bad_request(e.to_string()))?;
        Ok(PageQuery(PageParams::new(params.page, params.page_size)))
    }
}
