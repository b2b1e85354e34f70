use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};
use tracing::debug;

use crate::errors::AppError;
use crate::state::AppState;

/// An authenticated admin, taken from the `Authorization: Bearer` header.
/// Handlers that take this argument reject anonymous callers with 401.
#[derive(Debug, Clone, PartialEq)]
pub struct AdminIdentity {
    pub username: String,
}

#[async_trait]
impl FromRequestParts<AppState> for AdminIdentity {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "))
            .ok_or(AppError::Unauthorized)?;

        let claims = state.tokens.verify(token.trim()).map_err(|e| {
            debug!("Rejected admin token: {e}");
            AppError::Unauthorized
        })?;

        Ok(AdminIdentity {
            username: claims.sub,
        })
    }
}
