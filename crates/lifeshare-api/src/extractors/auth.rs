//! `AuthUser` extractor: pulls the bearer token, verifies it, and injects context.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum_extra::TypedHeader;
use axum_extra::headers::Authorization;
use axum_extra::headers::authorization::Bearer;

use lifeshare_core::error::AppError;
use lifeshare_service::RequestContext;

use crate::error::ApiError;
use crate::state::AppState;

/// Extracted authenticated user context available in handlers.
#[derive(Debug, Clone)]
pub struct AuthUser(pub RequestContext);

impl AuthUser {
    /// Returns the inner `RequestContext`.
    pub fn context(&self) -> &RequestContext {
        &self.0
    }
}

impl std::ops::Deref for AuthUser {
    type Target = RequestContext;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let TypedHeader(Authorization(bearer)) =
            TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state)
                .await
                .map_err(|_| AppError::authentication("Missing or malformed Authorization header"))?;

        let claims = state.jwt_decoder.decode(bearer.token())?;

        let mut ctx = RequestContext::new(claims.user_id(), claims.role);
        if let Some(hospital_id) = claims.hospital_id {
            ctx = ctx.with_hospital(hospital_id);
        }
        if let Some(staff_role) = claims.staff_role {
            ctx = ctx.with_staff_role(staff_role);
        }

        tracing::debug!(user_id = %ctx.user_id, role = %ctx.role, "Authenticated request");
        Ok(AuthUser(ctx))
    }
}
