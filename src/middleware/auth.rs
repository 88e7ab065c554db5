use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

use crate::auth::{self, Claims};
use crate::error::ApiError;
use crate::AppState;

use super::bearer_token;

/// Authenticated caller context extracted from the bearer token.
#[derive(Clone, Debug)]
pub struct AuthUser {
    pub name: String,
    pub token_id: Uuid,
    pub is_admin: bool,
}

impl AuthUser {
    /// Role gate for mutating operations: create, update and delete all
    /// require the admin claim.
    pub fn require_admin(&self) -> Result<(), ApiError> {
        if self.is_admin {
            Ok(())
        } else {
            Err(ApiError::forbidden("admin role required for this operation"))
        }
    }
}

impl From<Claims> for AuthUser {
    fn from(claims: Claims) -> Self {
        Self {
            name: claims.sub,
            token_id: claims.jti,
            is_admin: claims.admin,
        }
    }
}

/// Token validation middleware guarding the `/api` surface. Verifies the
/// bearer token and injects the caller context into the request.
pub async fn jwt_auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = bearer_token(request.headers())
        .ok_or_else(|| ApiError::unauthenticated("missing or malformed bearer token"))?;

    let claims = auth::validate_token(&token, &state.security).map_err(|err| {
        tracing::debug!("rejected bearer token: {}", err);
        ApiError::unauthenticated("invalid or expired bearer token")
    })?;

    request.extensions_mut().insert(AuthUser::from(claims));
    Ok(next.run(request).await)
}
