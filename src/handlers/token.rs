use axum::extract::{Query, State};
use serde::Deserialize;

use crate::auth;
use crate::error::ApiError;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct TokenQuery {
    pub name: Option<String>,
    #[serde(default)]
    pub admin: bool,
}

/// GET /get-token?name=&admin= - mint a signed bearer token.
///
/// DEMO ONLY: unauthenticated, hands the admin role to anyone who asks for
/// it, and the tokens live for about a year with no revocation. A stand-in
/// for a real identity provider, nothing more.
pub async fn get_token(
    State(state): State<AppState>,
    Query(query): Query<TokenQuery>,
) -> Result<String, ApiError> {
    let name = query
        .name
        .filter(|n| !n.trim().is_empty())
        .ok_or_else(|| ApiError::bad_request("name query parameter is required"))?;

    auth::issue_token(&name, query.admin, &state.security).map_err(|err| {
        tracing::error!("token issuance failed: {}", err);
        ApiError::internal("could not issue a token")
    })
}
