pub mod auth;
pub mod rate_limit;

pub use auth::{jwt_auth_middleware, AuthUser};
pub use rate_limit::{rate_limit_middleware, RateLimiter};

use axum::http::HeaderMap;

/// Pull the bearer token out of the Authorization header, if any. The scheme
/// match is case-insensitive.
pub(crate) fn bearer_token(headers: &HeaderMap) -> Option<String> {
    let value = headers.get("authorization")?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();
    if token.is_empty() {
        return None;
    }
    Some(token.to_string())
}
