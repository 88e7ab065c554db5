//! Per-token cooldown gate in front of the `/api` surface.
//!
//! Each bearer token must wait a full cooldown between consecutive requests.
//! The last-seen stamp is updated even when a request is rejected, so a
//! caller that hammers the API keeps pushing its own unlock time out.
//!
//! State is a single in-process map; the limiter makes no promises across
//! multiple server instances.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};
use std::time::{Duration, Instant};

use axum::{
    extract::{OriginalUri, Request, State},
    http::{header, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};

use crate::config::ApiConfig;
use crate::error::ApiError;
use crate::AppState;

use super::bearer_token;

#[derive(Debug, PartialEq)]
pub enum Decision {
    Allowed,
    Limited { retry_in: Duration },
}

pub struct RateLimiter {
    cooldown: Duration,
    capacity: usize,
    last_seen: Mutex<HashMap<String, Instant>>,
}

impl RateLimiter {
    pub fn new(api: &ApiConfig) -> Self {
        Self {
            cooldown: Duration::from_millis(api.cooldown_ms),
            capacity: api.limiter_capacity,
            last_seen: Mutex::new(HashMap::new()),
        }
    }

    pub fn check(&self, token: &str) -> Decision {
        self.check_at(token, Instant::now())
    }

    /// Single atomic read-and-stamp under one lock: two requests from the
    /// same token arriving together cannot both slip through the cooldown.
    fn check_at(&self, token: &str, now: Instant) -> Decision {
        let mut last_seen = self
            .last_seen
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        if last_seen.len() >= self.capacity && !last_seen.contains_key(token) {
            // Bounded TTL sweep: stamps older than the cooldown would allow
            // the request anyway, so they are safe to forget.
            last_seen.retain(|_, seen| now.saturating_duration_since(*seen) < self.cooldown);
        }

        match last_seen.insert(token.to_string(), now) {
            None => Decision::Allowed,
            Some(previous) => {
                let elapsed = now.saturating_duration_since(previous);
                if elapsed < self.cooldown {
                    Decision::Limited {
                        retry_in: self.cooldown - elapsed,
                    }
                } else {
                    Decision::Allowed
                }
            }
        }
    }

    #[cfg(test)]
    fn tracked(&self) -> usize {
        self.last_seen
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

/// Requests without a bearer token pass through untouched; the token gate
/// behind this layer deals with those.
pub async fn rate_limit_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let Some(token) = bearer_token(request.headers()) else {
        return next.run(request).await;
    };

    match state.limiter.check(&token) {
        Decision::Allowed => next.run(request).await,
        Decision::Limited { retry_in } => {
            // Nested routers see a stripped path; the original URI extension
            // still carries the one the caller used.
            let path = request
                .extensions()
                .get::<OriginalUri>()
                .map(|uri| uri.path().to_string())
                .unwrap_or_else(|| request.uri().path().to_string());
            let retry_after_secs = retry_in.as_secs_f64().ceil() as u64;
            tracing::debug!("rate limited request to {} ({}s left)", path, retry_after_secs);

            let error = ApiError::rate_limited(retry_after_secs);
            (
                StatusCode::TOO_MANY_REQUESTS,
                [(header::RETRY_AFTER, retry_after_secs.to_string())],
                Json(error.problem_body(Some(&path))),
            )
                .into_response()
        }
    }
}
