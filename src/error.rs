// HTTP API Error Types
use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::{json, Value};
use std::collections::HashMap;

/// HTTP API error with appropriate status codes and client-friendly messages.
///
/// Handlers return these as typed outcomes; conversion to an HTTP response
/// happens in exactly one place (`IntoResponse` below). Response bodies are
/// RFC-7807 problem documents: `{type, title, detail, instance, status}`.
#[derive(Debug)]
pub enum ApiError {
    // 400 Bad Request
    BadRequest(String),
    ValidationFailed {
        detail: String,
        field_errors: HashMap<String, String>,
    },

    // 401 Unauthorized
    Unauthenticated(String),

    // 403 Forbidden
    Forbidden(String),

    // 404 Not Found
    NotFound(String),

    // 429 Too Many Requests
    RateLimited {
        /// Seconds until the cooldown elapses, rounded up.
        retry_after_secs: u64,
    },

    // 500 Internal Server Error
    Internal(String),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::ValidationFailed { .. } => StatusCode::BAD_REQUEST,
            ApiError::Unauthenticated(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::RateLimited { .. } => StatusCode::TOO_MANY_REQUESTS,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Short, human-readable summary of the problem type.
    pub fn title(&self) -> &'static str {
        match self {
            ApiError::BadRequest(_) => "Bad request",
            ApiError::ValidationFailed { .. } => "Validation failed",
            ApiError::Unauthenticated(_) => "Authentication required",
            ApiError::Forbidden(_) => "Insufficient permissions",
            ApiError::NotFound(_) => "Not found",
            ApiError::RateLimited { .. } => "Limit reached",
            ApiError::Internal(_) => "Internal server error",
        }
    }

    /// Client-safe explanation specific to this occurrence.
    pub fn detail(&self) -> &str {
        match self {
            ApiError::BadRequest(msg) => msg,
            ApiError::ValidationFailed { detail, .. } => detail,
            ApiError::Unauthenticated(msg) => msg,
            ApiError::Forbidden(msg) => msg,
            ApiError::NotFound(msg) => msg,
            ApiError::RateLimited { retry_after_secs: _ } => {
                "too many requests from this token, slow down"
            }
            ApiError::Internal(msg) => msg,
        }
    }

    /// Build the RFC-7807 problem body. `instance` is the request path when
    /// the caller knows it.
    pub fn problem_body(&self, instance: Option<&str>) -> Value {
        let mut body = json!({
            "type": "about:blank",
            "title": self.title(),
            "detail": self.detail(),
            "status": self.status_code().as_u16(),
            "instance": instance,
        });

        if let ApiError::ValidationFailed { field_errors, .. } = self {
            body["errors"] = json!(field_errors);
        }

        body
    }
}

// Static constructor methods
impl ApiError {
    pub fn bad_request(detail: impl Into<String>) -> Self {
        ApiError::BadRequest(detail.into())
    }

    pub fn validation_failed(
        detail: impl Into<String>,
        field_errors: HashMap<String, String>,
    ) -> Self {
        ApiError::ValidationFailed {
            detail: detail.into(),
            field_errors,
        }
    }

    pub fn unauthenticated(detail: impl Into<String>) -> Self {
        ApiError::Unauthenticated(detail.into())
    }

    pub fn forbidden(detail: impl Into<String>) -> Self {
        ApiError::Forbidden(detail.into())
    }

    pub fn not_found(detail: impl Into<String>) -> Self {
        ApiError::NotFound(detail.into())
    }

    pub fn rate_limited(retry_after_secs: u64) -> Self {
        ApiError::RateLimited { retry_after_secs }
    }

    pub fn internal(detail: impl Into<String>) -> Self {
        ApiError::Internal(detail.into())
    }
}

impl From<crate::store::StoreError> for ApiError {
    fn from(err: crate::store::StoreError) -> Self {
        // Log the real error but return an opaque message; store internals
        // never cross the API boundary.
        tracing::error!("record store error: {}", err);
        ApiError::internal("An error occurred while processing your request")
    }
}

// Standard error trait implementations
impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.detail())
    }
}

impl std::error::Error for ApiError {}

// Automatic HTTP response conversion for Axum
impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        (self.status_code(), Json(self.problem_body(None))).into_response()
    }
}

/// Catch-all boundary for panicking handlers: log the payload server-side,
/// hand the client an opaque 500 problem document.
pub fn handle_panic(err: Box<dyn std::any::Any + Send + 'static>) -> axum::response::Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.as_str()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s
    } else {
        "unknown panic payload"
    };
    tracing::error!("request handler panicked: {}", detail);

    let error = ApiError::internal("An unexpected error occurred");
    (error.status_code(), Json(error.problem_body(None))).into_response()
}
