pub mod auth;
pub mod config;
pub mod domain;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod pagination;
pub mod store;

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    middleware::from_fn_with_state,
    response::{IntoResponse, Json},
    routing::get,
    Router,
};
use serde_json::{json, Value};
use tower_http::{catch_panic::CatchPanicLayer, cors::CorsLayer, trace::TraceLayer};

use crate::config::{AppConfig, SecurityConfig};
use crate::middleware::{jwt_auth_middleware, rate_limit_middleware, RateLimiter};
use crate::store::{EntityStore, RecordStore};

/// Shared per-process state: the record store, the limiter's token map and
/// the bits of config the request path needs.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn RecordStore>,
    pub limiter: Arc<RateLimiter>,
    pub security: SecurityConfig,
    pub default_page_size: i64,
}

/// Build the full application router.
///
/// Every `/api` request runs the same gate pipeline: token validation, then
/// the per-token rate limit, then route dispatch; mutating handlers apply the
/// admin role check themselves.
pub fn app(config: &AppConfig, store: Arc<dyn RecordStore>) -> Router {
    let state = AppState {
        store,
        limiter: Arc::new(RateLimiter::new(&config.api)),
        security: config.security.clone(),
        default_page_size: config.api.default_page_size,
    };

    // The same resource surface is reachable bare and under a version
    // segment. Layers run top-down for incoming requests: the auth layer
    // added last is the outermost, so the order is token check, then rate
    // limit, then dispatch.
    let resources = resource_routes();
    let api = resources
        .clone()
        .nest("/v1", resources)
        .layer(from_fn_with_state(state.clone(), rate_limit_middleware))
        .layer(from_fn_with_state(state.clone(), jwt_auth_middleware));

    Router::new()
        // Public
        .route("/", get(root))
        .route("/health", get(health))
        .route("/get-token", get(handlers::token::get_token))
        // Protected resource surface
        .nest("/api", api)
        // Global middleware
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .layer(CatchPanicLayer::custom(error::handle_panic))
        .with_state(state)
}

fn resource_routes() -> Router<AppState> {
    use crate::handlers::{clients, projects, time_entries, users};

    Router::new()
        .route("/users", get(users::list).post(users::create))
        .route(
            "/users/:id",
            get(users::get).put(users::update).delete(users::remove),
        )
        .route("/clients", get(clients::list).post(clients::create))
        .route(
            "/clients/:id",
            get(clients::get)
                .put(clients::update)
                .delete(clients::remove),
        )
        .route("/projects", get(projects::list).post(projects::create))
        .route(
            "/projects/:id",
            get(projects::get)
                .put(projects::update)
                .delete(projects::remove),
        )
        .route(
            "/time-entries",
            get(time_entries::list).post(time_entries::create),
        )
        .route(
            "/time-entries/:id",
            get(time_entries::get)
                .put(time_entries::update)
                .delete(time_entries::remove),
        )
        .route(
            "/time-entries/user/:user_id/:year/:month",
            get(time_entries::by_user_month),
        )
}

async fn root() -> Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    Json(json!({
        "name": "timetrack-api",
        "version": version,
        "endpoints": {
            "home": "/ (public)",
            "health": "/health (public)",
            "token": "/get-token?name=&admin= (public, demo-only issuer)",
            "users": "/api/users[/:id] (bearer token; writes need admin)",
            "clients": "/api/clients[/:id] (bearer token; writes need admin)",
            "projects": "/api/projects[/:id] (bearer token; writes need admin)",
            "time_entries": "/api/time-entries[/:id] (bearer token; writes need admin)",
            "monthly": "/api/time-entries/user/:userId/:year/:month (bearer token)",
            "versioned": "/api/v1/* (same surface)",
        }
    }))
}

async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let now = chrono::Utc::now();

    let counts = async {
        Ok::<_, crate::store::StoreError>(json!({
            "users": state.store.users().count().await?,
            "clients": state.store.clients().count().await?,
            "projects": state.store.projects().count().await?,
            "timeEntries": state.store.time_entries().count().await?,
        }))
    }
    .await;

    match counts {
        Ok(store) => (
            StatusCode::OK,
            Json(json!({
                "status": "ok",
                "timestamp": now,
                "store": store,
            })),
        ),
        Err(e) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({
                "status": "degraded",
                "timestamp": now,
                "storeError": e.to_string(),
            })),
        ),
    }
}
