use std::sync::Arc;

use timetrack_api::{app, config, store::memory::MemoryStore};

#[tokio::main]
async fn main() {
    // Load .env if present so cargo run picks up TIMETRACK_SIGNING_KEY etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt::init();

    let config = config::config();
    if config.uses_demo_key() {
        tracing::warn!("running with the built-in demo signing key; set TIMETRACK_SIGNING_KEY");
    }
    tracing::warn!("demo token issuer enabled at /get-token; not a production identity provider");

    let app = app(config, Arc::new(MemoryStore::new()));

    let bind_addr = format!("0.0.0.0:{}", config.api.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .unwrap_or_else(|e| panic!("failed to bind {}: {}", bind_addr, e));

    tracing::info!("timetrack-api listening on http://{}", bind_addr);

    axum::serve(listener, app).await.expect("server");
}
