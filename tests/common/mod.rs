use std::sync::Arc;

use anyhow::{Context, Result};
use timetrack_api::{app, config::AppConfig, store::memory::MemoryStore};

/// In-process server on an ephemeral port, with its own fresh store and
/// limiter so tests cannot interfere with each other.
pub struct TestServer {
    pub base_url: String,
    pub client: reqwest::Client,
}

impl TestServer {
    /// Spawn with the cooldown disabled; CRUD scenarios fire many requests
    /// from one token in quick succession.
    pub async fn spawn() -> Result<Self> {
        let mut config = AppConfig::default();
        config.api.cooldown_ms = 0;
        Self::spawn_with(config).await
    }

    pub async fn spawn_with(config: AppConfig) -> Result<Self> {
        let router = app(&config, Arc::new(MemoryStore::new()));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .context("failed to bind test listener")?;
        let addr = listener.local_addr()?;

        tokio::spawn(async move {
            axum::serve(listener, router).await.expect("test server");
        });

        Ok(Self {
            base_url: format!("http://{}", addr),
            client: reqwest::Client::new(),
        })
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Fetch a signed token from the demo issuer.
    pub async fn token(&self, name: &str, admin: bool) -> Result<String> {
        let res = self
            .client
            .get(self.url(&format!("/get-token?name={}&admin={}", name, admin)))
            .send()
            .await?;
        anyhow::ensure!(
            res.status().is_success(),
            "token issuance failed: {}",
            res.status()
        );
        Ok(res.text().await?)
    }
}
