use once_cell::sync::Lazy;
use std::env;

/// Process-wide configuration. The issuer string and signing key are the only
/// externally supplied secrets; everything else has sensible defaults.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub api: ApiConfig,
    pub security: SecurityConfig,
}

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub port: u16,
    /// Page size used when a list request does not specify one.
    pub default_page_size: i64,
    /// Minimum permitted time between consecutive requests from one token.
    pub cooldown_ms: u64,
    /// Tracked-token count above which the limiter sweeps stale entries.
    pub limiter_capacity: usize,
}

#[derive(Debug, Clone)]
pub struct SecurityConfig {
    pub issuer: String,
    pub signing_key: String,
    /// Lifetime of tokens minted by the demo issuer.
    pub token_expiry_days: i64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            port: 3000,
            default_page_size: 5,
            cooldown_ms: 5_000,
            limiter_capacity: 10_000,
        }
    }
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            issuer: "timetrack-api".to_string(),
            // Demo fallback so the server starts out of the box. Supply
            // TIMETRACK_SIGNING_KEY in any real deployment.
            signing_key: "insecure-demo-signing-key-change-me".to_string(),
            token_expiry_days: 365,
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api: ApiConfig::default(),
            security: SecurityConfig::default(),
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::default().with_env_overrides()
    }

    fn with_env_overrides(mut self) -> Self {
        // API overrides
        if let Ok(v) = env::var("TIMETRACK_PORT").or_else(|_| env::var("PORT")) {
            self.api.port = v.parse().unwrap_or(self.api.port);
        }
        if let Ok(v) = env::var("TIMETRACK_DEFAULT_PAGE_SIZE") {
            self.api.default_page_size = v.parse().unwrap_or(self.api.default_page_size);
        }
        if let Ok(v) = env::var("TIMETRACK_COOLDOWN_MS") {
            self.api.cooldown_ms = v.parse().unwrap_or(self.api.cooldown_ms);
        }
        if let Ok(v) = env::var("TIMETRACK_LIMITER_CAPACITY") {
            self.api.limiter_capacity = v.parse().unwrap_or(self.api.limiter_capacity);
        }

        // Security overrides
        if let Ok(v) = env::var("TIMETRACK_ISSUER") {
            self.security.issuer = v;
        }
        if let Ok(v) = env::var("TIMETRACK_SIGNING_KEY") {
            self.security.signing_key = v;
        }
        if let Ok(v) = env::var("TIMETRACK_TOKEN_EXPIRY_DAYS") {
            self.security.token_expiry_days = v.parse().unwrap_or(self.security.token_expiry_days);
        }

        self
    }

    /// True when the process is still running on the built-in demo key.
    pub fn uses_demo_key(&self) -> bool {
        self.security.signing_key == SecurityConfig::default().signing_key
    }
}

// Global singleton config - initialized once at startup
pub static CONFIG: Lazy<AppConfig> = Lazy::new(AppConfig::from_env);

// Convenience function for accessing config
pub fn config() -> &'static AppConfig {
    &CONFIG
}
