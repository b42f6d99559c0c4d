//! Application configuration.

use serde::Deserialize;
use std::path::Path;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Server configuration.
    pub server: ServerConfig,
    /// Database configuration.
    pub database: DatabaseConfig,
    /// Authentication configuration.
    pub auth: AuthConfig,
    /// Request limit configuration.
    #[serde(default)]
    pub limits: LimitsConfig,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to bind to.
    #[serde(default = "default_port")]
    pub port: u16,
}

/// Database connection configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// `PostgreSQL` connection URL.
    pub url: String,
    /// Maximum number of connections in the pool.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Minimum number of connections in the pool.
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
    /// Seconds to wait when establishing a new connection.
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
    /// Seconds to wait when acquiring a connection from the pool.
    #[serde(default = "default_acquire_timeout_secs")]
    pub acquire_timeout_secs: u64,
    /// Seconds an idle connection is kept before being closed.
    #[serde(default = "default_idle_timeout_secs")]
    pub idle_timeout_secs: u64,
    /// Maximum lifetime of a pooled connection in seconds.
    #[serde(default = "default_max_lifetime_secs")]
    pub max_lifetime_secs: u64,
}

/// Authentication configuration.
///
/// When `dev_mode` is enabled, token validation is skipped entirely and every
/// request runs as `demo_user_id`.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    /// Skip token validation and act as the demo user.
    #[serde(default)]
    pub dev_mode: bool,
    /// Fixed owner id used while in dev mode.
    #[serde(default = "default_demo_user_id")]
    pub demo_user_id: String,
    /// HS256 secret used to verify session JWTs. Required outside dev mode.
    #[serde(default)]
    pub jwt_secret: Option<String>,
    /// Name of the session cookie checked when no Authorization header is set.
    #[serde(default = "default_session_cookie")]
    pub session_cookie: String,
}

/// Pagination, batching, and active-entity limits.
#[derive(Debug, Clone, Deserialize)]
pub struct LimitsConfig {
    /// Default page size for list endpoints.
    #[serde(default = "default_page_size")]
    pub page_size: u64,
    /// Maximum page size a client may request.
    #[serde(default = "default_max_page_size")]
    pub max_page_size: u64,
    /// Default batch size for bulk operations.
    #[serde(default = "default_batch_size")]
    pub batch_size: u64,
    /// Maximum keyword ids accepted by a single bulk relation request.
    #[serde(default = "default_max_keywords_per_request")]
    pub max_keywords_per_request: usize,
    /// Maximum simultaneously active companies per owner.
    #[serde(default = "default_company_active_limit")]
    pub company_active_limit: u64,
    /// Maximum simultaneously active ad campaigns per owner.
    #[serde(default = "default_ad_campaign_active_limit")]
    pub ad_campaign_active_limit: u64,
    /// Maximum simultaneously active ad groups per owner.
    #[serde(default = "default_ad_group_active_limit")]
    pub ad_group_active_limit: u64,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
            max_page_size: default_max_page_size(),
            batch_size: default_batch_size(),
            max_keywords_per_request: default_max_keywords_per_request(),
            company_active_limit: default_company_active_limit(),
            ad_campaign_active_limit: default_ad_campaign_active_limit(),
            ad_group_active_limit: default_ad_group_active_limit(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

const fn default_port() -> u16 {
    8000
}

const fn default_max_connections() -> u32 {
    100
}

const fn default_min_connections() -> u32 {
    5
}

const fn default_connect_timeout_secs() -> u64 {
    10
}

const fn default_acquire_timeout_secs() -> u64 {
    10
}

const fn default_idle_timeout_secs() -> u64 {
    600
}

const fn default_max_lifetime_secs() -> u64 {
    1800
}

fn default_demo_user_id() -> String {
    "clerk_demo_user".to_string()
}

fn default_session_cookie() -> String {
    "__session".to_string()
}

const fn default_page_size() -> u64 {
    50
}

const fn default_max_page_size() -> u64 {
    100
}

const fn default_batch_size() -> u64 {
    25
}

const fn default_max_keywords_per_request() -> usize {
    100
}

const fn default_company_active_limit() -> u64 {
    3
}

const fn default_ad_campaign_active_limit() -> u64 {
    5
}

const fn default_ad_group_active_limit() -> u64 {
    7
}

impl Config {
    /// Load configuration from files and environment variables.
    ///
    /// Configuration is loaded in the following order:
    /// 1. `config/default.toml`
    /// 2. `config/{environment}.toml` (based on `KPLANNER_ENV`)
    /// 3. Environment variables with `KPLANNER_` prefix
    pub fn load() -> Result<Self, config::ConfigError> {
        let env = std::env::var("KPLANNER_ENV").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{env}")).required(false))
            .add_source(
                config::Environment::with_prefix("KPLANNER")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }

    /// Load configuration from a specific file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::from(path.as_ref()))
            .add_source(
                config::Environment::with_prefix("KPLANNER")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_database_timeout_defaults() {
        let db: DatabaseConfig = serde_json::from_value(serde_json::json!({
            "url": "postgres://localhost/kplanner"
        }))
        .unwrap();
        assert_eq!(db.connect_timeout_secs, 10);
        assert_eq!(db.acquire_timeout_secs, 10);
        assert_eq!(db.idle_timeout_secs, 600);
        assert_eq!(db.max_lifetime_secs, 1800);
    }

    #[test]
    fn test_limits_defaults() {
        let limits = LimitsConfig::default();
        assert_eq!(limits.page_size, 50);
        assert_eq!(limits.max_page_size, 100);
        assert_eq!(limits.batch_size, 25);
        assert_eq!(limits.max_keywords_per_request, 100);
        assert_eq!(limits.company_active_limit, 3);
        assert_eq!(limits.ad_campaign_active_limit, 5);
        assert_eq!(limits.ad_group_active_limit, 7);
    }
}
