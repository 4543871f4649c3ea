//! Service configuration.

use ecocollect_core::DEFAULT_REWARD_POINTS;

/// Service configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Address to listen on (default: "0.0.0.0:8080").
    pub listen_addr: String,

    /// Path to `RocksDB` data directory (default: "/data/ecocollect").
    pub data_dir: String,

    /// HS256 secret shared with the identity service for validating
    /// user JWTs. Requests with `Bearer` tokens are rejected when unset.
    pub auth_secret: Option<String>,

    /// Service API key for trigger/service-to-service auth.
    pub service_api_key: Option<String>,

    /// Points credited per completed collection.
    pub reward_points: i64,

    /// Whether to run the in-process trigger dispatcher.
    pub dispatcher_enabled: bool,

    /// CORS allowed origins.
    pub cors_origins: Vec<String>,

    /// Maximum request body size in bytes.
    pub max_body_bytes: usize,

    /// Request timeout in seconds.
    pub request_timeout_seconds: u64,
}

impl ServiceConfig {
    /// Load configuration from environment variables.
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            listen_addr: std::env::var("LISTEN_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".into()),
            data_dir: std::env::var("DATA_DIR").unwrap_or_else(|_| "/data/ecocollect".into()),
            auth_secret: std::env::var("AUTH_SECRET").ok(),
            service_api_key: std::env::var("SERVICE_API_KEY").ok(),
            reward_points: std::env::var("REWARD_POINTS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_REWARD_POINTS),
            dispatcher_enabled: std::env::var("DISPATCHER_ENABLED")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(true),
            cors_origins: std::env::var("CORS_ORIGINS")
                .unwrap_or_else(|_| "*".into())
                .split(',')
                .map(|s| s.trim().to_string())
                .collect(),
            max_body_bytes: std::env::var("MAX_BODY_BYTES")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(1024 * 1024), // 1MB
            request_timeout_seconds: std::env::var("REQUEST_TIMEOUT_SECONDS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(30),
        }
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            listen_addr: "0.0.0.0:8080".into(),
            data_dir: "/data/ecocollect".into(),
            auth_secret: None,
            service_api_key: None,
            reward_points: DEFAULT_REWARD_POINTS,
            dispatcher_enabled: true,
            cors_origins: vec!["*".into()],
            max_body_bytes: 1024 * 1024,
            request_timeout_seconds: 30,
        }
    }
}
