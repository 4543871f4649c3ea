//! Common test utilities for ecocollect integration tests.

#![allow(dead_code)] // Some utilities are used by different test files

use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use axum::Router;
use axum_test::TestServer;
use jsonwebtoken::{encode, EncodingKey, Header};
use serde::Serialize;
use tempfile::TempDir;

use ecocollect_core::{Role, User, UserId, WasteReport};
use ecocollect_service::{create_router, AppState, ServiceConfig};
use ecocollect_store::{RocksStore, Store};

/// HS256 secret shared between the harness config and minted test JWTs.
const AUTH_SECRET: &str = "test-secret";

#[derive(Serialize)]
struct Claims {
    sub: String,
    exp: usize,
}

/// Test harness containing everything needed for integration tests.
pub struct TestHarness {
    /// The test server for making HTTP requests.
    pub server: TestServer,
    /// Temporary directory for the database (kept alive for test duration).
    pub _temp_dir: TempDir,
    /// Direct handle to the store for seeding and assertions.
    pub store: Arc<RocksStore>,
    /// The application state (for spawning the dispatcher in tests).
    pub state: Arc<AppState>,
    /// The service API key for trigger requests.
    pub service_api_key: String,
}

impl TestHarness {
    /// Create a new test harness with a fresh database.
    pub fn new() -> Self {
        Self::with_reward_points(10)
    }

    /// Create a harness with a custom per-collection reward.
    pub fn with_reward_points(reward_points: i64) -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let store =
            Arc::new(RocksStore::open(temp_dir.path()).expect("Failed to open store"));

        let service_api_key = "test-service-key".to_string();

        let config = ServiceConfig {
            listen_addr: "127.0.0.1:0".into(),
            data_dir: temp_dir.path().to_string_lossy().to_string(),
            auth_secret: Some(AUTH_SECRET.into()),
            service_api_key: Some(service_api_key.clone()),
            reward_points,
            // Tests drive the trigger endpoints explicitly; the
            // dispatcher test spawns one itself.
            dispatcher_enabled: false,
            cors_origins: vec!["*".into()],
            max_body_bytes: 1024 * 1024,
            request_timeout_seconds: 30,
        };

        let state = Arc::new(AppState::new(Arc::clone(&store), config));
        let router: Router = create_router((*state).clone());

        let server = TestServer::new(router).expect("Failed to create test server");

        Self {
            server,
            _temp_dir: temp_dir,
            store,
            state,
            service_api_key,
        }
    }

    /// Mint a valid bearer header for a user.
    pub fn auth_header(user_id: &UserId) -> String {
        let exp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("clock before epoch")
            .as_secs() as usize
            + 3600;

        let claims = Claims {
            sub: user_id.to_string(),
            exp,
        };

        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(AUTH_SECRET.as_bytes()),
        )
        .expect("Failed to encode test JWT");

        format!("Bearer {token}")
    }

    /// Seed a worker profile directly in the store.
    pub fn seed_worker(&self, name: &str) -> User {
        let user = User::new(
            UserId::generate(),
            name,
            format!("{name}@example.com"),
            Role::Worker,
        );
        self.store.put_user(&user).expect("Failed to seed worker");
        user
    }

    /// Seed a resident profile directly in the store.
    pub fn seed_resident(&self, name: &str) -> User {
        let user = User::new(
            UserId::generate(),
            name,
            format!("{name}@example.com"),
            Role::Resident,
        );
        self.store.put_user(&user).expect("Failed to seed resident");
        user
    }

    /// Seed a pending report directly in the store.
    pub fn seed_pending_report(&self, resident_id: UserId) -> WasteReport {
        let report = WasteReport::new(resident_id, "Main St", 1.0, 2.0, "photos/f1");
        self.store
            .create_report(&report)
            .expect("Failed to seed report");
        report
    }
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}
