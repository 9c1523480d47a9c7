//! Test helpers: build AppState and router for integration tests.
//!
//! Run from workspace root: `cargo test -p attache-api --test files_test`. The app is
//! wired with the in-memory metadata store and the local storage backend, so no
//! database or bucket is needed.

#![allow(dead_code)]

use attache_api::constants;
use attache_api::setup::routes;
use attache_api::state::AppState;
use attache_core::{BaseConfig, Config, StorageBackend, TransferConfig, DEFAULT_KEY_PREFIX};
use attache_db::{AttachmentStore, InMemoryAttachmentStore};
use attache_storage::{LocalStorage, Storage};
use axum_test::TestServer;
use std::sync::Arc;
use tempfile::TempDir;

/// Request body ceiling used by the test app.
pub const TEST_MAX_FILE_SIZE_BYTES: usize = 1024 * 1024;

/// API path prefix for tests (e.g. `/api/v0`).
pub fn api_path(path: &str) -> String {
    format!("{}{}", constants::API_PREFIX, path)
}

/// Test application: server, collaborators and owned directories.
pub struct TestApp {
    pub server: TestServer,
    pub store: Arc<InMemoryAttachmentStore>,
    pub storage: Arc<dyn Storage>,
    pub staging_dir: TempDir,
    pub _bucket_dir: TempDir,
}

impl TestApp {
    pub fn client(&self) -> &TestServer {
        &self.server
    }

    /// Number of files left in the staging directory.
    pub fn staged_file_count(&self) -> usize {
        std::fs::read_dir(self.staging_dir.path())
            .expect("Failed to read staging directory")
            .count()
    }
}

pub fn create_test_config(staging_dir: &TempDir, bucket_dir: &TempDir) -> Config {
    Config::new(TransferConfig {
        base: BaseConfig {
            server_port: 0,
            cors_origins: vec!["*".to_string()],
            db_max_connections: 1,
            db_timeout_seconds: 1,
            environment: "test".to_string(),
        },
        database_url: "postgres://localhost/attache_test".to_string(),
        storage_backend: Some(StorageBackend::Local),
        s3_bucket: None,
        s3_region: None,
        s3_endpoint: None,
        aws_region: None,
        local_storage_path: Some(bucket_dir.path().to_string_lossy().into_owned()),
        upload_dir: staging_dir.path().to_string_lossy().into_owned(),
        key_prefix: DEFAULT_KEY_PREFIX.to_string(),
        max_file_size_bytes: TEST_MAX_FILE_SIZE_BYTES,
    })
}

/// Setup test app with an in-memory store and local storage.
pub async fn setup_test_app() -> TestApp {
    let store = Arc::new(InMemoryAttachmentStore::new());
    setup_test_app_with_store(store.clone(), store).await
}

/// Setup test app with a custom metadata store; `records` is the handle tests inspect.
pub async fn setup_test_app_with_store(
    store: Arc<dyn AttachmentStore>,
    records: Arc<InMemoryAttachmentStore>,
) -> TestApp {
    let staging_dir = tempfile::tempdir().expect("Failed to create staging directory");
    let bucket_dir = tempfile::tempdir().expect("Failed to create bucket directory");
    let config = create_test_config(&staging_dir, &bucket_dir);

    let storage: Arc<dyn Storage> = Arc::new(
        LocalStorage::new(bucket_dir.path())
            .await
            .expect("Failed to create local storage"),
    );

    let state = Arc::new(AppState::from_config(&config, store, storage.clone()));
    let app = routes::setup_routes(&config, state).expect("Failed to build routes");
    let server = TestServer::new(app.into_make_service()).expect("Failed to create test server");

    TestApp {
        server,
        store: records,
        storage,
        staging_dir,
        _bucket_dir: bucket_dir,
    }
}
