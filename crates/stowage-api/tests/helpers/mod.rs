//! Test helpers: build the router over a temporary upload directory.
//!
//! Run from workspace root: `cargo test -p stowage-api`.

#![allow(dead_code)]

use axum_test::TestServer;
use std::collections::HashMap;
use std::path::Path;
use stowage_api::setup::routes;
use stowage_api::state::AppState;
use stowage_core::Config;
use stowage_storage::{UploadConfig, Uploader};
use tempfile::TempDir;

/// Limit used by most tests so oversize cases stay small.
pub const TEST_LIMIT_BYTES: u64 = 64 * 1024;

/// Test application: server plus the directory it writes to.
pub struct TestApp {
    pub server: TestServer,
    pub upload_dir: TempDir,
}

impl TestApp {
    pub fn client(&self) -> &TestServer {
        &self.server
    }

    pub fn upload_path(&self) -> &Path {
        self.upload_dir.path()
    }

    /// Names currently in the upload directory, sorted.
    pub fn stored_files(&self) -> Vec<String> {
        let mut names: Vec<String> = std::fs::read_dir(self.upload_path())
            .expect("Failed to read upload dir")
            .map(|e| e.expect("bad dir entry").file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }
}

pub fn test_config(upload_dir: &Path, limit: u64) -> Config {
    let vars: HashMap<&str, String> = HashMap::from([
        ("UPLOAD_DIR", upload_dir.display().to_string()),
        ("MAX_FILE_SIZE_BYTES", limit.to_string()),
        ("ENVIRONMENT", "test".to_string()),
    ]);
    Config::from_lookup(|key| vars.get(key).cloned()).expect("Failed to build test config")
}

pub async fn setup_test_app() -> TestApp {
    setup_test_app_with_limit(TEST_LIMIT_BYTES).await
}

pub async fn setup_test_app_with_limit(limit: u64) -> TestApp {
    let upload_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let config = test_config(upload_dir.path(), limit);

    let uploader = Uploader::init(UploadConfig::from(&config))
        .await
        .expect("Failed to init uploader");
    let state = AppState::new(config.clone(), uploader);
    let app = routes::setup_routes(&config, state).expect("Failed to build router");

    let server = TestServer::new(app.into_make_service()).expect("Failed to create test server");

    TestApp { server, upload_dir }
}
