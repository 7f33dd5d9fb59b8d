//! Test helpers: build the router over a temporary upload directory.
//!
//! Run from workspace root: `cargo test -p picdrop-api`.
#![allow(dead_code)]

pub mod fixtures;

use axum_test::multipart::{MultipartForm, Part};
use axum_test::TestServer;
use picdrop_api::setup::build_app;
use picdrop_core::Config;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Test application: server and the directory it stores into.
pub struct TestApp {
    pub server: TestServer,
    pub upload_dir: PathBuf,
    pub _temp_dir: TempDir,
}

impl TestApp {
    pub fn client(&self) -> &TestServer {
        &self.server
    }

    pub fn upload_dir(&self) -> &Path {
        &self.upload_dir
    }

    /// Names of every entry in the upload directory, temporary files included.
    pub fn stored_files(&self) -> Vec<String> {
        let mut names: Vec<String> = std::fs::read_dir(&self.upload_dir)
            .expect("upload dir readable")
            .map(|entry| {
                entry
                    .expect("dir entry")
                    .file_name()
                    .to_string_lossy()
                    .into_owned()
            })
            .collect();
        names.sort();
        names
    }
}

/// Setup test app with default configuration.
pub async fn setup_test_app() -> TestApp {
    setup_test_app_with(|_| {}).await
}

/// Setup test app after adjusting the configuration.
pub async fn setup_test_app_with(customize: impl FnOnce(&mut Config)) -> TestApp {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let upload_dir = temp_dir.path().join("uploads");

    let mut config = Config::for_upload_dir(&upload_dir);
    customize(&mut config);

    let (_state, app) = build_app(config).await.expect("Failed to build app");
    let server = TestServer::new(app.into_make_service()).expect("Failed to create test server");

    TestApp {
        server,
        upload_dir,
        _temp_dir: temp_dir,
    }
}

/// Multipart form with a single `image` file part.
pub fn image_form(file_name: &str, data: Vec<u8>) -> MultipartForm {
    MultipartForm::new().add_part("image", image_part(file_name, data))
}

pub fn image_part(file_name: &str, data: Vec<u8>) -> Part {
    Part::bytes(bytes::Bytes::from(data))
        .file_name(file_name.to_string())
        .mime_type("application/octet-stream")
}
