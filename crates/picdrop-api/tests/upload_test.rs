//! Upload endpoint integration tests.
//!
//! Run with: `cargo test -p picdrop-api --test upload_test`

mod helpers;

use axum_test::multipart::MultipartForm;
use helpers::fixtures;
use helpers::{image_form, image_part, setup_test_app, setup_test_app_with};
use picdrop_core::REJECTION_REASON;
use regex::Regex;

const NO_FILE: &str = "Файл не загружен";

fn stored_name_from_html(html: &str) -> String {
    let re = Regex::new(r#"^Файл загружен: <a href="/uploads/([0-9a-f]{6}\.[A-Za-z]+)">([0-9a-f]{6}\.[A-Za-z]+)</a>$"#)
        .unwrap();
    let caps = re
        .captures(html)
        .unwrap_or_else(|| panic!("unexpected success body: {html}"));
    assert_eq!(&caps[1], &caps[2], "href and link text must match");
    caps[1].to_string()
}

#[tokio::test]
async fn test_form_upload_png() {
    let app = setup_test_app().await;
    let png = fixtures::create_minimal_png();

    let response = app
        .client()
        .post("/upload")
        .multipart(image_form("cat.png", png.clone()))
        .await;

    response.assert_status_ok();
    let content_type = response.headers()["content-type"].to_str().unwrap().to_string();
    assert!(content_type.starts_with("text/html"));

    let name = stored_name_from_html(&response.text());
    assert!(name.ends_with(".png"));
    assert_eq!(app.stored_files(), vec![name.clone()]);
    assert_eq!(std::fs::read(app.upload_dir().join(&name)).unwrap(), png);
}

#[tokio::test]
async fn test_form_upload_keeps_extension_case() {
    let app = setup_test_app().await;

    let response = app
        .client()
        .post("/upload")
        .multipart(image_form("PHOTO.JPG", fixtures::create_blob(32)))
        .await;

    response.assert_status_ok();
    let name = stored_name_from_html(&response.text());
    assert!(name.ends_with(".JPG"), "got {name}");
}

#[tokio::test]
async fn test_form_upload_all_allowed_extensions() {
    let app = setup_test_app().await;

    for file_name in ["a.jpeg", "b.jpg", "c.png", "d.bmp", "e.tar.PnG"] {
        let response = app
            .client()
            .post("/upload")
            .multipart(image_form(file_name, fixtures::create_minimal_bmp()))
            .await;
        response.assert_status_ok();
    }

    assert_eq!(app.stored_files().len(), 5);
}

#[tokio::test]
async fn test_form_upload_rejects_gif() {
    let app = setup_test_app().await;

    let response = app
        .client()
        .post("/upload")
        .multipart(image_form("anim.gif", fixtures::create_text_blob()))
        .await;

    assert_eq!(response.status_code(), 400);
    assert_eq!(response.text(), REJECTION_REASON);
    assert!(app.stored_files().is_empty());
}

#[tokio::test]
async fn test_form_upload_rejects_missing_extension() {
    let app = setup_test_app().await;

    for file_name in ["README", "trailing.", "png"] {
        let response = app
            .client()
            .post("/upload")
            .multipart(image_form(file_name, fixtures::create_minimal_png()))
            .await;
        assert_eq!(response.status_code(), 400, "{file_name}");
        assert_eq!(response.text(), REJECTION_REASON);
    }

    assert!(app.stored_files().is_empty());
}

#[tokio::test]
async fn test_form_upload_without_image_field() {
    let app = setup_test_app().await;

    let form = MultipartForm::new()
        .add_text("comment", "no file here")
        .add_part("photo", image_part("cat.png", fixtures::create_minimal_png()));

    let response = app.client().post("/upload").multipart(form).await;

    assert_eq!(response.status_code(), 400);
    assert_eq!(response.text(), NO_FILE);
    assert!(app.stored_files().is_empty());
}

#[tokio::test]
async fn test_form_upload_without_multipart_body() {
    let app = setup_test_app().await;

    let response = app.client().post("/upload").text("image=cat.png").await;

    assert_eq!(response.status_code(), 400);
    assert_eq!(response.text(), NO_FILE);
}

#[tokio::test]
async fn test_image_text_field_is_not_a_file() {
    let app = setup_test_app().await;

    let form = MultipartForm::new().add_text("image", "cat.png");
    let response = app.client().post("/upload").multipart(form).await;

    assert_eq!(response.status_code(), 400);
    assert_eq!(response.text(), NO_FILE);
}

#[tokio::test]
async fn test_second_image_field_is_rejected() {
    let app = setup_test_app().await;

    let form = MultipartForm::new()
        .add_part("image", image_part("one.png", fixtures::create_minimal_png()))
        .add_part("image", image_part("two.png", fixtures::create_minimal_png()));

    let response = app.client().post("/upload").multipart(form).await;

    assert_eq!(response.status_code(), 400);
    assert_eq!(response.text(), "Unexpected field");
    assert!(app.stored_files().is_empty());
}

#[tokio::test]
async fn test_other_fields_are_ignored() {
    let app = setup_test_app().await;

    let form = MultipartForm::new()
        .add_text("title", "holiday")
        .add_part("image", image_part("beach.jpeg", fixtures::create_blob(64)))
        .add_text("tags", "sea,sun");

    let response = app.client().post("/upload").multipart(form).await;

    response.assert_status_ok();
    assert_eq!(app.stored_files().len(), 1);
}

#[tokio::test]
async fn test_empty_file_is_stored() {
    let app = setup_test_app().await;

    let response = app
        .client()
        .post("/upload")
        .multipart(image_form("empty.png", Vec::new()))
        .await;

    response.assert_status_ok();
    let name = stored_name_from_html(&response.text());
    assert_eq!(std::fs::metadata(app.upload_dir().join(name)).unwrap().len(), 0);
}

#[tokio::test]
async fn test_oversized_upload_is_rejected() {
    let app = setup_test_app_with(|config| config.max_file_size_bytes = 1024).await;

    let response = app
        .client()
        .post("/upload")
        .multipart(image_form("huge.png", fixtures::create_blob(256 * 1024)))
        .await;

    assert_eq!(response.status_code(), 413);
    assert!(app.stored_files().is_empty());
}

#[tokio::test]
async fn test_api_oversized_upload_is_json() {
    let app = setup_test_app_with(|config| config.max_file_size_bytes = 1024).await;

    let response = app
        .client()
        .post("/api/upload")
        .multipart(image_form("huge.png", fixtures::create_blob(256 * 1024)))
        .await;

    assert_eq!(response.status_code(), 413);
    let body: serde_json::Value = response.json();
    assert_eq!(body["status"], 413);
    assert!(body["data"]["link"].is_null());
    assert_eq!(body["code"], "PAYLOAD_TOO_LARGE");
    assert!(app.stored_files().is_empty());
}

#[tokio::test]
async fn test_repeated_uploads_get_distinct_names() {
    let app = setup_test_app().await;

    let mut names = Vec::new();
    for _ in 0..10 {
        let response = app
            .client()
            .post("/upload")
            .multipart(image_form("same.png", fixtures::create_minimal_png()))
            .await;
        response.assert_status_ok();
        names.push(stored_name_from_html(&response.text()));
    }

    names.sort();
    names.dedup();
    assert_eq!(names.len(), 10);
    assert_eq!(app.stored_files(), names);
}

#[tokio::test]
async fn test_api_upload_returns_link() {
    let app = setup_test_app_with(|config| {
        config.public_base_url = Some("https://img.example.com".to_string())
    })
    .await;

    let response = app
        .client()
        .post("/api/upload")
        .multipart(image_form("cat.png", fixtures::create_minimal_png()))
        .await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["status"], 200);
    assert!(body.get("error").is_none());

    let link = body["data"]["link"].as_str().unwrap();
    let re = Regex::new(r"^https://img\.example\.com/uploads/([0-9a-f]{6}\.png)$").unwrap();
    let name = &re.captures(link).expect("absolute upload link")[1];
    assert_eq!(app.stored_files(), vec![name.to_string()]);
}

#[tokio::test]
async fn test_api_upload_link_uses_trusted_forwarded_headers() {
    let app = setup_test_app_with(|config| config.trust_proxy = true).await;

    let response = app
        .client()
        .post("/api/upload")
        .add_header("x-forwarded-proto", "https")
        .add_header("x-forwarded-host", "pics.example.org")
        .multipart(image_form("cat.bmp", fixtures::create_minimal_bmp()))
        .await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    let link = body["data"]["link"].as_str().unwrap();
    let re = Regex::new(r"^https://pics\.example\.org/uploads/[0-9a-f]{6}\.bmp$").unwrap();
    assert!(re.is_match(link), "got {link}");
}

#[tokio::test]
async fn test_api_upload_link_is_absolute_http() {
    let app = setup_test_app().await;

    let response = app
        .client()
        .post("/api/upload")
        .multipart(image_form("cat.jpg", fixtures::create_blob(16)))
        .await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    let link = body["data"]["link"].as_str().unwrap();
    let re = Regex::new(r"^http://[^/]+/uploads/[0-9a-f]{6}\.jpg$").unwrap();
    assert!(re.is_match(link), "got {link}");
}

#[tokio::test]
async fn test_api_upload_rejects_gif() {
    let app = setup_test_app().await;

    let response = app
        .client()
        .post("/api/upload")
        .multipart(image_form("anim.gif", fixtures::create_text_blob()))
        .await;

    assert_eq!(response.status_code(), 400);
    let body: serde_json::Value = response.json();
    assert_eq!(body["status"], 400);
    assert!(body["data"]["link"].is_null());
    assert_eq!(body["error"], REJECTION_REASON);
    assert!(app.stored_files().is_empty());
}

#[tokio::test]
async fn test_api_upload_without_file() {
    let app = setup_test_app().await;

    let form = MultipartForm::new().add_text("note", "nothing attached");
    let response = app.client().post("/api/upload").multipart(form).await;

    assert_eq!(response.status_code(), 400);
    let body: serde_json::Value = response.json();
    assert_eq!(body["status"], 400);
    assert!(body["data"]["link"].is_null());
    assert_eq!(body["error"], NO_FILE);
}

#[tokio::test]
async fn test_upload_when_directory_removed() {
    let app = setup_test_app().await;
    std::fs::remove_dir_all(app.upload_dir()).unwrap();

    let response = app
        .client()
        .post("/api/upload")
        .multipart(image_form("cat.png", fixtures::create_minimal_png()))
        .await;

    assert_eq!(response.status_code(), 503);
    let body: serde_json::Value = response.json();
    assert_eq!(body["status"], 503);
    assert!(body["data"]["link"].is_null());
}
