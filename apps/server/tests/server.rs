use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode, header};
use folio::domain::config::ApiConfig;
use folio_server::{FALLBACK_SHELL, Server};
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

const SHELL: &str = r#"<!doctype html><html><head><title>Folio</title></head><body><div id="root"></div></body></html>"#;

async fn app(customization: bool, with_shell: bool) -> (Router, TempDir) {
    let dir = tempfile::tempdir().expect("tempdir");
    let public = dir.path().join("public");
    std::fs::create_dir_all(public.join("assets")).expect("assets dir");
    std::fs::write(public.join("assets/app.js"), "console.log('folio')").expect("asset");
    if with_shell {
        std::fs::write(public.join("index.html"), SHELL).expect("shell");
    }

    let mut config = ApiConfig::default();
    config.database.namespace = "test".to_owned();
    config.storage.static_dir = public.clone();
    config.storage.shell = public.join("index.html");
    config.storage.media_dir = dir.path().join("media");
    config.site.customization = customization;

    let server = Server::builder().config(config).build().await.expect("server");
    (server.router(), dir)
}

async fn get(app: &Router, uri: &str) -> (StatusCode, String) {
    let request = Request::builder().uri(uri).body(Body::empty()).expect("request");
    let response = app.clone().oneshot(request).await.expect("response");
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.expect("body");
    (status, String::from_utf8_lossy(&bytes).into_owned())
}

#[tokio::test]
async fn health_reports_a_connected_database() {
    let (app, _dir) = app(true, true).await;
    let (status, body) = get(&app, "/health").await;
    assert_eq!(status, StatusCode::OK);

    let body: Value = serde_json::from_str(&body).expect("json");
    assert_eq!(body["message"], "Server is running");
    assert_eq!(body["database"], "connected");
}

#[tokio::test]
async fn unknown_api_paths_are_json_404() {
    let (app, _dir) = app(true, true).await;
    let (status, body) = get(&app, "/api/nothing/here").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let body: Value = serde_json::from_str(&body).expect("json");
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Route /api/nothing/here not found");
}

#[tokio::test]
async fn shell_is_rendered_with_the_preset_plan() {
    let (app, _dir) = app(true, true).await;

    let (status, page) = get(&app, "/").await;
    assert_eq!(status, StatusCode::OK);
    assert!(page.contains(r#"<div id="root"></div>"#));
    assert!(page.contains("data-custom-slot=\"head-css\""));

    let (status, deep_link) = get(&app, "/projects/neon-grid").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(deep_link, page);
}

#[tokio::test]
async fn static_assets_are_served_as_files() {
    let (app, _dir) = app(true, true).await;
    let (status, body) = get(&app, "/assets/app.js").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "console.log('folio')");
}

#[tokio::test]
async fn customization_can_be_switched_off() {
    let (app, _dir) = app(false, true).await;
    let (_, page) = get(&app, "/").await;
    assert!(!page.contains("data-custom-slot"));
}

#[tokio::test]
async fn missing_shell_falls_back_to_the_built_in_page() {
    let (app, _dir) = app(false, false).await;
    let (status, page) = get(&app, "/").await;
    assert_eq!(status, StatusCode::OK);
    assert!(page.contains("<title>Folio</title>"));
    assert!(FALLBACK_SHELL.contains(r#"<div id="root"></div>"#));
}

#[tokio::test]
async fn openapi_document_declares_bearer_auth() {
    let (app, _dir) = app(true, true).await;
    let (status, body) = get(&app, "/api/openapi.json").await;
    assert_eq!(status, StatusCode::OK);

    let doc: Value = serde_json::from_str(&body).expect("json");
    assert_eq!(doc["components"]["securitySchemes"]["bearer_auth"]["scheme"], "bearer");
    assert!(doc["paths"]["/api/projects"].is_object());

    let request = Request::builder().uri("/api/docs").body(Body::empty()).expect("request");
    let response = app.clone().oneshot(request).await.expect("response");
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers()[header::CONTENT_TYPE].to_str().unwrap_or_default().starts_with("text/html"));
}
