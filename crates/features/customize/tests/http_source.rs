#![cfg(feature = "http")]

use axum::routing::get;
use axum::{Json, Router};
use folio_customize::http::HttpSettingsSource;
use folio_customize::{SettingsSource, load_settings};
use serde_json::json;
use std::time::Duration;
use tokio::net::TcpListener;

async fn serve(router: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    tokio::spawn(async move {
        let _ = axum::serve(listener, router).await;
    });
    format!("http://{addr}")
}

#[tokio::test]
async fn reads_enveloped_public_settings() {
    let base = serve(Router::new().route(
        "/api/config/public/all",
        get(|| async {
            Json(json!({
                "success": true,
                "data": { "customHeadCss": "a{}", "siteTitle": "Folio", "broken": { "x": 1 } }
            }))
        }),
    ))
    .await;

    let source = HttpSettingsSource::new(&base).expect("client");
    let settings = source.fetch_public_settings().await.expect("settings");

    assert_eq!(settings.text("customHeadCss"), Some("a{}"));
    assert_eq!(settings.len(), 2);
}

#[tokio::test]
async fn server_errors_degrade_to_empty_document() {
    let base = serve(Router::new().route(
        "/api/config/public/all",
        get(|| async { (axum::http::StatusCode::INTERNAL_SERVER_ERROR, "boom") }),
    ))
    .await;

    let source = HttpSettingsSource::new(&base).expect("client");
    assert!(source.fetch_public_settings().await.is_err());
    assert!(load_settings(&source).await.is_empty());
}

#[tokio::test]
async fn unreachable_api_degrades_to_empty_document() {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);

    let source =
        HttpSettingsSource::with_timeout(&format!("http://{addr}"), Duration::from_millis(500)).expect("client");
    assert!(load_settings(&source).await.is_empty());
}
