use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Method, Request, StatusCode, header};
use folio_database::Database;
use folio_domain::config::{AdminSeed, ApiConfig};
use folio_kernel::server::ApiState;
use folio_settings::Settings;
use serde_json::{Value, json};
use tower::ServiceExt;

struct Harness {
    app: Router,
    state: ApiState,
    admin: String,
}

async fn harness(preset_defaults: bool) -> Harness {
    let mut config = ApiConfig::default();
    config.site.preset_defaults = preset_defaults;
    config.security.admin = Some(AdminSeed {
        username: "admin".to_owned(),
        email: "admin@folio.dev".to_owned(),
        password: "admin123".to_owned(),
    });

    let db = Database::builder()
        .url("mem://")
        .session("test", "settings")
        .migrations(folio_identity::MIGRATIONS.iter().chain(folio_settings::MIGRATIONS).cloned())
        .init()
        .await
        .expect("db");
    let state = ApiState::builder()
        .config(config.clone())
        .db(db.clone())
        .register_slice(folio_identity::init(&config, &db).await.expect("identity"))
        .register_slice(folio_settings::init(&config, &db).expect("settings"))
        .build()
        .expect("state");

    let (router, _) = folio_identity::router().merge(folio_settings::router()).split_for_parts();
    let app = router.with_state(state.clone());

    let (_, body) = call(
        &app,
        Method::POST,
        "/api/auth/login",
        None,
        Some(json!({ "email": "admin@folio.dev", "password": "admin123" })),
    )
    .await;
    let admin = body["token"].as_str().expect("admin token").to_owned();

    Harness { app, state, admin }
}

async fn call(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut request = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        request = request.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = match body {
        Some(body) => request
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .expect("request"),
        None => request.body(Body::empty()).expect("request"),
    };
    let response = app.clone().oneshot(request).await.expect("response");
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.expect("body");
    (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
}

#[tokio::test]
async fn public_settings_are_a_flat_sorted_object() {
    let h = harness(false).await;
    for (key, value, public) in [
        ("customHeadCss", json!("body{color:red}"), true),
        ("apiSecret", json!("hunter2"), false),
        ("fxEnableGlow", json!(true), true),
        ("homeStats", json!([{ "label": "Projects", "value": 12 }]), true),
    ] {
        let (status, _) = call(
            &h.app,
            Method::POST,
            "/api/config",
            Some(&h.admin),
            Some(json!({ "key": key, "value": value, "isPublic": public })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }

    let (status, body) = call(&h.app, Method::GET, "/api/config/public/all", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["data"],
        json!({
            "customHeadCss": "body{color:red}",
            "fxEnableGlow": true,
            "homeStats": [{ "label": "Projects", "value": 12 }],
        })
    );
    let keys: Vec<&String> = body["data"].as_object().expect("object").keys().collect();
    assert_eq!(keys, ["customHeadCss", "fxEnableGlow", "homeStats"]);
}

#[tokio::test]
async fn private_records_need_a_signed_in_caller() {
    let h = harness(false).await;
    call(&h.app, Method::POST, "/api/config", Some(&h.admin), Some(json!({ "key": "smtpHost", "value": "mail" }))).await;

    let (status, _) = call(&h.app, Method::GET, "/api/config/smtpHost", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = call(&h.app, Method::GET, "/api/config/smtpHost", Some(&h.admin), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["category"], "other");
    assert_eq!(body["data"]["isPublic"], false);

    let (status, body) = call(&h.app, Method::GET, "/api/config/missing", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Config not found");
}

#[tokio::test]
async fn upsert_only_changes_supplied_fields() {
    let h = harness(false).await;
    call(
        &h.app,
        Method::POST,
        "/api/config",
        Some(&h.admin),
        Some(json!({ "key": "siteTitle", "value": "Folio", "category": "seo", "isPublic": true, "description": "Title" })),
    )
    .await;
    let (_, body) =
        call(&h.app, Method::POST, "/api/config", Some(&h.admin), Some(json!({ "key": "siteTitle", "value": "Folio 2" })))
            .await;

    assert_eq!(body["data"]["value"], "Folio 2");
    assert_eq!(body["data"]["category"], "seo");
    assert_eq!(body["data"]["isPublic"], true);
    assert_eq!(body["data"]["description"], "Title");
}

#[tokio::test]
async fn admin_routes_reject_anonymous_callers() {
    let h = harness(false).await;
    let (status, _) =
        call(&h.app, Method::POST, "/api/config", None, Some(json!({ "key": "x", "value": "y" }))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    let (status, _) = call(&h.app, Method::GET, "/api/config", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn bulk_upsert_counts_valid_items() {
    let h = harness(false).await;

    let (status, body) = call(&h.app, Method::POST, "/api/config/bulk", Some(&h.admin), Some(json!({ "configs": [] }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "configs must be a non-empty array");

    let (status, body) =
        call(&h.app, Method::POST, "/api/config/bulk", Some(&h.admin), Some(json!({ "configs": [{ "key": 1 }] }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "No valid config items provided");

    let (status, body) = call(
        &h.app,
        Method::POST,
        "/api/config/bulk",
        Some(&h.admin),
        Some(json!({ "configs": [
            { "key": "customFooterHtml", "value": "<footer>x</footer>", "category": "theme" },
            { "key": "customBodyCss", "value": "main{}" },
            { "value": "orphan" },
        ] })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["count"], 2);

    let (_, body) = call(&h.app, Method::GET, "/api/config?category=theme", Some(&h.admin), None).await;
    let records = body["data"].as_array().expect("records");
    assert_eq!(records.len(), 1);
    assert_eq!(records[0]["key"], "customFooterHtml");
    assert_eq!(records[0]["isPublic"], true);
}

#[tokio::test]
async fn delete_reports_missing_keys() {
    let h = harness(false).await;
    call(&h.app, Method::POST, "/api/config", Some(&h.admin), Some(json!({ "key": "gone", "value": 1 }))).await;

    let (status, _) = call(&h.app, Method::DELETE, "/api/config/gone", Some(&h.admin), None).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = call(&h.app, Method::DELETE, "/api/config/gone", Some(&h.admin), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn injection_plan_merges_store_over_presets() {
    let h = harness(true).await;
    call(
        &h.app,
        Method::POST,
        "/api/config",
        Some(&h.admin),
        Some(json!({ "key": "customHeadCss", "value": ".mine{}", "isPublic": true })),
    )
    .await;
    call(
        &h.app,
        Method::POST,
        "/api/config",
        Some(&h.admin),
        Some(json!({ "key": "customBodyJs", "value": "   ", "isPublic": true })),
    )
    .await;

    let (status, body) = call(&h.app, Method::GET, "/api/site/injection", None, None).await;
    assert_eq!(status, StatusCode::OK);
    let blocks = body["data"].as_array().expect("blocks");
    assert_eq!(blocks.len(), 9);
    let head_css = blocks.iter().find(|b| b["region"] == "head" && b["kind"] == "style").expect("head css");
    assert_eq!(head_css["content"], ".mine{}");

    let settings = h.state.try_get_slice::<Settings>().expect("slice");
    let plan = settings.current_plan().await;
    assert_eq!(plan.len(), 9);
}

#[tokio::test]
async fn injection_plan_is_empty_without_presets_or_settings() {
    let h = harness(false).await;
    let (_, body) = call(&h.app, Method::GET, "/api/site/injection", None, None).await;
    assert_eq!(body["data"], json!([]));
}
