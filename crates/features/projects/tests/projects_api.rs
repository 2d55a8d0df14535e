use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Method, Request, StatusCode, header};
use folio_database::Database;
use folio_domain::config::{AdminSeed, ApiConfig};
use folio_kernel::server::ApiState;
use serde_json::{Value, json};
use tower::ServiceExt;

async fn harness() -> (Router, String) {
    let mut config = ApiConfig::default();
    config.security.admin = Some(AdminSeed {
        username: "admin".to_owned(),
        email: "admin@folio.dev".to_owned(),
        password: "admin123".to_owned(),
    });

    let db = Database::builder()
        .url("mem://")
        .session("test", "projects")
        .migrations(folio_identity::MIGRATIONS.iter().chain(folio_projects::MIGRATIONS).cloned())
        .init()
        .await
        .expect("db");
    let state = ApiState::builder()
        .config(config.clone())
        .db(db.clone())
        .register_slice(folio_identity::init(&config, &db).await.expect("identity"))
        .register_slice(folio_projects::init(&db).expect("projects"))
        .build()
        .expect("state");

    let (router, _) = folio_identity::router().merge(folio_projects::router()).split_for_parts();
    let app = router.with_state(state);

    let (_, body) = call(
        &app,
        Method::POST,
        "/api/auth/login",
        None,
        Some(json!({ "email": "admin@folio.dev", "password": "admin123" })),
    )
    .await;
    let token = body["token"].as_str().expect("admin token").to_owned();
    (app, token)
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

async fn create(app: &Router, token: &str, payload: Value) -> Value {
    let (status, body) = call(app, Method::POST, "/api/projects", Some(token), Some(payload)).await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    body["data"].clone()
}

fn project(title: &str) -> Value {
    json!({ "title": title, "description": "Built with care", "url": "https://example.com" })
}

#[tokio::test]
async fn create_applies_defaults_and_requires_admin() {
    let (app, token) = harness().await;

    let (status, _) = call(&app, Method::POST, "/api/projects", None, Some(project("Anon"))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let created = create(&app, &token, project("Neon Grid")).await;
    assert_eq!(created["status"], "active");
    assert_eq!(created["color"], "#00ff88");
    assert_eq!(created["featured"], false);
    assert_eq!(created["views"], 0);
    assert_eq!(created["id"].as_str().map(str::len), Some(12));

    let (status, body) = call(
        &app,
        Method::POST,
        "/api/projects",
        Some(&token),
        Some(json!({ "title": "", "description": "x", "url": "not a url", "color": "red" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["errors"].as_array().map(Vec::len), Some(3));
}

#[tokio::test]
async fn views_and_likes_are_counted() {
    let (app, token) = harness().await;
    let id = create(&app, &token, project("Counter")).await["id"].as_str().expect("id").to_owned();

    call(&app, Method::GET, &format!("/api/projects/{id}"), None, None).await;
    let (_, body) = call(&app, Method::GET, &format!("/api/projects/{id}"), None, None).await;
    assert_eq!(body["data"]["views"], 2);

    let (status, body) = call(&app, Method::POST, &format!("/api/projects/{id}/like"), None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["likes"], 1);

    let (status, _) = call(&app, Method::GET, "/api/projects/ZZZZZZZZZZZZ", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = call(&app, Method::GET, "/api/projects/lead:abc", None, None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn listing_filters_pages_and_sorts() {
    let (app, token) = harness().await;
    create(&app, &token, json!({ "title": "Alpha", "description": "rust service", "url": "https://a.dev", "tags": ["rust"] })).await;
    create(&app, &token, json!({ "title": "Beta", "description": "wasm toy", "url": "https://b.dev", "tags": ["wasm"], "status": "draft" })).await;
    create(&app, &token, json!({ "title": "Gamma", "description": "Rust CLI", "url": "https://c.dev", "tags": ["rust", "cli"] })).await;

    let (_, body) = call(&app, Method::GET, "/api/projects?limit=2&sort=title", None, None).await;
    assert_eq!(body["pagination"], json!({ "page": 1, "limit": 2, "total": 3, "pages": 2 }));
    assert_eq!(body["data"][0]["title"], "Alpha");
    assert_eq!(body["data"][1]["title"], "Beta");

    let (_, body) = call(&app, Method::GET, "/api/projects?tags=cli,wasm&sort=-title", None, None).await;
    let titles: Vec<&str> = body["data"].as_array().expect("data").iter().filter_map(|p| p["title"].as_str()).collect();
    assert_eq!(titles, ["Gamma", "Beta"]);

    let (_, body) = call(&app, Method::GET, "/api/projects?search=RUST&status=active", None, None).await;
    assert_eq!(body["pagination"]["total"], 2);

    let (status, _) = call(&app, Method::GET, "/api/projects?limit=500", None, None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let (status, _) = call(&app, Method::GET, "/api/projects?sort=secret", None, None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn featured_shelf_orders_by_position() {
    let (app, token) = harness().await;
    create(&app, &token, json!({ "title": "Second", "description": "d", "url": "https://a.dev", "featured": true, "order": 2 })).await;
    create(&app, &token, json!({ "title": "First", "description": "d", "url": "https://a.dev", "featured": true, "order": 1 })).await;
    create(&app, &token, json!({ "title": "Hidden", "description": "d", "url": "https://a.dev", "featured": true, "status": "archived" })).await;
    create(&app, &token, project("Plain")).await;

    let (_, body) = call(&app, Method::GET, "/api/projects/featured", None, None).await;
    let titles: Vec<&str> = body["data"].as_array().expect("data").iter().filter_map(|p| p["title"].as_str()).collect();
    assert_eq!(titles, ["First", "Second"]);
}

#[tokio::test]
async fn update_keeps_counters_and_delete_removes() {
    let (app, token) = harness().await;
    let id = create(&app, &token, project("Draft")).await["id"].as_str().expect("id").to_owned();
    call(&app, Method::POST, &format!("/api/projects/{id}/like"), None, None).await;

    let (status, body) = call(
        &app,
        Method::PUT,
        &format!("/api/projects/{id}"),
        Some(&token),
        Some(json!({ "title": "Final", "description": "Shipped", "url": "https://final.dev", "technologies": ["axum"] })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["title"], "Final");
    assert_eq!(body["data"]["likes"], 1);
    assert_eq!(body["data"]["technologies"], json!(["axum"]));

    let (status, _) = call(&app, Method::DELETE, &format!("/api/projects/{id}"), Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = call(&app, Method::DELETE, &format!("/api/projects/{id}"), Some(&token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
