use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Method, Request, StatusCode, header};
use axum::routing::get;
use folio_database::Database;
use folio_domain::config::{AdminSeed, ApiConfig};
use folio_identity::{AdminUser, AuthUser};
use folio_kernel::server::ApiState;
use serde_json::{Value, json};
use tower::ServiceExt;

async fn app(config: ApiConfig) -> Router {
    let db = Database::builder()
        .url("mem://")
        .session("test", "identity")
        .migrations(folio_identity::MIGRATIONS.iter().cloned())
        .init()
        .await
        .expect("db");
    let slice = folio_identity::init(&config, &db).await.expect("identity");
    let state = ApiState::builder().config(config).db(db).register_slice(slice).build().expect("state");

    let (router, _) = folio_identity::router().split_for_parts();
    router
        .route("/probe/admin", get(|admin: AdminUser| async move { admin.id().to_owned() }))
        .route(
            "/probe/optional",
            get(|user: Option<AuthUser>| async move { user.map_or_else(|| "anonymous".to_owned(), |u| u.profile.username) }),
        )
        .with_state(state)
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
    let value = serde_json::from_slice(&bytes)
        .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()));
    (status, value)
}

fn registration(username: &str, email: &str) -> Value {
    json!({ "username": username, "email": email, "password": "secret1" })
}

#[tokio::test]
async fn register_login_and_me() {
    let app = app(ApiConfig::default()).await;

    let (status, body) =
        call(&app, Method::POST, "/api/auth/register", None, Some(registration("neo", "Neo@Matrix.io"))).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["user"]["email"], "neo@matrix.io");
    assert_eq!(body["user"]["role"], "user");
    assert!(body["user"].get("passwordHash").is_none());

    let (status, body) = call(
        &app,
        Method::POST,
        "/api/auth/login",
        None,
        Some(json!({ "email": "neo@matrix.io", "password": "secret1" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Login successful");
    assert!(body["user"]["lastLogin"].is_string());
    let token = body["token"].as_str().expect("token").to_owned();

    let (status, body) = call(&app, Method::GET, "/api/auth/me", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["username"], "neo");
}

#[tokio::test]
async fn duplicate_and_invalid_registrations_are_rejected() {
    let app = app(ApiConfig::default()).await;
    call(&app, Method::POST, "/api/auth/register", None, Some(registration("trinity", "t@matrix.io"))).await;

    let (status, body) =
        call(&app, Method::POST, "/api/auth/register", None, Some(registration("trinity", "other@matrix.io"))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "User already exists");

    let (status, body) =
        call(&app, Method::POST, "/api/auth/register", None, Some(json!({ "username": "x!", "email": "nope", "password": "1" })))
            .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Validation failed");
    assert!(body["errors"].as_array().expect("errors").len() >= 3);
}

#[tokio::test]
async fn wrong_password_and_missing_token_are_unauthorized() {
    let app = app(ApiConfig::default()).await;
    call(&app, Method::POST, "/api/auth/register", None, Some(registration("morpheus", "m@matrix.io"))).await;

    let (status, body) = call(
        &app,
        Method::POST,
        "/api/auth/login",
        None,
        Some(json!({ "email": "m@matrix.io", "password": "wrong-one" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Invalid credentials");

    let (status, _) = call(&app, Method::GET, "/api/auth/me", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    let (status, _) = call(&app, Method::GET, "/api/auth/me", Some("garbage"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = call(&app, Method::GET, "/probe/optional", Some("garbage"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "anonymous");
}

#[tokio::test]
async fn password_change_issues_a_new_token() {
    let app = app(ApiConfig::default()).await;
    let (_, body) =
        call(&app, Method::POST, "/api/auth/register", None, Some(registration("tank", "tank@matrix.io"))).await;
    let token = body["token"].as_str().expect("token").to_owned();

    let (status, _) = call(
        &app,
        Method::PUT,
        "/api/auth/password",
        Some(&token),
        Some(json!({ "currentPassword": "nope", "newPassword": "secret2" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = call(
        &app,
        Method::PUT,
        "/api/auth/password",
        Some(&token),
        Some(json!({ "currentPassword": "secret1", "newPassword": "secret2" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["token"].is_string());

    let (status, _) = call(
        &app,
        Method::POST,
        "/api/auth/login",
        None,
        Some(json!({ "email": "tank@matrix.io", "password": "secret2" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn profile_update_rejects_taken_names() {
    let app = app(ApiConfig::default()).await;
    call(&app, Method::POST, "/api/auth/register", None, Some(registration("switch", "s@matrix.io"))).await;
    let (_, body) =
        call(&app, Method::POST, "/api/auth/register", None, Some(registration("apoc", "a@matrix.io"))).await;
    let token = body["token"].as_str().expect("token").to_owned();

    let (status, _) =
        call(&app, Method::PUT, "/api/auth/update", Some(&token), Some(json!({ "username": "switch" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) =
        call(&app, Method::PUT, "/api/auth/update", Some(&token), Some(json!({ "bio": "Operator", "username": "" })))
            .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["bio"], "Operator");
    assert_eq!(body["data"]["username"], "apoc");
}

#[tokio::test]
async fn seeded_admin_passes_the_admin_extractor() {
    let mut config = ApiConfig::default();
    config.security.admin = Some(AdminSeed {
        username: "architect".to_owned(),
        email: "admin@matrix.io".to_owned(),
        password: "construct".to_owned(),
    });
    let app = app(config).await;

    let (_, body) = call(
        &app,
        Method::POST,
        "/api/auth/login",
        None,
        Some(json!({ "email": "admin@matrix.io", "password": "construct" })),
    )
    .await;
    assert_eq!(body["user"]["role"], "admin");
    let admin_token = body["token"].as_str().expect("token").to_owned();

    let (status, _) = call(&app, Method::GET, "/probe/admin", Some(&admin_token), None).await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) =
        call(&app, Method::POST, "/api/auth/register", None, Some(registration("cypher", "c@matrix.io"))).await;
    let user_token = body["token"].as_str().expect("token").to_owned();
    let (status, body) = call(&app, Method::GET, "/probe/admin", Some(&user_token), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["message"], "Access denied. Admin privileges required.");
}
