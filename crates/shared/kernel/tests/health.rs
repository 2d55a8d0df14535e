use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode};
use folio_database::Database;
use folio_kernel::domain::config::ApiConfig;
use folio_kernel::server::{ApiState, system_router};
use tower::ServiceExt;

async fn state() -> ApiState {
    let db = Database::builder().url("mem://").session("test", "health").init().await.expect("db");
    ApiState::builder().config(ApiConfig::default()).db(db).build().expect("state")
}

#[tokio::test]
async fn health_reports_database_status() {
    let (router, _) = system_router().split_for_parts();
    let app = router.with_state(state().await);

    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).expect("request"))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::OK);
    let body: serde_json::Value =
        serde_json::from_slice(&to_bytes(response.into_body(), usize::MAX).await.expect("body"))
            .expect("json");
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "Server is running");
    assert_eq!(body["database"], "connected");
}

#[test]
fn state_requires_database() {
    let err = ApiState::builder().config(ApiConfig::default()).build().unwrap_err();
    assert!(err.to_string().contains("Database not provided"));
}
