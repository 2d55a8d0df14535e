use folio::database::Database;
use folio::domain::config::ApiConfig;
use folio::kernel::server::ApiState;
use std::collections::HashSet;

#[test]
fn migrations_are_unique_per_slice() {
    let migrations: Vec<_> = folio::migrations().collect();
    let keys: HashSet<_> = migrations.iter().map(|m| (m.slice, m.version)).collect();
    assert_eq!(keys.len(), migrations.len());
    assert!(migrations.iter().any(|m| m.slice == "identity"));
    assert!(migrations.iter().any(|m| m.slice == "gallery"));
}

#[test]
fn api_router_documents_every_slice() {
    let (_, api) = folio::api_router().split_for_parts();
    for path in [
        "/health",
        "/api/auth/login",
        "/api/config/public/all",
        "/api/site/injection",
        "/api/projects/featured",
        "/api/leads/{id}/status",
        "/api/images/upload",
        "/uploads/{file}",
    ] {
        assert!(api.paths.paths.contains_key(path), "missing {path}");
    }
}

#[tokio::test]
async fn every_slice_registers() {
    let media = tempfile::tempdir().expect("tempdir");
    let mut config = ApiConfig::default();
    config.storage.media_dir = media.path().to_path_buf();

    let db = Database::builder()
        .url("mem://")
        .session("test", "facade")
        .migrations(folio::migrations())
        .init()
        .await
        .expect("db");
    let slices = folio::init(&config, &db).await.expect("slices");
    assert_eq!(slices.len(), folio::features::ENABLED.len());

    let state = ApiState::builder().config(config).db(db).register_slices(slices).build().expect("state");
    assert!(state.get_slice::<folio::features::settings::Settings>().is_some());
    assert!(state.get_slice::<folio::features::gallery::Gallery>().is_some());
}
