use folio_domain::config::{ApiConfig, DatabaseConfig, JwtConfig, ServerConfig, SiteConfig, StorageConfig};
use folio_domain::settings::ContentKinds;
use serde_json::json;

#[test]
fn config_defaults_are_sane() {
    let server = ServerConfig::default();
    assert_eq!(server.port, 5000);
    assert!(server.ssl.is_none());
    assert_eq!(server.shutdown_grace_seconds, 30);

    let db = DatabaseConfig::default();
    assert_eq!(db.url, "mem://");
    assert_eq!(db.namespace, "folio");
    assert!(db.credentials.is_none());

    let storage = StorageConfig::default();
    assert_eq!(storage.shell, std::path::PathBuf::from("public/index.html"));
    assert_eq!(storage.max_upload_bytes, 5 * 1024 * 1024);

    assert_eq!(JwtConfig::default().ttl_seconds, 604_800);

    let site = SiteConfig::default();
    assert!(site.customization);
    assert_eq!(site.allowed_kinds, ContentKinds::all());
}

#[test]
fn api_config_deserializes_partial_sections() {
    let raw = json!({
        "server": { "address": "::", "port": 8080 },
        "database": { "url": "mem://", "namespace": "n", "database": "d" },
        "storage": { "media_dir": "/tmp/media" },
        "security": { "admin": { "username": "owner", "email": "owner@example.com", "password": "secret1" } },
        "site": { "allowed_kinds": ["markup", "style"] }
    });

    let cfg: ApiConfig = serde_json::from_value(raw).expect("config deserialize");
    assert_eq!(cfg.server.port, 8080);
    assert_eq!(cfg.database.namespace, "n");
    assert_eq!(cfg.storage.media_dir, std::path::PathBuf::from("/tmp/media"));
    assert_eq!(cfg.storage.static_dir, std::path::PathBuf::from("public"));
    assert_eq!(cfg.security.admin.as_ref().map(|a| a.username.as_str()), Some("owner"));
    assert!(!cfg.site.allowed_kinds.contains(ContentKinds::SCRIPT));
    assert_eq!(cfg.logging.level, "info");
}

#[test]
fn api_config_clones_share_until_mutated() {
    let original = ApiConfig::default();
    let mut copy = original.clone();
    copy.server.port = 9999;

    assert_eq!(original.server.port, 5000);
    assert_eq!(copy.server.port, 9999);
}
