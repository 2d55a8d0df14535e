//! Facade crate for the Folio features and shared modules.
//! Re-exports domain/kernel primitives and aggregates slice initialization, migrations and routes.
//! Keep this crate thin: it composes other crates, it does not implement business logic.

use folio_database::{Database, Migration};
use folio_domain::config::ApiConfig;
use folio_kernel::server::{ApiState, system_router};
use std::borrow::Cow;
use utoipa_axum::router::OpenApiRouter;

pub use folio_customize as customize;
pub use folio_database as database;
pub use folio_domain as domain;
pub use folio_kernel as kernel;
pub use folio_storage as storage;

/// Feature slices by name.
pub mod features {
    pub use folio_gallery as gallery;
    pub use folio_identity as identity;
    pub use folio_leads as leads;
    pub use folio_projects as projects;
    pub use folio_settings as settings;

    /// Slices registered by [`crate::init`], in initialization order.
    pub const ENABLED: &[&str] = &["identity", "settings", "projects", "leads", "gallery"];
}

#[folio_derive::folio_error]
pub enum FolioError {
    #[error("Identity slice failed{}: {source}", format_context(.context))]
    Identity { source: features::identity::IdentityError, context: Option<Cow<'static, str>> },

    #[error("Settings slice failed{}: {source}", format_context(.context))]
    Settings { source: features::settings::SettingsError, context: Option<Cow<'static, str>> },

    #[error("Projects slice failed{}: {source}", format_context(.context))]
    Projects { source: features::projects::ProjectError, context: Option<Cow<'static, str>> },

    #[error("Leads slice failed{}: {source}", format_context(.context))]
    Leads { source: features::leads::LeadError, context: Option<Cow<'static, str>> },

    #[error("Gallery slice failed{}: {source}", format_context(.context))]
    Gallery { source: features::gallery::GalleryError, context: Option<Cow<'static, str>> },
}

/// Every slice's schema scripts, in dependency order.
pub fn migrations() -> impl Iterator<Item = Migration> {
    [
        features::identity::MIGRATIONS,
        features::settings::MIGRATIONS,
        features::projects::MIGRATIONS,
        features::leads::MIGRATIONS,
        features::gallery::MIGRATIONS,
    ]
    .into_iter()
    .flatten()
    .cloned()
}

/// Initialize all feature slices for server mode.
///
/// # Errors
/// Returns the first slice failure, e.g. an invalid administrator seed or an unusable media
/// directory.
pub async fn init(
    config: &ApiConfig,
    database: &Database,
) -> Result<Vec<domain::registry::InitializedSlice>, FolioError> {
    let slices = vec![
        features::identity::init(config, database).await?,
        features::settings::init(config, database)?,
        features::projects::init(database)?,
        features::leads::init(database)?,
        features::gallery::init(config, database).await?,
    ];

    tracing::info!(slices = ?features::ENABLED, "Feature slices initialized");
    Ok(slices)
}

/// The documented API: system routes plus every slice's routes.
pub fn api_router() -> OpenApiRouter<ApiState> {
    system_router()
        .merge(features::identity::router())
        .merge(features::settings::router())
        .merge(features::projects::router())
        .merge(features::leads::router())
        .merge(features::gallery::router())
}
