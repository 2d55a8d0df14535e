//! Settings feature slice.
//!
//! Stores the site's configuration records, serves the public subset as one flat object and
//! turns it into the customization [`InjectionPlan`] the server renders into its shell.

mod error;
mod handlers;
mod model;
mod repository;
mod source;

pub use crate::error::{SettingsError, SettingsErrorExt};
pub use crate::model::{BulkConfigRequest, BulkConfigResult, ConfigListQuery, ConfigRecord, SetConfigRequest};
pub use crate::source::StoreSettingsSource;

use crate::repository::SettingsRepository;
use folio_customize::{InjectionPlan, compute_plan, load_settings, presets};
use folio_database::{Database, Migration};
use folio_domain::settings::{ContentKinds, SettingsDocument};
use folio_kernel::domain::config::ApiConfig;
use folio_kernel::domain::registry::InitializedSlice;
use folio_kernel::server::ApiState;
use tracing::debug;
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

/// Schema scripts owned by this slice.
pub const MIGRATIONS: &[Migration] =
    &[Migration::new("settings", "0001", include_str!("../migrations/0001_init.surql"))];

/// Settings feature state
#[folio_derive::folio_slice]
pub struct Settings {
    repository: SettingsRepository,
    defaults: SettingsDocument,
    allowed: ContentKinds,
}

impl Settings {
    /// A settings source reading this slice's store.
    #[must_use]
    pub fn source(&self) -> StoreSettingsSource {
        StoreSettingsSource::new(self.repository.clone())
    }

    /// Values used for slots the store leaves unset.
    #[must_use]
    pub fn defaults(&self) -> &SettingsDocument {
        &self.defaults
    }

    /// Plans the injection from the current public settings.
    ///
    /// Never fails: an unreadable store plans from the defaults alone. Kinds the server is not
    /// allowed to inject are dropped.
    pub async fn current_plan(&self) -> InjectionPlan {
        let settings = load_settings(&self.source()).await;
        let plan = compute_plan(&settings, &self.defaults).restrict(self.allowed);
        debug!(blocks = plan.len(), "Injection plan computed");
        plan
    }
}

/// Initialize the settings feature.
///
/// # Errors
/// Currently never fails.
pub fn init(config: &ApiConfig, database: &Database) -> Result<InitializedSlice, SettingsError> {
    let defaults = if config.site.preset_defaults { presets::neon_pulse() } else { SettingsDocument::new() };

    let slice = Settings::new(SettingsInner {
        repository: SettingsRepository::new(database.clone()),
        defaults,
        allowed: config.site.allowed_kinds,
    });

    tracing::info!(preset_defaults = config.site.preset_defaults, "Settings slice initialized");
    Ok(InitializedSlice::new(slice))
}

/// Routes under `/api/config` and `/api/site`.
pub fn router() -> OpenApiRouter<ApiState> {
    OpenApiRouter::new()
        .routes(routes!(handlers::public_settings))
        .routes(routes!(handlers::list_settings, handlers::set_setting))
        .routes(routes!(handlers::get_setting, handlers::delete_setting))
        .routes(routes!(handlers::bulk_set_settings))
        .routes(routes!(handlers::injection_plan))
}
