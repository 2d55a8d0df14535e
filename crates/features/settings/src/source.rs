use crate::repository::SettingsRepository;
use folio_customize::{CustomizeError, SettingsSource};
use folio_domain::settings::SettingsDocument;
use serde_json::Value;

/// Reads the public settings straight from the store, without an HTTP round-trip.
#[derive(Debug, Clone)]
pub struct StoreSettingsSource {
    repository: SettingsRepository,
}

impl StoreSettingsSource {
    pub(crate) const fn new(repository: SettingsRepository) -> Self {
        Self { repository }
    }
}

impl SettingsSource for StoreSettingsSource {
    async fn fetch_public_settings(&self) -> Result<SettingsDocument, CustomizeError> {
        let values = self.repository.public_values().await.map_err(|err| CustomizeError::Unavailable {
            message: err.to_string().into(),
            context: Some("settings store".into()),
        })?;
        Ok(serde_json::from_value(Value::Object(values))?)
    }
}
