//! Settings over HTTP from a running folio API.

use crate::error::{CustomizeError, CustomizeErrorExt};
use crate::source::SettingsSource;
use folio_domain::settings::SettingsDocument;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

/// Path of the public settings endpoint, relative to the API base URL.
pub const PUBLIC_SETTINGS_PATH: &str = "/api/config/public/all";

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Reads `{base}/api/config/public/all`.
///
/// The response may be the API envelope (`{ "success": true, "data": {...} }`) or a bare
/// settings object.
#[derive(Debug, Clone)]
pub struct HttpSettingsSource {
    client: reqwest::Client,
    url: String,
}

impl HttpSettingsSource {
    /// # Errors
    /// Returns [`CustomizeError::Http`] when the HTTP client cannot be built.
    pub fn new(base_url: &str) -> Result<Self, CustomizeError> {
        Self::with_timeout(base_url, DEFAULT_TIMEOUT)
    }

    /// # Errors
    /// Returns [`CustomizeError::Http`] when the HTTP client cannot be built.
    pub fn with_timeout(base_url: &str, timeout: Duration) -> Result<Self, CustomizeError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("Building settings client")?;
        let url = format!("{}{PUBLIC_SETTINGS_PATH}", base_url.trim_end_matches('/'));
        Ok(Self { client, url })
    }

    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }
}

impl SettingsSource for HttpSettingsSource {
    async fn fetch_public_settings(&self) -> Result<SettingsDocument, CustomizeError> {
        let body: Value = self
            .client
            .get(&self.url)
            .send()
            .await
            .context(format!("GET {}", self.url))?
            .error_for_status()
            .context(format!("GET {}", self.url))?
            .json()
            .await
            .context("Reading settings body")?;

        let document = unwrap_envelope(body);
        debug!(url = %self.url, "Public settings fetched");
        serde_json::from_value(document).context("Decoding settings document")
    }
}

fn unwrap_envelope(body: Value) -> Value {
    match body {
        Value::Object(mut map) if map.get("success").is_some_and(Value::is_boolean) => {
            map.remove("data").unwrap_or_else(|| Value::Object(serde_json::Map::new()))
        },
        other => other,
    }
}
