use crate::error::SettingsError;
use folio_derive::api_model;
use folio_domain::models::SettingCategory;
use serde_json::Value;
use surrealdb::types::SurrealValue;

/// Stored form of a setting. The value is kept as its JSON text so any JSON shape round-trips.
#[derive(Debug, Clone, SurrealValue)]
pub(crate) struct SettingRow {
    pub key: String,
    pub value_json: String,
    pub description: String,
    pub category: String,
    pub is_public: bool,
    pub created_at: String,
    pub updated_at: String,
}

impl SettingRow {
    pub(crate) fn value(&self) -> Result<Value, SettingsError> {
        Ok(serde_json::from_str(&self.value_json)?)
    }

    pub(crate) fn into_record(self) -> Result<ConfigRecord, SettingsError> {
        Ok(ConfigRecord {
            value: self.value()?,
            category: self.category.parse().unwrap_or_default(),
            key: self.key,
            description: self.description,
            is_public: self.is_public,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// Key and raw value of a public setting.
#[derive(Debug, Clone, SurrealValue)]
pub(crate) struct PublicRow {
    pub key: String,
    pub value_json: String,
}

/// One configuration record.
#[api_model]
#[derive(Clone, PartialEq)]
pub struct ConfigRecord {
    pub key: String,
    #[schema(value_type = Object)]
    pub value: Value,
    pub description: String,
    #[schema(value_type = String, example = "theme")]
    pub category: SettingCategory,
    pub is_public: bool,
    pub created_at: String,
    pub updated_at: String,
}

/// Create-or-update payload. On update only the supplied optional fields change.
#[api_model]
pub struct SetConfigRequest {
    pub key: String,
    #[schema(value_type = Object)]
    pub value: Value,
    pub description: Option<String>,
    #[schema(value_type = Option<String>)]
    pub category: Option<SettingCategory>,
    pub is_public: Option<bool>,
}

/// Bulk upsert payload. Items are checked one by one; malformed ones are skipped.
#[api_model(deny_unknown_fields = false)]
pub struct BulkConfigRequest {
    #[schema(value_type = Option<Vec<Object>>)]
    pub configs: Option<Vec<Value>>,
}

#[api_model]
pub struct BulkConfigResult {
    pub count: usize,
}

#[api_model(deny_unknown_fields = false)]
#[derive(Default)]
pub struct ConfigListQuery {
    #[schema(value_type = Option<String>)]
    pub category: Option<SettingCategory>,
}

/// Fully resolved values for one upsert.
#[derive(Debug, Clone)]
pub(crate) struct SettingChange {
    pub key: String,
    pub value: Value,
    pub description: Option<String>,
    pub category: Option<SettingCategory>,
    pub is_public: Option<bool>,
}

impl SettingChange {
    /// Reads one bulk item: it needs a non-blank string `key` and a `value`; an unknown
    /// `category` disqualifies it. Bulk items default to public and to `other`.
    pub(crate) fn from_bulk_item(item: &Value) -> Option<Self> {
        let key = item.get("key")?.as_str()?.trim();
        if key.is_empty() {
            return None;
        }
        let value = item.get("value").cloned().filter(|value| !value.is_null())?;
        let category = match item.get("category").and_then(Value::as_str) {
            Some(name) if !name.is_empty() => name.parse().ok()?,
            _ => SettingCategory::Other,
        };

        Some(Self {
            key: key.to_owned(),
            value,
            description: Some(item.get("description").and_then(Value::as_str).unwrap_or_default().to_owned()),
            category: Some(category),
            is_public: Some(item.get("isPublic").and_then(Value::as_bool).unwrap_or(true)),
        })
    }
}
