use crate::error::SettingsError;
use crate::model::{PublicRow, SettingChange, SettingRow};
use folio_database::Database;
use folio_domain::models::SettingCategory;
use folio_kernel::timestamp;
use serde_json::{Map, Value};
use tracing::warn;

const SELECT_SETTING: &str = "SELECT * OMIT id FROM setting";

#[derive(Debug, Clone)]
pub(crate) struct SettingsRepository {
    db: Database,
}

impl SettingsRepository {
    pub(crate) const fn new(db: Database) -> Self {
        Self { db }
    }

    pub(crate) async fn find(&self, key: &str) -> Result<Option<SettingRow>, SettingsError> {
        let mut rows = self
            .db
            .query(format!("{SELECT_SETTING} WHERE key = $key LIMIT 1"))
            .bind(("key", key.to_owned()))
            .await?
            .take::<Vec<SettingRow>>(0)?;
        Ok(rows.pop())
    }

    /// All records, optionally of one category, ordered by category then key.
    pub(crate) async fn list(&self, category: Option<SettingCategory>) -> Result<Vec<SettingRow>, SettingsError> {
        let filter = if category.is_some() { "WHERE category = $category" } else { "" };
        let rows = self
            .db
            .query(format!("{SELECT_SETTING} {filter} ORDER BY category, key"))
            .bind(("category", category.map(|c| c.to_string())))
            .await?
            .take::<Vec<SettingRow>>(0)?;
        Ok(rows)
    }

    /// Flat key to value object of the public records.
    ///
    /// A record whose stored text no longer parses is left out and logged.
    pub(crate) async fn public_values(&self) -> Result<Map<String, Value>, SettingsError> {
        let rows = self
            .db
            .query("SELECT key, value_json FROM setting WHERE is_public = true ORDER BY key")
            .await?
            .take::<Vec<PublicRow>>(0)?;

        Ok(rows
            .into_iter()
            .filter_map(|row| match serde_json::from_str::<Value>(&row.value_json) {
                Ok(value) => Some((row.key, value)),
                Err(err) => {
                    warn!(key = %row.key, error = %err, "Skipping unreadable setting");
                    None
                },
            })
            .collect())
    }

    /// Creates the record or updates it in place; absent optional fields keep their values.
    pub(crate) async fn upsert(&self, change: SettingChange) -> Result<SettingRow, SettingsError> {
        let value_json = serde_json::to_string(&change.value)?;
        let now = timestamp();

        if let Some(mut row) = self.find(&change.key).await? {
            row.value_json = value_json;
            if let Some(description) = change.description {
                row.description = description;
            }
            if let Some(category) = change.category {
                row.category = category.to_string();
            }
            if let Some(is_public) = change.is_public {
                row.is_public = is_public;
            }
            row.updated_at = now;

            self.db
                .query(
                    "UPDATE setting SET value_json = $row.value_json, description = $row.description,
                     category = $row.category, is_public = $row.is_public, updated_at = $row.updated_at
                     WHERE key = $row.key RETURN NONE",
                )
                .bind(("row", row.clone()))
                .await?
                .check()
                .map_err(surrealdb::Error::from)?;
            return Ok(row);
        }

        let row = SettingRow {
            key: change.key,
            value_json,
            description: change.description.unwrap_or_default(),
            category: change.category.unwrap_or_default().to_string(),
            is_public: change.is_public.unwrap_or(false),
            created_at: now.clone(),
            updated_at: now,
        };
        self.db
            .query("CREATE setting CONTENT $row RETURN NONE")
            .bind(("row", row.clone()))
            .await?
            .check()
            .map_err(surrealdb::Error::from)?;
        Ok(row)
    }

    /// Returns `false` when no record had the key.
    pub(crate) async fn delete(&self, key: &str) -> Result<bool, SettingsError> {
        if self.find(key).await?.is_none() {
            return Ok(false);
        }
        self.db
            .query("DELETE setting WHERE key = $key RETURN NONE")
            .bind(("key", key.to_owned()))
            .await?
            .check()
            .map_err(surrealdb::Error::from)?;
        Ok(true)
    }
}
