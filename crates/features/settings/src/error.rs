use folio_kernel::error::ApiError;
use std::borrow::Cow;

#[folio_derive::folio_error]
pub enum SettingsError {
    #[error("Config not found{}: {message}", format_context(.context))]
    NotFound { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// A stored value no longer parses as JSON.
    #[error("Stored setting is not valid JSON{}: {source}", format_context(.context))]
    Decode { source: serde_json::Error, context: Option<Cow<'static, str>> },

    #[error("Settings storage error{}: {source}", format_context(.context))]
    Database { source: surrealdb::Error, context: Option<Cow<'static, str>> },

    #[error("Internal settings error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

impl From<SettingsError> for ApiError {
    fn from(err: SettingsError) -> Self {
        match err {
            SettingsError::NotFound { .. } => Self::not_found("Config not found"),
            SettingsError::Database { source, context } => Self::Database { source: source.into(), context },
            other @ (SettingsError::Decode { .. } | SettingsError::Internal { .. }) => {
                Self::Internal { message: other.to_string().into(), context: None }
            },
        }
    }
}
