use folio_kernel::error::ApiError;
use std::borrow::Cow;

#[folio_derive::folio_error]
pub enum LeadError {
    #[error("Lead not found{}: {message}", format_context(.context))]
    NotFound { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Lead storage error{}: {source}", format_context(.context))]
    Database { source: surrealdb::Error, context: Option<Cow<'static, str>> },
}

impl From<LeadError> for ApiError {
    fn from(err: LeadError) -> Self {
        match err {
            LeadError::NotFound { .. } => Self::not_found("Lead not found"),
            LeadError::Database { source, context } => Self::Database { source: source.into(), context },
        }
    }
}
