use folio_kernel::error::ApiError;
use std::borrow::Cow;

#[folio_derive::folio_error]
pub enum ProjectError {
    #[error("Project not found{}: {message}", format_context(.context))]
    NotFound { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Project storage error{}: {source}", format_context(.context))]
    Database { source: surrealdb::Error, context: Option<Cow<'static, str>> },

    #[error("Internal project error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

impl From<ProjectError> for ApiError {
    fn from(err: ProjectError) -> Self {
        match err {
            ProjectError::NotFound { .. } => Self::not_found("Project not found"),
            ProjectError::Database { source, context } => Self::Database { source: source.into(), context },
            ProjectError::Internal { message, context } => Self::Internal { message, context },
        }
    }
}
