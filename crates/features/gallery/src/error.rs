use folio_kernel::error::ApiError;
use folio_storage::StorageError;
use std::borrow::Cow;

#[folio_derive::folio_error]
pub enum GalleryError {
    #[error("Image not found{}: {message}", format_context(.context))]
    NotFound { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Media store error{}: {source}", format_context(.context))]
    Storage { source: StorageError, context: Option<Cow<'static, str>> },

    #[error("Image storage error{}: {source}", format_context(.context))]
    Database { source: surrealdb::Error, context: Option<Cow<'static, str>> },

    #[error("Internal gallery error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

impl From<GalleryError> for ApiError {
    fn from(err: GalleryError) -> Self {
        match err {
            GalleryError::NotFound { .. } => Self::not_found("Image not found"),
            GalleryError::Storage { source, context } => match source {
                StorageError::NotFound { .. } | StorageError::InvalidName { .. } => Self::not_found("File not found"),
                StorageError::TooLarge { message, .. } => Self::PayloadTooLarge { message, context },
                other => Self::Internal { message: other.to_string().into(), context },
            },
            GalleryError::Database { source, context } => Self::Database { source: source.into(), context },
            GalleryError::Internal { message, context } => Self::Internal { message, context },
        }
    }
}
