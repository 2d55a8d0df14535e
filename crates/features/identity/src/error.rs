use folio_kernel::error::ApiError;
use std::borrow::Cow;

/// A specialized [`IdentityError`] enum of this crate.
#[folio_derive::folio_error]
pub enum IdentityError {
    /// Misconfigured signing secret or admin seed.
    #[error("Identity config error{}: {message}", format_context(.context))]
    Config { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// Missing, unknown or inactive credentials.
    #[error("Identity auth error{}: {message}", format_context(.context))]
    Auth { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// Username or email already belongs to another account.
    #[error("Identity conflict{}: {message}", format_context(.context))]
    Duplicate { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Account not found{}: {message}", format_context(.context))]
    NotFound { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Token rejected{}: {source}", format_context(.context))]
    Token { source: jsonwebtoken::errors::Error, context: Option<Cow<'static, str>> },

    #[error("Password hashing failed{}: {message}", format_context(.context))]
    Hash { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Identity storage error{}: {source}", format_context(.context))]
    Database { source: surrealdb::Error, context: Option<Cow<'static, str>> },

    /// Internal fallback for unexpected issues or logic errors.
    #[error("Internal identity error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

impl IdentityError {
    pub(crate) fn auth(message: impl Into<Cow<'static, str>>) -> Self {
        Self::Auth { message: message.into(), context: None }
    }
}

impl From<IdentityError> for ApiError {
    fn from(err: IdentityError) -> Self {
        match err {
            IdentityError::Auth { message, context } => Self::Unauthorized { message, context },
            IdentityError::Token { .. } => Self::unauthorized("Not authorized, token failed"),
            IdentityError::Duplicate { message, context } => Self::BadRequest { message, context },
            IdentityError::NotFound { message, context } => Self::NotFound { message, context },
            IdentityError::Database { source, context } => Self::Database { source: source.into(), context },
            other @ (IdentityError::Config { .. }
            | IdentityError::Hash { .. }
            | IdentityError::Internal { .. }) => Self::Internal { message: other.to_string().into(), context: None },
        }
    }
}
