use std::borrow::Cow;

#[folio_derive::folio_error]
pub enum CustomizeError {
    /// The settings source answered, but not with a settings document.
    #[error("Malformed settings document{}: {source}", format_context(.context))]
    Decode { source: serde_json::Error, context: Option<Cow<'static, str>> },

    #[cfg(feature = "http")]
    #[error("Settings request failed{}: {source}", format_context(.context))]
    Http { source: reqwest::Error, context: Option<Cow<'static, str>> },

    /// The settings source could not be read.
    #[error("Settings unavailable{}: {message}", format_context(.context))]
    Unavailable { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Internal customize error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}
