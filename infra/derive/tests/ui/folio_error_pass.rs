use folio_derive::folio_error;
use std::borrow::Cow;

#[folio_error]
pub enum MediaError {
    #[error("IO error{}: {source}", format_context(.context))]
    Io {
        #[source]
        source: std::io::Error,
        context: Option<Cow<'static, str>>,
    },

    #[error("Rejected{}: {message}", format_context(.context))]
    Rejected { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Internal error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

fn main() {
    let from_io: MediaError = std::io::Error::other("disk").into();
    assert!(matches!(from_io, MediaError::Io { context: None, .. }));

    let from_str: MediaError = "boom".into();
    assert_eq!(from_str.to_string(), "Internal error: boom");
}
