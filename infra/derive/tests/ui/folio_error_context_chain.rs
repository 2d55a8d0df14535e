use folio_derive::folio_error;
use std::borrow::Cow;

#[folio_error]
pub enum ShellError {
    #[error("IO error{}: {source}", format_context(.context))]
    Io { source: std::io::Error, context: Option<Cow<'static, str>> },

    #[error("Internal error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

fn read() -> Result<(), ShellError> {
    Err(std::io::Error::other("missing")).context("Reading shell")
}

fn internal() -> Result<(), ShellError> {
    Err(ShellError::from("bad shell")).context("Parsing shell")
}

fn main() {
    assert_eq!(read().unwrap_err().to_string(), "IO error (Reading shell): missing");
    assert_eq!(internal().unwrap_err().to_string(), "Internal error (Parsing shell): bad shell");
}
