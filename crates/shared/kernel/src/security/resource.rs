use crate::SAFE_ALPHABET;
use std::borrow::Cow;

#[folio_derive::folio_error]
pub enum ResourceGuardError {
    #[error("Resource validation error{}: {message}", format_context(.context))]
    Validation { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

/// Longest identifier accepted from a client.
const MAX_ID_LEN: usize = 64;

/// Utilities for safe resource handling and ID validation.
#[derive(Debug)]
pub struct ResourceGuard;

impl ResourceGuard {
    /// Validates a client supplied identifier for records of `expected_table`.
    ///
    /// Accepts either the bare identifier (`"a7Kx9"`) or the table-qualified form
    /// (`"project:a7Kx9"`) and returns the bare identifier. Rejects identifiers that name a
    /// different table, are empty or too long, or contain characters outside the id alphabet,
    /// so a path segment can never smuggle query syntax.
    ///
    /// # Errors
    /// Returns an error if the ID table does not match or the identifier is malformed.
    pub fn verify<I, T>(id: I, expected_table: T) -> Result<String, ResourceGuardError>
    where
        I: AsRef<str>,
        T: AsRef<str>,
    {
        let id_ref = id.as_ref();
        let table_ref = expected_table.as_ref();

        let bare = match id_ref.split_once(':') {
            Some((table, rest)) if table == table_ref => rest,
            Some((table, _)) => {
                return Err(ResourceGuardError::Validation {
                    message: format!("Expected '{table_ref}', got '{table}'").into(),
                    context: Some("ID table mismatch".into()),
                });
            },
            None => id_ref,
        };

        if bare.is_empty() || bare.len() > MAX_ID_LEN || !bare.chars().all(|c| SAFE_ALPHABET.contains(&c)) {
            return Err(ResourceGuardError::Validation {
                message: format!("Invalid {table_ref} id").into(),
                context: None,
            });
        }

        Ok(bare.to_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_verification() {
        assert_eq!(ResourceGuard::verify("project:abc234", "project").unwrap(), "abc234");
        assert_eq!(ResourceGuard::verify("abc234", "project").unwrap(), "abc234");

        assert!(ResourceGuard::verify("setting:abc234", "project").is_err());
        assert!(ResourceGuard::verify("", "project").is_err());
        assert!(ResourceGuard::verify("abc' OR true", "project").is_err());
    }
}
