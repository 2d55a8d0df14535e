use crate::error::StorageError;
use std::fmt;

const MAX_BUCKET_LEN: usize = 32;
const MAX_OBJECT_LEN: usize = 128;

/// A top-level directory grouping objects of one kind (`uploads`, `avatars`).
///
/// Lowercase ASCII letters, digits and `_` only.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Bucket(String);

impl Bucket {
    /// # Errors
    /// Returns [`StorageError::InvalidName`] for empty, long or non `[a-z0-9_]` names.
    pub fn parse(value: &str) -> Result<Self, StorageError> {
        let name = value.trim().to_ascii_lowercase();
        if name.is_empty() || name.len() > MAX_BUCKET_LEN {
            return Err(StorageError::InvalidName {
                message: format!("bucket '{value}'").into(),
                context: Some("length must be 1..=32".into()),
            });
        }
        if !name.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'_') {
            return Err(StorageError::InvalidName {
                message: format!("bucket '{value}'").into(),
                context: Some("only a-z, 0-9 and _ are allowed".into()),
            });
        }
        Ok(Self(name))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Bucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A flat object file name such as `k3Hq9xPz2mTa.png`.
///
/// Names never contain separators, so they cannot address anything outside their bucket.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ObjectName(String);

impl ObjectName {
    /// # Errors
    /// Returns [`StorageError::InvalidName`] when the name is empty, too long, starts with a dot,
    /// or uses characters other than ASCII alphanumerics, `-`, `_` and `.`.
    pub fn parse(value: &str) -> Result<Self, StorageError> {
        let invalid = |reason: &'static str| StorageError::InvalidName {
            message: format!("object '{value}'").into(),
            context: Some(reason.into()),
        };

        if value.is_empty() || value.len() > MAX_OBJECT_LEN {
            return Err(invalid("length must be 1..=128"));
        }
        if value.starts_with('.') {
            return Err(invalid("hidden names are reserved"));
        }
        if value.contains("..") {
            return Err(invalid("consecutive dots are not allowed"));
        }
        if !value.bytes().all(|b| b.is_ascii_alphanumeric() || matches!(b, b'-' | b'_' | b'.')) {
            return Err(invalid("only ASCII letters, digits, '-', '_' and '.' are allowed"));
        }
        Ok(Self(value.to_owned()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Lowercased extension without the dot.
    #[must_use]
    pub fn extension(&self) -> Option<String> {
        self.0.rsplit_once('.').map(|(_, ext)| ext.to_ascii_lowercase()).filter(|ext| !ext.is_empty())
    }

    /// Two directory levels derived from the first four characters of the name.
    pub(crate) fn shards(&self) -> Option<(&str, &str)> {
        let stem = self.0.split('.').next().unwrap_or_default();
        if stem.len() < 4 {
            return None;
        }
        Some((&stem[0..2], &stem[2..4]))
    }
}

impl fmt::Display for ObjectName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bucket_rules() {
        assert_eq!(Bucket::parse("Uploads").map(|b| b.to_string()).ok().as_deref(), Some("uploads"));
        assert!(Bucket::parse("").is_err());
        assert!(Bucket::parse("../etc").is_err());
        assert!(Bucket::parse("a/b").is_err());
    }

    #[test]
    fn test_object_rules() {
        assert!(ObjectName::parse("k3Hq9xPz2mTa.png").is_ok());
        assert!(ObjectName::parse("../passwd").is_err());
        assert!(ObjectName::parse("a/b.png").is_err());
        assert!(ObjectName::parse(".hidden").is_err());
        assert!(ObjectName::parse("a..png").is_err());
        assert!(ObjectName::parse(&"x".repeat(129)).is_err());
    }

    #[test]
    fn test_extension_and_shards() {
        let name = ObjectName::parse("AbCdEf.JPG").expect("valid");
        assert_eq!(name.extension().as_deref(), Some("jpg"));
        assert_eq!(name.shards(), Some(("Ab", "Cd")));

        let short = ObjectName::parse("ab.png").expect("valid");
        assert_eq!(short.shards(), None);
    }
}
