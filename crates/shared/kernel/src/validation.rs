//! Field validation that collects every failure before rejecting a request.

use crate::error::{ApiError, FieldError};
use regex::Regex;
use std::sync::LazyLock;

static EMAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+\-]+@[A-Za-z0-9\-]+(\.[A-Za-z0-9\-]+)*\.[A-Za-z]{2,}$")
        .expect("email pattern")
});
static HTTP_URL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^https?://[^\s/$.?#][^\s]*$").expect("url pattern"));
static HEX_COLOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^#[0-9A-Fa-f]{6}$").expect("color pattern"));

#[must_use]
pub fn is_email(value: &str) -> bool {
    EMAIL.is_match(value)
}

#[must_use]
pub fn is_http_url(value: &str) -> bool {
    HTTP_URL.is_match(value)
}

#[must_use]
pub fn is_hex_color(value: &str) -> bool {
    HEX_COLOR.is_match(value)
}

/// Accumulates [`FieldError`]s.
///
/// ```rust
/// use folio_kernel::validation::Validator;
///
/// let mut v = Validator::new();
/// v.length("title", "", 1, 100, "Title must be between 1 and 100 characters");
/// assert!(v.finish().is_err());
/// ```
#[derive(Debug, Default)]
pub struct Validator {
    errors: Vec<FieldError>,
}

impl Validator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a failure when `ok` is false.
    pub fn check(&mut self, ok: bool, field: &str, message: &str) -> &mut Self {
        if !ok {
            self.errors.push(FieldError::new(field, message));
        }
        self
    }

    /// Character count of the trimmed value must lie in `min..=max`.
    pub fn length(&mut self, field: &str, value: &str, min: usize, max: usize, message: &str) -> &mut Self {
        let count = value.trim().chars().count();
        self.check((min..=max).contains(&count), field, message)
    }

    pub fn email(&mut self, field: &str, value: &str) -> &mut Self {
        self.check(is_email(value.trim()), field, "Please provide a valid email")
    }

    pub fn url(&mut self, field: &str, value: &str, message: &str) -> &mut Self {
        self.check(is_http_url(value.trim()), field, message)
    }

    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// # Errors
    /// Returns [`ApiError::Validation`] listing every recorded failure.
    pub fn finish(&mut self) -> Result<(), ApiError> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(ApiError::validation(std::mem::take(&mut self.errors)))
        }
    }
}
