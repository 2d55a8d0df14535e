use crate::error::ApiError;
use crate::validation::Validator;
use axum::Json;
use axum::response::{IntoResponse, Response};
use folio_derive::api_model;
use serde::Serialize;

/// Largest page size any list endpoint serves.
pub const MAX_PAGE_SIZE: u32 = 100;

/// A validated page/limit pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub limit: u32,
}

impl PageRequest {
    /// Missing or zero values fall back to page 1 and `default_limit`; the limit is capped at
    /// [`MAX_PAGE_SIZE`].
    #[must_use]
    pub fn new(page: Option<u32>, limit: Option<u32>, default_limit: u32) -> Self {
        let page = page.filter(|p| *p > 0).unwrap_or(1);
        let limit = limit.filter(|l| *l > 0).unwrap_or(default_limit).min(MAX_PAGE_SIZE);
        Self { page, limit }
    }

    /// Like [`PageRequest::new`] but rejects a zero page or a limit outside `1..=MAX_PAGE_SIZE`
    /// instead of correcting it.
    ///
    /// # Errors
    /// Returns [`ApiError::Validation`] naming the offending parameters.
    pub fn checked(page: Option<u32>, limit: Option<u32>, default_limit: u32) -> Result<Self, ApiError> {
        Validator::new()
            .check(page.is_none_or(|p| p >= 1), "page", "Page must be a positive integer")
            .check(
                limit.is_none_or(|l| (1..=MAX_PAGE_SIZE).contains(&l)),
                "limit",
                "Limit must be between 1 and 100",
            )
            .finish()?;
        Ok(Self::new(page, limit, default_limit))
    }

    #[must_use]
    pub const fn offset(&self) -> u64 {
        (self.page as u64 - 1) * self.limit as u64
    }
}

#[api_model]
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: u32,
    pub limit: u32,
    pub total: u64,
    pub pages: u64,
}

impl Pagination {
    #[must_use]
    pub const fn new(request: PageRequest, total: u64) -> Self {
        let limit = request.limit as u64;
        Self { page: request.page, limit: request.limit, total, pages: total.div_ceil(limit) }
    }
}

/// List envelope: `{ "success": true, "data": [...], "pagination": {...} }`.
#[api_model]
pub struct Paginated<T> {
    pub success: bool,
    pub data: Vec<T>,
    pub pagination: Pagination,
}

impl<T> Paginated<T> {
    pub const fn new(data: Vec<T>, pagination: Pagination) -> Self {
        Self { success: true, data, pagination }
    }
}

impl<T: Serialize> IntoResponse for Paginated<T> {
    fn into_response(self) -> Response {
        Json(self).into_response()
    }
}

/// A whitelisted sort key: `title` ascending, `-createdAt` descending.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sort {
    /// Stored field name.
    pub field: &'static str,
    pub descending: bool,
}

impl Sort {
    /// Resolves a client sort expression against `allowed` pairs of (API name, stored field).
    ///
    /// A missing or blank expression resolves `default`, which must itself be allowed.
    ///
    /// # Errors
    /// Returns [`ApiError::BadRequest`] for a field outside the whitelist.
    pub fn parse(input: Option<&str>, default: &str, allowed: &[(&str, &'static str)]) -> Result<Self, ApiError> {
        let expression = input.map(str::trim).filter(|s| !s.is_empty()).unwrap_or(default);
        let (name, descending) = match expression.strip_prefix('-') {
            Some(name) => (name, true),
            None => (expression, false),
        };

        allowed
            .iter()
            .find(|(api, _)| *api == name)
            .map(|&(_, field)| Self { field, descending })
            .ok_or_else(|| ApiError::bad_request(format!("Cannot sort by '{name}'")))
    }

    /// `ORDER BY` operand, e.g. `created_at DESC`.
    #[must_use]
    pub fn clause(&self) -> String {
        format!("{} {}", self.field, if self.descending { "DESC" } else { "ASC" })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_and_caps() {
        assert_eq!(PageRequest::new(None, None, 10), PageRequest { page: 1, limit: 10 });
        assert_eq!(PageRequest::new(Some(0), Some(0), 20), PageRequest { page: 1, limit: 20 });
        assert_eq!(PageRequest::new(Some(3), Some(500), 10).limit, MAX_PAGE_SIZE);
    }

    #[test]
    fn test_offset_and_page_count() {
        let request = PageRequest::new(Some(3), Some(10), 10);
        assert_eq!(request.offset(), 20);

        let pagination = Pagination::new(request, 21);
        assert_eq!(pagination.pages, 3);
        assert_eq!(Pagination::new(request, 0).pages, 0);
    }

    #[test]
    fn test_checked_rejects_out_of_range() {
        assert!(PageRequest::checked(Some(0), None, 10).is_err());
        assert!(PageRequest::checked(None, Some(101), 10).is_err());
        assert_eq!(PageRequest::checked(Some(2), Some(100), 10).ok(), Some(PageRequest { page: 2, limit: 100 }));
    }

    #[test]
    fn test_sort_whitelist() {
        const FIELDS: &[(&str, &str)] = &[("createdAt", "created_at"), ("title", "title")];

        let sort = Sort::parse(None, "-createdAt", FIELDS).expect("default");
        assert_eq!(sort.clause(), "created_at DESC");
        assert_eq!(Sort::parse(Some("title"), "-createdAt", FIELDS).expect("title").clause(), "title ASC");
        assert!(Sort::parse(Some("password_hash"), "-createdAt", FIELDS).is_err());
        assert!(Sort::parse(Some("-title; DELETE project"), "-createdAt", FIELDS).is_err());
    }
}
