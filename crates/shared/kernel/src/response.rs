use axum::Json;
use axum::response::{IntoResponse, Response};
use folio_derive::api_model;
use serde::Serialize;
use std::borrow::Cow;

/// Success envelope: `{ "success": true, "message"?: ..., "data"?: ... }`.
#[api_model]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<Cow<'static, str>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    pub const fn ok(data: T) -> Self {
        Self { success: true, message: None, data: Some(data) }
    }

    pub fn with_message(message: impl Into<Cow<'static, str>>, data: T) -> Self {
        Self { success: true, message: Some(message.into()), data: Some(data) }
    }
}

impl ApiResponse<()> {
    /// A bare acknowledgement without payload.
    pub fn message(message: impl Into<Cow<'static, str>>) -> Self {
        Self { success: true, message: Some(message.into()), data: None }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        Json(self).into_response()
    }
}
