use folio_derive::api_model;
use folio_domain::models::Role;
use surrealdb::types::SurrealValue;

/// Stored form of an account.
#[derive(Debug, Clone, SurrealValue)]
pub(crate) struct AccountRow {
    pub uid: String,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub role: String,
    pub avatar: Option<String>,
    pub bio: Option<String>,
    pub is_active: bool,
    pub last_login: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl AccountRow {
    pub(crate) fn role(&self) -> Role {
        self.role.parse().unwrap_or_default()
    }

    pub(crate) fn into_profile(self) -> AccountProfile {
        AccountProfile {
            role: self.role(),
            id: self.uid,
            username: self.username,
            email: self.email,
            avatar: self.avatar,
            bio: self.bio,
            is_active: self.is_active,
            last_login: self.last_login,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// Public view of an account; never carries the password hash.
#[api_model]
#[derive(Clone, PartialEq, Eq)]
pub struct AccountProfile {
    pub id: String,
    pub username: String,
    pub email: String,
    #[schema(value_type = String, example = "user")]
    pub role: Role,
    pub avatar: Option<String>,
    pub bio: Option<String>,
    pub is_active: bool,
    pub last_login: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

/// Registration payload. A client supplied `role` is ignored.
#[api_model(deny_unknown_fields = false)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

#[api_model]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Only supplied fields change. Blank `username`/`email` are ignored.
#[api_model]
#[derive(Default)]
pub struct UpdateProfileRequest {
    pub username: Option<String>,
    pub email: Option<String>,
    pub bio: Option<String>,
    pub avatar: Option<String>,
}

#[api_model]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

/// Flat token response: `{ success, message, token, user }`.
#[api_model]
pub struct AuthResponse {
    pub success: bool,
    pub message: String,
    pub token: String,
    pub user: AccountProfile,
}

impl AuthResponse {
    pub(crate) fn new(message: &str, token: String, user: AccountProfile) -> Self {
        Self { success: true, message: message.to_owned(), token, user }
    }
}

impl axum::response::IntoResponse for AuthResponse {
    fn into_response(self) -> axum::response::Response {
        axum::Json(self).into_response()
    }
}
