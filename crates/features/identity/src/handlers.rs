use crate::Identity;
use crate::extract::AuthUser;
use crate::model::{
    AccountProfile, AuthResponse, ChangePasswordRequest, LoginRequest, RegisterRequest, UpdateProfileRequest,
};
use crate::service::NewAccount;
use axum::extract::State;
use axum::http::StatusCode;
use folio_derive::api_handler;
use folio_domain::constants::TAG_AUTH;
use folio_domain::models::Role;
use folio_kernel::prelude::*;

const MIN_PASSWORD_LEN: usize = 6;

fn is_username(value: &str) -> bool {
    value.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'_')
}

fn normalize_email(value: &str) -> String {
    value.trim().to_lowercase()
}

/// Blank optional strings count as "not supplied".
fn supplied(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_owned()).filter(|v| !v.is_empty())
}

#[api_handler(
    post,
    path = "/api/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = CREATED, description = "Account created", body = AuthResponse),
        (status = BAD_REQUEST, description = "Invalid input or user already exists", body = ErrorBody),
    ),
    tag = TAG_AUTH,
)]
pub(crate) async fn register(
    State(state): State<ApiState>,
    JsonBody(body): JsonBody<RegisterRequest>,
) -> ApiResult<(StatusCode, AuthResponse)> {
    let username = body.username.trim().to_owned();
    let email = normalize_email(&body.email);

    Validator::new()
        .length("username", &username, 3, 30, "Username must be between 3 and 30 characters")
        .check(is_username(&username), "username", "Username can only contain letters, numbers, and underscores")
        .email("email", &email)
        .check(
            body.password.chars().count() >= MIN_PASSWORD_LEN,
            "password",
            "Password must be at least 6 characters",
        )
        .finish()?;

    let identity = state.try_get_slice::<Identity>()?;
    let (token, user) = identity
        .register(NewAccount { username, email, password: body.password, role: Role::User })
        .await?;

    Ok((StatusCode::CREATED, AuthResponse::new("User registered successfully", token, user)))
}

#[api_handler(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = OK, description = "Signed in", body = AuthResponse),
        (status = UNAUTHORIZED, description = "Invalid credentials", body = ErrorBody),
    ),
    tag = TAG_AUTH,
)]
pub(crate) async fn login(
    State(state): State<ApiState>,
    JsonBody(body): JsonBody<LoginRequest>,
) -> ApiResult<AuthResponse> {
    let email = normalize_email(&body.email);
    Validator::new()
        .email("email", &email)
        .check(!body.password.is_empty(), "password", "Password is required")
        .finish()?;

    let identity = state.try_get_slice::<Identity>()?;
    let (token, user) = identity.login(&email, body.password).await?;
    Ok(AuthResponse::new("Login successful", token, user))
}

#[api_handler(
    get,
    path = "/api/auth/me",
    responses(
        (status = OK, description = "Current account", body = ApiResponse<AccountProfile>),
        (status = UNAUTHORIZED, description = "Missing or invalid token", body = ErrorBody),
    ),
    security(("bearer_auth" = [])),
    tag = TAG_AUTH,
)]
pub(crate) async fn me(user: AuthUser) -> ApiResponse<AccountProfile> {
    ApiResponse::ok(user.profile)
}

#[api_handler(
    put,
    path = "/api/auth/update",
    request_body = UpdateProfileRequest,
    responses(
        (status = OK, description = "Profile updated", body = ApiResponse<AccountProfile>),
        (status = BAD_REQUEST, description = "Invalid input or name taken", body = ErrorBody),
    ),
    security(("bearer_auth" = [])),
    tag = TAG_AUTH,
)]
pub(crate) async fn update_profile(
    State(state): State<ApiState>,
    user: AuthUser,
    JsonBody(body): JsonBody<UpdateProfileRequest>,
) -> ApiResult<ApiResponse<AccountProfile>> {
    let patch = UpdateProfileRequest {
        username: supplied(body.username),
        email: supplied(body.email).map(|email| normalize_email(&email)),
        bio: body.bio.map(|bio| bio.trim().to_owned()),
        avatar: body.avatar.map(|avatar| avatar.trim().to_owned()),
    };

    let mut validator = Validator::new();
    if let Some(username) = &patch.username {
        validator
            .length("username", username, 3, 30, "Username must be between 3 and 30 characters")
            .check(is_username(username), "username", "Username can only contain letters, numbers, and underscores");
    }
    if let Some(email) = &patch.email {
        validator.email("email", email);
    }
    if let Some(bio) = &patch.bio {
        validator.length("bio", bio, 0, 500, "Bio cannot exceed 500 characters");
    }
    validator.finish()?;

    let identity = state.try_get_slice::<Identity>()?;
    let profile = identity.update_profile(user.id(), patch).await?;
    Ok(ApiResponse::with_message("Profile updated successfully", profile))
}

#[api_handler(
    put,
    path = "/api/auth/password",
    request_body = ChangePasswordRequest,
    responses(
        (status = OK, description = "Password changed, new token issued", body = AuthResponse),
        (status = UNAUTHORIZED, description = "Current password is incorrect", body = ErrorBody),
    ),
    security(("bearer_auth" = [])),
    tag = TAG_AUTH,
)]
pub(crate) async fn change_password(
    State(state): State<ApiState>,
    user: AuthUser,
    JsonBody(body): JsonBody<ChangePasswordRequest>,
) -> ApiResult<AuthResponse> {
    Validator::new()
        .check(!body.current_password.is_empty(), "currentPassword", "Current password is required")
        .check(
            body.new_password.chars().count() >= MIN_PASSWORD_LEN,
            "newPassword",
            "Password must be at least 6 characters",
        )
        .finish()?;

    let identity = state.try_get_slice::<Identity>()?;
    let (token, profile) = identity.change_password(user.id(), body.current_password, body.new_password).await?;
    Ok(AuthResponse::new("Password updated successfully", token, profile))
}
