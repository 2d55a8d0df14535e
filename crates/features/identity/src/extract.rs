//! Request extractors for authenticated callers.

use crate::Identity;
use crate::model::AccountProfile;
use axum::extract::{FromRequestParts, OptionalFromRequestParts};
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use folio_domain::models::Role;
use folio_kernel::error::ApiError;
use folio_kernel::server::ApiState;

/// A caller holding a valid token for an existing, active account.
///
/// Rejects with 401. Use `Option<AuthUser>` for endpoints that only behave differently for
/// signed-in callers; an invalid token then counts as anonymous.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub profile: AccountProfile,
}

impl AuthUser {
    #[must_use]
    pub fn id(&self) -> &str {
        &self.profile.id
    }

    #[must_use]
    pub const fn role(&self) -> Role {
        self.profile.role
    }

    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.profile.role == Role::Admin
    }
}

/// An [`AuthUser`] with the admin role. Rejects with 401, then 403.
#[derive(Debug, Clone)]
pub struct AdminUser(pub AuthUser);

impl AdminUser {
    #[must_use]
    pub fn id(&self) -> &str {
        self.0.id()
    }
}

fn bearer_token(parts: &Parts) -> Option<&str> {
    let value = parts.headers.get(AUTHORIZATION)?.to_str().ok()?;
    let token = value.strip_prefix("Bearer ")?.trim();
    (!token.is_empty()).then_some(token)
}

impl FromRequestParts<ApiState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &ApiState) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts)
            .ok_or_else(|| ApiError::unauthorized("Not authorized, no token provided"))?;
        let identity = state.try_get_slice::<Identity>()?;
        Ok(identity.authenticate(token).await?)
    }
}

impl OptionalFromRequestParts<ApiState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &ApiState) -> Result<Option<Self>, Self::Rejection> {
        let Some(token) = bearer_token(parts) else {
            return Ok(None);
        };
        let identity = state.try_get_slice::<Identity>()?;
        Ok(identity.authenticate(token).await.ok())
    }
}

impl FromRequestParts<ApiState> for AdminUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &ApiState) -> Result<Self, Self::Rejection> {
        let user = <AuthUser as FromRequestParts<ApiState>>::from_request_parts(parts, state).await?;
        if !user.is_admin() {
            return Err(ApiError::forbidden("Access denied. Admin privileges required."));
        }
        Ok(Self(user))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    fn parts(header: Option<&str>) -> Parts {
        let mut builder = Request::builder().uri("/");
        if let Some(value) = header {
            builder = builder.header(AUTHORIZATION, value);
        }
        builder.body(()).expect("request").into_parts().0
    }

    #[test]
    fn test_bearer_token_parsing() {
        assert_eq!(bearer_token(&parts(Some("Bearer abc.def"))), Some("abc.def"));
        assert_eq!(bearer_token(&parts(Some("Bearer   "))), None);
        assert_eq!(bearer_token(&parts(Some("Basic dXNlcg=="))), None);
        assert_eq!(bearer_token(&parts(None)), None);
    }
}
