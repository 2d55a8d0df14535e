//! HS256 access tokens.

use crate::error::IdentityError;
use folio_domain::config::JwtConfig;
use folio_domain::models::Role;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use std::fmt;

const MIN_SECRET_LEN: usize = 16;

/// Claims carried by every access token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Account id.
    pub sub: String,
    pub role: Role,
    pub iat: i64,
    pub exp: i64,
    pub iss: String,
}

/// Signs and verifies access tokens with the configured shared secret.
#[derive(Clone)]
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    issuer: String,
    ttl_seconds: i64,
    leeway: u64,
}

impl fmt::Debug for TokenService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenService")
            .field("issuer", &self.issuer)
            .field("ttl_seconds", &self.ttl_seconds)
            .finish_non_exhaustive()
    }
}

impl TokenService {
    /// # Errors
    /// Returns [`IdentityError::Config`] when the secret is blank or the ttl is zero.
    pub fn new(config: &JwtConfig) -> Result<Self, IdentityError> {
        let secret = config.secret.trim();
        if secret.is_empty() {
            return Err(IdentityError::Config {
                message: "JWT secret is empty".into(),
                context: Some("security.jwt.secret".into()),
            });
        }
        if config.ttl_seconds == 0 {
            return Err(IdentityError::Config {
                message: "JWT ttl must be positive".into(),
                context: Some("security.jwt.ttl_seconds".into()),
            });
        }
        if secret.len() < MIN_SECRET_LEN {
            tracing::warn!("JWT secret is shorter than {MIN_SECRET_LEN} characters");
        }

        Ok(Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            issuer: config.issuer.clone(),
            ttl_seconds: i64::try_from(config.ttl_seconds).unwrap_or(i64::MAX),
            leeway: config.clock_skew_seconds,
        })
    }

    /// Issues a token for `subject` valid for the configured ttl.
    ///
    /// # Errors
    /// Returns [`IdentityError::Token`] if signing fails.
    pub fn issue(&self, subject: &str, role: Role) -> Result<String, IdentityError> {
        let iat = chrono::Utc::now().timestamp();
        let claims = Claims {
            sub: subject.to_owned(),
            role,
            iat,
            exp: iat.saturating_add(self.ttl_seconds),
            iss: self.issuer.clone(),
        };
        Ok(encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)?)
    }

    /// Checks signature, issuer and expiry (with the configured clock skew).
    ///
    /// # Errors
    /// Returns [`IdentityError::Token`] for any invalid token.
    pub fn verify(&self, token: &str) -> Result<Claims, IdentityError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[&self.issuer]);
        validation.set_required_spec_claims(&["exp", "sub", "iss"]);
        validation.leeway = self.leeway;

        Ok(decode::<Claims>(token, &self.decoding, &validation)?.claims)
    }
}
