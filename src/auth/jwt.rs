//! JWT token service
//!
//! HS256 tokens with `{sub, role, iat, exp, iss}` claims. Expiry is checked
//! without leeway.

use crate::core::error::{AuthError, RepairError};
use chrono::{Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use rand::Rng;
use rand::distributions::Alphanumeric;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Minimum accepted length of a configured signing secret, in bytes
pub const MIN_SECRET_LEN: usize = 32;

#[derive(Debug, Clone)]
pub struct TokenConfig {
    pub secret: String,
    pub ttl: Duration,
    pub issuer: String,
}

impl TokenConfig {
    pub fn new(secret: impl Into<String>, ttl_hours: i64, issuer: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            ttl: Duration::hours(ttl_hours),
            issuer: issuer.into(),
        }
    }
}

/// Claims stored in the token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Username
    pub sub: String,
    pub role: String,
    pub iat: i64,
    pub exp: i64,
    pub iss: String,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum JwtError {
    #[error("invalid token: {0}")]
    InvalidToken(String),

    #[error("token expired")]
    ExpiredToken,

    #[error("token generation failed: {0}")]
    GenerationFailed(String),
}

impl From<JwtError> for RepairError {
    fn from(err: JwtError) -> Self {
        match err {
            JwtError::ExpiredToken => RepairError::Auth(AuthError::ExpiredToken),
            JwtError::InvalidToken(_) => RepairError::Auth(AuthError::InvalidToken),
            JwtError::GenerationFailed(msg) => RepairError::Internal(msg),
        }
    }
}

/// A freshly signed token and its expiry timestamp
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub expires_at: i64,
}

/// Random printable signing secret, used when none is configured
pub fn generate_secret() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(64)
        .map(char::from)
        .collect()
}

#[derive(Clone)]
pub struct TokenService {
    config: TokenConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl TokenService {
    pub fn new(config: TokenConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());

        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_issuer(&[config.issuer.as_str()]);
        validation.set_required_spec_claims(&["exp", "iss", "sub"]);

        Self {
            config,
            encoding_key,
            decoding_key,
            validation,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.config.ttl
    }

    /// Issue a token for `username` with the configured lifetime
    pub fn issue(&self, username: &str, role: &str) -> Result<IssuedToken, JwtError> {
        self.issue_with_ttl(username, role, self.config.ttl)
    }

    /// Issue a token with an explicit lifetime (negative values yield an
    /// already-expired token)
    pub fn issue_with_ttl(
        &self,
        username: &str,
        role: &str,
        ttl: Duration,
    ) -> Result<IssuedToken, JwtError> {
        let now = Utc::now();
        let claims = Claims {
            sub: username.to_string(),
            role: role.to_string(),
            iat: now.timestamp(),
            exp: (now + ttl).timestamp(),
            iss: self.config.issuer.clone(),
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| JwtError::GenerationFailed(e.to_string()))?;

        Ok(IssuedToken {
            token,
            expires_at: claims.exp,
        })
    }

    pub fn verify(&self, token: &str) -> Result<Claims, JwtError> {
        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => JwtError::ExpiredToken,
                _ => JwtError::InvalidToken(e.to_string()),
            })
    }

    /// Token part of an `Authorization: Bearer <token>` header value
    pub fn extract_from_header(header: &str) -> Option<&str> {
        let (scheme, token) = header.split_once(' ')?;
        let token = token.trim();
        (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
    }
}
