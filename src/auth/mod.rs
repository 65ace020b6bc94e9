//! Authentication for the single shop administrator
//!
//! - [`credentials`]: checking the configured admin username and password
//! - [`jwt`]: issuing and verifying bearer tokens
//! - [`middleware`]: the axum layer guarding protected routes
//! - [`rate_limit`]: per-address throttling of login attempts

pub mod credentials;
pub mod jwt;
pub mod middleware;
pub mod rate_limit;

pub use credentials::{AdminAccount, PasswordCheck, hash_password};
pub use jwt::{Claims, IssuedToken, JwtError, TokenConfig, TokenService};
pub use middleware::require_auth;
pub use rate_limit::LoginRateLimiter;

use serde::{Deserialize, Serialize};

/// Role carried by every token; there is no finer-grained authorization
pub const ADMIN_ROLE: &str = "admin";

/// Authenticated caller, inserted into request extensions by [`require_auth`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentUser {
    pub username: String,
    pub role: String,
}

impl CurrentUser {
    pub fn is_admin(&self) -> bool {
        self.role == ADMIN_ROLE
    }
}

impl From<Claims> for CurrentUser {
    fn from(claims: Claims) -> Self {
        Self {
            username: claims.sub,
            role: claims.role,
        }
    }
}
