//! Shared application state
//!
//! `AppState` holds everything a request handler needs. It is cheap to clone:
//! every field is reference-counted.

use crate::auth::{AdminAccount, LoginRateLimiter, TokenService};
use crate::core::service::OrderService;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    /// Order lifecycle and lookups
    pub service: OrderService,

    /// Issues and verifies bearer tokens
    pub tokens: Arc<TokenService>,

    /// The configured shop administrator
    pub admin: Arc<AdminAccount>,

    /// Per-address throttle on `POST /login`
    pub login_limiter: LoginRateLimiter,
}

impl AppState {
    pub fn new(
        service: OrderService,
        tokens: TokenService,
        admin: AdminAccount,
        login_limiter: LoginRateLimiter,
    ) -> Self {
        Self {
            service,
            tokens: Arc::new(tokens),
            admin: Arc::new(admin),
            login_limiter,
        }
    }
}
