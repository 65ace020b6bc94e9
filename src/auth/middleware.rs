//! Bearer-token guard for protected routes

use super::{CurrentUser, JwtError, TokenService};
use crate::core::error::{AuthError, RepairError};
use crate::server::host::AppState;
use axum::extract::{Request, State};
use axum::http::{Method, header};
use axum::middleware::Next;
use axum::response::Response;

/// Require `Authorization: Bearer <token>`
///
/// On success the [`CurrentUser`] is inserted into the request extensions.
/// CORS preflight requests pass through untouched.
///
/// | failure | response |
/// |---------|----------|
/// | no header / not a bearer header | 401 |
/// | bad signature, issuer or shape | 401 |
/// | expired | 401 |
pub async fn require_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, RepairError> {
    if req.method() == Method::OPTIONS {
        return Ok(next.run(req).await);
    }

    let token = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(TokenService::extract_from_header);

    let Some(token) = token else {
        tracing::warn!(uri = %req.uri(), "request without bearer token");
        return Err(AuthError::MissingToken.into());
    };

    match state.tokens.verify(token) {
        Ok(claims) => {
            req.extensions_mut().insert(CurrentUser::from(claims));
            Ok(next.run(req).await)
        }
        Err(e) => {
            tracing::warn!(uri = %req.uri(), error = %e, "token rejected");
            Err(match e {
                JwtError::ExpiredToken => AuthError::ExpiredToken.into(),
                _ => AuthError::InvalidToken.into(),
            })
        }
    }
}
