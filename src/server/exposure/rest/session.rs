//! Login and logout

use crate::auth::{ADMIN_ROLE, CurrentUser};
use crate::core::error::{AuthError, RepairResult};
use crate::core::validation::{FieldValidator, ValidJson};
use crate::server::host::AppState;
use axum::extract::State;
use axum::{Extension, Json};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

#[derive(Debug, Default, Deserialize)]
pub struct LoginRequest {
    pub username: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: CurrentUser,
}

pub async fn login(
    State(state): State<AppState>,
    ValidJson(request): ValidJson<LoginRequest>,
) -> RepairResult<Json<LoginResponse>> {
    let mut validator = FieldValidator::new();
    let username = validator.required_text("username", request.username);
    // passwords are compared verbatim, never trimmed
    let password = request.password.filter(|p| !p.is_empty());
    validator.check(password.is_some(), "password", "is required");
    validator.finish()?;

    let (Some(username), Some(password)) = (username, password) else {
        return Err(AuthError::InvalidCredentials.into());
    };

    if !state.admin.verify(&username, &password) {
        tracing::warn!(username = %username, "failed login attempt");
        return Err(AuthError::InvalidCredentials.into());
    }

    let issued = state.tokens.issue(&username, ADMIN_ROLE)?;
    tracing::info!(username = %username, expires_at = issued.expires_at, "login succeeded");

    Ok(Json(LoginResponse {
        token: issued.token,
        user: CurrentUser {
            username,
            role: ADMIN_ROLE.to_string(),
        },
    }))
}

/// Tokens are stateless; the client discards its copy
pub async fn logout(Extension(user): Extension<CurrentUser>) -> Json<Value> {
    tracing::info!(username = %user.username, "logout");
    Json(json!({ "message": "Logged out" }))
}
