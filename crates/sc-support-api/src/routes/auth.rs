//! Login and registration. Passwords are compared verbatim (demo only).

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use serde::{Deserialize, Serialize};

use sc_protocol::{NewUser, PublicUser};

use super::identity::invalid_body;
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Body returned by both login and registration.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub user: PublicUser,
}

fn validate_credentials(email: &str, password: &str) -> ApiResult<()> {
    let email = email.trim();
    let valid_email = email
        .split_once('@')
        .is_some_and(|(local, domain)| !local.is_empty() && domain.contains('.'));
    if !valid_email {
        return Err(ApiError::BadRequest(format!("invalid email '{email}'")));
    }
    if password.is_empty() {
        return Err(ApiError::BadRequest("password must not be empty".into()));
    }
    Ok(())
}

/// POST /api/auth/login: check email and password.
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> ApiResult<Json<AuthResponse>> {
    let Json(req) = payload.map_err(invalid_body)?;
    validate_credentials(&req.email, &req.password)?;

    let user = state
        .store
        .get_user_by_email(req.email.trim())
        .await?
        .filter(|u| u.password == req.password)
        .ok_or_else(|| ApiError::Unauthorized("invalid credentials".into()))?;

    tracing::info!(user_id = %user.id, "user logged in");
    Ok(Json(AuthResponse {
        user: user.public(),
    }))
}

/// POST /api/auth/register: create a customer (or admin) account.
pub async fn register(
    State(state): State<AppState>,
    payload: Result<Json<NewUser>, JsonRejection>,
) -> ApiResult<Json<AuthResponse>> {
    let Json(mut new) = payload.map_err(invalid_body)?;
    validate_credentials(&new.email, &new.password)?;
    new.email = new.email.trim().to_string();

    let user = state.store.create_user(new).await?;

    tracing::info!(user_id = %user.id, role = user.role.as_str(), "user registered");
    Ok(Json(AuthResponse {
        user: user.public(),
    }))
}
