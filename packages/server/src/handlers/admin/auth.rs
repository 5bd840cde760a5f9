use axum::{Json, extract::State};
use tracing::{instrument, warn};

use crate::error::{AppError, ErrorBody};
use crate::extractors::json::AppJson;
use crate::models::admin::{AdminLoginRequest, AdminLoginResponse};
use crate::state::AppState;
use crate::utils::{jwt, secret};

#[utoipa::path(
    post,
    path = "/login",
    tag = "Admin",
    operation_id = "adminLogin",
    summary = "Log in to the admin dashboard",
    description = "Exchanges the shared admin password for a bearer token used by every other admin route.",
    request_body = AdminLoginRequest,
    responses(
        (status = 200, description = "Login successful", body = AdminLoginResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Wrong password (INVALID_CREDENTIALS)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    AppJson(payload): AppJson<AdminLoginRequest>,
) -> Result<Json<AdminLoginResponse>, AppError> {
    if !secret::password_matches(&payload.password, &state.config.admin.password) {
        warn!("Rejected admin login");
        return Err(AppError::InvalidCredentials);
    }

    let (token, expires_at) = jwt::sign(
        &state.config.auth.jwt_secret,
        state.config.auth.token_ttl_hours,
    )
    .map_err(|e| AppError::Internal(format!("JWT sign error: {}", e)))?;

    Ok(Json(AdminLoginResponse { token, expires_at }))
}
