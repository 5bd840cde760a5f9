use axum::{Json, extract::State};
use tracing::{info, instrument};

use crate::error::{AppError, ErrorBody};
use crate::extractors::admin::AdminUser;
use crate::extractors::json::AppJson;
use crate::settings::{self, BusinessSettings};
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/settings",
    tag = "Settings",
    operation_id = "getSettings",
    summary = "Get the business settings",
    description = "Returns the stored monetization settings, or the defaults when none were saved yet.",
    responses(
        (status = 200, description = "Business settings", body = BusinessSettings),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, _admin))]
pub async fn get_settings(
    _admin: AdminUser,
    State(state): State<AppState>,
) -> Result<Json<BusinessSettings>, AppError> {
    let settings = settings::load(&state.config.storage.settings_path()).await?;
    Ok(Json(settings))
}

#[utoipa::path(
    put,
    path = "/settings",
    tag = "Settings",
    operation_id = "updateSettings",
    summary = "Replace the business settings",
    description = "Validates (free tier ads 0-5, premium price 0.99-99.99) and overwrites the stored settings entirely.",
    request_body = BusinessSettings,
    responses(
        (status = 200, description = "Settings saved", body = BusinessSettings),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, _admin, payload))]
pub async fn update_settings(
    _admin: AdminUser,
    State(state): State<AppState>,
    AppJson(payload): AppJson<BusinessSettings>,
) -> Result<Json<BusinessSettings>, AppError> {
    settings::save(&state.config.storage.settings_path(), &payload).await?;
    info!("Business settings saved");
    Ok(Json(payload))
}
