use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use sea_orm::*;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::ads::current_platform;
use crate::caption::CaptionStyle;
use crate::entity::user;
use crate::error::{AppError, ErrorBody};
use crate::extractors::device::DeviceUser;
use crate::gating;
use crate::models::caption::StyleResponse;
use crate::models::device::{DeviceStatusResponse, RegisterDeviceResponse};
use crate::state::AppState;

#[utoipa::path(
    post,
    path = "/devices",
    tag = "Devices",
    operation_id = "registerDevice",
    summary = "Register a new device",
    description = "Issues a fresh device token with zeroed counters. Send it as `X-Device-Token` on every end-user request.",
    responses(
        (status = 201, description = "Device registered", body = RegisterDeviceResponse),
    ),
)]
#[instrument(skip(state))]
pub async fn register_device(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let now = chrono::Utc::now();
    let new_user = user::ActiveModel {
        device_id: Set(Uuid::new_v4().to_string()),
        created_at: Set(now),
        last_active: Set(Some(now)),
        caption_count: Set(0),
        ad_watched: Set(0),
        coins: Set(0),
        ad_credit: Set(0),
        ..Default::default()
    };
    let user = new_user.insert(&state.db).await?;
    info!(user_id = user.id, "Device registered");

    let platform = current_platform(&state.db).await?;
    let gate = gating::evaluate(&user, platform.as_ref(), state.config.gating.credit_mode);

    Ok((
        StatusCode::CREATED,
        Json(RegisterDeviceResponse {
            device_token: user.device_id.clone(),
            status: DeviceStatusResponse::new(&user, gate),
        }),
    ))
}

#[utoipa::path(
    get,
    path = "/me",
    tag = "Devices",
    operation_id = "getDeviceStatus",
    summary = "Get the calling device's counters",
    description = "Returns coins, caption count, ads watched, the ten-caption progress fraction and the gate status for the next caption.",
    params(("X-Device-Token" = String, Header, description = "Token from device registration")),
    responses(
        (status = 200, description = "Device status", body = DeviceStatusResponse),
        (status = 401, description = "Unknown device (DEVICE_UNKNOWN)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, device), fields(user_id = device.0.id))]
pub async fn me(
    device: DeviceUser,
    State(state): State<AppState>,
) -> Result<Json<DeviceStatusResponse>, AppError> {
    let DeviceUser(user) = device;
    let platform = current_platform(&state.db).await?;
    let gate = gating::evaluate(&user, platform.as_ref(), state.config.gating.credit_mode);
    Ok(Json(DeviceStatusResponse::new(&user, gate)))
}

#[utoipa::path(
    get,
    path = "/styles",
    tag = "Captions",
    operation_id = "listStyles",
    summary = "List caption styles",
    description = "Returns the six caption styles. Unknown style selectors fall back to the default.",
    responses(
        (status = 200, description = "Caption styles", body = Vec<StyleResponse>),
    ),
)]
pub async fn list_styles() -> Json<Vec<StyleResponse>> {
    Json(CaptionStyle::ALL.into_iter().map(StyleResponse::from).collect())
}
