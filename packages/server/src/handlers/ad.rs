use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use chrono::Utc;
use sea_orm::*;
use tracing::instrument;
use uuid::Uuid;

use crate::ads::current_platform;
use crate::entity::user;
use crate::error::{AppError, ErrorBody};
use crate::extractors::device::DeviceUser;
use crate::gating;
use crate::models::ad::{PlaybackResponse, RewardResponse};
use crate::state::AppState;

#[utoipa::path(
    post,
    path = "/ads",
    tag = "Ads",
    operation_id = "startAd",
    summary = "Start a simulated ad",
    description = "Starts the current platform's ad (lowest priority number among active platforms). Returns immediately; the ad can be completed once `deadline` has passed.",
    params(("X-Device-Token" = String, Header, description = "Token from device registration")),
    responses(
        (status = 201, description = "Ad playback started", body = PlaybackResponse),
        (status = 401, description = "Unknown device (DEVICE_UNKNOWN)", body = ErrorBody),
        (status = 409, description = "No platform is active (NO_ACTIVE_PLATFORM)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, device), fields(user_id = device.0.id))]
pub async fn start_ad(
    device: DeviceUser,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let playback = state.ads.start(&state.db, device.0.id).await?;
    let playback_state = playback.state_at(Utc::now());
    Ok((
        StatusCode::CREATED,
        Json(PlaybackResponse::new(playback, playback_state)),
    ))
}

#[utoipa::path(
    get,
    path = "/ads/{id}",
    tag = "Ads",
    operation_id = "getAd",
    summary = "Get an ad playback's countdown",
    params(
        ("id" = Uuid, Path, description = "Playback ID"),
        ("X-Device-Token" = String, Header, description = "Token from device registration"),
    ),
    responses(
        (status = 200, description = "Playback state", body = PlaybackResponse),
        (status = 401, description = "Unknown device (DEVICE_UNKNOWN)", body = ErrorBody),
        (status = 404, description = "Playback not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, device), fields(user_id = device.0.id))]
pub async fn get_ad(
    device: DeviceUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<PlaybackResponse>, AppError> {
    let (playback, playback_state) = state.ads.poll(device.0.id, id)?;
    Ok(Json(PlaybackResponse::new(playback, playback_state)))
}

#[utoipa::path(
    post,
    path = "/ads/{id}/complete",
    tag = "Ads",
    operation_id = "completeAd",
    summary = "Collect the reward for a finished ad",
    description = "Credits the platform's `min_coins` and one watched ad, and records the ad event, in one transaction. A playback pays out at most once.",
    params(
        ("id" = Uuid, Path, description = "Playback ID"),
        ("X-Device-Token" = String, Header, description = "Token from device registration"),
    ),
    responses(
        (status = 200, description = "Reward credited", body = RewardResponse),
        (status = 401, description = "Unknown device (DEVICE_UNKNOWN)", body = ErrorBody),
        (status = 404, description = "Playback not found or already completed (NOT_FOUND)", body = ErrorBody),
        (status = 409, description = "Ad still playing (AD_STILL_PLAYING); see `Retry-After`", body = ErrorBody),
    ),
)]
#[instrument(skip(state, device), fields(user_id = device.0.id))]
pub async fn complete_ad(
    device: DeviceUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<RewardResponse>, AppError> {
    let user_id = device.0.id;
    let reward = state.ads.complete(&state.db, user_id, id).await?;

    let user = user::Entity::find_by_id(user_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("User {user_id} not found")))?;
    let platform = current_platform(&state.db).await?;
    let gate = gating::evaluate(&user, platform.as_ref(), state.config.gating.credit_mode);

    Ok(Json(RewardResponse {
        message: format!("Earned {} coins!", reward.event.coins_earned),
        event_id: reward.event.id,
        platform: reward.platform_name,
        coins_earned: reward.event.coins_earned,
        coins: user.coins,
        ads_watched: user.ad_watched,
        gate,
    }))
}
