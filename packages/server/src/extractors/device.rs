use axum::{extract::FromRequestParts, http::request::Parts};
use sea_orm::*;

use crate::entity::user;
use crate::error::AppError;
use crate::state::AppState;

/// Header carrying the token issued by device registration.
pub const DEVICE_HEADER: &str = "X-Device-Token";

/// The registered device making the request, loaded fresh from the store.
pub struct DeviceUser(pub user::Model);

impl FromRequestParts<AppState> for DeviceUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(DEVICE_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or(AppError::DeviceUnknown)?;

        let user = user::Entity::find()
            .filter(user::Column::DeviceId.eq(token))
            .one(&state.db)
            .await?
            .ok_or(AppError::DeviceUnknown)?;

        Ok(DeviceUser(user))
    }
}
