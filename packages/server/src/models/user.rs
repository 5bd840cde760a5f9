use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::shared::validate_range;
use crate::entity::user;
use crate::error::AppError;

/// Users returned per listing.
pub const USER_LIST_LIMIT: u64 = 100;

#[derive(Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct UserListQuery {
    /// Substring of the device token.
    pub search: Option<String>,
}

#[derive(Deserialize, utoipa::ToSchema)]
pub struct GrantCoinsRequest {
    #[schema(example = 10)]
    pub coins: i32,
}

pub fn validate_grant(payload: &GrantCoinsRequest) -> Result<(), AppError> {
    validate_range(payload.coins, 1..=100, "Coins")
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct UserResponse {
    pub id: i32,
    pub device_id: String,
    pub created_at: DateTime<Utc>,
    pub last_active: Option<DateTime<Utc>>,
    pub caption_count: i32,
    pub ad_watched: i32,
    pub coins: i32,
}

impl From<user::Model> for UserResponse {
    fn from(m: user::Model) -> Self {
        Self {
            id: m.id,
            device_id: m.device_id,
            created_at: m.created_at,
            last_active: m.last_active,
            caption_count: m.caption_count,
            ad_watched: m.ad_watched,
            coins: m.coins,
        }
    }
}
