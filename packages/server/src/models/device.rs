use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::entity::user;
use crate::gating::GateStatus;

/// Captions per progress bar cycle.
const PROGRESS_CYCLE: i32 = 10;

/// Response to device registration. The token must be stored by the client.
#[derive(Serialize, utoipa::ToSchema)]
pub struct RegisterDeviceResponse {
    /// Send as `X-Device-Token` on every end-user request.
    #[schema(example = "1f0c7a4e-3b8e-4f55-9a0a-5d2f4c1b9e77")]
    pub device_token: String,
    pub status: DeviceStatusResponse,
}

/// A device's counters and its next caption gate.
#[derive(Serialize, utoipa::ToSchema)]
pub struct DeviceStatusResponse {
    #[schema(example = 42)]
    pub id: i32,
    #[schema(example = 6)]
    pub coins: i32,
    #[schema(example = 3)]
    pub caption_count: i32,
    #[schema(example = 2)]
    pub ads_watched: i32,
    /// Fraction of the current ten-caption cycle completed.
    #[schema(example = 0.3)]
    pub progress: f64,
    pub gate: GateStatus,
    pub created_at: DateTime<Utc>,
    pub last_active: Option<DateTime<Utc>>,
}

impl DeviceStatusResponse {
    pub fn new(user: &user::Model, gate: GateStatus) -> Self {
        Self {
            id: user.id,
            coins: user.coins,
            caption_count: user.caption_count,
            ads_watched: user.ad_watched,
            progress: progress(user.caption_count),
            gate,
            created_at: user.created_at,
            last_active: user.last_active,
        }
    }
}

fn progress(caption_count: i32) -> f64 {
    f64::from(caption_count.rem_euclid(PROGRESS_CYCLE)) / f64::from(PROGRESS_CYCLE)
}
