use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::ads::{Playback, PlaybackState};
use crate::gating::GateStatus;

#[derive(Serialize, utoipa::ToSchema, Clone, Copy, PartialEq, Eq, Debug)]
#[serde(rename_all = "snake_case")]
pub enum PlaybackStateName {
    Playing,
    Finished,
}

/// A simulated ad in progress.
#[derive(Serialize, utoipa::ToSchema)]
pub struct PlaybackResponse {
    pub id: Uuid,
    #[schema(example = "Unity Ads")]
    pub platform: String,
    /// Coins credited on completion.
    #[schema(example = 3)]
    pub coins: i32,
    pub state: PlaybackStateName,
    /// Seconds until the ad may be completed.
    #[schema(example = 5)]
    pub remaining_secs: u64,
    pub started_at: DateTime<Utc>,
    pub deadline: DateTime<Utc>,
}

impl PlaybackResponse {
    pub fn new(playback: Playback, state: PlaybackState) -> Self {
        let (state, remaining_secs) = match state {
            PlaybackState::Playing { remaining_secs } => {
                (PlaybackStateName::Playing, remaining_secs)
            }
            PlaybackState::Finished => (PlaybackStateName::Finished, 0),
        };
        Self {
            id: playback.id,
            platform: playback.platform_name,
            coins: playback.coins,
            state,
            remaining_secs,
            started_at: playback.started_at,
            deadline: playback.deadline,
        }
    }
}

/// Reward credited for a completed ad.
#[derive(Serialize, utoipa::ToSchema)]
pub struct RewardResponse {
    #[schema(example = "Earned 3 coins!")]
    pub message: String,
    pub event_id: i32,
    #[schema(example = "Unity Ads")]
    pub platform: String,
    #[schema(example = 3)]
    pub coins_earned: i32,
    /// Coin balance after the reward.
    #[schema(example = 9)]
    pub coins: i32,
    #[schema(example = 3)]
    pub ads_watched: i32,
    pub gate: GateStatus,
}
