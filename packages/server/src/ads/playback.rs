use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use uuid::Uuid;

/// An ad shown to one user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Playback {
    pub id: Uuid,
    pub user_id: i32,
    pub platform_id: i32,
    pub platform_name: String,
    /// Coins credited when the playback is completed.
    pub coins: i32,
    pub started_at: DateTime<Utc>,
    pub deadline: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackState {
    Playing { remaining_secs: u64 },
    Finished,
}

impl Playback {
    pub fn new(
        user_id: i32,
        platform_id: i32,
        platform_name: String,
        coins: i32,
        started_at: DateTime<Utc>,
        duration: Duration,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            platform_id,
            platform_name,
            coins,
            started_at,
            deadline: started_at + duration,
        }
    }

    pub fn state_at(&self, now: DateTime<Utc>) -> PlaybackState {
        let remaining_ms = (self.deadline - now).num_milliseconds();
        if remaining_ms <= 0 {
            PlaybackState::Finished
        } else {
            PlaybackState::Playing {
                remaining_secs: (remaining_ms as u64).div_ceil(1000),
            }
        }
    }
}

/// In-flight playbacks keyed by id.
#[derive(Debug, Default)]
pub struct PlaybackRegistry {
    entries: DashMap<Uuid, Playback>,
}

impl PlaybackRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, playback: Playback) {
        self.entries.insert(playback.id, playback);
    }

    /// Look up a playback owned by `user_id`.
    pub fn get(&self, id: Uuid, user_id: i32) -> Option<Playback> {
        self.entries
            .get(&id)
            .filter(|entry| entry.user_id == user_id)
            .map(|entry| entry.value().clone())
    }

    /// Remove a finished playback owned by `user_id`. At most one caller wins.
    pub fn take_finished(&self, id: Uuid, user_id: i32, now: DateTime<Utc>) -> Option<Playback> {
        self.entries
            .remove_if(&id, |_, p| {
                p.user_id == user_id && p.state_at(now) == PlaybackState::Finished
            })
            .map(|(_, playback)| playback)
    }

    /// Drop playbacks whose deadline passed more than `ttl` ago.
    pub fn sweep(&self, now: DateTime<Utc>, ttl: Duration) -> usize {
        let before = self.entries.len();
        self.entries.retain(|_, p| p.deadline + ttl > now);
        before - self.entries.len()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
