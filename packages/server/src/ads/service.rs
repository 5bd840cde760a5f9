use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use sea_orm::sea_query::{Expr, ExprTrait};
use sea_orm::*;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use super::{Playback, PlaybackRegistry, PlaybackState};
use crate::config::AdsConfig;
use crate::entity::{ad_event, ad_platform, user};
use crate::error::AppError;

/// Active platforms, most preferred first.
pub async fn active_platforms<C: ConnectionTrait>(
    db: &C,
) -> Result<Vec<ad_platform::Model>, DbErr> {
    ad_platform::Entity::find()
        .filter(ad_platform::Column::IsActive.eq(true))
        .order_by_asc(ad_platform::Column::Priority)
        .order_by_asc(ad_platform::Column::Id)
        .all(db)
        .await
}

/// The platform that currently decides ad gating and rewards.
pub async fn current_platform<C: ConnectionTrait>(
    db: &C,
) -> Result<Option<ad_platform::Model>, DbErr> {
    ad_platform::Entity::find()
        .filter(ad_platform::Column::IsActive.eq(true))
        .order_by_asc(ad_platform::Column::Priority)
        .order_by_asc(ad_platform::Column::Id)
        .one(db)
        .await
}

/// Outcome of a completed playback.
#[derive(Debug, Clone)]
pub struct Reward {
    pub event: ad_event::Model,
    pub platform_name: String,
}

#[derive(Clone)]
pub struct AdRewardService {
    registry: Arc<PlaybackRegistry>,
    countdown: chrono::Duration,
}

impl AdRewardService {
    pub fn new(config: &AdsConfig) -> Self {
        Self {
            registry: Arc::new(PlaybackRegistry::new()),
            countdown: chrono::Duration::seconds(config.countdown_secs as i64),
        }
    }

    pub fn registry(&self) -> &Arc<PlaybackRegistry> {
        &self.registry
    }

    /// Start showing the current platform's ad to `user_id`. Does not wait for it.
    #[instrument(skip(self, db))]
    pub async fn start(&self, db: &DatabaseConnection, user_id: i32) -> Result<Playback, AppError> {
        let platform = current_platform(db)
            .await?
            .ok_or(AppError::NoActivePlatform)?;

        let playback = Playback::new(
            user_id,
            platform.id,
            platform.platform_name,
            platform.min_coins,
            Utc::now(),
            self.countdown,
        );
        self.registry.insert(playback.clone());

        info!(
            playback_id = %playback.id,
            platform = %playback.platform_name,
            "Ad playback started"
        );
        Ok(playback)
    }

    pub fn poll(&self, user_id: i32, id: Uuid) -> Result<(Playback, PlaybackState), AppError> {
        self.poll_at(user_id, id, Utc::now())
    }

    fn poll_at(
        &self,
        user_id: i32,
        id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<(Playback, PlaybackState), AppError> {
        let playback = self
            .registry
            .get(id, user_id)
            .ok_or_else(|| AppError::NotFound(format!("Ad playback {id} not found")))?;
        let state = playback.state_at(now);
        Ok((playback, state))
    }

    /// Credit a finished playback. Each playback pays out at most once.
    #[instrument(skip(self, db))]
    pub async fn complete(
        &self,
        db: &DatabaseConnection,
        user_id: i32,
        id: Uuid,
    ) -> Result<Reward, AppError> {
        self.complete_at(db, user_id, id, Utc::now()).await
    }

    /// The countdown check and the registry removal see the same instant.
    async fn complete_at(
        &self,
        db: &DatabaseConnection,
        user_id: i32,
        id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<Reward, AppError> {
        let (_, state) = self.poll_at(user_id, id, now)?;
        if let PlaybackState::Playing { remaining_secs } = state {
            return Err(AppError::AdStillPlaying {
                retry_after: remaining_secs,
            });
        }

        let playback = self
            .registry
            .take_finished(id, user_id, now)
            .ok_or_else(|| AppError::NotFound(format!("Ad playback {id} not found")))?;

        match credit_reward(db, &playback).await {
            Ok(event) => {
                info!(
                    playback_id = %playback.id,
                    coins = event.coins_earned,
                    "Ad reward credited"
                );
                Ok(Reward {
                    event,
                    platform_name: playback.platform_name,
                })
            }
            Err(e) => {
                warn!(playback_id = %playback.id, "Ad reward failed, playback kept for retry");
                self.registry.insert(playback);
                Err(e)
            }
        }
    }
}

/// Credit the user and log the ad event in one transaction.
async fn credit_reward(
    db: &DatabaseConnection,
    playback: &Playback,
) -> Result<ad_event::Model, AppError> {
    let txn = db.begin().await?;

    // Increment in SQL so concurrent completions cannot overwrite each other.
    let updated = user::Entity::update_many()
        .col_expr(
            user::Column::Coins,
            Expr::col(user::Column::Coins).add(playback.coins),
        )
        .col_expr(
            user::Column::AdWatched,
            Expr::col(user::Column::AdWatched).add(1),
        )
        .col_expr(
            user::Column::AdCredit,
            Expr::col(user::Column::AdCredit).add(1),
        )
        .filter(user::Column::Id.eq(playback.user_id))
        .exec(&txn)
        .await?;

    if updated.rows_affected == 0 {
        return Err(AppError::NotFound(format!(
            "User {} not found",
            playback.user_id
        )));
    }

    let event = ad_event::ActiveModel {
        user_id: Set(playback.user_id),
        platform_id: Set(playback.platform_id),
        coins_earned: Set(playback.coins),
        created_at: Set(Utc::now()),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    txn.commit().await?;
    Ok(event)
}

/// Periodically drop playbacks that were never completed.
pub async fn run_playback_sweeper(registry: Arc<PlaybackRegistry>, config: AdsConfig) {
    let ttl = chrono::Duration::seconds(config.playback_ttl_secs as i64);
    let period = Duration::from_secs(Ord::max(config.sweep_interval_secs, 1));
    let mut interval = tokio::time::interval(period);

    info!(
        ttl_secs = config.playback_ttl_secs,
        sweep_interval_secs = config.sweep_interval_secs,
        "Starting ad playback sweeper"
    );

    loop {
        interval.tick().await;

        let dropped = registry.sweep(Utc::now(), ttl);
        if dropped > 0 {
            info!(dropped, "Dropped abandoned ad playbacks");
        }
    }
}
