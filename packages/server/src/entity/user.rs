use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A device standing in for an account.
#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "user")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    /// Device token handed to the client on registration.
    #[sea_orm(unique)]
    pub device_id: String,

    pub created_at: DateTimeUtc,
    pub last_active: Option<DateTimeUtc>,

    pub caption_count: i32,
    pub ad_watched: i32,
    pub coins: i32,

    /// Ads watched since the last gated caption.
    #[sea_orm(default_value = 0)]
    pub ad_credit: i32,

    #[sea_orm(has_many)]
    pub ad_events: HasMany<super::ad_event::Entity>,

    #[sea_orm(has_many)]
    pub captions: HasMany<super::caption::Entity>,
}

impl ActiveModelBehavior for ActiveModel {}
