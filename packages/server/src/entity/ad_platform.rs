use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "ad_platform")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub platform_name: String,
    /// Opaque credential; never interpreted by the server.
    pub api_key: String,
    /// Lower is preferred.
    pub priority: i32,
    pub is_active: bool,
    /// Ads a user must watch to pass one caption gate.
    pub ads_per_use: i32,
    /// Coins credited per completed ad.
    pub min_coins: i32,

    #[sea_orm(has_many)]
    pub ad_events: HasMany<super::ad_event::Entity>,

    pub created_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}
