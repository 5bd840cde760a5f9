use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// One completed ad view. Rows are never updated or deleted.
#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "ad_event")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub user_id: i32,
    #[sea_orm(belongs_to, from = "user_id", to = "id")]
    pub user: HasOne<super::user::Entity>,

    pub platform_id: i32,
    #[sea_orm(belongs_to, from = "platform_id", to = "id")]
    pub platform: HasOne<super::ad_platform::Entity>,

    pub coins_earned: i32,
    pub created_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}
