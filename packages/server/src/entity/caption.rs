use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A generated caption. Rows are never updated or deleted.
#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "caption")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub user_id: i32,
    #[sea_orm(belongs_to, from = "user_id", to = "id")]
    pub user: HasOne<super::user::Entity>,

    /// SHA-256 of the uploaded image bytes, hex encoded.
    pub image_hash: String,
    pub caption: String,
    pub hashtags: String,
    pub style: String,

    pub created_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}
