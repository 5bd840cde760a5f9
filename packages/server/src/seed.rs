use sea_orm::sea_query::Index;
use sea_orm::*;
use tracing::{info, warn};

use crate::entity::{ad_event, ad_platform, caption};

/// Ensure required database indexes exist.
///
/// Schema sync creates tables and unique constraints only, so the lookup
/// indexes are created here on startup.
pub async fn ensure_indexes(db: &DatabaseConnection) -> Result<(), DbErr> {
    let backend = db.get_database_backend();

    // Current platform lookup: WHERE is_active = 1 ORDER BY priority
    let platform_idx = Index::create()
        .if_not_exists()
        .name("idx_ad_platform_active_priority")
        .table(ad_platform::Entity)
        .col(ad_platform::Column::IsActive)
        .col(ad_platform::Column::Priority)
        .to_owned();

    let event_idx = Index::create()
        .if_not_exists()
        .name("idx_ad_event_user")
        .table(ad_event::Entity)
        .col(ad_event::Column::UserId)
        .to_owned();

    // Caption history: WHERE user_id = ? ORDER BY created_at DESC
    let caption_idx = Index::create()
        .if_not_exists()
        .name("idx_caption_user_created")
        .table(caption::Entity)
        .col(caption::Column::UserId)
        .col(caption::Column::CreatedAt)
        .to_owned();

    for (name, stmt) in [
        ("idx_ad_platform_active_priority", platform_idx),
        ("idx_ad_event_user", event_idx),
        ("idx_caption_user_created", caption_idx),
    ] {
        let sql = backend.build(&stmt).to_string();
        match db.execute_unprepared(&sql).await {
            Ok(_) => info!("Ensured index {} exists", name),
            Err(e) => warn!("Failed to create index {}: {}", name, e),
        }
    }

    Ok(())
}

/// Insert a default ad platform if none is configured yet.
pub async fn seed_default_platform(db: &DatabaseConnection) -> Result<(), DbErr> {
    let existing = ad_platform::Entity::find().count(db).await?;
    if existing > 0 {
        return Ok(());
    }

    let platform = ad_platform::ActiveModel {
        platform_name: Set("start.io".into()),
        api_key: Set(String::new()),
        priority: Set(1),
        is_active: Set(true),
        ads_per_use: Set(1),
        min_coins: Set(3),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    }
    .insert(db)
    .await?;

    info!(platform_id = platform.id, "Seeded default ad platform");
    Ok(())
}
