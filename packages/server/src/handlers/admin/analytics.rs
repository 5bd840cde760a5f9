use std::collections::{BTreeMap, HashMap};

use axum::{Json, extract::State};
use chrono::{Duration, Utc};
use sea_orm::sea_query::Expr;
use sea_orm::*;
use tracing::instrument;

use crate::ads::catalog;
use crate::entity::{ad_event, ad_platform, caption, user};
use crate::error::{AppError, ErrorBody};
use crate::extractors::admin::AdminUser;
use crate::models::admin::{AnalyticsResponse, DailyUsers, PlatformRevenue};
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/analytics",
    tag = "Admin",
    operation_id = "getAnalytics",
    summary = "Get dashboard analytics",
    description = "Totals for users, users active in the last 24 hours, ads watched and captions, plus new users per day and ad views per platform with revenue projected from the catalog rates.",
    responses(
        (status = 200, description = "Analytics", body = AnalyticsResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, _admin))]
pub async fn analytics(
    _admin: AdminUser,
    State(state): State<AppState>,
) -> Result<Json<AnalyticsResponse>, AppError> {
    let db = &state.db;

    let total_users = user::Entity::find().count(db).await?;
    let active_today = user::Entity::find()
        .filter(user::Column::LastActive.gt(Utc::now() - Duration::days(1)))
        .count(db)
        .await?;
    let total_captions = caption::Entity::find().count(db).await?;

    let total_ads_watched = user::Entity::find()
        .select_only()
        .column_as(user::Column::AdWatched.sum(), "total")
        .into_tuple::<Option<i64>>()
        .one(db)
        .await?
        .flatten()
        .unwrap_or(0);

    let joined_per_day = user::Entity::find()
        .select_only()
        .column_as(Expr::cust("DATE(created_at)"), "day")
        .column_as(user::Column::Id.count(), "new_users")
        .group_by(Expr::cust("DATE(created_at)"))
        .order_by_asc(Expr::cust("DATE(created_at)"))
        .into_tuple::<(Option<String>, i64)>()
        .all(db)
        .await?;

    let ad_counts = ad_event::Entity::find()
        .select_only()
        .column(ad_event::Column::PlatformId)
        .column_as(ad_event::Column::Id.count(), "ad_count")
        .group_by(ad_event::Column::PlatformId)
        .into_tuple::<(i32, i64)>()
        .all(db)
        .await?;
    let names: HashMap<i32, String> = ad_platform::Entity::find()
        .all(db)
        .await?
        .into_iter()
        .map(|p| (p.id, p.platform_name))
        .collect();

    Ok(Json(AnalyticsResponse {
        total_users,
        active_today,
        total_ads_watched,
        total_captions,
        user_growth: user_growth(joined_per_day),
        ad_revenue: ad_revenue(&ad_counts, &names),
    }))
}

/// New users per calendar day (UTC), oldest first. Rows SQLite could not date are skipped.
fn user_growth(rows: Vec<(Option<String>, i64)>) -> Vec<DailyUsers> {
    rows.into_iter()
        .filter_map(|(day, count)| {
            Some(DailyUsers {
                date: day?,
                new_users: u64::try_from(count).ok()?,
            })
        })
        .collect()
}

/// Ad views per platform name, with revenue at the catalog rate.
fn ad_revenue(counts: &[(i32, i64)], names: &HashMap<i32, String>) -> Vec<PlatformRevenue> {
    let mut by_name: BTreeMap<&str, i64> = BTreeMap::new();
    for (platform_id, count) in counts {
        if let Some(name) = names.get(platform_id) {
            *by_name.entry(name.as_str()).or_default() += count;
        }
    }
    by_name
        .into_iter()
        .map(|(name, ad_count)| PlatformRevenue {
            platform_name: name.to_string(),
            ad_count,
            revenue: catalog::projected_revenue(name, ad_count),
        })
        .collect()
}
