use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use sea_orm::sea_query::Expr;
use sea_orm::*;
use tracing::{info, instrument};

use crate::ads::catalog::{self, CatalogEntry};
use crate::entity::ad_platform;
use crate::error::{AppError, ErrorBody};
use crate::extractors::admin::AdminUser;
use crate::extractors::json::AppJson;
use crate::models::platform::*;
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/platforms/catalog",
    tag = "Ad Platforms",
    operation_id = "listPlatformCatalog",
    summary = "List configurable ad networks",
    description = "Returns the known ad networks with their ad format and per-ad revenue rate.",
    responses(
        (status = 200, description = "Platform catalog", body = Vec<CatalogEntry>),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
pub async fn list_catalog(_admin: AdminUser) -> Json<&'static [CatalogEntry]> {
    Json(catalog::CATALOG)
}

#[utoipa::path(
    get,
    path = "/platforms",
    tag = "Ad Platforms",
    operation_id = "listPlatforms",
    summary = "List ad platform configurations",
    description = "Returns every configuration, most preferred (lowest priority number) first. API keys are masked.",
    responses(
        (status = 200, description = "Platform configurations", body = Vec<PlatformResponse>),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, _admin))]
pub async fn list_platforms(
    _admin: AdminUser,
    State(state): State<AppState>,
) -> Result<Json<Vec<PlatformResponse>>, AppError> {
    let platforms = ad_platform::Entity::find()
        .order_by_asc(ad_platform::Column::Priority)
        .order_by_asc(ad_platform::Column::Id)
        .all(&state.db)
        .await?;
    Ok(Json(
        platforms.into_iter().map(PlatformResponse::from).collect(),
    ))
}

#[utoipa::path(
    post,
    path = "/platforms",
    tag = "Ad Platforms",
    operation_id = "createPlatform",
    summary = "Add an ad platform configuration",
    description = "The platform name must come from the catalog. Priority 1-5 (1 is highest), ads per use 0-5, coins per ad 1-10.",
    request_body = CreatePlatformRequest,
    responses(
        (status = 201, description = "Platform created", body = PlatformResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, _admin, payload), fields(platform = %payload.platform_name))]
pub async fn create_platform(
    _admin: AdminUser,
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreatePlatformRequest>,
) -> Result<impl IntoResponse, AppError> {
    validate_create_platform(&payload)?;

    let model = ad_platform::ActiveModel {
        platform_name: Set(payload.platform_name),
        api_key: Set(payload.api_key),
        priority: Set(payload.priority),
        is_active: Set(payload.is_active),
        ads_per_use: Set(payload.ads_per_use),
        min_coins: Set(payload.min_coins),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    }
    .insert(&state.db)
    .await?;

    info!(platform_id = model.id, "Ad platform added");
    Ok((StatusCode::CREATED, Json(PlatformResponse::from(model))))
}

#[utoipa::path(
    put,
    path = "/platforms",
    tag = "Ad Platforms",
    operation_id = "bulkUpdatePlatforms",
    summary = "Save edits to several platforms",
    description = "Applies priority, active flag, ads per use and coins per ad to each listed platform in one transaction. Any unknown ID rolls back the whole edit.",
    request_body = BulkUpdatePlatformsRequest,
    responses(
        (status = 200, description = "Updated configurations", body = Vec<PlatformResponse>),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "Unknown platform ID (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, _admin, payload), fields(count = payload.platforms.len()))]
pub async fn bulk_update_platforms(
    _admin: AdminUser,
    State(state): State<AppState>,
    AppJson(payload): AppJson<BulkUpdatePlatformsRequest>,
) -> Result<Json<Vec<PlatformResponse>>, AppError> {
    validate_bulk_update(&payload)?;

    let txn = state.db.begin().await?;
    for edit in &payload.platforms {
        let result = ad_platform::Entity::update_many()
            .col_expr(ad_platform::Column::Priority, Expr::value(edit.priority))
            .col_expr(ad_platform::Column::IsActive, Expr::value(edit.is_active))
            .col_expr(ad_platform::Column::AdsPerUse, Expr::value(edit.ads_per_use))
            .col_expr(ad_platform::Column::MinCoins, Expr::value(edit.min_coins))
            .filter(ad_platform::Column::Id.eq(edit.id))
            .exec(&txn)
            .await?;
        if result.rows_affected == 0 {
            return Err(AppError::NotFound(format!(
                "Ad platform {} not found",
                edit.id
            )));
        }
    }

    let platforms = ad_platform::Entity::find()
        .order_by_asc(ad_platform::Column::Priority)
        .order_by_asc(ad_platform::Column::Id)
        .all(&txn)
        .await?;
    txn.commit().await?;

    info!("Ad platform settings saved");
    Ok(Json(
        platforms.into_iter().map(PlatformResponse::from).collect(),
    ))
}
