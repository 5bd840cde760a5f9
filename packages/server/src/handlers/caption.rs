use axum::Json;
use axum::extract::{DefaultBodyLimit, Multipart, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use sea_orm::sea_query::{Expr, ExprTrait};
use sea_orm::*;
use tracing::{info, instrument};

use crate::ads::current_platform;
use crate::caption::{CaptionStyle, decode_image, image_hash};
use crate::config::CreditMode;
use crate::entity::{caption, user};
use crate::error::{AppError, ErrorBody};
use crate::extractors::device::DeviceUser;
use crate::gating;
use crate::models::caption::*;
use crate::models::shared::Pagination;
use crate::state::AppState;

/// Room for multipart framing and the style field on top of the photo itself.
const MULTIPART_OVERHEAD: usize = 64 * 1024;

#[utoipa::path(
    post,
    path = "/captions",
    tag = "Captions",
    operation_id = "generateCaption",
    summary = "Generate a caption for a photo",
    description = "Uploads a JPG or PNG photo as multipart `file` with an optional `style`. Every third caption after the first (caption index 3, 6, 9, ...) requires the current platform's `ads_per_use` ads to have been watched first. The model is called once per request.",
    params(("X-Device-Token" = String, Header, description = "Token from device registration")),
    request_body(content = CaptionUpload, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Caption generated", body = GenerateCaptionResponse),
        (status = 400, description = "Missing or unsupported image (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unknown device (DEVICE_UNKNOWN)", body = ErrorBody),
        (status = 403, description = "Ads must be watched first (AD_REQUIRED)", body = ErrorBody),
        (status = 409, description = "Concurrent caption for the same device (CONFLICT)", body = ErrorBody),
        (status = 502, description = "Caption model failed (CAPTION_MODEL_ERROR)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, device, multipart), fields(user_id = device.0.id, style))]
pub async fn generate_caption(
    device: DeviceUser,
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, AppError> {
    let DeviceUser(user) = device;

    let mut file: Option<Vec<u8>> = None;
    let mut style = CaptionStyle::default();
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Multipart error: {e}")))?
    {
        match field.name() {
            Some("file") => {
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::Validation(format!("Failed to read file: {e}")))?;
                file = Some(data.to_vec());
            }
            Some("style") => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| AppError::Validation(format!("Failed to read style: {e}")))?;
                style = CaptionStyle::parse_or_default(&text);
            }
            _ => {}
        }
    }
    tracing::Span::current().record("style", style.key());

    let bytes = file.ok_or_else(|| AppError::Validation("Missing 'file' field".into()))?;
    if bytes.is_empty() {
        return Err(AppError::Validation("Uploaded file is empty".into()));
    }
    if bytes.len() > state.config.caption.max_upload_bytes {
        return Err(AppError::Validation(format!(
            "Image exceeds {} bytes",
            state.config.caption.max_upload_bytes
        )));
    }

    let mode = state.config.gating.credit_mode;
    let platform = current_platform(&state.db).await?;
    let gate = gating::evaluate(&user, platform.as_ref(), mode);
    if !gate.unlocked {
        return Err(AppError::AdRequired {
            required: gate.ads_required,
            watched: gate.ads_watched,
        });
    }

    let image = decode_image(&bytes)?;
    let hash = image_hash(&bytes);
    let generated = state.captions.generate(&image, style).await?;

    let now = chrono::Utc::now();
    let txn = state.db.begin().await?;

    let mut update = user::Entity::update_many()
        .col_expr(
            user::Column::CaptionCount,
            Expr::col(user::Column::CaptionCount).add(1),
        )
        .col_expr(user::Column::LastActive, Expr::value(now));
    if gate.gated && mode == CreditMode::PerCycle {
        // Spend only this gate's ads; credit earned while the model ran carries over.
        update = update.col_expr(
            user::Column::AdCredit,
            Expr::cust_with_values("MAX(ad_credit - ?, 0)", [gate.ads_required]),
        );
    }
    // Guarded by the count read before the gate check; a parallel caption wins.
    let updated = update
        .filter(user::Column::Id.eq(user.id))
        .filter(user::Column::CaptionCount.eq(user.caption_count))
        .exec(&txn)
        .await?;
    if updated.rows_affected == 0 {
        return Err(AppError::Conflict(
            "Another caption for this device was saved first, please retry".into(),
        ));
    }

    let saved = caption::ActiveModel {
        user_id: Set(user.id),
        image_hash: Set(hash),
        caption: Set(generated.caption),
        hashtags: Set(generated.hashtags),
        style: Set(style.key().to_string()),
        created_at: Set(now),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    let refreshed = user::Entity::find_by_id(user.id)
        .one(&txn)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("User {} not found", user.id)))?;

    txn.commit().await?;

    info!(
        caption_id = saved.id,
        caption_count = refreshed.caption_count,
        gated = gate.gated,
        "Caption generated"
    );

    Ok((
        StatusCode::CREATED,
        Json(GenerateCaptionResponse {
            id: saved.id,
            clipboard: format!("{}\n\n{}", saved.caption, saved.hashtags),
            caption: saved.caption,
            hashtags: saved.hashtags,
            style,
            image_hash: saved.image_hash,
            caption_count: refreshed.caption_count,
            coins: refreshed.coins,
            created_at: saved.created_at,
        }),
    ))
}

#[utoipa::path(
    get,
    path = "/captions",
    tag = "Captions",
    operation_id = "listCaptions",
    summary = "List the device's captions",
    description = "Returns the calling device's caption history, newest first.",
    params(
        ("X-Device-Token" = String, Header, description = "Token from device registration"),
        CaptionListQuery,
    ),
    responses(
        (status = 200, description = "Caption history", body = CaptionListResponse),
        (status = 401, description = "Unknown device (DEVICE_UNKNOWN)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, device, query), fields(user_id = device.0.id))]
pub async fn list_captions(
    device: DeviceUser,
    State(state): State<AppState>,
    Query(query): Query<CaptionListQuery>,
) -> Result<Json<CaptionListResponse>, AppError> {
    let (page, per_page, offset) = query.window()?;

    let select = caption::Entity::find().filter(caption::Column::UserId.eq(device.0.id));

    let total = select
        .clone()
        .paginate(&state.db, per_page)
        .num_items()
        .await?;

    let data = select
        .order_by_desc(caption::Column::CreatedAt)
        .order_by_desc(caption::Column::Id)
        .offset(Some(offset))
        .limit(Some(per_page))
        .all(&state.db)
        .await?
        .into_iter()
        .map(CaptionResponse::from)
        .collect();

    Ok(Json(CaptionListResponse {
        data,
        pagination: Pagination {
            page,
            per_page,
            total,
            total_pages: total.div_ceil(per_page),
        },
    }))
}

pub fn upload_body_limit(max_upload_bytes: usize) -> DefaultBodyLimit {
    DefaultBodyLimit::max(max_upload_bytes + MULTIPART_OVERHEAD)
}
