use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::shared::Pagination;
use crate::caption::CaptionStyle;
use crate::entity::caption;
use crate::error::AppError;

/// Multipart form accepted by caption generation (documentation only).
#[derive(utoipa::ToSchema)]
#[allow(dead_code)]
pub struct CaptionUpload {
    /// JPG or PNG photo.
    #[schema(format = Binary)]
    pub file: String,
    /// Style key or label; unknown values fall back to `smart`.
    #[schema(example = "funny")]
    pub style: Option<String>,
}

/// A freshly generated caption.
#[derive(Serialize, utoipa::ToSchema)]
pub struct GenerateCaptionResponse {
    #[schema(example = 7)]
    pub id: i32,
    #[schema(example = "LOL when I dog running on the beach 😂")]
    pub caption: String,
    #[schema(example = "#running #beach #InstaAI #SocialMedia")]
    pub hashtags: String,
    pub style: CaptionStyle,
    /// SHA-256 of the uploaded file.
    pub image_hash: String,
    /// Caption and hashtags joined for copying.
    pub clipboard: String,
    /// The device's caption count after this caption.
    #[schema(example = 4)]
    pub caption_count: i32,
    pub coins: i32,
    pub created_at: DateTime<Utc>,
}

/// A caption from the device's history.
#[derive(Serialize, utoipa::ToSchema)]
pub struct CaptionResponse {
    pub id: i32,
    pub caption: String,
    pub hashtags: String,
    #[schema(example = "smart")]
    pub style: String,
    pub image_hash: String,
    pub created_at: DateTime<Utc>,
}

impl From<caption::Model> for CaptionResponse {
    fn from(m: caption::Model) -> Self {
        Self {
            id: m.id,
            caption: m.caption,
            hashtags: m.hashtags,
            style: m.style,
            image_hash: m.image_hash,
            created_at: m.created_at,
        }
    }
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct CaptionListResponse {
    pub data: Vec<CaptionResponse>,
    pub pagination: Pagination,
}

#[derive(Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct CaptionListQuery {
    /// Page number (1-based). Default: 1.
    pub page: Option<u64>,
    /// Items per page (1-100). Default: 20.
    pub per_page: Option<u64>,
}

impl CaptionListQuery {
    /// Resolve `(page, per_page, offset)`, rejecting pages past the end of the row space.
    pub fn window(&self) -> Result<(u64, u64, u64), AppError> {
        let page = Ord::max(self.page.unwrap_or(1), 1);
        let per_page = self.per_page.unwrap_or(20).clamp(1, 100);
        let offset = (page - 1)
            .checked_mul(per_page)
            .filter(|offset| i64::try_from(*offset).is_ok())
            .ok_or_else(|| AppError::Validation(format!("Page {page} is out of range")))?;
        Ok((page, per_page, offset))
    }
}

/// A selectable caption style.
#[derive(Serialize, utoipa::ToSchema)]
pub struct StyleResponse {
    pub style: CaptionStyle,
    #[schema(example = "😂 Funny")]
    pub label: &'static str,
    /// Whether this style is used for unknown selectors.
    pub is_default: bool,
}

impl From<CaptionStyle> for StyleResponse {
    fn from(style: CaptionStyle) -> Self {
        Self {
            style,
            label: style.label(),
            is_default: style == CaptionStyle::default(),
        }
    }
}
