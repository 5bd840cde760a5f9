use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use sea_orm::DbErr;
use serde::Serialize;

use crate::caption::CaptionError;
use crate::export::ExportError;
use crate::settings::SettingsError;

/// Structured error response returned by all endpoints on failure.
#[derive(Serialize, utoipa::ToSchema)]
pub struct ErrorBody {
    /// Machine-readable error code. One of: `VALIDATION_ERROR`, `TOKEN_MISSING`,
    /// `TOKEN_INVALID`, `INVALID_CREDENTIALS`, `DEVICE_UNKNOWN`, `PERMISSION_DENIED`,
    /// `AD_REQUIRED`, `NOT_FOUND`, `CONFLICT`, `NO_ACTIVE_PLATFORM`, `AD_STILL_PLAYING`,
    /// `CAPTION_MODEL_ERROR`, `INTERNAL_ERROR`.
    #[schema(example = "VALIDATION_ERROR")]
    pub code: &'static str,
    /// Human-readable error description.
    #[schema(example = "Priority must be between 1 and 5")]
    pub message: String,
    /// Ads needed to unlock the caption (only for `AD_REQUIRED`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ads_required: Option<i32>,
    /// Ads already credited toward the gate (only for `AD_REQUIRED`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ads_watched: Option<i32>,
}

impl ErrorBody {
    fn new(code: &'static str, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            ads_required: None,
            ads_watched: None,
        }
    }
}

/// Application-level error type.
#[derive(Debug)]
pub enum AppError {
    Validation(String),
    TokenMissing,
    TokenInvalid,
    InvalidCredentials,
    /// The `X-Device-Token` header names no registered device.
    DeviceUnknown,
    PermissionDenied,
    /// The caption request is gated behind ads the user has not watched yet.
    AdRequired {
        required: i32,
        watched: i32,
    },
    NotFound(String),
    Conflict(String),
    NoActivePlatform,
    /// The ad is still playing. Contains seconds until it may be completed.
    AdStillPlaying {
        retry_after: u64,
    },
    CaptionModel(String),
    Internal(String),
}

impl AppError {
    fn status_and_body(self) -> (StatusCode, ErrorBody) {
        match self {
            AppError::Validation(msg) => {
                (StatusCode::BAD_REQUEST, ErrorBody::new("VALIDATION_ERROR", msg))
            }
            AppError::TokenMissing => (
                StatusCode::UNAUTHORIZED,
                ErrorBody::new("TOKEN_MISSING", "Authentication required"),
            ),
            AppError::TokenInvalid => (
                StatusCode::UNAUTHORIZED,
                ErrorBody::new("TOKEN_INVALID", "Invalid or expired token"),
            ),
            AppError::InvalidCredentials => (
                StatusCode::UNAUTHORIZED,
                ErrorBody::new("INVALID_CREDENTIALS", "Unauthorized access"),
            ),
            AppError::DeviceUnknown => (
                StatusCode::UNAUTHORIZED,
                ErrorBody::new("DEVICE_UNKNOWN", "Unknown or missing device token"),
            ),
            AppError::PermissionDenied => (
                StatusCode::FORBIDDEN,
                ErrorBody::new("PERMISSION_DENIED", "Insufficient permissions"),
            ),
            AppError::AdRequired { required, watched } => (
                StatusCode::FORBIDDEN,
                ErrorBody {
                    ads_required: Some(required),
                    ads_watched: Some(watched),
                    ..ErrorBody::new(
                        "AD_REQUIRED",
                        format!("Watch {required} ad(s) to unlock this caption"),
                    )
                },
            ),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, ErrorBody::new("NOT_FOUND", msg)),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, ErrorBody::new("CONFLICT", msg)),
            AppError::NoActivePlatform => (
                StatusCode::CONFLICT,
                ErrorBody::new("NO_ACTIVE_PLATFORM", "No active ad platforms configured"),
            ),
            AppError::AdStillPlaying { retry_after } => (
                StatusCode::CONFLICT,
                ErrorBody::new(
                    "AD_STILL_PLAYING",
                    format!("Ad completes in {retry_after}s"),
                ),
            ),
            AppError::CaptionModel(detail) => {
                tracing::warn!("Caption model error: {}", detail);
                (
                    StatusCode::BAD_GATEWAY,
                    ErrorBody::new("CAPTION_MODEL_ERROR", "Caption generation failed"),
                )
            }
            AppError::Internal(detail) => {
                tracing::error!("Internal error: {}", detail);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorBody::new("INTERNAL_ERROR", "An unexpected error occurred"),
                )
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let retry_after = if let AppError::AdStillPlaying { retry_after } = &self {
            Some(*retry_after)
        } else {
            None
        };

        let (status, body) = self.status_and_body();

        if let Some(seconds) = retry_after {
            (status, [("Retry-After", seconds.to_string())], Json(body)).into_response()
        } else {
            (status, Json(body)).into_response()
        }
    }
}

impl From<DbErr> for AppError {
    fn from(err: DbErr) -> Self {
        AppError::Internal(err.to_string())
    }
}

impl From<CaptionError> for AppError {
    fn from(err: CaptionError) -> Self {
        match err {
            CaptionError::UnsupportedImage(msg) => AppError::Validation(msg),
            other => AppError::CaptionModel(other.to_string()),
        }
    }
}

impl From<SettingsError> for AppError {
    fn from(err: SettingsError) -> Self {
        match err {
            SettingsError::Invalid(msg) => AppError::Validation(msg),
            other => AppError::Internal(other.to_string()),
        }
    }
}

impl From<ExportError> for AppError {
    fn from(err: ExportError) -> Self {
        match err {
            ExportError::Db(e) => AppError::from(e),
            other => AppError::Internal(other.to_string()),
        }
    }
}
