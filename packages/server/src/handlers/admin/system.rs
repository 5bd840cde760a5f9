use axum::body::Body;
use axum::extract::State;
use axum::http::header;
use axum::response::{IntoResponse, Response};
use tokio_util::io::ReaderStream;
use tracing::instrument;

use crate::error::{AppError, ErrorBody};
use crate::export::{self, Published};
use crate::extractors::admin::AdminUser;
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/export",
    tag = "System",
    operation_id = "exportUserData",
    summary = "Export user data",
    description = "Writes `user_data_export.zip` (`users.csv` and `captions.csv`) to the data directory and downloads it.",
    responses(
        (status = 200, description = "Zip archive", content_type = "application/zip"),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, _admin))]
pub async fn export_data(
    _admin: AdminUser,
    State(state): State<AppState>,
) -> Result<Response, AppError> {
    let published = export::export_user_data(&state.db, &state.config.storage.exports_dir()).await?;
    Ok(download(published, "application/zip", export::EXPORT_FILE))
}

#[utoipa::path(
    get,
    path = "/backup",
    tag = "System",
    operation_id = "backupDatabase",
    summary = "Back up the database",
    description = "Writes `backup.sql` (table definitions followed by every row as INSERT statements, in one transaction) to the data directory and downloads it.",
    responses(
        (status = 200, description = "SQL dump", content_type = "application/sql"),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, _admin))]
pub async fn backup_database(
    _admin: AdminUser,
    State(state): State<AppState>,
) -> Result<Response, AppError> {
    let published = export::backup_database(&state.db, &state.config.storage.exports_dir()).await?;
    Ok(download(published, "application/sql", export::BACKUP_FILE))
}

fn download(published: Published, content_type: &str, filename: &str) -> Response {
    let body = Body::from_stream(ReaderStream::new(published.file));

    (
        [
            (header::CONTENT_TYPE, content_type.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{filename}\""),
            ),
        ],
        body,
    )
        .into_response()
}
