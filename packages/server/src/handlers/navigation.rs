use axum::Json;

use crate::models::navigation::NavigationResponse;

#[utoipa::path(
    get,
    path = "/navigation",
    tag = "Navigation",
    operation_id = "getNavigation",
    summary = "List the application's flows",
    description = "Returns the end-user flow and the password-protected admin flow with their base paths.",
    responses(
        (status = 200, description = "Available flows", body = NavigationResponse),
    ),
)]
pub async fn navigation() -> Json<NavigationResponse> {
    Json(NavigationResponse::flows())
}
