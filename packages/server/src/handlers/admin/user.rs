use axum::Json;
use axum::extract::{Path, Query, State};
use sea_orm::sea_query::{Expr, ExprTrait, LikeExpr};
use sea_orm::*;
use tracing::{info, instrument};

use crate::entity::user;
use crate::error::{AppError, ErrorBody};
use crate::extractors::admin::AdminUser;
use crate::extractors::json::AppJson;
use crate::models::shared::escape_like;
use crate::models::user::*;
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/users",
    tag = "Users",
    operation_id = "listUsers",
    summary = "Search users by device ID",
    description = "Returns up to 100 users, most recently active first. `search` matches any substring of the device ID; wildcard characters are matched literally.",
    params(UserListQuery),
    responses(
        (status = 200, description = "Matching users", body = Vec<UserResponse>),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, _admin, query))]
pub async fn list_users(
    _admin: AdminUser,
    State(state): State<AppState>,
    Query(query): Query<UserListQuery>,
) -> Result<Json<Vec<UserResponse>>, AppError> {
    let mut select = user::Entity::find();

    if let Some(ref search) = query.search {
        let term = escape_like(search.trim());
        if !term.is_empty() {
            select = select.filter(
                Expr::col(user::Column::DeviceId)
                    .like(LikeExpr::new(format!("%{term}%")).escape('\\')),
            );
        }
    }

    let users = select
        .order_by_desc(user::Column::LastActive)
        .order_by_desc(user::Column::Id)
        .limit(Some(USER_LIST_LIMIT))
        .all(&state.db)
        .await?;

    Ok(Json(users.into_iter().map(UserResponse::from).collect()))
}

#[utoipa::path(
    post,
    path = "/users/{id}/coins",
    tag = "Users",
    operation_id = "grantCoins",
    summary = "Grant coins to a user",
    description = "Adds 1-100 coins to the user's balance.",
    params(("id" = i32, Path, description = "User ID")),
    request_body = GrantCoinsRequest,
    responses(
        (status = 200, description = "Updated user", body = UserResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "User not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, _admin, payload), fields(coins = payload.coins))]
pub async fn grant_coins(
    _admin: AdminUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    AppJson(payload): AppJson<GrantCoinsRequest>,
) -> Result<Json<UserResponse>, AppError> {
    validate_grant(&payload)?;

    let txn = state.db.begin().await?;
    let updated = user::Entity::update_many()
        .col_expr(
            user::Column::Coins,
            Expr::col(user::Column::Coins).add(payload.coins),
        )
        .filter(user::Column::Id.eq(id))
        .exec(&txn)
        .await?;
    if updated.rows_affected == 0 {
        return Err(AppError::NotFound(format!("User {id} not found")));
    }
    let user = user::Entity::find_by_id(id)
        .one(&txn)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("User {id} not found")))?;
    txn.commit().await?;

    info!(user_id = id, balance = user.coins, "Coins granted");
    Ok(Json(UserResponse::from(user)))
}
