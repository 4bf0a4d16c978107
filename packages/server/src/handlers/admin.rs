use axum::{Json, extract::State, http::StatusCode};
use common::{Role, UserProfile};
use tracing::instrument;

use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::extractors::json::AppJson;
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/api/admin/users",
    tag = "Admin",
    operation_id = "listUsers",
    summary = "List all registered users",
    responses(
        (status = 200, description = "All user profiles", body = Vec<UserProfile>),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Admin role required (PERMISSION_DENIED)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(user_id = %auth_user.user_id))]
pub async fn list_users(
    auth_user: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<Vec<UserProfile>>, AppError> {
    auth_user.require_role(Role::Admin)?;
    let users = state
        .read_store()?
        .users()
        .iter()
        .map(|u| u.profile())
        .collect();
    Ok(Json(users))
}

#[utoipa::path(
    get,
    path = "/api/admin/export",
    tag = "Admin",
    operation_id = "exportData",
    summary = "Export the whole data set",
    description = "Returns the full store document. Importing it back reproduces an equal data set.",
    responses(
        (status = 200, description = "The store document"),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Admin role required (PERMISSION_DENIED)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(user_id = %auth_user.user_id))]
pub async fn export_data(
    auth_user: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<serde_json::Value>, AppError> {
    auth_user.require_role(Role::Admin)?;
    let blob = state.read_store()?.export_json()?;
    let value = serde_json::from_str(&blob)
        .map_err(|e| AppError::Internal(format!("Export serialization error: {}", e)))?;
    Ok(Json(value))
}

#[utoipa::path(
    post,
    path = "/api/admin/import",
    tag = "Admin",
    operation_id = "importData",
    summary = "Replace the whole data set with an exported document",
    responses(
        (status = 204, description = "Data set replaced"),
        (status = 400, description = "Malformed document (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Admin role required (PERMISSION_DENIED)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(user_id = %auth_user.user_id))]
pub async fn import_data(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppJson(payload): AppJson<serde_json::Value>,
) -> Result<StatusCode, AppError> {
    auth_user.require_role(Role::Admin)?;
    let blob = payload.to_string();
    state
        .write_store()?
        .import_json(&blob)
        .map_err(|e| match e {
            store::StoreError::Serialization(err) => {
                AppError::Validation(format!("Malformed store document: {}", err))
            }
            other => other.into(),
        })?;
    Ok(StatusCode::NO_CONTENT)
}
