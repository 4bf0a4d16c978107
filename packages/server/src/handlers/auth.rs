use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use common::UserProfile;
use store::NewUser;
use tracing::instrument;

use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::extractors::json::AppJson;
use crate::models::auth::{
    AuthResponse, SignInRequest, SignUpRequest, validate_sign_in_request, validate_sign_up_request,
};
use crate::state::AppState;
use crate::utils::{hash, jwt};

#[utoipa::path(
    post,
    path = "/api/auth/signup",
    tag = "Auth",
    operation_id = "signUp",
    summary = "Create an account",
    description = "Registers a supply-chain participant. Farmers and distributors are assigned a unique 3-digit lookup code.",
    request_body = SignUpRequest,
    responses(
        (status = 201, description = "Account created", body = AuthResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 409, description = "Email already registered (EMAIL_TAKEN)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, payload), fields(email = %payload.email))]
pub async fn sign_up(
    State(state): State<AppState>,
    AppJson(payload): AppJson<SignUpRequest>,
) -> Result<impl IntoResponse, AppError> {
    let role = validate_sign_up_request(&payload)?;
    let email = payload.email.trim().to_string();

    let password_hash = hash::hash_password(&payload.password)
        .map_err(|e| AppError::Internal(format!("Password hash error: {}", e)))?;

    let user = state.write_store()?.add_user(NewUser {
        email,
        password_hash,
        role,
        name: payload.name,
        location: payload.location,
    })?;

    let token = jwt::sign(user.id, &user.email, user.role, &state.config.auth.jwt_secret)
        .map_err(|e| AppError::Internal(format!("JWT sign error: {}", e)))?;

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            token,
            user: user.profile(),
        }),
    ))
}

#[utoipa::path(
    post,
    path = "/api/auth/signin",
    tag = "Auth",
    operation_id = "signIn",
    summary = "Sign in",
    request_body = SignInRequest,
    responses(
        (status = 200, description = "Signed in", body = AuthResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Wrong email or password (INVALID_CREDENTIALS)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, payload), fields(email = %payload.email))]
pub async fn sign_in(
    State(state): State<AppState>,
    AppJson(payload): AppJson<SignInRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    validate_sign_in_request(&payload)?;

    let email = payload.email.trim();

    let user = {
        let store = state.read_store()?;
        store
            .find_user_by_email(email)
            .cloned()
            .ok_or(AppError::InvalidCredentials)?
    };

    let is_valid = hash::verify_password(&payload.password, &user.password_hash)
        .map_err(|e| AppError::Internal(format!("Password verify error: {}", e)))?;

    if !is_valid {
        return Err(AppError::InvalidCredentials);
    }

    let token = jwt::sign(user.id, &user.email, user.role, &state.config.auth.jwt_secret)
        .map_err(|e| AppError::Internal(format!("JWT sign error: {}", e)))?;

    Ok(Json(AuthResponse {
        token,
        user: user.profile(),
    }))
}

#[utoipa::path(
    get,
    path = "/api/auth/me",
    tag = "Auth",
    operation_id = "me",
    summary = "Current account profile",
    responses(
        (status = 200, description = "The authenticated user's profile", body = UserProfile),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(user_id = %auth_user.user_id))]
pub async fn me(
    auth_user: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<UserProfile>, AppError> {
    let store = state.read_store()?;
    let user = store
        .find_user(auth_user.user_id)
        .ok_or_else(|| AppError::NotFound("User not found".into()))?;
    Ok(Json(user.profile()))
}
