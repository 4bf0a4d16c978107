use common::{Role, UserProfile};
use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Request body for account creation.
#[derive(Deserialize, utoipa::ToSchema)]
pub struct SignUpRequest {
    #[schema(example = "alice@greenfields.example")]
    pub email: String,
    /// Password (8-128 characters).
    #[schema(example = "s3cure_P@ss!")]
    pub password: String,
    /// Participant role: farmer, distributor, retailer, consumer, or admin.
    /// Case-insensitive; legacy clients send it uppercased.
    #[schema(example = "farmer")]
    pub role: String,
    #[schema(example = "Alice Mburu")]
    pub name: Option<String>,
    #[schema(example = "Nakuru")]
    pub location: Option<String>,
}

pub fn validate_sign_up_request(payload: &SignUpRequest) -> Result<Role, AppError> {
    let email = payload.email.trim();
    if email.is_empty() || email.chars().count() > 254 || !email.contains('@') {
        return Err(AppError::Validation("A valid email is required".into()));
    }
    if payload.password.len() < 8 || payload.password.len() > 128 {
        return Err(AppError::Validation(
            "Password must be 8-128 characters".into(),
        ));
    }
    payload
        .role
        .parse::<Role>()
        .map_err(AppError::Validation)
}

/// Request body for signing in.
#[derive(Deserialize, utoipa::ToSchema)]
pub struct SignInRequest {
    #[schema(example = "alice@greenfields.example")]
    pub email: String,
    pub password: String,
}

pub fn validate_sign_in_request(payload: &SignInRequest) -> Result<(), AppError> {
    if payload.email.trim().is_empty() {
        return Err(AppError::Validation("Email must not be empty".into()));
    }
    if payload.password.is_empty() {
        return Err(AppError::Validation("Password must not be empty".into()));
    }
    Ok(())
}

/// Successful sign-up / sign-in response.
#[derive(Serialize, utoipa::ToSchema)]
pub struct AuthResponse {
    /// JWT bearer token valid for 7 days.
    #[schema(example = "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9...")]
    pub token: String,
    pub user: UserProfile,
}
