use axum::{Json, extract::{Query, State}};
use common::insights::{self, CropAnalysis, PriceTrend, WeatherReport};
use tracing::instrument;

use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::extractors::json::AppJson;
use crate::models::insights::{AnalyzeRequest, ChatRequest, ChatResponse, PricesQuery, WeatherQuery};
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/api/insights/weather",
    tag = "Insights",
    operation_id = "weather",
    summary = "Mock weather reading",
    description = "Placeholder values in fixed ranges; no real weather service is consulted. Defaults to the caller's profile location.",
    params(WeatherQuery),
    responses(
        (status = 200, description = "Weather reading", body = WeatherReport),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, query))]
pub async fn weather(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Query(query): Query<WeatherQuery>,
) -> Result<Json<WeatherReport>, AppError> {
    let location = match query.location {
        Some(location) if !location.trim().is_empty() => location,
        _ => state
            .read_store()?
            .find_user(auth_user.user_id)
            .and_then(|u| u.location.clone())
            .unwrap_or_else(|| "your region".to_string()),
    };
    Ok(Json(insights::weather_for(&location)))
}

#[utoipa::path(
    get,
    path = "/api/insights/prices",
    tag = "Insights",
    operation_id = "priceTrend",
    summary = "Mock market price trend",
    description = "A bounded random walk of daily prices; no real market feed is consulted.",
    params(PricesQuery),
    responses(
        (status = 200, description = "Daily price series", body = PriceTrend),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(_auth_user, query))]
pub async fn prices(
    _auth_user: AuthUser,
    Query(query): Query<PricesQuery>,
) -> Result<Json<PriceTrend>, AppError> {
    let crop_type = query.crop_type.unwrap_or_else(|| "general".to_string());
    let days = query.days.unwrap_or(14).clamp(1, 90);
    Ok(Json(insights::price_trend(&crop_type, days)))
}

#[utoipa::path(
    post,
    path = "/api/insights/analyze",
    tag = "Insights",
    operation_id = "analyzeCrop",
    summary = "Mock crop quality analysis",
    description = "Placeholder freshness/ripeness/shelf-life figures for an existing crop.",
    request_body = AnalyzeRequest,
    responses(
        (status = 200, description = "Analysis result", body = CropAnalysis),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "No such crop (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, _auth_user, payload))]
pub async fn analyze(
    _auth_user: AuthUser,
    State(state): State<AppState>,
    AppJson(payload): AppJson<AnalyzeRequest>,
) -> Result<Json<CropAnalysis>, AppError> {
    if state.read_store()?.find_crop(payload.crop_id).is_none() {
        return Err(AppError::NotFound("Crop not found".into()));
    }
    Ok(Json(insights::analyze_crop()))
}

#[utoipa::path(
    post,
    path = "/api/insights/chat",
    tag = "Insights",
    operation_id = "chat",
    summary = "Canned farming chatbot",
    request_body = ChatRequest,
    responses(
        (status = 200, description = "Chatbot reply", body = ChatResponse),
        (status = 400, description = "Empty message (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(_auth_user, payload))]
pub async fn chat(
    _auth_user: AuthUser,
    AppJson(payload): AppJson<ChatRequest>,
) -> Result<Json<ChatResponse>, AppError> {
    if payload.message.trim().is_empty() {
        return Err(AppError::Validation("Message must not be empty".into()));
    }
    Ok(Json(ChatResponse {
        reply: insights::chat_reply(&payload.message),
    }))
}
