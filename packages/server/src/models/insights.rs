use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Query for the mock weather endpoint.
#[derive(Deserialize, utoipa::IntoParams)]
pub struct WeatherQuery {
    /// Location to report on, free-form text. Defaults to the caller's
    /// profile location.
    pub location: Option<String>,
}

/// Query for the mock price-trend endpoint.
#[derive(Deserialize, utoipa::IntoParams)]
pub struct PricesQuery {
    /// Crop type the series is generated for.
    pub crop_type: Option<String>,
    /// Number of daily points (1-90, default 14).
    pub days: Option<u32>,
}

/// Request body for the mock crop analysis endpoint.
#[derive(Deserialize, utoipa::ToSchema)]
pub struct AnalyzeRequest {
    /// The crop to "analyze". Must exist.
    pub crop_id: Uuid,
}

/// Request body for the mock chatbot endpoint.
#[derive(Deserialize, utoipa::ToSchema)]
pub struct ChatRequest {
    #[schema(example = "How do I get better market prices?")]
    pub message: String,
}

/// Canned chatbot reply.
#[derive(Serialize, utoipa::ToSchema)]
pub struct ChatResponse {
    pub reply: String,
}
