pub mod config;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod seed;
pub mod state;
pub mod utils;

use axum::http::HeaderValue;
use tower_http::cors::{Any, CorsLayer};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_scalar::{Scalar, Servable as ScalarServable};
use utoipa_swagger_ui::SwaggerUi;

use crate::config::CorsConfig;
use crate::state::AppState;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "FarmChainX API",
        version = "1.0.0",
        description = "API for the FarmChainX crop provenance tracker"
    ),
    paths(
        handlers::auth::sign_up,
        handlers::auth::sign_in,
        handlers::auth::me,
        handlers::crop::list_crops,
        handlers::crop::create_crop,
        handlers::crop::get_crop,
        handlers::crop::update_crop,
        handlers::crop::delete_crop,
        handlers::crop::crops_by_farmer,
        handlers::crop::crops_by_distributor,
        handlers::crop::scan_crop,
        handlers::crop::acquire_crop,
        handlers::crop::handoff_crop,
        handlers::crop::trace_crop,
        handlers::insights::weather,
        handlers::insights::prices,
        handlers::insights::analyze,
        handlers::insights::chat,
        handlers::admin::list_users,
        handlers::admin::export_data,
        handlers::admin::import_data,
    ),
    components(schemas(
        common::Crop,
        common::FarmerInfo,
        common::DistributorInfo,
        common::RetailerInfo,
        common::SupplyChainEntry,
        common::Role,
        common::UserProfile,
        common::insights::CropAnalysis,
        common::insights::WeatherCondition,
        common::insights::WeatherReport,
        common::insights::PricePoint,
        common::insights::PriceTrend,
        error::ErrorBody,
        models::auth::SignUpRequest,
        models::auth::SignInRequest,
        models::auth::AuthResponse,
        models::crop::CreateCropRequest,
        models::crop::UpdateCropRequest,
        models::crop::AcquireCropRequest,
        models::crop::HandoffRequest,
        models::crop::ProvenanceResponse,
        models::insights::AnalyzeRequest,
        models::insights::ChatRequest,
        models::insights::ChatResponse,
    )),
    tags(
        (name = "Auth", description = "Authentication and account management"),
        (name = "Crops", description = "Crop batch CRUD and provenance lookups"),
        (name = "Supply Chain", description = "Acquire, handoff and audit-trail operations"),
        (name = "Insights", description = "Mock analysis, weather, price and chatbot widgets"),
        (name = "Admin", description = "User listing and data set export/import"),
    ),
    modifiers(&SecurityAddon),
)]
struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_default();
        components.add_security_scheme(
            "jwt",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

fn cors_layer(config: &CorsConfig) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods(Any)
        .allow_headers(Any)
        .max_age(std::time::Duration::from_secs(config.max_age));

    if config.allow_origins.is_empty() {
        layer.allow_origin(Any)
    } else {
        let origins: Vec<HeaderValue> = config
            .allow_origins
            .iter()
            .filter_map(|origin| origin.parse().ok())
            .collect();
        layer.allow_origin(origins)
    }
}

/// Build the application router.
pub fn build_router(state: AppState) -> axum::Router {
    let cors = cors_layer(&state.config.server.cors);
    let api = ApiDoc::openapi();

    axum::Router::new()
        .nest("/api", routes::api_routes())
        .layer(cors)
        .with_state(state)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", api.clone()))
        .merge(Scalar::with_url("/scalar", api))
}
