use axum::{
    Router,
    routing::{get, post},
};

use crate::handlers;
use crate::state::AppState;

pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth_routes())
        .nest("/crops", crop_routes())
        .nest("/insights", insights_routes())
        .nest("/admin", admin_routes())
}

fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/signup", post(handlers::auth::sign_up))
        .route("/signin", post(handlers::auth::sign_in))
        .route("/me", get(handlers::auth::me))
}

fn crop_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::crop::list_crops).post(handlers::crop::create_crop),
        )
        .route("/scan/{payload}", get(handlers::crop::scan_crop))
        .route("/farmer/{farmer_id}", get(handlers::crop::crops_by_farmer))
        .route(
            "/distributor/{distributor_id}",
            get(handlers::crop::crops_by_distributor),
        )
        .route(
            "/{id}",
            get(handlers::crop::get_crop)
                .put(handlers::crop::update_crop)
                .delete(handlers::crop::delete_crop),
        )
        .route("/{id}/acquire", post(handlers::crop::acquire_crop))
        .route("/{id}/handoff", post(handlers::crop::handoff_crop))
        .route("/{id}/trace", get(handlers::crop::trace_crop))
}

fn insights_routes() -> Router<AppState> {
    Router::new()
        .route("/weather", get(handlers::insights::weather))
        .route("/prices", get(handlers::insights::prices))
        .route("/analyze", post(handlers::insights::analyze))
        .route("/chat", post(handlers::insights::chat))
}

fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/users", get(handlers::admin::list_users))
        .route("/export", get(handlers::admin::export_data))
        .route("/import", post(handlers::admin::import_data))
}
