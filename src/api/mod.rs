pub mod dto;
pub mod errors;
pub mod handlers;

use axum::{
    routing::{get, post},
    Router,
};
use utoipa::OpenApi;
use utoipa_axum::router::OpenApiRouter;

use crate::dashboard::DashboardService;

use handlers::ApiDoc;

pub fn router(dashboard: DashboardService) -> Router {
    let (router, api) = OpenApiRouter::with_openapi(ApiDoc::openapi())
        .route("/api/dashboard", post(handlers::post_dashboard))
        .with_state(dashboard)
        .split_for_parts();

    router
        .route("/", get(handlers::index))
        .route("/health", get(handlers::health))
        .route(
            "/api-docs/openapi.json",
            get(move || async move { axum::Json(api) }),
        )
}
