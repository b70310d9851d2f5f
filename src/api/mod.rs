pub mod handlers;
pub mod middleware;
pub mod state;

use std::sync::Arc;

use axum::{
    routing::{get, post, put},
    Router,
};
use tower_http::{compression::CompressionLayer, cors::CorsLayer, trace::TraceLayer};

use crate::service::ServiceContext;
use state::AppState;

pub fn create_app(service_context: Arc<ServiceContext>) -> Router {
    let app_state = AppState::new(service_context);

    Router::new()
        .route("/health", get(handlers::root::health_check))
        .nest("/contributions", contribution_routes(app_state.clone()))
        .with_state(app_state)
        .layer(CompressionLayer::new())
        .layer(CorsLayer::permissive()) // Configure properly for production
        .layer(TraceLayer::new_for_http())
}

fn contribution_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::contributions::list))
        .route("/", post(handlers::contributions::submit))
        .route("/admin-add", post(handlers::contributions::admin_add))
        .route("/user/:member_id", get(handlers::contributions::list_by_member))
        .route(
            "/month/:month/year/:year",
            get(handlers::contributions::list_by_period),
        )
        .route(
            "/outstanding/month/:month/year/:year",
            get(handlers::contributions::outstanding),
        )
        .route("/:id/status", put(handlers::contributions::update_status))
        .route_layer(axum::middleware::from_fn_with_state(
            state,
            middleware::auth::require_auth,
        ))
}
