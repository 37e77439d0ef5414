// =====================================================================================
// MONITORING CELL ROUTER
// =====================================================================================

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;

use crate::handlers::{
    compose_monitoring, create_trust_policy, get_health_status, list_resource_kinds,
    MonitoringHandlers,
};
use shared_config::ComposerConfig;

pub fn create_monitoring_router(config: Arc<ComposerConfig>) -> Router {
    let handlers = Arc::new(MonitoringHandlers::new(config));

    let public_routes = Router::new()
        .route("/health", get(get_health_status))
        .route("/kinds", get(list_resource_kinds))
        .layer(CorsLayer::permissive())
        .with_state(handlers.clone());

    let composition_routes = Router::new()
        .route("/compose", post(compose_monitoring))
        .route("/trust-policy", post(create_trust_policy))
        .with_state(handlers);

    Router::new()
        .merge(public_routes)
        .merge(composition_routes)
}
