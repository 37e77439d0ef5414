use std::sync::Arc;

use axum::{
    Router,
    routing::get,
};

use monitoring_cell::create_monitoring_router;
use shared_config::ComposerConfig;

pub fn create_router(state: Arc<ComposerConfig>) -> Router {
    Router::new()
        .route("/", get(|| async { "Observability Composer API is running!" }))
        .merge(create_monitoring_router(state))
}
