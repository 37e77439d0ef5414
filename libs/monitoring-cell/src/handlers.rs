// =====================================================================================
// MONITORING CELL HANDLERS
// =====================================================================================

use axum::{
    extract::State,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{info, instrument};

use cross_account_cell::{
    InMemoryTrustLinkSink, LinkHandle, LinkSource, LinkTarget, LinkTargetProps, TrustLinkSink,
};
use service_monitor_cell::{PassthroughResolver, ServiceMonitorRegistry};
use shared_config::ComposerConfig;
use shared_models::AppError;

use crate::models::{CompositionResult, MonitoringError, MonitoringRequest};
use crate::services::{CompositionSinks, InMemoryAlarmSink, InMemoryDashboardSink, MonitoringOrchestrator};

/// Link owned by one application environment, kept between compositions.
type EstablishedLink = (LinkSource, Option<LinkHandle>);

pub struct MonitoringHandlers {
    config: Arc<ComposerConfig>,
    registry: ServiceMonitorRegistry,
    trust_links: Mutex<InMemoryTrustLinkSink>,
    established_links: Mutex<HashMap<(String, String), EstablishedLink>>,
}

impl MonitoringHandlers {
    pub fn new(config: Arc<ComposerConfig>) -> Self {
        Self::with_registry(config, ServiceMonitorRegistry::with_builtin_kinds())
    }

    pub fn with_registry(config: Arc<ComposerConfig>, registry: ServiceMonitorRegistry) -> Self {
        Self {
            config,
            registry,
            trust_links: Mutex::new(InMemoryTrustLinkSink::new()),
            established_links: Mutex::new(HashMap::new()),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KindSummary {
    pub kind: String,
    pub namespace: Option<&'static str>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrustPolicyRequest {
    #[serde(flatten)]
    pub target: LinkTargetProps,
    #[serde(default)]
    pub additional_source_account_ids: Vec<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrustPolicyResponse {
    pub arn: String,
    pub policy_version: u32,
    pub trusted_accounts: Vec<String>,
    pub policy: serde_json::Value,
}

// =====================================================================================
// PUBLIC ENDPOINTS
// =====================================================================================

#[instrument(skip(handlers))]
pub async fn get_health_status(State(handlers): State<Arc<MonitoringHandlers>>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "observability-composer",
        "configured": handlers.config.is_configured(),
        "crossAccountConfigured": handlers.config.is_cross_account_configured(),
        "timestamp": chrono::Utc::now(),
    }))
}

#[instrument(skip(handlers))]
pub async fn list_resource_kinds(State(handlers): State<Arc<MonitoringHandlers>>) -> Json<Vec<KindSummary>> {
    let kinds = handlers
        .registry
        .kinds()
        .into_iter()
        .map(|kind| KindSummary {
            kind: kind.tag().to_string(),
            namespace: kind.namespace(),
        })
        .collect();

    Json(kinds)
}

// =====================================================================================
// COMPOSITION ENDPOINTS
// =====================================================================================

#[instrument(skip(handlers, request), fields(app = %request.app_name))]
pub async fn compose_monitoring(
    State(handlers): State<Arc<MonitoringHandlers>>,
    Json(request): Json<MonitoringRequest>,
) -> Result<Json<CompositionResult>, MonitoringError> {
    let request = request.with_config_defaults(&handlers.config);

    let mut alarms = InMemoryAlarmSink::new();
    let mut dashboards = InMemoryDashboardSink::new();
    let mut links = handlers.trust_links.lock().await;
    let mut established = handlers.established_links.lock().await;
    let key = (request.app_name.clone(), request.environment.clone());

    let mut orchestrator =
        MonitoringOrchestrator::new(handlers.registry.clone(), PassthroughResolver, handlers.config.region.clone());
    if let Some((link, handle)) = established.remove(&key) {
        orchestrator = orchestrator.with_existing_link(link, handle);
    }
    let result = orchestrator.compose(
        &request,
        &mut CompositionSinks {
            alarms: &mut alarms,
            dashboards: &mut dashboards,
            links: &mut *links,
        },
    );
    if let Some(link) = orchestrator.into_link() {
        established.insert(key, link);
    }
    let result = result?;

    info!(
        metrics = result.metrics.len(),
        alarms = result.alarms.len(),
        skipped = result.skipped.len(),
        "Composition completed"
    );
    Ok(Json(result))
}

#[instrument(skip(handlers, request), fields(name = %request.target.name))]
pub async fn create_trust_policy(
    State(handlers): State<Arc<MonitoringHandlers>>,
    Json(request): Json<TrustPolicyRequest>,
) -> Result<Json<TrustPolicyResponse>, MonitoringError> {
    let mut target = LinkTarget::new(request.target)?;
    for account_id in &request.additional_source_account_ids {
        target.add_source_account(account_id)?;
    }

    let handle = handlers.trust_links.lock().await.register_target(&target);

    Ok(Json(TrustPolicyResponse {
        arn: handle.arn,
        policy_version: handle.policy_version,
        trusted_accounts: target.trusted_accounts(),
        policy: target.policy_document(),
    }))
}

// =====================================================================================
// ERROR RESPONSE IMPLEMENTATION
// =====================================================================================

impl IntoResponse for MonitoringError {
    fn into_response(self) -> Response {
        AppError::from(self).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MonitoredResourceEntry;
    use service_monitor_cell::ResourceKind;
    use shared_utils::test_utils::TestConfig;

    fn handlers() -> Arc<MonitoringHandlers> {
        Arc::new(MonitoringHandlers::new(TestConfig::default().with_sink().to_arc()))
    }

    #[test]
    fn health_reports_cross_account_readiness() {
        let Json(body) = tokio_test::block_on(get_health_status(State(handlers())));
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["crossAccountConfigured"], true);
    }

    #[test]
    fn repeated_compose_reuses_the_established_link() {
        let handlers = handlers();
        let request = || {
            MonitoringRequest::new("orders", "test")
                .with_resource(MonitoredResourceEntry::new("orders-worker", ResourceKind::Lambda))
                .with_cross_account(None)
        };

        let first = tokio_test::block_on(compose_monitoring(State(handlers.clone()), Json(request())));
        let second = tokio_test::block_on(compose_monitoring(State(handlers.clone()), Json(request())));
        let (Ok(Json(first)), Ok(Json(second))) = (first, second) else {
            panic!("both compositions succeed");
        };

        assert!(first.link.as_ref().is_some_and(|link| link.created));
        assert!(second.link.as_ref().is_some_and(|link| !link.created));

        let links = tokio_test::block_on(handlers.trust_links.lock());
        assert_eq!(links.links().len(), 1);
        assert_eq!(links.links()[0].updates, 0);
    }

    #[test]
    fn other_environments_get_their_own_link() {
        let handlers = handlers();
        for environment in ["test", "prod"] {
            let request = MonitoringRequest::new("orders", environment)
                .with_resource(MonitoredResourceEntry::new("orders-worker", ResourceKind::Lambda))
                .with_cross_account(None);
            let result = tokio_test::block_on(compose_monitoring(State(handlers.clone()), Json(request)));
            assert!(result.is_ok());
        }

        assert_eq!(tokio_test::block_on(handlers.trust_links.lock()).links().len(), 2);
    }

    #[test]
    fn trust_policy_errors_map_to_client_errors() {
        let request = TrustPolicyRequest {
            target: LinkTargetProps {
                name: "monitoring-sink".to_string(),
                region: "us-east-1".to_string(),
                monitoring_account_id: "not-an-account".to_string(),
                scope: cross_account_cell::TrustScope::accounts(["111111111111"]),
            },
            additional_source_account_ids: Vec::new(),
        };

        let result = tokio_test::block_on(create_trust_policy(State(handlers()), Json(request)));
        let response = result.err().map(IntoResponse::into_response);
        assert_eq!(
            response.map(|r| r.status()),
            Some(axum::http::StatusCode::BAD_REQUEST)
        );
    }
}
