// =====================================================================================
// MONITORING CELL INTEGRATION TESTS
// =====================================================================================

use assert_matches::assert_matches;
use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use serde_json::json;
use tower::ServiceExt;

use cross_account_cell::{InMemoryTrustLinkSink, LinkSource, LinkSourceProps};
use monitoring_cell::{
    create_monitoring_router, CompositionResult, CompositionSinks, InMemoryAlarmSink,
    InMemoryDashboardSink, MonitoredResourceEntry, MonitoringError, MonitoringOrchestrator,
    MonitoringRequest, OrchestrationState,
};
use service_monitor_cell::{
    MonitorConfig, PassthroughResolver, ProviderFeature, ResourceKind, ServiceMonitorError,
    ServiceMonitorRegistry, StaticNameResolver,
};
use shared_models::{MetricDescriptor, WidgetKind};
use shared_utils::test_utils::{MetricFixtures, RequestFixtures, TestConfig, TEST_ALARM_TOPIC_ARN, TEST_SINK_ARN};

struct Harness {
    alarms: InMemoryAlarmSink,
    dashboards: InMemoryDashboardSink,
    links: InMemoryTrustLinkSink,
}

impl Harness {
    fn new() -> Self {
        Self {
            alarms: InMemoryAlarmSink::new(),
            dashboards: InMemoryDashboardSink::new(),
            links: InMemoryTrustLinkSink::new(),
        }
    }

    fn run(
        &mut self,
        orchestrator: &mut MonitoringOrchestrator,
        request: &MonitoringRequest,
    ) -> Result<CompositionResult, MonitoringError> {
        orchestrator.compose(
            request,
            &mut CompositionSinks {
                alarms: &mut self.alarms,
                dashboards: &mut self.dashboards,
                links: &mut self.links,
            },
        )
    }
}

fn orchestrator() -> MonitoringOrchestrator {
    MonitoringOrchestrator::new(ServiceMonitorRegistry::with_builtin_kinds(), PassthroughResolver, "us-east-1")
}

fn catalog_size(kind: ResourceKind, name: &str) -> (usize, usize) {
    let monitor = ServiceMonitorRegistry::with_builtin_kinds()
        .instantiate(&kind, MonitorConfig::new(name))
        .unwrap();
    (monitor.metrics().len(), monitor.widgets().len())
}

// =====================================================================================
// END-TO-END SCENARIOS
// =====================================================================================

#[test]
fn test_function_and_service_dashboard_sums_fixed_catalogs() {
    let request: MonitoringRequest = serde_json::from_value(RequestFixtures::function_and_service()).unwrap();
    let mut harness = Harness::new();

    let result = harness.run(&mut orchestrator(), &request).unwrap();

    let (function_metrics, function_widgets) = catalog_size(ResourceKind::Lambda, "orders-worker");
    let (service_metrics, service_widgets) = catalog_size(ResourceKind::EcsService, "orders-cluster/orders-api");

    assert_eq!(result.metrics.len(), function_metrics + service_metrics);
    let dashboard = result.dashboard.expect("dashboard requested");
    assert_eq!(dashboard.widgets.len(), function_widgets + service_widgets);
    assert_eq!(dashboard.handle.name, "orders-test-dashboard");
    assert!(dashboard.handle.url.contains("#dashboards:name=orders-test-dashboard"));

    assert!(result.alarms.is_empty());
    assert!(result.link.is_none());
    assert_eq!(
        result.states,
        vec![
            OrchestrationState::ResourcesResolved,
            OrchestrationState::MetricsAggregated,
            OrchestrationState::DashboardBuilt,
        ]
    );

    let stored = harness.dashboards.dashboard("orders-test-dashboard").unwrap();
    assert_eq!(stored.body["widgets"].as_array().unwrap().len(), dashboard.widgets.len());
}

#[test]
fn test_database_alarms_without_target_are_a_configuration_error() {
    let request: MonitoringRequest =
        serde_json::from_value(RequestFixtures::database_with_alarms_without_topic()).unwrap();
    let mut harness = Harness::new();

    let result = harness.run(&mut orchestrator(), &request);

    assert_matches!(result, Err(MonitoringError::MissingAlarmTarget));
    assert!(harness.alarms.alarms().is_empty());
    assert!(harness.dashboards.is_empty());
}

#[test]
fn test_custom_line_metrics_share_one_widget_across_axes() {
    let request = MonitoringRequest::new("orders", "test")
        .with_resource(
            MonitoredResourceEntry::new("orders-worker", ResourceKind::Lambda)
                .with_custom_metric(MetricFixtures::custom_line("Orders", "Placed", "Order flow", false))
                .with_custom_metric(MetricFixtures::custom_line("Orders", "Failed", "Order flow", true)),
        )
        .with_dashboard();
    let mut harness = Harness::new();

    let result = harness.run(&mut orchestrator(), &request).unwrap();
    let widgets = result.dashboard.unwrap().widgets;

    let (_, function_widgets) = catalog_size(ResourceKind::Lambda, "orders-worker");
    assert_eq!(widgets.len(), function_widgets + 1);

    let custom = widgets.last().unwrap();
    assert_eq!(custom.kind, WidgetKind::Line);
    assert_eq!(custom.title, "Order flow");
    assert_eq!(custom.left_series.len(), 1);
    assert_eq!(custom.right_series.len(), 1);
    assert_eq!(custom.left_series[0].metric.metric_name, "Placed");
    assert_eq!(custom.right_series[0].metric.metric_name, "Failed");
}

#[test]
fn test_custom_metrics_are_appended_to_the_aggregate() {
    let request = MonitoringRequest::new("orders", "test").with_resource(
        MonitoredResourceEntry::new("orders-db", ResourceKind::Rds)
            .with_custom_metric(MetricFixtures::custom("Orders", "Placed")),
    );
    let mut harness = Harness::new();

    let result = harness.run(&mut orchestrator(), &request).unwrap();

    assert_eq!(result.metrics.last(), Some(&MetricDescriptor::new("Orders", "Placed")));
    assert!(result.dashboard.is_none());
}

// =====================================================================================
// PER-ENTRY FAILURES
// =====================================================================================

#[test]
fn test_unresolvable_and_unknown_entries_are_skipped_not_fatal() {
    let resolver = StaticNameResolver::new()
        .with("OrdersFunction", "orders-prod-worker")
        .with("QueueHandle", "orders-queue");
    let mut orchestrator =
        MonitoringOrchestrator::new(ServiceMonitorRegistry::with_builtin_kinds(), resolver, "us-east-1");

    let request = MonitoringRequest::new("orders", "prod")
        .with_resource(MonitoredResourceEntry::new("OrdersFunction", ResourceKind::Lambda))
        .with_resource(MonitoredResourceEntry::new("MissingTable", ResourceKind::DynamoDb))
        .with_resource(MonitoredResourceEntry::new("QueueHandle", ResourceKind::Custom("sqs".to_string())))
        .with_dashboard();
    let mut harness = Harness::new();

    let result = harness.run(&mut orchestrator, &request).unwrap();

    assert_eq!(result.resources.len(), 1);
    assert_eq!(result.resources[0].resource_name, "orders-prod-worker");
    assert_eq!(result.resources[0].enabled_features, vec![ProviderFeature::ActiveTracing]);

    assert_eq!(result.skipped.len(), 2);
    assert_matches!(
        &result.skipped[0].error,
        ServiceMonitorError::UnresolvableResource { handle, .. } if handle.as_str() == "MissingTable"
    );
    assert_matches!(&result.skipped[1].error, ServiceMonitorError::UnknownResourceKind(_));

    let (function_metrics, _) = catalog_size(ResourceKind::Lambda, "orders-prod-worker");
    assert_eq!(result.metrics.len(), function_metrics);
}

#[test]
fn test_same_kind_resources_get_distinct_alarm_identities() {
    let request = MonitoringRequest::new("orders", "test")
        .with_resource(MonitoredResourceEntry::new("orders-worker", ResourceKind::Lambda))
        .with_resource(MonitoredResourceEntry::new("billing-worker", ResourceKind::Lambda))
        .with_alarms(Some(TEST_ALARM_TOPIC_ARN));
    let mut harness = Harness::new();

    let result = harness.run(&mut orchestrator(), &request).unwrap();

    let mut names: Vec<&str> = result.alarms.iter().map(|a| a.alarm_name.as_str()).collect();
    let total = names.len();
    names.sort_unstable();
    names.dedup();
    assert_eq!(names.len(), total);
    assert_eq!(harness.alarms.alarms().len(), total);
    assert!(harness
        .alarms
        .alarms()
        .iter()
        .all(|alarm| alarm.notification_target.as_deref() == Some(TEST_ALARM_TOPIC_ARN)));
}

// =====================================================================================
// CROSS-ACCOUNT LINK
// =====================================================================================

#[test]
fn test_link_is_created_once_then_extended() {
    let mut orchestrator = orchestrator();
    let mut harness = Harness::new();

    let first = MonitoringRequest::new("orders", "test")
        .with_resource(MonitoredResourceEntry::new("orders-worker", ResourceKind::Lambda))
        .with_cross_account(Some(TEST_SINK_ARN));
    let created = harness.run(&mut orchestrator, &first).unwrap();

    let summary = created.link.expect("link requested");
    assert!(summary.created);
    assert_eq!(
        summary.configuration.metric_filter.as_deref(),
        Some("Namespace IN ('AWS/Lambda')")
    );
    assert_eq!(
        summary.configuration.log_group_filter.as_deref(),
        Some("LogGroupName IN ('/aws/lambda/orders-worker')")
    );

    // Re-running the same request changes nothing.
    let repeated = harness.run(&mut orchestrator, &first).unwrap().link.unwrap();
    assert!(!repeated.created);
    assert_eq!(repeated.handle, summary.handle);
    assert_eq!(harness.links.links().len(), 1);
    assert_eq!(harness.links.links()[0].updates, 0);

    let second = first
        .clone()
        .with_resource(MonitoredResourceEntry::new("orders-db", ResourceKind::Rds));
    let extended = harness.run(&mut orchestrator, &second).unwrap().link.unwrap();
    assert_eq!(
        extended.configuration.metric_filter.as_deref(),
        Some("Namespace IN ('AWS/Lambda', 'AWS/RDS')")
    );
    assert_eq!(harness.links.links().len(), 1);
    assert_eq!(harness.links.links()[0].updates, 1);
}

#[test]
fn test_caller_supplied_link_is_extended_without_sink_arn() {
    let existing = LinkSource::new(LinkSourceProps {
        sink_arn: TEST_SINK_ARN.to_string(),
        metrics: vec![MetricDescriptor::new("AWS/S3", "BucketSizeBytes")],
        ..LinkSourceProps::default()
    })
    .unwrap();
    let mut orchestrator = orchestrator().with_existing_link(existing, None);
    let mut harness = Harness::new();

    let request = MonitoringRequest::new("orders", "test")
        .with_resource(MonitoredResourceEntry::new("orders-table", ResourceKind::DynamoDb))
        .with_cross_account(None);
    let result = harness.run(&mut orchestrator, &request).unwrap();

    let link = result.link.as_ref().unwrap();
    assert_eq!(
        link.configuration.metric_filter.as_deref(),
        Some("Namespace IN ('AWS/DynamoDB', 'AWS/S3')")
    );
    assert!(result.reached(OrchestrationState::LinkEstablished));
    assert_eq!(orchestrator.state(), OrchestrationState::LinkEstablished);
}

#[test]
fn test_request_from_config_carries_targets() {
    let config = TestConfig::default().with_alarm_topic().with_sink().to_composer_config();
    let request = MonitoringRequest::from_config(&config);

    assert_eq!(request.app_name, "orders");
    assert_eq!(request.alarms.notification_target.as_deref(), Some(TEST_ALARM_TOPIC_ARN));
    assert_eq!(request.cross_account.sink_arn.as_deref(), Some(TEST_SINK_ARN));
    assert!(!request.alarms.enabled);
    assert!(!request.dashboard.enabled);
}

// =====================================================================================
// HTTP SURFACE
// =====================================================================================

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&body).unwrap()
}

fn json_request(uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn test_health_endpoint() {
    let app = create_monitoring_router(TestConfig::default().to_arc());

    let request = Request::builder().uri("/health").body(Body::empty()).unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["status"], "healthy");
    assert_eq!(json["crossAccountConfigured"], false);
}

#[tokio::test]
async fn test_kinds_endpoint_lists_builtin_kinds() {
    let app = create_monitoring_router(TestConfig::default().to_arc());

    let request = Request::builder().uri("/kinds").body(Body::empty()).unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    let kinds = json.as_array().unwrap();
    assert_eq!(kinds.len(), ResourceKind::BUILTIN.len());
    assert!(kinds.iter().any(|k| k["kind"] == "lambda" && k["namespace"] == "AWS/Lambda"));
}

#[tokio::test]
async fn test_compose_endpoint_returns_composition() {
    let app = create_monitoring_router(TestConfig::default().to_arc());

    let response = app
        .oneshot(json_request("/compose", RequestFixtures::function_and_service()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["appName"], "orders");
    assert_eq!(json["resources"].as_array().unwrap().len(), 2);
    assert!(json["dashboard"]["handle"]["url"].as_str().unwrap().contains("orders-test-dashboard"));
    assert_eq!(json["skipped"], json!([]));
}

#[tokio::test]
async fn test_compose_endpoint_uses_configured_alarm_topic() {
    let app = create_monitoring_router(TestConfig::default().with_alarm_topic().to_arc());

    let response = app
        .oneshot(json_request("/compose", RequestFixtures::database_with_alarms_without_topic()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["alarms"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_compose_endpoint_rejects_missing_alarm_target() {
    let app = create_monitoring_router(TestConfig::default().to_arc());

    let response = app
        .oneshot(json_request("/compose", RequestFixtures::database_with_alarms_without_topic()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let json = body_json(response).await;
    assert!(json["error"].as_str().unwrap().contains("notification target"));
}

#[tokio::test]
async fn test_repeated_compose_extends_the_same_link() {
    let app = create_monitoring_router(TestConfig::default().with_sink().to_arc());
    let body = json!({
        "appName": "orders",
        "environment": "test",
        "resources": [{ "resource": "orders-worker", "kind": "lambda" }],
        "crossAccount": { "enabled": true }
    });

    let first = app.clone().oneshot(json_request("/compose", body.clone())).await.unwrap();
    assert_eq!(first.status(), StatusCode::OK);
    let first = body_json(first).await;

    let second = app.oneshot(json_request("/compose", body)).await.unwrap();
    assert_eq!(second.status(), StatusCode::OK);
    let second = body_json(second).await;

    assert_eq!(first["link"]["created"], true);
    assert_eq!(second["link"]["created"], false);
    assert_eq!(second["link"]["handle"]["id"], first["link"]["handle"]["id"]);
}

#[tokio::test]
async fn test_trust_policy_endpoint_renders_policy() {
    let app = create_monitoring_router(TestConfig::default().to_arc());

    let mut body = RequestFixtures::trust_scope_for_account("111111111111");
    body["additionalSourceAccountIds"] = json!(["222222222222", "222222222222"]);

    let response = app.oneshot(json_request("/trust-policy", body)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["trustedAccounts"], json!(["111111111111", "222222222222"]));
    assert_eq!(json["policyVersion"], 2);
    assert_eq!(json["policy"]["Version"], "2012-10-17");
}

#[tokio::test]
async fn test_trust_policy_endpoint_rejects_empty_scope() {
    let app = create_monitoring_router(TestConfig::default().to_arc());

    let body = json!({
        "name": "monitoring-sink",
        "region": "us-east-1",
        "monitoringAccountId": "999999999999",
        "scope": {}
    });

    let response = app.oneshot(json_request("/trust-policy", body)).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
