use std::sync::Arc;

use serde_json::json;

use shared_config::ComposerConfig;
use shared_models::{CustomMetric, MetricDescriptor, WidgetFragment, WidgetKind};

pub const TEST_MONITORING_ACCOUNT: &str = "999999999999";
pub const TEST_SOURCE_ACCOUNT: &str = "111111111111";
pub const TEST_SINK_ARN: &str =
    "arn:aws:oam:us-east-1:999999999999:sink/00000000-0000-0000-0000-000000000000";
pub const TEST_ALARM_TOPIC_ARN: &str = "arn:aws:sns:us-east-1:111111111111:alarms";

pub struct TestConfig {
    pub app_name: String,
    pub environment: String,
    pub alarm_topic_arn: Option<String>,
    pub sink_arn: Option<String>,
}

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            app_name: "orders".to_string(),
            environment: "test".to_string(),
            alarm_topic_arn: None,
            sink_arn: None,
        }
    }
}

impl TestConfig {
    pub fn with_alarm_topic(mut self) -> Self {
        self.alarm_topic_arn = Some(TEST_ALARM_TOPIC_ARN.to_string());
        self
    }

    pub fn with_sink(mut self) -> Self {
        self.sink_arn = Some(TEST_SINK_ARN.to_string());
        self
    }

    pub fn to_composer_config(&self) -> ComposerConfig {
        ComposerConfig {
            app_name: self.app_name.clone(),
            environment: self.environment.clone(),
            monitoring_account_id: Some(TEST_MONITORING_ACCOUNT.to_string()),
            alarm_topic_arn: self.alarm_topic_arn.clone(),
            sink_arn: self.sink_arn.clone(),
            ..ComposerConfig::default()
        }
    }

    pub fn to_arc(&self) -> Arc<ComposerConfig> {
        Arc::new(self.to_composer_config())
    }
}

pub struct MetricFixtures;

impl MetricFixtures {
    pub fn custom(namespace: &str, name: &str) -> CustomMetric {
        CustomMetric::new(MetricDescriptor::new(namespace, name))
    }

    /// Line widget sharing the given title, optionally on the right axis.
    pub fn custom_line(namespace: &str, name: &str, title: &str, right_y_axis: bool) -> CustomMetric {
        CustomMetric::new(MetricDescriptor::new(namespace, name)).with_widget(WidgetFragment {
            kind: Some(WidgetKind::Line),
            width: Some(12),
            height: Some(6),
            title: Some(title.to_string()),
            right_y_axis,
            ..WidgetFragment::default()
        })
    }

    pub fn custom_single_value(namespace: &str, name: &str, kind: WidgetKind) -> CustomMetric {
        CustomMetric::new(MetricDescriptor::new(namespace, name)).with_widget(WidgetFragment {
            kind: Some(kind),
            width: Some(6),
            height: Some(6),
            ..WidgetFragment::default()
        })
    }
}

pub struct RequestFixtures;

impl RequestFixtures {
    /// One function plus one compute-service, dashboard only.
    pub fn function_and_service() -> serde_json::Value {
        json!({
            "appName": "orders",
            "environment": "test",
            "resources": [
                { "resource": "orders-worker", "kind": "lambda" },
                { "resource": "orders-cluster/orders-api", "kind": "ecs-service" }
            ],
            "dashboard": { "enabled": true }
        })
    }

    pub fn database_with_alarms_without_topic() -> serde_json::Value {
        json!({
            "appName": "orders",
            "environment": "test",
            "resources": [
                { "resource": "orders-db", "kind": "rds" }
            ],
            "alarms": { "enabled": true }
        })
    }

    pub fn trust_scope_for_account(account_id: &str) -> serde_json::Value {
        json!({
            "name": "monitoring-sink",
            "region": "us-east-1",
            "monitoringAccountId": TEST_MONITORING_ACCOUNT,
            "scope": { "sourceAccountIds": [account_id] }
        })
    }
}
