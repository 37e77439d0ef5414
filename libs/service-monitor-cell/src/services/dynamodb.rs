// =====================================================================================
// KEY-VALUE TABLE (DYNAMODB) MONITOR
// =====================================================================================

use shared_models::{
    AlarmRule, ComparisonOperator, MetricDescriptor, Statistic, WidgetSpec,
};

use crate::catalog::{NS_DYNAMODB, TABLE_SYSTEM_ERROR_THRESHOLD, TABLE_THROTTLE_THRESHOLD};
use crate::models::{MonitorConfig, ProviderFeature, ResourceKind};
use crate::services::{append_custom, series, title, FeatureSet, ServiceMonitor};

const CATALOG: [&str; 7] = [
    "ConsumedReadCapacityUnits",
    "ConsumedWriteCapacityUnits",
    "ReadThrottleEvents",
    "WriteThrottleEvents",
    "SuccessfulRequestLatency",
    "SystemErrors",
    "UserErrors",
];

pub struct DynamoDbMonitor {
    config: MonitorConfig,
    features: FeatureSet,
}

impl DynamoDbMonitor {
    pub fn new(config: MonitorConfig) -> Self {
        Self {
            config,
            features: FeatureSet::default(),
        }
    }

    fn metric(&self, name: &str) -> MetricDescriptor {
        MetricDescriptor::new(NS_DYNAMODB, name).with_dimension("TableName", &self.config.resource_name)
    }

    fn throttle_alarm(&self, name: &str, operation: &str) -> AlarmRule {
        AlarmRule::on(
            &self.metric(name),
            Statistic::Sum,
            ComparisonOperator::GreaterThan,
            TABLE_THROTTLE_THRESHOLD,
            format!("{} {} requests are being throttled", self.config.label(), operation),
        )
    }
}

impl ServiceMonitor for DynamoDbMonitor {
    fn kind(&self) -> ResourceKind {
        ResourceKind::DynamoDb
    }

    fn config(&self) -> &MonitorConfig {
        &self.config
    }

    fn enable(&mut self) {
        self.features.turn_on(ProviderFeature::ContributorInsights);
    }

    fn enabled_features(&self) -> Vec<ProviderFeature> {
        self.features.to_vec()
    }

    fn metrics(&self) -> Vec<MetricDescriptor> {
        let catalog = CATALOG.iter().map(|name| self.metric(name)).collect();
        append_custom(catalog, &self.config)
    }

    fn widgets(&self) -> Vec<WidgetSpec> {
        vec![
            WidgetSpec::line(title(&self.config, "Consumed Capacity"))
                .left(series(&self.metric("ConsumedReadCapacityUnits"), Statistic::Sum, "Read"))
                .left(series(&self.metric("ConsumedWriteCapacityUnits"), Statistic::Sum, "Write")),
            WidgetSpec::line(title(&self.config, "Throttles"))
                .left(series(&self.metric("ReadThrottleEvents"), Statistic::Sum, "Read"))
                .left(series(&self.metric("WriteThrottleEvents"), Statistic::Sum, "Write")),
            WidgetSpec::line(title(&self.config, "Latency"))
                .left(series(&self.metric("SuccessfulRequestLatency"), Statistic::Average, "Latency")),
            WidgetSpec::line(title(&self.config, "Errors"))
                .left(series(&self.metric("SystemErrors"), Statistic::Sum, "System"))
                .left(series(&self.metric("UserErrors"), Statistic::Sum, "User")),
        ]
    }

    fn alarms(&self) -> Vec<AlarmRule> {
        vec![
            self.throttle_alarm("ReadThrottleEvents", "read"),
            self.throttle_alarm("WriteThrottleEvents", "write"),
            AlarmRule::on(
                &self.metric("SystemErrors"),
                Statistic::Sum,
                ComparisonOperator::GreaterThan,
                TABLE_SYSTEM_ERROR_THRESHOLD,
                format!("{} is returning system errors", self.config.label()),
            ),
        ]
    }
}
