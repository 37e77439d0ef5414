use std::collections::BTreeSet;

use shared_models::{AlarmRule, MetricDescriptor, Statistic, WidgetSeries, WidgetSpec};

use crate::models::{MonitorConfig, ProviderFeature, ResourceKind};

pub mod dynamodb;
pub mod ec2;
pub mod ecs;
pub mod lambda;
pub mod load_balancer;
pub mod rds;
pub mod s3;

pub use dynamodb::DynamoDbMonitor;
pub use ec2::Ec2Monitor;
pub use ecs::{EcsClusterMonitor, EcsServiceMonitor};
pub use lambda::LambdaMonitor;
pub use load_balancer::{AlbMonitor, NlbMonitor};
pub use rds::RdsMonitor;
pub use s3::S3Monitor;

/// Monitoring contract implemented once per resource kind.
///
/// `metrics`, `widgets` and `alarms` are pure functions of the fixed catalog and
/// the config the strategy was built with. Caller-supplied custom metrics are
/// appended verbatim to `metrics`; deduplication happens further up.
pub trait ServiceMonitor: Send + Sync {
    fn kind(&self) -> ResourceKind;

    fn config(&self) -> &MonitorConfig;

    /// Turns on provider-side telemetry for the resource. Calling it again is a no-op.
    fn enable(&mut self);

    fn enabled_features(&self) -> Vec<ProviderFeature>;

    fn metrics(&self) -> Vec<MetricDescriptor>;

    fn widgets(&self) -> Vec<WidgetSpec>;

    fn alarms(&self) -> Vec<AlarmRule>;

    /// Log groups owned by the resource, shared alongside its metrics.
    fn log_groups(&self) -> Vec<String> {
        Vec::new()
    }
}

#[derive(Debug, Clone, Default)]
pub(crate) struct FeatureSet(BTreeSet<ProviderFeature>);

impl FeatureSet {
    pub(crate) fn turn_on(&mut self, feature: ProviderFeature) {
        if self.0.insert(feature) {
            tracing::debug!(?feature, "provider feature enabled");
        }
    }

    pub(crate) fn to_vec(&self) -> Vec<ProviderFeature> {
        self.0.iter().copied().collect()
    }
}

pub(crate) fn append_custom(mut catalog: Vec<MetricDescriptor>, config: &MonitorConfig) -> Vec<MetricDescriptor> {
    catalog.extend(config.custom_metrics.iter().cloned());
    catalog
}

pub(crate) fn series(metric: &MetricDescriptor, statistic: Statistic, label: &str) -> WidgetSeries {
    WidgetSeries::new(metric.clone(), statistic).labeled(label)
}

pub(crate) fn title(config: &MonitorConfig, suffix: &str) -> String {
    format!("{} - {}", config.label(), suffix)
}
