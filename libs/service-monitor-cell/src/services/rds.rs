// =====================================================================================
// RELATIONAL DATABASE (RDS) MONITOR
// =====================================================================================

use shared_models::{
    AlarmRule, ComparisonOperator, MetricDescriptor, Statistic, WidgetSpec,
};

use crate::catalog::{
    DATABASE_CONNECTIONS_THRESHOLD, DATABASE_CPU_THRESHOLD_PERCENT,
    DATABASE_FREE_STORAGE_THRESHOLD_BYTES, NS_RDS,
};
use crate::models::{MonitorConfig, ProviderFeature, ResourceKind};
use crate::services::{append_custom, series, title, FeatureSet, ServiceMonitor};

const CATALOG: [&str; 8] = [
    "CPUUtilization",
    "DatabaseConnections",
    "FreeStorageSpace",
    "FreeableMemory",
    "ReadLatency",
    "WriteLatency",
    "ReadIOPS",
    "WriteIOPS",
];

pub struct RdsMonitor {
    config: MonitorConfig,
    features: FeatureSet,
}

impl RdsMonitor {
    pub fn new(config: MonitorConfig) -> Self {
        Self {
            config,
            features: FeatureSet::default(),
        }
    }

    fn metric(&self, name: &str) -> MetricDescriptor {
        MetricDescriptor::new(NS_RDS, name)
            .with_dimension("DBInstanceIdentifier", &self.config.resource_name)
    }
}

impl ServiceMonitor for RdsMonitor {
    fn kind(&self) -> ResourceKind {
        ResourceKind::Rds
    }

    fn config(&self) -> &MonitorConfig {
        &self.config
    }

    fn enable(&mut self) {
        self.features.turn_on(ProviderFeature::EnhancedMonitoring);
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
            WidgetSpec::line(title(&self.config, "CPU Utilization"))
                .left(series(&self.metric("CPUUtilization"), Statistic::Average, "CPU %")),
            WidgetSpec::line(title(&self.config, "Connections"))
                .left(series(&self.metric("DatabaseConnections"), Statistic::Average, "Connections")),
            WidgetSpec::line(title(&self.config, "Storage & Memory"))
                .left(series(&self.metric("FreeStorageSpace"), Statistic::Minimum, "Free storage"))
                .right(series(&self.metric("FreeableMemory"), Statistic::Minimum, "Freeable memory")),
            WidgetSpec::line(title(&self.config, "Latency"))
                .left(series(&self.metric("ReadLatency"), Statistic::Average, "Read"))
                .left(series(&self.metric("WriteLatency"), Statistic::Average, "Write")),
            WidgetSpec::line(title(&self.config, "IOPS"))
                .left(series(&self.metric("ReadIOPS"), Statistic::Average, "Read"))
                .left(series(&self.metric("WriteIOPS"), Statistic::Average, "Write")),
        ]
    }

    fn alarms(&self) -> Vec<AlarmRule> {
        let label = self.config.label();
        vec![
            AlarmRule::on(
                &self.metric("CPUUtilization"),
                Statistic::Average,
                ComparisonOperator::GreaterThan,
                DATABASE_CPU_THRESHOLD_PERCENT,
                format!("{} CPU above {}%", label, DATABASE_CPU_THRESHOLD_PERCENT),
            )
            .evaluated_over(2),
            AlarmRule::on(
                &self.metric("FreeStorageSpace"),
                Statistic::Minimum,
                ComparisonOperator::LessThan,
                DATABASE_FREE_STORAGE_THRESHOLD_BYTES,
                format!("{} is running out of storage", label),
            ),
            AlarmRule::on(
                &self.metric("DatabaseConnections"),
                Statistic::Average,
                ComparisonOperator::GreaterThan,
                DATABASE_CONNECTIONS_THRESHOLD,
                format!("{} has more than {} connections", label, DATABASE_CONNECTIONS_THRESHOLD),
            ),
        ]
    }
}
