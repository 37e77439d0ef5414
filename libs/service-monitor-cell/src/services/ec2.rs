// =====================================================================================
// VIRTUAL MACHINE (EC2) MONITOR
// =====================================================================================

use shared_models::{
    AlarmRule, ComparisonOperator, MetricDescriptor, Statistic, WidgetSpec,
};

use crate::catalog::{CPU_UTILIZATION_THRESHOLD_PERCENT, INSTANCE_STATUS_CHECK_THRESHOLD, NS_EC2};
use crate::models::{MonitorConfig, ProviderFeature, ResourceKind};
use crate::services::{append_custom, series, title, FeatureSet, ServiceMonitor};

pub struct Ec2Monitor {
    config: MonitorConfig,
    features: FeatureSet,
}

impl Ec2Monitor {
    pub fn new(config: MonitorConfig) -> Self {
        Self {
            config,
            features: FeatureSet::default(),
        }
    }

    fn metric(&self, name: &str) -> MetricDescriptor {
        MetricDescriptor::new(NS_EC2, name).with_dimension("InstanceId", &self.config.resource_name)
    }
}

impl ServiceMonitor for Ec2Monitor {
    fn kind(&self) -> ResourceKind {
        ResourceKind::Ec2
    }

    fn config(&self) -> &MonitorConfig {
        &self.config
    }

    fn enable(&mut self) {
        if self.config.detailed_monitoring {
            self.features.turn_on(ProviderFeature::DetailedMonitoring);
        }
    }

    fn enabled_features(&self) -> Vec<ProviderFeature> {
        self.features.to_vec()
    }

    fn metrics(&self) -> Vec<MetricDescriptor> {
        let catalog = [
            "CPUUtilization",
            "NetworkIn",
            "NetworkOut",
            "DiskReadOps",
            "DiskWriteOps",
            "StatusCheckFailed",
        ]
        .iter()
        .map(|name| self.metric(name))
        .collect();
        append_custom(catalog, &self.config)
    }

    fn widgets(&self) -> Vec<WidgetSpec> {
        let period = self.config.period_seconds();
        vec![
            WidgetSpec::line(title(&self.config, "CPU Utilization"))
                .left(series(&self.metric("CPUUtilization"), Statistic::Average, "CPU %").with_period(period)),
            WidgetSpec::line(title(&self.config, "Network"))
                .left(series(&self.metric("NetworkIn"), Statistic::Sum, "In").with_period(period))
                .left(series(&self.metric("NetworkOut"), Statistic::Sum, "Out").with_period(period)),
            WidgetSpec::line(title(&self.config, "Disk Operations"))
                .left(series(&self.metric("DiskReadOps"), Statistic::Sum, "Read").with_period(period))
                .left(series(&self.metric("DiskWriteOps"), Statistic::Sum, "Write").with_period(period)),
            WidgetSpec::number(title(&self.config, "Status Checks"))
                .sized(6, 6)
                .left(series(&self.metric("StatusCheckFailed"), Statistic::Maximum, "Failed").with_period(period)),
        ]
    }

    fn alarms(&self) -> Vec<AlarmRule> {
        let period = self.config.period_seconds();
        vec![
            AlarmRule::on(
                &self.metric("CPUUtilization"),
                Statistic::Average,
                ComparisonOperator::GreaterThan,
                CPU_UTILIZATION_THRESHOLD_PERCENT,
                format!("{} CPU above {}%", self.config.label(), CPU_UTILIZATION_THRESHOLD_PERCENT),
            )
            .with_period(period)
            .evaluated_over(2),
            AlarmRule::on(
                &self.metric("StatusCheckFailed"),
                Statistic::Maximum,
                ComparisonOperator::GreaterThanOrEqual,
                INSTANCE_STATUS_CHECK_THRESHOLD,
                format!("{} failed a status check", self.config.label()),
            )
            .with_period(period),
        ]
    }
}
