// =====================================================================================
// CONTAINER SERVICE / CLUSTER (ECS) MONITORS
// =====================================================================================

use shared_models::{
    AlarmRule, ComparisonOperator, Dimensions, MetricDescriptor, Statistic, WidgetSpec,
};

use crate::catalog::{
    CPU_UTILIZATION_THRESHOLD_PERCENT, ECS_LOG_GROUP_PREFIX, MEMORY_UTILIZATION_THRESHOLD_PERCENT,
    MIN_RUNNING_TASKS, NS_CONTAINER_INSIGHTS, NS_ECS,
};
use crate::models::{MonitorConfig, ProviderFeature, ResourceKind};
use crate::services::{append_custom, series, title, FeatureSet, ServiceMonitor};

/// Service resources resolve to `"<cluster>/<service>"`; a bare service name
/// drops the ClusterName dimension.
fn split_service_name(resource_name: &str) -> (Option<&str>, &str) {
    match resource_name.split_once('/') {
        Some((cluster, service)) if !cluster.is_empty() => (Some(cluster), service),
        Some((_, service)) => (None, service),
        None => (None, resource_name),
    }
}

// =====================================================================================
// ECS SERVICE
// =====================================================================================

pub struct EcsServiceMonitor {
    config: MonitorConfig,
    features: FeatureSet,
    dimensions: Dimensions,
    service_name: String,
}

impl EcsServiceMonitor {
    pub fn new(config: MonitorConfig) -> Self {
        let (cluster, service) = split_service_name(&config.resource_name);
        let mut dimensions = Dimensions::new();
        if let Some(cluster) = cluster {
            dimensions.insert("ClusterName".to_string(), cluster.to_string());
        }
        dimensions.insert("ServiceName".to_string(), service.to_string());

        Self {
            service_name: service.to_string(),
            config,
            features: FeatureSet::default(),
            dimensions,
        }
    }

    fn metric(&self, namespace: &str, name: &str) -> MetricDescriptor {
        MetricDescriptor::new(namespace, name).with_dimensions(&self.dimensions)
    }
}

impl ServiceMonitor for EcsServiceMonitor {
    fn kind(&self) -> ResourceKind {
        ResourceKind::EcsService
    }

    fn config(&self) -> &MonitorConfig {
        &self.config
    }

    fn enable(&mut self) {
        self.features.turn_on(ProviderFeature::ContainerInsights);
    }

    fn enabled_features(&self) -> Vec<ProviderFeature> {
        self.features.to_vec()
    }

    fn metrics(&self) -> Vec<MetricDescriptor> {
        let catalog = vec![
            self.metric(NS_ECS, "CPUUtilization"),
            self.metric(NS_ECS, "MemoryUtilization"),
            self.metric(NS_CONTAINER_INSIGHTS, "RunningTaskCount"),
        ];
        append_custom(catalog, &self.config)
    }

    fn widgets(&self) -> Vec<WidgetSpec> {
        vec![
            WidgetSpec::line(title(&self.config, "CPU & Memory"))
                .left(series(&self.metric(NS_ECS, "CPUUtilization"), Statistic::Average, "CPU %"))
                .left(series(&self.metric(NS_ECS, "MemoryUtilization"), Statistic::Average, "Memory %")),
            WidgetSpec::number(title(&self.config, "Running Tasks"))
                .sized(6, 6)
                .left(series(
                    &self.metric(NS_CONTAINER_INSIGHTS, "RunningTaskCount"),
                    Statistic::Average,
                    "Running",
                )),
        ]
    }

    fn alarms(&self) -> Vec<AlarmRule> {
        let label = self.config.label();
        vec![
            AlarmRule::on(
                &self.metric(NS_ECS, "CPUUtilization"),
                Statistic::Average,
                ComparisonOperator::GreaterThan,
                CPU_UTILIZATION_THRESHOLD_PERCENT,
                format!("{} CPU above {}%", label, CPU_UTILIZATION_THRESHOLD_PERCENT),
            )
            .evaluated_over(2),
            AlarmRule::on(
                &self.metric(NS_ECS, "MemoryUtilization"),
                Statistic::Average,
                ComparisonOperator::GreaterThan,
                MEMORY_UTILIZATION_THRESHOLD_PERCENT,
                format!("{} memory above {}%", label, MEMORY_UTILIZATION_THRESHOLD_PERCENT),
            )
            .evaluated_over(2),
            AlarmRule::on(
                &self.metric(NS_CONTAINER_INSIGHTS, "RunningTaskCount"),
                Statistic::Minimum,
                ComparisonOperator::LessThan,
                MIN_RUNNING_TASKS,
                format!("{} has no running tasks", label),
            ),
        ]
    }

    fn log_groups(&self) -> Vec<String> {
        vec![format!("{}{}", ECS_LOG_GROUP_PREFIX, self.service_name)]
    }
}

// =====================================================================================
// ECS CLUSTER
// =====================================================================================

pub struct EcsClusterMonitor {
    config: MonitorConfig,
    features: FeatureSet,
}

impl EcsClusterMonitor {
    pub fn new(config: MonitorConfig) -> Self {
        Self {
            config,
            features: FeatureSet::default(),
        }
    }

    fn metric(&self, namespace: &str, name: &str) -> MetricDescriptor {
        MetricDescriptor::new(namespace, name).with_dimension("ClusterName", &self.config.resource_name)
    }
}

impl ServiceMonitor for EcsClusterMonitor {
    fn kind(&self) -> ResourceKind {
        ResourceKind::EcsCluster
    }

    fn config(&self) -> &MonitorConfig {
        &self.config
    }

    fn enable(&mut self) {
        self.features.turn_on(ProviderFeature::ContainerInsights);
    }

    fn enabled_features(&self) -> Vec<ProviderFeature> {
        self.features.to_vec()
    }

    fn metrics(&self) -> Vec<MetricDescriptor> {
        let catalog = vec![
            self.metric(NS_ECS, "CPUUtilization"),
            self.metric(NS_ECS, "MemoryUtilization"),
            self.metric(NS_ECS, "CPUReservation"),
            self.metric(NS_ECS, "MemoryReservation"),
            self.metric(NS_CONTAINER_INSIGHTS, "TaskCount"),
            self.metric(NS_CONTAINER_INSIGHTS, "ServiceCount"),
        ];
        append_custom(catalog, &self.config)
    }

    fn widgets(&self) -> Vec<WidgetSpec> {
        vec![
            WidgetSpec::line(title(&self.config, "Utilization"))
                .left(series(&self.metric(NS_ECS, "CPUUtilization"), Statistic::Average, "CPU %"))
                .left(series(&self.metric(NS_ECS, "MemoryUtilization"), Statistic::Average, "Memory %")),
            WidgetSpec::line(title(&self.config, "Reservation"))
                .left(series(&self.metric(NS_ECS, "CPUReservation"), Statistic::Average, "CPU reserved %"))
                .left(series(
                    &self.metric(NS_ECS, "MemoryReservation"),
                    Statistic::Average,
                    "Memory reserved %",
                )),
            WidgetSpec::number(title(&self.config, "Tasks & Services"))
                .left(series(&self.metric(NS_CONTAINER_INSIGHTS, "TaskCount"), Statistic::Average, "Tasks"))
                .left(series(
                    &self.metric(NS_CONTAINER_INSIGHTS, "ServiceCount"),
                    Statistic::Average,
                    "Services",
                )),
        ]
    }

    fn alarms(&self) -> Vec<AlarmRule> {
        let label = self.config.label();
        vec![
            AlarmRule::on(
                &self.metric(NS_ECS, "CPUUtilization"),
                Statistic::Average,
                ComparisonOperator::GreaterThan,
                CPU_UTILIZATION_THRESHOLD_PERCENT,
                format!("{} cluster CPU above {}%", label, CPU_UTILIZATION_THRESHOLD_PERCENT),
            )
            .evaluated_over(2),
            AlarmRule::on(
                &self.metric(NS_ECS, "MemoryUtilization"),
                Statistic::Average,
                ComparisonOperator::GreaterThan,
                MEMORY_UTILIZATION_THRESHOLD_PERCENT,
                format!("{} cluster memory above {}%", label, MEMORY_UTILIZATION_THRESHOLD_PERCENT),
            )
            .evaluated_over(2),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn service_name_carries_cluster_dimension() {
        let monitor = EcsServiceMonitor::new(MonitorConfig::new("orders-cluster/orders-api"));
        let cpu = &monitor.metrics()[0];

        assert_eq!(cpu.dimensions.get("ClusterName").map(String::as_str), Some("orders-cluster"));
        assert_eq!(cpu.dimensions.get("ServiceName").map(String::as_str), Some("orders-api"));
        assert_eq!(monitor.log_groups(), vec!["/ecs/orders-api".to_string()]);
    }

    #[test]
    fn bare_service_name_omits_cluster() {
        let monitor = EcsServiceMonitor::new(MonitorConfig::new("orders-api"));
        let cpu = &monitor.metrics()[0];

        assert!(cpu.dimensions.get("ClusterName").is_none());
        assert_eq!(cpu.dimensions.len(), 1);
    }

    #[test]
    fn cluster_enable_turns_on_container_insights_once() {
        let mut monitor = EcsClusterMonitor::new(MonitorConfig::new("orders-cluster"));
        monitor.enable();
        monitor.enable();
        assert_eq!(monitor.enabled_features(), vec![ProviderFeature::ContainerInsights]);
    }
}
