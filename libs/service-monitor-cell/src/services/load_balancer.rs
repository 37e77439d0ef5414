// =====================================================================================
// LOAD BALANCER MONITORS (LAYER 7 / LAYER 4)
// =====================================================================================

use shared_models::{
    AlarmRule, ComparisonOperator, MetricDescriptor, Statistic, WidgetSpec,
};

use crate::catalog::{
    ALB_RESPONSE_TIME_THRESHOLD_SECONDS, ALB_TARGET_5XX_THRESHOLD, NLB_TARGET_RESET_THRESHOLD,
    NS_ALB, NS_NLB, UNHEALTHY_HOST_THRESHOLD,
};
use crate::models::{MonitorConfig, ProviderFeature, ResourceKind};
use crate::services::{append_custom, series, title, ServiceMonitor};

fn load_balancer_metric(namespace: &str, config: &MonitorConfig, name: &str) -> MetricDescriptor {
    MetricDescriptor::new(namespace, name).with_dimension("LoadBalancer", &config.resource_name)
}

fn unhealthy_host_alarm(namespace: &str, config: &MonitorConfig) -> AlarmRule {
    AlarmRule::on(
        &load_balancer_metric(namespace, config, "UnHealthyHostCount"),
        Statistic::Maximum,
        ComparisonOperator::GreaterThan,
        UNHEALTHY_HOST_THRESHOLD,
        format!("{} has unhealthy targets", config.label()),
    )
    .evaluated_over(2)
}

// =====================================================================================
// APPLICATION LOAD BALANCER
// =====================================================================================

/// Resource name is the provider's full name, e.g. `app/orders/50dc6c495c0c9188`.
pub struct AlbMonitor {
    config: MonitorConfig,
}

impl AlbMonitor {
    pub fn new(config: MonitorConfig) -> Self {
        Self { config }
    }

    fn metric(&self, name: &str) -> MetricDescriptor {
        load_balancer_metric(NS_ALB, &self.config, name)
    }
}

impl ServiceMonitor for AlbMonitor {
    fn kind(&self) -> ResourceKind {
        ResourceKind::Alb
    }

    fn config(&self) -> &MonitorConfig {
        &self.config
    }

    // Load balancer metrics are published without any opt-in.
    fn enable(&mut self) {}

    fn enabled_features(&self) -> Vec<ProviderFeature> {
        Vec::new()
    }

    fn metrics(&self) -> Vec<MetricDescriptor> {
        let catalog = [
            "RequestCount",
            "TargetResponseTime",
            "HTTPCode_Target_5XX_Count",
            "HTTPCode_ELB_5XX_Count",
            "HealthyHostCount",
            "UnHealthyHostCount",
            "ActiveConnectionCount",
        ]
        .iter()
        .map(|name| self.metric(name))
        .collect();
        append_custom(catalog, &self.config)
    }

    fn widgets(&self) -> Vec<WidgetSpec> {
        vec![
            WidgetSpec::line(title(&self.config, "Requests"))
                .left(series(&self.metric("RequestCount"), Statistic::Sum, "Requests"))
                .right(series(&self.metric("ActiveConnectionCount"), Statistic::Sum, "Active connections")),
            WidgetSpec::line(title(&self.config, "Response Time"))
                .left(series(&self.metric("TargetResponseTime"), Statistic::Average, "Average")),
            WidgetSpec::line(title(&self.config, "5XX Errors"))
                .left(series(&self.metric("HTTPCode_Target_5XX_Count"), Statistic::Sum, "Target 5XX"))
                .left(series(&self.metric("HTTPCode_ELB_5XX_Count"), Statistic::Sum, "ELB 5XX")),
            WidgetSpec::line(title(&self.config, "Host Health"))
                .left(series(&self.metric("HealthyHostCount"), Statistic::Average, "Healthy"))
                .left(series(&self.metric("UnHealthyHostCount"), Statistic::Average, "Unhealthy")),
        ]
    }

    fn alarms(&self) -> Vec<AlarmRule> {
        vec![
            AlarmRule::on(
                &self.metric("HTTPCode_Target_5XX_Count"),
                Statistic::Sum,
                ComparisonOperator::GreaterThan,
                ALB_TARGET_5XX_THRESHOLD,
                format!("{} targets returned more than {} 5XX responses", self.config.label(), ALB_TARGET_5XX_THRESHOLD),
            ),
            AlarmRule::on(
                &self.metric("TargetResponseTime"),
                Statistic::Average,
                ComparisonOperator::GreaterThan,
                ALB_RESPONSE_TIME_THRESHOLD_SECONDS,
                format!("{} response time above {}s", self.config.label(), ALB_RESPONSE_TIME_THRESHOLD_SECONDS),
            )
            .evaluated_over(2),
            unhealthy_host_alarm(NS_ALB, &self.config),
        ]
    }
}

// =====================================================================================
// NETWORK LOAD BALANCER
// =====================================================================================

pub struct NlbMonitor {
    config: MonitorConfig,
}

impl NlbMonitor {
    pub fn new(config: MonitorConfig) -> Self {
        Self { config }
    }

    fn metric(&self, name: &str) -> MetricDescriptor {
        load_balancer_metric(NS_NLB, &self.config, name)
    }
}

impl ServiceMonitor for NlbMonitor {
    fn kind(&self) -> ResourceKind {
        ResourceKind::Nlb
    }

    fn config(&self) -> &MonitorConfig {
        &self.config
    }

    fn enable(&mut self) {}

    fn enabled_features(&self) -> Vec<ProviderFeature> {
        Vec::new()
    }

    fn metrics(&self) -> Vec<MetricDescriptor> {
        let catalog = [
            "ActiveFlowCount",
            "NewFlowCount",
            "ProcessedBytes",
            "TCP_Client_Reset_Count",
            "TCP_Target_Reset_Count",
            "HealthyHostCount",
            "UnHealthyHostCount",
        ]
        .iter()
        .map(|name| self.metric(name))
        .collect();
        append_custom(catalog, &self.config)
    }

    fn widgets(&self) -> Vec<WidgetSpec> {
        vec![
            WidgetSpec::line(title(&self.config, "Flows"))
                .left(series(&self.metric("ActiveFlowCount"), Statistic::Average, "Active"))
                .left(series(&self.metric("NewFlowCount"), Statistic::Sum, "New")),
            WidgetSpec::line(title(&self.config, "Processed Bytes"))
                .left(series(&self.metric("ProcessedBytes"), Statistic::Sum, "Bytes")),
            WidgetSpec::line(title(&self.config, "TCP Resets"))
                .left(series(&self.metric("TCP_Client_Reset_Count"), Statistic::Sum, "Client"))
                .left(series(&self.metric("TCP_Target_Reset_Count"), Statistic::Sum, "Target")),
            WidgetSpec::line(title(&self.config, "Host Health"))
                .left(series(&self.metric("HealthyHostCount"), Statistic::Average, "Healthy"))
                .left(series(&self.metric("UnHealthyHostCount"), Statistic::Average, "Unhealthy")),
        ]
    }

    fn alarms(&self) -> Vec<AlarmRule> {
        vec![
            unhealthy_host_alarm(NS_NLB, &self.config),
            AlarmRule::on(
                &self.metric("TCP_Target_Reset_Count"),
                Statistic::Sum,
                ComparisonOperator::GreaterThan,
                NLB_TARGET_RESET_THRESHOLD,
                format!("{} targets are resetting connections", self.config.label()),
            ),
        ]
    }
}
