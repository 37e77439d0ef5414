// =====================================================================================
// FUNCTION (LAMBDA) MONITOR
// =====================================================================================

use shared_models::{
    AlarmRule, ComparisonOperator, MetricDescriptor, Statistic, WidgetSpec,
};

use crate::catalog::{
    FUNCTION_CONCURRENCY_LIMIT, FUNCTION_DURATION_THRESHOLD_MS, FUNCTION_ERROR_THRESHOLD,
    FUNCTION_THROTTLE_THRESHOLD, LAMBDA_LOG_GROUP_PREFIX, NS_LAMBDA,
};
use crate::models::{MonitorConfig, ProviderFeature, ResourceKind};
use crate::services::{append_custom, series, title, FeatureSet, ServiceMonitor};

pub struct LambdaMonitor {
    config: MonitorConfig,
    features: FeatureSet,
}

impl LambdaMonitor {
    pub fn new(config: MonitorConfig) -> Self {
        Self {
            config,
            features: FeatureSet::default(),
        }
    }

    fn metric(&self, name: &str) -> MetricDescriptor {
        MetricDescriptor::new(NS_LAMBDA, name).with_dimension("FunctionName", &self.config.resource_name)
    }
}

impl ServiceMonitor for LambdaMonitor {
    fn kind(&self) -> ResourceKind {
        ResourceKind::Lambda
    }

    fn config(&self) -> &MonitorConfig {
        &self.config
    }

    fn enable(&mut self) {
        self.features.turn_on(ProviderFeature::ActiveTracing);
    }

    fn enabled_features(&self) -> Vec<ProviderFeature> {
        self.features.to_vec()
    }

    fn metrics(&self) -> Vec<MetricDescriptor> {
        let catalog = ["Invocations", "Errors", "Throttles", "Duration", "ConcurrentExecutions"]
            .iter()
            .map(|name| self.metric(name))
            .collect();
        append_custom(catalog, &self.config)
    }

    fn widgets(&self) -> Vec<WidgetSpec> {
        let invocations = self.metric("Invocations");
        let errors = self.metric("Errors");
        let duration = self.metric("Duration");

        vec![
            WidgetSpec::line(title(&self.config, "Invocations & Errors"))
                .left(series(&invocations, Statistic::Sum, "Invocations"))
                .right(series(&errors, Statistic::Sum, "Errors")),
            WidgetSpec::line(title(&self.config, "Duration"))
                .left(series(&duration, Statistic::Average, "Average"))
                .left(series(&duration, Statistic::Maximum, "Maximum")),
            WidgetSpec::line(title(&self.config, "Throttles"))
                .left(series(&self.metric("Throttles"), Statistic::Sum, "Throttles")),
            WidgetSpec::gauge(title(&self.config, "Concurrency"), 0.0, FUNCTION_CONCURRENCY_LIMIT)
                .sized(6, 6)
                .left(series(&self.metric("ConcurrentExecutions"), Statistic::Maximum, "Concurrent")),
        ]
    }

    fn alarms(&self) -> Vec<AlarmRule> {
        vec![
            AlarmRule::on(
                &self.metric("Errors"),
                Statistic::Sum,
                ComparisonOperator::GreaterThan,
                FUNCTION_ERROR_THRESHOLD,
                format!("{} errors exceed {} per 5 minutes", self.config.label(), FUNCTION_ERROR_THRESHOLD),
            ),
            AlarmRule::on(
                &self.metric("Throttles"),
                Statistic::Sum,
                ComparisonOperator::GreaterThan,
                FUNCTION_THROTTLE_THRESHOLD,
                format!("{} is being throttled", self.config.label()),
            ),
            AlarmRule::on(
                &self.metric("Duration"),
                Statistic::Average,
                ComparisonOperator::GreaterThan,
                FUNCTION_DURATION_THRESHOLD_MS,
                format!("{} average duration is close to its timeout", self.config.label()),
            ),
        ]
    }

    fn log_groups(&self) -> Vec<String> {
        vec![format!("{}{}", LAMBDA_LOG_GROUP_PREFIX, self.config.resource_name)]
    }
}
