// =====================================================================================
// OBJECT STORE (S3) MONITOR
// =====================================================================================

use shared_models::{
    AlarmRule, ComparisonOperator, MetricDescriptor, Statistic, WidgetSpec,
};

use crate::catalog::{
    BUCKET_5XX_THRESHOLD, BUCKET_REQUEST_FILTER_ID, BUCKET_STORAGE_PERIOD_SECONDS, NS_S3,
};
use crate::models::{MonitorConfig, ProviderFeature, ResourceKind};
use crate::services::{append_custom, series, title, FeatureSet, ServiceMonitor};

/// Storage metrics are always available; request metrics need the bucket's
/// request-metrics configuration, which `enable` turns on for detailed monitoring.
pub struct S3Monitor {
    config: MonitorConfig,
    features: FeatureSet,
}

impl S3Monitor {
    pub fn new(config: MonitorConfig) -> Self {
        Self {
            config,
            features: FeatureSet::default(),
        }
    }

    fn bucket_metric(&self, name: &str) -> MetricDescriptor {
        MetricDescriptor::new(NS_S3, name).with_dimension("BucketName", &self.config.resource_name)
    }

    fn storage_metric(&self, name: &str, storage_type: &str) -> MetricDescriptor {
        self.bucket_metric(name).with_dimension("StorageType", storage_type)
    }

    fn request_metric(&self, name: &str) -> MetricDescriptor {
        self.bucket_metric(name).with_dimension("FilterId", BUCKET_REQUEST_FILTER_ID)
    }
}

impl ServiceMonitor for S3Monitor {
    fn kind(&self) -> ResourceKind {
        ResourceKind::S3
    }

    fn config(&self) -> &MonitorConfig {
        &self.config
    }

    fn enable(&mut self) {
        if self.config.detailed_monitoring {
            self.features.turn_on(ProviderFeature::RequestMetrics);
        }
    }

    fn enabled_features(&self) -> Vec<ProviderFeature> {
        self.features.to_vec()
    }

    fn metrics(&self) -> Vec<MetricDescriptor> {
        let mut catalog = vec![
            self.storage_metric("BucketSizeBytes", "StandardStorage"),
            self.storage_metric("NumberOfObjects", "AllStorageTypes"),
        ];
        if self.config.detailed_monitoring {
            catalog.push(self.request_metric("AllRequests"));
            catalog.push(self.request_metric("4xxErrors"));
            catalog.push(self.request_metric("5xxErrors"));
        }
        append_custom(catalog, &self.config)
    }

    fn widgets(&self) -> Vec<WidgetSpec> {
        let mut widgets = vec![
            WidgetSpec::line(title(&self.config, "Bucket Size"))
                .left(
                    series(&self.storage_metric("BucketSizeBytes", "StandardStorage"), Statistic::Average, "Bytes")
                        .with_period(BUCKET_STORAGE_PERIOD_SECONDS),
                ),
            WidgetSpec::number(title(&self.config, "Objects"))
                .sized(6, 6)
                .left(
                    series(&self.storage_metric("NumberOfObjects", "AllStorageTypes"), Statistic::Average, "Objects")
                        .with_period(BUCKET_STORAGE_PERIOD_SECONDS),
                ),
        ];

        if self.config.detailed_monitoring {
            widgets.push(
                WidgetSpec::line(title(&self.config, "Requests & Errors"))
                    .left(series(&self.request_metric("AllRequests"), Statistic::Sum, "Requests"))
                    .right(series(&self.request_metric("4xxErrors"), Statistic::Sum, "4xx"))
                    .right(series(&self.request_metric("5xxErrors"), Statistic::Sum, "5xx")),
            );
        }

        widgets
    }

    fn alarms(&self) -> Vec<AlarmRule> {
        if !self.config.detailed_monitoring {
            return Vec::new();
        }

        vec![AlarmRule::on(
            &self.request_metric("5xxErrors"),
            Statistic::Sum,
            ComparisonOperator::GreaterThan,
            BUCKET_5XX_THRESHOLD,
            format!("{} is returning 5xx errors", self.config.label()),
        )]
    }
}
