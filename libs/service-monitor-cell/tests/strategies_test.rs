// =====================================================================================
// SERVICE MONITOR CELL INTEGRATION TESTS
// =====================================================================================

use assert_matches::assert_matches;

use service_monitor_cell::{
    catalog, MonitorConfig, ProviderFeature, ResourceKind, ServiceMonitor, ServiceMonitorError,
    ServiceMonitorRegistry,
};
use shared_models::{
    AlarmRule, ComparisonOperator, MetricDescriptor, Statistic, WidgetKind, WidgetSpec,
};

fn resource_name_for(kind: &ResourceKind) -> &'static str {
    match kind {
        ResourceKind::EcsService => "orders-cluster/orders-api",
        ResourceKind::EcsCluster => "orders-cluster",
        ResourceKind::Lambda => "orders-worker",
        ResourceKind::Rds => "orders-db",
        ResourceKind::DynamoDb => "orders-table",
        ResourceKind::Alb => "app/orders/50dc6c495c0c9188",
        ResourceKind::Nlb => "net/orders/7f5ce4a35d1b6a7e",
        ResourceKind::Ec2 => "i-0123456789abcdef0",
        ResourceKind::S3 => "orders-bucket",
        ResourceKind::Custom(_) => "custom-resource",
    }
}

fn build(kind: &ResourceKind, config: MonitorConfig) -> Box<dyn ServiceMonitor> {
    ServiceMonitorRegistry::with_builtin_kinds()
        .instantiate(kind, config)
        .expect("built-in kind resolves")
}

#[test]
fn test_every_builtin_kind_has_a_non_empty_catalog() {
    for kind in ResourceKind::BUILTIN {
        let monitor = build(&kind, MonitorConfig::new(resource_name_for(&kind)));

        assert_eq!(monitor.kind(), kind);
        assert!(!monitor.metrics().is_empty(), "{} has no metrics", kind);
        assert!(!monitor.widgets().is_empty(), "{} has no widgets", kind);
    }
}

#[test]
fn test_strategies_are_deterministic_and_enable_is_idempotent() {
    for kind in ResourceKind::BUILTIN {
        let config = MonitorConfig::new(resource_name_for(&kind)).detailed(true);
        let mut monitor = build(&kind, config.clone());

        monitor.enable();
        let metrics = monitor.metrics();
        let widgets = monitor.widgets();
        let alarms = monitor.alarms();
        let features = monitor.enabled_features();

        monitor.enable();
        assert_eq!(monitor.metrics(), metrics, "{} metrics changed", kind);
        assert_eq!(monitor.widgets(), widgets, "{} widgets changed", kind);
        assert_eq!(monitor.alarms(), alarms, "{} alarms changed", kind);
        assert_eq!(monitor.enabled_features(), features, "{} features changed", kind);

        let twin = build(&kind, config);
        assert_eq!(twin.metrics(), metrics);
        assert_eq!(twin.alarms(), alarms);
    }
}

#[test]
fn test_custom_metrics_are_appended_verbatim() {
    let custom = MetricDescriptor::new("Orders", "Placed").with_dimension("Channel", "web");
    let duplicated = vec![custom.clone(), custom.clone()];

    for kind in ResourceKind::BUILTIN {
        let plain = build(&kind, MonitorConfig::new(resource_name_for(&kind)));
        let with_custom = build(
            &kind,
            MonitorConfig::new(resource_name_for(&kind)).with_custom_metrics(duplicated.clone()),
        );

        let base = plain.metrics();
        let extended = with_custom.metrics();
        assert_eq!(extended.len(), base.len() + 2);
        assert_eq!(&extended[..base.len()], base.as_slice());
        assert_eq!(&extended[base.len()..], duplicated.as_slice());
    }
}

#[test]
fn test_widget_sizes_and_alarm_periods_are_valid() {
    for kind in ResourceKind::BUILTIN {
        let monitor = build(&kind, MonitorConfig::new(resource_name_for(&kind)).detailed(true));

        for widget in monitor.widgets() {
            assert!((1..=24).contains(&widget.width), "{}: {}", kind, widget.title);
            assert!((1..=24).contains(&widget.height), "{}: {}", kind, widget.title);
            assert!(widget.series_count() > 0, "{}: {} has no series", kind, widget.title);
        }
        for alarm in monitor.alarms() {
            assert!(alarm.evaluation_periods >= 1);
            assert!(alarm.period_seconds > 0);
        }
    }
}

#[test]
fn test_database_default_alarms() {
    let monitor = build(&ResourceKind::Rds, MonitorConfig::new("orders-db"));
    let alarms = monitor.alarms();

    let find = |name: &str| alarms.iter().find(|a| a.metric_name == name).cloned().unwrap();

    let cpu = find("CPUUtilization");
    assert_eq!(cpu.comparison, ComparisonOperator::GreaterThan);
    assert_eq!(cpu.threshold, 80.0);

    let storage = find("FreeStorageSpace");
    assert_eq!(storage.comparison, ComparisonOperator::LessThan);
    assert_eq!(storage.threshold, catalog::DATABASE_FREE_STORAGE_THRESHOLD_BYTES);

    let connections = find("DatabaseConnections");
    assert_eq!(connections.threshold, catalog::DATABASE_CONNECTIONS_THRESHOLD);

    let mut rds = build(&ResourceKind::Rds, MonitorConfig::new("orders-db"));
    rds.enable();
    assert_eq!(rds.enabled_features(), vec![ProviderFeature::EnhancedMonitoring]);
}

#[test]
fn test_function_default_alarms() {
    let monitor = build(&ResourceKind::Lambda, MonitorConfig::new("orders-worker"));
    let alarms = monitor.alarms();
    assert_eq!(alarms.len(), 3);

    let throttles = alarms.iter().find(|a| a.metric_name == "Throttles").unwrap();
    assert_eq!(throttles.threshold, 0.0);
    assert_eq!(throttles.statistic, Statistic::Sum);

    let duration = alarms.iter().find(|a| a.metric_name == "Duration").unwrap();
    assert_eq!(duration.statistic, Statistic::Average);
    assert_eq!(duration.threshold, catalog::FUNCTION_DURATION_THRESHOLD_MS);
}

#[test]
fn test_display_name_prefixes_widget_titles() {
    let monitor = build(
        &ResourceKind::Alb,
        MonitorConfig::new("app/orders/50dc6c495c0c9188").with_display_name("Public ALB"),
    );
    assert!(monitor.widgets().iter().all(|w| w.title.starts_with("Public ALB - ")));
}

// =====================================================================================
// REGISTRY
// =====================================================================================

struct QueueMonitor {
    config: MonitorConfig,
}

impl ServiceMonitor for QueueMonitor {
    fn kind(&self) -> ResourceKind {
        ResourceKind::Custom("sqs".to_string())
    }

    fn config(&self) -> &MonitorConfig {
        &self.config
    }

    fn enable(&mut self) {}

    fn enabled_features(&self) -> Vec<ProviderFeature> {
        Vec::new()
    }

    fn metrics(&self) -> Vec<MetricDescriptor> {
        let mut metrics = vec![MetricDescriptor::new("AWS/SQS", "ApproximateNumberOfMessagesVisible")
            .with_dimension("QueueName", &self.config.resource_name)];
        metrics.extend(self.config.custom_metrics.iter().cloned());
        metrics
    }

    fn widgets(&self) -> Vec<WidgetSpec> {
        vec![WidgetSpec::new(WidgetKind::Text, "Queue").sized(24, 2)]
    }

    fn alarms(&self) -> Vec<AlarmRule> {
        Vec::new()
    }
}

#[test]
fn test_unknown_kind_is_reported() {
    let registry = ServiceMonitorRegistry::empty();
    assert_matches!(
        registry.resolve(&ResourceKind::Lambda).err(),
        Some(ServiceMonitorError::UnknownResourceKind(ResourceKind::Lambda))
    );
}

#[test]
fn test_custom_kinds_are_pure_additions() {
    let mut registry = ServiceMonitorRegistry::with_builtin_kinds();
    let before = registry.kinds().len();
    let queue = ResourceKind::Custom("sqs".to_string());

    registry
        .register(queue.clone(), |config| Box::new(QueueMonitor { config }))
        .expect("new kind registers");

    assert_eq!(registry.kinds().len(), before + 1);
    let monitor = registry.instantiate(&queue, MonitorConfig::new("orders-queue")).unwrap();
    assert_eq!(monitor.metrics().len(), 1);

    assert_matches!(
        registry.register(ResourceKind::Lambda, |config| Box::new(QueueMonitor { config })),
        Err(ServiceMonitorError::KindAlreadyRegistered(ResourceKind::Lambda))
    );
    let lambda = registry.instantiate(&ResourceKind::Lambda, MonitorConfig::new("fn")).unwrap();
    assert_eq!(lambda.kind(), ResourceKind::Lambda);
}

#[test]
fn test_custom_kind_cannot_shadow_a_builtin_tag() {
    let mut registry = ServiceMonitorRegistry::with_builtin_kinds();
    let before = registry.kinds().len();

    assert_matches!(
        registry.register(ResourceKind::Custom("lambda".to_string()), |config| {
            Box::new(QueueMonitor { config })
        }),
        Err(ServiceMonitorError::ReservedKindTag(tag)) if tag == "lambda"
    );
    assert_eq!(registry.kinds().len(), before);

    let mut empty = ServiceMonitorRegistry::empty();
    assert_matches!(
        empty.register(ResourceKind::Custom("s3".to_string()), |config| Box::new(QueueMonitor { config })),
        Err(ServiceMonitorError::ReservedKindTag(_))
    );
}

#[test]
fn test_builtin_registry_lists_all_kinds() {
    let registry = ServiceMonitorRegistry::default();
    let kinds = registry.kinds();
    assert_eq!(kinds.len(), ResourceKind::BUILTIN.len());
    for kind in ResourceKind::BUILTIN {
        assert!(registry.contains(&kind));
    }
}
