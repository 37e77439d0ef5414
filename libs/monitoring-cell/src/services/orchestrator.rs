// =====================================================================================
// MONITORING ORCHESTRATOR
// =====================================================================================

use tracing::{debug, info, instrument, warn};

use cross_account_cell::{LinkHandle, LinkSource, LinkSourceProps, TrustLinkSink};
use service_monitor_cell::{
    MonitorConfig, ResourceNameResolver, ServiceMonitor, ServiceMonitorError, ServiceMonitorRegistry,
};
use shared_config::{DEFAULT_DASHBOARD_REFRESH_SECONDS, DEFAULT_DASHBOARD_TIME_RANGE};
use shared_models::{CustomMetric, MetricDescriptor};
use shared_utils::naming::{alarm_identity, alarm_name, default_dashboard_name, sanitize_dashboard_name};

use crate::models::{
    AlarmHandle, ComposedResource, CompositionResult, DashboardSummary, LinkSummary,
    MonitoredResourceEntry, MonitoringError, MonitoringRequest, OrchestrationState, ResourceSkipped,
};
use crate::services::dashboard::{custom_metric_widgets, DashboardDefinition};
use crate::services::sinks::{AlarmDefinition, AlarmSink, DashboardSink};

/// Downstream collaborators for one composition run.
pub struct CompositionSinks<'a> {
    pub alarms: &'a mut dyn AlarmSink,
    pub dashboards: &'a mut dyn DashboardSink,
    pub links: &'a mut dyn TrustLinkSink,
}

struct EnabledResource {
    entry: MonitoredResourceEntry,
    resource_name: String,
    monitor: Box<dyn ServiceMonitor>,
}

/// Drives one application's composition. Owns the link it creates so a second
/// run extends it instead of creating another.
pub struct MonitoringOrchestrator {
    registry: ServiceMonitorRegistry,
    resolver: Box<dyn ResourceNameResolver>,
    region: String,
    state: OrchestrationState,
    link: Option<(LinkSource, Option<LinkHandle>)>,
}

impl MonitoringOrchestrator {
    pub fn new(
        registry: ServiceMonitorRegistry,
        resolver: impl ResourceNameResolver + 'static,
        region: impl Into<String>,
    ) -> Self {
        Self {
            registry,
            resolver: Box::new(resolver),
            region: region.into(),
            state: OrchestrationState::Initialized,
            link: None,
        }
    }

    /// Extend a caller-supplied link rather than creating one. Without a handle
    /// the link is materialized on first use.
    pub fn with_existing_link(mut self, link: LinkSource, handle: Option<LinkHandle>) -> Self {
        self.link = Some((link, handle));
        self
    }

    pub fn state(&self) -> OrchestrationState {
        self.state
    }

    pub fn link(&self) -> Option<&LinkSource> {
        self.link.as_ref().map(|(link, _)| link)
    }

    /// Hands back the owned link so a later orchestrator can extend it.
    pub fn into_link(self) -> Option<(LinkSource, Option<LinkHandle>)> {
        self.link
    }

    #[instrument(skip(self, request, sinks), fields(app = %request.app_name, env = %request.environment))]
    pub fn compose(
        &mut self,
        request: &MonitoringRequest,
        sinks: &mut CompositionSinks<'_>,
    ) -> Result<CompositionResult, MonitoringError> {
        self.state = OrchestrationState::Initialized;
        let notification_target = self.preflight(request)?;

        let mut states = Vec::new();

        // Step 1: resolve, instantiate, enable
        let (enabled, skipped) = self.resolve_resources(request);
        self.advance(&mut states, OrchestrationState::ResourcesResolved);

        // Step 2: aggregate in encounter order, duplicates kept
        let metrics: Vec<MetricDescriptor> = enabled
            .iter()
            .flat_map(|resource| resource.monitor.metrics())
            .collect();
        self.advance(&mut states, OrchestrationState::MetricsAggregated);
        info!(metrics = metrics.len(), resources = enabled.len(), skipped = skipped.len(), "Metrics aggregated");

        let mut alarms = Vec::new();
        if let Some(target) = notification_target {
            alarms = self.create_alarms(request, &enabled, target, &mut *sinks.alarms);
            self.advance(&mut states, OrchestrationState::AlarmsCreated);
        }

        let mut dashboard = None;
        if request.dashboard.enabled {
            dashboard = Some(self.build_dashboard(request, &enabled, &mut *sinks.dashboards));
            self.advance(&mut states, OrchestrationState::DashboardBuilt);
        }

        let mut link = None;
        if request.cross_account.enabled {
            let log_groups = collect_log_groups(request, &enabled);
            link = Some(self.establish_link(request, &metrics, &log_groups, &mut *sinks.links)?);
            self.advance(&mut states, OrchestrationState::LinkEstablished);
        }

        let resources = enabled
            .iter()
            .map(|resource| ComposedResource {
                handle: resource.entry.resource.clone(),
                kind: resource.entry.kind.clone(),
                resource_name: resource.resource_name.clone(),
                enabled_features: resource.monitor.enabled_features(),
                metric_count: resource.monitor.metrics().len(),
                widget_count: resource.monitor.widgets().len(),
                alarm_count: resource.monitor.alarms().len(),
            })
            .collect();

        Ok(CompositionResult {
            app_name: request.app_name.clone(),
            environment: request.environment.clone(),
            states,
            resources,
            skipped,
            metrics,
            alarms,
            dashboard,
            link,
        })
    }

    /// Configuration errors abort before anything is enabled, created or linked.
    /// Returns the notification target when alarms are to be created.
    fn preflight<'r>(&self, request: &'r MonitoringRequest) -> Result<Option<&'r str>, MonitoringError> {
        if request.app_name.trim().is_empty() {
            return Err(MonitoringError::InvalidRequest("appName must not be empty".to_string()));
        }
        if request.environment.trim().is_empty() {
            return Err(MonitoringError::InvalidRequest("environment must not be empty".to_string()));
        }

        let notification_target = if request.alarms.enabled {
            match request.alarms.notification_target.as_deref().map(str::trim) {
                Some(target) if !target.is_empty() => Some(target),
                _ => {
                    warn!("Alarms requested without a notification target");
                    return Err(MonitoringError::MissingAlarmTarget);
                }
            }
        } else {
            None
        };

        if request.cross_account.enabled && self.link.is_none() {
            let has_sink = request
                .cross_account
                .sink_arn
                .as_deref()
                .is_some_and(|arn| !arn.trim().is_empty());
            if !has_sink {
                warn!("Cross-account sharing requested without a sink");
                return Err(MonitoringError::MissingLinkTarget);
            }
        }

        Ok(notification_target)
    }

    fn resolve_resources(&self, request: &MonitoringRequest) -> (Vec<EnabledResource>, Vec<ResourceSkipped>) {
        let mut enabled = Vec::with_capacity(request.resources.len());
        let mut skipped = Vec::new();

        for entry in &request.resources {
            match self.enable_entry(entry) {
                Ok(resource) => enabled.push(resource),
                Err(error) => {
                    warn!(resource = %entry.resource, kind = %entry.kind, error = %error, "Skipping resource");
                    skipped.push(ResourceSkipped::new(entry.resource.clone(), entry.kind.clone(), error));
                }
            }
        }

        (enabled, skipped)
    }

    fn enable_entry(&self, entry: &MonitoredResourceEntry) -> Result<EnabledResource, ServiceMonitorError> {
        let constructor = self.registry.resolve(&entry.kind)?;
        let resource_name = self.resolver.resolve(&entry.resource)?;

        let mut config = MonitorConfig::new(resource_name.clone())
            .with_custom_metrics(entry.custom_metrics.iter().map(|custom| custom.metric.clone()).collect())
            .detailed(entry.detailed_monitoring);
        if let Some(display_name) = &entry.display_name {
            config = config.with_display_name(display_name.clone());
        }

        let mut monitor = constructor(config);
        monitor.enable();
        debug!(
            resource = %resource_name,
            kind = %entry.kind,
            metrics = monitor.metrics().len(),
            widgets = monitor.widgets().len(),
            alarms = monitor.alarms().len(),
            "Strategy enabled"
        );

        Ok(EnabledResource {
            entry: entry.clone(),
            resource_name,
            monitor,
        })
    }

    /// Ordinals run across the whole batch, so identities never collide even
    /// when two resources of one kind emit identically-named alarms.
    fn create_alarms(
        &self,
        request: &MonitoringRequest,
        enabled: &[EnabledResource],
        notification_target: &str,
        sink: &mut dyn AlarmSink,
    ) -> Vec<AlarmHandle> {
        let prefix = request.resource_prefix();
        let mut handles = Vec::new();

        let rules = enabled.iter().flat_map(|resource| {
            let kind = resource.entry.kind.clone();
            resource.monitor.alarms().into_iter().map(move |rule| (kind.clone(), rule))
        });

        for (ordinal, (kind, rule)) in rules.enumerate() {
            let identity = alarm_identity(kind.tag(), &rule.metric_name, ordinal + 1);
            let alarm = AlarmDefinition {
                alarm_name: alarm_name(&prefix, &identity),
                identity,
                rule,
                notification_target: Some(notification_target.to_string()),
            };
            handles.push(sink.put_alarm(&alarm));
        }

        info!(alarms = handles.len(), "Alarms created");
        handles
    }

    fn build_dashboard(
        &self,
        request: &MonitoringRequest,
        enabled: &[EnabledResource],
        sink: &mut dyn DashboardSink,
    ) -> DashboardSummary {
        let mut widgets: Vec<_> = enabled.iter().flat_map(|resource| resource.monitor.widgets()).collect();

        let custom: Vec<CustomMetric> = enabled
            .iter()
            .flat_map(|resource| resource.entry.custom_metrics.iter().cloned())
            .collect();
        widgets.extend(custom_metric_widgets(&custom));

        let name = request
            .dashboard
            .name
            .as_deref()
            .map(sanitize_dashboard_name)
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| default_dashboard_name(&request.app_name, &request.environment));

        let definition = DashboardDefinition {
            name,
            region: self.region.clone(),
            refresh_seconds: request.dashboard.refresh_seconds.unwrap_or(DEFAULT_DASHBOARD_REFRESH_SECONDS),
            time_range: request
                .dashboard
                .time_range
                .clone()
                .unwrap_or_else(|| DEFAULT_DASHBOARD_TIME_RANGE.to_string()),
            widgets,
        };

        let handle = sink.put_dashboard(&definition);
        info!(dashboard = %handle.name, widgets = definition.widgets.len(), "Dashboard built");

        DashboardSummary {
            handle,
            widgets: definition.widgets,
        }
    }

    fn establish_link(
        &mut self,
        request: &MonitoringRequest,
        metrics: &[MetricDescriptor],
        log_groups: &[String],
        sink: &mut dyn TrustLinkSink,
    ) -> Result<LinkSummary, MonitoringError> {
        match self.link.as_mut() {
            Some((link, handle)) => {
                let mut grew = false;
                for metric in metrics {
                    grew |= link.add_metric(metric);
                }
                for log_group in log_groups {
                    grew |= link.add_log_group(log_group);
                }

                let (link_handle, created) = match handle {
                    Some(existing) => {
                        if grew {
                            sink.update_link(existing, link);
                        }
                        (existing.clone(), false)
                    }
                    None => {
                        let created = sink.create_link(link);
                        *handle = Some(created.clone());
                        (created, true)
                    }
                };

                info!(link_id = %link_handle.id, grew, "Existing link extended");
                Ok(LinkSummary {
                    handle: link_handle,
                    configuration: link.link_configuration(),
                    created,
                })
            }
            None => {
                let sink_arn = request
                    .cross_account
                    .sink_arn
                    .clone()
                    .ok_or(MonitoringError::MissingLinkTarget)?;
                let link = LinkSource::new(LinkSourceProps {
                    sink_arn,
                    label_template: request.cross_account.label_template.clone(),
                    metrics: metrics.to_vec(),
                    log_groups: log_groups.to_vec(),
                })?;

                let handle = sink.create_link(&link);
                info!(link_id = %handle.id, "Link created");
                let summary = LinkSummary {
                    handle: handle.clone(),
                    configuration: link.link_configuration(),
                    created: true,
                };
                self.link = Some((link, Some(handle)));
                Ok(summary)
            }
        }
    }

    fn advance(&mut self, states: &mut Vec<OrchestrationState>, next: OrchestrationState) {
        debug!(from = ?self.state, to = ?next, "Orchestration state transition");
        self.state = next;
        states.push(next);
    }
}

/// Strategy-owned log groups first, then the caller's extras, without repeats.
fn collect_log_groups(request: &MonitoringRequest, enabled: &[EnabledResource]) -> Vec<String> {
    let mut log_groups: Vec<String> = Vec::new();
    let owned = enabled.iter().flat_map(|resource| resource.monitor.log_groups());
    for log_group in owned.chain(request.log_groups.iter().cloned()) {
        if !log_groups.contains(&log_group) {
            log_groups.push(log_group);
        }
    }
    log_groups
}
